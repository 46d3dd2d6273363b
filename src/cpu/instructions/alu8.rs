use crate::constants::*;
use crate::cpu::{AluOutput, Cpu};
use crate::mmu::Memory;
use crate::opcodes::{AluOp, Target};

use super::hl_penalty;

impl Cpu {
    pub(crate) fn alu_target(&mut self, op: AluOp, src: Target, bus: &mut impl Memory) -> u32 {
        let value = self.read_target(src, bus);
        self.alu_a(op, value);
        4 + hl_penalty(src, 4)
    }

    pub(crate) fn alu_imm(&mut self, op: AluOp, n: u8) -> u32 {
        self.alu_a(op, n);
        8
    }

    /// Applies `op` between A and `value`. CP keeps A.
    fn alu_a(&mut self, op: AluOp, value: u8) {
        let a = self.regs.a;
        let carry = self.regs.get_flag(FLAG_C);
        let res = match op {
            AluOp::Add => AluOutput::alu_8bit_add(a, value, false),
            AluOp::Adc => AluOutput::alu_8bit_add(a, value, carry),
            AluOp::Sub | AluOp::Cp => AluOutput::alu_8bit_sub(a, value, false),
            AluOp::Sbc => AluOutput::alu_8bit_sub(a, value, carry),
            AluOp::And => AluOutput::alu_and(a, value),
            AluOp::Xor => AluOutput::alu_xor(a, value),
            AluOp::Or => AluOutput::alu_or(a, value),
        };

        self.apply_alu_flags(&res);
        if op != AluOp::Cp {
            self.regs.a = res.value;
        }
    }

    pub(crate) fn inc8(&mut self, r: Target, bus: &mut impl Memory) -> u32 {
        let res = AluOutput::alu_8bit_inc(self.read_target(r, bus));
        self.write_target(r, res.value, bus);
        self.regs.set_z(res.z);
        self.regs.set_n(res.n);
        self.regs.set_h(res.h);
        4 + hl_penalty(r, 8)
    }

    pub(crate) fn dec8(&mut self, r: Target, bus: &mut impl Memory) -> u32 {
        let res = AluOutput::alu_8bit_dec(self.read_target(r, bus));
        self.write_target(r, res.value, bus);
        self.regs.set_z(res.z);
        self.regs.set_n(res.n);
        self.regs.set_h(res.h);
        4 + hl_penalty(r, 8)
    }

    pub(crate) fn daa(&mut self) -> u32 {
        let res = AluOutput::alu_daa(
            self.regs.a,
            self.regs.get_flag(FLAG_N),
            self.regs.get_flag(FLAG_H),
            self.regs.get_flag(FLAG_C),
        );
        self.regs.a = res.value;
        self.apply_alu_flags(&res);
        4
    }

    pub(crate) fn cpl(&mut self) -> u32 {
        self.regs.a = !self.regs.a;
        self.regs.set_n(true);
        self.regs.set_h(true);
        4
    }

    pub(crate) fn scf(&mut self) -> u32 {
        self.regs.set_n(false);
        self.regs.set_h(false);
        self.regs.set_c(true);
        4
    }

    pub(crate) fn ccf(&mut self) -> u32 {
        let c = self.regs.get_flag(FLAG_C);
        self.regs.set_n(false);
        self.regs.set_h(false);
        self.regs.set_c(!c);
        4
    }
}
