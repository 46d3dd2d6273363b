use crate::constants::FLAG_C;
use crate::cpu::{AluOutput, Cpu};
use crate::mmu::Memory;
use crate::opcodes::{ShiftOp, Target};

use super::hl_penalty;

impl Cpu {
    /// RLCA/RRCA/RLA/RRA: like the CB forms on A, but Z is always cleared.
    pub(crate) fn rotate_a(&mut self, op: ShiftOp) -> u32 {
        let mut res = AluOutput::alu_shift(op, self.regs.a, self.regs.get_flag(FLAG_C));
        res.z = false;
        self.regs.a = res.value;
        self.apply_alu_flags(&res);
        4
    }

    pub(crate) fn shift(&mut self, op: ShiftOp, r: Target, bus: &mut impl Memory) -> u32 {
        let value = self.read_target(r, bus);
        let res = AluOutput::alu_shift(op, value, self.regs.get_flag(FLAG_C));
        self.write_target(r, res.value, bus);
        self.apply_alu_flags(&res);
        8 + hl_penalty(r, 8)
    }
}
