use crate::cpu::Cpu;
use crate::mmu::Memory;
use crate::opcodes::{Reg16, Target};

use super::hl_penalty;

const HIGH_PAGE: u16 = 0xFF00;

impl Cpu {
    /// `LD r, r'`. One side may be (HL).
    pub(crate) fn ld_r_r(&mut self, dst: Target, src: Target, bus: &mut impl Memory) -> u32 {
        let value = self.read_target(src, bus);
        self.write_target(dst, value, bus);
        4 + hl_penalty(dst, 4) + hl_penalty(src, 4)
    }

    pub(crate) fn ld_r_n(&mut self, dst: Target, n: u8, bus: &mut impl Memory) -> u32 {
        self.write_target(dst, n, bus);
        8 + hl_penalty(dst, 4)
    }

    pub(crate) fn ld_a_indirect(&mut self, rr: Reg16, bus: &mut impl Memory) -> u32 {
        self.regs.a = bus.read(self.regs.get_reg16(rr));
        8
    }

    pub(crate) fn ld_indirect_a(&mut self, rr: Reg16, bus: &mut impl Memory) -> u32 {
        bus.write(self.regs.get_reg16(rr), self.regs.a);
        8
    }

    /// `LD A, (HL+)` / `LD A, (HL-)`. HL wraps at both ends.
    pub(crate) fn ld_a_hl_step(&mut self, bus: &mut impl Memory, delta: i16) -> u32 {
        let hl = self.regs.hl();
        self.regs.a = bus.read(hl);
        self.regs.set_hl(hl.wrapping_add_signed(delta));
        8
    }

    pub(crate) fn ld_hl_step_a(&mut self, bus: &mut impl Memory, delta: i16) -> u32 {
        let hl = self.regs.hl();
        bus.write(hl, self.regs.a);
        self.regs.set_hl(hl.wrapping_add_signed(delta));
        8
    }

    pub(crate) fn ld_a_nn(&mut self, nn: u16, bus: &mut impl Memory) -> u32 {
        self.regs.a = bus.read(nn);
        16
    }

    pub(crate) fn ld_nn_a(&mut self, nn: u16, bus: &mut impl Memory) -> u32 {
        bus.write(nn, self.regs.a);
        16
    }

    pub(crate) fn ldh_a_c(&mut self, bus: &mut impl Memory) -> u32 {
        self.regs.a = bus.read(HIGH_PAGE | self.regs.c as u16);
        8
    }

    pub(crate) fn ldh_c_a(&mut self, bus: &mut impl Memory) -> u32 {
        bus.write(HIGH_PAGE | self.regs.c as u16, self.regs.a);
        8
    }

    pub(crate) fn ldh_a_n(&mut self, n: u8, bus: &mut impl Memory) -> u32 {
        self.regs.a = bus.read(HIGH_PAGE | n as u16);
        12
    }

    pub(crate) fn ldh_n_a(&mut self, n: u8, bus: &mut impl Memory) -> u32 {
        bus.write(HIGH_PAGE | n as u16, self.regs.a);
        12
    }
}
