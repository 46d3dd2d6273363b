use crate::cpu::Cpu;
use crate::mmu::Memory;
use crate::opcodes::Target;

use super::hl_penalty;

impl Cpu {
    /// `BIT b, r`: Z is set when the bit is clear. C is untouched.
    pub(crate) fn bit(&mut self, bit: u8, r: Target, bus: &mut impl Memory) -> u32 {
        let value = self.read_target(r, bus);
        self.regs.set_z(value & (1 << bit) == 0);
        self.regs.set_n(false);
        self.regs.set_h(true);
        8 + hl_penalty(r, 4)
    }

    pub(crate) fn res(&mut self, bit: u8, r: Target, bus: &mut impl Memory) -> u32 {
        let value = self.read_target(r, bus) & !(1 << bit);
        self.write_target(r, value, bus);
        8 + hl_penalty(r, 8)
    }

    pub(crate) fn set(&mut self, bit: u8, r: Target, bus: &mut impl Memory) -> u32 {
        let value = self.read_target(r, bus) | (1 << bit);
        self.write_target(r, value, bus);
        8 + hl_penalty(r, 8)
    }
}
