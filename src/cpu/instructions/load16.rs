use crate::cpu::{Cpu, alu::add_sp_offset};
use crate::mmu::Memory;
use crate::opcodes::Reg16;

impl Cpu {
    pub(crate) fn ld_rr_nn(&mut self, rr: Reg16, nn: u16) -> u32 {
        self.regs.set_reg16(rr, nn);
        12
    }

    pub(crate) fn ld_sp_hl(&mut self) -> u32 {
        self.regs.sp = self.regs.hl();
        8
    }

    pub(crate) fn ld_hl_sp_e(&mut self, offset: i8) -> u32 {
        let (res, h, c) = add_sp_offset(self.regs.sp, offset);
        self.regs.set_hl(res);
        self.regs.set_z(false);
        self.regs.set_n(false);
        self.regs.set_h(h);
        self.regs.set_c(c);
        12
    }

    pub(crate) fn ld_nn_sp(&mut self, nn: u16, bus: &mut impl Memory) -> u32 {
        bus.write_u16(nn, self.regs.sp);
        20
    }

    pub(crate) fn push(&mut self, qq: Reg16, bus: &mut impl Memory) -> u32 {
        let value = self.regs.get_reg16(qq);
        self.push_u16(bus, value);
        16
    }

    /// `POP AF` drops the low nibble of F.
    pub(crate) fn pop(&mut self, qq: Reg16, bus: &mut impl Memory) -> u32 {
        let value = self.pop_u16(bus);
        self.regs.set_reg16(qq, value);
        12
    }
}
