use crate::cpu::{
    Cpu,
    alu::{add_16bit, add_sp_offset},
};
use crate::opcodes::Reg16;

impl Cpu {
    /// `ADD HL, rr`. Z is untouched; H and C come from bits 11 and 15.
    pub(crate) fn add_hl(&mut self, rr: Reg16) -> u32 {
        let (res, h, c) = add_16bit(self.regs.hl(), self.regs.get_reg16(rr));
        self.regs.set_hl(res);
        self.regs.set_n(false);
        self.regs.set_h(h);
        self.regs.set_c(c);
        8
    }

    /// 16-bit INC/DEC touch no flags.
    pub(crate) fn inc16(&mut self, rr: Reg16) -> u32 {
        let value = self.regs.get_reg16(rr).wrapping_add(1);
        self.regs.set_reg16(rr, value);
        8
    }

    pub(crate) fn dec16(&mut self, rr: Reg16) -> u32 {
        let value = self.regs.get_reg16(rr).wrapping_sub(1);
        self.regs.set_reg16(rr, value);
        8
    }

    pub(crate) fn add_sp_e(&mut self, offset: i8) -> u32 {
        let (res, h, c) = add_sp_offset(self.regs.sp, offset);
        self.regs.sp = res;
        self.regs.set_z(false);
        self.regs.set_n(false);
        self.regs.set_h(h);
        self.regs.set_c(c);
        16
    }
}
