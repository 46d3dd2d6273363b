use crate::constants::*;
use crate::opcodes::{Reg8, Reg16};

/// All CPU-visible state: eight 8-bit registers, SP, PC and the interrupt
/// master enable.
///
/// Setters take full-width values, so arithmetic performed by callers with
/// `wrapping_*` lands exactly like the hardware would (0xFFFF + 1 == 0x0000).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Registers {
    pub a: u8,
    f: u8, // Flags Register, low nibble always 0
    pub b: u8,
    pub c: u8,
    pub d: u8,
    pub e: u8,
    pub h: u8,
    pub l: u8,

    pub sp: u16, // Stack Pointer
    pub pc: u16, // Program Counter

    pub ime: bool, // Interrupt Master Enable
}

impl Registers {
    /// Zeroed state, used when a bootrom runs first and sets everything up.
    pub fn zeroed() -> Self {
        Self::default()
    }

    /// State the DMG bootrom leaves behind when it hands over to the cartridge.
    pub fn post_boot() -> Self {
        Self {
            a: 0x01,
            f: 0xB0,
            b: 0x00,
            c: 0x13,
            d: 0x00,
            e: 0xD8,
            h: 0x01,
            l: 0x4D,
            sp: 0xFFFE,
            pc: 0x0100, // Entry point for cartridges
            ime: false,
        }
    }

    pub fn f(&self) -> u8 {
        self.f
    }

    pub fn set_f(&mut self, val: u8) {
        self.f = val & 0xF0;
    }

    pub fn get_flag(&self, flag: u8) -> bool {
        (self.f & flag) != 0
    }

    pub fn set_flag(&mut self, flag: u8, value: bool) {
        if value {
            self.f |= flag & 0xF0;
        } else {
            self.f &= !flag;
        }
    }

    pub fn set_z(&mut self, value: bool) {
        self.set_flag(FLAG_Z, value);
    }

    pub fn set_n(&mut self, value: bool) {
        self.set_flag(FLAG_N, value);
    }

    pub fn set_h(&mut self, value: bool) {
        self.set_flag(FLAG_H, value);
    }

    pub fn set_c(&mut self, value: bool) {
        self.set_flag(FLAG_C, value);
    }

    pub fn get_reg8(&self, reg: Reg8) -> u8 {
        match reg {
            Reg8::A => self.a,
            Reg8::B => self.b,
            Reg8::C => self.c,
            Reg8::D => self.d,
            Reg8::E => self.e,
            Reg8::H => self.h,
            Reg8::L => self.l,
        }
    }

    pub fn set_reg8(&mut self, reg: Reg8, val: u8) {
        match reg {
            Reg8::A => self.a = val,
            Reg8::B => self.b = val,
            Reg8::C => self.c = val,
            Reg8::D => self.d = val,
            Reg8::E => self.e = val,
            Reg8::H => self.h = val,
            Reg8::L => self.l = val,
        }
    }

    pub fn get_reg16(&self, reg: Reg16) -> u16 {
        match reg {
            Reg16::AF => u16::from_be_bytes([self.a, self.f]),
            Reg16::BC => u16::from_be_bytes([self.b, self.c]),
            Reg16::DE => u16::from_be_bytes([self.d, self.e]),
            Reg16::HL => u16::from_be_bytes([self.h, self.l]),
            Reg16::SP => self.sp,
        }
    }

    pub fn set_reg16(&mut self, reg: Reg16, val: u16) {
        let [high, low] = val.to_be_bytes();
        match reg {
            Reg16::AF => {
                self.a = high;
                self.set_f(low);
            }
            Reg16::BC => {
                self.b = high;
                self.c = low;
            }
            Reg16::DE => {
                self.d = high;
                self.e = low;
            }
            Reg16::HL => {
                self.h = high;
                self.l = low;
            }
            Reg16::SP => self.sp = val,
        }
    }

    /// Reads a pair selected by a 2-bit double-register code.
    /// `sp_set` picks the SP/HL group (code 3 = SP) over the AF group (code 3 = AF).
    pub fn get_by_double_code(&self, code: u8, sp_set: bool) -> u16 {
        self.get_reg16(Reg16::from_double_code(code, sp_set))
    }

    pub fn set_by_double_code(&mut self, code: u8, val: u16, sp_set: bool) {
        self.set_reg16(Reg16::from_double_code(code, sp_set), val);
    }

    pub fn af(&self) -> u16 {
        self.get_reg16(Reg16::AF)
    }

    pub fn bc(&self) -> u16 {
        self.get_reg16(Reg16::BC)
    }

    pub fn de(&self) -> u16 {
        self.get_reg16(Reg16::DE)
    }

    pub fn hl(&self) -> u16 {
        self.get_reg16(Reg16::HL)
    }

    pub fn set_af(&mut self, val: u16) {
        self.set_reg16(Reg16::AF, val);
    }

    pub fn set_bc(&mut self, val: u16) {
        self.set_reg16(Reg16::BC, val);
    }

    pub fn set_de(&mut self, val: u16) {
        self.set_reg16(Reg16::DE, val);
    }

    pub fn set_hl(&mut self, val: u16) {
        self.set_reg16(Reg16::HL, val);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_low_nibble_is_masked() {
        let mut regs = Registers::zeroed();
        regs.set_f(0xFF);
        assert_eq!(regs.f(), 0xF0);

        regs.set_af(0x12FF);
        assert_eq!(regs.a, 0x12);
        assert_eq!(regs.f(), 0xF0);
        assert_eq!(regs.af(), 0x12F0);
    }

    #[test]
    fn test_pairs_are_high_byte_first() {
        let mut regs = Registers::zeroed();
        regs.set_hl(0xC003);
        assert_eq!(regs.h, 0xC0);
        assert_eq!(regs.l, 0x03);

        regs.d = 0xBE;
        regs.e = 0xEF;
        assert_eq!(regs.de(), 0xBEEF);
    }

    #[test]
    fn test_double_code_three_depends_on_group() {
        let mut regs = Registers::zeroed();
        regs.sp = 0xFFFE;
        regs.set_af(0x1230);

        assert_eq!(regs.get_by_double_code(3, true), 0xFFFE);
        assert_eq!(regs.get_by_double_code(3, false), 0x1230);

        regs.set_by_double_code(3, 0xD000, true);
        assert_eq!(regs.sp, 0xD000);
        assert_eq!(regs.af(), 0x1230);

        regs.set_by_double_code(0, 0x0102, false);
        assert_eq!(regs.bc(), 0x0102);
    }

    #[test]
    fn test_individual_flags() {
        let mut regs = Registers::zeroed();
        regs.set_z(true);
        regs.set_c(true);
        assert!(regs.get_flag(FLAG_Z));
        assert!(!regs.get_flag(FLAG_N));
        assert!(!regs.get_flag(FLAG_H));
        assert!(regs.get_flag(FLAG_C));
        assert_eq!(regs.f(), 0x90);

        regs.set_z(false);
        assert_eq!(regs.f(), 0x10);
    }

    #[test]
    fn test_post_boot_values() {
        let regs = Registers::post_boot();
        assert_eq!(regs.af(), 0x01B0);
        assert_eq!(regs.bc(), 0x0013);
        assert_eq!(regs.de(), 0x00D8);
        assert_eq!(regs.hl(), 0x014D);
        assert_eq!(regs.sp, 0xFFFE);
        assert_eq!(regs.pc, 0x0100);
    }
}
