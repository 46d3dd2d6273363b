use std::fmt;

use super::*;

/// An 8-bit operand selected by a 3-bit register code.
///
/// Code 6 is not a register but the byte at (HL). `None` stands in for the
/// missing operand of single-operand forms and never reaches the dispatcher.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Target {
    Register8(Reg8),
    AddrHL,
    None,
}

pub const REG_CODE_B: u8 = 0;
pub const REG_CODE_C: u8 = 1;
pub const REG_CODE_D: u8 = 2;
pub const REG_CODE_E: u8 = 3;
pub const REG_CODE_H: u8 = 4;
pub const REG_CODE_L: u8 = 5;
pub const REG_CODE_HL: u8 = 6;
pub const REG_CODE_A: u8 = 7;

impl Target {
    pub fn from_code(code: u8) -> Self {
        match code & 0b111 {
            REG_CODE_B => Target::Register8(Reg8::B),
            REG_CODE_C => Target::Register8(Reg8::C),
            REG_CODE_D => Target::Register8(Reg8::D),
            REG_CODE_E => Target::Register8(Reg8::E),
            REG_CODE_H => Target::Register8(Reg8::H),
            REG_CODE_L => Target::Register8(Reg8::L),
            REG_CODE_HL => Target::AddrHL,
            _ => Target::Register8(Reg8::A),
        }
    }

    pub fn is_memory(&self) -> bool {
        matches!(self, Target::AddrHL)
    }
}

impl fmt::Display for Target {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Target::Register8(reg) => write!(f, "{}", reg),
            Target::AddrHL => write!(f, "(HL)"),
            Target::None => write!(f, "-"),
        }
    }
}
