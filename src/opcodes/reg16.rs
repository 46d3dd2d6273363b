use std::fmt;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Reg16 {
    AF,
    BC,
    DE,
    HL,
    SP,
}

impl Reg16 {
    /// Maps a 2-bit double-register code onto a pair.
    ///
    /// Code 3 is SP for 16-bit loads and arithmetic (`sp_set`), and AF for
    /// PUSH/POP. Only the low two bits of `code` are considered.
    pub fn from_double_code(code: u8, sp_set: bool) -> Self {
        match code & 0b11 {
            0 => Reg16::BC,
            1 => Reg16::DE,
            2 => Reg16::HL,
            _ if sp_set => Reg16::SP,
            _ => Reg16::AF,
        }
    }
}

impl fmt::Display for Reg16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
