/// Trailing immediate bytes of a fetched instruction.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum OperandValue {
    #[default]
    None,
    U8(u8),
    U16(u16), // Little-endian on the bus, already assembled here
}

impl OperandValue {
    pub fn as_u8(self) -> u8 {
        match self {
            OperandValue::U8(v) => v,
            OperandValue::U16(v) => v as u8,
            OperandValue::None => 0,
        }
    }

    pub fn as_u16(self) -> u16 {
        match self {
            OperandValue::U16(v) => v,
            OperandValue::U8(v) => v as u16, // Safe promotion
            OperandValue::None => 0,
        }
    }

    /// Signed view of an 8-bit immediate, for JR and SP-relative forms.
    pub fn as_i8(self) -> i8 {
        self.as_u8() as i8
    }
}
