use std::fmt;

use crate::constants::CB_PREFIX_OPCODE_BYTE;

use super::*;

/// Bits 3-5: single-register code (also ALU op, bit index, RST target).
pub fn register_code(opcode: u8) -> u8 {
    (opcode >> 3) & 0b111
}

/// Bits 0-2: source register of two-operand forms.
pub fn second_register_code(opcode: u8) -> u8 {
    opcode & 0b111
}

/// Bits 4-5: register pair of 16-bit groups.
pub fn double_register_code(opcode: u8) -> u8 {
    (opcode >> 4) & 0b11
}

/// Bits 3-4: branch condition.
pub fn condition_code(opcode: u8) -> u8 {
    (opcode >> 3) & 0b11
}

/// One fetch: the raw opcode, its trailing immediate and the decoded class.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub opcode: u8,
    pub prefixed: bool,
    pub immediate: OperandValue,
    pub op: Op,
}

impl Instruction {
    pub fn new(opcode: u8) -> Self {
        Self {
            opcode,
            prefixed: false,
            immediate: OperandValue::None,
            op: Op::decode(opcode),
        }
    }

    pub fn with_u8(opcode: u8, value: u8) -> Self {
        Self {
            immediate: OperandValue::U8(value),
            ..Self::new(opcode)
        }
    }

    pub fn with_u16(opcode: u8, value: u16) -> Self {
        Self {
            immediate: OperandValue::U16(value),
            ..Self::new(opcode)
        }
    }

    /// A CB-prefixed instruction; `opcode` is the byte after the prefix.
    pub fn cb(opcode: u8) -> Self {
        Self {
            opcode,
            prefixed: true,
            immediate: OperandValue::None,
            op: Op::decode_cb(opcode),
        }
    }

    /// Pulls one complete instruction out of a byte stream.
    /// `next` yields successive bytes starting at the opcode.
    pub fn fetch(mut next: impl FnMut() -> u8) -> Self {
        let opcode = next();
        if opcode == CB_PREFIX_OPCODE_BYTE {
            return Self::cb(next());
        }

        let op = Op::decode(opcode);
        let immediate = match op.immediate_len() {
            0 => OperandValue::None,
            1 => OperandValue::U8(next()),
            _ => {
                let low = next();
                let high = next();
                OperandValue::U16(u16::from_le_bytes([low, high]))
            }
        };

        Self {
            opcode,
            prefixed: false,
            immediate,
            op,
        }
    }

    /// Encoded length in bytes, prefix included.
    pub fn encoded_len(&self) -> u16 {
        if self.prefixed {
            2
        } else {
            1 + self.op.immediate_len()
        }
    }

    pub fn register_code(&self) -> u8 {
        register_code(self.opcode)
    }

    pub fn second_register_code(&self) -> u8 {
        second_register_code(self.opcode)
    }

    pub fn double_register_code(&self) -> u8 {
        double_register_code(self.opcode)
    }

    pub fn imm8(&self) -> u8 {
        self.immediate.as_u8()
    }

    pub fn imm16(&self) -> u16 {
        self.immediate.as_u16()
    }

    pub fn offset(&self) -> i8 {
        self.immediate.as_i8()
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let n8 = self.imm8();
        let n16 = self.imm16();
        let e8 = self.offset();
        match self.op {
            Op::LdRR { dst, src } => write!(f, "LD {}, {}", dst, src),
            Op::LdRN { dst } => write!(f, "LD {}, ${:02X}", dst, n8),
            Op::LdAIndirect(rr) => write!(f, "LD A, ({})", rr),
            Op::LdIndirectA(rr) => write!(f, "LD ({}), A", rr),
            Op::LdAHlInc => write!(f, "LD A, (HL+)"),
            Op::LdAHlDec => write!(f, "LD A, (HL-)"),
            Op::LdHlIncA => write!(f, "LD (HL+), A"),
            Op::LdHlDecA => write!(f, "LD (HL-), A"),
            Op::LdANn => write!(f, "LD A, (${:04X})", n16),
            Op::LdNnA => write!(f, "LD (${:04X}), A", n16),
            Op::LdhAC => write!(f, "LDH A, (C)"),
            Op::LdhCA => write!(f, "LDH (C), A"),
            Op::LdhAN => write!(f, "LDH A, (${:02X})", n8),
            Op::LdhNA => write!(f, "LDH (${:02X}), A", n8),
            Op::LdRrNn { rr } => write!(f, "LD {}, ${:04X}", rr, n16),
            Op::LdSpHl => write!(f, "LD SP, HL"),
            Op::LdHlSpE => write!(f, "LD HL, SP{:+}", e8),
            Op::LdNnSp => write!(f, "LD (${:04X}), SP", n16),
            Op::Push { qq } => write!(f, "PUSH {}", qq),
            Op::Pop { qq } => write!(f, "POP {}", qq),
            Op::Alu { op, src } => write!(f, "{:?} A, {}", op, src),
            Op::AluImm { op } => write!(f, "{:?} A, ${:02X}", op, n8),
            Op::Inc8 { r } => write!(f, "INC {}", r),
            Op::Dec8 { r } => write!(f, "DEC {}", r),
            Op::Daa => write!(f, "DAA"),
            Op::Cpl => write!(f, "CPL"),
            Op::Scf => write!(f, "SCF"),
            Op::Ccf => write!(f, "CCF"),
            Op::AddHl { rr } => write!(f, "ADD HL, {}", rr),
            Op::Inc16 { rr } => write!(f, "INC {}", rr),
            Op::Dec16 { rr } => write!(f, "DEC {}", rr),
            Op::AddSpE => write!(f, "ADD SP, {}", e8),
            Op::Rlca => write!(f, "RLCA"),
            Op::Rrca => write!(f, "RRCA"),
            Op::Rla => write!(f, "RLA"),
            Op::Rra => write!(f, "RRA"),
            Op::Shift { op, r } => write!(f, "{:?} {}", op, r),
            Op::Bit { bit, r } => write!(f, "BIT {}, {}", bit, r),
            Op::Res { bit, r } => write!(f, "RES {}, {}", bit, r),
            Op::Set { bit, r } => write!(f, "SET {}, {}", bit, r),
            Op::Jp => write!(f, "JP ${:04X}", n16),
            Op::JpCond(cc) => write!(f, "JP {}, ${:04X}", cc, n16),
            Op::JpHl => write!(f, "JP HL"),
            Op::Jr => write!(f, "JR {}", e8),
            Op::JrCond(cc) => write!(f, "JR {}, {}", cc, e8),
            Op::Call => write!(f, "CALL ${:04X}", n16),
            Op::CallCond(cc) => write!(f, "CALL {}, ${:04X}", cc, n16),
            Op::Rst(vector) => write!(f, "RST ${:02X}", vector),
            Op::Ret => write!(f, "RET"),
            Op::RetCond(cc) => write!(f, "RET {}", cc),
            Op::Reti => write!(f, "RETI"),
            Op::Nop => write!(f, "NOP"),
            Op::Halt => write!(f, "HALT"),
            Op::Stop => write!(f, "STOP"),
            Op::Di => write!(f, "DI"),
            Op::Ei => write!(f, "EI"),
            Op::Illegal(op) => write!(f, "ILLEGAL ${:02X}", op),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_extraction() {
        // LD B, A = 01 000 111
        let instr = Instruction::new(0x47);
        assert_eq!(instr.register_code(), REG_CODE_B);
        assert_eq!(instr.second_register_code(), REG_CODE_A);

        // PUSH HL = 11 10 0101
        assert_eq!(Instruction::new(0xE5).double_register_code(), 2);
    }

    #[test]
    fn test_fetch_reads_little_endian_immediate() {
        let bytes = [0x01, 0x34, 0x12, 0xFF];
        let mut iter = bytes.iter().copied();
        let instr = Instruction::fetch(|| iter.next().unwrap_or(0));

        assert_eq!(instr.op, Op::LdRrNn { rr: Reg16::BC });
        assert_eq!(instr.imm16(), 0x1234);
        assert_eq!(instr.encoded_len(), 3);
        // The trailing 0xFF was not consumed.
        assert_eq!(iter.next(), Some(0xFF));
    }

    #[test]
    fn test_fetch_prefixed() {
        let bytes = [0xCB, 0x7C];
        let mut iter = bytes.iter().copied();
        let instr = Instruction::fetch(|| iter.next().unwrap_or(0));

        assert!(instr.prefixed);
        assert_eq!(
            instr.op,
            Op::Bit {
                bit: 7,
                r: Target::Register8(Reg8::H)
            }
        );
        assert_eq!(instr.encoded_len(), 2);
    }

    #[test]
    fn test_display() {
        assert_eq!(Instruction::new(0x47).to_string(), "LD B, A");
        assert_eq!(Instruction::with_u16(0xC3, 0x0150).to_string(), "JP $0150");
        assert_eq!(Instruction::with_u8(0x20, 0xFE).to_string(), "JR NZ, -2");
        assert_eq!(Instruction::cb(0x46).to_string(), "BIT 0, (HL)");
    }
}
