use super::*;

/// The eight accumulator operations selected by bits 3-5 of 0x80-0xBF and of
/// the `op A, n8` column.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AluOp {
    Add,
    Adc,
    Sub,
    Sbc,
    And,
    Xor,
    Or,
    Cp,
}

impl AluOp {
    pub fn from_code(code: u8) -> Self {
        match code & 0b111 {
            0 => AluOp::Add,
            1 => AluOp::Adc,
            2 => AluOp::Sub,
            3 => AluOp::Sbc,
            4 => AluOp::And,
            5 => AluOp::Xor,
            6 => AluOp::Or,
            _ => AluOp::Cp,
        }
    }
}

/// Rotate/shift family of the CB table, bits 3-5 of 0x00-0x3F.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ShiftOp {
    Rlc,
    Rrc,
    Rl,
    Rr,
    Sla,
    Sra,
    Swap,
    Srl,
}

impl ShiftOp {
    pub fn from_code(code: u8) -> Self {
        match code & 0b111 {
            0 => ShiftOp::Rlc,
            1 => ShiftOp::Rrc,
            2 => ShiftOp::Rl,
            3 => ShiftOp::Rr,
            4 => ShiftOp::Sla,
            5 => ShiftOp::Sra,
            6 => ShiftOp::Swap,
            _ => ShiftOp::Srl,
        }
    }
}

/// Closed set of instruction classes, decoded once from the opcode bits.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Op {
    // 8-bit loads
    LdRR { dst: Target, src: Target },
    LdRN { dst: Target },
    LdAIndirect(Reg16),
    LdIndirectA(Reg16),
    LdAHlInc,
    LdAHlDec,
    LdHlIncA,
    LdHlDecA,
    LdANn,
    LdNnA,
    LdhAC,
    LdhCA,
    LdhAN,
    LdhNA,

    // 16-bit loads
    LdRrNn { rr: Reg16 },
    LdSpHl,
    LdHlSpE,
    LdNnSp,
    Push { qq: Reg16 },
    Pop { qq: Reg16 },

    // 8-bit arithmetic/logic
    Alu { op: AluOp, src: Target },
    AluImm { op: AluOp },
    Inc8 { r: Target },
    Dec8 { r: Target },
    Daa,
    Cpl,
    Scf,
    Ccf,

    // 16-bit arithmetic
    AddHl { rr: Reg16 },
    Inc16 { rr: Reg16 },
    Dec16 { rr: Reg16 },
    AddSpE,

    // Rotates and bit operations
    Rlca,
    Rrca,
    Rla,
    Rra,
    Shift { op: ShiftOp, r: Target },
    Bit { bit: u8, r: Target },
    Res { bit: u8, r: Target },
    Set { bit: u8, r: Target },

    // Control flow
    Jp,
    JpCond(Condition),
    JpHl,
    Jr,
    JrCond(Condition),
    Call,
    CallCond(Condition),
    Rst(u16),
    Ret,
    RetCond(Condition),
    Reti,

    // Misc/control
    Nop,
    Halt,
    Stop,
    Di,
    Ei,

    /// One of the eleven unused encodings. Locks the CPU.
    Illegal(u8),
}

impl Op {
    /// Decodes an unprefixed opcode.
    ///
    /// 0xCB is consumed by the fetcher and never reaches here in normal
    /// execution; on its own it decodes as illegal.
    pub fn decode(opcode: u8) -> Op {
        let r = Target::from_code(register_code(opcode));
        let r2 = Target::from_code(second_register_code(opcode));
        let rr = Reg16::from_double_code(double_register_code(opcode), true);
        let qq = Reg16::from_double_code(double_register_code(opcode), false);
        let cc = Condition::from_code(condition_code(opcode));

        match opcode {
            0x00 => Op::Nop,
            0x10 => Op::Stop,
            0x76 => Op::Halt,
            0xF3 => Op::Di,
            0xFB => Op::Ei,

            0x02 => Op::LdIndirectA(Reg16::BC),
            0x12 => Op::LdIndirectA(Reg16::DE),
            0x0A => Op::LdAIndirect(Reg16::BC),
            0x1A => Op::LdAIndirect(Reg16::DE),
            0x22 => Op::LdHlIncA,
            0x32 => Op::LdHlDecA,
            0x2A => Op::LdAHlInc,
            0x3A => Op::LdAHlDec,
            0xE0 => Op::LdhNA,
            0xF0 => Op::LdhAN,
            0xE2 => Op::LdhCA,
            0xF2 => Op::LdhAC,
            0xEA => Op::LdNnA,
            0xFA => Op::LdANn,

            0x08 => Op::LdNnSp,
            0xF8 => Op::LdHlSpE,
            0xF9 => Op::LdSpHl,
            0xE8 => Op::AddSpE,

            0x07 => Op::Rlca,
            0x0F => Op::Rrca,
            0x17 => Op::Rla,
            0x1F => Op::Rra,
            0x27 => Op::Daa,
            0x2F => Op::Cpl,
            0x37 => Op::Scf,
            0x3F => Op::Ccf,

            0x18 => Op::Jr,
            0xC3 => Op::Jp,
            0xE9 => Op::JpHl,
            0xCD => Op::Call,
            0xC9 => Op::Ret,
            0xD9 => Op::Reti,

            0x40..=0x7F => Op::LdRR { dst: r, src: r2 },
            0x80..=0xBF => Op::Alu {
                op: AluOp::from_code(register_code(opcode)),
                src: r2,
            },

            op if op & 0xC7 == 0x06 => Op::LdRN { dst: r },
            op if op & 0xC7 == 0x04 => Op::Inc8 { r },
            op if op & 0xC7 == 0x05 => Op::Dec8 { r },
            op if op & 0xCF == 0x01 => Op::LdRrNn { rr },
            op if op & 0xCF == 0x03 => Op::Inc16 { rr },
            op if op & 0xCF == 0x0B => Op::Dec16 { rr },
            op if op & 0xCF == 0x09 => Op::AddHl { rr },
            op if op & 0xCF == 0xC5 => Op::Push { qq },
            op if op & 0xCF == 0xC1 => Op::Pop { qq },
            op if op & 0xE7 == 0x20 => Op::JrCond(cc),
            op if op & 0xE7 == 0xC0 => Op::RetCond(cc),
            op if op & 0xE7 == 0xC2 => Op::JpCond(cc),
            op if op & 0xE7 == 0xC4 => Op::CallCond(cc),
            op if op & 0xC7 == 0xC6 => Op::AluImm {
                op: AluOp::from_code(register_code(op)),
            },
            op if op & 0xC7 == 0xC7 => Op::Rst((op & 0x38) as u16),

            // 0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD
            _ => Op::Illegal(opcode),
        }
    }

    /// Decodes the byte following a 0xCB prefix.
    pub fn decode_cb(opcode: u8) -> Op {
        let bit = register_code(opcode);
        let r = Target::from_code(second_register_code(opcode));
        match opcode >> 6 {
            0 => Op::Shift {
                op: ShiftOp::from_code(bit),
                r,
            },
            1 => Op::Bit { bit, r },
            2 => Op::Res { bit, r },
            _ => Op::Set { bit, r },
        }
    }

    /// Number of trailing immediate bytes.
    pub fn immediate_len(&self) -> u16 {
        match self {
            Op::LdRN { .. }
            | Op::AluImm { .. }
            | Op::LdhAN
            | Op::LdhNA
            | Op::Jr
            | Op::JrCond(_)
            | Op::LdHlSpE
            | Op::AddSpE
            | Op::Stop => 1,
            Op::LdANn
            | Op::LdNnA
            | Op::LdRrNn { .. }
            | Op::LdNnSp
            | Op::Jp
            | Op::JpCond(_)
            | Op::Call
            | Op::CallCond(_) => 2,
            _ => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ILLEGAL: [u8; 11] = [
        0xD3, 0xDB, 0xDD, 0xE3, 0xE4, 0xEB, 0xEC, 0xED, 0xF4, 0xFC, 0xFD,
    ];

    #[test]
    fn test_register_to_register_fields() {
        // LD B, A
        assert_eq!(
            Op::decode(0x47),
            Op::LdRR {
                dst: Target::Register8(Reg8::B),
                src: Target::Register8(Reg8::A)
            }
        );
        // LD (HL), B
        assert_eq!(
            Op::decode(0x70),
            Op::LdRR {
                dst: Target::AddrHL,
                src: Target::Register8(Reg8::B)
            }
        );
        // 0x76 sits where LD (HL),(HL) would be.
        assert_eq!(Op::decode(0x76), Op::Halt);
    }

    #[test]
    fn test_double_register_groups() {
        assert_eq!(Op::decode(0x31), Op::LdRrNn { rr: Reg16::SP });
        assert_eq!(Op::decode(0xF5), Op::Push { qq: Reg16::AF });
        assert_eq!(Op::decode(0xF1), Op::Pop { qq: Reg16::AF });
        assert_eq!(Op::decode(0x39), Op::AddHl { rr: Reg16::SP });
        assert_eq!(Op::decode(0x1B), Op::Dec16 { rr: Reg16::DE });
    }

    #[test]
    fn test_conditions_come_from_bits_3_and_4() {
        assert_eq!(Op::decode(0x20), Op::JrCond(Condition::NotZero));
        assert_eq!(Op::decode(0x28), Op::JrCond(Condition::Zero));
        assert_eq!(Op::decode(0xD2), Op::JpCond(Condition::NotCarry));
        assert_eq!(Op::decode(0xDC), Op::CallCond(Condition::Carry));
        assert_eq!(Op::decode(0xC8), Op::RetCond(Condition::Zero));
    }

    #[test]
    fn test_alu_and_rst_columns() {
        assert_eq!(
            Op::decode(0xAF),
            Op::Alu {
                op: AluOp::Xor,
                src: Target::Register8(Reg8::A)
            }
        );
        assert_eq!(Op::decode(0xFE), Op::AluImm { op: AluOp::Cp });
        assert_eq!(Op::decode(0xFF), Op::Rst(0x38));
        assert_eq!(Op::decode(0xC7), Op::Rst(0x00));
    }

    #[test]
    fn test_illegal_encodings_are_enumerated() {
        for opcode in ILLEGAL {
            assert_eq!(Op::decode(opcode), Op::Illegal(opcode));
        }
        let illegal_count = (0..=255u8)
            .filter(|&op| op != 0xCB)
            .filter(|&op| matches!(Op::decode(op), Op::Illegal(_)))
            .count();
        assert_eq!(illegal_count, ILLEGAL.len());
    }

    #[test]
    fn test_cb_table() {
        assert_eq!(
            Op::decode_cb(0x37),
            Op::Shift {
                op: ShiftOp::Swap,
                r: Target::Register8(Reg8::A)
            }
        );
        assert_eq!(
            Op::decode_cb(0x7E),
            Op::Bit {
                bit: 7,
                r: Target::AddrHL
            }
        );
        assert_eq!(
            Op::decode_cb(0x86),
            Op::Res {
                bit: 0,
                r: Target::AddrHL
            }
        );
        assert_eq!(
            Op::decode_cb(0xC1),
            Op::Set {
                bit: 0,
                r: Target::Register8(Reg8::C)
            }
        );
    }

    #[test]
    fn test_immediate_lengths() {
        assert_eq!(Op::decode(0x3E).immediate_len(), 1);
        assert_eq!(Op::decode(0x01).immediate_len(), 2);
        assert_eq!(Op::decode(0x10).immediate_len(), 1);
        assert_eq!(Op::decode(0x47).immediate_len(), 0);
    }
}
