use crate::opcodes::ShiftOp;

/// Represents an Arithmic operation, and it's result
/// The purpose is to make the underlying operations pure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AluOutput {
    pub value: u8,
    pub z: bool,
    pub n: bool,
    pub h: bool,
    pub c: bool,
}

impl AluOutput {
    fn logic(value: u8, h: bool) -> Self {
        AluOutput {
            value,
            z: value == 0,
            n: false,
            h,
            c: false,
        }
    }

    pub fn alu_8bit_add(a: u8, b: u8, carry: bool) -> Self {
        let c_in = carry as u8;

        let res = (a as u16) + (b as u16) + (c_in as u16);
        let res_u8 = res as u8;

        // Half-Carry: Carry out of bit 3 into bit 4
        let h_bit = (a & 0x0F) + (b & 0x0F) + c_in > 0x0F;

        AluOutput {
            value: res_u8,
            z: res_u8 == 0,
            n: false,
            h: h_bit,
            c: res > 0xFF,
        }
    }

    pub fn alu_8bit_sub(a: u8, b: u8, carry: bool) -> Self {
        let c_in = carry as u8;

        let res = (a as i16) - (b as i16) - (c_in as i16);
        let res_u8 = res as u8;

        // Half-Borrow: lower nibble of 'a' smaller than lower nibble of 'b' + c_in
        let h_bit = (a & 0x0F) < (b & 0x0F) + c_in;

        // Borrow out of bit 8
        let c_bit = (a as u16) < (b as u16) + (c_in as u16);

        AluOutput {
            value: res_u8,
            z: res_u8 == 0,
            n: true,
            h: h_bit,
            c: c_bit,
        }
    }

    pub fn alu_and(a: u8, b: u8) -> Self {
        Self::logic(a & b, true)
    }

    pub fn alu_or(a: u8, b: u8) -> Self {
        Self::logic(a | b, false)
    }

    pub fn alu_xor(a: u8, b: u8) -> Self {
        Self::logic(a ^ b, false)
    }

    /// `c` is meaningless here, INC leaves the carry flag alone.
    pub fn alu_8bit_inc(value: u8) -> Self {
        let res = value.wrapping_add(1);
        AluOutput {
            value: res,
            z: res == 0,
            n: false,
            h: (value & 0x0F) == 0x0F,
            c: false,
        }
    }

    /// `c` is meaningless here, DEC leaves the carry flag alone.
    pub fn alu_8bit_dec(value: u8) -> Self {
        let res = value.wrapping_sub(1);
        AluOutput {
            value: res,
            z: res == 0,
            n: true,
            // Borrow from bit 4: the lower nibble was 0x0 before the decrement
            h: (value & 0x0F) == 0,
            c: false,
        }
    }

    /// Decimal adjust after an addition or subtraction.
    /// `n`, `h` and `c` are the flags left by that operation; `n` is preserved.
    pub fn alu_daa(a: u8, n: bool, h: bool, c: bool) -> Self {
        let mut correction = 0u8;
        let mut carry = c;

        if h || (!n && (a & 0x0F) > 0x09) {
            correction |= 0x06;
        }
        if c || (!n && a > 0x99) {
            correction |= 0x60;
            carry = true;
        }

        let value = if n {
            a.wrapping_sub(correction)
        } else {
            a.wrapping_add(correction)
        };

        AluOutput {
            value,
            z: value == 0,
            n,
            h: false,
            c: carry,
        }
    }

    /// CB rotates/shifts and SWAP. `carry` is the incoming C flag for RL/RR.
    pub fn alu_shift(op: ShiftOp, value: u8, carry: bool) -> Self {
        let (res, c) = match op {
            ShiftOp::Rlc => (value.rotate_left(1), value & 0x80 != 0),
            ShiftOp::Rrc => (value.rotate_right(1), value & 0x01 != 0),
            ShiftOp::Rl => ((value << 1) | carry as u8, value & 0x80 != 0),
            ShiftOp::Rr => ((value >> 1) | ((carry as u8) << 7), value & 0x01 != 0),
            ShiftOp::Sla => (value << 1, value & 0x80 != 0),
            ShiftOp::Sra => ((value >> 1) | (value & 0x80), value & 0x01 != 0),
            ShiftOp::Swap => (value.rotate_left(4), false),
            ShiftOp::Srl => (value >> 1, value & 0x01 != 0),
        };

        AluOutput {
            value: res,
            z: res == 0,
            n: false,
            h: false,
            c,
        }
    }
}

/// 16-bit `ADD HL, rr`: carry out of bit 11 and bit 15.
pub fn add_16bit(a: u16, b: u16) -> (u16, bool, bool) {
    let res = a.wrapping_add(b);
    let h = (a & 0x0FFF) + (b & 0x0FFF) > 0x0FFF;
    let c = (a as u32) + (b as u32) > 0xFFFF;
    (res, h, c)
}

/// `SP + e` as used by `ADD SP, e` and `LD HL, SP+e`.
/// Flags come from the unsigned low-byte addition, not the 16-bit one.
pub fn add_sp_offset(sp: u16, offset: i8) -> (u16, bool, bool) {
    let e = offset as i16 as u16;
    let res = sp.wrapping_add(e);
    let h = (sp & 0x000F) + (e & 0x000F) > 0x000F;
    let c = (sp & 0x00FF) + (e & 0x00FF) > 0x00FF;
    (res, h, c)
}
