pub mod alu;
mod instructions;
mod interrupts;
pub mod registers;
pub mod snapshot;

use std::fmt;

use log::{trace, warn};

use crate::constants::*;
use crate::mmu::Memory;
use crate::opcodes::*;

pub use alu::AluOutput;
pub use interrupts::Interrupt;
pub use registers::Registers;
pub use snapshot::{CpuSnapshot, StateMismatch};

/// T-cycles of one idle step while halted or locked.
const IDLE_CYCLES: u32 = 4;

#[derive(Debug, Clone, Default)]
pub struct Cpu {
    pub regs: Registers,

    // Internal state
    pub halted: bool,
    // Set by HALT with IME clear and an interrupt already pending: the next
    // opcode byte is fetched without advancing PC.
    pub halt_bug: bool,
    // An illegal opcode hangs the CPU until reset.
    pub locked: bool,
    // Internal state, use to track EI.
    // The interrupts are not enabled until the instruction after the EI instruction.
    pub ime_scheduled: u8,
}

impl Cpu {
    /// CPU as the bootrom leaves it, PC at the cartridge entry point.
    pub fn new() -> Self {
        Self::with_registers(Registers::post_boot())
    }

    pub fn with_registers(regs: Registers) -> Self {
        Self {
            regs,
            ..Self::default()
        }
    }

    /// Fetches, decodes and executes one instruction and returns its cost.
    pub fn step(&mut self, bus: &mut impl Memory) -> u32 {
        if self.locked {
            return IDLE_CYCLES;
        }

        if self.halted {
            if bus.pending_interrupts() == 0 {
                return IDLE_CYCLES;
            }
            self.halted = false;
        }

        let start = self.regs.pc;
        let repeat_first = std::mem::take(&mut self.halt_bug);
        let instruction = {
            let mut addr = start;
            let mut first = true;
            Instruction::fetch(|| {
                let byte = bus.read(addr);
                if !(first && repeat_first) {
                    addr = addr.wrapping_add(1);
                }
                first = false;
                byte
            })
        };

        if repeat_first {
            // One byte of the encoding came from the same address twice.
            self.regs.pc = start.wrapping_sub(1);
        }

        trace!("{:04X}: {}", start, instruction);
        let cycles = self.execute(&instruction, bus);

        if self.ime_scheduled > 0 {
            self.ime_scheduled -= 1;
            if self.ime_scheduled == 0 {
                self.regs.ime = true;
            }
        }

        cycles
    }

    /// Runs an already-fetched instruction with PC still pointing at it.
    /// PC is moved past the encoding before the handler runs, so jumps and
    /// calls see the address of the next instruction.
    pub fn execute(&mut self, instruction: &Instruction, bus: &mut impl Memory) -> u32 {
        self.regs.pc = self.regs.pc.wrapping_add(instruction.encoded_len());

        match instruction.op {
            Op::LdRR { dst, src } => self.ld_r_r(dst, src, bus),
            Op::LdRN { dst } => self.ld_r_n(dst, instruction.imm8(), bus),
            Op::LdAIndirect(rr) => self.ld_a_indirect(rr, bus),
            Op::LdIndirectA(rr) => self.ld_indirect_a(rr, bus),
            Op::LdAHlInc => self.ld_a_hl_step(bus, 1),
            Op::LdAHlDec => self.ld_a_hl_step(bus, -1),
            Op::LdHlIncA => self.ld_hl_step_a(bus, 1),
            Op::LdHlDecA => self.ld_hl_step_a(bus, -1),
            Op::LdANn => self.ld_a_nn(instruction.imm16(), bus),
            Op::LdNnA => self.ld_nn_a(instruction.imm16(), bus),
            Op::LdhAC => self.ldh_a_c(bus),
            Op::LdhCA => self.ldh_c_a(bus),
            Op::LdhAN => self.ldh_a_n(instruction.imm8(), bus),
            Op::LdhNA => self.ldh_n_a(instruction.imm8(), bus),

            Op::LdRrNn { rr } => self.ld_rr_nn(rr, instruction.imm16()),
            Op::LdSpHl => self.ld_sp_hl(),
            Op::LdHlSpE => self.ld_hl_sp_e(instruction.offset()),
            Op::LdNnSp => self.ld_nn_sp(instruction.imm16(), bus),
            Op::Push { qq } => self.push(qq, bus),
            Op::Pop { qq } => self.pop(qq, bus),

            Op::Alu { op, src } => self.alu_target(op, src, bus),
            Op::AluImm { op } => self.alu_imm(op, instruction.imm8()),
            Op::Inc8 { r } => self.inc8(r, bus),
            Op::Dec8 { r } => self.dec8(r, bus),
            Op::Daa => self.daa(),
            Op::Cpl => self.cpl(),
            Op::Scf => self.scf(),
            Op::Ccf => self.ccf(),

            Op::AddHl { rr } => self.add_hl(rr),
            Op::Inc16 { rr } => self.inc16(rr),
            Op::Dec16 { rr } => self.dec16(rr),
            Op::AddSpE => self.add_sp_e(instruction.offset()),

            Op::Rlca => self.rotate_a(ShiftOp::Rlc),
            Op::Rrca => self.rotate_a(ShiftOp::Rrc),
            Op::Rla => self.rotate_a(ShiftOp::Rl),
            Op::Rra => self.rotate_a(ShiftOp::Rr),
            Op::Shift { op, r } => self.shift(op, r, bus),
            Op::Bit { bit, r } => self.bit(bit, r, bus),
            Op::Res { bit, r } => self.res(bit, r, bus),
            Op::Set { bit, r } => self.set(bit, r, bus),

            Op::Jp => self.jp(instruction.imm16(), None),
            Op::JpCond(cc) => self.jp(instruction.imm16(), Some(cc)),
            Op::JpHl => self.jp_hl(),
            Op::Jr => self.jr(instruction.offset(), None),
            Op::JrCond(cc) => self.jr(instruction.offset(), Some(cc)),
            Op::Call => self.call(instruction.imm16(), None, bus),
            Op::CallCond(cc) => self.call(instruction.imm16(), Some(cc), bus),
            Op::Rst(vector) => self.rst(vector, bus),
            Op::Ret => self.ret(bus),
            Op::RetCond(cc) => self.ret_cond(cc, bus),
            Op::Reti => self.reti(bus),

            Op::Nop => 4,
            Op::Halt => self.halt(bus),
            Op::Stop => self.stop(),
            Op::Di => self.di(),
            Op::Ei => self.ei(),
            Op::Illegal(opcode) => {
                self.regs.pc = self.regs.pc.wrapping_sub(1);
                self.locked = true;
                warn!(
                    "Illegal opcode 0x{:02X} at 0x{:04X}, CPU locked",
                    opcode, self.regs.pc
                );
                IDLE_CYCLES
            }
        }
    }

    fn condition(&self, cc: Condition) -> bool {
        match cc {
            Condition::NotZero => !self.regs.get_flag(FLAG_Z),
            Condition::Zero => self.regs.get_flag(FLAG_Z),
            Condition::NotCarry => !self.regs.get_flag(FLAG_C),
            Condition::Carry => self.regs.get_flag(FLAG_C),
        }
    }

    fn read_target(&self, target: Target, bus: &impl Memory) -> u8 {
        match target {
            Target::Register8(reg) => self.regs.get_reg8(reg),
            Target::AddrHL => bus.read(self.regs.hl()),
            Target::None => OPEN_BUS,
        }
    }

    fn write_target(&mut self, target: Target, value: u8, bus: &mut impl Memory) {
        match target {
            Target::Register8(reg) => self.regs.set_reg8(reg, value),
            Target::AddrHL => bus.write(self.regs.hl(), value),
            Target::None => {}
        }
    }

    fn apply_alu_flags(&mut self, res: &AluOutput) {
        self.regs.set_z(res.z);
        self.regs.set_n(res.n);
        self.regs.set_h(res.h);
        self.regs.set_c(res.c);
    }

    /// Pushes a 16-bit value onto the stack, high byte first.
    pub fn push_u16(&mut self, bus: &mut impl Memory, value: u16) {
        let [high, low] = value.to_be_bytes();
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write(self.regs.sp, high);
        self.regs.sp = self.regs.sp.wrapping_sub(1);
        bus.write(self.regs.sp, low);
    }

    pub fn pop_u16(&mut self, bus: &impl Memory) -> u16 {
        let low = bus.read(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        let high = bus.read(self.regs.sp);
        self.regs.sp = self.regs.sp.wrapping_add(1);
        u16::from_le_bytes([low, high])
    }
}

impl fmt::Display for Cpu {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Format Flags: [ZNHC] (uppercase if set, dash if clear)
        let z = if self.regs.get_flag(FLAG_Z) { 'Z' } else { '-' };
        let n = if self.regs.get_flag(FLAG_N) { 'N' } else { '-' };
        let h = if self.regs.get_flag(FLAG_H) { 'H' } else { '-' };
        let c = if self.regs.get_flag(FLAG_C) { 'C' } else { '-' };

        write!(
            f,
            "A:{:02X} B:{:02X} C:{:02X} D:{:02X} E:{:02X} H:{:02X} L:{:02X} SP:{:04X} PC:{:04X} Flags:[{}{}{}{}]",
            self.regs.a,
            self.regs.b,
            self.regs.c,
            self.regs.d,
            self.regs.e,
            self.regs.h,
            self.regs.l,
            self.regs.sp,
            self.regs.pc,
            z,
            n,
            h,
            c
        )
    }
}
