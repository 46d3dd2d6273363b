#![allow(dead_code)]

pub mod ring_logger;

pub use ring_logger::{dump_log, init_logger, log_lines};

use gameboy_core::cpu::{Cpu, Registers};
use gameboy_core::mmu::Bus;

pub const NOP: u8 = 0x00;
pub const LD_BC_NN: u8 = 0x01;
pub const INC_A: u8 = 0x3C;
pub const DEC_A: u8 = 0x3D;
pub const LD_A_N: u8 = 0x3E;
pub const LD_HL_NN: u8 = 0x21;
pub const LD_HL_INC_A: u8 = 0x22;
pub const LD_A_HL_DEC: u8 = 0x3A;
pub const HALT: u8 = 0x76;
pub const LD_B_A: u8 = 0x47;
pub const LD_HL_B: u8 = 0x70;
pub const ADD_A_B: u8 = 0x80;
pub const SUB_A_N: u8 = 0xD6;
pub const CP_A_N: u8 = 0xFE;
pub const RET_NZ: u8 = 0xC0;
pub const POP_BC: u8 = 0xC1;
pub const JP_NZ: u8 = 0xC2;
pub const JP: u8 = 0xC3;
pub const CALL_Z: u8 = 0xCC;
pub const CALL: u8 = 0xCD;
pub const PUSH_BC: u8 = 0xC5;
pub const RET: u8 = 0xC9;
pub const RETI: u8 = 0xD9;
pub const CB_PREFIX: u8 = 0xCB;
pub const JR: u8 = 0x18;
pub const JR_NZ: u8 = 0x20;
pub const LDH_N_A: u8 = 0xE0;
pub const LDH_A_N: u8 = 0xF0;
pub const LD_NN_A: u8 = 0xEA;
pub const LD_A_NN: u8 = 0xFA;
pub const DI: u8 = 0xF3;
pub const EI: u8 = 0xFB;

/// Where `bootstrap` places PC.
pub const PROGRAM_START: u16 = 0x0100;

/// A CPU with cleared registers at `PROGRAM_START` over an empty bus.
/// RUST_LOG does nothing here; install `init_logger` to see traces.
pub fn bootstrap() -> (Cpu, Bus) {
    let mut regs = Registers::zeroed();
    regs.pc = PROGRAM_START;
    regs.sp = 0xFFFE;
    (Cpu::with_registers(regs), Bus::new())
}

/// `bootstrap` with `program` already written at `PROGRAM_START`.
pub fn bootstrap_program(program: &[u8]) -> (Cpu, Bus) {
    let (cpu, mut bus) = bootstrap();
    bus.force_write_bytes(PROGRAM_START, program);
    (cpu, bus)
}

/// A 32 KiB ROM-only image with `program` at the entry point.
pub fn rom_image(program: &[u8]) -> Vec<u8> {
    let mut rom = vec![0u8; 0x8000];
    let entry = PROGRAM_START as usize;
    rom[entry..entry + program.len()].copy_from_slice(program);
    rom
}
