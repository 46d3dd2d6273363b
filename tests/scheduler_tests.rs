mod common;

use clap::Parser;

use gameboy_core::args::Args;
use gameboy_core::constants::*;
use gameboy_core::joypad::{Button, Joypad};
use gameboy_core::mmu::Memory;
use gameboy_core::ppu::Ppu;
use gameboy_core::serial::SerialInterceptor;
use gameboy_core::session::{Session, SessionOutcome};
use gameboy_core::{GameBoy, StepControl, StepReport, run_session};

use crate::common::*;

/// A machine running `program` from 0x0100.
fn machine(program: &[u8]) -> GameBoy {
    boot(rom_image(program))
}

/// `machine` with `handler` copied to an interrupt vector.
fn machine_with_handler(program: &[u8], vector: u16, handler: &[u8]) -> GameBoy {
    let mut rom = rom_image(program);
    let start = vector as usize;
    rom[start..start + handler.len()].copy_from_slice(handler);
    boot(rom)
}

fn boot(rom: Vec<u8>) -> GameBoy {
    let mut gameboy = GameBoy::from_rom(rom).expect("valid image");
    gameboy.set_pacing(false);
    gameboy
}

/// Writes `value` to `0xFF00 + port` through A.
fn ldh(port: u8, value: u8) -> [u8; 4] {
    [LD_A_N, value, LDH_N_A, port]
}

fn enable_and_spin(ie: u8) -> Vec<u8> {
    let mut program = ldh(0xFF, ie).to_vec();
    program.extend_from_slice(&[EI, JR, 0xFE]);
    program
}

#[test]
fn test_vblank_handler_runs_every_frame() {
    // INC B; RETI
    let mut gameboy = machine_with_handler(&enable_and_spin(INT_VBLANK), ADDR_VEC_VBLANK, &[0x04, RETI]);

    gameboy.run_with(&mut |gb: &mut GameBoy, _: &StepReport| {
        if gb.cpu.regs.b >= 2 || gb.instructions() > 50_000 {
            StepControl::Stop
        } else {
            StepControl::Continue
        }
    });

    assert_eq!(gameboy.cpu.regs.b, 2);
    let ppu = gameboy.bus.device::<Ppu>().expect("ppu attached");
    assert_eq!(ppu.frames(), 2);
    assert_eq!(gameboy.bus.read_if() & INT_VBLANK, 0);
}

#[test]
fn test_timer_interrupt_reaches_handler() {
    let mut program = ldh(0x07, 0x05).to_vec(); // TAC: on, 16 cycles
    program.extend(enable_and_spin(INT_TIMER));
    // INC D; RETI
    let mut gameboy = machine_with_handler(&program, ADDR_VEC_TIMER, &[0x14, RETI]);

    // One overflow every 256 * 16 cycles.
    gameboy.run_instructions(1_000);
    assert!(gameboy.cpu.regs.d >= 2, "D = {}", gameboy.cpu.regs.d);
}

#[test]
fn test_joypad_press_interrupts() {
    // INC D; RETI
    let mut gameboy = machine_with_handler(&enable_and_spin(INT_JOYPAD), ADDR_VEC_JOYPAD, &[0x14, RETI]);

    gameboy.run_instructions(100);
    assert_eq!(gameboy.cpu.regs.d, 0);

    gameboy
        .bus
        .device_mut::<Joypad>()
        .expect("joypad attached")
        .press(Button::Start);
    gameboy.run_instructions(10);
    assert_eq!(gameboy.cpu.regs.d, 1);
}

#[test]
fn test_frame_boundary_reaches_devices() {
    let mut gameboy = machine(&[JR, 0xFE]);

    // 5852 * 12 = 70 224
    gameboy.run_instructions(5_851);
    assert_eq!(
        gameboy
            .bus
            .device::<Ppu>()
            .expect("ppu attached")
            .presented_frames(),
        0
    );

    let report = gameboy.step_report();
    assert!(report.frame_completed);
    assert_eq!(gameboy.frame_cycles(), 0);
    assert_eq!(gameboy.total_cycles(), CYCLES_PER_FRAME as u64);
    assert_eq!(
        gameboy
            .bus
            .device::<Ppu>()
            .expect("ppu attached")
            .presented_frames(),
        1
    );
}

fn serial_program(text: &[u8]) -> Vec<u8> {
    let mut program = Vec::new();
    for &byte in text {
        program.extend(ldh(0x01, byte));
        program.extend(ldh(0x02, 0x81));
    }
    program.extend_from_slice(&[JR, 0xFE]);
    program
}

#[test]
fn test_session_stops_on_passed() {
    let mut gameboy = machine(&serial_program(b"Passed"));
    let serial = SerialInterceptor::new();
    let output = serial.output();
    gameboy.add_interceptor(serial);

    let mut session = Session::new()
        .with_limit(Some(1_000_000))
        .stop_on_serial_verdict(output.clone());
    gameboy.run_with(&mut session);

    assert_eq!(session.outcome(), SessionOutcome::Passed);
    assert_eq!(output.text(), "Passed");
    // The verdict is checked at the first frame boundary.
    assert!(session.executed() < 10_000);
}

#[test]
fn test_session_reports_failure() {
    let mut gameboy = machine(&serial_program(b"Failed #3"));
    let serial = SerialInterceptor::new();
    let output = serial.output();
    gameboy.add_interceptor(serial);

    let mut session = Session::new()
        .with_limit(Some(1_000_000))
        .stop_on_serial_verdict(output);
    gameboy.run_with(&mut session);

    assert_eq!(session.outcome(), SessionOutcome::Failed);
}

#[test]
fn test_session_limit_without_verdict() {
    let mut gameboy = machine(&[JR, 0xFE]);
    let serial = SerialInterceptor::new();
    let output = serial.output();
    gameboy.add_interceptor(serial);

    let mut session = Session::new()
        .with_limit(Some(20_000))
        .stop_on_serial_verdict(output.clone());

    assert_eq!(gameboy.run_with(&mut session), 20_000);
    assert_eq!(session.outcome(), SessionOutcome::LimitReached);
    assert!(output.is_empty());
}

#[test]
fn test_binary_session_detects_serial_verdict() {
    let args = Args::try_parse_from([
        "gameboy_core",
        "--load-rom",
        "passed.gb",
        "--no-pacing",
        "--max-instructions",
        "1000000",
    ])
    .expect("valid flags");
    let mut gameboy = machine(&serial_program(b"Passed"));

    assert_eq!(run_session(&mut gameboy, &args), SessionOutcome::Passed);
    assert!(gameboy.instructions() < 1_000_000);
}

#[test]
fn test_bootrom_hands_over_to_cartridge() {
    // LD A, 1; LDH (0x50), A; then fall through NOPs up to 0x0100.
    let mut bootrom = vec![NOP; 0x100];
    bootrom[..4].copy_from_slice(&ldh(0x50, 0x01));
    let mut gameboy = machine(&[INC_A, JR, 0xFE]);
    gameboy.set_bootrom(bootrom).expect("bootrom fits");

    assert_eq!(gameboy.cpu.regs.pc, 0x0000);
    gameboy.run_instructions(2);
    assert!(!gameboy.bus.bootrom_mapped());

    // 0x0004..0x00FF are cartridge zeros now, then INC A at 0x0100.
    gameboy.run_instructions(0x100 - 4 + 1);
    assert_eq!(gameboy.cpu.regs.pc, 0x0101);
    assert_eq!(gameboy.cpu.regs.a, 0x02);
}
