use std::time::Instant;

use log::{debug, info};

use crate::cartridge::Cartridge;
use crate::constants::*;
use crate::cpu::{Cpu, CpuSnapshot, Registers};
use crate::error::EmulatorError;
use crate::joypad::Joypad;
use crate::mmu::{Bus, MmioDevice, WriteInterceptor};
use crate::ppu::Ppu;
use crate::timer::Timer;

// LCDC and BGP as the DMG bootrom leaves them.
const POST_BOOT_LCDC: u8 = 0x91;
const POST_BOOT_BGP: u8 = 0xFC;

/// What happened during one scheduler iteration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StepReport {
    pub instruction_cycles: u32,
    pub interrupt_cycles: u32,
    /// The per-frame budget filled up during this iteration.
    pub frame_completed: bool,
}

impl StepReport {
    /// Everything the peripherals were ticked with.
    pub fn cycles(&self) -> u32 {
        self.instruction_cycles + self.interrupt_cycles
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepControl {
    Continue,
    Stop,
}

/// Hooks around each scheduler iteration. Both run between instructions,
/// where CPU and bus state is consistent and may be changed freely.
pub trait StepObserver {
    fn before_step(&mut self, _gameboy: &mut GameBoy) {}

    fn after_step(&mut self, gameboy: &mut GameBoy, report: &StepReport) -> StepControl;
}

impl<F: FnMut(&mut GameBoy, &StepReport) -> StepControl> StepObserver for F {
    fn after_step(&mut self, gameboy: &mut GameBoy, report: &StepReport) -> StepControl {
        self(gameboy, report)
    }
}

/// CPU, bus and the loop that drives them.
pub struct GameBoy {
    pub cpu: Cpu,
    pub bus: Bus,
    frame_cycles: u32,
    total_cycles: u64,
    instructions: u64,
    pacing: bool,
    last_frame_time: Instant,
}

impl Default for GameBoy {
    fn default() -> Self {
        Self::new()
    }
}

impl GameBoy {
    /// Post-boot CPU on an empty bus: no cartridge, no devices.
    pub fn new() -> Self {
        Self::with_parts(Cpu::new(), Bus::new())
    }

    pub fn with_parts(cpu: Cpu, bus: Bus) -> Self {
        Self {
            cpu,
            bus,
            frame_cycles: 0,
            total_cycles: 0,
            instructions: 0,
            pacing: false,
            last_frame_time: Instant::now(),
        }
    }

    /// A DMG with timer, video timing and joypad attached, `rom` inserted
    /// and the LCD registers in their post-boot state. Pacing is on.
    pub fn from_rom(rom: Vec<u8>) -> Result<Self, EmulatorError> {
        let mut gameboy = Self::new();
        gameboy.add_mmio_device(Joypad::new());
        gameboy.add_mmio_device(Timer::new());
        gameboy.add_mmio_device(Ppu::new());
        gameboy.bus.force_write_bytes(ADDR_LCDC, &[POST_BOOT_LCDC]);
        gameboy.bus.force_write_bytes(ADDR_BGP, &[POST_BOOT_BGP]);
        gameboy.insert_cartridge(Cartridge::new(rom)?);
        gameboy.set_pacing(true);
        Ok(gameboy)
    }

    pub fn insert_cartridge(&mut self, cartridge: Cartridge) {
        self.bus.insert_cartridge(cartridge);
    }

    pub fn cartridge(&self) -> Result<&Cartridge, EmulatorError> {
        self.bus.cartridge().ok_or(EmulatorError::MissingCartridge)
    }

    /// Maps a bootrom and restarts the CPU from 0x0000 with cleared
    /// registers, the way the hardware powers on.
    pub fn set_bootrom(&mut self, image: Vec<u8>) -> Result<(), EmulatorError> {
        self.bus.set_bootrom(image)?;
        self.cpu = Cpu::with_registers(Registers::zeroed());
        // The bootrom switches the LCD on by itself.
        self.bus.force_write_bytes(ADDR_LCDC, &[0x00]);
        Ok(())
    }

    pub fn add_mmio_device(&mut self, device: impl MmioDevice + 'static) {
        self.bus.add_mmio_device(device);
    }

    pub fn add_interceptor(&mut self, interceptor: impl WriteInterceptor + 'static) {
        self.bus.add_interceptor(interceptor);
    }

    /// Sleep at frame boundaries to hold ~59.7 frames per second.
    pub fn set_pacing(&mut self, pacing: bool) {
        self.pacing = pacing;
        self.last_frame_time = Instant::now();
    }

    pub fn total_cycles(&self) -> u64 {
        self.total_cycles
    }

    pub fn instructions(&self) -> u64 {
        self.instructions
    }

    /// Cycles accumulated towards the next frame boundary.
    pub fn frame_cycles(&self) -> u32 {
        self.frame_cycles
    }

    pub fn snapshot(&self) -> CpuSnapshot {
        CpuSnapshot::from_cpu(&self.cpu, &self.bus)
    }

    /// One iteration: dispatch, interrupts, peripheral tick, frame budget.
    /// Returns the cycles the peripherals were ticked with.
    pub fn step(&mut self) -> u32 {
        self.step_report().cycles()
    }

    pub fn step_report(&mut self) -> StepReport {
        let instruction_cycles = self.cpu.step(&mut self.bus);
        let interrupt_cycles = self.cpu.handle_interrupts(&mut self.bus);
        let cycles = instruction_cycles + interrupt_cycles;

        self.bus.tick_devices(cycles);

        self.instructions += 1;
        self.total_cycles += cycles as u64;
        self.frame_cycles += cycles;

        let frame_completed = self.frame_cycles >= CYCLES_PER_FRAME;
        if frame_completed {
            self.frame_cycles -= CYCLES_PER_FRAME;
            self.bus.end_frame();
            if self.pacing {
                self.pace();
            }
        }

        StepReport {
            instruction_cycles,
            interrupt_cycles,
            frame_completed,
        }
    }

    /// Runs `count` iterations and returns the cycles they took.
    pub fn run_instructions(&mut self, count: u64) -> u64 {
        let start = self.total_cycles;
        for _ in 0..count {
            self.step();
        }
        self.total_cycles - start
    }

    /// Runs until the process is stopped, like the hardware runs until
    /// powered off.
    pub fn run(&mut self) -> ! {
        info!("Starting emulation at PC 0x{:04X}", self.cpu.regs.pc);
        loop {
            self.step();
        }
    }

    /// Runs until `observer` asks to stop. Returns the iterations executed.
    pub fn run_with(&mut self, observer: &mut impl StepObserver) -> u64 {
        let mut executed = 0;
        loop {
            observer.before_step(self);
            let report = self.step_report();
            executed += 1;
            if observer.after_step(self, &report) == StepControl::Stop {
                debug!(
                    "Observer stopped the run after {} iterations at PC 0x{:04X}",
                    executed, self.cpu.regs.pc
                );
                return executed;
            }
        }
    }

    fn pace(&mut self) {
        let elapsed = self.last_frame_time.elapsed();
        if elapsed < FRAME_DURATION {
            std::thread::sleep(FRAME_DURATION - elapsed);
        }
        self.last_frame_time = Instant::now();
    }
}
