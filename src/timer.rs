use std::any::Any;

use log::trace;

use crate::constants::*;
use crate::mmu::MmioDevice;

/// DIV/TIMA/TMA/TAC driven by a 16-bit internal counter that advances every
/// T-cycle. TIMA increments on the falling edge of the counter bit selected
/// by TAC, gated by the enable bit.
#[derive(Debug, Default)]
pub struct Timer {
    pub internal_counter: u16, // Increments every T-cycle
    pub tima: u8,              // 0xFF05
    pub tma: u8,               // 0xFF06
    pub tac: u8,               // 0xFF07
    /// Overflow from a DIV or TAC write, reported on the next tick.
    overflow_latched: bool,
}

impl Timer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 0xFF04 is the top 8 bits of the internal counter.
    pub fn div(&self) -> u8 {
        (self.internal_counter >> 8) as u8
    }

    pub fn timer_enabled(&self) -> bool {
        // Bit 2 of TAC (0xFF07) enables/disables the TIMA counter
        (self.tac & 0b100) != 0
    }

    pub fn get_tac_bit(&self) -> u16 {
        // Maps TAC bits 0-1 to the specific bit in the 16-bit internal counter
        match self.tac & 0b11 {
            0b00 => 9, // 1024 cycles (4096 Hz)
            0b01 => 3, // 16 cycles   (262144 Hz)
            0b10 => 5, // 64 cycles   (65536 Hz)
            _ => 7,    // 256 cycles  (16384 Hz)
        }
    }

    /// AND of the enable bit and the watched counter bit.
    fn signal(&self) -> bool {
        self.timer_enabled() && (self.internal_counter >> self.get_tac_bit()) & 1 != 0
    }

    /// Returns true on overflow, after reloading TIMA from TMA.
    pub fn increment_tima(&mut self) -> bool {
        let (new_tima, overflow) = self.tima.overflowing_add(1);

        if overflow {
            trace!("TIMA overflow, reload 0x{:02X}", self.tma);
            self.tima = self.tma;
        } else {
            self.tima = new_tima;
        }

        overflow
    }

    /// Advances by `cycles` T-cycles. Returns true if TIMA overflowed.
    pub fn step(&mut self, cycles: u32) -> bool {
        let mut interrupt_requested = std::mem::take(&mut self.overflow_latched);

        for _ in 0..cycles {
            let old_signal = self.signal();
            self.internal_counter = self.internal_counter.wrapping_add(1);

            // Signal was High (1) and is now Low (0)
            if old_signal && !self.signal() && self.increment_tima() {
                interrupt_requested = true;
            }
        }
        interrupt_requested
    }

    /// Resetting the counter can itself produce a falling edge.
    pub fn write_div(&mut self) {
        let old_signal = self.signal();
        self.internal_counter = 0;
        if old_signal && self.increment_tima() {
            self.overflow_latched = true;
        }
    }

    /// Changing the rate or disabling can produce a falling edge too.
    pub fn write_tac(&mut self, new_val: u8) {
        let old_signal = self.signal();
        self.tac = new_val & 0b111;
        if old_signal && !self.signal() && self.increment_tima() {
            self.overflow_latched = true;
        }
    }
}

impl MmioDevice for Timer {
    fn name(&self) -> &'static str {
        "timer"
    }

    fn handles_address(&self, addr: u16) -> bool {
        (ADDR_TIMER_DIV..=ADDR_TIMER_TAC).contains(&addr)
    }

    fn read(&self, addr: u16) -> u8 {
        match addr {
            ADDR_TIMER_DIV => self.div(),
            ADDR_TIMER_TIMA => self.tima,
            ADDR_TIMER_TMA => self.tma,
            // Upper bits read back as 1
            _ => 0xF8 | self.tac,
        }
    }

    fn write(&mut self, addr: u16, val: u8) {
        match addr {
            ADDR_TIMER_DIV => self.write_div(),
            ADDR_TIMER_TIMA => self.tima = val,
            ADDR_TIMER_TMA => self.tma = val,
            _ => self.write_tac(val),
        }
    }

    fn tick(&mut self, cycles: u32) -> u8 {
        if self.step(cycles) { INT_TIMER } else { 0 }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::mmu::{Bus, Memory};

    #[test]
    fn test_timer_frequency_increment() {
        let mut timer = Timer::new();
        timer.tac = 0x05; // Speed 01: Every 16 T-cycles (Bit 3)

        timer.step(15);
        // internal_counter is 15 (0b01111). Bit 3 is 1.
        assert_eq!(timer.tima, 0);

        timer.step(1);
        // internal_counter is 16 (0b10000). Bit 3 falls.
        assert_eq!(timer.tima, 1, "TIMA failed to increment at 16 cycles");
    }

    #[test]
    fn test_div_is_counter_high_byte() {
        let mut timer = Timer::new();
        timer.step(0x1FF);
        assert_eq!(timer.read(ADDR_TIMER_DIV), 0x01);
        timer.write(ADDR_TIMER_DIV, 0x55);
        assert_eq!(timer.read(ADDR_TIMER_DIV), 0x00);
    }

    #[test]
    fn test_div_reset_falling_edge() {
        let mut timer = Timer::new();
        timer.tac = 0x05; // Speed: 16 cycles (Bit 3)

        // Internal counter is now 8 (0b1000). Bit 3 is HIGH.
        timer.step(8);
        assert_eq!(timer.tima, 0);

        timer.write(ADDR_TIMER_DIV, 0x00);
        assert_eq!(
            timer.tima, 1,
            "TIMA should have incremented due to DIV reset falling edge"
        );
    }

    #[test]
    fn test_tac_disable_falling_edge() {
        let mut timer = Timer::new();
        timer.write(ADDR_TIMER_TAC, 0x05);
        timer.step(8);
        timer.write(ADDR_TIMER_TAC, 0x00);
        assert_eq!(timer.tima, 1);
        assert_eq!(timer.read(ADDR_TIMER_TAC), 0xF8);
    }

    #[test]
    fn test_div_write_overflow_requests_interrupt() {
        let mut timer = Timer::new();
        timer.write(ADDR_TIMER_TAC, 0x05);
        timer.step(8);
        timer.tima = 0xFF;
        timer.tma = 0x10;

        timer.write(ADDR_TIMER_DIV, 0x00);
        assert_eq!(timer.tima, 0x10);
        assert_eq!(timer.tick(1), INT_TIMER);
        // Reported once.
        assert_eq!(timer.tick(1), 0);
    }

    #[test]
    fn test_tac_write_overflow_requests_interrupt() {
        let mut timer = Timer::new();
        timer.write(ADDR_TIMER_TAC, 0x05);
        timer.step(8);
        timer.tima = 0xFF;

        timer.write(ADDR_TIMER_TAC, 0x01);
        assert_eq!(timer.tima, 0x00);
        assert_eq!(timer.tick(0), INT_TIMER);
    }

    #[test]
    fn test_timer_overflow_reloads_tma() {
        let mut timer = Timer {
            internal_counter: 0,
            tima: 0xFE, // 254
            tma: 0xAA,  // 170
            tac: 0x05,  // Enabled, Clock 01 (16 cycles)
            ..Timer::default()
        };

        // 254 -> 255 -> reload takes two 16-cycle periods.
        assert_eq!(timer.tick(16), 0);
        assert_eq!(timer.tick(16), INT_TIMER);
        assert_eq!(timer.tima, 0xAA, "TIMA should have reloaded from TMA");
    }

    #[test]
    fn test_bus_timer_interrupt_integration() {
        let mut bus = Bus::new();
        bus.add_mmio_device(Timer::new());

        bus.write(0xFF06, 0xAA); // TMA = 170
        bus.write(0xFF07, 0x05); // TAC = Enabled, 16-cycle mode
        bus.write(0xFF05, 0xFE); // TIMA = 254
        bus.write(0xFF0F, 0x00);

        for _ in 0..32 {
            bus.tick_devices(1);
        }

        assert_eq!(bus.read(0xFF05), 0xAA, "TIMA should have reloaded from TMA");
        assert!(
            bus.read(0xFF0F) & INT_TIMER != 0,
            "Timer interrupt bit (2) should be set in IF register"
        );
    }
}
