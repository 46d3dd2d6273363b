use log::debug;

use crate::cpu::Cpu;
use crate::mmu::Memory;

impl Cpu {
    pub(crate) fn halt(&mut self, bus: &mut impl Memory) -> u32 {
        if !self.regs.ime && bus.pending_interrupts() != 0 {
            // Wakes immediately, but the next opcode byte is read twice.
            debug!("HALT bug at 0x{:04X}", self.regs.pc);
            self.halt_bug = true;
        } else {
            self.halted = true;
        }
        4
    }

    /// STOP (0x10 0x00) is treated as a HALT without the bug.
    pub(crate) fn stop(&mut self) -> u32 {
        self.halted = true;
        4
    }

    /// DI also cancels an EI that has not taken effect yet.
    pub(crate) fn di(&mut self) -> u32 {
        self.regs.ime = false;
        self.ime_scheduled = 0;
        4
    }

    /// IME turns on after the next instruction completes.
    pub(crate) fn ei(&mut self) -> u32 {
        if !self.regs.ime {
            self.ime_scheduled = 2;
        }
        4
    }
}
