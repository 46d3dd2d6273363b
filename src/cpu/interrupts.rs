use log::debug;

use crate::constants::*;
use crate::cpu::Cpu;
use crate::mmu::Memory;

/// Interrupt sources, ordered by priority (lowest bit first).
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Interrupt {
    VBlank,
    LcdStat,
    Timer,
    Serial,
    Joypad,
}

impl Interrupt {
    /// Highest priority source in `pending`, if any.
    pub fn highest_priority(pending: u8) -> Option<Interrupt> {
        match pending & INT_MASK {
            0 => None,
            p if p & INT_VBLANK != 0 => Some(Interrupt::VBlank),
            p if p & INT_LCD_STAT != 0 => Some(Interrupt::LcdStat),
            p if p & INT_TIMER != 0 => Some(Interrupt::Timer),
            p if p & INT_SERIAL != 0 => Some(Interrupt::Serial),
            _ => Some(Interrupt::Joypad),
        }
    }

    pub fn bit(self) -> u8 {
        match self {
            Interrupt::VBlank => INT_VBLANK,
            Interrupt::LcdStat => INT_LCD_STAT,
            Interrupt::Timer => INT_TIMER,
            Interrupt::Serial => INT_SERIAL,
            Interrupt::Joypad => INT_JOYPAD,
        }
    }

    pub fn vector(self) -> u16 {
        match self {
            Interrupt::VBlank => ADDR_VEC_VBLANK,
            Interrupt::LcdStat => ADDR_VEC_LCD_STAT,
            Interrupt::Timer => ADDR_VEC_TIMER,
            Interrupt::Serial => ADDR_VEC_SERIAL,
            Interrupt::Joypad => ADDR_VEC_JOYPAD,
        }
    }
}

impl Cpu {
    /// Runs after every dispatched instruction.
    ///
    /// A pending, enabled source always ends HALT. With IME set the highest
    /// priority source is serviced: PC is pushed, its IF bit and IME are
    /// cleared and PC jumps to the vector. Returns the cycles spent, 0 when
    /// nothing was serviced.
    pub fn handle_interrupts(&mut self, bus: &mut impl Memory) -> u32 {
        if self.locked {
            return 0;
        }

        let pending = bus.pending_interrupts();
        let Some(source) = Interrupt::highest_priority(pending) else {
            return 0;
        };

        self.halted = false;
        if !self.regs.ime {
            return 0;
        }

        debug!(
            "Servicing {:?} interrupt, PC 0x{:04X} -> 0x{:04X}",
            source,
            self.regs.pc,
            source.vector()
        );

        let flags = bus.read_if();
        bus.write_if(flags & !source.bit());
        self.regs.ime = false;
        self.ime_scheduled = 0;

        // EI; HALT with a source already pending: the HALT bug never gets
        // its repeated fetch, and the return address is the HALT itself.
        let pc = if std::mem::take(&mut self.halt_bug) {
            self.regs.pc.wrapping_sub(1)
        } else {
            self.regs.pc
        };
        self.push_u16(bus, pc);
        self.regs.pc = source.vector();

        INTERRUPT_SERVICE_CYCLES
    }
}
