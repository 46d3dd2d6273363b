//! Video timing. No pixels are produced; the unit only walks the
//! scanline/mode state machine so software polling LY or STAT, and code
//! waiting on the V-Blank and STAT interrupts, sees real hardware timing.

use std::any::Any;

use log::{debug, trace};

use crate::constants::*;
use crate::mmu::MmioDevice;

pub const DOTS_PER_LINE: u32 = 456;
pub const LINES_PER_FRAME: u8 = 154;
pub const VISIBLE_LINES: u8 = 144;

const OAM_SCAN_DOTS: u32 = 80;
const DRAWING_DOTS: u32 = 172;

const LCDC_ENABLE: u8 = 0x80;

// STAT bits
const STAT_COINCIDENCE: u8 = 0x04;
const STAT_HBLANK_SOURCE: u8 = 0x08;
const STAT_VBLANK_SOURCE: u8 = 0x10;
const STAT_OAM_SOURCE: u8 = 0x20;
const STAT_LYC_SOURCE: u8 = 0x40;
const STAT_WRITABLE: u8 = 0x78;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    HBlank = 0,
    VBlank = 1,
    OamScan = 2,
    Drawing = 3,
}

#[derive(Debug)]
pub struct Ppu {
    pub lcdc: u8,
    stat: u8, // Only the interrupt source bits, mode and coincidence are derived
    pub scy: u8,
    pub scx: u8,
    ly: u8, // Current Scanline (0xFF44)
    pub lyc: u8,
    pub bgp: u8,
    pub obp0: u8,
    pub obp1: u8,
    pub wy: u8,
    pub wx: u8,

    dot: u32, // Progress within the current line
    mode: Mode,
    // STAT interrupts fire on the rising edge of the OR of all enabled sources.
    stat_line: bool,
    frames: u64,
    presented: u64,
}

impl Default for Ppu {
    fn default() -> Self {
        Self::new()
    }
}

impl Ppu {
    pub fn new() -> Self {
        Self {
            lcdc: 0,
            stat: 0,
            scy: 0,
            scx: 0,
            ly: 0,
            lyc: 0,
            bgp: 0,
            obp0: 0,
            obp1: 0,
            wy: 0,
            wx: 0,
            dot: 0,
            mode: Mode::HBlank,
            stat_line: false,
            frames: 0,
            presented: 0,
        }
    }

    pub fn lcd_enabled(&self) -> bool {
        // Bit 7 controls the LCD power
        (self.lcdc & LCDC_ENABLE) != 0
    }

    pub fn ly(&self) -> u8 {
        self.ly
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Frames that reached V-Blank since power on.
    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Frame boundaries signalled by the scheduler.
    pub fn presented_frames(&self) -> u64 {
        self.presented
    }

    fn stat_value(&self) -> u8 {
        let coincidence = if self.ly == self.lyc {
            STAT_COINCIDENCE
        } else {
            0
        };
        0x80 | (self.stat & STAT_WRITABLE) | coincidence | self.mode as u8
    }

    fn mode_for_position(&self) -> Mode {
        if self.ly >= VISIBLE_LINES {
            Mode::VBlank
        } else if self.dot < OAM_SCAN_DOTS {
            Mode::OamScan
        } else if self.dot < OAM_SCAN_DOTS + DRAWING_DOTS {
            Mode::Drawing
        } else {
            Mode::HBlank
        }
    }

    /// Recomputes the STAT line and returns INT_LCD_STAT on a rising edge.
    fn update_stat_line(&mut self) -> u8 {
        let line = match self.mode {
            Mode::HBlank => self.stat & STAT_HBLANK_SOURCE != 0,
            Mode::VBlank => self.stat & STAT_VBLANK_SOURCE != 0,
            Mode::OamScan => self.stat & STAT_OAM_SOURCE != 0,
            Mode::Drawing => false,
        } || (self.ly == self.lyc && self.stat & STAT_LYC_SOURCE != 0);

        let rising = line && !self.stat_line;
        self.stat_line = line;
        if rising { INT_LCD_STAT } else { 0 }
    }

    fn step_dot(&mut self) -> u8 {
        let mut requested = 0;

        self.dot += 1;
        if self.dot == DOTS_PER_LINE {
            self.dot = 0;
            self.ly += 1;
            if self.ly == LINES_PER_FRAME {
                self.ly = 0;
            }
            if self.ly == VISIBLE_LINES {
                self.frames += 1;
                trace!("V-Blank, frame {}", self.frames);
                requested |= INT_VBLANK;
            }
        }

        self.mode = self.mode_for_position();
        requested | self.update_stat_line()
    }

    fn write_lcdc(&mut self, val: u8) {
        let was_enabled = self.lcd_enabled();
        self.lcdc = val;

        if was_enabled && !self.lcd_enabled() {
            debug!("LCD off");
            self.ly = 0;
            self.dot = 0;
            self.mode = Mode::HBlank;
            self.stat_line = false;
        } else if !was_enabled && self.lcd_enabled() {
            debug!("LCD on");
            self.mode = self.mode_for_position();
        }
    }
}

impl MmioDevice for Ppu {
    fn name(&self) -> &'static str {
        "ppu"
    }

    fn handles_address(&self, addr: u16) -> bool {
        (ADDR_LCDC..=ADDR_WX).contains(&addr) && addr != ADDR_DMA
    }

    fn read(&self, addr: u16) -> u8 {
        match addr {
            ADDR_LCDC => self.lcdc,
            ADDR_STAT => self.stat_value(),
            ADDR_SCY => self.scy,
            ADDR_SCX => self.scx,
            ADDR_LY => self.ly,
            ADDR_LYC => self.lyc,
            ADDR_BGP => self.bgp,
            ADDR_OBP0 => self.obp0,
            ADDR_OBP1 => self.obp1,
            ADDR_WY => self.wy,
            ADDR_WX => self.wx,
            _ => OPEN_BUS,
        }
    }

    fn write(&mut self, addr: u16, val: u8) {
        match addr {
            ADDR_LCDC => self.write_lcdc(val),
            ADDR_STAT => self.stat = val & STAT_WRITABLE,
            ADDR_SCY => self.scy = val,
            ADDR_SCX => self.scx = val,
            ADDR_LY => trace!("write to LY ignored"),
            ADDR_LYC => self.lyc = val,
            ADDR_BGP => self.bgp = val,
            ADDR_OBP0 => self.obp0 = val,
            ADDR_OBP1 => self.obp1 = val,
            ADDR_WY => self.wy = val,
            ADDR_WX => self.wx = val,
            _ => {}
        }
    }

    fn tick(&mut self, cycles: u32) -> u8 {
        if !self.lcd_enabled() {
            return 0;
        }

        let mut requested = 0;
        for _ in 0..cycles {
            requested |= self.step_dot();
        }
        requested
    }

    fn end_frame(&mut self) {
        self.presented += 1;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}
