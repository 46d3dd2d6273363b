use std::time::Duration;

// Constants for flags
pub const FLAG_Z: u8 = 0b1000_0000;
pub const FLAG_N: u8 = 0b0100_0000;
pub const FLAG_H: u8 = 0b0010_0000;
pub const FLAG_C: u8 = 0b0001_0000;

pub const CB_PREFIX_OPCODE_BYTE: u8 = 0xCB;

pub const GAME_BOY_FILE_EXT: &str = "gb";

// Memory map boundaries.
pub const CARTRIDGE_ROM_START: u16 = 0x0000;
pub const CARTRIDGE_ROM_END: u16 = 0x7FFF;
pub const VIDEO_RAM_START: u16 = 0x8000;
pub const VIDEO_RAM_END: u16 = 0x9FFF;
pub const EXTERNAL_RAM_START: u16 = 0xA000;
pub const EXTERNAL_RAM_END: u16 = 0xBFFF;
pub const INTERNAL_RAM_START: u16 = 0xC000;
pub const INTERNAL_RAM_END: u16 = 0xDFFF;
pub const ECHO_RAM_START: u16 = 0xE000;
pub const ECHO_RAM_END: u16 = 0xFDFF;
pub const SPRITE_RAM_START: u16 = 0xFE00;
pub const SPRITE_RAM_END: u16 = 0xFE9F;
pub const UNUSABLE_START: u16 = 0xFEA0;
pub const UNUSABLE_END: u16 = 0xFEFF;
pub const IO_START: u16 = 0xFF00;
pub const IO_END: u16 = 0xFF7F;
pub const HIGH_RAM_START: u16 = 0xFF80;
pub const HIGH_RAM_END: u16 = 0xFFFE;

/// Distance between echo RAM and the work RAM it mirrors.
pub const ECHO_OFFSET: u16 = 0x2000;

/// Unmapped reads float high.
pub const OPEN_BUS: u8 = 0xFF;

// MMIO registers.
pub const ADDR_JOYPAD: u16 = 0xFF00;
pub const ADDR_SERIAL_DATA: u16 = 0xFF01;
pub const ADDR_SERIAL_CONTROL: u16 = 0xFF02;
pub const ADDR_TIMER_DIV: u16 = 0xFF04;
pub const ADDR_TIMER_TIMA: u16 = 0xFF05;
pub const ADDR_TIMER_TMA: u16 = 0xFF06;
pub const ADDR_TIMER_TAC: u16 = 0xFF07;
pub const IF_ADDR: u16 = 0xFF0F;
pub const ADDR_LCDC: u16 = 0xFF40;
pub const ADDR_STAT: u16 = 0xFF41;
pub const ADDR_SCY: u16 = 0xFF42;
pub const ADDR_SCX: u16 = 0xFF43;
pub const ADDR_LY: u16 = 0xFF44;
pub const ADDR_LYC: u16 = 0xFF45;
pub const ADDR_DMA: u16 = 0xFF46;
pub const ADDR_BGP: u16 = 0xFF47;
pub const ADDR_OBP0: u16 = 0xFF48;
pub const ADDR_OBP1: u16 = 0xFF49;
pub const ADDR_WY: u16 = 0xFF4A;
pub const ADDR_WX: u16 = 0xFF4B;
pub const ADDR_BOOTROM_DISABLE: u16 = 0xFF50;
pub const IE_ADDR: u16 = 0xFFFF;

// Interrupt sources, as bits of IF/IE.
pub const INT_VBLANK: u8 = 0b0000_0001;
pub const INT_LCD_STAT: u8 = 0b0000_0010;
pub const INT_TIMER: u8 = 0b0000_0100;
pub const INT_SERIAL: u8 = 0b0000_1000;
pub const INT_JOYPAD: u8 = 0b0001_0000;
pub const INT_MASK: u8 = 0b0001_1111;

pub const ADDR_VEC_VBLANK: u16 = 0x0040;
pub const ADDR_VEC_LCD_STAT: u16 = 0x0048;
pub const ADDR_VEC_TIMER: u16 = 0x0050;
pub const ADDR_VEC_SERIAL: u16 = 0x0058;
pub const ADDR_VEC_JOYPAD: u16 = 0x0060;

/// T-cycles spent pushing PC and jumping to a vector.
pub const INTERRUPT_SERVICE_CYCLES: u32 = 20;

/// Largest bootrom that fits the 0x0000-0x00FF overlay.
pub const BOOTROM_SIZE: usize = 0x100;

/// 154 lines of 456 dots.
pub const CYCLES_PER_FRAME: u32 = 70_224;
pub const FRAME_DURATION: Duration = Duration::from_nanos(16_742_706); // ~59.7 fps
