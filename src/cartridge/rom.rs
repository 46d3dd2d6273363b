use log::trace;

use crate::cartridge::mbc_trait::Mbc;
use crate::constants::{EXTERNAL_RAM_END, EXTERNAL_RAM_START, OPEN_BUS};

/// Window a mapper-less cartridge can address.
const EXTERNAL_RAM_WINDOW: usize = 0x2000;

/// Cartridge without a mapper: a flat 32 KiB ROM and up to 8 KiB of RAM.
pub struct RomOnly {
    data: Vec<u8>,
    ram: Vec<u8>,
}

impl RomOnly {
    /// `ram_size` is what the header declares; anything past the 8 KiB
    /// window is unreachable without banking.
    pub fn new(content: Vec<u8>, ram_size: usize) -> Self {
        Self {
            data: content,
            ram: vec![0; ram_size.min(EXTERNAL_RAM_WINDOW)],
        }
    }
}

impl Mbc for RomOnly {
    fn read(&self, addr: u16) -> u8 {
        match addr {
            EXTERNAL_RAM_START..=EXTERNAL_RAM_END => self
                .ram
                .get((addr - EXTERNAL_RAM_START) as usize)
                .copied()
                .unwrap_or(OPEN_BUS),
            _ => self.data.get(addr as usize).copied().unwrap_or(OPEN_BUS),
        }
    }

    fn write(&mut self, addr: u16, val: u8) {
        match addr {
            EXTERNAL_RAM_START..=EXTERNAL_RAM_END => {
                if let Some(byte) = self.ram.get_mut((addr - EXTERNAL_RAM_START) as usize) {
                    *byte = val;
                }
            }
            _ => trace!("write [0x{:04X}] -> 0x{:02X} ignored, ROM", addr, val),
        }
    }
}
