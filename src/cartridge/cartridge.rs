use log::{info, warn};

use crate::cartridge::header::HEADER_END;
use crate::cartridge::*;
use crate::error::EmulatorError;

/// Largest image a mapper-less cartridge can expose.
const ROM_ONLY_SIZE: usize = 0x8000;

pub struct Cartridge {
    pub headers: Headers,
    pub mbc: Box<dyn Mbc>,
}

impl Cartridge {
    pub fn new(content: Vec<u8>) -> Result<Self, EmulatorError> {
        if content.len() < HEADER_END {
            return Err(EmulatorError::RomTooSmall { len: content.len() });
        }

        let headers = Headers::new(&content);
        info!(
            "Cartridge '{}' type 0x{:02X}, {} ROM banks, {} KiB RAM, header valid: {}",
            headers.title.as_deref().unwrap_or(""),
            headers.cart_type,
            headers.rom_banks(),
            headers.ram_size() / 1024,
            headers.is_valid()
        );
        if content.len() != headers.rom_size() {
            warn!(
                "Image is {} bytes, header declares {}",
                content.len(),
                headers.rom_size()
            );
        }

        // Byte 0x0147 names the mapper. Single-bank images work the same
        // regardless of the mapper they declare.
        let ram_size = headers.ram_size();
        let mbc: Box<dyn Mbc> = match headers.cart_type {
            0x00 | 0x08 | 0x09 => Box::new(RomOnly::new(content, ram_size)),
            other if content.len() <= ROM_ONLY_SIZE => {
                warn!(
                    "Cartridge type 0x{:02X} mapped as ROM only ({} bytes)",
                    other,
                    content.len()
                );
                Box::new(RomOnly::new(content, ram_size))
            }
            other => return Err(EmulatorError::UnsupportedCartridge { cart_type: other }),
        };

        Ok(Cartridge { headers, mbc })
    }

    /// Wraps a custom mapper, for hosts that bring their own.
    pub fn with_mbc(headers: Headers, mbc: Box<dyn Mbc>) -> Self {
        Cartridge { headers, mbc }
    }

    pub fn read(&self, addr: u16) -> u8 {
        self.mbc.read(addr)
    }

    pub fn write(&mut self, addr: u16, val: u8) {
        self.mbc.write(addr, val)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_headerless_image() {
        let result = Cartridge::new(vec![0; 0x100]);
        assert!(matches!(
            result,
            Err(EmulatorError::RomTooSmall { len: 0x100 })
        ));
    }

    #[test]
    fn test_single_bank_mbc1_maps_as_rom_only() {
        let mut content = vec![0; ROM_ONLY_SIZE];
        content[0x0147] = 0x01;
        content[0x0200] = 0xAB;
        let cart = Cartridge::new(content).expect("single bank image");
        assert_eq!(cart.read(0x0200), 0xAB);
    }

    #[test]
    fn test_rejects_banked_image() {
        let mut content = vec![0; ROM_ONLY_SIZE * 2];
        content[0x0147] = 0x01;
        assert!(matches!(
            Cartridge::new(content),
            Err(EmulatorError::UnsupportedCartridge { cart_type: 0x01 })
        ));
    }

    #[test]
    fn test_ram_follows_header_size() {
        let mut content = vec![0; ROM_ONLY_SIZE];
        content[0x0147] = 0x08;
        content[0x0149] = 0x02;
        let mut cart = Cartridge::new(content).expect("rom+ram image");
        cart.write(0xBFFF, 0x5A);
        assert_eq!(cart.read(0xBFFF), 0x5A);

        // No RAM declared: nothing is backed.
        let mut cart = Cartridge::new(vec![0; ROM_ONLY_SIZE]).expect("rom only image");
        cart.write(0xA000, 0x5A);
        assert_eq!(cart.read(0xA000), 0xFF);
    }

    /// Answers every read with the high byte of the address.
    struct Mirror;

    impl Mbc for Mirror {
        fn read(&self, addr: u16) -> u8 {
            (addr >> 8) as u8
        }

        fn write(&mut self, _addr: u16, _val: u8) {}
    }

    #[test]
    fn test_custom_mapper_is_used() {
        let cart = Cartridge::with_mbc(Headers::default(), Box::new(Mirror));
        assert_eq!(cart.read(0x4000), 0x40);
        assert_eq!(cart.read(0xA123), 0xA1);
    }
}
