/*
Source: https://gbdev.io/pandocs/Memory_Map.html

Start	End	Description
0000	7FFF	Cartridge ROM (bootrom overlays 0000-00FF while mapped)
8000	9FFF	Video RAM
A000	BFFF	External RAM
C000	DFFF	Work RAM
E000	FDFF	Echo RAM (mirror of C000-DDFF)
FE00	FE9F	Object attribute memory (OAM)
FEA0	FEFF	Not Usable
FF00	FF7F	I/O Registers, routed to MMIO devices first
FF80	FFFE	High RAM (HRAM)
FFFF	FFFF	Interrupt Enable register (IE)

Every region has its own backing store so tests can inspect them separately.
*/

use std::any::Any;

use log::{debug, info, trace};

use crate::{
    cartridge::Cartridge,
    constants::*,
    error::EmulatorError,
    mmu::{interceptor::WriteInterceptor, memory_trait::Memory, mmio::MmioDevice},
};

const ROM_AREA_SIZE: usize = 0x8000;
const BANK_SIZE: usize = 0x2000;
const SPRITE_RAM_SIZE: usize = 0xA0;
const IO_SIZE: usize = 0x80;
const HIGH_RAM_SIZE: usize = 0x7F;
const DMA_LENGTH: u16 = 0xA0;

pub struct Bus {
    // Backing for 0x0000-0x7FFF while no cartridge is inserted.
    // Boxed so the 32 KiB array lives on the heap.
    cartridge_rom: Box<[u8; ROM_AREA_SIZE]>,
    video_ram: Box<[u8; BANK_SIZE]>,
    external_ram: Box<[u8; BANK_SIZE]>,
    internal_ram: Box<[u8; BANK_SIZE]>,
    sprite_ram: [u8; SPRITE_RAM_SIZE],
    io_ram: [u8; IO_SIZE],
    high_ram: [u8; HIGH_RAM_SIZE],
    interrupt_enable: u8,

    cartridge: Option<Cartridge>,
    bootrom: Option<Vec<u8>>,
    devices: Vec<Box<dyn MmioDevice>>,
    interceptors: Vec<Box<dyn WriteInterceptor>>,
}

impl Default for Bus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus {
    pub fn new() -> Self {
        Bus {
            cartridge_rom: Box::new([0; ROM_AREA_SIZE]),
            video_ram: Box::new([0; BANK_SIZE]),
            external_ram: Box::new([0; BANK_SIZE]),
            internal_ram: Box::new([0; BANK_SIZE]),
            sprite_ram: [0; SPRITE_RAM_SIZE],
            io_ram: [0; IO_SIZE],
            high_ram: [0; HIGH_RAM_SIZE],
            interrupt_enable: 0,
            cartridge: None,
            bootrom: None,
            devices: Vec::new(),
            interceptors: Vec::new(),
        }
    }

    /// Zeroes every backing store. Devices, interceptors, the cartridge and
    /// the bootrom stay attached.
    pub fn clear(&mut self) {
        self.cartridge_rom.fill(0);
        self.video_ram.fill(0);
        self.external_ram.fill(0);
        self.internal_ram.fill(0);
        self.sprite_ram.fill(0);
        self.io_ram.fill(0);
        self.high_ram.fill(0);
        self.interrupt_enable = 0;
    }

    pub fn insert_cartridge(&mut self, cartridge: Cartridge) {
        debug!(
            "Inserting cartridge '{}'",
            cartridge.headers.title.as_deref().unwrap_or("")
        );
        self.cartridge = Some(cartridge);
    }

    pub fn cartridge(&self) -> Option<&Cartridge> {
        self.cartridge.as_ref()
    }

    /// Maps `image` over 0x0000 until 0xFF50 is written.
    pub fn set_bootrom(&mut self, image: Vec<u8>) -> Result<(), EmulatorError> {
        if image.is_empty() {
            return Err(EmulatorError::EmptyBootrom);
        }
        if image.len() > BOOTROM_SIZE {
            return Err(EmulatorError::BootromTooLarge { len: image.len() });
        }
        debug!("Mapping {} byte bootrom", image.len());
        self.bootrom = Some(image);
        Ok(())
    }

    pub fn bootrom_mapped(&self) -> bool {
        self.bootrom.is_some()
    }

    /// Registers a device. Earlier registrations win on overlapping addresses.
    pub fn add_mmio_device(&mut self, device: impl MmioDevice + 'static) {
        debug!("Registering MMIO device '{}'", device.name());
        self.devices.push(Box::new(device));
    }

    pub fn add_interceptor(&mut self, interceptor: impl WriteInterceptor + 'static) {
        self.interceptors.push(Box::new(interceptor));
    }

    /// First registered device of type `T`.
    pub fn device<T: Any>(&self) -> Option<&T> {
        self.devices
            .iter()
            .find_map(|d| d.as_any().downcast_ref::<T>())
    }

    pub fn device_mut<T: Any>(&mut self) -> Option<&mut T> {
        self.devices
            .iter_mut()
            .find_map(|d| d.as_any_mut().downcast_mut::<T>())
    }

    /// Advances every device and raises what they request in IF.
    pub fn tick_devices(&mut self, cycles: u32) {
        let mut requested = 0;
        for device in self.devices.iter_mut() {
            requested |= device.tick(cycles);
        }

        if requested != 0 {
            trace!("tick_devices: interrupt request 0x{:02X}", requested);
            self.request_interrupt(requested);
        }
    }

    pub fn end_frame(&mut self) {
        for device in self.devices.iter_mut() {
            device.end_frame();
        }
    }

    /// ORs `bits` into IF without notifying interceptors.
    pub fn request_interrupt(&mut self, bits: u8) {
        let flags = self.read(IF_ADDR) | (bits & INT_MASK);
        self.write_io(IF_ADDR, flags);
    }

    /// Copies `bytes` to `addr` bypassing interceptors, for loading programs.
    pub fn force_write_bytes(&mut self, addr: u16, bytes: &[u8]) {
        for (i, &byte) in bytes.iter().enumerate() {
            self.store(addr.wrapping_add(i as u16), byte);
        }
    }

    pub fn cartridge_rom(&self) -> &[u8] {
        &self.cartridge_rom[..]
    }

    pub fn video_ram(&self) -> &[u8] {
        &self.video_ram[..]
    }

    pub fn external_ram(&self) -> &[u8] {
        &self.external_ram[..]
    }

    pub fn internal_ram(&self) -> &[u8] {
        &self.internal_ram[..]
    }

    pub fn sprite_ram(&self) -> &[u8] {
        &self.sprite_ram
    }

    pub fn io_ram(&self) -> &[u8] {
        &self.io_ram
    }

    pub fn high_ram(&self) -> &[u8] {
        &self.high_ram
    }

    pub fn interrupt_enable(&self) -> u8 {
        self.interrupt_enable
    }

    fn dma_transfer(&mut self, val: u8) {
        // The value written is the high byte of the source (e.g., 0xC0 -> 0xC000)
        let source_base = (val as u16) << 8;
        trace!("DMA from 0x{:04X}", source_base);

        for i in 0..DMA_LENGTH {
            let data = self.read(source_base.wrapping_add(i));
            self.sprite_ram[i as usize] = data;
        }
    }

    fn read_io(&self, addr: u16) -> u8 {
        match self.devices.iter().find(|d| d.handles_address(addr)) {
            Some(device) => device.read(addr),
            None => self.io_ram[(addr - IO_START) as usize],
        }
    }

    fn write_io(&mut self, addr: u16, val: u8) {
        match self.devices.iter_mut().find(|d| d.handles_address(addr)) {
            Some(device) => {
                trace!(
                    "write [0x{:04X}] -> 0x{:02X} ({})",
                    addr,
                    val,
                    device.name()
                );
                device.write(addr, val);
            }
            None => {
                trace!("write [0x{:04X}] -> 0x{:02X} (IO)", addr, val);
                self.io_ram[(addr - IO_START) as usize] = val;
            }
        }
    }

    /// Region routing shared by CPU writes and program loading.
    fn store(&mut self, addr: u16, val: u8) {
        match addr {
            CARTRIDGE_ROM_START..=CARTRIDGE_ROM_END => match self.cartridge.as_mut() {
                Some(cartridge) => cartridge.write(addr, val),
                None => {
                    trace!("write [0x{:04X}] -> 0x{:02X} (ROM)", addr, val);
                    self.cartridge_rom[addr as usize] = val;
                }
            },
            VIDEO_RAM_START..=VIDEO_RAM_END => {
                trace!("write [0x{:04X}] -> 0x{:02X} (VRAM)", addr, val);
                self.video_ram[(addr - VIDEO_RAM_START) as usize] = val;
            }
            EXTERNAL_RAM_START..=EXTERNAL_RAM_END => match self.cartridge.as_mut() {
                Some(cartridge) => cartridge.write(addr, val),
                None => {
                    trace!("write [0x{:04X}] -> 0x{:02X} (EXT RAM)", addr, val);
                    self.external_ram[(addr - EXTERNAL_RAM_START) as usize] = val;
                }
            },
            INTERNAL_RAM_START..=INTERNAL_RAM_END => {
                trace!("write [0x{:04X}] -> 0x{:02X} (WRAM)", addr, val);
                self.internal_ram[(addr - INTERNAL_RAM_START) as usize] = val;
            }
            ECHO_RAM_START..=ECHO_RAM_END => {
                trace!("write [0x{:04X}] -> 0x{:02X} (ECHO RAM)", addr, val);
                self.internal_ram[(addr - ECHO_OFFSET - INTERNAL_RAM_START) as usize] = val;
            }
            SPRITE_RAM_START..=SPRITE_RAM_END => {
                trace!("write [0x{:04X}] -> 0x{:02X} (OAM)", addr, val);
                self.sprite_ram[(addr - SPRITE_RAM_START) as usize] = val;
            }
            UNUSABLE_START..=UNUSABLE_END => {
                trace!("write [0x{:04X}] -> 0x{:02X} (IGNORED: unusable)", addr, val);
            }
            IO_START..=IO_END => {
                if addr == ADDR_BOOTROM_DISABLE && self.bootrom.take().is_some() {
                    info!("Bootrom unmapped");
                }
                if addr == ADDR_DMA {
                    self.dma_transfer(val);
                }
                self.write_io(addr, val);
            }
            HIGH_RAM_START..=HIGH_RAM_END => {
                trace!("write [0x{:04X}] -> 0x{:02X} (HRAM)", addr, val);
                self.high_ram[(addr - HIGH_RAM_START) as usize] = val;
            }
            IE_ADDR => {
                trace!("write [0x{:04X}] -> 0x{:02X} (IE)", addr, val);
                self.interrupt_enable = val;
            }
        }
    }
}

impl Memory for Bus {
    fn read(&self, addr: u16) -> u8 {
        match addr {
            CARTRIDGE_ROM_START..=CARTRIDGE_ROM_END => {
                if let Some(byte) = self
                    .bootrom
                    .as_ref()
                    .and_then(|boot| boot.get(addr as usize))
                {
                    return *byte;
                }
                match &self.cartridge {
                    Some(cartridge) => cartridge.read(addr),
                    None => self.cartridge_rom[addr as usize],
                }
            }
            VIDEO_RAM_START..=VIDEO_RAM_END => self.video_ram[(addr - VIDEO_RAM_START) as usize],
            EXTERNAL_RAM_START..=EXTERNAL_RAM_END => match &self.cartridge {
                Some(cartridge) => cartridge.read(addr),
                None => self.external_ram[(addr - EXTERNAL_RAM_START) as usize],
            },
            INTERNAL_RAM_START..=INTERNAL_RAM_END => {
                self.internal_ram[(addr - INTERNAL_RAM_START) as usize]
            }
            // Echo RAM: Subtract 0x2000 to redirect to WRAM
            ECHO_RAM_START..=ECHO_RAM_END => {
                self.internal_ram[(addr - ECHO_OFFSET - INTERNAL_RAM_START) as usize]
            }
            SPRITE_RAM_START..=SPRITE_RAM_END => {
                self.sprite_ram[(addr - SPRITE_RAM_START) as usize]
            }
            UNUSABLE_START..=UNUSABLE_END => OPEN_BUS,
            IO_START..=IO_END => self.read_io(addr),
            HIGH_RAM_START..=HIGH_RAM_END => self.high_ram[(addr - HIGH_RAM_START) as usize],
            IE_ADDR => self.interrupt_enable,
        }
    }

    fn write(&mut self, addr: u16, val: u8) {
        for interceptor in self.interceptors.iter_mut() {
            interceptor.on_write(addr, val);
        }
        self.store(addr, val);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    struct Latch {
        addr: u16,
        value: u8,
        ticks: u32,
    }

    impl MmioDevice for Latch {
        fn name(&self) -> &'static str {
            "latch"
        }
        fn handles_address(&self, addr: u16) -> bool {
            addr == self.addr
        }
        fn read(&self, _addr: u16) -> u8 {
            self.value
        }
        fn write(&mut self, _addr: u16, val: u8) {
            self.value = val;
        }
        fn tick(&mut self, cycles: u32) -> u8 {
            self.ticks += cycles;
            if self.ticks >= 8 { INT_SERIAL } else { 0 }
        }
        fn as_any(&self) -> &dyn Any {
            self
        }
        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }
    }

    #[test]
    fn test_echo_ram_mirrors_work_ram() {
        let mut bus = Bus::new();
        bus.write(0xE003, 0x5A);
        assert_eq!(bus.read(0xC003), 0x5A);
        assert_eq!(bus.internal_ram()[3], 0x5A);

        bus.write(0xDDFF, 0xA5);
        assert_eq!(bus.read(0xFDFF), 0xA5);
    }

    #[test]
    fn test_unusable_region_reads_open_bus() {
        let mut bus = Bus::new();
        bus.write(0xFEA0, 0x12);
        assert_eq!(bus.read(0xFEA0), 0xFF);
        assert_eq!(bus.read(0xFEFF), 0xFF);
    }

    #[test]
    fn test_device_claims_io_address() {
        let mut bus = Bus::new();
        bus.add_mmio_device(Latch {
            addr: 0xFF10,
            value: 0x77,
            ticks: 0,
        });

        assert_eq!(bus.read(0xFF10), 0x77);
        bus.write(0xFF10, 0x33);
        assert_eq!(bus.read(0xFF10), 0x33);
        // Backing store untouched.
        assert_eq!(bus.io_ram()[0x10], 0x00);
        assert_eq!(bus.device::<Latch>().map(|l| l.value), Some(0x33));
    }

    #[test]
    fn test_device_interrupts_land_in_if() {
        let mut bus = Bus::new();
        bus.add_mmio_device(Latch {
            addr: 0xFF10,
            value: 0,
            ticks: 0,
        });

        bus.tick_devices(4);
        assert_eq!(bus.read_if(), 0x00);
        bus.tick_devices(4);
        assert_eq!(bus.read_if(), INT_SERIAL);
    }

    #[test]
    fn test_dma_copies_into_sprite_ram() {
        let mut bus = Bus::new();
        for i in 0..0xA0u16 {
            bus.write(0xC000 + i, i as u8);
        }
        bus.write(ADDR_DMA, 0xC0);

        assert_eq!(bus.sprite_ram()[0], 0x00);
        assert_eq!(bus.sprite_ram()[0x9F], 0x9F);
        assert_eq!(bus.read(ADDR_DMA), 0xC0);
    }

    #[test]
    fn test_force_write_skips_interceptors() {
        use std::cell::Cell;
        use std::rc::Rc;

        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        let mut bus = Bus::new();
        bus.add_interceptor(move |_addr: u16, _val: u8| counter.set(counter.get() + 1));

        bus.force_write_bytes(0xC000, &[1, 2, 3]);
        assert_eq!(seen.get(), 0);
        bus.write(0xC000, 4);
        assert_eq!(seen.get(), 1);
    }
}
