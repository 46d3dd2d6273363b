/// Memory bank controller as seen from the bus.
///
/// Addresses are absolute: 0x0000-0x7FFF for ROM, 0xA000-0xBFFF for
/// external RAM.
pub trait Mbc {
    fn read(&self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, val: u8);
}
