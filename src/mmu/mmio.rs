use std::any::Any;

/// A peripheral that owns one or more addresses in 0xFF00-0xFF7F.
///
/// The bus asks devices in registration order whether they claim an address;
/// the first claimant serves the access.
pub trait MmioDevice: Any {
    fn name(&self) -> &'static str;

    fn handles_address(&self, addr: u16) -> bool;

    fn read(&self, addr: u16) -> u8;

    fn write(&mut self, addr: u16, val: u8);

    /// Advances the device by `cycles` T-cycles.
    /// Returns the interrupt bits (IF layout) the device wants raised.
    fn tick(&mut self, cycles: u32) -> u8;

    /// Called by the scheduler once per emulated frame.
    fn end_frame(&mut self) {}

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;
}
