/// Observer of every bus write. Sees the address and value only, so it can
/// neither veto nor alter the write.
pub trait WriteInterceptor {
    fn on_write(&mut self, addr: u16, val: u8);
}

impl<F: FnMut(u16, u8)> WriteInterceptor for F {
    fn on_write(&mut self, addr: u16, val: u8) {
        self(addr, val)
    }
}
