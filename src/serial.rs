use std::cell::RefCell;
use std::io::Write;
use std::rc::Rc;

use log::{trace, warn};

use crate::constants::{ADDR_SERIAL_CONTROL, ADDR_SERIAL_DATA};
use crate::mmu::WriteInterceptor;

/// SC value that starts a transfer on the internal clock.
const TRANSFER_START: u8 = 0x81;

/// Shared view of the bytes sent over the link port.
#[derive(Debug, Clone, Default)]
pub struct SerialOutput(Rc<RefCell<Vec<u8>>>);

impl SerialOutput {
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.0.borrow()).into_owned()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// True once `needle` appears anywhere in the output.
    pub fn contains(&self, needle: &str) -> bool {
        let buffer = self.0.borrow();
        let needle = needle.as_bytes();
        !needle.is_empty() && buffer.windows(needle.len()).any(|window| window == needle)
    }

    fn push(&self, byte: u8) {
        self.0.borrow_mut().push(byte);
    }
}

/// Test ROMs print by writing a character to SB and then 0x81 to SC.
/// This observer captures those characters.
#[derive(Debug, Default)]
pub struct SerialInterceptor {
    data: u8,
    output: SerialOutput,
    echo: bool,
}

impl SerialInterceptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Also print every captured character to stdout.
    pub fn with_echo(mut self, echo: bool) -> Self {
        self.echo = echo;
        self
    }

    pub fn output(&self) -> SerialOutput {
        self.output.clone()
    }
}

impl WriteInterceptor for SerialInterceptor {
    fn on_write(&mut self, addr: u16, val: u8) {
        match addr {
            ADDR_SERIAL_DATA => self.data = val,
            ADDR_SERIAL_CONTROL if val == TRANSFER_START => {
                trace!("serial: '{}'", self.data as char);
                self.output.push(self.data);
                if self.echo {
                    let mut stdout = std::io::stdout();
                    if let Err(err) = stdout.write_all(&[self.data]).and_then(|_| stdout.flush()) {
                        warn!("serial echo failed: {}", err);
                    }
                }
            }
            _ => {}
        }
    }
}
