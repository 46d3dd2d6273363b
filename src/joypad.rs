use std::any::Any;

use log::debug;

use crate::constants::{ADDR_JOYPAD, INT_JOYPAD};
use crate::mmu::MmioDevice;

// P1 selection bits, active low
const SELECT_DIRECTIONS: u8 = 0x10;
const SELECT_BUTTONS: u8 = 0x20;
const SELECT_MASK: u8 = SELECT_DIRECTIONS | SELECT_BUTTONS;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Button {
    Right,
    Left,
    Up,
    Down,
    A,
    B,
    Select,
    Start,
}

impl Button {
    /// Bit inside its group's low nibble.
    fn bit(self) -> u8 {
        match self {
            Button::Right | Button::A => 0x01,
            Button::Left | Button::B => 0x02,
            Button::Up | Button::Select => 0x04,
            Button::Down | Button::Start => 0x08,
        }
    }

    fn is_direction(self) -> bool {
        matches!(
            self,
            Button::Right | Button::Left | Button::Up | Button::Down
        )
    }
}

/// The P1 register at 0xFF00. Nothing is pressed unless the host calls
/// `press`.
#[derive(Debug)]
pub struct Joypad {
    select: u8,
    // Pressed buttons, 1 = pressed
    directions: u8,
    buttons: u8,
    interrupt_pending: bool,
}

impl Default for Joypad {
    fn default() -> Self {
        Self::new()
    }
}

impl Joypad {
    pub fn new() -> Self {
        Self {
            select: SELECT_MASK,
            directions: 0,
            buttons: 0,
            interrupt_pending: false,
        }
    }

    pub fn press(&mut self, button: Button) {
        let group = self.group_mut(button);
        let newly_pressed = *group & button.bit() == 0;
        *group |= button.bit();
        if newly_pressed {
            debug!("Joypad {:?} pressed", button);
            self.interrupt_pending = true;
        }
    }

    pub fn release(&mut self, button: Button) {
        *self.group_mut(button) &= !button.bit();
    }

    fn group_mut(&mut self, button: Button) -> &mut u8 {
        if button.is_direction() {
            &mut self.directions
        } else {
            &mut self.buttons
        }
    }
}

impl MmioDevice for Joypad {
    fn name(&self) -> &'static str {
        "joypad"
    }

    fn handles_address(&self, addr: u16) -> bool {
        addr == ADDR_JOYPAD
    }

    fn read(&self, _addr: u16) -> u8 {
        let mut pressed = 0;
        if self.select & SELECT_DIRECTIONS == 0 {
            pressed |= self.directions;
        }
        if self.select & SELECT_BUTTONS == 0 {
            pressed |= self.buttons;
        }
        // Unused bits read as 1; a pressed button pulls its line low.
        0xC0 | self.select | (!pressed & 0x0F)
    }

    fn write(&mut self, _addr: u16, val: u8) {
        self.select = val & SELECT_MASK;
    }

    fn tick(&mut self, _cycles: u32) -> u8 {
        if std::mem::take(&mut self.interrupt_pending) {
            INT_JOYPAD
        } else {
            0
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nothing_pressed_reads_high() {
        let mut pad = Joypad::new();
        assert_eq!(pad.read(ADDR_JOYPAD), 0xFF);

        pad.write(ADDR_JOYPAD, 0x20); // select directions
        assert_eq!(pad.read(ADDR_JOYPAD), 0xEF);
    }

    #[test]
    fn test_pressed_button_visible_in_selected_group_only() {
        let mut pad = Joypad::new();
        pad.press(Button::Start);

        pad.write(ADDR_JOYPAD, 0x10); // select buttons
        assert_eq!(pad.read(ADDR_JOYPAD) & 0x0F, 0x07);

        pad.write(ADDR_JOYPAD, 0x20); // select directions
        assert_eq!(pad.read(ADDR_JOYPAD) & 0x0F, 0x0F);

        pad.release(Button::Start);
        pad.write(ADDR_JOYPAD, 0x10);
        assert_eq!(pad.read(ADDR_JOYPAD) & 0x0F, 0x0F);
    }

    #[test]
    fn test_press_requests_interrupt_once() {
        let mut pad = Joypad::new();
        pad.press(Button::A);
        pad.press(Button::A);
        assert_eq!(pad.tick(4), INT_JOYPAD);
        assert_eq!(pad.tick(4), 0);
    }
}
