//! Instruction handlers, one file per architectural class.
//!
//! Every handler runs after PC has been moved past the encoding and returns
//! the instruction's cost in T-cycles.

mod alu16;
mod alu8;
mod bit;
mod control;
mod load16;
mod load8;
mod misc;
mod rotate;

/// Extra cost of touching (HL) instead of a register.
fn hl_penalty(target: crate::opcodes::Target, cycles: u32) -> u32 {
    if target.is_memory() { cycles } else { 0 }
}
