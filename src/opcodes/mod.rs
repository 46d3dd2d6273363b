//! Instruction decoding: register codes, condition codes and the closed set
//! of instruction classes an opcode byte maps onto.

mod condition;
mod instruction;
mod op;
mod operand_value;
mod reg16;
mod reg8;
mod target;

pub use condition::Condition;
pub use instruction::*;
pub use op::{AluOp, Op, ShiftOp};
pub use operand_value::OperandValue;
pub use reg8::Reg8;
pub use reg16::Reg16;
pub use target::*;
