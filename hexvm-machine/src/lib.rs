//! Resident register machine driven by the hexvm control surface.
//!
//! The machine owns a fixed-size, byte-addressable state image: program memory,
//! a small register file, the program counter, status flags and a retired
//! instruction counter. Callers only ever see it through three operations:
//! [`Machine::load`], [`Machine::run`] and [`Machine::snapshot`].

mod error;
mod machine;
mod opcodes;

pub use crate::error::{Fault, MachineError, Result};
pub use crate::machine::{
    Machine, Status, Termination, CYCLES_OFFSET, FLAGS_OFFSET, MEMORY_SIZE, PC_OFFSET,
    REGISTERS_OFFSET, REGISTER_COUNT, STATE_SIZE,
};
pub use crate::opcodes::Opcode;
