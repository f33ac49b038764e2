//! Error types for loading and running programs

use thiserror::Error;

/// Errors raised while installing a program image
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MachineError {
    #[error("Program of {len} bytes exceeds machine memory of {capacity} bytes")]
    ProgramTooLarge { len: usize, capacity: usize },
}

/// Abnormal termination reported by [`crate::Machine::run`]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    #[error("Invalid opcode {opcode:#04x} at {pc:#06x}")]
    InvalidOpcode { opcode: u8, pc: u16 },

    #[error("Invalid register r{register} at {pc:#06x}")]
    InvalidRegister { register: u8, pc: u16 },

    #[error("Instruction at {pc:#06x} runs past the end of memory")]
    TruncatedInstruction { pc: u16 },
}

impl Fault {
    /// Address of the instruction that faulted
    pub fn pc(&self) -> u16 {
        match *self {
            Fault::InvalidOpcode { pc, .. }
            | Fault::InvalidRegister { pc, .. }
            | Fault::TruncatedInstruction { pc } => pc,
        }
    }
}

/// Convenient Result type
pub type Result<T> = std::result::Result<T, MachineError>;
