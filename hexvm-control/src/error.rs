//! Error taxonomy for control requests

use hexvm_machine::MachineError;
use thiserror::Error;

/// Reasons a control request is rejected.
///
/// Every variant aborts the rest of the request before the machine is
/// touched; none of them is fatal to the process.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ControlError {
    #[error("Invalid hex encoding: {reason}")]
    InvalidEncoding { reason: String },

    #[error("Program of {len} bytes exceeds machine capacity of {capacity} bytes")]
    ProgramTooLarge { len: usize, capacity: usize },

    #[error("Dump needs {required} bytes but the buffer holds {capacity}")]
    BufferTooSmall { required: usize, capacity: usize },
}

impl From<MachineError> for ControlError {
    fn from(err: MachineError) -> Self {
        match err {
            MachineError::ProgramTooLarge { len, capacity } => {
                ControlError::ProgramTooLarge { len, capacity }
            }
        }
    }
}

impl From<hex::FromHexError> for ControlError {
    fn from(err: hex::FromHexError) -> Self {
        ControlError::InvalidEncoding {
            reason: err.to_string(),
        }
    }
}

/// Convenient Result type
pub type Result<T> = std::result::Result<T, ControlError>;
