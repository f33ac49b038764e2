// Control layer between network requests and the resident machine.
// Structured into modules: codec, error, controller and dispatch.

pub mod codec;
mod controller;
mod dispatch;
mod error;

pub use crate::controller::{Controller, Execution, Phase};
pub use crate::dispatch::{Command, Dispatcher, LoadMode, Reply};
pub use crate::error::{ControlError, Result};

// Re-export the machine types that show up in replies
pub use hexvm_machine::{Fault, STATE_SIZE};

/// Hex characters needed to dump the full machine state
pub const DUMP_LEN: usize = 2 * STATE_SIZE;
