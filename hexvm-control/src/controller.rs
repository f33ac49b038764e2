use std::fmt;

use hexvm_machine::{Fault, Machine, Termination};
use tracing::{debug, info, warn};

use crate::codec;
use crate::error::Result;

/// Lifecycle of the resident machine as seen through the control layer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    /// Nothing loaded since startup
    #[default]
    Empty,
    /// A program is installed and has not run since it was loaded
    Loaded,
    /// The machine ran to `HALT` or a fault
    Executed,
}

impl Phase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Phase::Empty => "empty",
            Phase::Loaded => "loaded",
            Phase::Executed => "executed",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one [`Controller::execute`] call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Execution {
    /// Instructions retired by this call
    pub retired: u32,
    /// Set when the machine stopped abnormally
    pub fault: Option<Fault>,
}

/// Sole owner of the resident machine.
///
/// Every operation takes the controller by reference; there is no other path
/// to the machine state.
#[derive(Debug, Default)]
pub struct Controller {
    machine: Machine,
    phase: Phase,
}

impl Controller {
    pub fn new() -> Self {
        Controller {
            machine: Machine::new(),
            phase: Phase::Empty,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    /// Install `program` as the new image, replacing all previous state.
    pub fn load_binary(&mut self, program: &[u8]) -> Result<()> {
        self.machine.load(program)?;
        self.phase = Phase::Loaded;
        info!(len = program.len(), "program loaded");
        Ok(())
    }

    /// Decode hex text and install the result. Malformed text leaves the
    /// machine untouched.
    pub fn load_hex(&mut self, text: &[u8]) -> Result<()> {
        let program = codec::decode_hex(text)?;
        self.load_binary(&program)
    }

    /// Run the installed program until it halts or faults. Blocks the caller
    /// for as long as the program runs.
    pub fn execute(&mut self) -> Execution {
        let started = self.machine.cycles();
        let termination = self.machine.run();
        let retired = self.machine.cycles().wrapping_sub(started);
        self.phase = Phase::Executed;

        let fault = match termination {
            Termination::Halted => {
                info!(retired, pc = self.machine.pc(), "program halted");
                None
            }
            Termination::Faulted(fault) => {
                warn!(retired, %fault, "program faulted");
                Some(fault)
            }
        };
        Execution { retired, fault }
    }

    /// Hex-encode the full raw state into text of at most `capacity` characters.
    pub fn dump_hex(&self, capacity: usize) -> Result<String> {
        let text = codec::encode_hex(&self.machine.snapshot(), capacity)?;
        debug!(len = text.len(), phase = %self.phase, "state dumped");
        Ok(text)
    }

    /// Hex-encode the full raw state into a caller-owned buffer, returning the
    /// number of bytes written.
    pub fn dump_hex_into(&self, out: &mut [u8]) -> Result<usize> {
        codec::encode_hex_into(&self.machine.snapshot(), out)
    }
}
