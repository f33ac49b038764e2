use hexvm_machine::Fault;
use tracing::debug;

use crate::controller::{Controller, Phase};
use crate::error::{ControlError, Result};
use crate::DUMP_LEN;

/// Whether uploading a program also runs it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoadMode {
    /// Load, execute, dump
    #[default]
    Fused,
    /// Load, dump; execution waits for an explicit execute command
    Split,
}

/// One control request, borrowing the request body for the duration of the
/// dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    LoadBinary(&'a [u8]),
    LoadHex(&'a [u8]),
    Execute,
    Dump,
}

impl Command<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            Command::LoadBinary(_) => "load_binary",
            Command::LoadHex(_) => "load_hex",
            Command::Execute => "execute",
            Command::Dump => "dump",
        }
    }
}

/// Successful dispatch result: always a dump of the state the command left
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub dump: String,
    pub phase: Phase,
    /// Set when this command ran the program and it stopped abnormally
    pub fault: Option<Fault>,
}

/// Maps commands onto the controller and renders every result as a dump
#[derive(Debug)]
pub struct Dispatcher {
    controller: Controller,
    mode: LoadMode,
    dump_capacity: usize,
}

impl Dispatcher {
    pub fn new(mode: LoadMode, dump_capacity: usize) -> Self {
        Dispatcher {
            controller: Controller::new(),
            mode,
            dump_capacity,
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    pub fn mode(&self) -> LoadMode {
        self.mode
    }

    pub fn dump_capacity(&self) -> usize {
        self.dump_capacity
    }

    /// Run one command to completion.
    ///
    /// The first failing step ends the command; the dump capacity is checked
    /// before anything else so a rejected command never mutates the machine.
    pub fn dispatch(&mut self, command: Command<'_>) -> Result<Reply> {
        debug!(command = command.name(), "dispatching");
        if DUMP_LEN > self.dump_capacity {
            return Err(ControlError::BufferTooSmall {
                required: DUMP_LEN,
                capacity: self.dump_capacity,
            });
        }

        let run = match command {
            Command::LoadBinary(program) => {
                self.controller.load_binary(program)?;
                self.mode == LoadMode::Fused
            }
            Command::LoadHex(text) => {
                self.controller.load_hex(text)?;
                self.mode == LoadMode::Fused
            }
            Command::Execute => true,
            Command::Dump => false,
        };

        let fault = if run {
            self.controller.execute().fault
        } else {
            None
        };

        Ok(Reply {
            dump: self.controller.dump_hex(self.dump_capacity)?,
            phase: self.controller.phase(),
            fault,
        })
    }
}
