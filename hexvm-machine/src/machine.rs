use bitflags::bitflags;

use crate::error::{Fault, MachineError, Result};
use crate::opcodes::Opcode;

/// Bytes of program memory; programs are installed at offset 0
pub const MEMORY_SIZE: usize = 256;
/// Number of 8-bit general purpose registers
pub const REGISTER_COUNT: usize = 8;

// State image layout, in snapshot order
pub const REGISTERS_OFFSET: usize = MEMORY_SIZE;
pub const PC_OFFSET: usize = REGISTERS_OFFSET + REGISTER_COUNT;
pub const FLAGS_OFFSET: usize = PC_OFFSET + 2;
pub const CYCLES_OFFSET: usize = FLAGS_OFFSET + 1;
/// Size in bytes of the full raw state returned by [`Machine::snapshot`]
pub const STATE_SIZE: usize = CYCLES_OFFSET + 4;

bitflags! {
    /// Status register bits, as they appear in the state image
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Status: u8 {
        const HALTED = 0b0000_0001;
        const FAULTED = 0b0000_0010;
    }
}

/// How the last call to [`Machine::run`] ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Termination {
    Halted,
    Faulted(Fault),
}

enum Step {
    Continue,
    Halt,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Machine {
    memory: [u8; MEMORY_SIZE],
    registers: [u8; REGISTER_COUNT],
    pc: u16,
    status: Status,
    // Retired instruction count, wraps on overflow
    cycles: u32,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    /// A machine whose entire state image is zero
    pub fn new() -> Self {
        Machine {
            memory: [0; MEMORY_SIZE],
            registers: [0; REGISTER_COUNT],
            pc: 0,
            status: Status::empty(),
            cycles: 0,
        }
    }

    /// Replace the whole state with `program` installed at address 0.
    ///
    /// Registers, flags, the cycle counter and any memory past the program are
    /// cleared, and the program counter returns to 0. Programs larger than
    /// [`MEMORY_SIZE`] are rejected before anything is touched.
    pub fn load(&mut self, program: &[u8]) -> Result<()> {
        if program.len() > MEMORY_SIZE {
            return Err(MachineError::ProgramTooLarge {
                len: program.len(),
                capacity: MEMORY_SIZE,
            });
        }
        *self = Machine::new();
        self.memory[..program.len()].copy_from_slice(program);
        Ok(())
    }

    /// Run from the current program counter until `HALT` or a fault.
    ///
    /// There is no step limit: a program that never halts never returns.
    pub fn run(&mut self) -> Termination {
        self.status.remove(Status::HALTED | Status::FAULTED);
        loop {
            match self.step() {
                Ok(Step::Continue) => {}
                Ok(Step::Halt) => {
                    self.status.insert(Status::HALTED);
                    return Termination::Halted;
                }
                Err(fault) => {
                    self.status.insert(Status::FAULTED);
                    return Termination::Faulted(fault);
                }
            }
        }
    }

    /// Serialize the raw state image.
    ///
    /// Layout: memory, registers, program counter (big endian u16), status
    /// flags, retired instruction count (big endian u32).
    pub fn snapshot(&self) -> [u8; STATE_SIZE] {
        let mut image = [0u8; STATE_SIZE];
        image[..MEMORY_SIZE].copy_from_slice(&self.memory);
        image[REGISTERS_OFFSET..PC_OFFSET].copy_from_slice(&self.registers);
        image[PC_OFFSET..FLAGS_OFFSET].copy_from_slice(&self.pc.to_be_bytes());
        image[FLAGS_OFFSET] = self.status.bits();
        image[CYCLES_OFFSET..STATE_SIZE].copy_from_slice(&self.cycles.to_be_bytes());
        image
    }

    pub fn memory(&self) -> &[u8; MEMORY_SIZE] {
        &self.memory
    }

    pub fn registers(&self) -> &[u8; REGISTER_COUNT] {
        &self.registers
    }

    pub fn pc(&self) -> u16 {
        self.pc
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn cycles(&self) -> u32 {
        self.cycles
    }

    fn step(&mut self) -> std::result::Result<Step, Fault> {
        let pc = self.pc;
        let at = pc as usize;
        if at >= MEMORY_SIZE {
            return Err(Fault::TruncatedInstruction { pc });
        }
        let byte = self.memory[at];
        let opcode = Opcode::from_byte(byte).ok_or(Fault::InvalidOpcode { opcode: byte, pc })?;
        if at + opcode.size() as usize > MEMORY_SIZE {
            return Err(Fault::TruncatedInstruction { pc });
        }
        let a = self.operand(0);
        let b = self.operand(1);
        let mut next = pc + opcode.size();

        match opcode {
            Opcode::HALT => {
                self.retire();
                return Ok(Step::Halt);
            }
            Opcode::NOP => {}
            Opcode::JUMP => next = a as u16,
            Opcode::JUMP_ZERO => {
                if self.registers[self.reg(a)?] == 0 {
                    next = b as u16;
                }
            }
            Opcode::JUMP_NOT_ZERO => {
                if self.registers[self.reg(a)?] != 0 {
                    next = b as u16;
                }
            }
            Opcode::LOAD_IMM => {
                let dst = self.reg(a)?;
                self.registers[dst] = b;
            }
            Opcode::MOVE => {
                let (dst, src) = (self.reg(a)?, self.reg(b)?);
                self.registers[dst] = self.registers[src];
            }
            Opcode::LOAD => {
                let dst = self.reg(a)?;
                self.registers[dst] = self.memory[b as usize];
            }
            Opcode::STORE => {
                let src = self.reg(a)?;
                self.memory[b as usize] = self.registers[src];
            }
            Opcode::ADD => self.binary(a, b, u8::wrapping_add)?,
            Opcode::SUB => self.binary(a, b, u8::wrapping_sub)?,
            Opcode::AND => self.binary(a, b, |x, y| x & y)?,
            Opcode::OR => self.binary(a, b, |x, y| x | y)?,
            Opcode::XOR => self.binary(a, b, |x, y| x ^ y)?,
            Opcode::INC => {
                let r = self.reg(a)?;
                self.registers[r] = self.registers[r].wrapping_add(1);
            }
            Opcode::DEC => {
                let r = self.reg(a)?;
                self.registers[r] = self.registers[r].wrapping_sub(1);
            }
        }

        self.retire();
        self.pc = next;
        Ok(Step::Continue)
    }

    fn retire(&mut self) {
        self.cycles = self.cycles.wrapping_add(1);
    }

    // Operand bytes are only read after the instruction was bounds checked;
    // reads past memory for shorter instructions yield 0 and are ignored.
    fn operand(&self, index: usize) -> u8 {
        self.memory
            .get(self.pc as usize + 1 + index)
            .copied()
            .unwrap_or(0)
    }

    fn reg(&self, register: u8) -> std::result::Result<usize, Fault> {
        if (register as usize) < REGISTER_COUNT {
            Ok(register as usize)
        } else {
            Err(Fault::InvalidRegister {
                register,
                pc: self.pc,
            })
        }
    }

    fn binary(&mut self, dst: u8, src: u8, op: fn(u8, u8) -> u8) -> std::result::Result<(), Fault> {
        let (dst, src) = (self.reg(dst)?, self.reg(src)?);
        self.registers[dst] = op(self.registers[dst], self.registers[src]);
        Ok(())
    }
}
