//! Opcode definitions for the resident machine

/// Primary opcode enumeration (8 bits)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
#[allow(non_camel_case_types)] // Opcodes follow assembly naming convention
pub enum Opcode {
    // Control flow (0x00 - 0x0F)
    HALT = 0x00,
    NOP = 0x01,
    JUMP = 0x02,
    JUMP_ZERO = 0x03,
    JUMP_NOT_ZERO = 0x04,

    // Register operations (0x10 - 0x1F)
    LOAD_IMM = 0x10,
    MOVE = 0x11,

    // Memory operations (0x20 - 0x2F)
    LOAD = 0x20,
    STORE = 0x21,

    // Arithmetic and logic, wrapping (0x30 - 0x3F)
    ADD = 0x30,
    SUB = 0x31,
    INC = 0x32,
    DEC = 0x33,
    AND = 0x34,
    OR = 0x35,
    XOR = 0x36,
}

impl Opcode {
    /// Parse opcode from byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x00 => Some(Opcode::HALT),
            0x01 => Some(Opcode::NOP),
            0x02 => Some(Opcode::JUMP),
            0x03 => Some(Opcode::JUMP_ZERO),
            0x04 => Some(Opcode::JUMP_NOT_ZERO),

            0x10 => Some(Opcode::LOAD_IMM),
            0x11 => Some(Opcode::MOVE),

            0x20 => Some(Opcode::LOAD),
            0x21 => Some(Opcode::STORE),

            0x30 => Some(Opcode::ADD),
            0x31 => Some(Opcode::SUB),
            0x32 => Some(Opcode::INC),
            0x33 => Some(Opcode::DEC),
            0x34 => Some(Opcode::AND),
            0x35 => Some(Opcode::OR),
            0x36 => Some(Opcode::XOR),

            _ => None,
        }
    }

    /// Get the number of operand bytes following this opcode
    pub fn operand_count(&self) -> u8 {
        match self {
            Opcode::HALT | Opcode::NOP => 0,

            Opcode::JUMP | Opcode::INC | Opcode::DEC => 1,

            Opcode::JUMP_ZERO
            | Opcode::JUMP_NOT_ZERO
            | Opcode::LOAD_IMM
            | Opcode::MOVE
            | Opcode::LOAD
            | Opcode::STORE
            | Opcode::ADD
            | Opcode::SUB
            | Opcode::AND
            | Opcode::OR
            | Opcode::XOR => 2,
        }
    }

    /// Total encoded size in bytes, opcode included
    pub fn size(&self) -> u16 {
        1 + self.operand_count() as u16
    }
}

impl From<Opcode> for u8 {
    fn from(opcode: Opcode) -> u8 {
        opcode as u8
    }
}
