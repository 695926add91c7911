//! RISC-V Base Integer Opcodes.
//!
//! Defines the major opcodes (bits 6-0) of the forms tracked for coverage.

/// Store instructions (SB, SH, SW).
pub const OP_STORE: u32 = 0b0100011;

/// Register-Register arithmetic (ADD, SUB, SLL, etc.).
pub const OP_REG: u32 = 0b0110011;

/// Jump and Link (JAL).
pub const OP_JAL: u32 = 0b1101111;
