//! MIPS Primary Opcodes.
//!
//! Defines the op-code field (bits 31-26) values that select a tracked form.

/// SPECIAL: register-register ALU operations, selected further by `funct`.
pub const OP_SPECIAL: u32 = 0b000000;

/// Jump (J-type).
pub const OP_J: u32 = 0b000010;

/// Jump and link (J-type).
pub const OP_JAL: u32 = 0b000011;

/// Store byte.
pub const OP_SB: u32 = 0o50;

/// Store half-word.
pub const OP_SH: u32 = 0o51;

/// Store word.
pub const OP_SW: u32 = 0o53;
