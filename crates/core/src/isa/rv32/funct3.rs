//! RISC-V Base Integer Function Codes (funct3).

/// ADD / SUB.
pub const ADD_SUB: u32 = 0b000;
/// Shift Left Logical.
pub const SLL: u32 = 0b001;
/// Set Less Than.
pub const SLT: u32 = 0b010;
/// Set Less Than Unsigned.
pub const SLTU: u32 = 0b011;
/// Exclusive OR.
pub const XOR: u32 = 0b100;
/// Shift Right Logical / Arithmetic.
pub const SRL_SRA: u32 = 0b101;
/// Inclusive OR.
pub const OR: u32 = 0b110;
/// AND.
pub const AND: u32 = 0b111;

/// Store Byte.
pub const SB: u32 = 0b000;
/// Store Half-word.
pub const SH: u32 = 0b001;
/// Store Word.
pub const SW: u32 = 0b010;
