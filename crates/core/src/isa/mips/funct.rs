//! MIPS SPECIAL Function Codes.
//!
//! Function field (bits 5-0) values for the tracked register-register
//! operations. The table matches the decoder of the DUT under verification,
//! which places `sll` at `0x0F` rather than the architectural `0x00`.

/// ADD.
pub const ADD: u32 = 0b100000;
/// SUB.
pub const SUB: u32 = 0b100010;
/// SLL.
pub const SLL: u32 = 0b001111;
/// SLT.
pub const SLT: u32 = 0b101010;
/// SLTU.
pub const SLTU: u32 = 0b101011;
/// XOR.
pub const XOR: u32 = 0b100110;
/// SRL.
pub const SRL: u32 = 0b000010;
/// SRA.
pub const SRA: u32 = 0b000011;
/// OR.
pub const OR: u32 = 0b100101;
/// AND.
pub const AND: u32 = 0b100100;
