//! Instruction Decoder.
//!
//! Turns a raw instruction word and the PC it was fetched from into a
//! [`TypedInstruction`]. Decoding is pure: the same word and PC always yield
//! the same result, and no state is kept between calls.
//!
//! Three outcomes are distinguished:
//!
//! 1. **Decoded:** the op-code belongs to a tracked form and the function
//!    field names a supported mnemonic.
//! 2. **Undecodable:** the op-code belongs to no tracked form (`Ok(None)`).
//! 3. **Invalid function:** the form matched but the function field did not
//!    (`Err(DecodeError::InvalidFunction)`). No mnemonic is ever guessed.

use crate::common::DecodeError;
use crate::isa::Isa;
use crate::isa::instruction::TypedInstruction;

/// Decodes a MIPS32 instruction word.
///
/// # Arguments
///
/// * `word` - The 32-bit instruction encoding observed on the fetch bus.
/// * `pc` - The program counter the word was fetched from. Only jump
///   classification depends on it.
///
/// # Returns
///
/// The typed instruction, `None` when the word is undecodable, or an error
/// when its function field is unknown.
#[inline]
pub fn decode(word: u32, pc: u32) -> Result<Option<TypedInstruction>, DecodeError> {
    decode_with(Isa::Mips, word, pc)
}

/// Decodes an instruction word using an explicit instruction set.
///
/// # Arguments
///
/// * `isa` - The front-end to use.
/// * `word` - The 32-bit instruction encoding.
/// * `pc` - The program counter the word was fetched from.
#[inline]
pub fn decode_with(
    isa: Isa,
    word: u32,
    pc: u32,
) -> Result<Option<TypedInstruction>, DecodeError> {
    isa.decode(word, pc)
}
