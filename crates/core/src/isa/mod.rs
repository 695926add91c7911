//! Instruction Set Definitions.
//!
//! Contains the typed instruction model, the decoder entry points and the
//! per-ISA opcode tables used to classify injected words for coverage.
//!
//! # Front-ends
//!
//! * `mips`: 32-bit MIPS words (op in bits 31:26). The default front-end.
//! * `rv32`: 32-bit RISC-V base integer words (opcode in bits 6:0).
//!
//! Both front-ends produce the same [`TypedInstruction`] so the coverage
//! taxonomy is shared.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::common::DecodeError;

/// Decoder entry points for both instruction sets.
pub mod decode;

/// Text rendering of typed instructions for logs and the CLI.
pub mod disasm;

/// Encodings, mnemonics and the typed instruction variants.
pub mod instruction;

/// MIPS opcode and function tables.
pub mod mips;

/// RISC-V RV32I opcode and function tables.
pub mod rv32;

pub use decode::decode;
pub use instruction::{
    BranchDirection, Destination, Encoding, Form, JumpForm, JumpTarget, Mnemonic, RegisterForm,
    Sources, StoreForm, TypedInstruction,
};

/// Instruction set a DUT fetches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Isa {
    /// MIPS32 encoding (op-code in the 6 most significant bits).
    #[default]
    Mips,
    /// RISC-V RV32I encoding (7-bit opcode in the least significant bits).
    #[serde(alias = "riscv", alias = "rv32i")]
    Rv32,
}

impl Isa {
    /// Decodes `word` fetched from `pc` using this instruction set.
    ///
    /// # Returns
    ///
    /// * `Ok(Some(_))` for a supported instruction.
    /// * `Ok(None)` when the opcode belongs to no tracked form.
    /// * `Err(DecodeError::InvalidFunction)` when the form matched but the
    ///   function field did not.
    pub fn decode(self, word: u32, pc: u32) -> Result<Option<TypedInstruction>, DecodeError> {
        match self {
            Self::Mips => mips::decode(Encoding::new(word, pc)),
            Self::Rv32 => rv32::decode(Encoding::new(word, pc)),
        }
    }
}

impl fmt::Display for Isa {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mips => write!(f, "mips"),
            Self::Rv32 => write!(f, "rv32"),
        }
    }
}

impl std::str::FromStr for Isa {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mips" => Ok(Self::Mips),
            "rv32" | "rv32i" | "riscv" => Ok(Self::Rv32),
            other => Err(format!("unknown instruction set `{other}`")),
        }
    }
}
