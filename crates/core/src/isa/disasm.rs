//! Instruction Disassembler.
//!
//! Renders a [`TypedInstruction`] as assembler text for debug tracing, log
//! output and the CLI. Registers print in the numeric `xN` style for both
//! front-ends.
//!
//! ```ignore
//! let insn = covinject_core::isa::decode::decode_with(Isa::Rv32, 0x01EE12B3, 0)?.unwrap();
//! assert_eq!(insn.to_string(), "sll x5, x28, x30");
//! ```

use std::fmt;

use crate::isa::instruction::{JumpTarget, TypedInstruction};

impl fmt::Display for TypedInstruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Register(r) => write!(f, "{} x{}, x{}, x{}", r.mnemonic, r.rd, r.rs1, r.rs2),
            Self::Store(s) => write!(f, "{} x{}, {}(x{})", s.mnemonic, s.rs2, s.offset, s.rs1),
            Self::Jump(j) => match j.target {
                JumpTarget::PcRelative => write!(f, "jal x{}, {}", j.rd, j.offset),
                JumpTarget::Region => write!(f, "jal x{}, {:#x}", j.rd, (j.offset as u32) << 2),
            },
        }
    }
}
