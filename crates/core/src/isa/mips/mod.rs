//! MIPS32 Front-end.
//!
//! Partitions the op-code space by the 6 most significant bits:
//!
//! * `op = 0` selects the register form; the 6-bit `funct` field picks the mnemonic.
//! * `op ∈ {2, 3}` selects the jump form (`j`/`jal` both classify as `jal`).
//! * `op ∈ {0o50, 0o51, 0o53}` selects the store form (`sb`, `sh`, `sw`).
//!
//! Any other op-code is undecodable.
//!
//! # Field layout
//!
//! ```text
//! R: op[31:26] rs[25:21] rt[20:16] rd[15:11] shamt[10:6] funct[5:0]
//! I: op[31:26] rs[25:21] rt[20:16] imm[15:0]
//! J: op[31:26] index[25:0]
//! ```

use crate::common::DecodeError;
use crate::common::constants::{REG_MASK, sign_extend};
use crate::isa::Isa;
use crate::isa::instruction::{
    Encoding, JumpForm, JumpTarget, Mnemonic, RegisterForm, StoreForm, TypedInstruction,
};

/// SPECIAL function codes.
pub mod funct;

/// Primary op-codes.
pub mod opcodes;

/// Bit shift of the op-code field.
const OP_SHIFT: u32 = 26;
/// Mask of the op-code field after shifting.
const OP_MASK: u32 = 0x3F;
/// Mask of the function field.
const FUNCT_MASK: u32 = 0x3F;
/// Mask of the 16-bit immediate.
const IMM16_MASK: u32 = 0xFFFF;
/// Width of the 16-bit immediate.
const IMM16_BITS: u32 = 16;
/// Mask of the 26-bit jump index.
const INDEX_MASK: u32 = 0x03FF_FFFF;

/// Field extractors for MIPS32 words.
pub trait MipsBits {
    /// Op-code field (bits 31-26).
    fn op(&self) -> u32;
    /// `rs` register field (bits 25-21), the first source.
    fn rs(&self) -> usize;
    /// `rt` register field (bits 20-16), the second source.
    fn rt(&self) -> usize;
    /// `rd` register field (bits 15-11), the destination.
    fn rd(&self) -> usize;
    /// Function field (bits 5-0).
    fn funct(&self) -> u32;
    /// Raw 16-bit immediate (bits 15-0).
    fn imm16(&self) -> u32;
    /// Raw 26-bit jump index (bits 25-0).
    fn index26(&self) -> u32;
}

impl MipsBits for u32 {
    #[inline(always)]
    fn op(&self) -> u32 {
        (self >> OP_SHIFT) & OP_MASK
    }

    #[inline(always)]
    fn rs(&self) -> usize {
        ((self >> 21) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rt(&self) -> usize {
        ((self >> 16) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rd(&self) -> usize {
        ((self >> 11) & REG_MASK) as usize
    }

    #[inline(always)]
    fn funct(&self) -> u32 {
        self & FUNCT_MASK
    }

    #[inline(always)]
    fn imm16(&self) -> u32 {
        self & IMM16_MASK
    }

    #[inline(always)]
    fn index26(&self) -> u32 {
        self & INDEX_MASK
    }
}

/// Decodes a MIPS32 encoding.
pub(crate) fn decode(enc: Encoding) -> Result<Option<TypedInstruction>, DecodeError> {
    let word = enc.raw();
    match word.op() {
        opcodes::OP_SPECIAL => decode_special(enc).map(Some),
        opcodes::OP_J | opcodes::OP_JAL => Ok(Some(TypedInstruction::Jump(JumpForm {
            rd: word.rd(),
            offset: word.index26() as i32,
            target: JumpTarget::Region,
            pc: enc.pc(),
        }))),
        opcodes::OP_SB => Ok(Some(decode_store(enc, Mnemonic::Sb))),
        opcodes::OP_SH => Ok(Some(decode_store(enc, Mnemonic::Sh))),
        opcodes::OP_SW => Ok(Some(decode_store(enc, Mnemonic::Sw))),
        _ => Ok(None),
    }
}

/// Selects the register-form mnemonic from the function field.
fn decode_special(enc: Encoding) -> Result<TypedInstruction, DecodeError> {
    let word = enc.raw();
    let mnemonic = match word.funct() {
        funct::ADD => Mnemonic::Add,
        funct::SUB => Mnemonic::Sub,
        funct::SLL => Mnemonic::Sll,
        funct::SLT => Mnemonic::Slt,
        funct::SLTU => Mnemonic::Sltu,
        funct::XOR => Mnemonic::Xor,
        funct::SRL => Mnemonic::Srl,
        funct::SRA => Mnemonic::Sra,
        funct::OR => Mnemonic::Or,
        funct::AND => Mnemonic::And,
        other => {
            return Err(DecodeError::InvalidFunction {
                raw: word,
                pc: enc.pc(),
                isa: Isa::Mips,
                funct: other,
            });
        }
    };
    Ok(TypedInstruction::Register(RegisterForm {
        mnemonic,
        rd: word.rd(),
        rs1: word.rs(),
        rs2: word.rt(),
    }))
}

/// Extracts the base, data and offset fields of a store.
fn decode_store(enc: Encoding, mnemonic: Mnemonic) -> TypedInstruction {
    let word = enc.raw();
    TypedInstruction::Store(StoreForm {
        mnemonic,
        rs1: word.rs(),
        rs2: word.rt(),
        offset: sign_extend(word.imm16(), IMM16_BITS),
    })
}
