//! RISC-V RV32I Front-end.
//!
//! Decodes the subset of the base integer instruction set tracked for
//! coverage: register-register ALU operations (`OP_REG`), stores
//! (`OP_STORE`) and `jal`. Every other major opcode is undecodable.
//!
//! # Structure
//!
//! - `opcodes`: Major opcodes (bits 6-0).
//! - `funct3`: Minor opcodes distinguishing instructions within a major opcode.
//! - `funct7`: Additional opcode bits separating ADD/SUB and SRL/SRA.

use crate::common::DecodeError;
use crate::common::constants::{REG_MASK, sign_extend};
use crate::isa::Isa;
use crate::isa::instruction::{
    Encoding, JumpForm, JumpTarget, Mnemonic, RegisterForm, StoreForm, TypedInstruction,
};

/// Function code 3 definitions.
pub mod funct3;

/// Function code 7 definitions.
pub mod funct7;

/// Major opcodes.
pub mod opcodes;

/// Bit mask for extracting the opcode field (bits 0-6).
pub const OPCODE_MASK: u32 = 0x7F;
/// Bit mask for extracting the funct3 field (bits 12-14).
pub const FUNCT3_MASK: u32 = 0x7;
/// Bit mask for extracting the funct7 field (bits 25-31).
pub const FUNCT7_MASK: u32 = 0x7F;

/// Bit shift for extracting S-Type immediate low field (bits 7-11).
///
/// S-Type format: `imm[11:5] | rs2 | rs1 | funct3 | imm[4:0] | opcode`
const S_IMM_LOW_SHIFT: u32 = 7;
/// Bit mask for S-Type immediate low field (5 bits: imm[4:0]).
const S_IMM_LOW_MASK: u32 = 0x1F;
/// Bit shift for extracting S-Type immediate high field (bits 25-31).
const S_IMM_HIGH_SHIFT: u32 = 25;
/// Bit mask for S-Type immediate high field (7 bits: imm[11:5]).
const S_IMM_HIGH_MASK: u32 = 0x7F;
/// Total number of bits in S-Type immediate.
const S_IMM_BITS: u32 = 12;

/// J-Type format: `imm[20] | imm[10:1] | imm[11] | imm[19:12] | rd | opcode`
const J_IMM_19_12_SHIFT: u32 = 12;
const J_IMM_19_12_MASK: u32 = 0xFF;
const J_IMM_11_SHIFT: u32 = 20;
const J_IMM_10_1_SHIFT: u32 = 21;
const J_IMM_10_1_MASK: u32 = 0x3FF;
const J_IMM_20_SHIFT: u32 = 31;
/// Total number of bits in J-Type immediate (21 bits, sign-extended).
const J_IMM_BITS: u32 = 21;

/// Trait for extracting RV32 instruction fields from encoded words.
pub trait Rv32Bits {
    /// Extracts the opcode field (bits 0-6).
    fn opcode(&self) -> u32;
    /// Extracts the destination register field (bits 7-11).
    fn rd(&self) -> usize;
    /// Extracts the first source register field (bits 15-19).
    fn rs1(&self) -> usize;
    /// Extracts the second source register field (bits 20-24).
    fn rs2(&self) -> usize;
    /// Extracts the funct3 field (bits 12-14).
    fn funct3(&self) -> u32;
    /// Extracts the funct7 field (bits 25-31).
    fn funct7(&self) -> u32;
}

impl Rv32Bits for u32 {
    #[inline(always)]
    fn opcode(&self) -> u32 {
        self & OPCODE_MASK
    }

    #[inline(always)]
    fn rd(&self) -> usize {
        ((self >> 7) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs1(&self) -> usize {
        ((self >> 15) & REG_MASK) as usize
    }

    #[inline(always)]
    fn rs2(&self) -> usize {
        ((self >> 20) & REG_MASK) as usize
    }

    #[inline(always)]
    fn funct3(&self) -> u32 {
        (self >> 12) & FUNCT3_MASK
    }

    #[inline(always)]
    fn funct7(&self) -> u32 {
        (self >> 25) & FUNCT7_MASK
    }
}

/// Decodes an RV32I encoding.
pub(crate) fn decode(enc: Encoding) -> Result<Option<TypedInstruction>, DecodeError> {
    let word = enc.raw();
    match word.opcode() {
        opcodes::OP_REG => decode_reg(enc).map(Some),
        opcodes::OP_STORE => decode_store(enc).map(Some),
        opcodes::OP_JAL => Ok(Some(TypedInstruction::Jump(JumpForm {
            rd: word.rd(),
            offset: decode_j_type_imm(word),
            target: JumpTarget::PcRelative,
            pc: enc.pc(),
        }))),
        _ => Ok(None),
    }
}

fn decode_reg(enc: Encoding) -> Result<TypedInstruction, DecodeError> {
    let word = enc.raw();
    let mnemonic = match (word.funct3(), word.funct7()) {
        (funct3::ADD_SUB, funct7::DEFAULT) => Mnemonic::Add,
        (funct3::ADD_SUB, funct7::SUB_SRA) => Mnemonic::Sub,
        (funct3::SLL, funct7::DEFAULT) => Mnemonic::Sll,
        (funct3::SLT, funct7::DEFAULT) => Mnemonic::Slt,
        (funct3::SLTU, funct7::DEFAULT) => Mnemonic::Sltu,
        (funct3::XOR, funct7::DEFAULT) => Mnemonic::Xor,
        (funct3::SRL_SRA, funct7::DEFAULT) => Mnemonic::Srl,
        (funct3::SRL_SRA, funct7::SUB_SRA) => Mnemonic::Sra,
        (funct3::OR, funct7::DEFAULT) => Mnemonic::Or,
        (funct3::AND, funct7::DEFAULT) => Mnemonic::And,
        (f3, f7) => {
            return Err(DecodeError::InvalidFunction {
                raw: word,
                pc: enc.pc(),
                isa: Isa::Rv32,
                funct: (f7 << 3) | f3,
            });
        }
    };
    Ok(TypedInstruction::Register(RegisterForm {
        mnemonic,
        rd: word.rd(),
        rs1: word.rs1(),
        rs2: word.rs2(),
    }))
}

fn decode_store(enc: Encoding) -> Result<TypedInstruction, DecodeError> {
    let word = enc.raw();
    let mnemonic = match word.funct3() {
        funct3::SB => Mnemonic::Sb,
        funct3::SH => Mnemonic::Sh,
        funct3::SW => Mnemonic::Sw,
        other => {
            return Err(DecodeError::InvalidFunction {
                raw: word,
                pc: enc.pc(),
                isa: Isa::Rv32,
                funct: other,
            });
        }
    };
    Ok(TypedInstruction::Store(StoreForm {
        mnemonic,
        rs1: word.rs1(),
        rs2: word.rs2(),
        offset: decode_s_type_imm(word),
    }))
}

/// Decodes the immediate value for S-Type instructions.
fn decode_s_type_imm(inst: u32) -> i32 {
    let low = (inst >> S_IMM_LOW_SHIFT) & S_IMM_LOW_MASK;
    let high = (inst >> S_IMM_HIGH_SHIFT) & S_IMM_HIGH_MASK;
    sign_extend((high << 5) | low, S_IMM_BITS)
}

/// Decodes the immediate value for J-Type instructions.
fn decode_j_type_imm(inst: u32) -> i32 {
    let bits_19_12 = (inst >> J_IMM_19_12_SHIFT) & J_IMM_19_12_MASK;
    let bit_11 = (inst >> J_IMM_11_SHIFT) & 1;
    let bits_10_1 = (inst >> J_IMM_10_1_SHIFT) & J_IMM_10_1_MASK;
    let bit_20 = (inst >> J_IMM_20_SHIFT) & 1;

    let combined = (bit_20 << 20) | (bits_19_12 << 12) | (bit_11 << 11) | (bits_10_1 << 1);
    sign_extend(combined, J_IMM_BITS)
}
