//! Typed instruction model.
//!
//! Provides the immutable [`Encoding`] captured from the fetch bus, the closed
//! [`Mnemonic`] set tracked for coverage, and the [`TypedInstruction`] sum type
//! whose variants carry only the fields legal for their form. Shared field
//! accessors are exposed through the [`Destination`] and [`Sources`] traits,
//! implemented only by the forms that actually have those operands.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Mask applied to the PC before comparing it with a region jump target.
///
/// Region jumps replace the low 28 bits of the PC; the top nibble is kept.
pub const REGION_PC_MASK: u32 = 0x0FFF_FFFF;

/// Shift converting a region jump word index to a byte address.
pub const REGION_INDEX_SHIFT: u32 = 2;

/// An instruction word as observed on the fetch bus, with the PC it was fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Encoding {
    raw: u32,
    pc: u32,
}

impl Encoding {
    /// Captures a fetched word.
    #[inline]
    pub const fn new(raw: u32, pc: u32) -> Self {
        Self { raw, pc }
    }

    /// Raw 32-bit instruction word.
    #[inline]
    pub const fn raw(&self) -> u32 {
        self.raw
    }

    /// Program counter the word was fetched from.
    #[inline]
    pub const fn pc(&self) -> u32 {
        self.pc
    }
}

/// Instruction form; selects the operands an instruction carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Form {
    /// Register-register ALU operation: one destination, two sources.
    Register,
    /// Jump-and-link: one destination and a target offset.
    Jump,
    /// Store: two sources (base and data) and an offset.
    Store,
}

impl Form {
    /// Whether instructions of this form write a destination register.
    #[inline]
    pub const fn has_destination(self) -> bool {
        matches!(self, Self::Register | Self::Jump)
    }

    /// Whether instructions of this form read two source registers.
    #[inline]
    pub const fn has_sources(self) -> bool {
        matches!(self, Self::Register | Self::Store)
    }
}

/// Supported opcodes.
///
/// Adding a mnemonic forces every exhaustive `match` over it (form mapping,
/// decoders, disassembly) to be revisited.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mnemonic {
    /// Add.
    Add,
    /// Subtract.
    Sub,
    /// Shift left logical.
    Sll,
    /// Set less than (signed).
    Slt,
    /// Set less than (unsigned).
    Sltu,
    /// Exclusive or.
    Xor,
    /// Shift right logical.
    Srl,
    /// Shift right arithmetic.
    Sra,
    /// Or.
    Or,
    /// And.
    And,
    /// Store byte.
    Sb,
    /// Store half-word.
    Sh,
    /// Store word.
    Sw,
    /// Jump and link.
    Jal,
}

impl Mnemonic {
    /// Every mnemonic, in declaration order.
    pub const ALL: [Self; 14] = [
        Self::Add,
        Self::Sub,
        Self::Sll,
        Self::Slt,
        Self::Sltu,
        Self::Xor,
        Self::Srl,
        Self::Sra,
        Self::Or,
        Self::And,
        Self::Sb,
        Self::Sh,
        Self::Sw,
        Self::Jal,
    ];

    /// The form this mnemonic always decodes to.
    pub const fn form(self) -> Form {
        match self {
            Self::Add
            | Self::Sub
            | Self::Sll
            | Self::Slt
            | Self::Sltu
            | Self::Xor
            | Self::Srl
            | Self::Sra
            | Self::Or
            | Self::And => Form::Register,
            Self::Sb | Self::Sh | Self::Sw => Form::Store,
            Self::Jal => Form::Jump,
        }
    }

    /// Lower-case assembler name.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Sll => "sll",
            Self::Slt => "slt",
            Self::Sltu => "sltu",
            Self::Xor => "xor",
            Self::Srl => "srl",
            Self::Sra => "sra",
            Self::Or => "or",
            Self::And => "and",
            Self::Sb => "sb",
            Self::Sh => "sh",
            Self::Sw => "sw",
            Self::Jal => "jal",
        }
    }
}

impl fmt::Display for Mnemonic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Accessor for the destination register of forms that write one.
pub trait Destination {
    /// Destination register index (0-31).
    fn rd(&self) -> usize;
}

/// Accessors for the two source registers of forms that read them.
pub trait Sources {
    /// First source register index (0-31).
    fn rs1(&self) -> usize;

    /// Second source register index (0-31).
    fn rs2(&self) -> usize;

    /// Both source registers, `[rs1, rs2]`.
    fn sources(&self) -> [usize; 2] {
        [self.rs1(), self.rs2()]
    }

    /// Whether either source reads register 0.
    fn reads_zero(&self) -> bool {
        self.rs1() == 0 || self.rs2() == 0
    }

    /// Whether both sources name the same register.
    fn same_sources(&self) -> bool {
        self.rs1() == self.rs2()
    }
}

/// Register-register ALU instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterForm {
    /// Decoded operation.
    pub mnemonic: Mnemonic,
    /// Destination register.
    pub rd: usize,
    /// First source register.
    pub rs1: usize,
    /// Second source register.
    pub rs2: usize,
}

impl Destination for RegisterForm {
    #[inline]
    fn rd(&self) -> usize {
        self.rd
    }
}

impl Sources for RegisterForm {
    #[inline]
    fn rs1(&self) -> usize {
        self.rs1
    }

    #[inline]
    fn rs2(&self) -> usize {
        self.rs2
    }
}

/// How a jump's offset field maps to its target address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JumpTarget {
    /// Signed byte offset added to the PC (RISC-V `jal`).
    PcRelative,
    /// Word index replacing the low 28 bits of the PC (MIPS `j`/`jal`).
    Region,
}

/// Direction of a jump relative to the PC it was fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchDirection {
    /// Target strictly below the PC.
    Backward,
    /// Target strictly above the PC.
    Forward,
    /// Target equal to the PC. Counted separately; records neither branch bin.
    SelfLoop,
}

/// Jump-and-link instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JumpForm {
    /// Link register.
    pub rd: usize,
    /// Offset field. Signed bytes for [`JumpTarget::PcRelative`], an unsigned
    /// word index for [`JumpTarget::Region`].
    pub offset: i32,
    /// Interpretation of `offset`.
    pub target: JumpTarget,
    /// PC the jump was fetched from.
    pub pc: u32,
}

impl JumpForm {
    /// Classifies the jump target against the PC.
    pub fn direction(&self) -> BranchDirection {
        let ordering = match self.target {
            JumpTarget::PcRelative => self.offset.cmp(&0),
            JumpTarget::Region => {
                let target = (self.offset as u32) << REGION_INDEX_SHIFT;
                target.cmp(&(self.pc & REGION_PC_MASK))
            }
        };
        match ordering {
            std::cmp::Ordering::Less => BranchDirection::Backward,
            std::cmp::Ordering::Greater => BranchDirection::Forward,
            std::cmp::Ordering::Equal => BranchDirection::SelfLoop,
        }
    }
}

impl Destination for JumpForm {
    #[inline]
    fn rd(&self) -> usize {
        self.rd
    }
}

/// Store instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreForm {
    /// Decoded operation.
    pub mnemonic: Mnemonic,
    /// Base address register.
    pub rs1: usize,
    /// Data register.
    pub rs2: usize,
    /// Sign-extended byte offset.
    pub offset: i32,
}

impl Sources for StoreForm {
    #[inline]
    fn rs1(&self) -> usize {
        self.rs1
    }

    #[inline]
    fn rs2(&self) -> usize {
        self.rs2
    }
}

/// A successfully decoded instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypedInstruction {
    /// Register-register ALU operation.
    Register(RegisterForm),
    /// Jump and link.
    Jump(JumpForm),
    /// Store.
    Store(StoreForm),
}

impl TypedInstruction {
    /// The operation; always consistent with the variant.
    pub const fn mnemonic(&self) -> Mnemonic {
        match self {
            Self::Register(r) => r.mnemonic,
            Self::Jump(_) => Mnemonic::Jal,
            Self::Store(s) => s.mnemonic,
        }
    }

    /// The variant tag.
    pub const fn form(&self) -> Form {
        match self {
            Self::Register(_) => Form::Register,
            Self::Jump(_) => Form::Jump,
            Self::Store(_) => Form::Store,
        }
    }

    /// Destination register, for forms that write one.
    pub fn destination(&self) -> Option<usize> {
        match self {
            Self::Register(r) => Some(r.rd()),
            Self::Jump(j) => Some(j.rd()),
            Self::Store(_) => None,
        }
    }

    /// Source registers, for forms that read them.
    pub fn sources(&self) -> Option<[usize; 2]> {
        match self {
            Self::Register(r) => Some(r.sources()),
            Self::Store(s) => Some(s.sources()),
            Self::Jump(_) => None,
        }
    }

    /// Whether this instruction reads the register `previous` writes.
    ///
    /// Returns `false` when `previous` has no destination or `self` has no sources.
    pub fn reads_result_of(&self, previous: &Self) -> bool {
        match (previous.destination(), self.sources()) {
            (Some(rd), Some(srcs)) => srcs.contains(&rd),
            _ => false,
        }
    }
}
