//! Coverage taxonomy.
//!
//! The closed set of [`CoverageBin`]s and, per instruction [`Form`], which of
//! them are legal as self-bins and which `(prior mnemonic, bin)` pairs are
//! legal as cross-bins. The taxonomy is static: the database is sized from it
//! at construction and never records a bin outside it.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::isa::instruction::{BranchDirection, Form, Mnemonic, Sources, TypedInstruction};

/// A verification condition an instruction (or instruction pair) can hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CoverageBin {
    /// The instruction executed.
    Seen,
    /// The destination is register 0.
    ZeroDst,
    /// Either source is register 0.
    ZeroSrc,
    /// Both sources name the same register.
    SameSrc,
    /// Jump target below the PC.
    BranchBackward,
    /// Jump target above the PC.
    BranchForward,
    /// A source reads the destination of the preceding instruction.
    RawHazard,
}

impl CoverageBin {
    /// Every bin, in declaration order.
    pub const ALL: [Self; 7] = [
        Self::Seen,
        Self::ZeroDst,
        Self::ZeroSrc,
        Self::SameSrc,
        Self::BranchBackward,
        Self::BranchForward,
        Self::RawHazard,
    ];

    /// Snake-case name used in reports.
    pub const fn name(self) -> &'static str {
        match self {
            Self::Seen => "seen",
            Self::ZeroDst => "zero_dst",
            Self::ZeroSrc => "zero_src",
            Self::SameSrc => "same_src",
            Self::BranchBackward => "branch_backward",
            Self::BranchForward => "branch_forward",
            Self::RawHazard => "raw_hazard",
        }
    }
}

impl fmt::Display for CoverageBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

const REGISTER_SELF: &[CoverageBin] = &[
    CoverageBin::Seen,
    CoverageBin::ZeroDst,
    CoverageBin::ZeroSrc,
    CoverageBin::SameSrc,
];

const STORE_SELF: &[CoverageBin] = &[CoverageBin::Seen, CoverageBin::ZeroSrc, CoverageBin::SameSrc];

const JUMP_SELF: &[CoverageBin] = &[
    CoverageBin::Seen,
    CoverageBin::BranchBackward,
    CoverageBin::BranchForward,
];

const HAZARD_CROSS: &[CoverageBin] = &[CoverageBin::RawHazard];

/// Self-bins legal for instructions of `form`.
pub const fn self_bins(form: Form) -> &'static [CoverageBin] {
    match form {
        Form::Register => REGISTER_SELF,
        Form::Store => STORE_SELF,
        Form::Jump => JUMP_SELF,
    }
}

/// Cross-bin kinds legal for instructions of `form`.
///
/// Only forms that read sources can observe a hazard.
pub const fn cross_bin_kinds(form: Form) -> &'static [CoverageBin] {
    if form.has_sources() { HAZARD_CROSS } else { &[] }
}

/// Every legal `(prior mnemonic, bin)` cross pair for instructions of `form`.
///
/// The prior ranges over mnemonics whose form writes a destination.
pub fn cross_bins(form: Form) -> impl Iterator<Item = (Mnemonic, CoverageBin)> {
    let kinds = cross_bin_kinds(form);
    Mnemonic::ALL
        .into_iter()
        .filter(|prior| prior.form().has_destination())
        .flat_map(move |prior| kinds.iter().map(move |&bin| (prior, bin)))
}

/// Whether `bin` is a legal self-bin for `mnemonic`.
pub fn is_legal_self(mnemonic: Mnemonic, bin: CoverageBin) -> bool {
    self_bins(mnemonic.form()).contains(&bin)
}

/// Whether `(prior, bin)` is a legal cross-bin for `mnemonic`.
pub fn is_legal_cross(mnemonic: Mnemonic, prior: Mnemonic, bin: CoverageBin) -> bool {
    prior.form().has_destination() && cross_bin_kinds(mnemonic.form()).contains(&bin)
}

/// Self-bins hit by a single decoded instruction.
///
/// `seen` is always first. A jump whose target equals its PC hits only `seen`.
pub fn classify(insn: &TypedInstruction) -> Vec<CoverageBin> {
    let mut hits = vec![CoverageBin::Seen];
    match insn {
        TypedInstruction::Register(r) => {
            if r.rd == 0 {
                hits.push(CoverageBin::ZeroDst);
            }
            push_source_bins(r, &mut hits);
        }
        TypedInstruction::Store(s) => push_source_bins(s, &mut hits),
        TypedInstruction::Jump(j) => match j.direction() {
            BranchDirection::Backward => hits.push(CoverageBin::BranchBackward),
            BranchDirection::Forward => hits.push(CoverageBin::BranchForward),
            BranchDirection::SelfLoop => {}
        },
    }
    hits
}

fn push_source_bins(insn: &impl Sources, hits: &mut Vec<CoverageBin>) {
    if insn.reads_zero() {
        hits.push(CoverageBin::ZeroSrc);
    }
    if insn.same_sources() {
        hits.push(CoverageBin::SameSrc);
    }
}

/// Cross-bins hit by `insn` given the instruction sampled immediately before it.
pub fn classify_cross(
    insn: &TypedInstruction,
    previous: &TypedInstruction,
) -> Option<(Mnemonic, CoverageBin)> {
    insn.reads_result_of(previous)
        .then_some((previous.mnemonic(), CoverageBin::RawHazard))
}
