//! Instruction monitor.
//!
//! Decodes every sampled fetch and feeds the result into a
//! [`CoverageDatabase`]. The monitor keeps the one-instruction history needed
//! for cross-bins; the history is dropped whenever continuity is lost:
//!
//! 1. **Undecodable or invalid word:** the next instruction has no prior.
//! 2. **DUT reset:** the owner calls [`InstructionMonitor::clear_history`].
//!
//! A fetch stall is a pipeline bubble, not a break: the instructions on
//! either side of it still pair up.

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::coverage::bins;
use crate::coverage::database::CoverageDatabase;
use crate::isa::Isa;
use crate::isa::instruction::{BranchDirection, TypedInstruction};
use crate::sync::signals::{DutState, FetchSnapshot};

/// Decode outcome counters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DecodeStats {
    /// Words sampled.
    pub sampled: u64,
    /// Words that decoded to a tracked instruction.
    pub decoded: u64,
    /// Words whose op-code belongs to no tracked form.
    pub undecodable: u64,
    /// Words with a tracked form but unknown function field.
    pub invalid_function: u64,
    /// Jumps whose target equals their PC.
    pub self_loops: u64,
    /// Cross-bin increments.
    pub hazards: u64,
    /// Times the history was dropped by a reset or recovery.
    pub history_clears: u64,
}

/// Samples fetched instructions into coverage.
#[derive(Debug, Clone)]
pub struct InstructionMonitor {
    isa: Isa,
    coverage: CoverageDatabase,
    previous: Option<TypedInstruction>,
    state: DutState,
    stats: DecodeStats,
}

impl InstructionMonitor {
    /// Creates a monitor with an empty database for `isa`.
    pub fn new(isa: Isa) -> Self {
        Self {
            isa,
            coverage: CoverageDatabase::new(),
            previous: None,
            state: DutState::default(),
            stats: DecodeStats::default(),
        }
    }

    /// Instruction set used to decode sampled words.
    pub const fn isa(&self) -> Isa {
        self.isa
    }

    /// Samples one fetch snapshot.
    ///
    /// A cycle with fetch-valid low records nothing and keeps the history.
    pub fn observe(&mut self, snapshot: &FetchSnapshot) -> Option<TypedInstruction> {
        if !snapshot.fetch_valid {
            return None;
        }
        self.sample(snapshot.instruction, snapshot.pc)
    }

    /// Decodes `word` fetched at `pc` and records its self and cross bins.
    ///
    /// # Returns
    ///
    /// The decoded instruction, or `None` when nothing was recorded.
    pub fn sample(&mut self, word: u32, pc: u32) -> Option<TypedInstruction> {
        self.stats.sampled += 1;
        self.state = DutState {
            last_pc: Some(pc),
            last_insn: Some(word),
        };

        let insn = match self.isa.decode(word, pc) {
            Ok(Some(insn)) => insn,
            Ok(None) => {
                trace!(
                    word = format_args!("{word:#010x}"),
                    pc = format_args!("{pc:#x}"),
                    "undecodable"
                );
                self.stats.undecodable += 1;
                self.previous = None;
                return None;
            }
            Err(e) => {
                warn!("{e}");
                self.stats.invalid_function += 1;
                self.previous = None;
                return None;
            }
        };

        self.stats.decoded += 1;
        let mnemonic = insn.mnemonic();
        for bin in bins::classify(&insn) {
            let _ = self.coverage.record(mnemonic, bin);
        }
        if let TypedInstruction::Jump(j) = &insn
            && j.direction() == BranchDirection::SelfLoop
        {
            debug!(pc = format_args!("{pc:#x}"), "jump targets its own pc");
            self.stats.self_loops += 1;
        }
        if let Some(prev) = &self.previous
            && let Some((prior, bin)) = bins::classify_cross(&insn, prev)
            && self.coverage.record_cross(mnemonic, prior, bin)
        {
            self.stats.hazards += 1;
        }

        self.previous = Some(insn);
        Some(insn)
    }

    /// Drops the instruction history so the next sample has no prior.
    pub fn clear_history(&mut self) {
        if self.previous.take().is_some() {
            self.stats.history_clears += 1;
        }
    }

    /// Last successfully decoded instruction, if history is intact.
    pub const fn previous(&self) -> Option<&TypedInstruction> {
        self.previous.as_ref()
    }

    /// Accumulated coverage.
    pub const fn coverage(&self) -> &CoverageDatabase {
        &self.coverage
    }

    /// Last sampled word and PC.
    pub const fn state(&self) -> DutState {
        self.state
    }

    /// Decode counters.
    pub const fn stats(&self) -> &DecodeStats {
        &self.stats
    }
}
