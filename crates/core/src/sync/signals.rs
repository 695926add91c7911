//! Per-cycle signal views and synchronizer events.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Fetch-stage signals sampled on one clock edge of a CPU DUT.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FetchSnapshot {
    /// Word currently on the decoder input.
    pub instruction: u32,
    /// Fetch-valid (PC enable) strobe.
    pub fetch_valid: bool,
    /// Current program counter.
    pub pc: u32,
}

impl FetchSnapshot {
    /// A valid fetch of `instruction` at `pc`.
    pub const fn valid(instruction: u32, pc: u32) -> Self {
        Self {
            instruction,
            fetch_valid: true,
            pc,
        }
    }

    /// A cycle with fetch-valid low.
    pub const fn stalled(pc: u32) -> Self {
        Self {
            instruction: 0,
            fetch_valid: false,
            pc,
        }
    }
}

/// Last instruction sampled by the monitor, reported with every response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DutState {
    /// PC of the last sampled instruction.
    pub last_pc: Option<u32>,
    /// Raw word of the last sampled instruction.
    pub last_insn: Option<u32>,
}

/// Liveness guard that fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecoveryKind {
    /// The head never appeared on the fetch bus.
    StuckAtBuffer,
    /// The head kept matching without the PC moving.
    StuckAtPc,
}

impl fmt::Display for RecoveryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StuckAtBuffer => write!(f, "stuck-at-buffer"),
            Self::StuckAtPc => write!(f, "stuck-at-pc"),
        }
    }
}

/// A forced eviction of the head entry. The DUT must be reset before the
/// next edge is observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecoveryEvent {
    /// Guard that fired.
    pub kind: RecoveryKind,
    /// Word that was evicted.
    pub word: u32,
    /// Synchronizer cycle on which the guard fired.
    pub cycle: u64,
}

/// Result of observing one clock edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CycleOutcome {
    /// Queue empty; nothing to track.
    Idle,
    /// Head not on the fetch bus this edge.
    Waiting,
    /// Head matched but the PC has not moved since it went in flight.
    Matched,
    /// Head retired.
    Retired {
        /// Retired word.
        word: u32,
        /// PC it was observed at.
        pc: u32,
    },
    /// Head evicted; the caller must reset the DUT.
    Recovered(RecoveryEvent),
}

impl CycleOutcome {
    /// Whether the caller must reset the DUT before the next edge.
    pub const fn reset_required(&self) -> bool {
        matches!(self, Self::Recovered(_))
    }

    /// Whether the head entry left the queue on this edge.
    pub const fn freed_slot(&self) -> bool {
        matches!(self, Self::Retired { .. } | Self::Recovered(_))
    }
}
