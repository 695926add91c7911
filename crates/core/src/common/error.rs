//! Error definitions for the injection core.
//!
//! This module defines the failure modes the core reports to its callers. It provides:
//! 1. **Decode errors:** An opcode matched a known form but the function field is not supported.
//! 2. **Synchronizer errors:** A stimulus batch could not be appended or drained within its cycle budget.
//! 3. **Sampler errors:** Generic sampler and event-bin misuse.
//! 4. **Configuration errors:** Malformed or inconsistent configuration documents.
//!
//! Undecodable words are deliberately *not* errors: the decoder reports them as
//! `Ok(None)` and the coverage path skips them.

use thiserror::Error;

use crate::isa::Isa;
use crate::sync::signals::RecoveryEvent;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;

/// A word whose opcode selected a known instruction form but whose function
/// field names no supported instruction.
///
/// Callers decide whether to skip the word and continue or abort the session.
/// The decoder never fabricates a mnemonic for these words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    /// The function (or funct3/funct7) field is not in the supported instruction set.
    #[error("invalid {isa} function field {funct:#x} in word {raw:#010x} at pc {pc:#010x}")]
    InvalidFunction {
        /// Raw instruction word.
        raw: u32,
        /// Program counter the word was fetched from.
        pc: u32,
        /// Instruction set the word was decoded against.
        isa: Isa,
        /// The offending function field as extracted from the word.
        funct: u32,
    },
}

/// Failures of a stimulus exchange at the injection boundary.
///
/// These are the only conditions that terminate an exchange. Liveness
/// recoveries are reported as events, not errors; the exchange variants carry
/// the events performed before the exchange gave up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyncError {
    /// The pending queue stayed full for longer than the append budget.
    #[error(
        "pending queue full: {pending}/{capacity} entries, {remaining} instructions not accepted after {waited} cycles ({} recoveries)",
        .recoveries.len()
    )]
    QueueFull {
        /// Entries in the queue when the exchange gave up.
        pending: usize,
        /// Configured queue bound.
        capacity: usize,
        /// Instructions of the batch that were never appended.
        remaining: usize,
        /// Cycles spent waiting for a free slot.
        waited: u64,
        /// Recoveries performed during the exchange.
        recoveries: Vec<RecoveryEvent>,
    },

    /// Appended instructions did not retire within the drain budget.
    #[error(
        "pending queue did not drain: {pending} entries left after {waited} cycles ({} recoveries)",
        .recoveries.len()
    )]
    DrainTimeout {
        /// Entries still pending.
        pending: usize,
        /// Cycles spent draining.
        waited: u64,
        /// Recoveries performed during the exchange.
        recoveries: Vec<RecoveryEvent>,
    },

    /// The generic DUT never finished its sequence within the budget.
    #[error("signal sequence did not finish within {waited} cycles")]
    SequenceTimeout {
        /// Cycles spent sampling.
        waited: u64,
    },
}

/// Misuse of the generic sampler or event coverage.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SamplerError {
    /// The duration signal index is outside the sampled vector.
    #[error("duration signal index {index} is outside a {width}-bit vector")]
    SignalOutOfRange {
        /// Configured bit index.
        index: usize,
        /// Width of the vector that was sampled.
        width: usize,
    },

    /// An event name was hit that was never declared.
    #[error("unknown event bin `{0}`")]
    UnknownEvent(String),

    /// A sampled vector could not be parsed.
    #[error("malformed bit-vector `{0}`")]
    MalformedBits(String),
}

/// Configuration problems detected while loading or validating.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document could not be read.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// The document is not valid JSON for the configuration schema.
    #[error("invalid configuration: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds a value the core cannot operate with.
    #[error("invalid value for `{field}`: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Human-readable explanation.
        reason: String,
    },
}

impl ConfigError {
    /// Builds an `Invalid` error for `field`.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

/// Top-level error for the crate.
#[derive(Debug, Error)]
pub enum Error {
    /// See [`DecodeError`].
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// See [`SyncError`].
    #[error(transparent)]
    Sync(#[from] SyncError),

    /// See [`SamplerError`].
    #[error(transparent)]
    Sampler(#[from] SamplerError),

    /// See [`ConfigError`].
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Serializing a coverage report failed.
    #[error("failed to serialize report: {0}")]
    Report(#[from] serde_json::Error),
}
