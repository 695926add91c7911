//! Coverage-guided instruction injection library.
//!
//! This crate drives coverage-guided verification of hardware designs with the following:
//! 1. **ISA:** Decoding MIPS32 and RV32I words into typed register, jump and store forms.
//! 2. **Coverage:** A fixed bin taxonomy, per-instruction and cross-instruction counters.
//! 3. **Synchronization:** A bounded pending queue kept in step with a stalling pipeline,
//!    with stuck-at-buffer and stuck-at-pc recovery.
//! 4. **Sampler:** Duration, peak-concurrency and event bins for non-CPU designs.
//! 5. **Simulation:** DUT traits, stimulus exchange loops, configuration and statistics.

/// Common types and constants (errors, field masks).
pub mod common;
/// Session configuration (defaults, thresholds, sampler tables).
pub mod config;
/// Instruction coverage (taxonomy, database, monitor).
pub mod coverage;
/// Instruction set (decode, typed instructions, MIPS and RV32 tables).
pub mod isa;
/// Generic signal coverage (sampler, tables, events).
pub mod sampler;
/// DUT traits and session drivers.
pub mod sim;
/// Session statistics collection and reporting.
pub mod stats;
/// Injection synchronization (queue, snapshots, recovery).
pub mod sync;

/// Root configuration type; use `Config::default()` or load from JSON.
pub use crate::config::Config;
/// Crate error and result types.
pub use crate::common::{Error, Result};
/// Instruction coverage counters.
pub use crate::coverage::CoverageDatabase;
/// Decoder entry point (MIPS) and instruction set selector.
pub use crate::isa::{Isa, decode};
/// CPU and generic session drivers.
pub use crate::sim::{GenericSession, Session};
