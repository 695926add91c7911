//! Instruction Coverage.
//!
//! Classifies decoded instructions against a fixed taxonomy of verification
//! bins and accumulates hit counts.
//!
//! # Structure
//!
//! - `bins`: The closed bin set and per-form legality.
//! - `database`: Counters for every legal bin plus the coverage rate.
//! - `monitor`: Decodes sampled fetches and records self and cross bins.

/// Bin taxonomy.
pub mod bins;

/// Hit counters.
pub mod database;

/// Fetch sampling and hazard history.
pub mod monitor;

pub use bins::CoverageBin;
pub use database::CoverageDatabase;
pub use monitor::{DecodeStats, InstructionMonitor};
