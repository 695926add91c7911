//! Generic Signal Coverage.
//!
//! Coverage for DUTs that expose signal vectors instead of an instruction
//! stream.
//!
//! # Structure
//!
//! - `bits`: Arbitrary-width sampled vectors.
//! - `signal`: The per-cycle sampler and its snapshot type.
//! - `database`: Duration, peak, combined and event tables.
//! - `events`: Declared event bins and rising-edge detection.

/// Sampled vectors.
pub mod bits;

/// Bucket tables.
pub mod database;

/// Named events.
pub mod events;

/// Per-cycle sampling.
pub mod signal;

pub use bits::SignalBits;
pub use database::GenericCoverageDatabase;
pub use events::{EdgeDetector, EventCoverage};
pub use signal::{SequenceSummary, SignalSampler, SignalSnapshot};
