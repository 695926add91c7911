//! Injection Synchronization.
//!
//! Keeps externally supplied instructions in step with a pipeline that may
//! stall, alias or deadlock.
//!
//! # Structure
//!
//! - `signals`: Fetch snapshots, DUT state and recovery events.
//! - `queue`: The bounded pending instruction queue.
//! - `synchronizer`: Per-edge head tracking with stuck-at recovery.

/// Bounded FIFO of pending words.
pub mod queue;

/// Per-cycle views and events.
pub mod signals;

/// Head tracking and liveness guards.
pub mod synchronizer;

pub use signals::{CycleOutcome, DutState, FetchSnapshot, RecoveryEvent, RecoveryKind};
pub use synchronizer::{InjectionSynchronizer, SyncStats};
