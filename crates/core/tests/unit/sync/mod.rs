//! # Synchronizer Unit Tests


/// Stuck-at-buffer and stuck-at-pc recovery.
pub mod recovery;
