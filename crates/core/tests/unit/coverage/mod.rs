//! # Coverage Unit Tests


/// Monitor sampling, hazards and history.
pub mod monitor;
