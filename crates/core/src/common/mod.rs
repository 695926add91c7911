//! Common types shared by every component of the injection core.
//!
//! This module provides:
//! 1. **Error Handling:** Decode, synchronizer, sampler and configuration errors.
//! 2. **Constants:** Field masks shared by both instruction-set front-ends.

/// Field masks and widths shared by the decoders.
pub mod constants;

/// Error types and the crate `Result` alias.
pub mod error;

pub use error::{ConfigError, DecodeError, Error, Result, SamplerError, SyncError};
