//! Configuration system for the injection core.
//!
//! This module defines the configuration structures used to parameterize a
//! session. It provides:
//! 1. **Defaults:** Queue bound, liveness thresholds and the append budget.
//! 2. **Structures:** Hierarchical config for the synchronizer and the generic sampler.
//! 3. **Enums:** Instruction set and peak-concurrency mode.
//!
//! Configuration is supplied as JSON (from the Python API or the CLI) or taken
//! from `Config::default()`. Call [`Config::validate`] before building a session.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::common::ConfigError;
use crate::isa::Isa;

/// Default configuration constants.
mod defaults {
    /// Maximum number of words waiting to be fetched.
    pub const QUEUE_CAPACITY: usize = 5;

    /// Consecutive non-matching edges before the head is evicted.
    pub const STUCK_BUFFER_CYCLES: u32 = 10;

    /// Matches without PC movement tolerated before the head is evicted.
    pub const STUCK_PC_MATCHES: u32 = 10;

    /// Edges an exchange may spend blocked on a full queue, and again
    /// draining it, before it is rejected.
    pub const APPEND_CYCLE_BUDGET: u64 = 1024;

    /// Edges a generic sequence may run before it is rejected.
    pub const SEQUENCE_CYCLE_BUDGET: u64 = 4096;

    /// Width of the sampled signal vector.
    pub const SIGNAL_WIDTH: usize = 8;

    /// Divisor applied to duration counts.
    pub const DURATION_DIVISOR: u64 = 1;
}

/// Top-level configuration for a session.
///
/// # Examples
///
/// ```
/// use covinject_core::config::{Config, PeakMode};
/// use covinject_core::isa::Isa;
///
/// let json = r#"{
///     "isa": "rv32",
///     "sync": { "queue_capacity": 3 },
///     "sampler": {
///         "width": 4,
///         "duration": { "bins": 8, "signal": 0 },
///         "peak": { "mode": "rolling", "bins": 5 },
///         "combined": true
///     }
/// }"#;
///
/// let config = Config::from_json_str(json).unwrap();
/// assert_eq!(config.isa, Isa::Rv32);
/// assert_eq!(config.sync.queue_capacity, 3);
/// assert_eq!(config.sync.stuck_buffer_cycles, 10);
/// assert_eq!(config.sampler.peak.unwrap().mode, PeakMode::Rolling);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Instruction set of the CPU DUT.
    #[serde(default)]
    pub isa: Isa,
    /// Injection synchronizer settings.
    #[serde(default)]
    pub sync: SyncConfig,
    /// Generic signal sampler settings.
    #[serde(default)]
    pub sampler: SamplerConfig,
}

impl Config {
    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Parse` for malformed JSON and
    /// `ConfigError::Invalid` for out-of-range values.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Io` if the file cannot be read, otherwise as
    /// [`Config::from_json_str`].
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Checks every section for values a session cannot run with.
    ///
    /// # Errors
    ///
    /// Returns the first `ConfigError::Invalid` found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.sync.validate()?;
        self.sampler.validate()
    }
}

/// Injection synchronizer settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Bound of the pending instruction queue.
    #[serde(default = "SyncConfig::default_queue_capacity")]
    pub queue_capacity: usize,

    /// Consecutive non-matching edges that trigger stuck-at-buffer recovery.
    #[serde(default = "SyncConfig::default_stuck_buffer_cycles")]
    pub stuck_buffer_cycles: u32,

    /// PC-unchanged matches that must be exceeded to trigger stuck-at-pc recovery.
    #[serde(default = "SyncConfig::default_stuck_pc_matches")]
    pub stuck_pc_matches: u32,

    /// Edges an exchange may block on a full queue, and separately spend draining.
    #[serde(default = "SyncConfig::default_append_cycle_budget")]
    pub append_cycle_budget: u64,
}

impl SyncConfig {
    fn default_queue_capacity() -> usize {
        defaults::QUEUE_CAPACITY
    }

    fn default_stuck_buffer_cycles() -> u32 {
        defaults::STUCK_BUFFER_CYCLES
    }

    fn default_stuck_pc_matches() -> u32 {
        defaults::STUCK_PC_MATCHES
    }

    fn default_append_cycle_budget() -> u64 {
        defaults::APPEND_CYCLE_BUDGET
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.queue_capacity == 0 {
            return Err(ConfigError::invalid("sync.queue_capacity", "must be at least 1"));
        }
        if self.stuck_buffer_cycles == 0 {
            return Err(ConfigError::invalid(
                "sync.stuck_buffer_cycles",
                "must be at least 1",
            ));
        }
        if self.append_cycle_budget == 0 {
            return Err(ConfigError::invalid(
                "sync.append_cycle_budget",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            queue_capacity: defaults::QUEUE_CAPACITY,
            stuck_buffer_cycles: defaults::STUCK_BUFFER_CYCLES,
            stuck_pc_matches: defaults::STUCK_PC_MATCHES,
            append_cycle_budget: defaults::APPEND_CYCLE_BUDGET,
        }
    }
}

/// Peak-concurrency measurement mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeakMode {
    /// High-water mark of the number of high bits in one cycle.
    #[default]
    Floating,
    /// Cursor from bit 0 that advances each gated cycle the bit under it is high.
    Rolling,
}

/// Duration bin settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DurationConfig {
    /// Number of duration buckets.
    pub bins: usize,
    /// Divisor applied to the high-cycle count before bucketing.
    #[serde(default = "DurationConfig::default_divisor")]
    pub divisor: u64,
    /// Bit index (0 = least significant) of the tracked signal.
    pub signal: usize,
}

impl DurationConfig {
    fn default_divisor() -> u64 {
        defaults::DURATION_DIVISOR
    }
}

/// Peak-concurrency bin settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeakConfig {
    /// Measurement mode.
    #[serde(default)]
    pub mode: PeakMode,
    /// Number of peak buckets.
    pub bins: usize,
}

/// Generic signal sampler settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Number of bits in the sampled vector.
    #[serde(default = "SamplerConfig::default_width")]
    pub width: usize,

    /// Duration bins, if tracked.
    #[serde(default)]
    pub duration: Option<DurationConfig>,

    /// Peak-concurrency bins, if tracked.
    #[serde(default)]
    pub peak: Option<PeakConfig>,

    /// Whether to keep the duration x peak table. Requires both of the above.
    #[serde(default)]
    pub combined: bool,

    /// Named event bins.
    #[serde(default)]
    pub events: Vec<String>,

    /// Edges a generic sequence may run before it is rejected.
    #[serde(default = "SamplerConfig::default_sequence_cycle_budget")]
    pub sequence_cycle_budget: u64,
}

impl SamplerConfig {
    fn default_width() -> usize {
        defaults::SIGNAL_WIDTH
    }

    fn default_sequence_cycle_budget() -> u64 {
        defaults::SEQUENCE_CYCLE_BUDGET
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::invalid("sampler.width", "must be at least 1"));
        }
        if let Some(d) = &self.duration {
            if d.bins == 0 {
                return Err(ConfigError::invalid("sampler.duration.bins", "must be at least 1"));
            }
            if d.divisor == 0 {
                return Err(ConfigError::invalid("sampler.duration.divisor", "must be at least 1"));
            }
            if d.signal >= self.width {
                return Err(ConfigError::invalid(
                    "sampler.duration.signal",
                    format!("bit {} is outside a {}-bit vector", d.signal, self.width),
                ));
            }
        }
        if let Some(p) = &self.peak
            && p.bins == 0
        {
            return Err(ConfigError::invalid("sampler.peak.bins", "must be at least 1"));
        }
        if self.combined && (self.duration.is_none() || self.peak.is_none()) {
            return Err(ConfigError::invalid(
                "sampler.combined",
                "requires both duration and peak bins",
            ));
        }
        if self.sequence_cycle_budget == 0 {
            return Err(ConfigError::invalid(
                "sampler.sequence_cycle_budget",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            width: defaults::SIGNAL_WIDTH,
            duration: None,
            peak: None,
            combined: false,
            events: Vec::new(),
            sequence_cycle_budget: defaults::SEQUENCE_CYCLE_BUDGET,
        }
    }
}
