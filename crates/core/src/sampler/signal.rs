//! Generic signal-coverage sampler.
//!
//! Turns a per-cycle boolean vector into bin hits for DUTs without an
//! instruction stream (prefetchers, weight banks, FIFOs). A sequence runs
//! from the first gated cycle to the gated cycle on which `finished` is high;
//! that closing cycle is not itself measured. Counters update exactly once
//! per finished sequence:
//!
//! 1. **Duration:** gated cycles with the tracked bit high, bucket
//!    `ceil(total / divisor)`.
//! 2. **Peak:** [`PeakMode::Floating`] keeps the largest popcount seen;
//!    [`PeakMode::Rolling`] advances a cursor from bit 0 each gated cycle the
//!    bit under it is high.
//! 3. **Combined:** `combined[duration][peak] += 1`.
//!
//! Ungated cycles (ready or valid low) are ignored. Event levels are edge
//! detected on every cycle, gated or not. The vector may be of any width;
//! bits at or above the configured width are ignored.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::common::SamplerError;
use crate::config::{PeakMode, SamplerConfig};
use crate::sampler::bits::SignalBits;
use crate::sampler::database::GenericCoverageDatabase;
use crate::sampler::events::EdgeDetector;

/// Signals sampled on one clock edge of a generic DUT. Omitted fields read
/// low when deserialized.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalSnapshot {
    /// Observed vector, bit 0 least significant.
    pub bits: SignalBits,
    /// Ready half of the sample gate.
    pub ready: bool,
    /// Valid half of the sample gate.
    pub valid: bool,
    /// Closes the current sequence when gated.
    pub finished: bool,
    /// Named event levels, edge detected into the event bins.
    pub levels: BTreeMap<String, bool>,
}

impl SignalSnapshot {
    /// A gated, unfinished cycle observing a vector of at most 64 bits.
    pub fn gated(bits: u64) -> Self {
        Self::gated_bits(SignalBits::from(bits))
    }

    /// A gated, unfinished cycle observing `bits`.
    pub fn gated_bits(bits: SignalBits) -> Self {
        Self {
            bits,
            ready: true,
            valid: true,
            ..Self::default()
        }
    }

    /// A gated cycle that closes the sequence.
    pub fn finish() -> Self {
        Self {
            finished: true,
            ..Self::gated_bits(SignalBits::new())
        }
    }

    /// Whether the sample gate is open.
    pub const fn is_gated(&self) -> bool {
        self.ready && self.valid
    }

    /// Adds a named event level.
    #[must_use]
    pub fn with_level(mut self, name: impl Into<String>, high: bool) -> Self {
        let _ = self.levels.insert(name.into(), high);
        self
    }
}

/// Measurements of one finished sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SequenceSummary {
    /// Gated cycles measured.
    pub cycles: u64,
    /// Gated cycles with the tracked bit high.
    pub high_cycles: u64,
    /// Duration bucket recorded, if duration is tracked.
    pub duration_bucket: Option<usize>,
    /// Peak bucket recorded, if peak is tracked.
    pub peak_bucket: Option<usize>,
}

/// Per-session generic sampler.
#[derive(Debug, Clone)]
pub struct SignalSampler {
    config: SamplerConfig,
    width: usize,
    coverage: GenericCoverageDatabase,
    edges: BTreeMap<String, EdgeDetector>,
    gated_cycles: u64,
    high_cycles: u64,
    /// Floating high-water mark, or the rolling cursor.
    peak: usize,
    sequences: u64,
    saturations: u64,
}

impl SignalSampler {
    /// Builds a sampler with empty tables sized from `config`.
    ///
    /// # Errors
    ///
    /// Returns `SamplerError::SignalOutOfRange` if the duration signal does
    /// not fit in the configured width.
    pub fn new(config: &SamplerConfig) -> Result<Self, SamplerError> {
        let width = config.width.max(1);
        if let Some(d) = &config.duration
            && d.signal >= width
        {
            return Err(SamplerError::SignalOutOfRange {
                index: d.signal,
                width,
            });
        }
        Ok(Self {
            config: config.clone(),
            width,
            coverage: GenericCoverageDatabase::new(config),
            edges: config
                .events
                .iter()
                .map(|n| (n.clone(), EdgeDetector::new()))
                .collect(),
            gated_cycles: 0,
            high_cycles: 0,
            peak: 0,
            sequences: 0,
            saturations: 0,
        })
    }

    /// Samples one clock edge.
    ///
    /// # Returns
    ///
    /// `Some` when this edge closed a sequence.
    ///
    /// # Errors
    ///
    /// Returns `SamplerError::UnknownEvent` for a level whose name was not
    /// declared in the configuration. The edge is then rejected whole:
    /// nothing is measured, no sequence closes and no event is counted.
    pub fn sample(
        &mut self,
        snapshot: &SignalSnapshot,
    ) -> Result<Option<SequenceSummary>, SamplerError> {
        if let Some(name) = snapshot
            .levels
            .keys()
            .find(|name| !self.edges.contains_key(*name))
        {
            return Err(SamplerError::UnknownEvent(name.clone()));
        }
        self.sample_levels(&snapshot.levels)?;

        if !snapshot.is_gated() {
            return Ok(None);
        }
        if snapshot.finished {
            return Ok(Some(self.close_sequence()));
        }
        self.measure(&snapshot.bits);
        Ok(None)
    }

    fn sample_levels(&mut self, levels: &BTreeMap<String, bool>) -> Result<(), SamplerError> {
        for (name, &high) in levels {
            if let Some(edge) = self.edges.get_mut(name)
                && edge.update(high)
            {
                let _ = self.coverage.misc_bins.hit(name)?;
            }
        }
        Ok(())
    }

    fn measure(&mut self, bits: &SignalBits) {
        self.gated_cycles += 1;
        if let Some(d) = &self.config.duration
            && bits.bit(d.signal)
        {
            self.high_cycles += 1;
        }
        if let Some(p) = &self.config.peak {
            match p.mode {
                PeakMode::Floating => {
                    self.peak = self.peak.max(bits.count_ones_below(self.width));
                }
                PeakMode::Rolling => {
                    if self.peak < self.width && bits.bit(self.peak) {
                        self.peak += 1;
                    }
                }
            }
        }
        trace!(
            bits = format_args!("{bits:#x}"),
            high = self.high_cycles,
            peak = self.peak,
            "gated cycle"
        );
    }

    fn close_sequence(&mut self) -> SequenceSummary {
        let duration_bucket = self
            .config
            .duration
            .map(|d| self.high_cycles.div_ceil(d.divisor.max(1)) as usize);
        let peak_bucket = self.config.peak.map(|_| self.peak);

        if let Some(bucket) = duration_bucket
            && let Some((_, clamped)) = self.coverage.record_duration(bucket)
        {
            self.note_saturation("duration", bucket, clamped);
        }
        if let Some(bucket) = peak_bucket
            && let Some((_, clamped)) = self.coverage.record_peak(bucket)
        {
            self.note_saturation("peak", bucket, clamped);
        }
        if let (Some(d), Some(p)) = (duration_bucket, peak_bucket) {
            let _ = self.coverage.record_combined(d, p);
        }

        let summary = SequenceSummary {
            cycles: self.gated_cycles,
            high_cycles: self.high_cycles,
            duration_bucket,
            peak_bucket,
        };
        self.sequences += 1;
        debug!(
            sequence = self.sequences,
            cycles = summary.cycles,
            duration = ?duration_bucket,
            peak = ?peak_bucket,
            "sequence finished"
        );
        self.gated_cycles = 0;
        self.high_cycles = 0;
        self.peak = 0;
        summary
    }

    fn note_saturation(&mut self, table: &'static str, bucket: usize, clamped: bool) {
        if clamped {
            self.saturations += 1;
            warn!(table, bucket, "bucket past the end of the table, saturated into last bin");
        }
    }

    /// Abandons the sequence in progress and forgets event history.
    pub fn reset(&mut self) {
        self.gated_cycles = 0;
        self.high_cycles = 0;
        self.peak = 0;
        for edge in self.edges.values_mut() {
            edge.reset();
        }
    }

    /// Increments a named event bin directly.
    ///
    /// # Errors
    ///
    /// Returns `SamplerError::UnknownEvent` if `name` was not declared.
    pub fn hit(&mut self, name: &str) -> Result<u64, SamplerError> {
        self.coverage.misc_bins.hit(name)
    }

    /// Accumulated coverage.
    pub const fn coverage(&self) -> &GenericCoverageDatabase {
        &self.coverage
    }

    /// Sequences closed so far.
    pub const fn sequences(&self) -> u64 {
        self.sequences
    }

    /// Buckets that were clamped into the last bin.
    pub const fn saturations(&self) -> u64 {
        self.saturations
    }

    /// Whether a sequence has gated cycles pending.
    pub const fn in_sequence(&self) -> bool {
        self.gated_cycles > 0
    }
}
