//! Generic coverage database.
//!
//! Ordered duration buckets, ordered peak-concurrency buckets, the 2-D
//! duration x peak table and named event bins. Counters never decrease.
//! Bucket indices past the end of a table saturate into its last bucket.

use serde::{Deserialize, Serialize};

use crate::config::SamplerConfig;
use crate::sampler::events::EventCoverage;

/// Counters filled by the generic signal sampler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenericCoverageDatabase {
    /// Sequences per duration bucket.
    pub duration: Vec<u64>,
    /// Sequences per peak-concurrency bucket.
    pub peak: Vec<u64>,
    /// `combined[duration][peak]` sequence counts.
    pub combined: Vec<Vec<u64>>,
    /// Named event bins.
    pub misc_bins: EventCoverage,
}

/// Index actually used for a bucket, and whether it was clamped.
fn clamp(index: usize, len: usize) -> (usize, bool) {
    if index < len {
        (index, false)
    } else {
        (len.saturating_sub(1), true)
    }
}

/// Increments `table[index]`, saturating into the last bucket.
fn bump(table: &mut [u64], index: usize) -> Option<(usize, bool)> {
    let (at, clamped) = clamp(index, table.len());
    let slot = table.get_mut(at)?;
    *slot += 1;
    Some((at, clamped))
}

impl GenericCoverageDatabase {
    /// Sizes every table from `config`; disabled tables are empty.
    pub fn new(config: &SamplerConfig) -> Self {
        let dur = config.duration.map_or(0, |d| d.bins);
        let peak = config.peak.map_or(0, |p| p.bins);
        let combined = if config.combined {
            vec![vec![0; peak]; dur]
        } else {
            Vec::new()
        };
        Self {
            duration: vec![0; dur],
            peak: vec![0; peak],
            combined,
            misc_bins: EventCoverage::new(config.events.iter().cloned()),
        }
    }

    /// Records one sequence in the duration table.
    ///
    /// # Returns
    ///
    /// The bucket used and whether `bucket` was clamped, or `None` if the
    /// table is disabled.
    pub fn record_duration(&mut self, bucket: usize) -> Option<(usize, bool)> {
        bump(&mut self.duration, bucket)
    }

    /// Records one sequence in the peak table.
    pub fn record_peak(&mut self, bucket: usize) -> Option<(usize, bool)> {
        bump(&mut self.peak, bucket)
    }

    /// Records one sequence in the combined table.
    pub fn record_combined(&mut self, duration: usize, peak: usize) -> Option<(usize, usize)> {
        let (d, _) = clamp(duration, self.combined.len());
        let row = self.combined.get_mut(d)?;
        let (p, _) = clamp(peak, row.len());
        *row.get_mut(p)? += 1;
        Some((d, p))
    }

    /// Total number of bins across every table.
    pub fn total_bins(&self) -> usize {
        self.duration.len()
            + self.peak.len()
            + self.combined.iter().map(Vec::len).sum::<usize>()
            + self.misc_bins.len()
    }

    /// Number of bins hit at least once.
    pub fn hit_bins(&self) -> usize {
        let nonzero = |t: &[u64]| t.iter().filter(|&&c| c > 0).count();
        nonzero(&self.duration)
            + nonzero(&self.peak)
            + self.combined.iter().map(|row| nonzero(row)).sum::<usize>()
            + self.misc_bins.hit_bins()
    }

    /// Fraction of bins hit at least once, in `[0.0, 1.0]`.
    pub fn coverage_rate(&self) -> f64 {
        let total = self.total_bins();
        if total == 0 {
            return 0.0;
        }
        self.hit_bins() as f64 / total as f64
    }
}
