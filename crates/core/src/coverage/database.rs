//! Instruction coverage database.
//!
//! Holds one counter per legal self-bin and per legal cross-bin of the
//! taxonomy. Every legal bin is present (at zero) from construction, counts
//! only ever increase, and illegal bins are rejected rather than created.
//!
//! Serialized as nested maps so the report is valid JSON:
//!
//! ```text
//! { "instructions": { "add": { "seen": 3, ... }, ... },
//!   "cross_coverage": { "add": { "sub": { "raw_hazard": 1 }, ... }, ... } }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::coverage::bins::{self, CoverageBin};
use crate::isa::instruction::Mnemonic;

/// Self-bin counters for one mnemonic.
pub type SelfCounters = BTreeMap<CoverageBin, u64>;

/// Cross-bin counters for one mnemonic, keyed by prior mnemonic.
pub type CrossCounters = BTreeMap<Mnemonic, BTreeMap<CoverageBin, u64>>;

/// Counters for every legal bin of the instruction taxonomy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageDatabase {
    instructions: BTreeMap<Mnemonic, SelfCounters>,
    cross_coverage: BTreeMap<Mnemonic, CrossCounters>,
}

impl Default for CoverageDatabase {
    fn default() -> Self {
        Self::new()
    }
}

impl CoverageDatabase {
    /// Creates a database with every legal bin at zero.
    pub fn new() -> Self {
        let mut instructions = BTreeMap::new();
        let mut cross_coverage = BTreeMap::new();
        for mnemonic in Mnemonic::ALL {
            let form = mnemonic.form();
            let own: SelfCounters = bins::self_bins(form).iter().map(|&b| (b, 0)).collect();
            let mut cross = CrossCounters::new();
            for (prior, bin) in bins::cross_bins(form) {
                let _ = cross.entry(prior).or_default().insert(bin, 0);
            }
            let _ = instructions.insert(mnemonic, own);
            let _ = cross_coverage.insert(mnemonic, cross);
        }
        Self {
            instructions,
            cross_coverage,
        }
    }

    /// Increments a self-bin.
    ///
    /// # Returns
    ///
    /// `false` (and no change) when the bin is not legal for `mnemonic`.
    pub fn record(&mut self, mnemonic: Mnemonic, bin: CoverageBin) -> bool {
        match self
            .instructions
            .get_mut(&mnemonic)
            .and_then(|bins| bins.get_mut(&bin))
        {
            Some(count) => {
                *count += 1;
                true
            }
            None => false,
        }
    }

    /// Increments a cross-bin of `mnemonic` against the preceding `prior`.
    ///
    /// # Returns
    ///
    /// `false` (and no change) when the pair is not legal for `mnemonic`.
    pub fn record_cross(&mut self, mnemonic: Mnemonic, prior: Mnemonic, bin: CoverageBin) -> bool {
        match self
            .cross_coverage
            .get_mut(&mnemonic)
            .and_then(|priors| priors.get_mut(&prior))
            .and_then(|bins| bins.get_mut(&bin))
        {
            Some(count) => {
                *count += 1;
                true
            }
            None => false,
        }
    }

    /// Hit count of a self-bin, or `None` when the bin is illegal.
    pub fn hits(&self, mnemonic: Mnemonic, bin: CoverageBin) -> Option<u64> {
        self.instructions.get(&mnemonic)?.get(&bin).copied()
    }

    /// Hit count of a cross-bin, or `None` when the pair is illegal.
    pub fn cross_hits(&self, mnemonic: Mnemonic, prior: Mnemonic, bin: CoverageBin) -> Option<u64> {
        self.cross_coverage
            .get(&mnemonic)?
            .get(&prior)?
            .get(&bin)
            .copied()
    }

    /// Self-bin counters of one mnemonic.
    pub fn instruction(&self, mnemonic: Mnemonic) -> Option<&SelfCounters> {
        self.instructions.get(&mnemonic)
    }

    /// Cross-bin counters of one mnemonic.
    pub fn cross(&self, mnemonic: Mnemonic) -> Option<&CrossCounters> {
        self.cross_coverage.get(&mnemonic)
    }

    /// Iterates every self-bin as `(mnemonic, bin, count)`.
    pub fn iter_self(&self) -> impl Iterator<Item = (Mnemonic, CoverageBin, u64)> + '_ {
        self.instructions
            .iter()
            .flat_map(|(&m, bins)| bins.iter().map(move |(&b, &c)| (m, b, c)))
    }

    /// Iterates every cross-bin as `(mnemonic, prior, bin, count)`.
    pub fn iter_cross(&self) -> impl Iterator<Item = (Mnemonic, Mnemonic, CoverageBin, u64)> + '_ {
        self.cross_coverage.iter().flat_map(|(&m, priors)| {
            priors
                .iter()
                .flat_map(move |(&p, bins)| bins.iter().map(move |(&b, &c)| (m, p, b, c)))
        })
    }

    /// Number of legal bins (self plus cross).
    pub fn total_bins(&self) -> usize {
        self.iter_self().count() + self.iter_cross().count()
    }

    /// Number of legal bins hit at least once.
    pub fn hit_bins(&self) -> usize {
        self.iter_self().filter(|&(_, _, c)| c > 0).count()
            + self.iter_cross().filter(|&(_, _, _, c)| c > 0).count()
    }

    /// Fraction of legal bins hit at least once, in `[0.0, 1.0]`.
    ///
    /// Never decreases over the life of the database.
    pub fn coverage_rate(&self) -> f64 {
        let total = self.total_bins();
        if total == 0 {
            return 0.0;
        }
        self.hit_bins() as f64 / total as f64
    }

    /// Sum of every counter.
    pub fn total_hits(&self) -> u64 {
        self.iter_self().map(|(_, _, c)| c).sum::<u64>()
            + self.iter_cross().map(|(_, _, _, c)| c).sum::<u64>()
    }
}
