//! Named event coverage.
//!
//! For DUTs whose bins are discrete events (`full`, `empty`, `overflow`, ...)
//! rather than durations. Bins are declared up front; hitting an undeclared
//! name is an error so typos cannot silently create new bins.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::common::SamplerError;

/// Counters for a fixed set of named events.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventCoverage {
    bins: BTreeMap<String, u64>,
}

impl EventCoverage {
    /// Declares `names`, each starting at zero. Duplicates collapse.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            bins: names.into_iter().map(|n| (n.into(), 0)).collect(),
        }
    }

    /// Increments `name`.
    ///
    /// # Errors
    ///
    /// Returns `SamplerError::UnknownEvent` if `name` was never declared.
    pub fn hit(&mut self, name: &str) -> Result<u64, SamplerError> {
        let count = self
            .bins
            .get_mut(name)
            .ok_or_else(|| SamplerError::UnknownEvent(name.to_owned()))?;
        *count += 1;
        Ok(*count)
    }

    /// Hit count of `name`, or `None` if undeclared.
    pub fn hits(&self, name: &str) -> Option<u64> {
        self.bins.get(name).copied()
    }

    /// Whether `name` was declared.
    pub fn contains(&self, name: &str) -> bool {
        self.bins.contains_key(name)
    }

    /// Iterates `(name, count)` in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.bins.iter().map(|(k, &v)| (k.as_str(), v))
    }

    /// Number of declared bins.
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Whether no bins were declared.
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Number of declared bins hit at least once.
    pub fn hit_bins(&self) -> usize {
        self.bins.values().filter(|&&c| c > 0).count()
    }
}

/// Rising-edge detector for a level signal.
///
/// The first observed level never counts as an edge, so a signal that is
/// already high out of reset is not reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EdgeDetector {
    prev: Option<bool>,
}

impl EdgeDetector {
    /// Creates a detector with no history.
    pub const fn new() -> Self {
        Self { prev: None }
    }

    /// Feeds the current level; returns true on a low-to-high transition.
    pub fn update(&mut self, level: bool) -> bool {
        let rising = level && self.prev == Some(false);
        self.prev = Some(level);
        rising
    }

    /// Forgets the previous level.
    pub fn reset(&mut self) {
        self.prev = None;
    }
}
