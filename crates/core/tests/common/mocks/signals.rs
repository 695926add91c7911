//! Scripted generic DUT.

use std::collections::VecDeque;

use covinject_core::sampler::SignalSnapshot;
use covinject_core::sim::SignalDut;

/// Replays a fixed list of snapshots; idles (ungated) once exhausted.
#[derive(Debug, Clone, Default)]
pub struct ScriptedSignalDut {
    pub script: VecDeque<SignalSnapshot>,
    pub applied: Vec<Vec<i64>>,
    pub resets: u32,
}

impl ScriptedSignalDut {
    pub fn new(script: impl IntoIterator<Item = SignalSnapshot>) -> Self {
        Self {
            script: script.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Appends more snapshots to the script.
    pub fn extend(&mut self, more: impl IntoIterator<Item = SignalSnapshot>) {
        self.script.extend(more);
    }
}

impl SignalDut for ScriptedSignalDut {
    fn apply(&mut self, value: &[i64]) {
        self.applied.push(value.to_vec());
    }

    fn tick(&mut self) -> SignalSnapshot {
        self.script.pop_front().unwrap_or_default()
    }

    fn reset(&mut self) {
        self.resets += 1;
    }
}
