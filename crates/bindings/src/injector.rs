//! Injector Python binding.
//!
//! The testbench owns the clock. Each edge it drives `head()` onto the
//! instruction bus, samples the fetch stage and calls `observe`. When
//! `observe` returns a recovery event, the testbench runs its reset sequence
//! before the next edge.

use covinject_core::coverage::InstructionMonitor;
use covinject_core::stats::SessionStats;
use covinject_core::sync::{CycleOutcome, FetchSnapshot, InjectionSynchronizer};
use pyo3::prelude::*;
use tracing::info;

use crate::conversion::{py_dict_to_config, to_py_object};
use crate::stats::PyStats;

/// Python-exposed injector: pending queue plus instruction coverage.
#[pyclass(name = "Injector")]
#[derive(Debug)]
pub struct PyInjector {
    sync: InjectionSynchronizer,
    monitor: InstructionMonitor,
    resets: u64,
}

const fn outcome_name(outcome: &CycleOutcome) -> &'static str {
    match outcome {
        CycleOutcome::Idle => "idle",
        CycleOutcome::Waiting => "waiting",
        CycleOutcome::Matched => "matched",
        CycleOutcome::Retired { .. } => "retired",
        CycleOutcome::Recovered(_) => "recovered",
    }
}

#[pymethods]
impl PyInjector {
    /// Creates an injector.
    ///
    /// # Arguments
    /// * `config` - Optional configuration dict (`isa`, `sync`); defaults otherwise.
    ///
    /// # Errors
    /// Raises `ValueError` if the configuration is invalid.
    #[new]
    #[pyo3(signature = (config=None))]
    fn new(py: Python<'_>, config: Option<&Bound<'_, PyAny>>) -> PyResult<Self> {
        let config = py_dict_to_config(py, config)?;
        info!(isa = %config.isa, capacity = config.sync.queue_capacity, "injector created");
        Ok(Self {
            sync: InjectionSynchronizer::new(&config.sync),
            monitor: InstructionMonitor::new(config.isa),
            resets: 0,
        })
    }

    /// Appends a word; returns `False` when the queue is full.
    fn append(&mut self, word: u32) -> bool {
        self.sync.try_append(word)
    }

    /// Word to drive onto the instruction bus, or `None` when idle.
    fn head(&self) -> Option<u32> {
        self.sync.head()
    }

    /// Pending words from head to tail.
    fn pending(&self) -> Vec<u32> {
        self.sync.pending().collect()
    }

    #[getter]
    fn depth(&self) -> usize {
        self.sync.depth()
    }

    #[getter]
    fn capacity(&self) -> usize {
        self.sync.capacity()
    }

    fn is_full(&self) -> bool {
        self.sync.is_full()
    }

    /// Observes one clock edge of the fetch stage.
    ///
    /// # Returns
    ///
    /// `(outcome, recovery)` where outcome is one of `"idle"`, `"waiting"`,
    /// `"matched"`, `"retired"` or `"recovered"`. `recovery` is `None` unless
    /// a liveness guard fired, in which case it is
    /// `{"kind": "stuck_at_buffer" | "stuck_at_pc", "word": ..., "cycle": ...}`
    /// and the DUT must be reset before the next edge.
    fn observe(
        &mut self,
        py: Python<'_>,
        instruction: u32,
        fetch_valid: bool,
        pc: u32,
    ) -> PyResult<(&'static str, Option<PyObject>)> {
        let snapshot = FetchSnapshot {
            instruction,
            fetch_valid,
            pc,
        };
        let outcome = self.sync.observe(&snapshot, &mut self.monitor);
        let recovery = match &outcome {
            CycleOutcome::Recovered(event) => {
                self.resets += 1;
                Some(to_py_object(py, event)?)
            }
            _ => None,
        };
        Ok((outcome_name(&outcome), recovery))
    }

    /// Tells the injector the DUT was reset outside a recovery.
    fn notify_reset(&mut self) {
        self.sync.notify_reset();
        self.monitor.clear_history();
        self.resets += 1;
    }

    /// Cumulative coverage as nested dicts:
    /// `{"instructions": {mnemonic: {bin: n}}, "cross_coverage": {mnemonic: {prior: {bin: n}}}}`.
    fn coverage(&self, py: Python<'_>) -> PyResult<PyObject> {
        to_py_object(py, self.monitor.coverage())
    }

    /// Fraction of legal bins hit so far.
    fn coverage_rate(&self) -> f64 {
        self.monitor.coverage().coverage_rate()
    }

    /// Last sampled instruction as `{"last_pc": ..., "last_insn": ...}`.
    fn state(&self, py: Python<'_>) -> PyResult<PyObject> {
        to_py_object(py, &self.monitor.state())
    }

    /// Snapshot of the injector statistics.
    fn stats(&self) -> PyStats {
        let coverage = self.monitor.coverage();
        let mut stats = SessionStats::default();
        stats.resets = self.resets;
        stats.sync = *self.sync.stats();
        stats.decode = *self.monitor.stats();
        stats.bins_hit = coverage.hit_bins();
        stats.bins_total = coverage.total_bins();
        PyStats::from(stats)
    }
}
