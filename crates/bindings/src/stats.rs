//! Statistics Python binding.
//!
//! Exposes session statistics to Python: getters for the headline counters,
//! `print` / `print_sections` for human-readable output and `to_dict` for
//! JSON-serializable export.

use covinject_core::stats::SessionStats;
use pyo3::prelude::*;
use pyo3::types::PyDict;

/// Python-exposed statistics: wraps `SessionStats` for read and print from Python.
#[pyclass(name = "Stats")]
#[derive(Clone, Debug)]
pub struct PyStats {
    /// Wrapped statistics.
    pub inner: SessionStats,
}

#[pymethods]
impl PyStats {
    #[getter]
    fn cycles(&self) -> u64 {
        self.inner.sync.cycles
    }

    #[getter]
    fn resets(&self) -> u64 {
        self.inner.resets
    }

    #[getter]
    fn retired(&self) -> u64 {
        self.inner.sync.retired
    }

    #[getter]
    fn stuck_at_buffer(&self) -> u64 {
        self.inner.sync.stuck_at_buffer
    }

    #[getter]
    fn stuck_at_pc(&self) -> u64 {
        self.inner.sync.stuck_at_pc
    }

    #[getter]
    fn sequences(&self) -> u64 {
        self.inner.sequences
    }

    #[getter]
    fn coverage_rate(&self) -> f64 {
        self.inner.coverage_rate()
    }

    /// Print all stats (full dump).
    fn print(&self) {
        self.inner.print();
    }

    /// Print only the given sections. Options: "summary", "sync", "decode", "sampler".
    /// Pass an empty list for full dump.
    fn print_sections(&self, sections: Vec<String>) {
        self.inner.print_sections(&sections);
    }

    /// Export all counters as a Python dict.
    fn to_dict(&self, py: Python<'_>) -> PyResult<Py<PyDict>> {
        let d = PyDict::new(py);
        let s = &self.inner;
        d.set_item("exchanges", s.exchanges)?;
        d.set_item("resets", s.resets)?;

        d.set_item("cycles", s.sync.cycles)?;
        d.set_item("appended", s.sync.appended)?;
        d.set_item("refused", s.sync.refused)?;
        d.set_item("retired", s.sync.retired)?;
        d.set_item("unchanged_matches", s.sync.unchanged_matches)?;
        d.set_item("waiting_cycles", s.sync.waiting_cycles)?;
        d.set_item("stuck_at_buffer", s.sync.stuck_at_buffer)?;
        d.set_item("stuck_at_pc", s.sync.stuck_at_pc)?;
        d.set_item("max_depth", s.sync.max_depth)?;

        d.set_item("sampled", s.decode.sampled)?;
        d.set_item("decoded", s.decode.decoded)?;
        d.set_item("undecodable", s.decode.undecodable)?;
        d.set_item("invalid_function", s.decode.invalid_function)?;
        d.set_item("self_loops", s.decode.self_loops)?;
        d.set_item("raw_hazards", s.decode.hazards)?;
        d.set_item("history_clears", s.decode.history_clears)?;

        d.set_item("sequences", s.sequences)?;
        d.set_item("saturations", s.saturations)?;

        d.set_item("bins_hit", s.bins_hit)?;
        d.set_item("bins_total", s.bins_total)?;
        d.set_item("coverage_rate", s.coverage_rate())?;
        Ok(d.unbind())
    }
}

impl From<SessionStats> for PyStats {
    fn from(inner: SessionStats) -> Self {
        Self { inner }
    }
}
