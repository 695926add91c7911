//! Generic sampler Python binding.

use std::collections::BTreeMap;

use covinject_core::sampler::{SignalSampler, SignalSnapshot};
use covinject_core::stats::SessionStats;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::conversion::{py_dict_to_config, py_to_signal_bits, to_py_object};
use crate::stats::PyStats;

/// Python-exposed generic signal sampler.
#[pyclass(name = "SignalSampler")]
#[derive(Debug)]
pub struct PySignalSampler {
    inner: SignalSampler,
}

#[pymethods]
impl PySignalSampler {
    /// Creates a sampler from the `sampler` section of a configuration dict.
    ///
    /// # Errors
    /// Raises `ValueError` if the configuration is invalid.
    #[new]
    #[pyo3(signature = (config=None))]
    fn new(py: Python<'_>, config: Option<&Bound<'_, PyAny>>) -> PyResult<Self> {
        let config = py_dict_to_config(py, config)?;
        let inner =
            SignalSampler::new(&config.sampler).map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(Self { inner })
    }

    /// Samples one clock edge.
    ///
    /// `bits` is the observed vector: an `int` of any width, a binary or hex
    /// string, or a sequence of bools with bit 0 first.
    ///
    /// # Returns
    ///
    /// The sequence summary dict when this edge closed a sequence, else `None`.
    ///
    /// # Errors
    /// Raises `ValueError` for an undeclared event name in `levels` (the edge
    /// is then ignored) or a malformed `bits` string.
    #[pyo3(signature = (bits, ready, valid, finished=false, levels=None))]
    fn sample(
        &mut self,
        py: Python<'_>,
        bits: &Bound<'_, PyAny>,
        ready: bool,
        valid: bool,
        finished: bool,
        levels: Option<BTreeMap<String, bool>>,
    ) -> PyResult<Option<PyObject>> {
        let snapshot = SignalSnapshot {
            bits: py_to_signal_bits(bits)?,
            ready,
            valid,
            finished,
            levels: levels.unwrap_or_default(),
        };
        let summary = self
            .inner
            .sample(&snapshot)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        summary.map(|s| to_py_object(py, &s)).transpose()
    }

    /// Increments a declared event bin.
    ///
    /// # Errors
    /// Raises `ValueError` if `name` was not declared.
    fn hit(&mut self, name: &str) -> PyResult<u64> {
        self.inner
            .hit(name)
            .map_err(|e| PyValueError::new_err(e.to_string()))
    }

    /// Abandons the open sequence and forgets event history.
    fn reset(&mut self) {
        self.inner.reset();
    }

    /// Cumulative coverage as a dict of tables.
    fn coverage(&self, py: Python<'_>) -> PyResult<PyObject> {
        to_py_object(py, self.inner.coverage())
    }

    /// Fraction of bins hit so far.
    fn coverage_rate(&self) -> f64 {
        self.inner.coverage().coverage_rate()
    }

    /// Snapshot of the sampler statistics.
    fn stats(&self) -> PyStats {
        let coverage = self.inner.coverage();
        let mut stats = SessionStats::default();
        stats.sequences = self.inner.sequences();
        stats.saturations = self.inner.saturations();
        stats.bins_hit = coverage.hit_bins();
        stats.bins_total = coverage.total_bins();
        PyStats::from(stats)
    }
}
