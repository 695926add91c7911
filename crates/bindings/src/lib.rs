//! Python bindings for the instruction injection core.
//!
//! This crate exposes the core to a cocotb testbench via PyO3. It provides:
//! 1. **Injector:** `PyInjector` holds the pending queue and instruction monitor and
//!    is stepped once per clock edge from the testbench.
//! 2. **Sampler:** `PySignalSampler` for generic designs without an instruction stream.
//! 3. **Statistics:** `PyStats` for counters and selective section printing.
//! 4. **Utilities:** Decoding, version string and log subscriber setup.

use pyo3::prelude::*;

/// Python dict and JSON conversion helpers.
pub mod conversion;
/// Injector binding (`PyInjector`).
pub mod injector;
/// Generic sampler binding (`PySignalSampler`).
pub mod sampler;
/// Statistics binding (`PyStats`).
pub mod stats;
/// Utility functions (decode, version, logging).
pub mod utils;

/// Registers all classes and functions onto the given Python module.
///
/// Called from the `#[pymodule]` entry point to expose `PyInjector`,
/// `PySignalSampler`, `PyStats`, `decode`, `version` and `init_logging`.
///
/// # Arguments
///
/// * `m` - The Python module to register types and functions on.
///
/// # Returns
///
/// `Ok(())` on success, or a `PyErr` if registration fails.
pub fn register_module(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<injector::PyInjector>()?;
    m.add_class::<sampler::PySignalSampler>()?;
    m.add_class::<stats::PyStats>()?;

    m.add_function(wrap_pyfunction!(utils::decode, m)?)?;
    m.add_function(wrap_pyfunction!(utils::version, m)?)?;
    m.add_function(wrap_pyfunction!(utils::init_logging, m)?)?;

    Ok(())
}

#[pymodule]
fn covinject(m: &Bound<'_, PyModule>) -> PyResult<()> {
    register_module(m)
}
