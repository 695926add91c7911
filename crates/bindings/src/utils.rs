//! Utility functions exposed to Python.

use covinject_core::isa::Isa;
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

/// Returns the package version string.
#[pyfunction]
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

/// Decodes a 32-bit instruction word into its assembler text.
///
/// # Arguments
///
/// * `word` - Raw instruction word.
/// * `pc` - Address the word was fetched from; only affects jump direction.
/// * `isa` - `"mips"` (default) or `"rv32"`.
///
/// # Returns
///
/// Text such as `"add x5, x28, x30"`, or `None` when the opcode belongs to no
/// tracked form.
///
/// # Errors
///
/// Raises `ValueError` for an unknown ISA name or an unsupported function field.
#[pyfunction]
#[pyo3(signature = (word, pc=0, isa="mips"))]
pub fn decode(word: u32, pc: u32, isa: &str) -> PyResult<Option<String>> {
    let isa: Isa = isa.parse().map_err(PyValueError::new_err)?;
    isa.decode(word, pc)
        .map(|insn| insn.map(|i| i.to_string()))
        .map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Installs a `tracing` subscriber writing to stderr.
///
/// `filter` uses `EnvFilter` syntax (e.g. `"covinject_core=debug"`); when
/// omitted `RUST_LOG` is read, falling back to `warn`.
///
/// # Returns
///
/// `False` if a subscriber was already installed.
#[pyfunction]
#[pyo3(signature = (filter=None))]
pub fn init_logging(filter: Option<&str>) -> bool {
    use tracing_subscriber::EnvFilter;

    let filter = filter.map_or_else(
        || EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        EnvFilter::new,
    );
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .is_ok()
}
