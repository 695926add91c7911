//! Python/Rust value conversion.
//!
//! Configuration dicts and coverage reports cross the boundary as JSON so the
//! same schema is used from both Python and the CLI.

use covinject_core::config::Config;
use covinject_core::sampler::SignalBits;
use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;
use pyo3::types::{PyBytes, PyInt, PyString};
use serde::Serialize;

/// Converts an optional Python dict to a validated `Config`.
///
/// The dict is serialized with `json.dumps` and deserialized into `Config`.
/// `None` yields the default configuration.
///
/// # Errors
///
/// Returns `ValueError` if the dict does not match the schema or fails validation.
pub fn py_dict_to_config(py: Python<'_>, dict: Option<&Bound<'_, PyAny>>) -> PyResult<Config> {
    let Some(dict) = dict else {
        return Ok(Config::default());
    };
    let json = py.import("json")?;
    let text: String = json.call_method1("dumps", (dict,))?.extract()?;
    Config::from_json_str(&text).map_err(|e| PyValueError::new_err(e.to_string()))
}

/// Converts any serializable value to the equivalent Python object via `json.loads`.
///
/// # Errors
///
/// Returns `ValueError` if serialization fails.
pub fn to_py_object<T: Serialize>(py: Python<'_>, value: &T) -> PyResult<PyObject> {
    let text = serde_json::to_string(value)
        .map_err(|e| PyValueError::new_err(format!("failed to serialize: {e}")))?;
    let json = py.import("json")?;
    Ok(json.call_method1("loads", (text,))?.unbind())
}

/// Converts a sampled Python vector to [`SignalBits`].
///
/// Accepts a non-negative `int` of any width, a `str` (`"0x..."`, `"0b..."` or
/// a bare binary string most significant bit first) or a sequence of bools
/// with bit 0 first.
///
/// # Errors
///
/// Returns `ValueError` for a negative int or a malformed string and
/// `TypeError` for anything else.
pub fn py_to_signal_bits(value: &Bound<'_, PyAny>) -> PyResult<SignalBits> {
    if let Ok(int) = value.downcast::<PyInt>() {
        if int.lt(0)? {
            return Err(PyValueError::new_err("bit-vector must be non-negative"));
        }
        let bit_length: usize = int.call_method0("bit_length")?.extract()?;
        let bytes = int
            .call_method1("to_bytes", (bit_length.div_ceil(8).max(1), "little"))?
            .downcast_into::<PyBytes>()?;
        return Ok(SignalBits::from_le_bytes(bytes.as_bytes()));
    }
    if let Ok(text) = value.downcast::<PyString>() {
        return text
            .to_str()?
            .parse::<SignalBits>()
            .map_err(|e| PyValueError::new_err(e.to_string()));
    }
    value
        .extract::<Vec<bool>>()
        .map(SignalBits::from_bools)
        .map_err(|_| PyTypeError::new_err("bits must be an int, a str or a sequence of bools"))
}
