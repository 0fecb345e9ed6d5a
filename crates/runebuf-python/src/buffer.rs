//! Zeroed NumPy array constructors: `new_byte_buffer` and friends.

use numpy::PyArray1;
use pyo3::prelude::*;

use runebuf_core::{BridgeConfig, Element};

use crate::error::buffer_error;

/// A zeroed array, refused with `MemoryError` past the direct-buffer limit.
fn zeroed<'py, E>(py: Python<'py>, count: usize) -> PyResult<Bound<'py, PyArray1<E>>>
where
    E: Element + numpy::Element,
{
    BridgeConfig::default()
        .buffer_bytes(E::KIND, count)
        .map_err(buffer_error)?;
    Ok(PyArray1::zeros(py, count, false))
}

/// A zeroed `uint8` array of `count` bytes.
#[pyfunction]
pub(crate) fn new_byte_buffer(py: Python<'_>, count: usize) -> PyResult<Bound<'_, PyArray1<u8>>> {
    zeroed(py, count)
}

/// A zeroed `int16` array of `count` elements.
#[pyfunction]
pub(crate) fn new_short_buffer(py: Python<'_>, count: usize) -> PyResult<Bound<'_, PyArray1<i16>>> {
    zeroed(py, count)
}

/// A zeroed `int32` array of `count` elements.
#[pyfunction]
pub(crate) fn new_int_buffer(py: Python<'_>, count: usize) -> PyResult<Bound<'_, PyArray1<i32>>> {
    zeroed(py, count)
}

/// A zeroed `float32` array of `count` elements.
#[pyfunction]
pub(crate) fn new_float_buffer(py: Python<'_>, count: usize) -> PyResult<Bound<'_, PyArray1<f32>>> {
    zeroed(py, count)
}
