//! Python bindings for the runebuf bridge copy primitive.
//!
//! The native extension is named `_runebuf`. It wraps the C ABI in
//! `runebuf-ffi`: NumPy arrays are borrowed (read-only for the source,
//! read-write for the destination) for the duration of the call, and the
//! GIL is released while the bytes move.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![allow(unsafe_code)]

use pyo3::prelude::*;

mod buffer;
mod copy;
mod error;

/// The native `_runebuf` extension module.
#[pymodule]
fn _runebuf(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(copy::copy, m)?)?;
    m.add_function(wrap_pyfunction!(copy::copy_elements, m)?)?;

    m.add_function(wrap_pyfunction!(buffer::new_byte_buffer, m)?)?;
    m.add_function(wrap_pyfunction!(buffer::new_short_buffer, m)?)?;
    m.add_function(wrap_pyfunction!(buffer::new_int_buffer, m)?)?;
    m.add_function(wrap_pyfunction!(buffer::new_float_buffer, m)?)?;

    Ok(())
}
