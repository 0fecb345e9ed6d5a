//! RunebufStatus -> Python exception mapping with recovery hints.

use std::fmt::Display;

use pyo3::exceptions::{PyIndexError, PyMemoryError, PyRuntimeError, PyValueError};
use pyo3::{PyErr, PyResult};

use runebuf_core::BufferError;
use runebuf_ffi::runebuf_last_panic_message;

/// Python exception type raised for a status code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum ExceptionClass {
    Value,
    Index,
    Memory,
    Runtime,
}

fn exception_class(code: i32) -> ExceptionClass {
    match code {
        // Caller's arguments
        -1 | -4 | -6 => ExceptionClass::Value,
        // Range outside an array
        -2 => ExceptionClass::Index,
        -5 => ExceptionClass::Memory,
        _ => ExceptionClass::Runtime,
    }
}

/// Exception text for a nonzero status; `panic` is appended for -128.
fn status_message(code: i32, panic: &str) -> String {
    let (msg, hint) = error_detail(code);
    let mut full = format!("runebuf error {code}: {msg}\n  Hint: {hint}");
    if code == -128 {
        full.push_str(&format!("\n  Panic: {panic}"));
    }
    full
}

/// Check an FFI status code. Returns `Ok(())` on success, raises a typed
/// Python exception with a recovery hint on error.
pub(crate) fn check_status(code: i32) -> PyResult<()> {
    if code == 0 {
        return Ok(());
    }
    let panic = if code == -128 {
        last_panic_message()
    } else {
        String::new()
    };
    let full = status_message(code, &panic);
    Err(match exception_class(code) {
        ExceptionClass::Value => PyValueError::new_err(full),
        ExceptionClass::Index => PyIndexError::new_err(full),
        ExceptionClass::Memory => PyMemoryError::new_err(full),
        ExceptionClass::Runtime => PyRuntimeError::new_err(full),
    })
}

/// An array could not be borrowed (the analogue of a failed pin).
pub(crate) fn unavailable(side: &str, err: impl Display) -> PyErr {
    PyRuntimeError::new_err(format!(
        "runebuf error -3: {side} unavailable: {err}\n  Hint: {}",
        error_detail(-3).1
    ))
}

pub(crate) fn buffer_error(err: BufferError) -> PyErr {
    PyMemoryError::new_err(format!(
        "runebuf error -5: {err}\n  Hint: {}",
        error_detail(-5).1
    ))
}

fn last_panic_message() -> String {
    // SAFETY: a null buffer with zero capacity is never written.
    let len = unsafe { runebuf_last_panic_message(std::ptr::null_mut(), 0) };
    let Ok(len) = usize::try_from(len) else {
        return String::new();
    };
    let mut buf = vec![0u8; len + 1];
    // SAFETY: `buf` is live for `buf.len()` bytes.
    unsafe { runebuf_last_panic_message(buf.as_mut_ptr().cast(), buf.len()) };
    String::from_utf8_lossy(&buf[..len]).into_owned()
}

/// Returns `(message, recovery_hint)` for each FFI status code.
fn error_detail(code: i32) -> (&'static str, &'static str) {
    match code {
        -1 => (
            "invalid argument",
            "Offsets and num_bytes must be non-negative, and a None \
             destination is only accepted when num_bytes is 0. Arrays \
             must be C-contiguous.",
        ),
        -2 => (
            "range out of bounds",
            "The source range starts at element source_offset and spans \
             num_bytes bytes; the destination range starts at byte \
             destination_offset. Both must fit inside their arrays. For a \
             float32 source, element k starts at byte 4*k; for int16, 2*k.",
        ),
        -3 => (
            "array unavailable",
            "The array is already borrowed for writing by another Rust \
             extension, or the destination is a view over the source. \
             Copy into a separate array.",
        ),
        -4 => (
            "invalid buffer handle (already destroyed?)",
            "The direct buffer was destroyed. Don't use a handle after \
             destroying it.",
        ),
        -5 => (
            "buffer allocation refused",
            "The requested size overflows or exceeds the direct buffer \
             limit (256 MiB by default). Allocate a smaller buffer.",
        ),
        -6 => (
            "configuration error",
            "The bridge configuration is invalid or was already fixed by \
             an earlier copy or allocation. Configure once, before first use.",
        ),
        -20 => (
            "internal error",
            "A previous panic left the buffer table poisoned. Restart the \
             process.",
        ),
        -128 => (
            "panic inside the native library",
            "This is a bug in runebuf. Please report it with the panic \
             message below.",
        ),
        _ => (
            "unknown runebuf error",
            "An unrecognized error code was returned from the FFI layer. \
             This may indicate a version mismatch between the Python \
             bindings and the native library.",
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runebuf_core::{CopyError, Side};
    use runebuf_ffi::RunebufStatus;

    fn class_of(result: Result<(), CopyError>) -> ExceptionClass {
        exception_class(RunebufStatus::from(result) as i32)
    }

    #[test]
    fn copy_errors_map_to_python_exceptions() {
        let invalid = CopyError::InvalidArgument {
            reason: "num_bytes is negative (-4)".into(),
        };
        let out_of_bounds = CopyError::OutOfBounds {
            side: Side::Destination,
            offset: 2,
            len: 8,
            capacity: 6,
        };
        let unavailable = CopyError::Unavailable {
            side: Side::Source,
            reason: "already borrowed".into(),
        };
        assert_eq!(class_of(Err(invalid)), ExceptionClass::Value);
        assert_eq!(class_of(Err(out_of_bounds)), ExceptionClass::Index);
        assert_eq!(class_of(Err(unavailable)), ExceptionClass::Runtime);
    }

    #[test]
    fn buffer_and_boundary_codes_map_to_python_exceptions() {
        let cases = [
            (RunebufStatus::InvalidHandle, ExceptionClass::Value),
            (RunebufStatus::AllocationFailed, ExceptionClass::Memory),
            (RunebufStatus::ConfigError, ExceptionClass::Value),
            (RunebufStatus::InternalError, ExceptionClass::Runtime),
            (RunebufStatus::Panicked, ExceptionClass::Runtime),
        ];
        for (status, class) in cases {
            assert_eq!(exception_class(status as i32), class, "{status:?}");
        }
        assert_eq!(exception_class(-999), ExceptionClass::Runtime);
    }

    #[test]
    fn message_carries_code_hint_and_panic() {
        let oob = status_message(RunebufStatus::OutOfBounds as i32, "");
        assert!(oob.starts_with("runebuf error -2: range out of bounds"));
        assert!(oob.contains("Hint: The source range starts at element"));
        assert!(!oob.contains("Panic:"));

        let panicked = status_message(RunebufStatus::Panicked as i32, "index out of range");
        assert!(panicked.ends_with("\n  Panic: index out of range"));
    }

    #[test]
    fn all_known_codes_have_detail() {
        let codes = [
            RunebufStatus::InvalidArgument,
            RunebufStatus::OutOfBounds,
            RunebufStatus::Unavailable,
            RunebufStatus::InvalidHandle,
            RunebufStatus::AllocationFailed,
            RunebufStatus::ConfigError,
            RunebufStatus::InternalError,
            RunebufStatus::Panicked,
        ];
        for status in codes {
            let (msg, hint) = error_detail(status as i32);
            assert!(!msg.contains("unknown"), "{status:?} has no detail");
            assert!(!hint.is_empty(), "{status:?} has empty hint");
        }
    }

    #[test]
    fn unknown_code_returns_fallback() {
        let (msg, hint) = error_detail(-999);
        assert!(msg.contains("unknown"));
        assert!(hint.contains("version mismatch"));
    }

    #[test]
    fn no_panic_gives_empty_message() {
        assert_eq!(last_panic_message(), "");
    }
}
