//! C-compatible status codes.
//!
//! [`RunebufStatus`] is a `repr(i32)` enum covering every error the
//! bridge can report. Conversions from the core error types are provided.

use runebuf_core::{BufferError, ConfigError, CopyError};

/// C-compatible status code returned by all FFI functions.
///
/// `Ok` = 0, all errors are negative. Values are ABI-stable.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunebufStatus {
    /// Success.
    Ok = 0,
    /// An argument is null, negative, or otherwise invalid, including a
    /// null destination for a non-empty copy.
    InvalidArgument = -1,
    /// A source or destination byte range lies outside its region.
    OutOfBounds = -2,
    /// The source or destination could not be accessed.
    Unavailable = -3,
    /// Buffer handle is invalid or was already destroyed.
    InvalidHandle = -4,
    /// Direct buffer allocation was refused (size limit or overflow).
    AllocationFailed = -5,
    /// Bridge configuration is invalid or was already fixed.
    ConfigError = -6,
    /// Internal error (e.g. poisoned mutex after a prior panic).
    InternalError = -20,
    /// A Rust panic was caught at the FFI boundary.
    Panicked = -128,
}

impl From<&CopyError> for RunebufStatus {
    fn from(e: &CopyError) -> Self {
        match e {
            CopyError::OutOfBounds { .. } => RunebufStatus::OutOfBounds,
            CopyError::InvalidArgument { .. } => RunebufStatus::InvalidArgument,
            CopyError::Unavailable { .. } => RunebufStatus::Unavailable,
        }
    }
}

impl From<&BufferError> for RunebufStatus {
    fn from(e: &BufferError) -> Self {
        match e {
            BufferError::PositionOutOfRange { .. } => RunebufStatus::OutOfBounds,
            BufferError::CapacityExceeded { .. } | BufferError::SizeOverflow { .. } => {
                RunebufStatus::AllocationFailed
            }
        }
    }
}

impl From<&ConfigError> for RunebufStatus {
    fn from(_e: &ConfigError) -> Self {
        RunebufStatus::ConfigError
    }
}

impl<E> From<Result<(), E>> for RunebufStatus
where
    for<'a> RunebufStatus: From<&'a E>,
{
    fn from(result: Result<(), E>) -> Self {
        match &result {
            Ok(()) => RunebufStatus::Ok,
            Err(e) => RunebufStatus::from(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use runebuf_core::Side;

    #[test]
    fn status_code_values_are_stable() {
        assert_eq!(RunebufStatus::Ok as i32, 0);
        assert_eq!(RunebufStatus::InvalidArgument as i32, -1);
        assert_eq!(RunebufStatus::OutOfBounds as i32, -2);
        assert_eq!(RunebufStatus::Unavailable as i32, -3);
        assert_eq!(RunebufStatus::InvalidHandle as i32, -4);
        assert_eq!(RunebufStatus::AllocationFailed as i32, -5);
        assert_eq!(RunebufStatus::ConfigError as i32, -6);
        assert_eq!(RunebufStatus::InternalError as i32, -20);
        assert_eq!(RunebufStatus::Panicked as i32, -128);
    }

    #[test]
    fn copy_error_to_status() {
        assert_eq!(
            RunebufStatus::from(&CopyError::OutOfBounds {
                side: Side::Source,
                offset: 0,
                len: 4,
                capacity: 2,
            }),
            RunebufStatus::OutOfBounds
        );
        assert_eq!(
            RunebufStatus::from(&CopyError::InvalidArgument { reason: "x".into() }),
            RunebufStatus::InvalidArgument
        );
        assert_eq!(
            RunebufStatus::from(&CopyError::Unavailable {
                side: Side::Destination,
                reason: "x".into(),
            }),
            RunebufStatus::Unavailable
        );
    }

    #[test]
    fn buffer_and_config_errors_to_status() {
        assert_eq!(
            RunebufStatus::from(&BufferError::CapacityExceeded {
                requested: 8,
                limit: 4
            }),
            RunebufStatus::AllocationFailed
        );
        assert_eq!(
            RunebufStatus::from(&BufferError::PositionOutOfRange {
                position: 5,
                len: 4
            }),
            RunebufStatus::OutOfBounds
        );
        assert_eq!(
            RunebufStatus::from(&ConfigError::ZeroBufferLimit),
            RunebufStatus::ConfigError
        );
    }

    #[test]
    fn result_conversion() {
        let ok: Result<(), CopyError> = Ok(());
        assert_eq!(RunebufStatus::from(ok), RunebufStatus::Ok);
        let err: Result<(), ConfigError> = Err(ConfigError::ZeroBufferLimit);
        assert_eq!(RunebufStatus::from(err), RunebufStatus::ConfigError);
    }
}
