//! Error types for the bridge copy primitive and direct buffers.

use std::error::Error;
use std::fmt;

/// Which end of a copy an error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Side {
    /// The pinned source array.
    Source,
    /// The destination buffer.
    Destination,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Source => f.write_str("source"),
            Self::Destination => f.write_str("destination"),
        }
    }
}

/// Errors from [`copy`](crate::copy::copy).
///
/// A failed copy never writes to the destination.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CopyError {
    /// The requested byte range does not fit inside one of the regions.
    OutOfBounds {
        /// Which region was overrun.
        side: Side,
        /// Start of the requested range in bytes (saturated on overflow).
        offset: usize,
        /// Length of the requested range in bytes.
        len: usize,
        /// Size of the region in bytes.
        capacity: usize,
    },
    /// A negative length or offset, a missing destination, or a length
    /// rejected by the bridge configuration.
    InvalidArgument {
        /// Human-readable description of the argument problem.
        reason: String,
    },
    /// The source or destination could not be accessed, e.g. because the
    /// owning runtime holds a conflicting borrow.
    Unavailable {
        /// Which region could not be accessed.
        side: Side,
        /// Description reported by the owner.
        reason: String,
    },
}

impl CopyError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            reason: reason.into(),
        }
    }
}

impl fmt::Display for CopyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds {
                side,
                offset,
                len,
                capacity,
            } => write!(
                f,
                "{side} range out of bounds: {len} bytes at offset {offset}, capacity {capacity} bytes"
            ),
            Self::InvalidArgument { reason } => write!(f, "invalid argument: {reason}"),
            Self::Unavailable { side, reason } => write!(f, "{side} unavailable: {reason}"),
        }
    }
}

impl Error for CopyError {}

/// Errors from [`DirectBuffer`](crate::buffer::DirectBuffer) allocation and positioning.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BufferError {
    /// The requested size exceeds [`BridgeConfig::max_buffer_bytes`](crate::BridgeConfig).
    CapacityExceeded {
        /// Number of bytes requested.
        requested: usize,
        /// Configured limit in bytes.
        limit: usize,
    },
    /// `count * width` does not fit in `usize`.
    SizeOverflow {
        /// Requested element count.
        count: usize,
        /// Element width in bytes.
        width: usize,
    },
    /// A position past the last element was requested.
    PositionOutOfRange {
        /// Requested position, in elements.
        position: usize,
        /// Buffer length, in elements.
        len: usize,
    },
}

impl fmt::Display for BufferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CapacityExceeded { requested, limit } => write!(
                f,
                "buffer capacity exceeded: requested {requested} bytes, limit {limit} bytes"
            ),
            Self::SizeOverflow { count, width } => {
                write!(f, "buffer size overflow: {count} elements of {width} bytes")
            }
            Self::PositionOutOfRange { position, len } => {
                write!(f, "buffer position {position} past limit {len}")
            }
        }
    }
}

impl Error for BufferError {}

/// Errors from [`BridgeConfig::validate`](crate::BridgeConfig::validate).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ConfigError {
    /// `max_buffer_bytes` is zero.
    ZeroBufferLimit,
    /// `max_buffer_bytes` exceeds `isize::MAX`, the largest allocation Rust permits.
    BufferLimitTooLarge {
        /// The configured limit.
        limit: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ZeroBufferLimit => write!(f, "max_buffer_bytes must be non-zero"),
            Self::BufferLimitTooLarge { limit } => {
                write!(f, "max_buffer_bytes {limit} exceeds isize::MAX")
            }
        }
    }
}

impl Error for ConfigError {}
