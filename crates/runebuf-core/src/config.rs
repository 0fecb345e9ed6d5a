//! Bridge configuration parameters.

use crate::element::ElementKind;
use crate::error::{BufferError, ConfigError};

/// Configuration for [`CopyBridge`](crate::CopyBridge) and direct-buffer allocation.
///
/// Immutable once handed to a bridge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BridgeConfig {
    /// Upper bound on the size of a single [`DirectBuffer`](crate::DirectBuffer).
    ///
    /// Default: 268_435_456 (256MB).
    pub max_buffer_bytes: usize,

    /// Reject copies whose length is not a multiple of the source element width.
    ///
    /// Default: `false`. Copies are byte-granular, so a 6-byte copy out of
    /// an `f32` array takes one and a half floats.
    pub require_whole_elements: bool,
}

impl BridgeConfig {
    /// Default direct-buffer size limit: 256MB.
    pub const DEFAULT_MAX_BUFFER_BYTES: usize = 256 * 1024 * 1024;

    /// Create a config with default values.
    pub fn new() -> Self {
        Self {
            max_buffer_bytes: Self::DEFAULT_MAX_BUFFER_BYTES,
            require_whole_elements: false,
        }
    }

    /// Builder-style setter for [`require_whole_elements`](Self::require_whole_elements).
    pub fn with_whole_elements(mut self, required: bool) -> Self {
        self.require_whole_elements = required;
        self
    }

    /// Builder-style setter for [`max_buffer_bytes`](Self::max_buffer_bytes).
    pub fn with_max_buffer_bytes(mut self, limit: usize) -> Self {
        self.max_buffer_bytes = limit;
        self
    }

    /// Byte size of a direct buffer holding `count` elements of `kind`.
    ///
    /// Fails if the size overflows or exceeds [`max_buffer_bytes`](Self::max_buffer_bytes).
    pub fn buffer_bytes(&self, kind: ElementKind, count: usize) -> Result<usize, BufferError> {
        let width = kind.width();
        let byte_len = count
            .checked_mul(width)
            .ok_or(BufferError::SizeOverflow { count, width })?;
        if byte_len > self.max_buffer_bytes {
            return Err(BufferError::CapacityExceeded {
                requested: byte_len,
                limit: self.max_buffer_bytes,
            });
        }
        Ok(byte_len)
    }

    /// Check structural invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_buffer_bytes == 0 {
            return Err(ConfigError::ZeroBufferLimit);
        }
        if self.max_buffer_bytes > isize::MAX as usize {
            return Err(ConfigError::BufferLimitTooLarge {
                limit: self.max_buffer_bytes,
            });
        }
        Ok(())
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new()
    }
}
