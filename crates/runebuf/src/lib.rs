//! runebuf: bounds-checked copies from numeric arrays into direct byte
//! buffers.
//!
//! This is the top-level facade crate that re-exports the public API from
//! the runebuf sub-crates. For most users, adding `runebuf` as a single
//! dependency is sufficient.
//!
//! # Quick start
//!
//! ```rust
//! use runebuf::prelude::*;
//!
//! // Upload the middle two vertices' x coordinates.
//! let positions = [1.0f32, 2.0, 3.0, 4.0];
//! let mut upload = DirectBuffer::bytes(16).unwrap();
//! copy(&positions[..], 1, Some(&mut upload), 0, 8).unwrap();
//!
//! assert_eq!(&upload.as_slice::<f32>()[..2], &[2.0, 3.0]);
//! assert!(upload.as_bytes()[8..].iter().all(|&b| b == 0));
//!
//! // A zero-length copy needs no destination at all.
//! copy(&positions[..], 0, None::<&mut NullBuffer>, 0, 0).unwrap();
//!
//! // Element-counted copies write at the buffer's position.
//! let mut floats = DirectBuffer::floats(4).unwrap();
//! floats.set_position(3).unwrap();
//! copy_elements(&positions[..], 0, &mut floats, 1).unwrap();
//! assert_eq!(floats.as_slice::<f32>(), &[0.0, 0.0, 0.0, 1.0]);
//! ```
//!
//! # Modules
//!
//! | Module | Sub-crate | Contents |
//! |--------|-----------|----------|
//! | [`bridge`] | `runebuf-core` | Copy primitive, access traits, direct buffers, errors |
//!
//! The C ABI lives in `runebuf-ffi`. Its entry points are `unsafe` and
//! are not re-exported here.
//!
//! ```compile_fail
//! use runebuf::ffi::runebuf_copy_f32;
//! ```

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![forbid(unsafe_code)]

/// Copy primitive, access traits, and direct buffers (`runebuf-core`).
///
/// Implement [`bridge::PinnedArray`] and [`bridge::BufferHandle`] to plug
/// a runtime's arrays and buffers into [`bridge::copy`].
pub use runebuf_core as bridge;

/// Common imports for typical runebuf usage.
///
/// ```rust
/// use runebuf::prelude::*;
/// ```
pub mod prelude {
    // Copy
    pub use runebuf_core::{copy, copy_elements, BridgeConfig, CopyBridge};

    // Access traits and handles
    pub use runebuf_core::{BufferHandle, DirectBuffer, NullBuffer, PinnedArray};

    // Elements
    pub use runebuf_core::{Element, ElementKind};

    // Errors
    pub use runebuf_core::{BufferError, ConfigError, CopyError, Side};
}
