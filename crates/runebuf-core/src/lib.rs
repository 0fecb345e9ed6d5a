//! Core types and the bridge copy primitive for runebuf.
//!
//! runebuf copies the contents of a primitive numeric array (`f32` or
//! `i16`, plus `u8`/`i32` in the generic API) into a byte region behind a
//! buffer handle, for graphics code that prepares vertex and index data
//! on one side of a runtime boundary and uploads it from the other.
//!
//! # Layout
//!
//! ```text
//! copy() / CopyBridge::copy
//! ├── PinnedArray::acquire  → guard over &[E]      (source, released on drop)
//! ├── BufferHandle::resolve → Option<&mut [u8]>    (destination, None = null)
//! ├── source_range / destination_range             (bounds, overflow)
//! └── byte copy                                    (native order)
//!
//! copy_elements() / CopyBridge::copy_elements
//! └── same path; count and destination offset scaled from elements and
//!     the buffer's position
//! ```
//!
//! A rejected copy never writes. The unchecked `memcpy` semantics are
//! kept only as the `unsafe` [`copy_unchecked`]. This crate's `unsafe`
//! code is confined to the private `raw` module.

#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(unsafe_code)]

pub mod access;
pub mod buffer;
pub mod config;
pub mod copy;
pub mod element;
pub mod error;
mod raw;

// Public re-exports for the primary API surface.
pub use access::{BufferHandle, NullBuffer, PinnedArray};
pub use buffer::DirectBuffer;
pub use config::BridgeConfig;
pub use copy::{copy, copy_elements, CopyBridge};
pub use element::{Element, ElementKind};
pub use error::{BufferError, ConfigError, CopyError, Side};
pub use raw::copy_unchecked;
