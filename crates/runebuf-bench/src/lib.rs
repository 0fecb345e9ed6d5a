//! Benchmark profiles for the runebuf bridge copy primitive.
//!
//! Sources shaped like typical graphics uploads:
//!
//! - [`vertex_profile`]: interleaved position/normal/uv floats
//! - [`index_profile`]: triangle-strip style `i16` indices
//! - [`upload_target`]: a zeroed direct buffer sized for a source

#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

use runebuf_core::{BufferError, DirectBuffer, Element};

/// Floats per vertex: position (3), normal (3), uv (2).
pub const FLOATS_PER_VERTEX: usize = 8;

/// Interleaved vertex data for `vertices` vertices.
///
/// Values are deterministic and distinct so byte comparisons catch
/// misplaced ranges.
pub fn vertex_profile(vertices: usize) -> Vec<f32> {
    (0..vertices * FLOATS_PER_VERTEX)
        .map(|i| i as f32 * 0.25 - 1.0)
        .collect()
}

/// Three indices per triangle, walking a strip of `triangles` triangles.
///
/// Indices wrap at `i16::MAX` so large profiles stay valid.
pub fn index_profile(triangles: usize) -> Vec<i16> {
    (0..triangles)
        .flat_map(|t| [t, t + 1, t + 2])
        .map(|i| (i % i16::MAX as usize) as i16)
        .collect()
}

/// A zeroed direct buffer large enough for all of `source`.
pub fn upload_target<E: Element>(source: &[E]) -> Result<DirectBuffer, BufferError> {
    DirectBuffer::bytes(source.len() * E::WIDTH)
}
