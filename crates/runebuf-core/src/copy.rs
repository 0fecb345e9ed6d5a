//! The bridge copy primitive.
//!
//! One generic operation copies a byte range out of a pinned element array
//! into a resolved destination buffer. Element type only affects how the
//! source offset is scaled: `i16` arrays start reading at byte `2 * k`,
//! `f32` arrays at byte `4 * k`.
//!
//! [`CopyBridge::copy_elements`] is the element-counted form for direct
//! buffers: it copies whole elements into the buffer at its position.
//!
//! Every argument is validated before any byte is written, so a failed copy
//! leaves the destination untouched. The source guard is released on every
//! return path, success or error, when it goes out of scope.

use std::ops::Range;

use crate::access::{BufferHandle, PinnedArray};
use crate::buffer::DirectBuffer;
use crate::config::BridgeConfig;
use crate::element::{Element, ElementKind};
use crate::error::{BufferError, ConfigError, CopyError, Side};
use crate::raw;

/// Copy with the default [`BridgeConfig`].
///
/// See [`CopyBridge::copy`].
pub fn copy<S, D>(
    source: &S,
    src_offset: i32,
    destination: Option<&mut D>,
    dst_offset: i32,
    num_bytes: i32,
) -> Result<(), CopyError>
where
    S: PinnedArray + ?Sized,
    D: BufferHandle + ?Sized,
{
    CopyBridge::default().copy(source, src_offset, destination, dst_offset, num_bytes)
}

/// Element-counted copy with the default [`BridgeConfig`].
///
/// See [`CopyBridge::copy_elements`].
pub fn copy_elements<S>(
    source: &S,
    src_offset: i32,
    destination: &mut DirectBuffer,
    num_elements: i32,
) -> Result<(), CopyError>
where
    S: PinnedArray + ?Sized,
{
    CopyBridge::default().copy_elements(source, src_offset, destination, num_elements)
}

/// A configured copy primitive.
///
/// Holds no state besides its immutable [`BridgeConfig`]; calls are
/// independent and may run concurrently on different buffers.
#[derive(Clone, Debug, Default)]
pub struct CopyBridge {
    config: BridgeConfig,
}

impl CopyBridge {
    /// Create a bridge, validating the config.
    pub fn new(config: BridgeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The bridge configuration.
    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    /// Copy `num_bytes` bytes starting at element `src_offset` of `source`
    /// into `destination` starting at byte `dst_offset`.
    ///
    /// A zero-length copy succeeds without resolving the destination, so
    /// it is a no-op even for `None` or null-resolving handles.
    pub fn copy<S, D>(
        &self,
        source: &S,
        src_offset: i32,
        destination: Option<&mut D>,
        dst_offset: i32,
        num_bytes: i32,
    ) -> Result<(), CopyError>
    where
        S: PinnedArray + ?Sized,
        D: BufferHandle + ?Sized,
    {
        let kind = <S::Element as Element>::KIND;
        let result = self.copy_inner(source, src_offset, destination, dst_offset, num_bytes);
        match &result {
            Ok(()) => tracing::trace!(%kind, src_offset, dst_offset, num_bytes, "copy complete"),
            Err(error) => tracing::debug!(
                %kind,
                src_offset,
                dst_offset,
                num_bytes,
                %error,
                "copy rejected"
            ),
        }
        result
    }

    fn copy_inner<S, D>(
        &self,
        source: &S,
        src_offset: i32,
        destination: Option<&mut D>,
        dst_offset: i32,
        num_bytes: i32,
    ) -> Result<(), CopyError>
    where
        S: PinnedArray + ?Sized,
        D: BufferHandle + ?Sized,
    {
        let pinned = source.acquire()?;
        if num_bytes == 0 {
            return Ok(());
        }

        let len = non_negative("num_bytes", num_bytes)?;
        let src_offset = non_negative("src_offset", src_offset)?;
        let dst_offset = non_negative("dst_offset", dst_offset)?;
        self.transfer(&*pinned, src_offset, destination, dst_offset, len)
    }

    /// Copy `num_elements` elements starting at element `src_offset` of
    /// `source` into `destination` at its [`position`](DirectBuffer::position).
    ///
    /// The destination must have been allocated for the source's element
    /// kind. Its position is not advanced. Zero elements is a no-op.
    pub fn copy_elements<S>(
        &self,
        source: &S,
        src_offset: i32,
        destination: &mut DirectBuffer,
        num_elements: i32,
    ) -> Result<(), CopyError>
    where
        S: PinnedArray + ?Sized,
    {
        let kind = <S::Element as Element>::KIND;
        let position = destination.position();
        let result = self.copy_elements_inner(source, src_offset, destination, num_elements);
        match &result {
            Ok(()) => tracing::trace!(
                %kind,
                src_offset,
                position,
                num_elements,
                "element copy complete"
            ),
            Err(error) => tracing::debug!(
                %kind,
                src_offset,
                position,
                num_elements,
                %error,
                "element copy rejected"
            ),
        }
        result
    }

    fn copy_elements_inner<S>(
        &self,
        source: &S,
        src_offset: i32,
        destination: &mut DirectBuffer,
        num_elements: i32,
    ) -> Result<(), CopyError>
    where
        S: PinnedArray + ?Sized,
    {
        let pinned = source.acquire()?;
        if num_elements == 0 {
            return Ok(());
        }

        let count = non_negative("num_elements", num_elements)?;
        let src_offset = non_negative("src_offset", src_offset)?;
        let kind = <S::Element as Element>::KIND;
        if destination.kind() != kind {
            return Err(CopyError::invalid(format!(
                "{kind} elements copied into a {} buffer",
                destination.kind()
            )));
        }
        let len = kind.byte_offset(count).ok_or_else(|| {
            CopyError::invalid(format!("{count} {kind} elements overflow a byte count"))
        })?;
        let position = destination.position();
        let dst_offset = kind.byte_offset(position).ok_or_else(|| {
            CopyError::invalid(format!("buffer position {position} overflows a byte offset"))
        })?;
        self.transfer(&*pinned, src_offset, Some(destination), dst_offset, len)
    }

    /// Move `len` bytes from element `src_offset` of `pinned` to byte
    /// `dst_offset` of `destination`, after checking both ranges.
    fn transfer<E, D>(
        &self,
        pinned: &[E],
        src_offset: usize,
        destination: Option<&mut D>,
        dst_offset: usize,
        len: usize,
    ) -> Result<(), CopyError>
    where
        E: Element,
        D: BufferHandle + ?Sized,
    {
        let kind = E::KIND;
        if self.config.require_whole_elements && len % kind.width() != 0 {
            return Err(CopyError::invalid(format!(
                "num_bytes {len} is not a multiple of the {kind} element width"
            )));
        }

        let src_bytes = raw::as_bytes(pinned);
        let src_range = source_range(kind, src_offset, len, src_bytes.len())?;

        let null = || CopyError::invalid(format!("null destination for a {len}-byte copy"));
        let destination = destination.ok_or_else(null)?;
        let mut view = destination.resolve()?.ok_or_else(null)?;
        let dst_range = destination_range(dst_offset, len, view.len())?;

        view[dst_range].copy_from_slice(&src_bytes[src_range]);
        Ok(())
    }

    /// Allocate a zeroed direct buffer of `count` elements of `kind`,
    /// subject to this bridge's size limit.
    pub fn allocate(&self, kind: ElementKind, count: usize) -> Result<DirectBuffer, BufferError> {
        DirectBuffer::new(kind, count, &self.config)
    }
}

fn non_negative(name: &str, value: i32) -> Result<usize, CopyError> {
    usize::try_from(value).map_err(|_| CopyError::invalid(format!("{name} is negative ({value})")))
}

/// Byte range read from a source of `capacity` bytes, starting at element
/// `offset_elements`.
pub fn source_range(
    kind: ElementKind,
    offset_elements: usize,
    len: usize,
    capacity: usize,
) -> Result<Range<usize>, CopyError> {
    let offset = kind.byte_offset(offset_elements);
    checked_range(Side::Source, offset, len, capacity)
}

/// Byte range written into a destination of `capacity` bytes.
pub fn destination_range(
    offset: usize,
    len: usize,
    capacity: usize,
) -> Result<Range<usize>, CopyError> {
    checked_range(Side::Destination, Some(offset), len, capacity)
}

fn checked_range(
    side: Side,
    offset: Option<usize>,
    len: usize,
    capacity: usize,
) -> Result<Range<usize>, CopyError> {
    let out_of_bounds = || CopyError::OutOfBounds {
        side,
        offset: offset.unwrap_or(usize::MAX),
        len,
        capacity,
    };
    let start = offset.ok_or_else(out_of_bounds)?;
    let end = start.checked_add(len).ok_or_else(out_of_bounds)?;
    if end > capacity {
        return Err(out_of_bounds());
    }
    Ok(start..end)
}
