//! Direct buffers: owned, zeroed byte regions in native byte order.
//!
//! A [`DirectBuffer`] is the destination a graphics layer hands to vertex
//! and index uploads. Storage is a `Vec<u64>`, so the region is 8-byte
//! aligned and can be viewed as any [`Element`] type without copying.
//!
//! Each buffer carries a position cursor, counted in elements of its kind.
//! [`CopyBridge::copy_elements`](crate::CopyBridge::copy_elements) writes
//! at the cursor; nothing in the bridge moves it.

use std::fmt;

use crate::access::BufferHandle;
use crate::config::BridgeConfig;
use crate::element::{Element, ElementKind};
use crate::error::{BufferError, CopyError};
use crate::raw;

/// An owned, zero-initialised, contiguous byte region.
///
/// Its size is fixed at construction; the bridge never grows it.
#[derive(Clone, PartialEq, Eq)]
pub struct DirectBuffer {
    words: Vec<u64>,
    byte_len: usize,
    kind: ElementKind,
    position: usize,
}

impl DirectBuffer {
    /// Allocate `count` elements of `kind`, all bytes zero.
    ///
    /// Fails if the byte size overflows or exceeds `config.max_buffer_bytes`.
    pub fn new(kind: ElementKind, count: usize, config: &BridgeConfig) -> Result<Self, BufferError> {
        let byte_len = config.buffer_bytes(kind, count)?;
        Ok(Self {
            words: vec![0u64; byte_len.div_ceil(8)],
            byte_len,
            kind,
            position: 0,
        })
    }

    /// `num_bytes` zeroed bytes with the default size limit.
    pub fn bytes(num_bytes: usize) -> Result<Self, BufferError> {
        Self::new(ElementKind::Byte, num_bytes, &BridgeConfig::default())
    }

    /// Room for `num_shorts` `i16` values with the default size limit.
    pub fn shorts(num_shorts: usize) -> Result<Self, BufferError> {
        Self::new(ElementKind::Short, num_shorts, &BridgeConfig::default())
    }

    /// Room for `num_ints` `i32` values with the default size limit.
    pub fn ints(num_ints: usize) -> Result<Self, BufferError> {
        Self::new(ElementKind::Int, num_ints, &BridgeConfig::default())
    }

    /// Room for `num_floats` `f32` values with the default size limit.
    pub fn floats(num_floats: usize) -> Result<Self, BufferError> {
        Self::new(ElementKind::Float, num_floats, &BridgeConfig::default())
    }

    /// Element kind the buffer was allocated for.
    pub fn kind(&self) -> ElementKind {
        self.kind
    }

    /// Size in bytes.
    pub fn byte_len(&self) -> usize {
        self.byte_len
    }

    /// Number of whole elements of the allocation kind.
    pub fn len(&self) -> usize {
        self.byte_len / self.kind.width()
    }

    /// Returns `true` if the buffer holds no bytes.
    pub fn is_empty(&self) -> bool {
        self.byte_len == 0
    }

    /// The region as bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &raw::words_as_bytes(&self.words)[..self.byte_len]
    }

    /// The region as mutable bytes.
    pub fn as_bytes_mut(&mut self) -> &mut [u8] {
        &mut raw::words_as_bytes_mut(&mut self.words)[..self.byte_len]
    }

    /// The region viewed as whole elements of `E`.
    ///
    /// Trailing bytes that do not make up a full `E` are not included.
    pub fn as_slice<E: Element>(&self) -> &[E] {
        raw::words_as_elements(&self.words, self.byte_len / E::WIDTH)
    }

    /// Current position, in elements of [`kind`](Self::kind).
    pub fn position(&self) -> usize {
        self.position
    }

    /// Move the position. `position == len()` is allowed and leaves no room
    /// for an element-counted copy.
    pub fn set_position(&mut self, position: usize) -> Result<(), BufferError> {
        let len = self.len();
        if position > len {
            return Err(BufferError::PositionOutOfRange { position, len });
        }
        self.position = position;
        Ok(())
    }

    /// Zero every byte and rewind the position.
    pub fn clear(&mut self) {
        self.words.fill(0);
        self.position = 0;
    }
}

impl fmt::Debug for DirectBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DirectBuffer")
            .field("kind", &self.kind)
            .field("byte_len", &self.byte_len)
            .field("position", &self.position)
            .finish()
    }
}

impl BufferHandle for DirectBuffer {
    type View<'a> = &'a mut [u8];

    fn resolve(&mut self) -> Result<Option<Self::View<'_>>, CopyError> {
        Ok(Some(self.as_bytes_mut()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::copy::copy;

    #[test]
    fn constructors_size_by_element_width() {
        assert_eq!(DirectBuffer::bytes(5).unwrap().byte_len(), 5);
        assert_eq!(DirectBuffer::shorts(5).unwrap().byte_len(), 10);
        assert_eq!(DirectBuffer::ints(5).unwrap().byte_len(), 20);
        let floats = DirectBuffer::floats(5).unwrap();
        assert_eq!(floats.byte_len(), 20);
        assert_eq!(floats.len(), 5);
        assert_eq!(floats.kind(), ElementKind::Float);
    }

    #[test]
    fn new_buffer_is_zeroed() {
        let buf = DirectBuffer::floats(3).unwrap();
        assert!(buf.as_bytes().iter().all(|&b| b == 0));
        assert_eq!(buf.as_slice::<f32>(), &[0.0, 0.0, 0.0]);
    }

    #[test]
    fn limit_enforced() {
        let config = BridgeConfig::new().with_max_buffer_bytes(16);
        assert!(DirectBuffer::new(ElementKind::Float, 4, &config).is_ok());
        assert_eq!(
            DirectBuffer::new(ElementKind::Float, 5, &config).unwrap_err(),
            BufferError::CapacityExceeded {
                requested: 20,
                limit: 16
            }
        );
    }

    #[test]
    fn size_overflow_detected() {
        let err = DirectBuffer::new(ElementKind::Int, usize::MAX, &BridgeConfig::default())
            .unwrap_err();
        assert!(matches!(err, BufferError::SizeOverflow { width: 4, .. }));
    }

    #[test]
    fn odd_byte_length_hides_padding() {
        let mut buf = DirectBuffer::bytes(3).unwrap();
        assert_eq!(buf.as_bytes().len(), 3);
        assert_eq!(buf.as_slice::<i16>().len(), 1);
        let err = copy(&[1i32], 0, Some(&mut buf), 0, 4).unwrap_err();
        assert!(matches!(err, CopyError::OutOfBounds { capacity: 3, .. }));
    }

    #[test]
    fn copy_into_direct_buffer_is_visible_as_elements() {
        let mut buf = DirectBuffer::floats(4).unwrap();
        copy(&[5.0f32, 6.0], 0, Some(&mut buf), 4, 8).unwrap();
        assert_eq!(buf.as_slice::<f32>(), &[0.0, 5.0, 6.0, 0.0]);
        buf.clear();
        assert_eq!(buf.as_slice::<f32>(), &[0.0; 4]);
    }

    #[test]
    fn short_source_into_short_buffer() {
        let mut buf = DirectBuffer::shorts(3).unwrap();
        copy(&[1i16, 2, 3], 1, Some(&mut buf), 0, 4).unwrap();
        assert_eq!(buf.as_slice::<i16>(), &[2, 3, 0]);
    }

    #[test]
    fn position_bounded_by_element_count() {
        let mut buf = DirectBuffer::floats(4).unwrap();
        assert_eq!(buf.position(), 0);
        buf.set_position(4).unwrap();
        assert_eq!(buf.position(), 4);
        assert_eq!(
            buf.set_position(5).unwrap_err(),
            BufferError::PositionOutOfRange {
                position: 5,
                len: 4
            }
        );
        assert_eq!(buf.position(), 4);
        buf.clear();
        assert_eq!(buf.position(), 0);
    }
}
