//! Pointer + length views of caller memory.
//!
//! [`RawArray`] pins nothing itself: the C caller owns the array and keeps
//! it in place for the duration of the call (the contract a runtime's
//! critical-array access provides). [`RawBuffer`] resolves a NULL pointer
//! to "no storage" rather than to an empty slice.

use std::ops::Range;

use runebuf_core::{BufferHandle, CopyError, Element, PinnedArray};

/// A caller-owned array given as `(ptr, len)` in elements.
pub(crate) struct RawArray<E> {
    ptr: *const E,
    len: usize,
}

impl<E: Element> RawArray<E> {
    /// # Safety
    ///
    /// Unless `ptr` is null, it must be valid for reads of `len` elements,
    /// and the memory must not be written for as long as the value lives.
    #[allow(unsafe_code)]
    pub unsafe fn new(ptr: *const E, len: usize) -> Self {
        Self { ptr, len }
    }

    /// Address range of the array in bytes.
    pub fn span(&self) -> Range<usize> {
        let start = self.ptr as usize;
        start..start.saturating_add(self.len.saturating_mul(E::WIDTH))
    }
}

impl<E: Element> PinnedArray for RawArray<E> {
    type Element = E;
    type Guard<'a> = &'a [E];

    #[allow(unsafe_code)]
    fn acquire(&self) -> Result<Self::Guard<'_>, CopyError> {
        if self.ptr.is_null() {
            if self.len == 0 {
                return Ok(&[][..]);
            }
            return Err(CopyError::InvalidArgument {
                reason: format!("null source with length {}", self.len),
            });
        }
        if !self.ptr.is_aligned() {
            return Err(CopyError::InvalidArgument {
                reason: format!("source pointer is not aligned for {}", E::KIND),
            });
        }
        // SAFETY: `new` requires `ptr` to be valid for reads of `len`
        // elements and unwritten for the value's lifetime.
        Ok(unsafe { std::slice::from_raw_parts(self.ptr, self.len) })
    }
}

/// A caller-owned byte region given as `(ptr, len)`; NULL resolves to none.
pub(crate) struct RawBuffer {
    ptr: *mut u8,
    len: usize,
}

impl RawBuffer {
    /// # Safety
    ///
    /// Unless `ptr` is null, it must be valid for writes of `len` bytes,
    /// and nothing else may access that memory while the value lives.
    #[allow(unsafe_code)]
    pub unsafe fn new(ptr: *mut u8, len: usize) -> Self {
        Self { ptr, len }
    }

    pub fn span(&self) -> Range<usize> {
        let start = self.ptr as usize;
        start..start.saturating_add(self.len)
    }
}

impl BufferHandle for RawBuffer {
    type View<'a> = &'a mut [u8];

    #[allow(unsafe_code)]
    fn resolve(&mut self) -> Result<Option<Self::View<'_>>, CopyError> {
        if self.ptr.is_null() {
            return Ok(None);
        }
        // SAFETY: `new` requires `ptr` to be valid for exclusive writes of
        // `len` bytes. Overlap with the source is rejected by `disjoint`
        // before resolving.
        Ok(Some(unsafe { std::slice::from_raw_parts_mut(self.ptr, self.len) }))
    }
}

/// Reject a source region that overlaps the destination region.
///
/// Empty regions never overlap anything.
pub(crate) fn disjoint(source: Range<usize>, destination: Range<usize>) -> Result<(), CopyError> {
    let empty = source.is_empty() || destination.is_empty();
    if empty || source.end <= destination.start || destination.end <= source.start {
        return Ok(());
    }
    Err(CopyError::InvalidArgument {
        reason: "source and destination regions overlap".into(),
    })
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;

    #[test]
    fn null_array_with_zero_length_is_empty() {
        // SAFETY: null pointers are never dereferenced.
        let array = unsafe { RawArray::<f32>::new(std::ptr::null(), 0) };
        assert!(array.acquire().unwrap().is_empty());
    }

    #[test]
    fn null_array_with_length_is_invalid() {
        // SAFETY: null pointers are never dereferenced.
        let array = unsafe { RawArray::<i16>::new(std::ptr::null(), 3) };
        assert!(matches!(
            array.acquire(),
            Err(CopyError::InvalidArgument { .. })
        ));
    }

    #[test]
    fn misaligned_array_is_invalid() {
        let words = [0u32; 2];
        let misaligned = misaligned_ptr(&words);
        // SAFETY: alignment is checked before any read.
        let array = unsafe { RawArray::<f32>::new(misaligned, 1) };
        assert!(array.acquire().is_err());
    }

    fn misaligned_ptr(words: &[u32; 2]) -> *const f32 {
        words.as_ptr().cast::<u8>().wrapping_add(1).cast::<f32>()
    }

    #[test]
    fn null_buffer_resolves_to_none() {
        // SAFETY: null pointers are never dereferenced.
        let mut buffer = unsafe { RawBuffer::new(std::ptr::null_mut(), 16) };
        assert!(buffer.resolve().unwrap().is_none());
    }

    #[test]
    fn overlap_detection() {
        assert!(disjoint(0..8, 8..16).is_ok());
        assert!(disjoint(8..16, 0..8).is_ok());
        assert!(disjoint(0..8, 4..4).is_ok());
        assert!(disjoint(0..8, 7..9).is_err());
        assert!(disjoint(4..6, 0..16).is_err());
    }
}
