//! Scoped access to the two ends of a copy.
//!
//! The source side is *pinned*: [`PinnedArray::acquire`] returns a guard
//! that keeps the array's storage fixed in place until it is dropped.
//! The destination side is *resolved*: [`BufferHandle::resolve`] turns an
//! opaque handle into a mutable byte view, or into nothing when the
//! handle has no addressable storage. The two steps are separate because
//! the array and the buffer have different owners and lifetimes.
//!
//! Plain Rust slices and vectors need no pinning; their guards are
//! ordinary borrows.

use std::ops::{Deref, DerefMut};

use crate::element::Element;
use crate::error::CopyError;

/// A caller-owned array whose storage can be pinned for the duration of a copy.
pub trait PinnedArray {
    /// Element type of the array.
    type Element: Element;

    /// Guard giving read access to the pinned elements.
    ///
    /// Dropping the guard releases the pin. The array is never modified
    /// through it, so release never needs to write anything back.
    type Guard<'a>: Deref<Target = [Self::Element]>
    where
        Self: 'a;

    /// Pin the array and return a view of its elements.
    fn acquire(&self) -> Result<Self::Guard<'_>, CopyError>;
}

/// An opaque handle to an externally owned, contiguous byte region.
pub trait BufferHandle {
    /// Guard giving write access to the resolved region.
    type View<'a>: DerefMut<Target = [u8]>
    where
        Self: 'a;

    /// Resolve the handle to its byte region.
    ///
    /// `Ok(None)` means the handle exists but has no addressable storage,
    /// the equivalent of resolving to a null address.
    fn resolve(&mut self) -> Result<Option<Self::View<'_>>, CopyError>;
}

impl<E: Element> PinnedArray for [E] {
    type Element = E;
    type Guard<'a> = &'a [E];

    fn acquire(&self) -> Result<Self::Guard<'_>, CopyError> {
        Ok(self)
    }
}

impl<E: Element, const N: usize> PinnedArray for [E; N] {
    type Element = E;
    type Guard<'a> = &'a [E];

    fn acquire(&self) -> Result<Self::Guard<'_>, CopyError> {
        Ok(self.as_slice())
    }
}

impl<E: Element> PinnedArray for Vec<E> {
    type Element = E;
    type Guard<'a> = &'a [E];

    fn acquire(&self) -> Result<Self::Guard<'_>, CopyError> {
        Ok(self.as_slice())
    }
}

impl BufferHandle for [u8] {
    type View<'a> = &'a mut [u8];

    fn resolve(&mut self) -> Result<Option<Self::View<'_>>, CopyError> {
        Ok(Some(self))
    }
}

impl<const N: usize> BufferHandle for [u8; N] {
    type View<'a> = &'a mut [u8];

    fn resolve(&mut self) -> Result<Option<Self::View<'_>>, CopyError> {
        Ok(Some(self.as_mut_slice()))
    }
}

impl BufferHandle for Vec<u8> {
    type View<'a> = &'a mut [u8];

    fn resolve(&mut self) -> Result<Option<Self::View<'_>>, CopyError> {
        Ok(Some(self.as_mut_slice()))
    }
}

/// A handle that always resolves to null.
///
/// Stands in for a destination with no addressable storage, such as a
/// runtime buffer that lives on the managed heap.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullBuffer;

impl BufferHandle for NullBuffer {
    type View<'a> = &'a mut [u8];

    fn resolve(&mut self) -> Result<Option<Self::View<'_>>, CopyError> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_pin_to_themselves() {
        let v = vec![1.0f32, 2.0];
        let guard = v.acquire().unwrap();
        assert_eq!(&*guard, &[1.0, 2.0]);
    }

    #[test]
    fn byte_vec_resolves_to_itself() {
        let mut buf = vec![0u8; 3];
        let view = buf.resolve().unwrap().unwrap();
        assert_eq!(view.len(), 3);
    }

    #[test]
    fn null_buffer_resolves_to_none() {
        let mut null = NullBuffer;
        assert!(null.resolve().unwrap().is_none());
    }
}
