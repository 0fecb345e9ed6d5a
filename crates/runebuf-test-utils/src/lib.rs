//! Test utilities and mock handles for runebuf development.
//!
//! Provides [`MockArray`] and [`MockBuffer`], implementations of
//! [`PinnedArray`] and [`BufferHandle`] that count every acquire and
//! release so tests can check that pins never leak, plus byte fixtures
//! in [`fixtures`].

#![forbid(unsafe_code)]
#![allow(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod fixtures;

use std::ops::{Deref, DerefMut};
use std::sync::atomic::{AtomicUsize, Ordering};

use runebuf_core::{BufferHandle, CopyError, Element, PinnedArray, Side};

/// Mock managed array that tracks pin/unpin pairs.
///
/// Set [`fail_acquire`](MockArray::fail_acquire) to simulate a runtime
/// that refuses to pin (e.g. the array is mutably borrowed elsewhere).
pub struct MockArray<E> {
    data: Vec<E>,
    acquires: AtomicUsize,
    releases: AtomicUsize,
    failure: Option<String>,
}

impl<E: Element> MockArray<E> {
    pub fn new(data: Vec<E>) -> Self {
        Self {
            data,
            acquires: AtomicUsize::new(0),
            releases: AtomicUsize::new(0),
            failure: None,
        }
    }

    /// Make every subsequent `acquire` fail with the given reason.
    pub fn fail_acquire(mut self, reason: impl Into<String>) -> Self {
        self.failure = Some(reason.into());
        self
    }

    /// Successful pins so far.
    pub fn acquires(&self) -> usize {
        self.acquires.load(Ordering::SeqCst)
    }

    /// Guards dropped so far.
    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    /// Pins currently outstanding.
    pub fn outstanding(&self) -> usize {
        self.acquires() - self.releases()
    }

    /// The array contents, for checking the source was not modified.
    pub fn data(&self) -> &[E] {
        &self.data
    }
}

/// Guard returned by [`MockArray::acquire`]; counts its own drop.
pub struct MockPin<'a, E> {
    data: &'a [E],
    releases: &'a AtomicUsize,
}

impl<E> Deref for MockPin<'_, E> {
    type Target = [E];

    fn deref(&self) -> &[E] {
        self.data
    }
}

impl<E> Drop for MockPin<'_, E> {
    fn drop(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

impl<E: Element> PinnedArray for MockArray<E> {
    type Element = E;
    type Guard<'a> = MockPin<'a, E>;

    fn acquire(&self) -> Result<Self::Guard<'_>, CopyError> {
        if let Some(reason) = &self.failure {
            return Err(CopyError::Unavailable {
                side: Side::Source,
                reason: reason.clone(),
            });
        }
        self.acquires.fetch_add(1, Ordering::SeqCst);
        Ok(MockPin {
            data: &self.data,
            releases: &self.releases,
        })
    }
}

/// How a [`MockBuffer`] responds to `resolve`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Resolution {
    /// Resolve to the backing bytes.
    Direct,
    /// Resolve to null (no addressable storage).
    Null,
    /// Fail with [`CopyError::Unavailable`].
    Unavailable(String),
}

/// Mock destination buffer handle.
pub struct MockBuffer {
    bytes: Vec<u8>,
    resolution: Resolution,
    resolves: usize,
    releases: AtomicUsize,
}

impl MockBuffer {
    /// A direct buffer of `len` bytes, each set to `fill`.
    pub fn new(len: usize, fill: u8) -> Self {
        Self {
            bytes: vec![fill; len],
            resolution: Resolution::Direct,
            resolves: 0,
            releases: AtomicUsize::new(0),
        }
    }

    /// A handle that resolves to null.
    pub fn null() -> Self {
        Self::new(0, 0).with_resolution(Resolution::Null)
    }

    pub fn with_resolution(mut self, resolution: Resolution) -> Self {
        self.resolution = resolution;
        self
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Number of `resolve` calls, whatever their outcome.
    pub fn resolves(&self) -> usize {
        self.resolves
    }

    /// Number of resolved views dropped.
    pub fn releases(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }
}

/// View returned by [`MockBuffer::resolve`]; counts its own drop.
pub struct MockView<'a> {
    bytes: &'a mut [u8],
    releases: &'a AtomicUsize,
}

impl Deref for MockView<'_> {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        self.bytes
    }
}

impl DerefMut for MockView<'_> {
    fn deref_mut(&mut self) -> &mut [u8] {
        self.bytes
    }
}

impl Drop for MockView<'_> {
    fn drop(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

impl BufferHandle for MockBuffer {
    type View<'a> = MockView<'a>;

    fn resolve(&mut self) -> Result<Option<Self::View<'_>>, CopyError> {
        self.resolves += 1;
        match &self.resolution {
            Resolution::Direct => Ok(Some(MockView {
                bytes: &mut self.bytes,
                releases: &self.releases,
            })),
            Resolution::Null => Ok(None),
            Resolution::Unavailable(reason) => Err(CopyError::Unavailable {
                side: Side::Destination,
                reason: reason.clone(),
            }),
        }
    }
}
