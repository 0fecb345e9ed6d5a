//! Low-level byte reinterpretation and the unchecked copy.
//!
//! The only module in this crate allowed to contain `unsafe` code.
//! Every block carries a `// SAFETY:` comment.

#![allow(unsafe_code)]

use crate::element::Element;

/// View an element slice as its native-order bytes.
pub(crate) fn as_bytes<E: Element>(elements: &[E]) -> &[u8] {
    // SAFETY: `Element` is sealed to u8/i16/i32/f32, which have no padding
    // and no invalid bit patterns as bytes. The byte length is exactly
    // `size_of_val(elements)` and u8 has alignment 1.
    unsafe {
        std::slice::from_raw_parts(
            elements.as_ptr().cast::<u8>(),
            std::mem::size_of_val(elements),
        )
    }
}

/// View a `u64` backing store as bytes.
pub(crate) fn words_as_bytes(words: &[u64]) -> &[u8] {
    // SAFETY: u64 has no padding; every byte is initialised.
    unsafe { std::slice::from_raw_parts(words.as_ptr().cast::<u8>(), words.len() * 8) }
}

/// Mutable byte view of a `u64` backing store.
pub(crate) fn words_as_bytes_mut(words: &mut [u64]) -> &mut [u8] {
    // SAFETY: as `words_as_bytes`; any byte pattern written back is a valid u64.
    unsafe { std::slice::from_raw_parts_mut(words.as_mut_ptr().cast::<u8>(), words.len() * 8) }
}

/// View a `u64` backing store as `len` elements of `E`.
///
/// Panics if `len * E::WIDTH` exceeds the store.
pub(crate) fn words_as_elements<E: Element>(words: &[u64], len: usize) -> &[E] {
    assert!(len * E::WIDTH <= words.len() * 8);
    // SAFETY: u64 alignment (8) satisfies every Element's alignment (<= 4),
    // the range was checked above, and every bit pattern is a valid E.
    unsafe { std::slice::from_raw_parts(words.as_ptr().cast::<E>(), len) }
}

/// Copy `num_bytes` bytes from element `src_offset` of `src` to byte
/// `dst_offset` of `dst`, with no validation whatsoever.
///
/// This is the raw `memcpy` the safe [`copy`](crate::copy()) is built to
/// replace. Use it only where bounds were established by other means.
///
/// # Safety
///
/// - `src.add(src_offset)` must be valid for reads of `num_bytes` bytes.
/// - `dst.add(dst_offset)` must be valid for writes of `num_bytes` bytes.
/// - The two ranges must not overlap.
/// - If `num_bytes == 0` the pointers may be null or dangling.
pub unsafe fn copy_unchecked<E: Element>(
    src: *const E,
    src_offset: usize,
    dst: *mut u8,
    dst_offset: usize,
    num_bytes: usize,
) {
    if num_bytes == 0 {
        return;
    }
    // SAFETY: guaranteed by the caller per the contract above.
    unsafe {
        std::ptr::copy_nonoverlapping(
            src.add(src_offset).cast::<u8>(),
            dst.add(dst_offset),
            num_bytes,
        );
    }
}
