//! Pointer-to-pointer copy entry points.
//!
//! The C shape of the bridge copy: a source array of `f32` or `i16`
//! (`src`, `src_len` elements), an element offset into it, a destination
//! byte region (`dst`, `dst_len` bytes, NULL allowed), a byte offset into
//! that, and a byte count. Offsets and count are `int32_t` like the
//! runtime integers they usually come from; negative values are rejected.

use runebuf_core::{CopyError, Element};

use crate::buffer::bridge;
use crate::raw::{disjoint, RawArray, RawBuffer};
use crate::status::RunebufStatus;

/// # Safety
///
/// `src` and `dst` must satisfy [`RawArray::new`] and [`RawBuffer::new`].
#[allow(unsafe_code)]
unsafe fn copy_raw<E: Element>(
    src: *const E,
    src_len: usize,
    src_offset: i32,
    dst: *mut u8,
    dst_len: usize,
    dst_offset: i32,
    num_bytes: i32,
) -> Result<(), CopyError> {
    // SAFETY: forwarded from the caller.
    let (source, mut destination) =
        unsafe { (RawArray::new(src, src_len), RawBuffer::new(dst, dst_len)) };
    if num_bytes != 0 && !dst.is_null() {
        disjoint(source.span(), destination.span())?;
    }
    bridge().copy(
        &source,
        src_offset,
        Some(&mut destination),
        dst_offset,
        num_bytes,
    )
}

/// Copy `num_bytes` bytes from a float array into a byte region.
///
/// Reading starts at byte `4 * src_offset` of `src`; writing starts at
/// byte `dst_offset` of `dst`. `dst` may be NULL only when `num_bytes` is
/// 0. Nothing is written unless the status is `RUNEBUF_STATUS_OK`.
///
/// # Safety
///
/// Unless null, `src` must be valid for reads of `src_len` floats and
/// `dst` must be valid for writes of `dst_len` bytes, for the duration of
/// the call. Only ranges inside those lengths are touched, so the lengths
/// must not overstate either region.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn runebuf_copy_f32(
    src: *const f32,
    src_len: usize,
    src_offset: i32,
    dst: *mut u8,
    dst_len: usize,
    dst_offset: i32,
    num_bytes: i32,
) -> i32 {
    ffi_guard!({
        // SAFETY: forwarded from the caller.
        let result =
            unsafe { copy_raw(src, src_len, src_offset, dst, dst_len, dst_offset, num_bytes) };
        RunebufStatus::from(result) as i32
    })
}

/// Copy `num_bytes` bytes from a short array into a byte region.
///
/// Reading starts at byte `2 * src_offset` of `src`; otherwise identical
/// to [`runebuf_copy_f32`].
///
/// # Safety
///
/// As for [`runebuf_copy_f32`], with `src_len` counted in shorts.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn runebuf_copy_i16(
    src: *const i16,
    src_len: usize,
    src_offset: i32,
    dst: *mut u8,
    dst_len: usize,
    dst_offset: i32,
    num_bytes: i32,
) -> i32 {
    ffi_guard!({
        // SAFETY: forwarded from the caller.
        let result =
            unsafe { copy_raw(src, src_len, src_offset, dst, dst_len, dst_offset, num_bytes) };
        RunebufStatus::from(result) as i32
    })
}

#[cfg(test)]
#[allow(unsafe_code)]
mod tests {
    use super::*;
    use runebuf_test_utils::fixtures::{f32_bytes, i16_bytes};

    fn copy_f32(src: &[f32], src_offset: i32, dst: &mut [u8], dst_offset: i32, n: i32) -> i32 {
        // SAFETY: pointer and length come from live slices.
        unsafe {
            runebuf_copy_f32(
                src.as_ptr(),
                src.len(),
                src_offset,
                dst.as_mut_ptr(),
                dst.len(),
                dst_offset,
                n,
            )
        }
    }

    fn copy_i16(src: &[i16], src_offset: i32, dst: &mut [u8], dst_offset: i32, n: i32) -> i32 {
        // SAFETY: pointer and length come from live slices.
        unsafe {
            runebuf_copy_i16(
                src.as_ptr(),
                src.len(),
                src_offset,
                dst.as_mut_ptr(),
                dst.len(),
                dst_offset,
                n,
            )
        }
    }

    #[test]
    fn float_scenario_through_c_abi() {
        let src = [1.0f32, 2.0, 3.0, 4.0];
        let mut dst = [0u8; 16];
        let status = copy_f32(&src, 1, &mut dst, 0, 8);
        assert_eq!(status, RunebufStatus::Ok as i32);
        assert_eq!(&dst[..8], f32_bytes(&[2.0, 3.0]).as_slice());
        assert_eq!(&dst[8..], &[0u8; 8]);
    }

    #[test]
    fn short_copy_honours_byte_offset() {
        let src = [10i16, 20, 30];
        let mut dst = [0xEEu8; 6];
        let status = copy_i16(&src, 1, &mut dst, 2, 4);
        assert_eq!(status, RunebufStatus::Ok as i32);
        assert_eq!(&dst[..2], &[0xEE, 0xEE]);
        assert_eq!(&dst[2..], i16_bytes(&[20, 30]).as_slice());
    }

    #[test]
    fn null_destination_zero_bytes_is_ok() {
        let src = [1.0f32];
        // SAFETY: `src` is live; a null destination is never written.
        let status =
            unsafe { runebuf_copy_f32(src.as_ptr(), 1, 0, std::ptr::null_mut(), 0, 0, 0) };
        assert_eq!(status, RunebufStatus::Ok as i32);
    }

    #[test]
    fn null_destination_with_bytes_is_invalid_argument() {
        let src = [1.0f32];
        // SAFETY: `src` is live; a null destination is never written.
        let status =
            unsafe { runebuf_copy_f32(src.as_ptr(), 1, 0, std::ptr::null_mut(), 0, 0, 4) };
        assert_eq!(status, RunebufStatus::InvalidArgument as i32);
    }

    #[test]
    fn out_of_bounds_leaves_destination_untouched() {
        let src = [1i16, 2];
        let mut dst = [0u8; 4];
        let status = copy_i16(&src, 1, &mut dst, 0, 4);
        assert_eq!(status, RunebufStatus::OutOfBounds as i32);
        let status = copy_i16(&src, 0, &mut dst, 2, 4);
        assert_eq!(status, RunebufStatus::OutOfBounds as i32);
        assert_eq!(dst, [0u8; 4]);
    }

    #[test]
    fn negative_count_is_invalid_argument() {
        let src = [1.0f32];
        let mut dst = [0u8; 4];
        let status = copy_f32(&src, 0, &mut dst, 0, -4);
        assert_eq!(status, RunebufStatus::InvalidArgument as i32);
    }

    #[test]
    fn overlapping_regions_rejected() {
        let mut storage = [0f32; 4];
        let src = storage.as_ptr();
        let dst = storage.as_mut_ptr().cast::<u8>();
        // SAFETY: both regions are the live `storage`; overlap is rejected
        // before either is touched.
        let status = unsafe { runebuf_copy_f32(src, 4, 0, dst, 16, 4, 4) };
        assert_eq!(status, RunebufStatus::InvalidArgument as i32);
    }

    #[test]
    fn sub_slice_length_bounds_the_read() {
        let backing = [1.0f32, 2.0, 3.0, 4.0];
        let mut dst = [0u8; 16];
        let status = copy_f32(&backing[..1], 0, &mut dst, 0, 16);
        assert_eq!(status, RunebufStatus::OutOfBounds as i32);
        assert_eq!(dst, [0u8; 16]);
        assert_eq!(copy_f32(&backing[..1], 0, &mut dst, 0, 4), RunebufStatus::Ok as i32);
        assert_eq!(&dst[..4], f32_bytes(&[1.0]).as_slice());
    }

    #[cfg(not(miri))]
    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn c_abi_matches_safe_copy(
                src in proptest::collection::vec(any::<i16>(), 0..48),
                dst_len in 0usize..96,
                src_offset in 0i32..48,
                dst_offset in 0i32..96,
                num_bytes in 0i32..96,
            ) {
                let mut via_ffi = vec![0x5Au8; dst_len];
                let mut via_core = via_ffi.clone();
                let status = copy_i16(&src, src_offset, &mut via_ffi, dst_offset, num_bytes);
                let result = runebuf_core::copy(
                    &src,
                    src_offset,
                    Some(&mut via_core),
                    dst_offset,
                    num_bytes,
                );
                prop_assert_eq!(status, RunebufStatus::from(result) as i32);
                prop_assert_eq!(via_ffi, via_core);
            }
        }
    }
}
