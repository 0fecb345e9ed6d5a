//! `copy(source, source_offset, destination, destination_offset, num_bytes)`
//! and `copy_elements(source, source_offset, destination, position, num_elements)`.

use numpy::{PyArray1, PyArrayMethods, PyReadwriteArray1};
use pyo3::exceptions::{PyTypeError, PyValueError};
use pyo3::prelude::*;

use runebuf_core::{Element, ElementKind};
use runebuf_ffi::{runebuf_copy_f32, runebuf_copy_i16};

use crate::error::{check_status, unavailable};

/// Copy `num_bytes` bytes from a 1-D `float32` or `int16` array into a
/// 1-D `uint8` array.
///
/// Reading starts at element `source_offset` of `source`; writing starts
/// at byte `destination_offset` of `destination`. `destination` may be
/// `None` only when `num_bytes` is 0. Bytes are copied in native order;
/// nothing is written if an exception is raised.
///
/// Raises:
///     ValueError: negative arguments, a non-contiguous array, or `None`
///         destination with a nonzero length.
///     IndexError: either byte range lies outside its array.
///     RuntimeError: an array is already borrowed elsewhere, or the
///         destination shares memory with the source.
///     TypeError: `source` is not a `float32` or `int16` array.
#[pyfunction]
#[pyo3(signature = (source, source_offset, destination, destination_offset, num_bytes))]
pub(crate) fn copy(
    py: Python<'_>,
    source: &Bound<'_, PyAny>,
    source_offset: i32,
    destination: Option<&Bound<'_, PyArray1<u8>>>,
    destination_offset: i32,
    num_bytes: i32,
) -> PyResult<()> {
    let placement = Placement {
        source_offset,
        destination_offset,
        num_bytes,
    };
    if let Ok(array) = source.cast::<PyArray1<f32>>() {
        return copy_from(py, array, destination, placement);
    }
    if let Ok(array) = source.cast::<PyArray1<i16>>() {
        return copy_from(py, array, destination, placement);
    }
    Err(not_a_source(source))
}

/// Copy `num_elements` elements from a 1-D `float32` or `int16` array into
/// an array of the same dtype, starting at element `position` of
/// `destination`.
///
/// Both offsets count elements. Raises like [`copy`]; a destination of
/// another dtype is a `TypeError`.
#[pyfunction]
#[pyo3(signature = (source, source_offset, destination, position, num_elements))]
pub(crate) fn copy_elements(
    py: Python<'_>,
    source: &Bound<'_, PyAny>,
    source_offset: i32,
    destination: &Bound<'_, PyAny>,
    position: usize,
    num_elements: i32,
) -> PyResult<()> {
    if let Ok(array) = source.cast::<PyArray1<f32>>() {
        let placement =
            Placement::elements(ElementKind::Float, source_offset, position, num_elements)?;
        let destination = destination
            .cast::<PyArray1<f32>>()
            .map_err(|_| PyTypeError::new_err("destination must be a float32 array"))?;
        return copy_from(py, array, Some(destination), placement);
    }
    if let Ok(array) = source.cast::<PyArray1<i16>>() {
        let placement =
            Placement::elements(ElementKind::Short, source_offset, position, num_elements)?;
        let destination = destination
            .cast::<PyArray1<i16>>()
            .map_err(|_| PyTypeError::new_err("destination must be an int16 array"))?;
        return copy_from(py, array, Some(destination), placement);
    }
    Err(not_a_source(source))
}

fn not_a_source(source: &Bound<'_, PyAny>) -> PyErr {
    let name = source
        .get_type()
        .name()
        .map(|n| n.to_string())
        .unwrap_or_else(|_| "<unknown>".into());
    PyTypeError::new_err(format!(
        "source must be a 1-D float32 or int16 numpy array, got {name}"
    ))
}

/// Offsets and length of one C ABI copy: source in elements, destination
/// in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Placement {
    source_offset: i32,
    destination_offset: i32,
    num_bytes: i32,
}

impl Placement {
    /// Scale an element-counted copy to bytes. The source offset stays in
    /// elements.
    fn elements(
        kind: ElementKind,
        source_offset: i32,
        position: usize,
        num_elements: i32,
    ) -> PyResult<Self> {
        let too_large = || PyValueError::new_err("copy does not fit a 32-bit byte range");
        let width = i32::try_from(kind.width()).map_err(|_| too_large())?;
        let destination_offset = kind
            .byte_offset(position)
            .and_then(|bytes| i32::try_from(bytes).ok())
            .ok_or_else(too_large)?;
        let num_bytes = num_elements.checked_mul(width).ok_or_else(too_large)?;
        Ok(Self {
            source_offset,
            destination_offset,
            num_bytes,
        })
    }
}

/// The `f32` and `i16` copy entry points behind one signature.
trait SourceElement: Element + numpy::Element {
    /// # Safety
    ///
    /// As for `runebuf_copy_f32`.
    unsafe fn copy_raw(
        src: *const Self,
        src_len: usize,
        dst: *mut u8,
        dst_len: usize,
        placement: Placement,
    ) -> i32;
}

impl SourceElement for f32 {
    unsafe fn copy_raw(
        src: *const f32,
        src_len: usize,
        dst: *mut u8,
        dst_len: usize,
        p: Placement,
    ) -> i32 {
        // SAFETY: forwarded from the caller.
        unsafe {
            runebuf_copy_f32(
                src,
                src_len,
                p.source_offset,
                dst,
                dst_len,
                p.destination_offset,
                p.num_bytes,
            )
        }
    }
}

impl SourceElement for i16 {
    unsafe fn copy_raw(
        src: *const i16,
        src_len: usize,
        dst: *mut u8,
        dst_len: usize,
        p: Placement,
    ) -> i32 {
        // SAFETY: forwarded from the caller.
        unsafe {
            runebuf_copy_i16(
                src,
                src_len,
                p.source_offset,
                dst,
                dst_len,
                p.destination_offset,
                p.num_bytes,
            )
        }
    }
}

/// Borrow both arrays, then copy between their addresses with the GIL
/// released. The borrows outlive the call.
fn copy_from<T, D>(
    py: Python<'_>,
    source: &Bound<'_, PyArray1<T>>,
    destination: Option<&Bound<'_, PyArray1<D>>>,
    placement: Placement,
) -> PyResult<()>
where
    T: SourceElement,
    D: numpy::Element,
{
    let pinned = source.try_readonly().map_err(|e| unavailable("source", e))?;
    let src = pinned
        .as_slice()
        .map_err(|e| PyValueError::new_err(format!("source: {e}")))?;
    // Convert pointers to usize so the closure is Ungil.
    let (src_addr, src_len) = (src.as_ptr() as usize, src.len());

    let mut view: Option<PyReadwriteArray1<'_, D>> = destination
        .map(|array| array.try_readwrite())
        .transpose()
        .map_err(|e| unavailable("destination", e))?;
    let (dst_addr, dst_len) = match view.as_mut() {
        Some(view) => {
            let dst = view
                .as_slice_mut()
                .map_err(|e| PyValueError::new_err(format!("destination: {e}")))?;
            (dst.as_mut_ptr() as usize, std::mem::size_of_val(dst))
        }
        None => (0, 0),
    };

    let status = py.detach(|| {
        // SAFETY: `pinned` and `view` hold both arrays borrowed and
        // contiguous until after this call; the lengths are theirs.
        unsafe {
            T::copy_raw(
                src_addr as *const T,
                src_len,
                dst_addr as *mut u8,
                dst_len,
                placement,
            )
        }
    });
    check_status(status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn element_placement_scales_destination_only() {
        let p = Placement::elements(ElementKind::Float, 3, 2, 5).unwrap();
        assert_eq!(
            p,
            Placement {
                source_offset: 3,
                destination_offset: 8,
                num_bytes: 20,
            }
        );
        let p = Placement::elements(ElementKind::Short, 1, 0, 4).unwrap();
        assert_eq!((p.source_offset, p.destination_offset, p.num_bytes), (1, 0, 8));
    }

    #[test]
    fn negative_element_count_reaches_the_bridge_negative() {
        let p = Placement::elements(ElementKind::Short, 0, 0, -2).unwrap();
        assert_eq!(p.num_bytes, -4);
    }

    #[test]
    fn element_placement_rejects_32_bit_overflow() {
        assert!(Placement::elements(ElementKind::Float, 0, 0, i32::MAX).is_err());
        assert!(Placement::elements(ElementKind::Float, 0, usize::MAX, 1).is_err());
        assert!(Placement::elements(ElementKind::Short, 0, 1 << 30, 1).is_err());
    }

    #[test]
    fn raw_copy_dispatches_by_source_width() {
        let floats = [1.0f32, 2.0];
        let shorts = [3i16, 4];
        let mut dst = [0u8; 4];
        let p = Placement {
            source_offset: 1,
            destination_offset: 0,
            num_bytes: 4,
        };
        // SAFETY: all pointers and lengths come from live arrays.
        let status = unsafe { f32::copy_raw(floats.as_ptr(), 2, dst.as_mut_ptr(), 4, p) };
        assert_eq!(status, 0);
        assert_eq!(dst, 2.0f32.to_ne_bytes());

        let p = Placement { num_bytes: 2, ..p };
        // SAFETY: as above.
        let status = unsafe { i16::copy_raw(shorts.as_ptr(), 2, dst.as_mut_ptr(), 4, p) };
        assert_eq!(status, 0);
        assert_eq!(&dst[..2], &4i16.to_ne_bytes());
    }
}
