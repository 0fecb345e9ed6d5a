//! Direct buffer lifecycle FFI: configure, create, position, copy into,
//! address, destroy.
//!
//! Buffers live in a global handle table; the table lock is held for the
//! whole of a copy so a concurrent destroy cannot free the storage
//! mid-write. The bridge configuration is fixed on first use.

use std::sync::{Mutex, OnceLock};

use runebuf_core::{BridgeConfig, CopyBridge, DirectBuffer, Element, ElementKind};

use crate::handle::{Handle, HandleTable};
use crate::raw::{disjoint, RawArray};
use crate::status::RunebufStatus;

static BRIDGE: OnceLock<CopyBridge> = OnceLock::new();
static BUFFERS: Mutex<HandleTable<DirectBuffer>> = Mutex::new(HandleTable::new());

/// The process-wide bridge, created with defaults unless
/// [`runebuf_configure`] ran first.
pub(crate) fn bridge() -> &'static CopyBridge {
    BRIDGE.get_or_init(CopyBridge::default)
}

/// Fix the bridge configuration for this process.
///
/// `max_buffer_bytes` caps `runebuf_buffer_create`; a nonzero
/// `require_whole_elements` rejects copies whose length is not a multiple
/// of the source element width. Must run before any other runebuf call
/// that copies or allocates; afterwards returns `RUNEBUF_STATUS_CONFIG_ERROR`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn runebuf_configure(max_buffer_bytes: usize, require_whole_elements: u8) -> i32 {
    ffi_guard!({
        let config = BridgeConfig::new()
            .with_max_buffer_bytes(max_buffer_bytes)
            .with_whole_elements(require_whole_elements != 0);
        let bridge = match CopyBridge::new(config) {
            Ok(b) => b,
            Err(e) => return RunebufStatus::from(&e) as i32,
        };
        match BRIDGE.set(bridge) {
            Ok(()) => {
                tracing::debug!(max_buffer_bytes, require_whole_elements, "bridge configured");
                RunebufStatus::Ok as i32
            }
            Err(_) => RunebufStatus::ConfigError as i32,
        }
    })
}

/// Allocate a zeroed direct buffer of `count` elements of `kind`.
///
/// `kind` is a `RunebufElementKind` value. On success writes the handle to
/// `handle_out`.
///
/// # Safety
///
/// `handle_out` must be null or valid for a `u64` write.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn runebuf_buffer_create(
    kind: i32,
    count: usize,
    handle_out: *mut u64,
) -> i32 {
    ffi_guard!({
        if handle_out.is_null() {
            return RunebufStatus::InvalidArgument as i32;
        }
        let kind = match ElementKind::from_raw(kind) {
            Some(k) => k,
            None => return RunebufStatus::InvalidArgument as i32,
        };
        let buffer = match bridge().allocate(kind, count) {
            Ok(b) => b,
            Err(e) => return RunebufStatus::from(&e) as i32,
        };
        let byte_len = buffer.byte_len();
        let mut table = ffi_lock!(BUFFERS);
        let handle = table.insert(buffer);
        tracing::debug!(
            %handle,
            %kind,
            byte_len,
            live = table.len(),
            "direct buffer created"
        );
        // SAFETY: handle_out is non-null and valid per caller contract.
        unsafe { *handle_out = handle.into_raw() };
        RunebufStatus::Ok as i32
    })
}

/// Destroy a direct buffer. Its handle and address become invalid.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn runebuf_buffer_destroy(handle: u64) -> i32 {
    ffi_guard!({
        let handle = Handle::from_raw(handle);
        let mut table = ffi_lock!(BUFFERS);
        match table.remove(handle) {
            Some(_) => {
                tracing::debug!(%handle, live = table.len(), "direct buffer destroyed");
                RunebufStatus::Ok as i32
            }
            None => RunebufStatus::InvalidHandle as i32,
        }
    })
}

/// Capacity of a direct buffer in bytes, or -1 for an invalid handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn runebuf_buffer_byte_len(handle: u64) -> i64 {
    ffi_guard_or!(-1, {
        let Ok(table) = BUFFERS.lock() else {
            return -1;
        };
        table
            .get(Handle::from_raw(handle))
            .map_or(-1, |b| i64::try_from(b.byte_len()).unwrap_or(i64::MAX))
    })
}

/// Position of a direct buffer in elements of its kind, or -1 for an
/// invalid handle.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn runebuf_buffer_position(handle: u64) -> i64 {
    ffi_guard_or!(-1, {
        let Ok(table) = BUFFERS.lock() else {
            return -1;
        };
        table
            .get(Handle::from_raw(handle))
            .map_or(-1, |b| i64::try_from(b.position()).unwrap_or(i64::MAX))
    })
}

/// Move the position of a direct buffer, in elements of its kind.
///
/// A position past the last element is `RUNEBUF_STATUS_OUT_OF_BOUNDS`.
#[no_mangle]
#[allow(unsafe_code)]
pub extern "C" fn runebuf_buffer_set_position(handle: u64, position: usize) -> i32 {
    ffi_guard!({
        let mut table = ffi_lock!(BUFFERS);
        let Some(buffer) = table.get_mut(Handle::from_raw(handle)) else {
            return RunebufStatus::InvalidHandle as i32;
        };
        RunebufStatus::from(buffer.set_position(position)) as i32
    })
}

/// Write the element kind of a direct buffer to `kind_out`.
///
/// # Safety
///
/// `kind_out` must be null or valid for an `int32_t` write.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn runebuf_buffer_kind(handle: u64, kind_out: *mut i32) -> i32 {
    ffi_guard!({
        if kind_out.is_null() {
            return RunebufStatus::InvalidArgument as i32;
        }
        let table = ffi_lock!(BUFFERS);
        let Some(buffer) = table.get(Handle::from_raw(handle)) else {
            return RunebufStatus::InvalidHandle as i32;
        };
        // SAFETY: kind_out is non-null and valid per caller contract.
        unsafe { *kind_out = buffer.kind() as i32 };
        RunebufStatus::Ok as i32
    })
}

/// Write the base address and byte capacity of a direct buffer.
///
/// The address stays valid until [`runebuf_buffer_destroy`]. Writing
/// through it while a copy into the same buffer runs is a data race.
///
/// # Safety
///
/// Each out-pointer must be null or valid for a write of its type.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn runebuf_buffer_address(
    handle: u64,
    addr_out: *mut *mut u8,
    len_out: *mut usize,
) -> i32 {
    ffi_guard!({
        if addr_out.is_null() || len_out.is_null() {
            return RunebufStatus::InvalidArgument as i32;
        }
        let mut table = ffi_lock!(BUFFERS);
        let Some(buffer) = table.get_mut(Handle::from_raw(handle)) else {
            return RunebufStatus::InvalidHandle as i32;
        };
        let bytes = buffer.as_bytes_mut();
        // SAFETY: both out-pointers are non-null and valid per caller contract.
        unsafe {
            *addr_out = bytes.as_mut_ptr();
            *len_out = bytes.len();
        }
        RunebufStatus::Ok as i32
    })
}

/// How a copy into a direct buffer is addressed.
#[derive(Clone, Copy)]
enum Placement {
    /// Explicit byte offset and byte count.
    Bytes { dst_offset: i32, num_bytes: i32 },
    /// Element count, written at the buffer's position.
    Elements { num_elements: i32 },
}

/// # Safety
///
/// `src` must satisfy [`RawArray::new`].
#[allow(unsafe_code)]
unsafe fn copy_into_buffer<E: Element>(
    src: *const E,
    src_len: usize,
    src_offset: i32,
    handle: u64,
    placement: Placement,
) -> i32 {
    // SAFETY: forwarded from the caller.
    let source = unsafe { RawArray::new(src, src_len) };
    let mut table = ffi_lock!(BUFFERS);
    let Some(buffer) = table.get_mut(Handle::from_raw(handle)) else {
        return RunebufStatus::InvalidHandle as i32;
    };
    let empty = match placement {
        Placement::Bytes { num_bytes, .. } => num_bytes == 0,
        Placement::Elements { num_elements } => num_elements == 0,
    };
    if !empty {
        let start = buffer.as_bytes().as_ptr() as usize;
        if let Err(e) = disjoint(source.span(), start..start + buffer.byte_len()) {
            return RunebufStatus::from(&e) as i32;
        }
    }
    let result = match placement {
        Placement::Bytes {
            dst_offset,
            num_bytes,
        } => bridge().copy(&source, src_offset, Some(buffer), dst_offset, num_bytes),
        Placement::Elements { num_elements } => {
            bridge().copy_elements(&source, src_offset, buffer, num_elements)
        }
    };
    RunebufStatus::from(result) as i32
}

/// Copy `num_bytes` bytes from a float array into a direct buffer.
///
/// Same argument rules as `runebuf_copy_f32`, with the destination named
/// by handle.
///
/// # Safety
///
/// `src` must be null or valid for reads of `src_len` floats for the
/// duration of the call.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn runebuf_buffer_copy_f32(
    src: *const f32,
    src_len: usize,
    src_offset: i32,
    handle: u64,
    dst_offset: i32,
    num_bytes: i32,
) -> i32 {
    let placement = Placement::Bytes {
        dst_offset,
        num_bytes,
    };
    // SAFETY: forwarded from the caller.
    ffi_guard!({ unsafe { copy_into_buffer(src, src_len, src_offset, handle, placement) } })
}

/// Copy `num_bytes` bytes from a short array into a direct buffer.
///
/// # Safety
///
/// `src` must be null or valid for reads of `src_len` shorts for the
/// duration of the call.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn runebuf_buffer_copy_i16(
    src: *const i16,
    src_len: usize,
    src_offset: i32,
    handle: u64,
    dst_offset: i32,
    num_bytes: i32,
) -> i32 {
    let placement = Placement::Bytes {
        dst_offset,
        num_bytes,
    };
    // SAFETY: forwarded from the caller.
    ffi_guard!({ unsafe { copy_into_buffer(src, src_len, src_offset, handle, placement) } })
}

/// Copy `num_elements` floats, starting at element `src_offset` of `src`,
/// into a float buffer at its position.
///
/// The position is not advanced. A buffer of another kind is
/// `RUNEBUF_STATUS_INVALID_ARGUMENT`.
///
/// # Safety
///
/// `src` must be null or valid for reads of `src_len` floats for the
/// duration of the call.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn runebuf_buffer_copy_floats(
    src: *const f32,
    src_len: usize,
    src_offset: i32,
    handle: u64,
    num_elements: i32,
) -> i32 {
    let placement = Placement::Elements { num_elements };
    // SAFETY: forwarded from the caller.
    ffi_guard!({ unsafe { copy_into_buffer(src, src_len, src_offset, handle, placement) } })
}

/// Copy `num_elements` shorts into a short buffer at its position.
///
/// # Safety
///
/// `src` must be null or valid for reads of `src_len` shorts for the
/// duration of the call.
#[no_mangle]
#[allow(unsafe_code)]
pub unsafe extern "C" fn runebuf_buffer_copy_shorts(
    src: *const i16,
    src_len: usize,
    src_offset: i32,
    handle: u64,
    num_elements: i32,
) -> i32 {
    let placement = Placement::Elements { num_elements };
    // SAFETY: forwarded from the caller.
    ffi_guard!({ unsafe { copy_into_buffer(src, src_len, src_offset, handle, placement) } })
}
