//! Reusable source data and byte-expectation helpers.

use runebuf_core::Element;

/// Native-order bytes of a float slice.
pub fn f32_bytes(values: &[f32]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_ne_bytes()).collect()
}

/// Native-order bytes of a short slice.
pub fn i16_bytes(values: &[i16]) -> Vec<u8> {
    values.iter().flat_map(|v| v.to_ne_bytes()).collect()
}

/// `n` floats with distinct, exactly representable values: 0.5, 1.5, 2.5, ...
pub fn ramp_f32(n: usize) -> Vec<f32> {
    (0..n).map(|i| i as f32 + 0.5).collect()
}

/// `n` shorts whose two bytes differ from each other and from neighbours.
pub fn ramp_i16(n: usize) -> Vec<i16> {
    (0..n).map(|i| (0x0101 * (i as i16 % 0x7F)) + 0x0102).collect()
}

/// Byte offset at which element `k` of an `E` array begins.
pub fn element_byte_offset<E: Element>(k: usize) -> usize {
    k * E::WIDTH
}
