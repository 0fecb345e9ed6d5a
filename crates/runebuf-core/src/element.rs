//! Fixed-width numeric element types that can cross the bridge.
//!
//! [`Element`] is sealed: only plain-old-data types without padding or
//! invalid bit patterns may be viewed as raw bytes by [`crate::raw`].

use std::fmt;

mod sealed {
    pub trait Sealed {}
    impl Sealed for u8 {}
    impl Sealed for i16 {}
    impl Sealed for i32 {}
    impl Sealed for f32 {}
}

/// Runtime tag for an element type.
///
/// Used wherever the element type is only known at runtime (C ABI,
/// NumPy dtype dispatch, direct-buffer allocation).
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// Unsigned 8-bit byte.
    Byte = 0,
    /// Signed 16-bit integer.
    Short = 1,
    /// Signed 32-bit integer.
    Int = 2,
    /// IEEE-754 32-bit float.
    Float = 3,
}

impl ElementKind {
    /// All kinds, in discriminant order.
    pub const ALL: [ElementKind; 4] = [Self::Byte, Self::Short, Self::Int, Self::Float];

    /// Size of one element in bytes.
    pub const fn width(self) -> usize {
        match self {
            Self::Byte => 1,
            Self::Short => 2,
            Self::Int | Self::Float => 4,
        }
    }

    /// Decode a C ABI discriminant.
    pub fn from_raw(raw: i32) -> Option<Self> {
        match raw {
            0 => Some(Self::Byte),
            1 => Some(Self::Short),
            2 => Some(Self::Int),
            3 => Some(Self::Float),
            _ => None,
        }
    }

    /// Convert an element-indexed offset into a byte offset.
    ///
    /// Returns `None` on overflow.
    pub fn byte_offset(self, elements: usize) -> Option<usize> {
        elements.checked_mul(self.width())
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Byte => "u8",
            Self::Short => "i16",
            Self::Int => "i32",
            Self::Float => "f32",
        };
        f.write_str(name)
    }
}

/// A fixed-width element that may be reinterpreted as native-order bytes.
pub trait Element: sealed::Sealed + Copy + Default + Send + Sync + 'static {
    /// Runtime tag for this type.
    const KIND: ElementKind;

    /// Size in bytes; always equals `size_of::<Self>()`.
    const WIDTH: usize = Self::KIND.width();
}

impl Element for u8 {
    const KIND: ElementKind = ElementKind::Byte;
}

impl Element for i16 {
    const KIND: ElementKind = ElementKind::Short;
}

impl Element for i32 {
    const KIND: ElementKind = ElementKind::Int;
}

impl Element for f32 {
    const KIND: ElementKind = ElementKind::Float;
}
