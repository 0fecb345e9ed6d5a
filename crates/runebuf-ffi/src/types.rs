//! C-compatible element kind enum.

use runebuf_core::ElementKind;

/// Element type of a direct buffer, for `runebuf_buffer_create`.
#[repr(i32)]
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunebufElementKind {
    /// Unsigned 8-bit byte.
    Byte = 0,
    /// Signed 16-bit integer.
    Short = 1,
    /// Signed 32-bit integer.
    Int = 2,
    /// 32-bit float.
    Float = 3,
}

impl From<RunebufElementKind> for ElementKind {
    fn from(kind: RunebufElementKind) -> Self {
        match kind {
            RunebufElementKind::Byte => ElementKind::Byte,
            RunebufElementKind::Short => ElementKind::Short,
            RunebufElementKind::Int => ElementKind::Int,
            RunebufElementKind::Float => ElementKind::Float,
        }
    }
}

impl From<ElementKind> for RunebufElementKind {
    fn from(kind: ElementKind) -> Self {
        match kind {
            ElementKind::Byte => RunebufElementKind::Byte,
            ElementKind::Short => RunebufElementKind::Short,
            ElementKind::Int => RunebufElementKind::Int,
            ElementKind::Float => RunebufElementKind::Float,
        }
    }
}
