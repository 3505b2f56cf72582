//! Element kinds and data layouts.
//!
//! These are the plain, `Copy` enumerations that appear inside storage keys.
//! They carry no context and are compared structurally.

use core::fmt;

/// Extent of a dimension whose size is not known until runtime.
pub const DYNAMIC: i64 = -1;

/// Base scalar kind of a tensor element.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ElementKind {
    Bool,
    Int8,
    UInt8,
    Int16,
    Int32,
    Int64,
    BFloat16,
    Float16,
    Float32,
    Float64,
    Complex64,
    Complex128,
}

impl ElementKind {
    /// Storage size of a single element in bytes.
    pub fn size_in_bytes(&self) -> usize {
        match self {
            ElementKind::Bool | ElementKind::Int8 | ElementKind::UInt8 => 1,
            ElementKind::Int16 | ElementKind::BFloat16 | ElementKind::Float16 => 2,
            ElementKind::Int32 | ElementKind::Float32 => 4,
            ElementKind::Int64 | ElementKind::Float64 | ElementKind::Complex64 => 8,
            ElementKind::Complex128 => 16,
        }
    }

    /// Returns true for real floating-point kinds (not complex).
    pub fn is_floating_point(&self) -> bool {
        matches!(
            self,
            ElementKind::BFloat16 | ElementKind::Float16 | ElementKind::Float32 | ElementKind::Float64
        )
    }

    /// Returns true for signed and unsigned integer kinds. `Bool` is not an integer.
    pub fn is_integer(&self) -> bool {
        matches!(
            self,
            ElementKind::Int8
                | ElementKind::UInt8
                | ElementKind::Int16
                | ElementKind::Int32
                | ElementKind::Int64
        )
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, ElementKind::Complex64 | ElementKind::Complex128)
    }

    /// Short mnemonic, e.g. `f32` or `i64`.
    pub fn name(&self) -> &'static str {
        match self {
            ElementKind::Bool => "bool",
            ElementKind::Int8 => "i8",
            ElementKind::UInt8 => "u8",
            ElementKind::Int16 => "i16",
            ElementKind::Int32 => "i32",
            ElementKind::Int64 => "i64",
            ElementKind::BFloat16 => "bf16",
            ElementKind::Float16 => "f16",
            ElementKind::Float32 => "f32",
            ElementKind::Float64 => "f64",
            ElementKind::Complex64 => "c64",
            ElementKind::Complex128 => "c128",
        }
    }
}

impl fmt::Display for ElementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Physical arrangement of a tensor's elements.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DataLayout {
    /// No layout has been chosen yet; any layout is acceptable.
    Undefined,
    RowMajor,
    ColumnMajor,
    Nchw,
    Nhwc,
    Ncdhw,
    Ndhwc,
    /// Backend-specific layout, identified by an opaque tag.
    Custom(u16),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_sizes() {
        assert_eq!(ElementKind::Bool.size_in_bytes(), 1);
        assert_eq!(ElementKind::Float16.size_in_bytes(), 2);
        assert_eq!(ElementKind::Float32.size_in_bytes(), 4);
        assert_eq!(ElementKind::Int64.size_in_bytes(), 8);
        assert_eq!(ElementKind::Complex128.size_in_bytes(), 16);
    }

    #[test]
    fn test_element_categories() {
        assert!(ElementKind::BFloat16.is_floating_point());
        assert!(!ElementKind::Complex64.is_floating_point());
        assert!(ElementKind::Complex64.is_complex());
        assert!(ElementKind::UInt8.is_integer());
        assert!(!ElementKind::Bool.is_integer());
    }

    #[test]
    fn test_custom_layouts_compare_by_tag() {
        assert_eq!(DataLayout::Custom(7), DataLayout::Custom(7));
        assert_ne!(DataLayout::Custom(7), DataLayout::Custom(8));
        assert_ne!(DataLayout::RowMajor, DataLayout::ColumnMajor);
    }
}
