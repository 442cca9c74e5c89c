//! Type kind tag for tag-driven dispatch.
//!
//! Each type in the pool has a `Tag` that identifies its shape. The tag
//! determines how to interpret the associated `data` field.
//!
//! # Tag Categories
//!
//! - 0-18: Primitives (data unused)
//! - 31: Reserved slot (never constructed by the pool API)
//! - 32-47: Simple containers (data = child Idx)
//! - 48-63: Extra-encoded containers (data = extra index)
//! - 64-79: Nominal types (data = definition index)

use std::fmt;

/// Type shape discriminant.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(u8)]
pub enum Tag {
    // === Primitives (0-18) ===
    Bool = 0,
    Int = 1,
    Int8 = 2,
    Int16 = 3,
    Int32 = 4,
    Int64 = 5,
    Uint = 6,
    Uint8 = 7,
    Uint16 = 8,
    Uint32 = 9,
    Uint64 = 10,
    Uintptr = 11,
    Float32 = 12,
    Float64 = 13,
    Complex64 = 14,
    Complex128 = 15,
    String = 16,
    UnsafePointer = 17,
    /// The empty interface.
    Any = 18,

    /// Filler for the reserved index range and for out-of-range lookups.
    Reserved = 31,

    // === Simple Containers (32-47) ===
    // data: child Idx.raw()
    /// Pointer `*T`.
    Pointer = 32,
    /// Slice `[]T`.
    Slice = 33,
    /// Channel `chan T`.
    Chan = 34,

    // === Extra-encoded Containers (48-63) ===
    /// Fixed-size array `[N]T`. Extra layout: `[len, elem]`.
    Array = 48,
    /// Map `map[K]V`. Extra layout: `[key, value]`.
    Map = 49,
    /// Function `func(P...) (R...)`.
    /// Extra layout: `[param_count, params..., result_count, results...]`.
    Func = 50,

    // === Nominal Types (64-79) ===
    /// Struct; data indexes the pool's struct definitions.
    Struct = 64,
    /// Named interface; data indexes the pool's interface names.
    Interface = 65,
}

impl Tag {
    /// Check if this tag uses the extra array for data.
    #[inline]
    pub const fn uses_extra(self) -> bool {
        matches!(self, Self::Array | Self::Map | Self::Func)
    }

    /// Check if this tag is one of the pre-interned primitives.
    #[inline]
    pub const fn is_primitive(self) -> bool {
        (self as u8) <= (Self::Any as u8)
    }

    /// Check if this tag stores its single child directly in `data`.
    #[inline]
    pub const fn is_simple_container(self) -> bool {
        matches!(self, Self::Pointer | Self::Slice | Self::Chan)
    }

    /// Check if this tag is a nominal (definition-backed) type.
    #[inline]
    pub const fn is_nominal(self) -> bool {
        matches!(self, Self::Struct | Self::Interface)
    }

    /// Name of this tag as a static string.
    #[inline]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Int => "int",
            Self::Int8 => "int8",
            Self::Int16 => "int16",
            Self::Int32 => "int32",
            Self::Int64 => "int64",
            Self::Uint => "uint",
            Self::Uint8 => "uint8",
            Self::Uint16 => "uint16",
            Self::Uint32 => "uint32",
            Self::Uint64 => "uint64",
            Self::Uintptr => "uintptr",
            Self::Float32 => "float32",
            Self::Float64 => "float64",
            Self::Complex64 => "complex64",
            Self::Complex128 => "complex128",
            Self::String => "string",
            Self::UnsafePointer => "unsafe.Pointer",
            Self::Any => "any",
            Self::Reserved => "<reserved>",
            Self::Pointer => "ptr",
            Self::Slice => "slice",
            Self::Chan => "chan",
            Self::Array => "array",
            Self::Map => "map",
            Self::Func => "func",
            Self::Struct => "struct",
            Self::Interface => "interface",
        }
    }

    /// The primitive tag stored at a pre-interned index, in index order.
    pub(crate) const PRIMITIVES: [Tag; 19] = [
        Self::Bool,
        Self::Int,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Uint,
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint64,
        Self::Uintptr,
        Self::Float32,
        Self::Float64,
        Self::Complex64,
        Self::Complex128,
        Self::String,
        Self::UnsafePointer,
        Self::Any,
    ];
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tag::{}", self.name())
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
