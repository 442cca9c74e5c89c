//! Unified type index handle.
//!
//! `Idx` is the canonical type representation. Every type descriptor lives in
//! a [`Pool`](crate::Pool) and is referenced by its 32-bit index.
//!
//! # Design
//!
//! - Primitive types have fixed indices (0-18) for O(1) lookup
//! - Type equality is O(1) index comparison
//! - Copy, lightweight passing

use std::fmt;

/// A 32-bit index into the type pool.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
#[repr(transparent)]
pub struct Idx(u32);

impl Idx {
    // === Primitive Types (indices 0-18) ===
    // Pre-interned at pool creation.

    /// `bool`.
    pub const BOOL: Self = Self(0);
    /// `int` (platform word, stored as 64-bit).
    pub const INT: Self = Self(1);
    /// `int8`.
    pub const INT8: Self = Self(2);
    /// `int16`.
    pub const INT16: Self = Self(3);
    /// `int32`.
    pub const INT32: Self = Self(4);
    /// `int64`.
    pub const INT64: Self = Self(5);
    /// `uint` (platform word, stored as 64-bit).
    pub const UINT: Self = Self(6);
    /// `uint8`.
    pub const UINT8: Self = Self(7);
    /// `uint16`.
    pub const UINT16: Self = Self(8);
    /// `uint32`.
    pub const UINT32: Self = Self(9);
    /// `uint64`.
    pub const UINT64: Self = Self(10);
    /// `uintptr`: an integer, not a reference.
    pub const UINTPTR: Self = Self(11);
    /// `float32`.
    pub const FLOAT32: Self = Self(12);
    /// `float64`.
    pub const FLOAT64: Self = Self(13);
    /// `complex64`.
    pub const COMPLEX64: Self = Self(14);
    /// `complex128`.
    pub const COMPLEX128: Self = Self(15);
    /// `string` (immutable UTF-8 text).
    pub const STRING: Self = Self(16);
    /// `unsafe.Pointer`: a raw address with no copy semantics.
    pub const UNSAFE_POINTER: Self = Self(17);
    /// The empty interface `any`.
    pub const ANY: Self = Self(18);

    // === Reserved Range (19-31) ===

    /// First index for dynamically allocated types.
    pub const FIRST_DYNAMIC: u32 = 32;

    /// Sentinel value indicating no type / invalid index.
    pub const NONE: Self = Self(u32::MAX);

    /// Number of pre-interned primitive types.
    pub const PRIMITIVE_COUNT: u32 = 19;

    /// Create an index from a raw u32 value.
    #[inline]
    pub const fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw u32 value.
    #[inline]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Check if this index is in the pre-interned range.
    #[inline]
    pub const fn is_primitive(self) -> bool {
        self.0 < Self::PRIMITIVE_COUNT
    }

    /// Check if this is the NONE sentinel.
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == u32::MAX
    }

    /// Human-readable name for primitive types, `None` for pool-allocated types.
    #[inline]
    pub const fn name(self) -> Option<&'static str> {
        match self.0 {
            0 => Some("bool"),
            1 => Some("int"),
            2 => Some("int8"),
            3 => Some("int16"),
            4 => Some("int32"),
            5 => Some("int64"),
            6 => Some("uint"),
            7 => Some("uint8"),
            8 => Some("uint16"),
            9 => Some("uint32"),
            10 => Some("uint64"),
            11 => Some("uintptr"),
            12 => Some("float32"),
            13 => Some("float64"),
            14 => Some("complex64"),
            15 => Some("complex128"),
            16 => Some("string"),
            17 => Some("unsafe.Pointer"),
            18 => Some("any"),
            _ => None,
        }
    }

    /// Display name, using `"<type>"` as a fallback when no pool is at hand.
    #[inline]
    pub fn display_name(self) -> &'static str {
        self.name().unwrap_or("<type>")
    }
}

impl fmt::Debug for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), *self) {
            (_, Self::NONE) => write!(f, "Idx::NONE"),
            (Some(name), _) => write!(f, "Idx({name})"),
            (None, _) => write!(f, "Idx({})", self.0),
        }
    }
}

impl fmt::Display for Idx {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (self.name(), *self) {
            (_, Self::NONE) => write!(f, "<none>"),
            (Some(name), _) => write!(f, "{name}"),
            (None, _) => write!(f, "type#{}", self.0),
        }
    }
}

// Idx must stay exactly 4 bytes.
const _: () = assert!(std::mem::size_of::<Idx>() == 4);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn primitive_indices_are_dense() {
        assert_eq!(Idx::BOOL.raw(), 0);
        assert_eq!(Idx::STRING.raw(), 16);
        assert_eq!(Idx::ANY.raw(), Idx::PRIMITIVE_COUNT - 1);
    }

    #[test]
    fn primitive_check_works() {
        assert!(Idx::INT.is_primitive());
        assert!(Idx::ANY.is_primitive());
        assert!(!Idx::from_raw(Idx::FIRST_DYNAMIC).is_primitive());
        assert!(!Idx::from_raw(1000).is_primitive());
    }

    #[test]
    fn none_sentinel_works() {
        assert!(Idx::NONE.is_none());
        assert!(!Idx::INT.is_none());
    }

    #[test]
    fn display_uses_go_names() {
        assert_eq!(Idx::UINTPTR.to_string(), "uintptr");
        assert_eq!(Idx::UNSAFE_POINTER.to_string(), "unsafe.Pointer");
        assert_eq!(Idx::from_raw(40).to_string(), "type#40");
        assert_eq!(Idx::NONE.to_string(), "<none>");
    }
}
