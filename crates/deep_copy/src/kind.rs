//! Structural kinds.

use std::fmt;

use deep_types::Tag;

/// Structural category of a type. Decides how the engine copies a value.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Kind {
    /// Booleans, numbers, complex numbers, and strings. Copied by value.
    Scalar,
    Pointer,
    /// Fixed-size array with value semantics.
    Array,
    /// Window onto a shared backing store.
    Slice,
    Map,
    Struct,
    /// A value boxed with its dynamic type.
    Interface,
    /// Functions, channels, unsafe pointers. Never copied.
    Unsupported,
}

impl Kind {
    /// Kind of a pool tag. Total: tags that do not describe a usable type
    /// are `Unsupported`.
    pub const fn of(tag: Tag) -> Self {
        match tag {
            Tag::Bool
            | Tag::Int
            | Tag::Int8
            | Tag::Int16
            | Tag::Int32
            | Tag::Int64
            | Tag::Uint
            | Tag::Uint8
            | Tag::Uint16
            | Tag::Uint32
            | Tag::Uint64
            | Tag::Uintptr
            | Tag::Float32
            | Tag::Float64
            | Tag::Complex64
            | Tag::Complex128
            | Tag::String => Kind::Scalar,
            Tag::Pointer => Kind::Pointer,
            Tag::Array => Kind::Array,
            Tag::Slice => Kind::Slice,
            Tag::Map => Kind::Map,
            Tag::Struct => Kind::Struct,
            Tag::Any | Tag::Interface => Kind::Interface,
            Tag::UnsafePointer | Tag::Chan | Tag::Func | Tag::Reserved => Kind::Unsupported,
        }
    }

    /// Whether values of this kind carry an identity (or box one).
    #[inline]
    pub const fn is_reference(self) -> bool {
        matches!(
            self,
            Kind::Pointer | Kind::Slice | Kind::Map | Kind::Interface
        )
    }

    pub const fn name(self) -> &'static str {
        match self {
            Kind::Scalar => "scalar",
            Kind::Pointer => "pointer",
            Kind::Array => "array",
            Kind::Slice => "slice",
            Kind::Map => "map",
            Kind::Struct => "struct",
            Kind::Interface => "interface",
            Kind::Unsupported => "unsupported",
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
