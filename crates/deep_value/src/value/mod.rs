//! Runtime values.
//!
//! A `Value` is untyped on its own: the engine always pairs it with the
//! [`Idx`] of its static type. Scalars are stored inline. Everything that can
//! alias lives in a [`Heap`](crate::Heap) and is referenced by handle, so a
//! handle is the value's identity.
//!
//! # Equality
//!
//! `PartialEq`/`Hash` implement identity equality in the style of `==` on
//! comparable types: two pointers are equal iff they name the same cell,
//! floats compare by bit pattern, and arrays/structs compare element-wise.
//! This is what map keys need; it is not a deep comparison.

mod zero;

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use deep_types::Idx;

use crate::{MapId, PtrId, SliceRef};

pub use zero::zero_value;

/// A complex number stored as two `f64` components.
#[derive(Copy, Clone, Debug, Default)]
pub struct Complex {
    pub re: f64,
    pub im: f64,
}

impl Complex {
    #[inline]
    pub const fn new(re: f64, im: f64) -> Self {
        Self { re, im }
    }
}

/// A value together with its dynamic type, as held by an interface.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Dynamic {
    pub ty: Idx,
    pub value: Value,
}

impl Dynamic {
    #[inline]
    pub fn new(ty: Idx, value: Value) -> Self {
        Self { ty, value }
    }
}

/// Runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    // Scalars (inline, never aliased)
    Bool(bool),
    /// Any signed integer width.
    Int(i64),
    /// Any unsigned integer width, including `uintptr`.
    Uint(u64),
    /// `float32` or `float64`.
    Float(f64),
    /// `complex64` or `complex128`.
    Complex(Complex),
    /// Immutable text. Copies share the allocation.
    Str(Arc<str>),

    // Reference-bearing (handles into a Heap, `None` is nil)
    Pointer(Option<PtrId>),
    Slice(Option<SliceRef>),
    Map(Option<MapId>),
    /// Interface box: `None` is the nil interface.
    Interface(Option<Box<Dynamic>>),

    // Composites with value semantics
    /// Fixed-size array; elements in index order.
    Array(Vec<Value>),
    /// Struct; fields in declaration order.
    Struct(Vec<Value>),

    /// Payload of a function, channel, or unsafe pointer. Never interpreted.
    Opaque(u64),
}

// Factory Methods

impl Value {
    /// Create a string value.
    #[inline]
    pub fn string(s: impl AsRef<str>) -> Self {
        Value::Str(Arc::from(s.as_ref()))
    }

    /// Box a value into an interface with its dynamic type.
    #[inline]
    pub fn boxed(ty: Idx, value: Value) -> Self {
        Value::Interface(Some(Box::new(Dynamic::new(ty, value))))
    }

    /// Pointer to a heap cell.
    #[inline]
    pub fn pointer(id: PtrId) -> Self {
        Value::Pointer(Some(id))
    }

    /// Slice value over a heap backing store.
    #[inline]
    pub fn slice(slice: SliceRef) -> Self {
        Value::Slice(Some(slice))
    }

    /// Map value over a heap map.
    #[inline]
    pub fn map(id: MapId) -> Self {
        Value::Map(Some(id))
    }
}

// Value Methods

impl Value {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_uint(&self) -> Option<u64> {
        match self {
            Value::Uint(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Cell a non-nil pointer refers to.
    pub fn as_pointer(&self) -> Option<PtrId> {
        match self {
            Value::Pointer(p) => *p,
            _ => None,
        }
    }

    /// Window of a non-nil slice.
    pub fn as_slice(&self) -> Option<SliceRef> {
        match self {
            Value::Slice(s) => *s,
            _ => None,
        }
    }

    /// Handle of a non-nil map.
    pub fn as_map(&self) -> Option<MapId> {
        match self {
            Value::Map(m) => *m,
            _ => None,
        }
    }

    /// Contents of a non-nil interface.
    pub fn as_dynamic(&self) -> Option<&Dynamic> {
        match self {
            Value::Interface(d) => d.as_deref(),
            _ => None,
        }
    }

    /// Struct fields in declaration order.
    pub fn as_struct(&self) -> Option<&[Value]> {
        match self {
            Value::Struct(fields) => Some(fields),
            _ => None,
        }
    }

    /// Struct field by position.
    pub fn field(&self, index: usize) -> Option<&Value> {
        self.as_struct().and_then(|fields| fields.get(index))
    }

    /// Mutable struct field by position.
    pub fn field_mut(&mut self, index: usize) -> Option<&mut Value> {
        match self {
            Value::Struct(fields) => fields.get_mut(index),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Value]> {
        match self {
            Value::Array(items) => Some(items),
            _ => None,
        }
    }

    /// Check if this is a nil pointer, slice, map, or interface.
    pub fn is_nil(&self) -> bool {
        matches!(
            self,
            Value::Pointer(None) | Value::Slice(None) | Value::Map(None) | Value::Interface(None)
        )
    }

    /// Shape name for diagnostics.
    pub fn shape_name(&self) -> &'static str {
        match self {
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Uint(_) => "uint",
            Value::Float(_) => "float",
            Value::Complex(_) => "complex",
            Value::Str(_) => "string",
            Value::Pointer(_) => "pointer",
            Value::Slice(_) => "slice",
            Value::Map(_) => "map",
            Value::Interface(_) => "interface",
            Value::Array(_) => "array",
            Value::Struct(_) => "struct",
            Value::Opaque(_) => "opaque",
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Uint(n) => write!(f, "{n}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Complex(c) => write!(f, "({}{:+}i)", c.re, c.im),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::Pointer(Some(id)) => write!(f, "&{id}"),
            Value::Slice(Some(s)) => write!(f, "{}[{}:{}]", s.backing, s.offset, s.offset + s.len),
            Value::Map(Some(id)) => write!(f, "{id}"),
            Value::Interface(Some(d)) => write!(f, "{}({})", d.ty, d.value),
            Value::Pointer(None) | Value::Slice(None) | Value::Map(None) | Value::Interface(None) => {
                f.write_str("nil")
            }
            Value::Array(items) | Value::Struct(items) => {
                let open = if matches!(self, Value::Array(_)) { '[' } else { '{' };
                let close = if open == '[' { ']' } else { '}' };
                write!(f, "{open}")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                write!(f, "{close}")
            }
            Value::Opaque(raw) => write!(f, "<opaque {raw:#x}>"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Uint(a), Value::Uint(b)) | (Value::Opaque(a), Value::Opaque(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::Complex(a), Value::Complex(b)) => {
                a.re.to_bits() == b.re.to_bits() && a.im.to_bits() == b.im.to_bits()
            }
            (Value::Str(a), Value::Str(b)) => a == b,
            (Value::Pointer(a), Value::Pointer(b)) => a == b,
            (Value::Slice(a), Value::Slice(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Interface(a), Value::Interface(b)) => a == b,
            (Value::Array(a), Value::Array(b)) | (Value::Struct(a), Value::Struct(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for Value {}

impl Hash for Value {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            Value::Bool(b) => b.hash(state),
            Value::Int(n) => n.hash(state),
            Value::Uint(n) | Value::Opaque(n) => n.hash(state),
            Value::Float(x) => x.to_bits().hash(state),
            Value::Complex(c) => {
                c.re.to_bits().hash(state);
                c.im.to_bits().hash(state);
            }
            Value::Str(s) => s.hash(state),
            Value::Pointer(p) => p.hash(state),
            Value::Slice(s) => s.hash(state),
            Value::Map(m) => m.hash(state),
            Value::Interface(d) => d.hash(state),
            Value::Array(items) | Value::Struct(items) => items.hash(state),
        }
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u64> for Value {
    fn from(n: u64) -> Self {
        Value::Uint(n)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::string(s)
    }
}

#[cfg(test)]
mod tests;
