//! Zero values per type.

use std::sync::Arc;

use rustc_hash::FxHashSet;

use deep_types::{Idx, Pool, Tag};

use super::{Complex, Value};

/// The zero value of `ty`: `false`, `0`, `""`, nil for reference shapes, and
/// element-wise zeros for arrays and structs.
///
/// A struct that contains itself by value (only constructible through a
/// malformed pool) yields an empty struct at the point of re-entry.
pub fn zero_value(pool: &Pool, ty: Idx) -> Value {
    let mut open = FxHashSet::default();
    zero_inner(pool, ty, &mut open)
}

fn zero_inner(pool: &Pool, ty: Idx, open: &mut FxHashSet<Idx>) -> Value {
    match pool.tag(ty) {
        Tag::Bool => Value::Bool(false),
        Tag::Int | Tag::Int8 | Tag::Int16 | Tag::Int32 | Tag::Int64 => Value::Int(0),
        Tag::Uint | Tag::Uint8 | Tag::Uint16 | Tag::Uint32 | Tag::Uint64 | Tag::Uintptr => {
            Value::Uint(0)
        }
        Tag::Float32 | Tag::Float64 => Value::Float(0.0),
        Tag::Complex64 | Tag::Complex128 => Value::Complex(Complex::default()),
        Tag::String => Value::Str(Arc::from("")),
        Tag::Any | Tag::Interface => Value::Interface(None),
        Tag::Pointer => Value::Pointer(None),
        Tag::Slice => Value::Slice(None),
        Tag::Map => Value::Map(None),
        Tag::UnsafePointer | Tag::Chan | Tag::Func | Tag::Reserved => Value::Opaque(0),
        Tag::Array => {
            let elem = pool.array_elem(ty);
            let len = pool.array_len(ty);
            let zero = zero_inner(pool, elem, open);
            Value::Array(vec![zero; len])
        }
        Tag::Struct => {
            if !open.insert(ty) {
                return Value::Struct(Vec::new());
            }
            let fields = pool
                .struct_def(ty)
                .map(|def| {
                    def.fields
                        .iter()
                        .map(|field| zero_inner(pool, field.ty, open))
                        .collect()
                })
                .unwrap_or_default();
            open.remove(&ty);
            Value::Struct(fields)
        }
    }
}
