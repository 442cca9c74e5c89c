//! Shared helpers for the integration tests.

#![allow(dead_code, reason = "each test binary uses a subset")]

use std::collections::{HashMap, HashSet};

use deep_copy::Identity;
use deep_types::{FieldDef, Idx, Pool, Tag};
use deep_value::{Heap, Value};

/// Structural equality of `a` (in `left`) and `b` (in `right`) under `ty`,
/// requiring the identities reached on each side to correspond one-to-one.
/// So two aliases on the left must be two aliases on the right.
pub fn deep_eq(pool: &Pool, left: &Heap, a: &Value, right: &Heap, b: &Value, ty: Idx) -> bool {
    let mut cmp = Comparer {
        pool,
        left,
        right,
        forward: HashMap::new(),
        backward: HashMap::new(),
    };
    cmp.eq(ty, a, b)
}

struct Comparer<'a> {
    pool: &'a Pool,
    left: &'a Heap,
    right: &'a Heap,
    forward: HashMap<Identity, Identity>,
    backward: HashMap<Identity, Identity>,
}

/// Outcome of pairing two identities.
enum Pairing {
    New,
    Seen,
    Conflict,
}

impl<'a> Comparer<'a> {
    fn pair(&mut self, l: Identity, r: Identity) -> Pairing {
        match (self.forward.get(&l), self.backward.get(&r)) {
            (None, None) => {
                self.forward.insert(l, r);
                self.backward.insert(r, l);
                Pairing::New
            }
            (Some(&fr), Some(&bl)) if fr == r && bl == l => Pairing::Seen,
            _ => Pairing::Conflict,
        }
    }

    fn eq(&mut self, ty: Idx, a: &'a Value, b: &'a Value) -> bool {
        let (pool, left, right) = (self.pool, self.left, self.right);
        match pool.tag(ty) {
            Tag::Pointer => match (a, b) {
                (Value::Pointer(None), Value::Pointer(None)) => true,
                (Value::Pointer(Some(x)), Value::Pointer(Some(y))) => {
                    match self.pair(Identity::Cell(*x), Identity::Cell(*y)) {
                        Pairing::Seen => true,
                        Pairing::Conflict => false,
                        Pairing::New => match (left.load(*x), right.load(*y)) {
                            (Some(va), Some(vb)) => self.eq(pool.elem(ty), va, vb),
                            _ => false,
                        },
                    }
                }
                _ => false,
            },
            Tag::Slice => match (a, b) {
                (Value::Slice(None), Value::Slice(None)) => true,
                (Value::Slice(Some(x)), Value::Slice(Some(y))) => {
                    if (x.offset, x.len, x.cap) != (y.offset, y.len, y.cap) {
                        return false;
                    }
                    match self.pair(Identity::Backing(x.backing), Identity::Backing(y.backing)) {
                        Pairing::Seen => true,
                        Pairing::Conflict => false,
                        Pairing::New => {
                            let (Some(ea), Some(eb)) = (
                                left.backing_elems(x.backing),
                                right.backing_elems(y.backing),
                            ) else {
                                return false;
                            };
                            left.backing_cap(x.backing) == right.backing_cap(y.backing)
                                && ea.len() == eb.len()
                                && ea
                                    .iter()
                                    .zip(eb)
                                    .all(|(va, vb)| self.eq(pool.elem(ty), va, vb))
                        }
                    }
                }
                _ => false,
            },
            Tag::Map => match (a, b) {
                (Value::Map(None), Value::Map(None)) => true,
                (Value::Map(Some(x)), Value::Map(Some(y))) => {
                    match self.pair(Identity::Map(*x), Identity::Map(*y)) {
                        Pairing::Seen => true,
                        Pairing::Conflict => false,
                        Pairing::New => {
                            let (Some(ma), Some(mb)) = (left.map(*x), right.map(*y))
                            else {
                                return false;
                            };
                            ma.len() == mb.len()
                                && ma.iter().zip(mb.iter()).all(|((ka, va), (kb, vb))| {
                                    self.eq(pool.map_key(ty), ka, kb)
                                        && self.eq(pool.map_value(ty), va, vb)
                                })
                        }
                    }
                }
                _ => false,
            },
            Tag::Any | Tag::Interface => match (a.as_dynamic(), b.as_dynamic()) {
                (None, None) => a.is_nil() && b.is_nil(),
                (Some(da), Some(db)) => da.ty == db.ty && self.eq(da.ty, &da.value, &db.value),
                _ => false,
            },
            Tag::Array => match (a.as_array(), b.as_array()) {
                (Some(xs), Some(ys)) => {
                    xs.len() == ys.len()
                        && xs
                            .iter()
                            .zip(ys)
                            .all(|(x, y)| self.eq(pool.array_elem(ty), x, y))
                }
                _ => false,
            },
            Tag::Struct => {
                let Some(def) = pool.struct_def(ty) else {
                    return false;
                };
                match (a.as_struct(), b.as_struct()) {
                    (Some(xs), Some(ys)) => {
                        xs.len() == def.fields.len()
                            && ys.len() == def.fields.len()
                            && def
                                .fields
                                .iter()
                                .zip(xs.iter().zip(ys))
                                .all(|(field, (x, y))| self.eq(field.ty, x, y))
                    }
                    _ => false,
                }
            }
            _ => a == b,
        }
    }
}

/// Every identity reachable from `value`.
pub fn reachable(pool: &Pool, heap: &Heap, ty: Idx, value: &Value) -> HashSet<Identity> {
    let mut seen = HashSet::new();
    walk(pool, heap, ty, value, &mut seen);
    seen
}

fn walk(pool: &Pool, heap: &Heap, ty: Idx, value: &Value, seen: &mut HashSet<Identity>) {
    match (pool.tag(ty), value) {
        (Tag::Pointer, Value::Pointer(Some(id))) => {
            if seen.insert(Identity::Cell(*id)) {
                if let Some(inner) = heap.load(*id) {
                    walk(pool, heap, pool.elem(ty), inner, seen);
                }
            }
        }
        (Tag::Slice, Value::Slice(Some(s))) => {
            if seen.insert(Identity::Backing(s.backing)) {
                for elem in heap.backing_elems(s.backing).unwrap_or_default() {
                    walk(pool, heap, pool.elem(ty), elem, seen);
                }
            }
        }
        (Tag::Map, Value::Map(Some(id))) => {
            if seen.insert(Identity::Map(*id)) {
                if let Some(map) = heap.map(*id) {
                    for (k, v) in map.iter() {
                        walk(pool, heap, pool.map_key(ty), k, seen);
                        walk(pool, heap, pool.map_value(ty), v, seen);
                    }
                }
            }
        }
        (Tag::Any | Tag::Interface, Value::Interface(Some(d))) => {
            walk(pool, heap, d.ty, &d.value, seen);
        }
        (Tag::Array, Value::Array(items)) => {
            for item in items {
                walk(pool, heap, pool.array_elem(ty), item, seen);
            }
        }
        (Tag::Struct, Value::Struct(fields)) => {
            if let Some(def) = pool.struct_def(ty) {
                for (field, value) in def.fields.iter().zip(fields) {
                    walk(pool, heap, field.ty, value, seen);
                }
            }
        }
        _ => {}
    }
}

/// `type Node struct { Value int; Next *Node }`, returning `(node, *node)`.
pub fn linked_list_types(pool: &mut Pool) -> (Idx, Idx) {
    let node = pool.declare_struct("Node");
    let next = pool.pointer(node);
    pool.define_struct(
        node,
        vec![FieldDef::new("Value", Idx::INT), FieldDef::new("Next", next)],
    )
    .expect("fresh declaration");
    (node, next)
}

/// A list `0 -> 1 -> ... -> len-1`; returns the head pointer.
pub fn build_list(heap: &mut Heap, len: i64) -> Value {
    let mut head = Value::Pointer(None);
    for i in (0..len).rev() {
        let cell = heap.alloc(Value::Struct(vec![Value::Int(i), head]));
        head = Value::pointer(cell);
    }
    head
}

pub fn ints(values: &[i64]) -> Vec<Value> {
    values.iter().copied().map(Value::Int).collect()
}
