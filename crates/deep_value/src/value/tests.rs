use pretty_assertions::assert_eq;

use deep_types::{FieldDef, Pool};

use super::*;
use crate::Heap;

#[test]
fn floats_compare_by_bits() {
    assert_eq!(Value::Float(f64::NAN), Value::Float(f64::NAN));
    assert_ne!(Value::Float(0.0), Value::Float(-0.0));
}

#[test]
fn shapes_never_cross_compare() {
    assert_ne!(Value::Int(1), Value::Uint(1));
    assert_ne!(Value::Array(vec![]), Value::Struct(vec![]));
    assert_ne!(Value::Pointer(None), Value::Slice(None));
}

#[test]
fn references_compare_by_handle() {
    let mut heap = Heap::new();
    let a = heap.alloc(Value::Int(1));
    let b = heap.alloc(Value::Int(1));
    assert_eq!(Value::pointer(a), Value::pointer(a));
    assert_ne!(Value::pointer(a), Value::pointer(b));
}

#[test]
fn interfaces_compare_type_and_value() {
    assert_eq!(
        Value::boxed(Idx::INT, Value::Int(3)),
        Value::boxed(Idx::INT, Value::Int(3))
    );
    assert_ne!(
        Value::boxed(Idx::INT, Value::Int(3)),
        Value::boxed(Idx::INT64, Value::Int(3))
    );
}

#[test]
fn nil_detection() {
    assert!(Value::Pointer(None).is_nil());
    assert!(Value::Interface(None).is_nil());
    assert!(!Value::Int(0).is_nil());
    assert!(!Value::Struct(vec![]).is_nil());
}

#[test]
fn accessors() {
    let v = Value::Struct(vec![Value::string("x"), Value::Bool(true)]);
    assert_eq!(v.field(0).and_then(Value::as_str), Some("x"));
    assert_eq!(v.field(1).and_then(Value::as_bool), Some(true));
    assert_eq!(v.field(2), None);
    assert_eq!(Value::Int(1).as_struct(), None);

    let mut v = v;
    if let Some(f) = v.field_mut(1) {
        *f = Value::Bool(false);
    }
    assert_eq!(v.field(1), Some(&Value::Bool(false)));
}

#[test]
fn display() {
    assert_eq!(Value::string("hi").to_string(), "\"hi\"");
    assert_eq!(Value::Pointer(None).to_string(), "nil");
    assert_eq!(Value::pointer(crate::PtrId::from_raw(2)).to_string(), "&cell#2");
    assert_eq!(
        Value::Array(vec![Value::Int(1), Value::Int(2)]).to_string(),
        "[1 2]"
    );
    assert_eq!(
        Value::Struct(vec![Value::Int(1), Value::Bool(true)]).to_string(),
        "{1 true}"
    );
    assert_eq!(Value::Complex(Complex::new(1.0, -2.0)).to_string(), "(1-2i)");
}

#[test]
fn zero_values() {
    let mut pool = Pool::new();
    let ptr = pool.pointer(Idx::INT);
    let arr = pool.array(2, Idx::STRING);
    let point = pool.struct_type(
        "Point",
        vec![FieldDef::new("X", Idx::INT), FieldDef::new("label", ptr)],
    );

    assert_eq!(zero_value(&pool, Idx::BOOL), Value::Bool(false));
    assert_eq!(zero_value(&pool, Idx::UINT8), Value::Uint(0));
    assert_eq!(zero_value(&pool, Idx::ANY), Value::Interface(None));
    assert_eq!(zero_value(&pool, ptr), Value::Pointer(None));
    assert_eq!(
        zero_value(&pool, arr),
        Value::Array(vec![Value::string(""), Value::string("")])
    );
    assert_eq!(
        zero_value(&pool, point),
        Value::Struct(vec![Value::Int(0), Value::Pointer(None)])
    );
}

#[test]
fn zero_of_self_containing_struct_terminates() {
    let mut pool = Pool::new();
    let node = pool.declare_struct("Node");
    assert!(pool
        .define_struct(node, vec![FieldDef::new("next", node)])
        .is_ok());
    assert_eq!(
        zero_value(&pool, node),
        Value::Struct(vec![Value::Struct(vec![])])
    );
}
