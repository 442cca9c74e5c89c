use pretty_assertions::assert_eq;

use deep_types::FieldDef;

use super::*;

/// `type Node struct { Value int; Next *Node }`, returning `(node, *node)`.
fn linked_list_types(pool: &mut Pool) -> (Idx, Idx) {
    let node = pool.declare_struct("Node");
    let next = pool.pointer(node);
    assert!(pool
        .define_struct(
            node,
            vec![FieldDef::new("Value", Idx::INT), FieldDef::new("Next", next)],
        )
        .is_ok());
    (node, next)
}

/// Build a list `0 -> 1 -> ... -> len-1` and return the head pointer.
fn build_list(heap: &mut Heap, len: i64) -> Value {
    let mut head = Value::Pointer(None);
    for i in (0..len).rev() {
        let cell = heap.alloc(Value::Struct(vec![Value::Int(i), head]));
        head = Value::pointer(cell);
    }
    head
}

fn list_values(heap: &Heap, mut ptr: Value) -> Vec<i64> {
    let mut out = Vec::new();
    while let Some(id) = ptr.as_pointer() {
        let Some(node) = heap.load(id) else {
            panic!("dangling list node");
        };
        out.extend(node.field(0).and_then(Value::as_int));
        ptr = node.field(1).cloned().unwrap_or(Value::Pointer(None));
    }
    out
}

#[test]
fn scalar_copy_allocates_nothing() {
    let pool = Pool::new();
    let mut heap = Heap::new();
    let engine = CopyEngine::new(&pool);

    let Ok((copy, stats)) = engine.copy_with_stats(&mut heap, Idx::INT, &Value::Int(8)) else {
        panic!("scalar copy failed");
    };
    assert_eq!(copy, Value::Int(8));
    assert_eq!(stats, CopyStats::default());
    assert_eq!(heap.allocations(), 0);
}

#[test]
fn pointer_copy_is_distinct() {
    let mut pool = Pool::new();
    let ptr_ty = pool.pointer(Idx::INT);
    let mut heap = Heap::new();
    let x = heap.alloc(Value::Int(8));

    let copy = copy_value(&pool, &mut heap, ptr_ty, &Value::pointer(x));
    let Ok(Value::Pointer(Some(y))) = copy else {
        panic!("expected non-nil pointer, got {copy:?}");
    };
    assert_ne!(x, y);
    assert_eq!(heap.load(y), Some(&Value::Int(8)));

    heap.store(y, Value::Int(9));
    assert_eq!(heap.load(x), Some(&Value::Int(8)));
}

#[test]
fn nil_references_stay_nil() {
    let mut pool = Pool::new();
    let ptr = pool.pointer(Idx::INT);
    let slice = pool.slice(Idx::INT);
    let map = pool.map(Idx::STRING, Idx::INT);
    let mut heap = Heap::new();
    let engine = CopyEngine::new(&pool);

    for (ty, nil) in [
        (ptr, Value::Pointer(None)),
        (slice, Value::Slice(None)),
        (map, Value::Map(None)),
        (Idx::ANY, Value::Interface(None)),
    ] {
        assert_eq!(engine.copy(&mut heap, ty, &nil), Ok(nil));
    }
    assert_eq!(heap.allocations(), 0);
}

#[test]
fn linked_list_copies_in_order() {
    let mut pool = Pool::new();
    let (_, next) = linked_list_types(&mut pool);
    let mut heap = Heap::new();
    let head = build_list(&mut heap, 5);

    let Ok((copy, stats)) = CopyEngine::new(&pool).copy_with_stats(&mut heap, next, &head) else {
        panic!("list copy failed");
    };
    assert_ne!(copy, head);
    assert_eq!(list_values(&heap, copy), vec![0, 1, 2, 3, 4]);
    assert_eq!(stats.cells, 5);
    assert_eq!(stats.revisits, 0);
}

#[test]
fn self_loop_copies_to_self_loop() {
    let mut pool = Pool::new();
    let (_, next) = linked_list_types(&mut pool);
    let mut heap = Heap::new();
    let cell = heap.alloc(Value::Struct(vec![Value::Int(1), Value::Pointer(None)]));
    if let Some(field) = heap.load_mut(cell).and_then(|node| node.field_mut(1)) {
        *field = Value::pointer(cell);
    }

    let Ok((copy, stats)) =
        CopyEngine::new(&pool).copy_with_stats(&mut heap, next, &Value::pointer(cell))
    else {
        panic!("cyclic copy failed");
    };
    let Some(fresh) = copy.as_pointer() else {
        panic!("expected pointer");
    };
    assert_ne!(fresh, cell);
    assert_eq!(
        heap.load(fresh).and_then(|node| node.field(1)),
        Some(&Value::pointer(fresh))
    );
    assert_eq!(stats.cells, 1);
    assert_eq!(stats.revisits, 1);
}

#[test]
fn shared_pointee_stays_shared() {
    let mut pool = Pool::new();
    let ptr = pool.pointer(Idx::INT);
    let pair = pool.struct_type(
        "Pair",
        vec![FieldDef::new("A", ptr), FieldDef::new("b", ptr)],
    );
    let mut heap = Heap::new();
    let shared = heap.alloc(Value::Int(3));
    let value = Value::Struct(vec![Value::pointer(shared), Value::pointer(shared)]);

    let Ok(copy) = copy_value(&pool, &mut heap, pair, &value) else {
        panic!("pair copy failed");
    };
    let (Some(a), Some(b)) = (
        copy.field(0).and_then(Value::as_pointer),
        copy.field(1).and_then(Value::as_pointer),
    ) else {
        panic!("expected two pointers");
    };
    assert_eq!(a, b);
    assert_ne!(a, shared);
    assert_eq!(heap.cell_count(), 2);
}

#[test]
fn interface_keeps_dynamic_type() {
    let mut pool = Pool::new();
    let ptr = pool.pointer(Idx::STRING);
    let mut heap = Heap::new();
    let cell = heap.alloc(Value::string("hi"));
    let dynamic = Dynamic::new(ptr, Value::pointer(cell));

    let Ok(copy) = copy_dynamic(&pool, &mut heap, &dynamic) else {
        panic!("interface copy failed");
    };
    assert_eq!(copy.ty, ptr);
    let Some(fresh) = copy.value.as_pointer() else {
        panic!("expected pointer");
    };
    assert_ne!(fresh, cell);
    assert_eq!(heap.load(fresh).and_then(Value::as_str), Some("hi"));
}

#[test]
fn rejected_type_fails_before_allocating() {
    let mut pool = Pool::new();
    let func = pool.func(&[Idx::INT], &[Idx::STRING]);
    let ptr = pool.pointer(Idx::INT);
    let handler = pool.struct_type(
        "Handler",
        vec![FieldDef::new("State", ptr), FieldDef::new("callback", func)],
    );
    let mut heap = Heap::new();
    let state = heap.alloc(Value::Int(0));
    let value = Value::Struct(vec![Value::pointer(state), Value::Opaque(0x10)]);

    let err = copy_value(&pool, &mut heap, handler, &value);
    assert_eq!(
        err,
        Err(CopyError::Unsupported(UnsupportedKindError::new(
            Kind::Unsupported,
            "func(int) string",
        )))
    );
    assert_eq!(heap.allocations(), 1);
}

#[test]
fn failure_mid_copy_rolls_back() {
    let mut pool = Pool::new();
    let chan = pool.chan(Idx::INT);
    let chan_ptr = pool.pointer(chan);
    let int_ptr = pool.pointer(Idx::INT);
    let mixed = pool.struct_type(
        "Mixed",
        vec![FieldDef::new("N", int_ptr), FieldDef::new("C", chan_ptr)],
    );
    let mut heap = Heap::new();
    let n = heap.alloc(Value::Int(1));
    let c = heap.alloc(Value::Opaque(7));
    let value = Value::Struct(vec![Value::pointer(n), Value::pointer(c)]);
    let before = heap.mark();

    let result = copy_value(&pool, &mut heap, mixed, &value);
    let Err(CopyError::Unsupported(err)) = result else {
        panic!("expected unsupported kind, got {result:?}");
    };
    assert_eq!(err.type_name, "chan int");
    assert_eq!(heap.mark(), before);
}

#[test]
fn nil_pointer_to_unsupported_copies() {
    let mut pool = Pool::new();
    let func = pool.func(&[], &[]);
    let ptr = pool.pointer(func);
    let mut heap = Heap::new();
    assert_eq!(
        copy_value(&pool, &mut heap, ptr, &Value::Pointer(None)),
        Ok(Value::Pointer(None))
    );
}

#[test]
fn dangling_handle_is_reported() {
    let mut pool = Pool::new();
    let ptr = pool.pointer(Idx::INT);
    let mut heap = Heap::new();
    let ghost = Value::pointer(deep_value::PtrId::from_raw(40));

    assert_eq!(
        copy_value(&pool, &mut heap, ptr, &ghost),
        Err(CopyError::DanglingHandle {
            handle: "cell#40".to_owned()
        })
    );
    assert_eq!(heap.allocations(), 0);
}

#[test]
fn shape_mismatch_is_reported() {
    let mut pool = Pool::new();
    let ptr = pool.pointer(Idx::INT);
    let mut heap = Heap::new();
    assert_eq!(
        copy_value(&pool, &mut heap, ptr, &Value::Int(1)),
        Err(CopyError::ShapeMismatch {
            type_name: "*int".to_owned(),
            found: "int",
        })
    );
}

#[test]
fn depth_limit() {
    let mut pool = Pool::new();
    let (_, next) = linked_list_types(&mut pool);
    let mut heap = Heap::new();
    let head = build_list(&mut heap, 10);

    let tight = CopyEngine::with_config(&pool, CopyConfig::bounded(5));
    assert_eq!(
        tight.copy(&mut heap, next, &head),
        Err(CopyError::DepthLimitExceeded { limit: 5 })
    );
    assert_eq!(heap.cell_count(), 10);

    let roomy = CopyEngine::with_config(&pool, CopyConfig::bounded(64));
    assert!(roomy.copy(&mut heap, next, &head).is_ok());
}

#[test]
fn transfer_between_heaps() {
    let mut pool = Pool::new();
    let (_, next) = linked_list_types(&mut pool);
    let mut src = Heap::new();
    let head = build_list(&mut src, 3);
    let mut dst = Heap::new();

    let Ok(moved) = CopyEngine::new(&pool).transfer(&src, &mut dst, next, &head) else {
        panic!("transfer failed");
    };
    assert_eq!(list_values(&dst, moved), vec![0, 1, 2]);
    assert_eq!(src.cell_count(), 3);
    assert_eq!(dst.cell_count(), 3);
}
