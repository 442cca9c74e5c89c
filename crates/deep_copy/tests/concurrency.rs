//! Copies of independent inputs on separate threads.

#![allow(clippy::unwrap_used, clippy::expect_used, reason = "Tests can panic")]

mod common;

use std::thread;

use pretty_assertions::assert_eq;

use deep_copy::{copy_value, CopyEngine};
use deep_types::Pool;
use deep_value::{Heap, Value};

use common::{build_list, deep_eq, linked_list_types};

#[test]
fn threads_copying_their_own_heaps_agree_with_sequential() {
    let mut pool = Pool::new();
    let (_, next) = linked_list_types(&mut pool);

    let inputs: Vec<(Heap, Value)> = (0..4)
        .map(|i| {
            let mut heap = Heap::new();
            let head = build_list(&mut heap, 200 + i);
            (heap, head)
        })
        .collect();

    let mut sequential = inputs.clone();
    let expected: Vec<Value> = sequential
        .iter_mut()
        .map(|(heap, head)| copy_value(&pool, heap, next, head).unwrap())
        .collect();

    let mut parallel = inputs.clone();
    let pool = &pool;
    let actual: Vec<Value> = thread::scope(|s| {
        let handles: Vec<_> = parallel
            .iter_mut()
            .map(|(heap, head)| s.spawn(move || copy_value(pool, heap, next, head).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    // Same inputs, same allocation order: the copies match handle for handle.
    assert_eq!(actual, expected);
    for ((heap, head), copy) in parallel.iter().zip(&actual) {
        assert!(deep_eq(pool, heap, head, heap, copy, next));
    }
}

#[test]
fn one_source_heap_shared_by_readers() {
    let mut pool = Pool::new();
    let (_, next) = linked_list_types(&mut pool);
    let mut source = Heap::new();
    let head = build_list(&mut source, 64);
    let (pool, source, head) = (&pool, &source, &head);

    let copies: Vec<Heap> = thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| {
                s.spawn(move || {
                    let mut dst = Heap::new();
                    let moved = CopyEngine::new(pool)
                        .transfer(source, &mut dst, next, head)
                        .unwrap();
                    assert!(deep_eq(pool, source, head, &dst, &moved, next));
                    dst
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(copies.len(), 4);
    for dst in &copies {
        assert_eq!(dst.cell_count(), 64);
    }
    assert_eq!(source.cell_count(), 64);
}

#[test]
fn typed_copies_on_threads() {
    use std::sync::Arc;

    let shared = Arc::new(vec![String::from("a"), String::from("b")]);
    let input = vec![Arc::clone(&shared), Arc::clone(&shared)];
    let input = &input;

    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(move || {
                let copy = deep_copy::copy(input).unwrap();
                assert!(Arc::ptr_eq(&copy[0], &copy[1]));
                assert!(!Arc::ptr_eq(&copy[0], &input[0]));
                assert_eq!(*copy[0], *input[0]);
            });
        }
    });
}
