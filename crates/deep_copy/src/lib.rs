//! Deep copy with cycle and sharing preservation.
//!
//! Copying produces a value that shares no mutable storage with its
//! source: every pointer target, slice backing store, and map reachable
//! from the input is reallocated, while scalars are reused as-is. Within a
//! single copy every source object is copied at most once, so cyclic input
//! terminates and two references to one object copy to two references to
//! one new object.
//!
//! Two layers:
//!
//! - **Runtime values**: [`CopyEngine`] copies a [`deep_value::Value`] of a
//!   [`deep_types::Pool`] type inside a [`deep_value::Heap`]. The
//!   [`Classifier`] decides each type's [`Kind`] and whether its values need
//!   traversal at all.
//! - **Rust values**: [`DeepCopy`] (derivable) copies ordinary Rust data,
//!   with `Rc`/`Arc` as the shared references.
//!
//! Unsupported kinds (functions, channels, unsafe pointers, locks, I/O
//! handles) fail with [`UnsupportedKindError`]. A failed copy never yields
//! a partial result.

// Lets the derive's `::deep_copy` paths resolve inside this crate's tests.
#[cfg(test)]
extern crate self as deep_copy;

mod classify;
mod config;
mod engine;
mod error;
mod kind;
mod typed;
mod visited;

pub use classify::{Classifier, CopyClass};
pub use config::CopyConfig;
pub use engine::{copy_dynamic, copy_value, CopyEngine, CopyStats};
pub use error::{CopyError, UnsupportedKindError};
pub use kind::Kind;
pub use typed::{copy, copy_with, CopyContext, DeepCopy, DynDeepCopy};
pub use visited::{Identity, VisitedSet};

pub use deep_macros::DeepCopy;
