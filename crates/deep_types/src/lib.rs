//! Type descriptors for the deep-copy engine.
//!
//! Values are classified and traversed according to their type, so every
//! value travels with an [`Idx`] into a [`Pool`]. The pool covers the full
//! range of shapes the engine understands: scalars, pointers, arrays, slices,
//! maps, structs, interfaces, and the shapes it deliberately refuses to copy
//! (functions, channels, unsafe pointers).
//!
//! # Crate Dependencies
//!
//! Leaf crate. `deep_value` builds runtime values on top of it and
//! `deep_copy` classifies and traverses through it.

mod error;
mod idx;
mod item;
mod pool;
mod structs;
mod tag;

pub use error::TypeDefError;
pub use idx::Idx;
pub use item::Item;
pub use pool::Pool;
pub use structs::{FieldDef, FieldFlags, StructDef};
pub use tag::Tag;
