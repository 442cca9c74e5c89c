//! Runtime values for the deep-copy engine.
//!
//! - [`Value`]: a runtime value, interpreted against a type [`Idx`](deep_types::Idx)
//! - [`Heap`]: arena owning every aliasable object (pointer cells, slice
//!   backing stores, maps)
//! - [`zero_value`]: the zero value of a type

mod heap;
mod value;

pub use heap::{BackingId, Heap, HeapMark, MapId, MapStore, PtrId, SliceRef};
pub use value::{zero_value, Complex, Dynamic, Value};
