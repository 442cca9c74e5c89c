//! Compact type item storage.
//!
//! Each type in the pool is stored as an `Item` with a tag and data field.
//! The interpretation of `data` depends on the tag.

use crate::{Idx, Tag};

/// A single type item in the pool.
///
/// - `tag`: identifies the type shape (see [`Tag`])
/// - `data`: child index, extra index, or definition index depending on tag
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Item {
    /// Type shape discriminant.
    pub tag: Tag,
    /// Tag-dependent data field.
    pub data: u32,
}

impl Item {
    /// Create a new item with the given tag and data.
    #[inline]
    pub const fn new(tag: Tag, data: u32) -> Self {
        Self { tag, data }
    }

    /// Create a primitive type item.
    #[inline]
    pub const fn primitive(tag: Tag) -> Self {
        Self { tag, data: 0 }
    }

    /// Create a simple container item (pointer, slice, chan).
    #[inline]
    pub const fn simple_container(tag: Tag, child: Idx) -> Self {
        Self {
            tag,
            data: child.raw(),
        }
    }

    /// Child index for simple container types.
    #[inline]
    pub const fn child(self) -> Idx {
        Idx::from_raw(self.data)
    }
}
