//! Unified type pool.
//!
//! Every type descriptor is stored once as an [`Item`] and referenced by its
//! [`Idx`]. Structural types (pointers, slices, maps, ...) are interned, so
//! building the same shape twice yields the same index. Structs and named
//! interfaces are nominal: each declaration gets its own index.

mod construct;
mod format;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use crate::{Idx, Item, StructDef, Tag};

/// Interning key for structural types.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum InternKey {
    Simple(Tag, u32),
    Complex(Tag, Box<[u32]>),
    Interface(Box<str>),
}

/// Type descriptor storage.
#[derive(Clone, Debug)]
pub struct Pool {
    items: Vec<Item>,
    extra: Vec<u32>,
    structs: Vec<StructDef>,
    interfaces: Vec<Box<str>>,
    interned: FxHashMap<InternKey, Idx>,
}

impl Pool {
    /// Create a pool with all primitives pre-interned.
    pub fn new() -> Self {
        let mut items = Vec::with_capacity(Idx::FIRST_DYNAMIC as usize * 2);
        items.extend(Tag::PRIMITIVES.iter().map(|&tag| Item::primitive(tag)));
        items.resize(Idx::FIRST_DYNAMIC as usize, Item::primitive(Tag::Reserved));

        Self {
            items,
            extra: Vec::new(),
            structs: Vec::new(),
            interfaces: Vec::new(),
            interned: FxHashMap::default(),
        }
    }

    /// Number of items, including primitives and the reserved range.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Always false: primitives are pre-interned.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Check whether `idx` names an item in this pool.
    #[inline]
    pub fn contains(&self, idx: Idx) -> bool {
        (idx.raw() as usize) < self.items.len()
    }

    /// Tag of a type. Total: indices outside the pool report [`Tag::Reserved`].
    #[inline]
    pub fn tag(&self, idx: Idx) -> Tag {
        self.items
            .get(idx.raw() as usize)
            .map_or(Tag::Reserved, |item| item.tag)
    }

    /// Raw data field of a type.
    #[inline]
    pub fn data(&self, idx: Idx) -> u32 {
        self.items.get(idx.raw() as usize).map_or(0, |item| item.data)
    }

    // === Accessors ===

    /// Element type of a pointer, slice, or channel.
    #[inline]
    pub fn elem(&self, idx: Idx) -> Idx {
        debug_assert!(self.tag(idx).is_simple_container());
        Idx::from_raw(self.data(idx))
    }

    /// Length of an array type.
    #[inline]
    pub fn array_len(&self, idx: Idx) -> usize {
        debug_assert_eq!(self.tag(idx), Tag::Array);
        self.extra_at(idx, 0) as usize
    }

    /// Element type of an array type.
    #[inline]
    pub fn array_elem(&self, idx: Idx) -> Idx {
        debug_assert_eq!(self.tag(idx), Tag::Array);
        Idx::from_raw(self.extra_at(idx, 1))
    }

    /// Key type of a map type.
    #[inline]
    pub fn map_key(&self, idx: Idx) -> Idx {
        debug_assert_eq!(self.tag(idx), Tag::Map);
        Idx::from_raw(self.extra_at(idx, 0))
    }

    /// Value type of a map type.
    #[inline]
    pub fn map_value(&self, idx: Idx) -> Idx {
        debug_assert_eq!(self.tag(idx), Tag::Map);
        Idx::from_raw(self.extra_at(idx, 1))
    }

    /// Parameter types of a function type.
    pub fn func_params(&self, idx: Idx) -> SmallVec<[Idx; 4]> {
        debug_assert_eq!(self.tag(idx), Tag::Func);
        let count = self.extra_at(idx, 0) as usize;
        (0..count).map(|i| Idx::from_raw(self.extra_at(idx, 1 + i))).collect()
    }

    /// Result types of a function type.
    pub fn func_results(&self, idx: Idx) -> SmallVec<[Idx; 4]> {
        debug_assert_eq!(self.tag(idx), Tag::Func);
        let params = self.extra_at(idx, 0) as usize;
        let count = self.extra_at(idx, 1 + params) as usize;
        (0..count)
            .map(|i| Idx::from_raw(self.extra_at(idx, 2 + params + i)))
            .collect()
    }

    /// Definition of a struct type, or `None` if `idx` is not a struct.
    pub fn struct_def(&self, idx: Idx) -> Option<&StructDef> {
        if self.tag(idx) != Tag::Struct {
            return None;
        }
        self.structs.get(self.data(idx) as usize)
    }

    /// Name of a named interface type. `any` reports `None`.
    pub fn interface_name(&self, idx: Idx) -> Option<&str> {
        if self.tag(idx) != Tag::Interface {
            return None;
        }
        self.interfaces.get(self.data(idx) as usize).map(|n| &**n)
    }

    /// Check whether values of this type box a dynamically typed value.
    #[inline]
    pub fn is_interface(&self, idx: Idx) -> bool {
        matches!(self.tag(idx), Tag::Any | Tag::Interface)
    }

    // === Internals ===

    #[inline]
    fn extra_at(&self, idx: Idx, offset: usize) -> u32 {
        self.extra
            .get(self.data(idx) as usize + offset)
            .copied()
            .unwrap_or(0)
    }

    #[allow(clippy::cast_possible_truncation)]
    fn push_item(&mut self, item: Item) -> Idx {
        let idx = Idx::from_raw(self.items.len() as u32);
        self.items.push(item);
        idx
    }

    /// Intern a simple container (child stored inline).
    pub(crate) fn intern(&mut self, tag: Tag, data: u32) -> Idx {
        if let Some(&idx) = self.interned.get(&InternKey::Simple(tag, data)) {
            return idx;
        }
        let idx = self.push_item(Item::new(tag, data));
        self.interned.insert(InternKey::Simple(tag, data), idx);
        idx
    }

    /// Intern a type whose data lives in the extra array.
    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn intern_complex(&mut self, tag: Tag, extra: &[u32]) -> Idx {
        let key = InternKey::Complex(tag, extra.into());
        if let Some(&idx) = self.interned.get(&key) {
            return idx;
        }
        let start = self.extra.len() as u32;
        self.extra.extend_from_slice(extra);
        let idx = self.push_item(Item::new(tag, start));
        self.interned.insert(key, idx);
        idx
    }

    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn intern_interface(&mut self, name: &str) -> Idx {
        let key = InternKey::Interface(name.into());
        if let Some(&idx) = self.interned.get(&key) {
            return idx;
        }
        let slot = self.interfaces.len() as u32;
        self.interfaces.push(name.into());
        let idx = self.push_item(Item::new(Tag::Interface, slot));
        self.interned.insert(key, idx);
        idx
    }

    #[allow(clippy::cast_possible_truncation)]
    pub(crate) fn push_struct(&mut self, def: StructDef) -> Idx {
        let slot = self.structs.len() as u32;
        self.structs.push(def);
        self.push_item(Item::new(Tag::Struct, slot))
    }

    pub(crate) fn struct_def_mut(&mut self, idx: Idx) -> Option<&mut StructDef> {
        if self.tag(idx) != Tag::Struct {
            return None;
        }
        let slot = self.data(idx) as usize;
        self.structs.get_mut(slot)
    }
}

impl Default for Pool {
    fn default() -> Self {
        Self::new()
    }
}
