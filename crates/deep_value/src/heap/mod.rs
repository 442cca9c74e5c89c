//! Arena storage for reference-bearing values.
//!
//! The heap owns three kinds of storage, each addressed by a dense handle:
//!
//! - **cells** ([`PtrId`]): targets of pointers
//! - **backing stores** ([`BackingId`]): arrays that slices are windows onto
//! - **maps** ([`MapId`])
//!
//! A handle is the storage's identity. Two pointers alias iff they hold the
//! same `PtrId`; two slices alias iff they share a `BackingId` and their
//! windows overlap. Storage is append-only except for [`Heap::rollback`],
//! which discards everything allocated after a [`HeapMark`].

mod map;

use std::fmt;

use crate::Value;

pub use map::MapStore;

macro_rules! handle {
    ($(#[$doc:meta])* $name:ident, $prefix:literal) => {
        $(#[$doc])*
        #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(u32);

        impl $name {
            #[inline]
            pub const fn from_raw(raw: u32) -> Self {
                Self(raw)
            }

            #[inline]
            pub const fn raw(self) -> u32 {
                self.0
            }

            #[inline]
            fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, concat!($prefix, "#{}"), self.0)
            }
        }
    };
}

handle!(
    /// Handle of a pointer target cell.
    PtrId,
    "cell"
);
handle!(
    /// Handle of a slice backing store.
    BackingId,
    "backing"
);
handle!(
    /// Handle of a map.
    MapId,
    "map"
);

/// A slice: a window `[offset, offset + len)` onto a backing store that may
/// grow in place up to `offset + cap`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct SliceRef {
    pub backing: BackingId,
    pub offset: u32,
    pub len: u32,
    pub cap: u32,
}

impl SliceRef {
    #[inline]
    pub fn len(self) -> usize {
        self.len as usize
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn cap(self) -> usize {
        self.cap as usize
    }

    /// The same window re-projected onto another backing store.
    #[inline]
    #[must_use]
    pub fn with_backing(self, backing: BackingId) -> Self {
        Self { backing, ..self }
    }
}

/// A backing store. `elems` holds the initialized prefix; `cap` bounds growth.
#[derive(Clone, Debug)]
struct Backing {
    elems: Vec<Value>,
    cap: u32,
}

/// Snapshot of the heap's allocation counts, for [`Heap::rollback`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct HeapMark {
    cells: usize,
    backings: usize,
    maps: usize,
}

/// Arena of cells, backing stores, and maps.
#[derive(Clone, Debug, Default)]
pub struct Heap {
    cells: Vec<Value>,
    backings: Vec<Backing>,
    maps: Vec<MapStore>,
}

impl Heap {
    pub fn new() -> Self {
        Self::default()
    }

    // === Cells ===

    /// Allocate a cell holding `value` and return its handle.
    #[allow(clippy::cast_possible_truncation)]
    pub fn alloc(&mut self, value: Value) -> PtrId {
        let id = PtrId(self.cells.len() as u32);
        self.cells.push(value);
        id
    }

    /// Read a cell.
    #[inline]
    pub fn load(&self, id: PtrId) -> Option<&Value> {
        self.cells.get(id.index())
    }

    /// Mutable access to a cell.
    #[inline]
    pub fn load_mut(&mut self, id: PtrId) -> Option<&mut Value> {
        self.cells.get_mut(id.index())
    }

    /// Overwrite a cell. Returns `false` if the handle is dangling.
    pub fn store(&mut self, id: PtrId, value: Value) -> bool {
        match self.cells.get_mut(id.index()) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    // === Backing stores and slices ===

    /// Allocate an empty backing store with room for `cap` elements.
    #[allow(clippy::cast_possible_truncation)]
    pub fn alloc_backing(&mut self, cap: usize) -> BackingId {
        let id = BackingId(self.backings.len() as u32);
        self.backings.push(Backing {
            elems: Vec::with_capacity(cap),
            cap: cap as u32,
        });
        id
    }

    /// Append an element to the initialized prefix of a backing store.
    /// Returns `false` if the handle is dangling or the store is full.
    pub fn backing_push(&mut self, id: BackingId, value: Value) -> bool {
        match self.backings.get_mut(id.index()) {
            Some(b) if b.elems.len() < b.cap as usize => {
                b.elems.push(value);
                true
            }
            _ => false,
        }
    }

    /// Initialized elements of a backing store.
    #[inline]
    pub fn backing_elems(&self, id: BackingId) -> Option<&[Value]> {
        self.backings.get(id.index()).map(|b| b.elems.as_slice())
    }

    /// Capacity of a backing store.
    #[inline]
    pub fn backing_cap(&self, id: BackingId) -> Option<usize> {
        self.backings.get(id.index()).map(|b| b.cap as usize)
    }

    /// Allocate a slice over a fresh backing store with `len == cap`.
    pub fn make_slice(&mut self, elems: Vec<Value>) -> SliceRef {
        let len = elems.len();
        self.make_slice_with_capacity(elems, len)
    }

    /// Allocate a slice with spare capacity. `cap` is raised to `elems.len()`
    /// if smaller.
    #[allow(clippy::cast_possible_truncation)]
    pub fn make_slice_with_capacity(&mut self, elems: Vec<Value>, cap: usize) -> SliceRef {
        let len = elems.len() as u32;
        let cap = cap.max(elems.len()) as u32;
        let backing = BackingId(self.backings.len() as u32);
        let mut stored = Vec::with_capacity(cap as usize);
        stored.extend(elems);
        self.backings.push(Backing { elems: stored, cap });
        SliceRef {
            backing,
            offset: 0,
            len,
            cap,
        }
    }

    /// Elements visible through a slice.
    pub fn slice_elems(&self, slice: SliceRef) -> Option<&[Value]> {
        let start = slice.offset as usize;
        self.backing_elems(slice.backing)?
            .get(start..start + slice.len())
    }

    /// Element `index` of a slice.
    pub fn slice_get(&self, slice: SliceRef, index: usize) -> Option<&Value> {
        self.slice_elems(slice)?.get(index)
    }

    /// Overwrite element `index` of a slice. Writes are visible through every
    /// slice sharing the backing store.
    pub fn slice_set(&mut self, slice: SliceRef, index: usize, value: Value) -> bool {
        if index >= slice.len() {
            return false;
        }
        let at = slice.offset as usize + index;
        match self
            .backings
            .get_mut(slice.backing.index())
            .and_then(|b| b.elems.get_mut(at))
        {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Append to a slice with the usual growth rule: write in place while
    /// `len < cap` (visible to other slices sharing the store), otherwise move
    /// the window into a new store with doubled capacity.
    ///
    /// Appending to nil allocates a store of capacity 1. Returns `None` if
    /// the slice's backing store is dangling.
    #[allow(clippy::cast_possible_truncation)]
    pub fn append(&mut self, slice: Option<SliceRef>, value: Value) -> Option<SliceRef> {
        let Some(slice) = slice else {
            return Some(self.make_slice(vec![value]));
        };
        let backing = self.backings.get_mut(slice.backing.index())?;

        if slice.len < slice.cap {
            let at = (slice.offset + slice.len) as usize;
            match at.cmp(&backing.elems.len()) {
                std::cmp::Ordering::Less => backing.elems[at] = value,
                std::cmp::Ordering::Equal => backing.elems.push(value),
                std::cmp::Ordering::Greater => return None,
            }
            return Some(SliceRef {
                len: slice.len + 1,
                ..slice
            });
        }

        let start = slice.offset as usize;
        let mut grown: Vec<Value> = backing.elems.get(start..start + slice.len())?.to_vec();
        grown.push(value);
        let cap = (slice.cap() * 2).max(1);
        Some(self.make_slice_with_capacity(grown, cap))
    }

    /// Narrow a slice to `[lo, hi)`. `hi` may extend past `len` up to `cap`
    /// as long as those elements are initialized.
    #[allow(clippy::cast_possible_truncation)]
    pub fn reslice(&self, slice: SliceRef, lo: usize, hi: usize) -> Option<SliceRef> {
        if lo > hi || hi > slice.cap() {
            return None;
        }
        let initialized = self.backing_elems(slice.backing)?.len();
        if slice.offset as usize + hi > initialized {
            return None;
        }
        Some(SliceRef {
            backing: slice.backing,
            offset: slice.offset + lo as u32,
            len: (hi - lo) as u32,
            cap: slice.cap - lo as u32,
        })
    }

    // === Maps ===

    /// Allocate an empty map.
    #[allow(clippy::cast_possible_truncation)]
    pub fn alloc_map(&mut self) -> MapId {
        let id = MapId(self.maps.len() as u32);
        self.maps.push(MapStore::default());
        id
    }

    /// Allocate a map holding `entries`. Later duplicates overwrite earlier ones.
    pub fn make_map(&mut self, entries: impl IntoIterator<Item = (Value, Value)>) -> MapId {
        let id = self.alloc_map();
        let store = &mut self.maps[id.index()];
        for (key, value) in entries {
            store.insert(key, value);
        }
        id
    }

    #[inline]
    pub fn map(&self, id: MapId) -> Option<&MapStore> {
        self.maps.get(id.index())
    }

    #[inline]
    pub fn map_mut(&mut self, id: MapId) -> Option<&mut MapStore> {
        self.maps.get_mut(id.index())
    }

    // === Accounting ===

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    pub fn backing_count(&self) -> usize {
        self.backings.len()
    }

    #[inline]
    pub fn map_count(&self) -> usize {
        self.maps.len()
    }

    /// Total number of allocations of any kind.
    #[inline]
    pub fn allocations(&self) -> usize {
        self.cells.len() + self.backings.len() + self.maps.len()
    }

    /// Record the current allocation counts.
    pub fn mark(&self) -> HeapMark {
        HeapMark {
            cells: self.cells.len(),
            backings: self.backings.len(),
            maps: self.maps.len(),
        }
    }

    /// Discard every allocation made after `mark`.
    ///
    /// Only sound when nothing allocated before the mark was modified to
    /// refer to the discarded storage, which holds for a copy that only
    /// writes storage it allocated itself.
    pub fn rollback(&mut self, mark: HeapMark) {
        self.cells.truncate(mark.cells);
        self.backings.truncate(mark.backings);
        self.maps.truncate(mark.maps);
    }
}
