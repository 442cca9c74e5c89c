//! Visited set: source identities to the copies made for them.

use rustc_hash::FxHashMap;

use deep_value::{BackingId, MapId, PtrId};

/// Identity of a reference-bearing object in a heap.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Identity {
    Cell(PtrId),
    Backing(BackingId),
    Map(MapId),
}

/// Mapping from each source object already reached in this copy to the
/// object allocated for it.
///
/// The engine records an entry right after allocating a copy and before
/// copying into it, so a cycle back to the object resolves to the copy
/// under construction.
#[derive(Debug, Default)]
pub struct VisitedSet {
    copies: FxHashMap<Identity, Identity>,
}

impl VisitedSet {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn lookup(&self, source: Identity) -> Option<Identity> {
        self.copies.get(&source).copied()
    }

    /// Record the copy made for `source`. Each source is recorded once per
    /// copy call; a second record for it replaces the first.
    pub fn record(&mut self, source: Identity, copy: Identity) {
        self.copies.insert(source, copy);
    }

    pub fn cell(&self, source: PtrId) -> Option<PtrId> {
        match self.lookup(Identity::Cell(source))? {
            Identity::Cell(copy) => Some(copy),
            _ => None,
        }
    }

    pub fn backing(&self, source: BackingId) -> Option<BackingId> {
        match self.lookup(Identity::Backing(source))? {
            Identity::Backing(copy) => Some(copy),
            _ => None,
        }
    }

    pub fn map(&self, source: MapId) -> Option<MapId> {
        match self.lookup(Identity::Map(source))? {
            Identity::Map(copy) => Some(copy),
            _ => None,
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.copies.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.copies.is_empty()
    }
}
