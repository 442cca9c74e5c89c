//! Per-call state for typed copies.

use std::any::{Any, TypeId};

use rustc_hash::{FxHashMap, FxHashSet};

use deep_stack::ensure_sufficient_stack;

use crate::{CopyConfig, CopyError};

/// Identity of a shared allocation: its address and the handle type.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
struct SharedKey {
    addr: usize,
    ty: TypeId,
}

impl SharedKey {
    fn of<P: 'static>(addr: usize) -> Self {
        Self {
            addr,
            ty: TypeId::of::<P>(),
        }
    }
}

/// State threaded through [`DeepCopy::deep_copy`](crate::DeepCopy::deep_copy).
///
/// Maps every shared allocation (`Rc`, `Arc`) already reached to its copy,
/// so sharing survives the copy, and tracks nesting depth for the
/// configured limit.
pub struct CopyContext {
    config: CopyConfig,
    depth: u32,
    copies: FxHashMap<SharedKey, Box<dyn Any>>,
    /// Shared allocations whose copy is being built without a placeholder.
    building: FxHashSet<SharedKey>,
    revisits: usize,
}

impl CopyContext {
    pub fn new(config: CopyConfig) -> Self {
        Self {
            config,
            depth: 0,
            copies: FxHashMap::default(),
            building: FxHashSet::default(),
            revisits: 0,
        }
    }

    #[inline]
    pub fn config(&self) -> &CopyConfig {
        &self.config
    }

    #[inline]
    pub fn depth(&self) -> u32 {
        self.depth
    }

    /// Number of distinct shared allocations copied so far.
    #[inline]
    pub fn shared_count(&self) -> usize {
        self.copies.len()
    }

    /// Number of shared references resolved to an existing copy.
    #[inline]
    pub fn revisits(&self) -> usize {
        self.revisits
    }

    /// Run one nesting level under the depth limit, with stack to spare.
    pub fn nested<R>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<R, CopyError>,
    ) -> Result<R, CopyError> {
        self.config.check_depth(self.depth)?;
        self.depth += 1;
        let result = ensure_sufficient_stack(|| f(self));
        self.depth -= 1;
        result
    }

    /// The copy already made for the allocation at `addr`, if any.
    pub(crate) fn lookup<P: Clone + 'static>(&mut self, addr: usize) -> Option<P> {
        let found = self
            .copies
            .get(&SharedKey::of::<P>(addr))?
            .downcast_ref::<P>()?
            .clone();
        self.revisits += 1;
        Some(found)
    }

    pub(crate) fn record<P: 'static>(&mut self, addr: usize, copy: P) {
        self.copies.insert(SharedKey::of::<P>(addr), Box::new(copy));
    }

    /// Mark the allocation at `addr` as under construction. Returns `false`
    /// if it already is, which means the traversal has come back to it.
    pub(crate) fn begin<P: 'static>(&mut self, addr: usize) -> bool {
        self.building.insert(SharedKey::of::<P>(addr))
    }

    pub(crate) fn finish<P: 'static>(&mut self, addr: usize) {
        self.building.remove(&SharedKey::of::<P>(addr));
    }
}

impl Default for CopyContext {
    fn default() -> Self {
        Self::new(CopyConfig::default())
    }
}
