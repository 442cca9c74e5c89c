//! Pointers, slices, maps, and interfaces.
//!
//! Each reference-bearing copy follows the same order: nil stays nil, a
//! source identity already in the visited set resolves to its copy, and
//! otherwise the copy is allocated and recorded *before* its contents are
//! copied, so cycles back to it terminate.

use deep_types::Idx;
use deep_value::{Dynamic, Value};

use super::Copier;
use crate::{CopyError, Identity};

impl Copier<'_, '_> {
    pub(super) fn copy_pointer(&mut self, ty: Idx, value: &Value) -> Result<Value, CopyError> {
        let Value::Pointer(ptr) = value else {
            return Err(self.mismatch(ty, value));
        };
        let Some(src) = *ptr else {
            return Ok(Value::Pointer(None));
        };
        if let Some(done) = self.visited.cell(src) {
            self.revisit(Identity::Cell(src));
            return Ok(Value::pointer(done));
        }

        let pointee = self
            .source()
            .load(src)
            .cloned()
            .ok_or_else(|| CopyError::dangling(src))?;
        let elem = self.pool().elem(ty);
        let placeholder = self.placeholder(elem);

        let fresh = self.dst.alloc(placeholder);
        self.stats.cells += 1;
        self.visited.record(Identity::Cell(src), Identity::Cell(fresh));

        let copied = self.copy(elem, &pointee)?;
        if !self.dst.store(fresh, copied) {
            return Err(CopyError::dangling(fresh));
        }
        Ok(Value::pointer(fresh))
    }

    /// Slices copy their whole backing store, not just the visible window,
    /// so other slices over the same store re-project onto the same copy
    /// and keep overlapping exactly as before.
    pub(super) fn copy_slice(&mut self, ty: Idx, value: &Value) -> Result<Value, CopyError> {
        let Value::Slice(slice) = value else {
            return Err(self.mismatch(ty, value));
        };
        let Some(slice) = *slice else {
            return Ok(Value::Slice(None));
        };
        if let Some(done) = self.visited.backing(slice.backing) {
            self.revisit(Identity::Backing(slice.backing));
            return Ok(Value::slice(slice.with_backing(done)));
        }

        let source = self.source();
        let cap = source
            .backing_cap(slice.backing)
            .ok_or_else(|| CopyError::dangling(slice.backing))?;
        let elems: Vec<Value> = source
            .backing_elems(slice.backing)
            .ok_or_else(|| CopyError::dangling(slice.backing))?
            .to_vec();
        let elem_ty = self.pool().elem(ty);

        let fresh = self.dst.alloc_backing(cap);
        self.stats.backings += 1;
        self.visited
            .record(Identity::Backing(slice.backing), Identity::Backing(fresh));

        for elem in &elems {
            let copied = self.copy(elem_ty, elem)?;
            if !self.dst.backing_push(fresh, copied) {
                return Err(CopyError::dangling(fresh));
            }
        }
        Ok(Value::slice(slice.with_backing(fresh)))
    }

    /// Entries are copied in the source map's iteration order. Keys are
    /// copied like any other value, so pointer keys point at copied cells.
    pub(super) fn copy_map(&mut self, ty: Idx, value: &Value) -> Result<Value, CopyError> {
        let Value::Map(map) = value else {
            return Err(self.mismatch(ty, value));
        };
        let Some(src) = *map else {
            return Ok(Value::Map(None));
        };
        if let Some(done) = self.visited.map(src) {
            self.revisit(Identity::Map(src));
            return Ok(Value::map(done));
        }

        let entries: Vec<(Value, Value)> = self
            .source()
            .map(src)
            .ok_or_else(|| CopyError::dangling(src))?
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        let pool = self.pool();
        let (key_ty, value_ty) = (pool.map_key(ty), pool.map_value(ty));

        let fresh = self.dst.alloc_map();
        self.stats.maps += 1;
        self.visited.record(Identity::Map(src), Identity::Map(fresh));

        for (key, value) in &entries {
            let key = self.copy(key_ty, key)?;
            let value = self.copy(value_ty, value)?;
            let Some(store) = self.dst.map_mut(fresh) else {
                return Err(CopyError::dangling(fresh));
            };
            store.insert(key, value);
        }
        Ok(Value::map(fresh))
    }

    /// The dynamic value is copied under its dynamic type, not the
    /// interface's static type, and re-boxed with the same dynamic type.
    pub(super) fn copy_interface(&mut self, ty: Idx, value: &Value) -> Result<Value, CopyError> {
        let Value::Interface(boxed) = value else {
            return Err(self.mismatch(ty, value));
        };
        let Some(dynamic) = boxed else {
            return Ok(Value::Interface(None));
        };
        let Dynamic { ty: dyn_ty, value } = &**dynamic;
        let copied = self.copy(*dyn_ty, value)?;
        Ok(Value::boxed(*dyn_ty, copied))
    }
}
