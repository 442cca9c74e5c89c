//! The copy engine for runtime values.
//!
//! [`CopyEngine`] copies a [`Value`] of a given type into freshly allocated
//! heap storage. Traversal is depth-first with memoization by identity: a
//! [`VisitedSet`] maps every source object already reached to its copy, so
//! cycles terminate and shared substructure stays shared.
//!
//! # Failure
//!
//! Copies are all-or-nothing. The engine records a [`HeapMark`] before it
//! allocates and rolls the destination heap back to it on any error, so a
//! failed copy leaves no allocations behind. Types the classifier marks
//! `Rejected` fail before anything is allocated.
//!
//! [`HeapMark`]: deep_value::HeapMark

mod composite;
mod reference;

use tracing::{debug, trace};

use deep_stack::ensure_sufficient_stack;
use deep_types::{Idx, Pool};
use deep_value::{zero_value, Dynamic, Heap, Value};

use crate::{
    Classifier, CopyClass, CopyConfig, CopyError, Identity, Kind, UnsupportedKindError,
    VisitedSet,
};

/// Counters for one copy call.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct CopyStats {
    /// Pointer cells allocated.
    pub cells: usize,
    /// Slice backing stores allocated.
    pub backings: usize,
    pub maps: usize,
    /// References resolved through the visited set instead of copied again.
    pub revisits: usize,
}

impl CopyStats {
    pub fn allocations(&self) -> usize {
        self.cells + self.backings + self.maps
    }
}

/// Reusable copy engine over one type pool.
///
/// The engine holds only the classifier cache and the policy; every call
/// gets its own visited set, so calls never influence each other.
pub struct CopyEngine<'pool> {
    classifier: Classifier<'pool>,
    config: CopyConfig,
}

impl<'pool> CopyEngine<'pool> {
    pub fn new(pool: &'pool Pool) -> Self {
        Self::with_config(pool, CopyConfig::default())
    }

    pub fn with_config(pool: &'pool Pool, config: CopyConfig) -> Self {
        Self {
            classifier: Classifier::new(pool),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &CopyConfig {
        &self.config
    }

    #[inline]
    pub fn classifier(&self) -> &Classifier<'pool> {
        &self.classifier
    }

    /// Copy `value` of type `ty` within `heap`. The result shares no mutable
    /// storage with `value`.
    pub fn copy(&self, heap: &mut Heap, ty: Idx, value: &Value) -> Result<Value, CopyError> {
        self.run(None, heap, ty, value).map(|(copy, _)| copy)
    }

    /// Like [`copy`](Self::copy), also returning what the copy allocated.
    pub fn copy_with_stats(
        &self,
        heap: &mut Heap,
        ty: Idx,
        value: &Value,
    ) -> Result<(Value, CopyStats), CopyError> {
        self.run(None, heap, ty, value)
    }

    /// Copy an interface's contents, keeping its dynamic type.
    pub fn copy_dynamic(&self, heap: &mut Heap, dynamic: &Dynamic) -> Result<Dynamic, CopyError> {
        let value = self.copy(heap, dynamic.ty, &dynamic.value)?;
        Ok(Dynamic::new(dynamic.ty, value))
    }

    /// Copy `value`, whose handles refer to `src`, into `dst`.
    ///
    /// `src` is only read. On failure `dst` is left as it was.
    pub fn transfer(
        &self,
        src: &Heap,
        dst: &mut Heap,
        ty: Idx,
        value: &Value,
    ) -> Result<Value, CopyError> {
        self.run(Some(src), dst, ty, value).map(|(copy, _)| copy)
    }

    fn run(
        &self,
        src: Option<&Heap>,
        dst: &mut Heap,
        ty: Idx,
        value: &Value,
    ) -> Result<(Value, CopyStats), CopyError> {
        match self.classifier.copy_class(ty) {
            CopyClass::Inline => return Ok((value.clone(), CopyStats::default())),
            CopyClass::Rejected => {
                let err = rejection(&self.classifier, ty);
                debug!(ty = %self.pool().format_type(ty), error = %err, "deep copy rejected");
                return Err(err);
            }
            CopyClass::Indirect => {}
        }

        let mark = dst.mark();
        let mut copier = Copier {
            classifier: &self.classifier,
            config: self.config,
            src,
            dst: &mut *dst,
            visited: VisitedSet::new(),
            depth: 0,
            stats: CopyStats::default(),
        };

        match copier.copy(ty, value) {
            Ok(copy) => {
                let stats = copier.stats;
                debug!(
                    cells = stats.cells,
                    backings = stats.backings,
                    maps = stats.maps,
                    revisits = stats.revisits,
                    "deep copy complete"
                );
                Ok((copy, stats))
            }
            Err(err) => {
                let discarded = copier.stats.allocations();
                dst.rollback(mark);
                debug!(error = %err, discarded, "deep copy failed, heap rolled back");
                Err(err)
            }
        }
    }

    #[inline]
    fn pool(&self) -> &'pool Pool {
        self.classifier.pool()
    }
}

/// Copy `value` of type `ty` within `heap` with the default policy.
pub fn copy_value(pool: &Pool, heap: &mut Heap, ty: Idx, value: &Value) -> Result<Value, CopyError> {
    CopyEngine::new(pool).copy(heap, ty, value)
}

/// Copy an interface's contents within `heap` with the default policy.
pub fn copy_dynamic(pool: &Pool, heap: &mut Heap, dynamic: &Dynamic) -> Result<Dynamic, CopyError> {
    CopyEngine::new(pool).copy_dynamic(heap, dynamic)
}

/// Error for a `Rejected` type, naming the unsupported node inside it.
fn rejection(classifier: &Classifier<'_>, ty: Idx) -> CopyError {
    let site = classifier.rejection_site(ty).unwrap_or(ty);
    UnsupportedKindError::new(classifier.kind_of(site), classifier.pool().format_type(site)).into()
}

/// State of one copy call.
struct Copier<'a, 'pool> {
    classifier: &'a Classifier<'pool>,
    config: CopyConfig,
    /// Heap the input lives in; `None` when it is `dst` itself.
    src: Option<&'a Heap>,
    dst: &'a mut Heap,
    visited: VisitedSet,
    depth: u32,
    stats: CopyStats,
}

impl Copier<'_, '_> {
    fn copy(&mut self, ty: Idx, value: &Value) -> Result<Value, CopyError> {
        match self.classifier.copy_class(ty) {
            CopyClass::Inline => return Ok(value.clone()),
            CopyClass::Rejected => return Err(rejection(self.classifier, ty)),
            CopyClass::Indirect => {}
        }
        self.descend(|this| this.copy_by_kind(ty, value))
    }

    fn copy_by_kind(&mut self, ty: Idx, value: &Value) -> Result<Value, CopyError> {
        match self.classifier.kind_of(ty) {
            Kind::Scalar => Ok(value.clone()),
            Kind::Pointer => self.copy_pointer(ty, value),
            Kind::Slice => self.copy_slice(ty, value),
            Kind::Map => self.copy_map(ty, value),
            Kind::Interface => self.copy_interface(ty, value),
            Kind::Array => self.copy_array(ty, value),
            Kind::Struct => self.copy_struct(ty, value),
            Kind::Unsupported => Err(rejection(self.classifier, ty)),
        }
    }

    /// Run one nesting level: enforce the depth limit and make sure the
    /// stack has room.
    fn descend<R>(
        &mut self,
        f: impl FnOnce(&mut Self) -> Result<R, CopyError>,
    ) -> Result<R, CopyError> {
        self.config.check_depth(self.depth)?;
        self.depth += 1;
        let result = ensure_sufficient_stack(|| f(self));
        self.depth -= 1;
        result
    }

    /// Heap the input's handles refer to.
    #[inline]
    fn source(&self) -> &Heap {
        match self.src {
            Some(src) => src,
            None => &*self.dst,
        }
    }

    #[inline]
    fn pool(&self) -> &Pool {
        self.classifier.pool()
    }

    fn placeholder(&self, ty: Idx) -> Value {
        zero_value(self.pool(), ty)
    }

    fn revisit(&mut self, source: Identity) {
        self.stats.revisits += 1;
        trace!(?source, "resolved through visited set");
    }

    fn mismatch(&self, ty: Idx, value: &Value) -> CopyError {
        CopyError::ShapeMismatch {
            type_name: self.pool().format_type(ty),
            found: value.shape_name(),
        }
    }
}

#[cfg(test)]
mod tests;
