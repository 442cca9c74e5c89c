//! Type classifier.
//!
//! Walks the type pool to find each type's [`Kind`] and its transitive
//! [`CopyClass`]. Uses memoization and cycle detection to handle recursive
//! types.

use std::cell::RefCell;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use deep_types::{Idx, Pool, Tag};

use crate::Kind;

/// How much work copying a value of a type takes.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum CopyClass {
    /// No reference-bearing or unsupported node is reachable without going
    /// through a reference. A value clone is already a full copy.
    ///
    /// Examples: `int`, `string`, `[4]float64`, `struct { X, Y int }`, `[0]func()`.
    Inline,

    /// Contains pointers, slices, maps, or interfaces. Needs traversal.
    Indirect,

    /// An unsupported kind is reachable without indirection, so every value
    /// of the type fails to copy.
    ///
    /// Examples: `func()`, `chan int`, `struct { F func() }`, `[2]chan int`.
    Rejected,
}

/// Type classifier for the copy engine.
///
/// Uses `RefCell` for the cache and cycle-detection set so that lookups
/// take `&self`.
pub struct Classifier<'pool> {
    pool: &'pool Pool,
    cache: RefCell<FxHashMap<Idx, CopyClass>>,
    /// Structs currently being classified. Meeting one again means a struct
    /// contains itself by value, which only a malformed pool can express.
    classifying: RefCell<FxHashSet<Idx>>,
}

impl<'pool> Classifier<'pool> {
    pub fn new(pool: &'pool Pool) -> Self {
        Self {
            pool,
            cache: RefCell::new(FxHashMap::default()),
            classifying: RefCell::new(FxHashSet::default()),
        }
    }

    #[inline]
    pub fn pool(&self) -> &'pool Pool {
        self.pool
    }

    /// Shallow kind of `idx`. Total over every index, including ones the
    /// pool does not contain.
    #[inline]
    pub fn kind_of(&self, idx: Idx) -> Kind {
        Kind::of(self.pool.tag(idx))
    }

    /// Transitive copy class of `idx`, memoized.
    pub fn copy_class(&self, idx: Idx) -> CopyClass {
        if let Some(&cached) = self.cache.borrow().get(&idx) {
            return cached;
        }

        // Recursive by value: conservative.
        if !self.classifying.borrow_mut().insert(idx) {
            return CopyClass::Indirect;
        }

        let result = self.classify_by_tag(idx);

        self.classifying.borrow_mut().remove(&idx);
        self.cache.borrow_mut().insert(idx, result);
        result
    }

    #[inline]
    pub fn is_inline(&self, idx: Idx) -> bool {
        self.copy_class(idx) == CopyClass::Inline
    }

    /// The unsupported type that makes `idx` `Rejected`: `idx` itself, or a
    /// field or element type reached without indirection. `None` if `idx`
    /// is not rejected.
    pub fn rejection_site(&self, idx: Idx) -> Option<Idx> {
        if self.copy_class(idx) != CopyClass::Rejected {
            return None;
        }
        match self.pool.tag(idx) {
            Tag::Array => self.rejection_site(self.pool.array_elem(idx)),
            Tag::Struct => self
                .field_types(idx)
                .into_iter()
                .find_map(|field| self.rejection_site(field)),
            _ => Some(idx),
        }
    }

    fn classify_by_tag(&self, idx: Idx) -> CopyClass {
        match Kind::of(self.pool.tag(idx)) {
            Kind::Scalar => CopyClass::Inline,
            Kind::Pointer | Kind::Slice | Kind::Map | Kind::Interface => CopyClass::Indirect,
            Kind::Unsupported => CopyClass::Rejected,

            // An empty array holds nothing to copy, whatever its element.
            Kind::Array if self.pool.array_len(idx) == 0 => CopyClass::Inline,
            Kind::Array => self.copy_class(self.pool.array_elem(idx)),

            Kind::Struct => self.classify_children(&self.field_types(idx)),
        }
    }

    fn field_types(&self, idx: Idx) -> SmallVec<[Idx; 8]> {
        self.pool
            .struct_def(idx)
            .map(|def| def.fields.iter().map(|field| field.ty).collect())
            .unwrap_or_default()
    }

    /// The transitive rule: any `Rejected` child rejects the compound, else
    /// any `Indirect` child makes it `Indirect`, else it is `Inline`.
    fn classify_children(&self, children: &[Idx]) -> CopyClass {
        let mut has_indirect = false;

        for &child in children {
            match self.copy_class(child) {
                CopyClass::Inline => {}
                CopyClass::Rejected => return CopyClass::Rejected,
                CopyClass::Indirect => has_indirect = true,
            }
        }

        if has_indirect {
            CopyClass::Indirect
        } else {
            CopyClass::Inline
        }
    }
}
