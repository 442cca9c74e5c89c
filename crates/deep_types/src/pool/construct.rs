//! Type construction helpers for the Pool.
//!
//! Provides ergonomic methods for creating compound types.

use crate::{FieldDef, Idx, Pool, StructDef, Tag, TypeDefError};

impl Pool {
    // === Simple Container Constructors ===

    /// Create a pointer type `*elem`.
    pub fn pointer(&mut self, elem: Idx) -> Idx {
        self.intern(Tag::Pointer, elem.raw())
    }

    /// Create a slice type `[]elem`.
    pub fn slice(&mut self, elem: Idx) -> Idx {
        self.intern(Tag::Slice, elem.raw())
    }

    /// Create a channel type `chan elem`.
    pub fn chan(&mut self, elem: Idx) -> Idx {
        self.intern(Tag::Chan, elem.raw())
    }

    // === Extra-encoded Constructors ===

    /// Create an array type `[len]elem`.
    pub fn array(&mut self, len: u32, elem: Idx) -> Idx {
        self.intern_complex(Tag::Array, &[len, elem.raw()])
    }

    /// Create an array type `[len]elem` from a host length.
    ///
    /// Fails if `len` does not fit the pool's 32-bit length encoding.
    pub fn try_array(&mut self, len: usize, elem: Idx) -> Result<Idx, TypeDefError> {
        let len = u32::try_from(len).map_err(|_| TypeDefError::ArrayTooLong { len })?;
        Ok(self.array(len, elem))
    }

    /// Create a map type `map[key]value`.
    pub fn map(&mut self, key: Idx, value: Idx) -> Idx {
        self.intern_complex(Tag::Map, &[key.raw(), value.raw()])
    }

    /// Create a function type `func(params...) (results...)`.
    #[allow(clippy::cast_possible_truncation)]
    pub fn func(&mut self, params: &[Idx], results: &[Idx]) -> Idx {
        let mut extra = Vec::with_capacity(params.len() + results.len() + 2);
        extra.push(params.len() as u32);
        extra.extend(params.iter().map(|p| p.raw()));
        extra.push(results.len() as u32);
        extra.extend(results.iter().map(|r| r.raw()));
        self.intern_complex(Tag::Func, &extra)
    }

    // === Nominal Constructors ===

    /// Create (or reuse) a named interface type.
    pub fn interface(&mut self, name: &str) -> Idx {
        self.intern_interface(name)
    }

    /// Declare a struct type without fields.
    ///
    /// Every call creates a distinct type, even for equal names. Fill in the
    /// fields with [`define_struct`](Self::define_struct); until then the
    /// struct is treated as having no fields.
    pub fn declare_struct(&mut self, name: &str) -> Idx {
        self.push_struct(StructDef::declared(name.into()))
    }

    /// Give a declared struct its fields.
    pub fn define_struct(&mut self, idx: Idx, fields: Vec<FieldDef>) -> Result<(), TypeDefError> {
        let def = self
            .struct_def_mut(idx)
            .ok_or(TypeDefError::NotAStruct { idx })?;
        if def.defined {
            return Err(TypeDefError::AlreadyDefined {
                name: def.name.to_string(),
            });
        }
        def.fields = fields;
        def.defined = true;
        Ok(())
    }

    /// Declare and define a struct in one step.
    pub fn struct_type(&mut self, name: &str, fields: Vec<FieldDef>) -> Idx {
        let mut def = StructDef::declared(name.into());
        def.fields = fields;
        def.defined = true;
        self.push_struct(def)
    }
}
