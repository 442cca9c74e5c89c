//! Struct and field definitions for nominal struct types.

use bitflags::bitflags;

use crate::Idx;

bitflags! {
    /// Per-field attributes recorded in a struct definition.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct FieldFlags: u8 {
        /// Field is visible outside the defining package.
        const EXPORTED = 1 << 0;
        /// Field is an embedded (anonymous) field.
        const EMBEDDED = 1 << 1;
    }
}

/// A single struct field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldDef {
    pub name: Box<str>,
    pub ty: Idx,
    pub flags: FieldFlags,
}

impl FieldDef {
    /// Create a field. Visibility follows the naming rule: a field is
    /// exported iff its name starts with an uppercase letter.
    pub fn new(name: impl Into<Box<str>>, ty: Idx) -> Self {
        let name = name.into();
        let flags = if name.chars().next().is_some_and(char::is_uppercase) {
            FieldFlags::EXPORTED
        } else {
            FieldFlags::empty()
        };
        Self { name, ty, flags }
    }

    /// Mark this field as embedded.
    #[must_use]
    pub fn embedded(mut self) -> Self {
        self.flags |= FieldFlags::EMBEDDED;
        self
    }

    #[inline]
    pub fn is_exported(&self) -> bool {
        self.flags.contains(FieldFlags::EXPORTED)
    }
}

/// Definition of a nominal struct type.
///
/// A struct is declared first and defined later so that its fields may refer
/// back to the struct itself through pointers, slices, or maps.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StructDef {
    pub name: Box<str>,
    pub fields: Vec<FieldDef>,
    pub(crate) defined: bool,
}

impl StructDef {
    pub(crate) fn declared(name: Box<str>) -> Self {
        Self {
            name,
            fields: Vec::new(),
            defined: false,
        }
    }

    /// Whether `define_struct` has run for this struct.
    #[inline]
    pub fn is_defined(&self) -> bool {
        self.defined
    }

    /// Look up a field's position by name.
    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| &*f.name == name)
    }
}
