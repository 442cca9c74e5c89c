//! Attribute parsing and bound generation for the derive.

use syn::{parse_quote, Field, GenericParam, Generics, Type};

/// How the derive treats a field.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum FieldMode {
    /// Copied through its own `DeepCopy` implementation.
    Copy,
    /// `#[deep_copy(share)]`: cloned, so the copy shares it.
    Share,
    /// `#[deep_copy(unsupported)]`: copying a value that holds it fails.
    Unsupported,
}

/// Read the `#[deep_copy(..)]` attributes on a field.
pub fn field_mode(field: &Field) -> syn::Result<FieldMode> {
    let mut mode = FieldMode::Copy;
    for attr in &field.attrs {
        if !attr.path().is_ident("deep_copy") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            let next = if meta.path.is_ident("share") {
                FieldMode::Share
            } else if meta.path.is_ident("unsupported") {
                FieldMode::Unsupported
            } else {
                return Err(meta.error(
                    "unknown deep_copy attribute, expected `share` or `unsupported`",
                ));
            };
            if mode != FieldMode::Copy && mode != next {
                return Err(meta.error("`share` and `unsupported` are mutually exclusive"));
            }
            mode = next;
            Ok(())
        })?;
    }
    Ok(mode)
}

/// Add `DeepCopy` bounds to every type parameter and `Clone` bounds to the
/// types of shared fields.
pub fn add_bounds(mut generics: Generics, shared_types: &[&Type]) -> Generics {
    for param in &mut generics.params {
        if let GenericParam::Type(ty) = param {
            ty.bounds.push(parse_quote!(::deep_copy::DeepCopy));
        }
    }
    if !shared_types.is_empty() {
        let where_clause = generics.make_where_clause();
        for ty in shared_types {
            where_clause
                .predicates
                .push(parse_quote!(#ty: ::core::clone::Clone));
        }
    }
    generics
}
