//! Procedural macros for the deep-copy engine.
//!
//! # `DeepCopy` Derive
//!
//! ```text
//! #[derive(DeepCopy)]
//! pub struct Document {
//!     pub title: String,
//!     pub sections: Vec<Rc<RefCell<Section>>>,
//!     #[deep_copy(share)]
//!     pub schema: Arc<Schema>,
//! }
//! ```
//!
//! This generates a `DeepCopy` implementation that copies every field with
//! the same `CopyContext`, so sharing between fields survives the copy.

mod derive;
mod utils;

use proc_macro::TokenStream;

/// Derive macro for `deep_copy::DeepCopy`.
///
/// Works on structs (named, tuple, unit) and enums. Structs have kind
/// `Struct`; enums have kind `Interface`, since a value carries its variant
/// the way an interface carries its dynamic type. Every type parameter gets
/// a `DeepCopy` bound.
///
/// # Attributes
///
/// ## Field-level
/// - `#[deep_copy(share)]` - Clone the field instead of copying it. For
///   immutable data that is safe to share, or types without a `DeepCopy`
///   implementation.
/// - `#[deep_copy(unsupported)]` - Copying a value that holds the field fails
///   with an unsupported-kind error naming the field's type. For fields with
///   no `DeepCopy` implementation at all, such as higher-ranked function
///   pointers like `fn(&str) -> bool`.
///
/// # Cycles
///
/// The derived type is refillable when every copied field is either
/// refillable (`RefCell`, `Cell`, or a derived type that is) or has an exact
/// placeholder (scalars, strings, shared fields). An `Rc`/`Arc` of such a
/// type records its copy before copying the contents, so back edges through
/// a `RefCell` field resolve to the copy under construction.
///
/// # Example
///
/// ```text
/// #[derive(DeepCopy)]
/// enum Shape {
///     Circle { radius: f64 },
///     Polygon(Vec<(f64, f64)>),
///     Empty,
/// }
///
/// let copy = deep_copy::copy(&shape)?;
/// ```
#[proc_macro_derive(DeepCopy, attributes(deep_copy))]
pub fn derive_deep_copy(input: TokenStream) -> TokenStream {
    derive::derive_deep_copy(input)
}
