//! `DeepCopy` derive implementation.
//!
//! Generates a `match` over the value: each arm destructures a struct or
//! variant and rebuilds it from copies of its fields. A second `match` over
//! the source and a placeholder refills the placeholder's fields in place,
//! which is how a cycle through an `Rc` of a derived type is closed. The
//! generated code refers to `::deep_copy::*`.

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::{format_ident, quote};
use syn::{parse_macro_input, Data, DeriveInput, Fields, Type};

use crate::utils::{add_bounds, field_mode, FieldMode};

/// Main entry point for the `DeepCopy` derive macro.
pub fn derive_deep_copy(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match derive_deep_copy_impl(&input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// One match arm's worth of generated code.
struct Arm {
    pattern: TokenStream2,
    target_pattern: TokenStream2,
    copy: TokenStream2,
    placeholder: TokenStream2,
    refills: Vec<TokenStream2>,
}

/// Per-field terms of the `REFILLABLE` and `EXACT_PLACEHOLDER` constants.
#[derive(Default)]
struct Consts {
    refillable: Vec<TokenStream2>,
    exact: Vec<TokenStream2>,
}

fn derive_deep_copy_impl(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;
    let mut shared_types: Vec<&Type> = Vec::new();
    let mut consts = Consts::default();

    let (kind, arms) = match &input.data {
        Data::Struct(data) => {
            let arm = generate_arm(quote!(Self), &data.fields, &mut shared_types, &mut consts)?;
            (quote!(Struct), vec![arm])
        }
        Data::Enum(data) => {
            let arms = data
                .variants
                .iter()
                .map(|variant| {
                    let ident = &variant.ident;
                    generate_arm(
                        quote!(Self::#ident),
                        &variant.fields,
                        &mut shared_types,
                        &mut consts,
                    )
                })
                .collect::<syn::Result<Vec<_>>>()?;
            (quote!(Interface), arms)
        }
        Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                input,
                "DeepCopy cannot be derived for unions",
            ));
        }
    };

    let generics = add_bounds(input.generics.clone(), &shared_types);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    let unbuildable = quote! {
        ::core::result::Result::Err(::deep_copy::CopyError::UnbuildableCycle {
            type_name: ::std::borrow::ToOwned::to_owned(::core::any::type_name::<Self>()),
        })
    };

    // `&Empty` is inhabited even when `Empty` is not, so match on the place.
    let (copy_body, placeholder_body, refill_body) = if arms.is_empty() {
        (
            quote!(match *self {}),
            quote!(match *self {}),
            quote!(match *self {}),
        )
    } else {
        let patterns: Vec<_> = arms.iter().map(|arm| &arm.pattern).collect();
        let target_patterns = arms.iter().map(|arm| &arm.target_pattern);
        let copies = arms.iter().map(|arm| &arm.copy);
        let placeholders = arms.iter().map(|arm| &arm.placeholder);
        let refills = arms.iter().map(|arm| &arm.refills);
        (
            quote! {
                match self {
                    #(#patterns => #copies,)*
                }
            },
            quote! {
                match self {
                    #(#patterns => #placeholders,)*
                }
            },
            quote! {
                if !<Self as ::deep_copy::DeepCopy>::REFILLABLE {
                    return #unbuildable;
                }
                match (self, target) {
                    #((#patterns, #target_patterns) => {
                        #(#refills)*
                        ::core::result::Result::Ok(())
                    })*
                    #[allow(unreachable_patterns)]
                    _ => #unbuildable,
                }
            },
        )
    };

    let refillable = &consts.refillable;
    let exact = &consts.exact;

    Ok(quote! {
        impl #impl_generics ::deep_copy::DeepCopy for #name #ty_generics #where_clause {
            const KIND: ::deep_copy::Kind = ::deep_copy::Kind::#kind;
            const REFILLABLE: bool = true #(&& #refillable)*;
            const EXACT_PLACEHOLDER: bool = true #(&& #exact)*;

            #[allow(unused_variables)]
            fn deep_copy(
                &self,
                cx: &mut ::deep_copy::CopyContext,
            ) -> ::core::result::Result<Self, ::deep_copy::CopyError> {
                #copy_body
            }

            #[allow(unused_variables)]
            fn placeholder(&self) -> ::core::option::Option<Self> {
                #placeholder_body
            }

            #[allow(unused_variables)]
            fn refill(
                &self,
                target: &Self,
                cx: &mut ::deep_copy::CopyContext,
            ) -> ::core::result::Result<(), ::deep_copy::CopyError> {
                #refill_body
            }
        }
    })
}

/// Destructure `path` with `fields` into numbered bindings and rebuild it
/// from copies (and, separately, placeholders) of each binding.
fn generate_arm<'a>(
    path: TokenStream2,
    fields: &'a Fields,
    shared_types: &mut Vec<&'a Type>,
    consts: &mut Consts,
) -> syn::Result<Arm> {
    let mut bindings = Vec::with_capacity(fields.len());
    let mut targets = Vec::with_capacity(fields.len());
    let mut copies = Vec::with_capacity(fields.len());
    let mut placeholders = Vec::with_capacity(fields.len());
    let mut refills = Vec::new();
    let mut unsupported: Option<&Type> = None;

    for (i, field) in fields.iter().enumerate() {
        let binding = format_ident!("__field{}", i);
        let target = format_ident!("__target{}", i);
        let ty = &field.ty;
        match field_mode(field)? {
            FieldMode::Share => {
                shared_types.push(ty);
                copies.push(quote!(::core::clone::Clone::clone(#binding)));
                placeholders.push(quote!(::core::clone::Clone::clone(#binding)));
            }
            FieldMode::Unsupported => {
                unsupported.get_or_insert(ty);
                consts.refillable.push(quote!(false));
                consts.exact.push(quote!(false));
            }
            FieldMode::Copy => {
                copies.push(quote!(::deep_copy::DeepCopy::deep_copy(#binding, cx)?));
                placeholders.push(quote!(::deep_copy::DeepCopy::placeholder(#binding)?));
                refills.push(quote! {
                    if <#ty as ::deep_copy::DeepCopy>::REFILLABLE {
                        ::deep_copy::DeepCopy::refill(#binding, #target, cx)?;
                    }
                });
                consts.refillable.push(quote! {
                    (<#ty as ::deep_copy::DeepCopy>::REFILLABLE
                        || <#ty as ::deep_copy::DeepCopy>::EXACT_PLACEHOLDER)
                });
                consts
                    .exact
                    .push(quote!(<#ty as ::deep_copy::DeepCopy>::EXACT_PLACEHOLDER));
            }
        }
        bindings.push(binding);
        targets.push(target);
    }

    let (pattern, target_pattern) = match fields {
        Fields::Named(named) => {
            let names: Vec<_> = named.named.iter().filter_map(|f| f.ident.as_ref()).collect();
            (
                quote!(#path { #(#names: #bindings),* }),
                quote!(#path { #(#names: #targets),* }),
            )
        }
        Fields::Unnamed(_) => (quote!(#path(#(#bindings),*)), quote!(#path(#(#targets),*))),
        Fields::Unit => (path.clone(), path.clone()),
    };

    // A value holding an unsupported field is never rebuilt.
    if let Some(ty) = unsupported {
        return Ok(Arm {
            pattern,
            target_pattern,
            copy: quote! {
                ::core::result::Result::Err(::core::convert::From::from(
                    ::deep_copy::UnsupportedKindError::new(
                        ::deep_copy::Kind::Unsupported,
                        ::core::any::type_name::<#ty>(),
                    ),
                ))
            },
            placeholder: quote!(::core::option::Option::None),
            refills: Vec::new(),
        });
    }

    let (built, seeded) = match fields {
        Fields::Named(named) => {
            let names: Vec<_> = named.named.iter().filter_map(|f| f.ident.as_ref()).collect();
            (
                quote!(#path { #(#names: #copies),* }),
                quote!(#path { #(#names: #placeholders),* }),
            )
        }
        Fields::Unnamed(_) => (quote!(#path(#(#copies),*)), quote!(#path(#(#placeholders),*))),
        Fields::Unit => (path.clone(), path),
    };

    let arm = Arm {
        pattern,
        target_pattern,
        copy: quote!(::core::result::Result::Ok(#built)),
        placeholder: quote!(::core::option::Option::Some(#seeded)),
        refills,
    };
    Ok(arm)
}
