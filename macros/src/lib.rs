//! Derive macros for Optimist action enums
//!
//! A controller action is either something the user asked for (an intent)
//! or the result of a remote call coming back (an outcome). Tagging each
//! variant lets the runtime and the logs tell them apart without a
//! hand-written match per enum.
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Generates `is_intent()`, `is_outcome()` and `name()`
//!
//! # Example
//!
//! ```ignore
//! use optimist_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum TodoAction {
//!     #[intent]
//!     Create { title: String },
//!
//!     #[outcome]
//!     Created { temp_id: TodoId, todo: Todo },
//! }
//!
//! assert!(TodoAction::Create { title: "milk".into() }.is_intent());
//! assert_eq!(TodoAction::Create { title: "milk".into() }.name(), "Create");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Variant};

/// Derive macro for action enums
///
/// Generates helper methods:
/// - `is_intent()` - Returns true if this variant is a user intent
/// - `is_outcome()` - Returns true if this variant reports a remote outcome
/// - `name()` - Returns the variant name, for logging
///
/// # Attributes
///
/// - `#[intent]` - Mark a variant as a user intent
/// - `#[outcome]` - Mark a variant as a remote outcome
///
/// Untagged variants are neither (internal bookkeeping such as timers).
///
/// # Errors
///
/// Produces a compile error if:
/// - Applied to a non-enum type
/// - A variant has both `#[intent]` and `#[outcome]` attributes
#[proc_macro_derive(Action, attributes(intent, outcome))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return syn::Error::new_spanned(input, "#[derive(Action)] can only be used on enums")
            .to_compile_error()
            .into();
    };

    let mut intent_arms = Vec::new();
    let mut outcome_arms = Vec::new();
    let mut name_arms = Vec::new();

    for variant in &data_enum.variants {
        let is_intent = has_attribute(&variant.attrs, "intent");
        let is_outcome = has_attribute(&variant.attrs, "outcome");

        if is_intent && is_outcome {
            return syn::Error::new_spanned(
                variant,
                "Variant cannot be both #[intent] and #[outcome]",
            )
            .to_compile_error()
            .into();
        }

        let pattern = variant_pattern(variant);
        let label = variant.ident.to_string();

        if is_intent {
            intent_arms.push(quote! { #pattern => true, });
        }
        if is_outcome {
            outcome_arms.push(quote! { #pattern => true, });
        }
        name_arms.push(quote! { #pattern => #label, });
    }

    let expanded = quote! {
        impl #name {
            /// Returns true if this action is a user intent
            #[must_use]
            pub const fn is_intent(&self) -> bool {
                match self {
                    #(#intent_arms)*
                    _ => false,
                }
            }

            /// Returns true if this action reports the outcome of a remote call
            #[must_use]
            pub const fn is_outcome(&self) -> bool {
                match self {
                    #(#outcome_arms)*
                    _ => false,
                }
            }

            /// Returns the variant name
            #[must_use]
            pub const fn name(&self) -> &'static str {
                match self {
                    #(#name_arms)*
                }
            }
        }
    };

    TokenStream::from(expanded)
}

/// Match pattern for a variant that ignores its fields
fn variant_pattern(variant: &Variant) -> proc_macro2::TokenStream {
    let ident = &variant.ident;
    match &variant.fields {
        Fields::Named(_) => quote! { Self::#ident { .. } },
        Fields::Unnamed(_) => quote! { Self::#ident(..) },
        Fields::Unit => quote! { Self::#ident },
    }
}

/// Helper function to check if an attribute list contains a specific attribute
fn has_attribute(attrs: &[Attribute], name: &str) -> bool {
    attrs.iter().any(|attr| attr.path().is_ident(name))
}
