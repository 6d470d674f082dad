//! Token generation for the `Bindable` implementation.

use proc_macro2::TokenStream;
use quote::quote;
use syn::{DeriveInput, Generics, parse_quote};

use super::parse::{BindField, ParsedInput};

/// One lookup arm: either assigns the field or reports it as not settable.
fn field_arm(field: &BindField, krate: &TokenStream) -> TokenStream {
    let BindField {
        ident, key, skip, ..
    } = field;
    let body = if *skip {
        quote! {
            ::core::result::Result::Err(#krate::BindError::FieldNotSettable {
                field: ::std::borrow::ToOwned::to_owned(name),
                target: ::std::borrow::ToOwned::to_owned(target),
            })
        }
    } else {
        quote! {
            #krate::__private::bind_field(&mut self.#ident, name, target, value)
        }
    };
    quote! {
        if lowered == #key {
            return #body;
        }
    }
}

/// Require `FromFixture` for every settable field of a generic struct, so
/// `bind_field` type-checks for fields typed by a parameter.
fn bounded_generics(input: &DeriveInput, parsed: &ParsedInput, krate: &TokenStream) -> Generics {
    let mut generics = input.generics.clone();
    if generics.type_params().next().is_none() {
        return generics;
    }
    let where_clause = generics.make_where_clause();
    for field in parsed.fields.iter().filter(|field| !field.skip) {
        let ty = &field.ty;
        where_clause
            .predicates
            .push(parse_quote! { #ty: #krate::FromFixture });
    }
    generics
}

/// Generate `impl Bindable for ...`.
pub(crate) fn bindable_impl(
    input: &DeriveInput,
    parsed: &ParsedInput,
    krate: &TokenStream,
) -> TokenStream {
    let ident = &input.ident;
    let target_name = ident.to_string();
    let generics = bounded_generics(input, parsed, krate);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();
    let names = parsed
        .fields
        .iter()
        .filter(|field| !field.skip)
        .map(|field| field.key.as_str());
    let arms = parsed.fields.iter().map(|field| field_arm(field, krate));
    let silence_value = parsed
        .fields
        .iter()
        .all(|field| field.skip)
        .then(|| quote! { let _ = value; });
    let silence_lowered = parsed
        .fields
        .is_empty()
        .then(|| quote! { let _ = &lowered; });

    quote! {
        impl #impl_generics #krate::Bindable for #ident #ty_generics #where_clause {
            fn field_names() -> &'static [&'static str] {
                &[#(#names),*]
            }

            fn bind(
                &mut self,
                name: &str,
                value: &#krate::Value,
            ) -> #krate::BindResult<()> {
                let lowered = name.to_lowercase();
                let target = <Self as #krate::Bindable>::target_name();
                #silence_value
                #silence_lowered
                #(#arms)*
                ::core::result::Result::Err(#krate::BindError::FieldLookup {
                    field: ::std::borrow::ToOwned::to_owned(name),
                    target: ::std::borrow::ToOwned::to_owned(target),
                })
            }

            fn target_name() -> &'static str {
                #target_name
            }
        }
    }
}
