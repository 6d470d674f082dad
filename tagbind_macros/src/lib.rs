//! Procedural macros for `tagbind`.
//!
//! `#[derive(Bindable)]` builds a registry of lowercase field names and typed
//! setters, so fixture tables can populate a struct without runtime
//! reflection. Field names are matched case-insensitively; the first
//! declared field whose name matches wins.
//!
//! Field attributes:
//!
//! - `#[bind(rename = "name")]` matches the field under a different name.
//! - `#[bind(skip)]` keeps the field out of the registry; naming it in a
//!   fixture is reported as a non-settable field.
//!
//! The struct attribute `#[bind(crate = "path")]` points generated code at
//! a re-exported or aliased `tagbind`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive macro for `tagbind::Bindable`.
#[proc_macro_derive(Bindable, attributes(bind))]
pub fn derive_bindable(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
