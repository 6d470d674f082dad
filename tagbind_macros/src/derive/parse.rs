//! Attribute and input parsing for `#[derive(Bindable)]`.

use syn::meta::ParseNestedMeta;
use syn::parenthesized;
use syn::{Attribute, Data, DeriveInput, Fields, Lit, Token};

#[derive(Default, Clone)]
pub(crate) struct StructAttrs {
    /// Overrides the generated crate path for dependency aliasing.
    pub crate_path: Option<syn::Path>,
}

/// Field-level attributes recognised by `#[derive(Bindable)]`.
#[derive(Default, Clone)]
pub(crate) struct FieldAttrs {
    pub rename: Option<String>,
    pub skip: bool,
}

/// A named field together with the name fixtures use for it.
pub(crate) struct BindField {
    pub ident: syn::Ident,
    pub ty: syn::Type,
    /// Lowercased lookup key.
    pub key: String,
    pub skip: bool,
}

pub(crate) struct ParsedInput {
    pub struct_attrs: StructAttrs,
    pub fields: Vec<BindField>,
}

/// Iterate all `#[bind(...)]` attributes once and apply a callback.
fn parse_bind<F>(attrs: &[Attribute], mut f: F) -> syn::Result<()>
where
    F: FnMut(&ParseNestedMeta) -> syn::Result<()>,
{
    for attr in attrs.iter().filter(|a| a.path().is_ident("bind")) {
        attr.parse_nested_meta(|meta| f(&meta))?;
    }
    Ok(())
}

/// Consumes an unrecognised key-value or list without recording it.
fn discard_unknown(meta: &ParseNestedMeta) -> syn::Result<()> {
    if meta.input.peek(Token![=]) {
        meta.value()?.parse::<proc_macro2::TokenStream>()?;
    } else if meta.input.peek(syn::token::Paren) {
        let content;
        parenthesized!(content in meta.input);
        content.parse::<proc_macro2::TokenStream>()?;
    }
    Ok(())
}

fn lit_str(meta: &ParseNestedMeta, key: &str) -> syn::Result<syn::LitStr> {
    let literal = meta.value()?.parse::<Lit>()?;
    match literal {
        Lit::Str(s) => Ok(s),
        other => Err(syn::Error::new(other.span(), format!("{key} must be a string"))),
    }
}

/// Extracts `#[bind(...)]` metadata applied to a struct.
///
/// Only `crate` is recognised; unknown keys are ignored.
pub(crate) fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut out = StructAttrs::default();
    parse_bind(attrs, |meta| {
        if meta.path.is_ident("crate") {
            let s = lit_str(meta, "crate")?;
            out.crate_path = Some(s.parse()?);
            Ok(())
        } else {
            discard_unknown(meta)
        }
    })?;
    Ok(out)
}

/// Extracts `#[bind(...)]` metadata applied to a field.
pub(crate) fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut out = FieldAttrs::default();
    parse_bind(attrs, |meta| {
        if meta.path.is_ident("rename") {
            let s = lit_str(meta, "rename")?;
            if s.value().is_empty() {
                return Err(syn::Error::new(s.span(), "rename must not be empty"));
            }
            out.rename = Some(s.value());
            Ok(())
        } else if meta.path.is_ident("skip") {
            out.skip = true;
            Ok(())
        } else {
            discard_unknown(meta)
        }
    })?;
    Ok(out)
}

/// Gathers the struct attributes and the bindable view of its fields.
///
/// Only structs with named fields are accepted, so expansion fails fast with
/// a spanned error for tuple structs, unit structs, enums and unions.
pub(crate) fn parse_input(input: &DeriveInput) -> syn::Result<ParsedInput> {
    let struct_attrs = parse_struct_attrs(&input.attrs)?;
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    data.struct_token,
                    "Bindable requires named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "Bindable can only be derived for structs",
            ));
        }
    };

    let mut fields = Vec::with_capacity(named.len());
    for field in named {
        let Some(ident) = field.ident.clone() else {
            continue;
        };
        let attrs = parse_field_attrs(&field.attrs)?;
        let name = attrs.rename.unwrap_or_else(|| unraw(&ident));
        fields.push(BindField {
            ident,
            ty: field.ty.clone(),
            key: name.to_lowercase(),
            skip: attrs.skip,
        });
    }
    Ok(ParsedInput {
        struct_attrs,
        fields,
    })
}

/// Field name without a raw-identifier prefix.
fn unraw(ident: &syn::Ident) -> String {
    let name = ident.to_string();
    name.strip_prefix("r#").map_or_else(|| name.clone(), str::to_owned)
}
