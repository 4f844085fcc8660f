//! Expansion of `#[derive(FlagStruct)]`.

mod crate_path;
mod generate;
mod parse;

use proc_macro2::TokenStream;
use syn::DeriveInput;

/// Expands the derive for `input`.
///
/// Fails for anything other than a struct with named fields, and for
/// malformed `#[flagbind]` attributes.
pub(crate) fn expand(input: &DeriveInput) -> syn::Result<TokenStream> {
    let struct_attrs = parse::parse_struct_attrs(&input.attrs)?;
    let fields = parse::collect_fields(input)?;
    let krate = crate_path::resolve(struct_attrs.crate_path.as_ref());
    Ok(generate::flag_struct_impl(input, &fields, &krate))
}
