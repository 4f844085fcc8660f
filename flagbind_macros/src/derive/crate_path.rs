//! Crate path resolution for dependency aliasing support.
//!
//! Converts the optional `#[flagbind(crate = "...")]` attribute value into a
//! `TokenStream` used in place of `::flagbind` in generated code.

use proc_macro2::TokenStream;
use quote::quote;

/// Resolve the crate path from the parsed struct attribute.
///
/// Defaults to `::flagbind` when no override is present.
///
/// # Examples
///
/// ```rust,ignore
/// let default = resolve(None);
/// assert_eq!(default.to_string(), ":: flagbind");
///
/// let path: syn::Path = syn::parse_str("my_alias").unwrap();
/// let aliased = resolve(Some(&path));
/// assert_eq!(aliased.to_string(), "my_alias");
/// ```
pub(crate) fn resolve(crate_path: Option<&syn::Path>) -> TokenStream {
    crate_path.map_or_else(|| quote! { ::flagbind }, |path| quote! { #path })
}
