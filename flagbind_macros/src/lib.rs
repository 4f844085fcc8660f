//! Procedural macros for `flagbind`.
//!
//! [`FlagStruct`] implements `flagbind::FlagStruct` for a struct with named
//! fields. Each `pub` field carrying a `#[flagbind("...")]` annotation is
//! offered to the struct binder together with the annotation text; the
//! annotation itself is parsed at run time by `flagbind`.

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

mod derive;

/// Derive macro for `flagbind::FlagStruct`.
///
/// ```rust,ignore
/// #[derive(FlagStruct)]
/// struct MyFlags {
///     #[flagbind("ip, del=',', usage='The IP address'")]
///     pub ips: Vec<String>,
/// }
/// ```
///
/// A struct-level `#[flagbind(crate = "path")]` changes the path used to
/// reach `flagbind` in the generated code.
#[proc_macro_derive(FlagStruct, attributes(flagbind))]
pub fn derive_flag_struct(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    derive::expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}
