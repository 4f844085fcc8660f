//! Token generation for the `FlagStruct` impl.

use proc_macro2::TokenStream;
use quote::quote;
use syn::DeriveInput;

use super::parse::FlagField;

/// Builds `impl FlagStruct for ...` binding each field in declaration
/// order.
pub(crate) fn flag_struct_impl(
    input: &DeriveInput,
    fields: &[FlagField],
    krate: &TokenStream,
) -> TokenStream {
    let ident = &input.ident;
    let record_name = ident.to_string();
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let bindings = fields.iter().map(|field| {
        let FlagField { ident, name, tag } = field;
        quote! {
            binder.field(#name, #tag, &mut self.#ident)?;
        }
    });
    let unused = fields.is_empty().then(|| quote! { let _ = binder; });

    quote! {
        #[automatically_derived]
        impl #impl_generics #krate::FlagStruct for #ident #ty_generics #where_clause {
            fn record_name() -> &'static str {
                #record_name
            }

            fn bind_fields<'__flagbind>(
                &'__flagbind mut self,
                binder: &mut #krate::StructBinder<'__flagbind, '_>,
            ) -> ::core::result::Result<(), #krate::BindError> {
                #unused
                #( #bindings )*
                ::core::result::Result::Ok(())
            }
        }
    }
}
