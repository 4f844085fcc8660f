//! Attribute and field extraction for the `FlagStruct` derive.

use syn::ext::IdentExt;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, LitStr, Visibility};

#[derive(Default)]
pub(crate) struct StructAttrs {
    pub crate_path: Option<syn::Path>,
}

/// A public field carrying a flag annotation.
pub(crate) struct FlagField {
    pub ident: Ident,
    /// Field name without any `r#` prefix, as reported in errors.
    pub name: String,
    pub tag: LitStr,
}

fn flagbind_attrs(attrs: &[Attribute]) -> impl Iterator<Item = &Attribute> {
    attrs.iter().filter(|attr| attr.path().is_ident("flagbind"))
}

/// Extracts `#[flagbind(crate = "...")]` from the struct attributes.
pub(crate) fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<StructAttrs> {
    let mut out = StructAttrs::default();
    for attr in flagbind_attrs(attrs) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("crate") {
                let lit: LitStr = meta.value()?.parse()?;
                let path: syn::Path =
                    syn::parse_str(&lit.value()).map_err(|e| syn::Error::new(lit.span(), e))?;
                out.crate_path = Some(path);
                return Ok(());
            }
            Err(meta.error("unsupported flagbind option on struct; expected `crate = \"...\"`"))
        })?;
    }
    Ok(out)
}

/// Reads the annotation string from a field's `#[flagbind("...")]`.
///
/// Returns `None` when the field has no such attribute.
fn field_tag(attrs: &[Attribute]) -> syn::Result<Option<LitStr>> {
    let mut found: Option<LitStr> = None;
    for attr in flagbind_attrs(attrs) {
        let lit = attr.parse_args::<LitStr>().map_err(|err| {
            syn::Error::new(
                err.span(),
                "expected a flag annotation string, e.g. #[flagbind(\"name, usage='...'\")]",
            )
        })?;
        if found.is_some() {
            return Err(syn::Error::new_spanned(
                attr,
                "duplicate #[flagbind] annotation on field",
            ));
        }
        found = Some(lit);
    }
    Ok(found)
}

/// Collects the annotated `pub` fields of a struct with named fields.
///
/// Fields that are not `pub` are ignored even when annotated, as are fields
/// without an annotation.
pub(crate) fn collect_fields(input: &DeriveInput) -> syn::Result<Vec<FlagField>> {
    let named = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(named) => &named.named,
            Fields::Unnamed(_) | Fields::Unit => {
                return Err(syn::Error::new_spanned(
                    &input.ident,
                    "FlagStruct requires a struct with named fields",
                ));
            }
        },
        Data::Enum(_) | Data::Union(_) => {
            return Err(syn::Error::new_spanned(
                &input.ident,
                "FlagStruct can only be derived for structs",
            ));
        }
    };

    let mut out = Vec::new();
    for field in named {
        let tag = field_tag(&field.attrs)?;
        let (Some(tag), Visibility::Public(_), Some(ident)) = (tag, &field.vis, &field.ident)
        else {
            continue;
        };
        out.push(FlagField {
            name: ident.unraw().to_string(),
            ident: ident.clone(),
            tag,
        });
    }
    Ok(out)
}
