//! Binding the annotated fields of a struct.
//!
//! `#[derive(FlagStruct)]` generates a [`FlagStruct`] impl that hands each
//! public field carrying `#[flagbind("...")]` to a [`StructBinder`]. The
//! binder parses the annotation and registers the field with its
//! [`FlagSet`]. Writing the impl by hand is equally valid:
//!
//! ```rust
//! use flagbind::{BindError, ErrorHandling, FlagSet, FlagStruct, StructBinder};
//!
//! #[derive(Default)]
//! struct Opts {
//!     hosts: Vec<String>,
//! }
//!
//! impl FlagStruct for Opts {
//!     fn record_name() -> &'static str {
//!         "Opts"
//!     }
//!
//!     fn bind_fields<'a>(&'a mut self, binder: &mut StructBinder<'a, '_>) -> Result<(), BindError> {
//!         binder.field("hosts", "host, del=',', usage='hosts to query'", &mut self.hosts)
//!     }
//! }
//!
//! let mut opts = Opts::default();
//! let mut flags = FlagSet::new("demo", ErrorHandling::ContinueOnError);
//! flags.bind_struct(&mut opts).expect("bind opts");
//! flags.parse(["-host", "a,b"]).expect("parse arguments");
//! drop(flags);
//! assert_eq!(opts.hosts, ["a", "b"]);
//! ```

use crate::destination::Bindable;
use crate::error::{BindError, BindResult, TagError};
use crate::flag_set::FlagSet;
use crate::tag::FlagTag;

/// A struct whose fields can be bound as flags.
pub trait FlagStruct {
    /// Struct name used in error messages.
    fn record_name() -> &'static str;

    /// Offers each bindable field to `binder`.
    ///
    /// # Errors
    ///
    /// Propagates the first failure reported by [`StructBinder::field`].
    fn bind_fields<'a>(&'a mut self, binder: &mut StructBinder<'a, '_>) -> BindResult;
}

/// Registers struct fields with a [`FlagSet`] from their annotations.
pub struct StructBinder<'a, 's> {
    flags: &'s mut FlagSet<'a>,
    record: &'static str,
}

impl<'a, 's> StructBinder<'a, 's> {
    pub(crate) const fn new(flags: &'s mut FlagSet<'a>, record: &'static str) -> Self {
        Self { flags, record }
    }

    /// Binds `dest` according to the annotation `tag`.
    ///
    /// Fields whose annotation is empty, malformed, or names an empty flag
    /// are skipped. With [`FlagSet::set_strict_tags`] enabled, a malformed
    /// annotation is an error instead, unless it does not start with a flag
    /// name at all; such fields are still skipped.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::Field`] naming `field` when registration fails
    /// or, in strict mode, when the annotation is malformed.
    pub fn field<T: Bindable>(
        &mut self,
        field: &'static str,
        tag: &str,
        dest: &'a mut T,
    ) -> BindResult {
        let Some(parsed) = self.resolve_tag(field, tag)? else {
            tracing::trace!(record = self.record, field, "field has no flag annotation");
            return Ok(());
        };
        if parsed.name().is_empty() {
            tracing::trace!(record = self.record, field, "flag annotation names no flag");
            return Ok(());
        }
        self.flags
            .bind_with_delimiter(dest, parsed.name(), parsed.usage(), parsed.delimiter())
            .map_err(|source| self.wrap(field, source))
    }

    fn resolve_tag(&self, field: &'static str, tag: &str) -> BindResult<Option<FlagTag>> {
        match FlagTag::parse_strict(tag) {
            Ok(parsed) => Ok(parsed),
            Err(TagError::NameNotFirst { .. }) => Ok(None),
            Err(source) if self.flags.strict_tags() => Err(self.wrap(
                field,
                BindError::MalformedTag {
                    tag: tag.to_owned(),
                    source,
                },
            )),
            Err(err) => {
                tracing::warn!(
                    record = self.record,
                    field,
                    tag,
                    error = %err,
                    "lenient parse of malformed flag annotation"
                );
                Ok(FlagTag::parse(tag))
            }
        }
    }

    fn wrap(&self, field: &'static str, source: BindError) -> BindError {
        BindError::Field {
            record: self.record,
            field,
            source: Box::new(source),
        }
    }
}
