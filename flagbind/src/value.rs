//! Handlers the flag registry invokes for each occurrence of a flag.

use crate::convert::{FlagScalar, ValueKind};
use crate::error::ConversionError;

/// Receives the raw text of a flag occurrence.
///
/// Implement this to register a custom flag type with
/// [`crate::FlagSet::var`].
///
/// # Examples
///
/// ```rust
/// use flagbind::{ConversionError, ErrorHandling, FlagSet, Value};
///
/// #[derive(Default)]
/// struct Verbosity(u8);
///
/// impl Value for &mut Verbosity {
///     fn set(&mut self, raw: &str) -> Result<(), ConversionError> {
///         match raw {
///             "quiet" => self.0 = 0,
///             "loud" => self.0 = 2,
///             other => return Err(ConversionError::custom("level", other, "unknown level")),
///         }
///         Ok(())
///     }
///
///     fn render(&self) -> String {
///         self.0.to_string()
///     }
/// }
///
/// let mut level = Verbosity(1);
/// let mut flags = FlagSet::new("demo", ErrorHandling::ContinueOnError);
/// flags.var(&mut level, "level", "output `level`").expect("register level");
/// flags.parse(["-level", "loud"]).expect("parse arguments");
/// drop(flags);
/// assert_eq!(level.0, 2);
/// ```
pub trait Value {
    /// Applies one occurrence of the flag.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] when `raw` is not acceptable.
    fn set(&mut self, raw: &str) -> Result<(), ConversionError>;

    /// Renders the current value for usage listings.
    fn render(&self) -> String;

    /// Rendering of the type's zero value; defaults equal to it are not
    /// shown in usage listings.
    fn zero_text(&self) -> String {
        String::new()
    }

    /// Placeholder shown after the flag name in usage listings.
    fn type_name(&self) -> &'static str {
        "value"
    }

    /// Boolean flags may appear without a value.
    fn is_bool_flag(&self) -> bool {
        false
    }
}

/// Direct setter writing each converted occurrence straight into the
/// destination. Later occurrences overwrite earlier ones.
pub(crate) struct ScalarValue<'a, T> {
    target: &'a mut T,
}

impl<'a, T: FlagScalar> ScalarValue<'a, T> {
    pub(crate) const fn new(target: &'a mut T) -> Self {
        Self { target }
    }
}

impl<T: FlagScalar> Value for ScalarValue<'_, T> {
    fn set(&mut self, raw: &str) -> Result<(), ConversionError> {
        *self.target = T::parse_flag(raw)?;
        Ok(())
    }

    fn render(&self) -> String {
        self.target.render()
    }

    fn zero_text(&self) -> String {
        T::default().render()
    }

    fn type_name(&self) -> &'static str {
        match T::KIND {
            ValueKind::Bool => "",
            kind => kind.type_name(),
        }
    }

    fn is_bool_flag(&self) -> bool {
        T::KIND == ValueKind::Bool
    }
}

impl<V: Value + ?Sized> Value for Box<V> {
    fn set(&mut self, raw: &str) -> Result<(), ConversionError> {
        (**self).set(raw)
    }

    fn render(&self) -> String {
        (**self).render()
    }

    fn zero_text(&self) -> String {
        (**self).zero_text()
    }

    fn type_name(&self) -> &'static str {
        (**self).type_name()
    }

    fn is_bool_flag(&self) -> bool {
        (**self).is_bool_flag()
    }
}
