//! Error types produced while registering and parsing flags.
//!
//! Registration mistakes surface as [`BindError`], malformed user input as
//! [`ParseError`]. Both wrap [`ConversionError`] or [`TagError`] where the
//! failure originated in a converter or in a field annotation.

use thiserror::Error;

use crate::convert::ValueKind;

/// Result alias for registration operations.
pub type BindResult<T = ()> = Result<T, BindError>;

/// Result alias for parse operations.
pub type ParseResult<T = ()> = Result<T, ParseError>;

/// A textual value that could not be converted to its target type.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("cannot parse {text:?} as {target}: {reason}")]
pub struct ConversionError {
    /// Name of the type the text was converted to, such as `uint`.
    pub target: &'static str,
    /// The offending text.
    pub text: String,
    /// Why the conversion failed.
    pub reason: String,
}

impl ConversionError {
    /// Creates an error for one of the built-in value kinds.
    #[must_use]
    pub fn new(kind: ValueKind, text: &str, reason: impl Into<String>) -> Self {
        Self::custom(kind.type_name(), text, reason)
    }

    /// Creates an error for a caller-defined value type.
    #[must_use]
    pub fn custom(target: &'static str, text: &str, reason: impl Into<String>) -> Self {
        Self {
            target,
            text: text.to_owned(),
            reason: reason.into(),
        }
    }
}

/// Configuration mistakes detected while registering flags.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum BindError {
    /// The destination type is outside the supported set.
    #[error("unsupported type {type_name} for flag {name:?}")]
    UnsupportedType {
        /// Flag the destination was offered for.
        name: String,
        /// Rust type name of the rejected destination.
        type_name: &'static str,
    },

    /// A flag with this name is already registered in the set.
    #[error("{set}: flag redefined: {name}")]
    DuplicateName {
        /// Name of the flag set.
        set: String,
        /// The repeated flag name.
        name: String,
    },

    /// The flag name cannot be recognised on a command line.
    #[error("flag {name:?} {reason}")]
    InvalidName {
        /// The rejected flag name.
        name: String,
        /// What is wrong with it.
        reason: &'static str,
    },

    /// A field annotation could not be parsed and strict tags are enabled.
    #[error("malformed flag tag {tag:?}: {source}")]
    MalformedTag {
        /// The raw annotation text.
        tag: String,
        /// Where parsing went wrong.
        #[source]
        source: TagError,
    },

    /// Binding a struct field failed.
    #[error("couldn't set up field {field:?} for {record}: {source}")]
    Field {
        /// Name of the struct being bound.
        record: &'static str,
        /// Name of the failing field.
        field: &'static str,
        /// Underlying registration failure.
        #[source]
        source: Box<BindError>,
    },
}

impl BindError {
    /// Returns the innermost error, looking through [`BindError::Field`].
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::Field { source, .. } => source.root_cause(),
            other => other,
        }
    }
}

/// Failures reported while parsing an argument list.
#[derive(Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum ParseError {
    /// `-h` or `-help` was given and no such flag is defined.
    #[error("flag: help requested")]
    Help,

    /// The argument starts with `-` but is not a well-formed flag.
    #[error("bad flag syntax: {arg}")]
    BadSyntax {
        /// The malformed argument.
        arg: String,
    },

    /// No flag with this name is registered.
    #[error("flag provided but not defined: -{name}")]
    Undefined {
        /// The unknown flag name.
        name: String,
    },

    /// A non-boolean flag appeared last with no value after it.
    #[error("flag needs an argument: -{name}")]
    MissingArgument {
        /// Flag that lacked a value.
        name: String,
    },

    /// An explicit value for a boolean flag did not parse.
    #[error("invalid boolean value {value:?} for -{name}: {source}")]
    InvalidBoolean {
        /// The boolean flag.
        name: String,
        /// Text supplied after `=`.
        value: String,
        /// Converter failure.
        #[source]
        source: ConversionError,
    },

    /// A flag value did not convert to the destination type.
    #[error("invalid value {value:?} for flag -{name}: {source}")]
    InvalidValue {
        /// The flag being set.
        name: String,
        /// Raw text supplied for it.
        value: String,
        /// Converter failure.
        #[source]
        source: ConversionError,
    },
}

impl ParseError {
    /// Process exit status used under [`crate::ErrorHandling::ExitOnError`].
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::Help => 0,
            _ => 2,
        }
    }
}

/// Syntax problems in a field annotation such as `ip, del=',', usage='…'`.
///
/// Positions are byte offsets into the annotation.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[non_exhaustive]
pub enum TagError {
    /// The annotation starts with a symbol instead of a flag name.
    #[error("expected a flag name at byte {position}, found `{found}`")]
    NameNotFirst {
        /// Offset of the offending symbol.
        position: usize,
        /// The symbol found.
        found: char,
    },

    /// An `=` appeared without a key before it.
    #[error("`=` at byte {position} has no key before it")]
    MissingKey {
        /// Offset of the `=`.
        position: usize,
    },

    /// A key was followed by `=` but no value.
    #[error("key {key:?} has no value after `=`")]
    MissingValue {
        /// The key left without a value.
        key: String,
    },

    /// A key was given without `=value`.
    #[error("key {key:?} is not followed by `=`")]
    KeyWithoutValue {
        /// The dangling key.
        key: String,
    },

    /// A word appeared where neither a key nor a value was expected.
    #[error("unexpected {word:?} at byte {position}; separate options with `,`")]
    UnexpectedWord {
        /// Offset of the word.
        position: usize,
        /// The word itself.
        word: String,
    },

    /// A quoted literal was never closed.
    #[error("unterminated quoted string starting at byte {position}")]
    UnterminatedString {
        /// Offset of the opening quote.
        position: usize,
    },
}

#[cfg(test)]
mod tests;
