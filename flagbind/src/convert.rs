//! Text-to-value converters for the supported flag types.
//!
//! Every flag value, scalar or sequence element, goes through exactly one
//! [`FlagScalar`] implementation. The set of implementations is closed:
//! signed and unsigned 32/64-bit integers, `f64`, `String` and `bool`.

use std::fmt;

use crate::error::ConversionError;

/// The primitive kinds a flag can carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ValueKind {
    /// `i32`.
    Int32,
    /// `i64`.
    Int64,
    /// `u32`.
    Uint32,
    /// `u64`.
    Uint64,
    /// `f64`.
    Float64,
    /// `String`.
    Text,
    /// `bool`.
    Bool,
}

impl ValueKind {
    /// Short type name shown in usage listings and conversion errors.
    ///
    /// Integer widths are not distinguished: both signed kinds are `int`
    /// and both unsigned kinds are `uint`.
    #[must_use]
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Int32 | Self::Int64 => "int",
            Self::Uint32 | Self::Uint64 => "uint",
            Self::Float64 => "float",
            Self::Text => "string",
            Self::Bool => "bool",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A type that can be parsed from a single command-line token.
pub trait FlagScalar: Clone + Default + Sized {
    /// The kind this type reports in usage and errors.
    const KIND: ValueKind;

    /// Converts one token.
    ///
    /// # Errors
    ///
    /// Returns a [`ConversionError`] naming the offending text when `raw` is
    /// not a valid literal for this type.
    fn parse_flag(raw: &str) -> Result<Self, ConversionError>;

    /// Renders the value the way usage listings display defaults.
    fn render(&self) -> String;
}

/// An integer literal split into sign, radix and digits.
struct IntLiteral<'t> {
    negative: bool,
    radix: u32,
    digits: &'t str,
}

impl<'t> IntLiteral<'t> {
    /// Accepts an optional sign followed by an optional `0x`, `0o` or `0b`
    /// prefix. Anything else is read as decimal.
    fn split(raw: &'t str) -> Option<Self> {
        let (negative, unsigned) = match raw.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, raw.strip_prefix('+').unwrap_or(raw)),
        };
        let (radix, digits) = [("0x", 16), ("0X", 16), ("0o", 8), ("0O", 8), ("0b", 2), ("0B", 2)]
            .into_iter()
            .find_map(|(prefix, radix)| unsigned.strip_prefix(prefix).map(|rest| (radix, rest)))
            .unwrap_or((10, unsigned));
        if digits.is_empty() || !digits.chars().all(|ch| ch.is_ascii_alphanumeric()) {
            return None;
        }
        Some(Self {
            negative,
            radix,
            digits,
        })
    }

    fn signed_digits(&self) -> String {
        if self.negative {
            format!("-{}", self.digits)
        } else {
            self.digits.to_owned()
        }
    }
}

macro_rules! signed_scalar {
    ($ty:ty, $kind:expr) => {
        impl FlagScalar for $ty {
            const KIND: ValueKind = $kind;

            fn parse_flag(raw: &str) -> Result<Self, ConversionError> {
                let literal = IntLiteral::split(raw)
                    .ok_or_else(|| ConversionError::new(Self::KIND, raw, "invalid syntax"))?;
                <$ty>::from_str_radix(&literal.signed_digits(), literal.radix)
                    .map_err(|err| ConversionError::new(Self::KIND, raw, err.to_string()))
            }

            fn render(&self) -> String {
                self.to_string()
            }
        }
    };
}

macro_rules! unsigned_scalar {
    ($ty:ty, $kind:expr) => {
        impl FlagScalar for $ty {
            const KIND: ValueKind = $kind;

            fn parse_flag(raw: &str) -> Result<Self, ConversionError> {
                let literal = IntLiteral::split(raw)
                    .ok_or_else(|| ConversionError::new(Self::KIND, raw, "invalid syntax"))?;
                if literal.negative {
                    return Err(ConversionError::new(
                        Self::KIND,
                        raw,
                        "negative value for unsigned flag",
                    ));
                }
                <$ty>::from_str_radix(literal.digits, literal.radix)
                    .map_err(|err| ConversionError::new(Self::KIND, raw, err.to_string()))
            }

            fn render(&self) -> String {
                self.to_string()
            }
        }
    };
}

signed_scalar!(i32, ValueKind::Int32);
signed_scalar!(i64, ValueKind::Int64);
unsigned_scalar!(u32, ValueKind::Uint32);
unsigned_scalar!(u64, ValueKind::Uint64);

impl FlagScalar for f64 {
    const KIND: ValueKind = ValueKind::Float64;

    fn parse_flag(raw: &str) -> Result<Self, ConversionError> {
        raw.parse::<Self>()
            .map_err(|err| ConversionError::new(Self::KIND, raw, err.to_string()))
    }

    fn render(&self) -> String {
        self.to_string()
    }
}

impl FlagScalar for String {
    const KIND: ValueKind = ValueKind::Text;

    fn parse_flag(raw: &str) -> Result<Self, ConversionError> {
        Ok(raw.to_owned())
    }

    fn render(&self) -> String {
        self.clone()
    }
}

impl FlagScalar for bool {
    const KIND: ValueKind = ValueKind::Bool;

    fn parse_flag(raw: &str) -> Result<Self, ConversionError> {
        match raw {
            "1" | "t" | "T" | "TRUE" | "true" | "True" => Ok(true),
            "0" | "f" | "F" | "FALSE" | "false" | "False" => Ok(false),
            _ => Err(ConversionError::new(Self::KIND, raw, "invalid syntax")),
        }
    }

    fn render(&self) -> String {
        self.to_string()
    }
}
