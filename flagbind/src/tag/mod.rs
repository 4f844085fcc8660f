//! Parser for the flag annotation mini-language.
//!
//! An annotation names the flag and optionally sets a delimiter and usage
//! text:
//!
//! ```text
//! ip, del=',', usage='The IP address'
//! quote, usage='Field to show embedded (\') chars'
//! ```
//!
//! The first token is always the flag name. After it, `key=value` pairs are
//! separated by commas; key order does not matter. Values may be bare words
//! or quoted literals, in which `\'` (or `\"`) stands for the quote
//! character and `\\` for a backslash. Keys other than `del` and `usage`
//! are kept in [`FlagTag::extras`].

mod lexer;

use std::collections::BTreeMap;

use crate::error::TagError;
use lexer::{Lexer, Token};

/// Flag name, delimiter and usage text extracted from an annotation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FlagTag {
    name: String,
    delimiter: String,
    usage: String,
    extras: BTreeMap<String, String>,
}

/// Parses an annotation, returning `None` when it is empty or malformed.
///
/// # Examples
///
/// ```rust
/// use flagbind::parse_tag;
///
/// let tag = parse_tag("ip,del=',', usage='The IP address'").expect("well-formed tag");
/// assert_eq!(tag.name(), "ip");
/// assert_eq!(tag.delimiter(), ",");
/// assert_eq!(tag.usage(), "The IP address");
///
/// assert!(parse_tag("").is_none());
/// assert!(parse_tag("=oops").is_none());
/// ```
#[must_use]
pub fn parse_tag(raw: &str) -> Option<FlagTag> {
    FlagTag::parse(raw)
}

impl FlagTag {
    /// Lenient parse: malformed annotations yield `None`, as do empty ones.
    ///
    /// A key left without a value, or a stray word, is ignored rather than
    /// rejected.
    #[must_use]
    pub fn parse(raw: &str) -> Option<Self> {
        Self::scan(raw, Mode::Lenient).ok().flatten()
    }

    /// Strict parse: reports every syntax problem.
    ///
    /// Returns `Ok(None)` for an empty or all-whitespace annotation.
    ///
    /// # Errors
    ///
    /// Returns a [`TagError`] when the annotation does not start with a name,
    /// has an `=` without a key, a key without a value, a stray word, or an
    /// unterminated quoted literal.
    pub fn parse_strict(raw: &str) -> Result<Option<Self>, TagError> {
        Self::scan(raw, Mode::Strict)
    }

    fn scan(raw: &str, mode: Mode) -> Result<Option<Self>, TagError> {
        let mut lexer = Lexer::new(raw);
        let Some(first) = lexer.next() else {
            return Ok(None);
        };
        let (position, token) = first?;
        let name = match token {
            Token::Bare(text) | Token::Quoted(text) => text,
            Token::Comma => return Err(TagError::NameNotFirst { position, found: ',' }),
            Token::Equals => return Err(TagError::NameNotFirst { position, found: '=' }),
        };

        let mut parser = TagParser::new(mode);
        for item in lexer {
            let (offset, tok) = item?;
            parser.step(offset, tok)?;
        }
        Ok(Some(Self::from_fields(name, parser.finish()?)))
    }

    fn from_fields(name: String, mut fields: BTreeMap<String, String>) -> Self {
        Self {
            name,
            delimiter: fields.remove("del").unwrap_or_default(),
            usage: fields.remove("usage").unwrap_or_default(),
            extras: fields,
        }
    }

    /// The flag name. May be empty when the annotation named `''`.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The `del` value; empty means occurrences are not split.
    #[must_use]
    pub fn delimiter(&self) -> &str {
        &self.delimiter
    }

    /// The `usage` value.
    #[must_use]
    pub fn usage(&self) -> &str {
        &self.usage
    }

    /// Value of an unrecognised key.
    #[must_use]
    pub fn extra(&self, key: &str) -> Option<&str> {
        self.extras.get(key).map(String::as_str)
    }

    /// All unrecognised keys and their values.
    #[must_use]
    pub const fn extras(&self) -> &BTreeMap<String, String> {
        &self.extras
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mode {
    Lenient,
    Strict,
}

/// Key/value state machine run over the tokens after the flag name.
struct TagParser {
    mode: Mode,
    expecting_key: bool,
    expecting_value: bool,
    pending_key: Option<String>,
    fields: BTreeMap<String, String>,
}

impl TagParser {
    const fn new(mode: Mode) -> Self {
        Self {
            mode,
            expecting_key: true,
            expecting_value: false,
            pending_key: None,
            fields: BTreeMap::new(),
        }
    }

    fn strict(&self) -> bool {
        self.mode == Mode::Strict
    }

    /// Error for a key that never received its value.
    fn unfinished_key(&self) -> Option<TagError> {
        let key = self.pending_key.clone()?;
        Some(if self.expecting_value {
            TagError::MissingValue { key }
        } else {
            TagError::KeyWithoutValue { key }
        })
    }

    fn step(&mut self, position: usize, token: Token) -> Result<(), TagError> {
        match token {
            Token::Comma => {
                if self.strict() {
                    if let Some(err) = self.unfinished_key() {
                        return Err(err);
                    }
                }
                self.expecting_key = true;
            }
            Token::Equals => {
                if self.pending_key.is_none() {
                    return Err(TagError::MissingKey { position });
                }
                self.expecting_value = true;
            }
            word => {
                let Some(text) = word.into_word() else {
                    return Ok(());
                };
                self.word(position, text)?;
            }
        }
        Ok(())
    }

    fn word(&mut self, position: usize, text: String) -> Result<(), TagError> {
        if self.expecting_key {
            self.pending_key = Some(text);
            self.expecting_key = false;
        } else if self.expecting_value {
            let key = self
                .pending_key
                .take()
                .ok_or(TagError::MissingKey { position })?;
            self.fields.insert(key, text);
            self.expecting_value = false;
        } else if self.strict() {
            if let Some(err) = self.unfinished_key() {
                return Err(err);
            }
            return Err(TagError::UnexpectedWord {
                position,
                word: text,
            });
        }
        Ok(())
    }

    fn finish(self) -> Result<BTreeMap<String, String>, TagError> {
        if self.strict() {
            if let Some(err) = self.unfinished_key() {
                return Err(err);
            }
        }
        Ok(self.fields)
    }
}
