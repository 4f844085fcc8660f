//! Name-indexed flag storage and the single-dash argument grammar.
//!
//! This is the primitive the binding engine sits on: it knows nothing of
//! sequences or deferred commits. Each registered flag owns a [`Value`]
//! handler, and every occurrence on the command line calls
//! [`Value::set`] on it.

use std::collections::{BTreeMap, BTreeSet, VecDeque};
use std::io::{self, Write};

use crate::convert::FlagScalar;
use crate::error::{BindError, BindResult, ParseError, ParseResult};
use crate::usage::{self, FlagInfo, UsageFn};
use crate::value::Value;

struct Flag<'a> {
    usage: String,
    default_text: String,
    value: Box<dyn Value + 'a>,
}

impl Flag<'_> {
    fn info(&self, name: &str, is_set: bool) -> FlagInfo {
        FlagInfo {
            name: name.to_owned(),
            usage: self.usage.clone(),
            default_text: self.default_text.clone(),
            zero_text: self.value.zero_text(),
            type_name: self.value.type_name().to_owned(),
            is_bool: self.value.is_bool_flag(),
            is_set,
        }
    }
}

pub(crate) struct FlagRegistry<'a> {
    name: String,
    flags: BTreeMap<String, Flag<'a>>,
    actual: BTreeSet<String>,
    args: Vec<String>,
    parsed: bool,
    output: Box<dyn Write + 'a>,
    usage: Option<UsageFn<'a>>,
}

impl<'a> FlagRegistry<'a> {
    pub(crate) fn new(name: String) -> Self {
        Self {
            name,
            flags: BTreeMap::new(),
            actual: BTreeSet::new(),
            args: Vec::new(),
            parsed: false,
            output: Box::new(io::stderr()),
            usage: None,
        }
    }

    pub(crate) fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn set_output(&mut self, output: Box<dyn Write + 'a>) {
        self.output = output;
    }

    pub(crate) fn set_usage(&mut self, usage: UsageFn<'a>) {
        self.usage = Some(usage);
    }

    /// Checks that `name` could be registered without registering it.
    pub(crate) fn check_name(&self, name: &str) -> BindResult {
        let invalid = |reason| BindError::InvalidName {
            name: name.to_owned(),
            reason,
        };
        if name.is_empty() {
            return Err(invalid("is empty"));
        }
        if name.starts_with('-') {
            return Err(invalid("begins with -"));
        }
        if name.contains('=') {
            return Err(invalid("contains ="));
        }
        if self.flags.contains_key(name) {
            return Err(BindError::DuplicateName {
                set: self.name.clone(),
                name: name.to_owned(),
            });
        }
        Ok(())
    }

    /// Registers `value`, recording its current rendering as the default.
    pub(crate) fn register(
        &mut self,
        name: &str,
        usage: &str,
        value: Box<dyn Value + 'a>,
    ) -> BindResult {
        let default_text = value.render();
        self.register_with_default(name, usage, value, default_text)
    }

    pub(crate) fn register_with_default(
        &mut self,
        name: &str,
        usage: &str,
        value: Box<dyn Value + 'a>,
        default_text: String,
    ) -> BindResult {
        self.check_name(name)?;
        tracing::debug!(set = %self.name, flag = name, default = %default_text, "registered flag");
        self.flags.insert(
            name.to_owned(),
            Flag {
                usage: usage.to_owned(),
                default_text,
                value,
            },
        );
        Ok(())
    }

    pub(crate) fn parse<I, S>(&mut self, arguments: I) -> ParseResult
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.parsed = true;
        let mut pending: VecDeque<String> = arguments.into_iter().map(Into::into).collect();
        let outcome = loop {
            match self.parse_one(&mut pending) {
                Ok(true) => {}
                Ok(false) => break Ok(()),
                Err(err) => break Err(err),
            }
        };
        self.args = pending.into();
        outcome
    }

    /// Consumes one flag from the front of `pending`. Returns `Ok(false)`
    /// once the flags are exhausted.
    fn parse_one(&mut self, pending: &mut VecDeque<String>) -> Result<bool, ParseError> {
        let Some(arg) = pending.front().cloned() else {
            return Ok(false);
        };
        if arg.len() < 2 {
            return Ok(false);
        }
        let Some(dashed) = arg.strip_prefix('-') else {
            return Ok(false);
        };
        let body = match dashed.strip_prefix('-') {
            Some("") => {
                pending.pop_front();
                return Ok(false);
            }
            Some(rest) => rest,
            None => dashed,
        };
        if body.is_empty() || body.starts_with('-') || body.starts_with('=') {
            return Err(ParseError::BadSyntax { arg });
        }
        let (name, inline) = match body.split_once('=') {
            Some((name, value)) => (name.to_owned(), Some(value.to_owned())),
            None => (body.to_owned(), None),
        };
        pending.pop_front();

        let Some(flag) = self.flags.get_mut(&name) else {
            if name == "help" || name == "h" {
                if let Err(err) = self.print_usage() {
                    tracing::warn!(error = %err, "failed to write usage");
                }
                return Err(ParseError::Help);
            }
            return Err(ParseError::Undefined { name });
        };

        if flag.value.is_bool_flag() {
            let value = inline.unwrap_or_else(|| true.render());
            flag.value
                .set(&value)
                .map_err(|source| ParseError::InvalidBoolean {
                    name: name.clone(),
                    value,
                    source,
                })?;
        } else {
            let Some(value) = inline.or_else(|| pending.pop_front()) else {
                return Err(ParseError::MissingArgument { name });
            };
            flag.value
                .set(&value)
                .map_err(|source| ParseError::InvalidValue {
                    name: name.clone(),
                    value,
                    source,
                })?;
        }
        tracing::trace!(set = %self.name, flag = %name, "applied flag occurrence");
        self.actual.insert(name);
        Ok(true)
    }

    /// Sets a flag as if it had appeared on the command line.
    pub(crate) fn set(&mut self, name: &str, value: &str) -> ParseResult {
        let Some(flag) = self.flags.get_mut(name) else {
            return Err(ParseError::Undefined {
                name: name.to_owned(),
            });
        };
        let is_bool = flag.value.is_bool_flag();
        flag.value.set(value).map_err(|source| {
            let (flag_name, raw) = (name.to_owned(), value.to_owned());
            if is_bool {
                ParseError::InvalidBoolean {
                    name: flag_name,
                    value: raw,
                    source,
                }
            } else {
                ParseError::InvalidValue {
                    name: flag_name,
                    value: raw,
                    source,
                }
            }
        })?;
        self.actual.insert(name.to_owned());
        Ok(())
    }

    pub(crate) const fn parsed(&self) -> bool {
        self.parsed
    }

    pub(crate) fn args(&self) -> &[String] {
        &self.args
    }

    pub(crate) fn n_flag(&self) -> usize {
        self.actual.len()
    }

    pub(crate) fn is_set(&self, name: &str) -> bool {
        self.actual.contains(name)
    }

    pub(crate) fn lookup(&self, name: &str) -> Option<FlagInfo> {
        self.flags
            .get(name)
            .map(|flag| flag.info(name, self.is_set(name)))
    }

    /// Metadata for every flag, sorted by name.
    pub(crate) fn infos(&self) -> Vec<FlagInfo> {
        self.flags
            .iter()
            .map(|(name, flag)| flag.info(name, self.is_set(name)))
            .collect()
    }

    pub(crate) fn print_defaults(&mut self) -> io::Result<()> {
        let infos = self.infos();
        usage::write_defaults(self.output.as_mut(), &infos)
    }

    pub(crate) fn print_usage(&mut self) -> io::Result<()> {
        let infos = self.infos();
        match &self.usage {
            Some(custom) => custom(self.output.as_mut(), &infos),
            None => usage::write_usage(self.output.as_mut(), &self.name, &infos),
        }
    }

    /// Writes a parse failure followed by the usage text.
    pub(crate) fn report(&mut self, err: &ParseError) -> io::Result<()> {
        if !matches!(err, ParseError::Help) {
            writeln!(self.output, "{err}")?;
            self.print_usage()?;
        }
        Ok(())
    }
}
