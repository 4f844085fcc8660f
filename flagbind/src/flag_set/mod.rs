//! The binding engine: typed registration over the flag registry.
//!
//! Scalars get a direct setter. Sequences get an accumulator plus a
//! deferred commit that copies the accumulated values into the destination
//! once parsing has succeeded. A failed parse never runs the commits and
//! rewinds every accumulator to where that parse started, so neither the
//! destinations nor a later parse see values from the failed pass.

use std::any::{Any, type_name};
use std::cell::RefCell;
use std::io::{self, Write};
use std::rc::Rc;

use crate::accumulator::{Accumulator, SharedAccumulator, render_list};
use crate::convert::FlagScalar;
use crate::destination::{Bindable, Destination};
use crate::error::{BindError, BindResult, ParseError, ParseResult};
use crate::record::{FlagStruct, StructBinder};
use crate::registry::FlagRegistry;
use crate::usage::FlagInfo;
use crate::value::{ScalarValue, Value};

/// What happens when parsing fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ErrorHandling {
    /// Return the error to the caller.
    #[default]
    ContinueOnError,
    /// Exit the process: status 0 for a help request, 2 otherwise.
    ExitOnError,
    /// Panic with the error message.
    PanicOnError,
}

/// Copies one accumulator into its destination after a successful parse,
/// or rewinds it to where the parse started after a failed one.
struct DeferredCommit<'a> {
    flag: String,
    checkpoint: usize,
    position: Box<dyn Fn() -> usize + 'a>,
    rewind: Box<dyn Fn(usize) + 'a>,
    commit: Box<dyn FnMut() -> Option<usize> + 'a>,
}

impl<'a> DeferredCommit<'a> {
    fn new<T: FlagScalar + 'a>(
        flag: &str,
        accumulator: &Rc<RefCell<Accumulator<T>>>,
        destination: &'a mut Vec<T>,
    ) -> Self {
        let (measured, rewound, committed) = (
            Rc::clone(accumulator),
            Rc::clone(accumulator),
            Rc::clone(accumulator),
        );
        Self {
            flag: flag.to_owned(),
            checkpoint: 0,
            position: Box::new(move || measured.borrow().len()),
            rewind: Box::new(move |len| rewound.borrow_mut().rewind(len)),
            commit: Box::new(move || {
                let collected = committed.borrow();
                if collected.is_empty() {
                    return None;
                }
                *destination = collected.snapshot();
                Some(destination.len())
            }),
        }
    }

    /// Remembers how many values the accumulator held before parsing.
    fn mark(&mut self) {
        self.checkpoint = (self.position)();
    }

    /// Discards values accepted since [`DeferredCommit::mark`].
    fn roll_back(&self) {
        (self.rewind)(self.checkpoint);
        tracing::trace!(flag = %self.flag, kept = self.checkpoint, "rewound sequence flag");
    }

    fn run(&mut self) {
        match (self.commit)() {
            Some(count) => tracing::debug!(flag = %self.flag, count, "committed sequence flag"),
            None => tracing::trace!(flag = %self.flag, "sequence flag absent; destination kept"),
        }
    }
}

/// A named set of flags bound to caller-owned variables.
///
/// Destinations are borrowed mutably for `'a`; drop the set (or let it go
/// out of scope) before reading them.
///
/// # Examples
///
/// ```rust
/// use flagbind::{ErrorHandling, FlagSet};
///
/// let mut ip = String::from("127.0.0.1");
/// let mut count = 0_i64;
/// let mut ports: Vec<u32> = Vec::new();
///
/// let mut flags = FlagSet::new("demo", ErrorHandling::ContinueOnError);
/// flags.bind(&mut ip, "ip", "address to bind").expect("bind ip");
/// flags.bind(&mut count, "count", "number of workers").expect("bind count");
/// flags
///     .bind_with_delimiter(&mut ports, "port", "ports to open", ",")
///     .expect("bind port");
/// flags
///     .parse(["-ip", "127.0.0.2", "-count=2", "-port", "80,443", "-port", "8080", "rest"])
///     .expect("parse arguments");
/// assert_eq!(flags.args(), ["rest"]);
/// drop(flags);
///
/// assert_eq!(ip, "127.0.0.2");
/// assert_eq!(count, 2);
/// assert_eq!(ports, vec![80, 443, 8080]);
/// ```
pub struct FlagSet<'a> {
    registry: FlagRegistry<'a>,
    pending: Vec<DeferredCommit<'a>>,
    error_handling: ErrorHandling,
    strict_tags: bool,
}

impl<'a> FlagSet<'a> {
    /// Creates an empty set. A non-empty `name` appears in the usage
    /// heading.
    #[must_use]
    pub fn new(name: impl Into<String>, error_handling: ErrorHandling) -> Self {
        Self {
            registry: FlagRegistry::new(name.into()),
            pending: Vec::new(),
            error_handling,
            strict_tags: false,
        }
    }

    /// Name given at construction.
    #[must_use]
    pub fn name(&self) -> &str {
        self.registry.name()
    }

    /// Failure policy applied by [`FlagSet::parse`].
    #[must_use]
    pub const fn error_handling(&self) -> ErrorHandling {
        self.error_handling
    }

    /// Redirects usage and error output, which goes to standard error by
    /// default.
    pub fn set_output<W: Write + 'a>(&mut self, output: W) {
        self.registry.set_output(Box::new(output));
    }

    /// Replaces the usage printer invoked on parse errors and `-help`.
    pub fn set_usage<F>(&mut self, usage: F)
    where
        F: Fn(&mut dyn Write, &[FlagInfo]) -> io::Result<()> + 'a,
    {
        self.registry.set_usage(Box::new(usage));
    }

    /// When enabled, [`FlagSet::bind_struct`] rejects malformed field
    /// annotations instead of skipping the field.
    pub const fn set_strict_tags(&mut self, strict: bool) {
        self.strict_tags = strict;
    }

    /// Whether malformed annotations are rejected.
    #[must_use]
    pub const fn strict_tags(&self) -> bool {
        self.strict_tags
    }

    /// Binds `dest` to the flag `-name`. The current value of `dest` is the
    /// default.
    ///
    /// Sequence destinations collect every occurrence of the flag.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::DuplicateName`] if `name` is taken and
    /// [`BindError::InvalidName`] if it is empty, begins with `-` or
    /// contains `=`.
    pub fn bind<T: Bindable>(&mut self, dest: &'a mut T, name: &str, usage: &str) -> BindResult {
        self.bind_with_delimiter(dest, name, usage, "")
    }

    /// Like [`FlagSet::bind`], splitting each occurrence of a sequence flag
    /// on `delimiter`. The delimiter is ignored for scalars.
    ///
    /// # Errors
    ///
    /// As for [`FlagSet::bind`].
    pub fn bind_with_delimiter<T: Bindable>(
        &mut self,
        dest: &'a mut T,
        name: &str,
        usage: &str,
        delimiter: &str,
    ) -> BindResult {
        self.bind_destination(dest.destination(), name, usage, delimiter)
    }

    /// Binds a destination whose type is only known at run time.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::UnsupportedType`] when `T` is not one of the
    /// supported scalar or sequence types, otherwise as for
    /// [`FlagSet::bind`].
    pub fn bind_any<T: Any>(
        &mut self,
        dest: &'a mut T,
        name: &str,
        usage: &str,
        delimiter: &str,
    ) -> BindResult {
        let Some(destination) = Destination::from_any(dest) else {
            return Err(BindError::UnsupportedType {
                name: name.to_owned(),
                type_name: type_name::<T>(),
            });
        };
        self.bind_destination(destination, name, usage, delimiter)
    }

    /// Dispatches on the destination variant.
    ///
    /// # Errors
    ///
    /// As for [`FlagSet::bind`].
    pub fn bind_destination(
        &mut self,
        dest: Destination<'a>,
        name: &str,
        usage: &str,
        delimiter: &str,
    ) -> BindResult {
        match dest {
            Destination::Int32(v) => self.bind_scalar(v, name, usage),
            Destination::Int64(v) => self.bind_scalar(v, name, usage),
            Destination::Uint32(v) => self.bind_scalar(v, name, usage),
            Destination::Uint64(v) => self.bind_scalar(v, name, usage),
            Destination::Float64(v) => self.bind_scalar(v, name, usage),
            Destination::Text(v) => self.bind_scalar(v, name, usage),
            Destination::Bool(v) => self.bind_scalar(v, name, usage),
            Destination::Int32List(v) => self.bind_sequence(v, name, usage, delimiter),
            Destination::Int64List(v) => self.bind_sequence(v, name, usage, delimiter),
            Destination::Uint32List(v) => self.bind_sequence(v, name, usage, delimiter),
            Destination::Uint64List(v) => self.bind_sequence(v, name, usage, delimiter),
            Destination::Float64List(v) => self.bind_sequence(v, name, usage, delimiter),
            Destination::TextList(v) => self.bind_sequence(v, name, usage, delimiter),
        }
    }

    fn bind_scalar<T: FlagScalar + 'a>(&mut self, dest: &'a mut T, name: &str, usage: &str) -> BindResult {
        self.registry
            .register(name, usage, Box::new(ScalarValue::new(dest)))
    }

    fn bind_sequence<T: FlagScalar + 'a>(
        &mut self,
        dest: &'a mut Vec<T>,
        name: &str,
        usage: &str,
        delimiter: &str,
    ) -> BindResult {
        let handler = SharedAccumulator::<T>::new(delimiter);
        let accumulator = handler.handle();
        let default_text = render_list(dest);
        self.registry
            .register_with_default(name, usage, Box::new(handler), default_text)?;
        self.pending
            .push(DeferredCommit::new(name, &accumulator, dest));
        Ok(())
    }

    /// Binds every annotated public field of `record`.
    ///
    /// # Errors
    ///
    /// Returns [`BindError::Field`] wrapping the first field that failed to
    /// register.
    pub fn bind_struct<R: FlagStruct>(&mut self, record: &'a mut R) -> BindResult {
        let mut binder = StructBinder::new(self, R::record_name());
        record.bind_fields(&mut binder)
    }

    /// Registers a caller-defined [`Value`]. Its current rendering is the
    /// default shown in usage.
    ///
    /// # Errors
    ///
    /// As for [`FlagSet::bind`].
    pub fn var<V: Value + 'a>(&mut self, value: V, name: &str, usage: &str) -> BindResult {
        self.registry.register(name, usage, Box::new(value))
    }

    /// Parses `args`, which should not include the program name.
    ///
    /// Flag parsing stops at the first non-flag argument, a lone `-`, or
    /// after `--`. On success every sequence flag that was supplied is
    /// committed to its destination in registration order.
    ///
    /// # Errors
    ///
    /// Under [`ErrorHandling::ContinueOnError`] returns the [`ParseError`]
    /// after writing it and the usage to the output. The other policies exit
    /// or panic instead.
    #[expect(
        clippy::panic_in_result_fn,
        reason = "PanicOnError asks for a panic on malformed arguments"
    )]
    pub fn parse<I, S>(&mut self, args: I) -> ParseResult
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for commit in &mut self.pending {
            commit.mark();
        }
        match self.registry.parse(args) {
            Ok(()) => {
                self.commit_pending();
                Ok(())
            }
            Err(err) => {
                tracing::debug!(set = %self.name(), error = %err, "flag parsing failed");
                for commit in &self.pending {
                    commit.roll_back();
                }
                if let Err(io_err) = self.registry.report(&err) {
                    tracing::warn!(error = %io_err, "failed to write flag error");
                }
                match self.error_handling {
                    ErrorHandling::ContinueOnError => Err(err),
                    ErrorHandling::ExitOnError => std::process::exit(err.exit_code()),
                    ErrorHandling::PanicOnError => panic!("{err}"),
                }
            }
        }
    }

    fn commit_pending(&mut self) {
        for commit in &mut self.pending {
            commit.run();
        }
    }

    /// Whether [`FlagSet::parse`] has been called.
    #[must_use]
    pub const fn parsed(&self) -> bool {
        self.registry.parsed()
    }

    /// Arguments left over after the flags.
    #[must_use]
    pub fn args(&self) -> &[String] {
        self.registry.args()
    }

    /// The `i`th leftover argument, or `""` if there is none.
    #[must_use]
    pub fn arg(&self, i: usize) -> &str {
        self.args().get(i).map_or("", String::as_str)
    }

    /// Number of leftover arguments.
    #[must_use]
    pub fn n_arg(&self) -> usize {
        self.args().len()
    }

    /// Number of flags that have been set.
    #[must_use]
    pub fn n_flag(&self) -> usize {
        self.registry.n_flag()
    }

    /// Metadata for the named flag.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<FlagInfo> {
        self.registry.lookup(name)
    }

    /// Metadata for every flag, sorted by name.
    #[must_use]
    pub fn flags(&self) -> Vec<FlagInfo> {
        self.registry.infos()
    }

    /// Calls `visitor` for each flag that has been set, in name order.
    pub fn visit<F: FnMut(&FlagInfo)>(&self, visitor: F) {
        self.flags().iter().filter(|flag| flag.is_set).for_each(visitor);
    }

    /// Calls `visitor` for every flag, in name order.
    pub fn visit_all<F: FnMut(&FlagInfo)>(&self, visitor: F) {
        self.flags().iter().for_each(visitor);
    }

    /// Sets the named flag as if it had appeared on the command line.
    ///
    /// Sequence flags append to their accumulator; the destination is
    /// updated by the next successful [`FlagSet::parse`].
    ///
    /// # Errors
    ///
    /// Returns [`ParseError::Undefined`] for an unknown name, or a value
    /// error when `value` does not convert.
    pub fn set(&mut self, name: &str, value: &str) -> ParseResult {
        self.registry.set(name, value)
    }

    /// Writes the flag listing without a heading.
    ///
    /// # Errors
    ///
    /// Propagates write failures from the output.
    pub fn print_defaults(&mut self) -> io::Result<()> {
        self.registry.print_defaults()
    }

    /// Writes the usage message: the custom printer if one is installed,
    /// otherwise a heading followed by the flag listing.
    ///
    /// # Errors
    ///
    /// Propagates write failures from the output.
    pub fn print_usage(&mut self) -> io::Result<()> {
        self.registry.print_usage()
    }
}

impl std::fmt::Debug for FlagSet<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlagSet")
            .field("name", &self.name())
            .field("flags", &self.flags())
            .field("pending_commits", &self.pending.len())
            .field("error_handling", &self.error_handling)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests;
