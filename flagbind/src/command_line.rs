//! The default flag set for the running program.
//!
//! Mirrors the [`FlagSet`] operations as free functions over a per-thread
//! set named after `argv[0]` that exits on parse errors. Because the set
//! lives for the rest of the thread, destinations must be `'static`, for
//! example a leaked box or a value owned by a `static` cell.
//!
//! The set is not shared across the process: [`FlagSet`] holds borrowed
//! destinations and is not `Send`, so every thread starts with its own
//! empty default set. Bind and parse from the thread that owns the
//! command line, normally `main`.
//!
//! ```rust,no_run
//! let port: &'static mut u32 = Box::leak(Box::new(8080));
//! flagbind::bind(port, "port", "listen port").expect("bind port");
//! flagbind::parse().expect("parse command line");
//! ```

use std::cell::RefCell;
use std::io::{self, Write};

use crate::destination::Bindable;
use crate::error::{BindResult, ParseResult};
use crate::flag_set::{ErrorHandling, FlagSet};
use crate::record::FlagStruct;

thread_local! {
    static COMMAND_LINE: RefCell<FlagSet<'static>> = RefCell::new(default_set());
}

fn default_set() -> FlagSet<'static> {
    let program = std::env::args().next().unwrap_or_default();
    FlagSet::new(program, ErrorHandling::ExitOnError)
}

/// Runs `f` with the default set.
///
/// Nested calls panic because the set is already borrowed.
pub fn with_command_line<R>(f: impl FnOnce(&mut FlagSet<'static>) -> R) -> R {
    COMMAND_LINE.with_borrow_mut(f)
}

/// Replaces the default set with an empty one, discarding every flag
/// registered so far.
pub fn reset_command_line(name: impl Into<String>, error_handling: ErrorHandling) {
    COMMAND_LINE.set(FlagSet::new(name, error_handling));
}

/// Binds `dest` to `-name` in the default set.
///
/// # Errors
///
/// See [`FlagSet::bind`].
pub fn bind<T: Bindable>(dest: &'static mut T, name: &str, usage: &str) -> BindResult {
    with_command_line(|flags| flags.bind(dest, name, usage))
}

/// Binds `dest` to `-name` in the default set, splitting sequence values on
/// `delimiter`.
///
/// # Errors
///
/// See [`FlagSet::bind_with_delimiter`].
pub fn bind_with_delimiter<T: Bindable>(
    dest: &'static mut T,
    name: &str,
    usage: &str,
    delimiter: &str,
) -> BindResult {
    with_command_line(|flags| flags.bind_with_delimiter(dest, name, usage, delimiter))
}

/// Binds the annotated fields of `record` in the default set.
///
/// # Errors
///
/// See [`FlagSet::bind_struct`].
pub fn bind_struct<R: FlagStruct>(record: &'static mut R) -> BindResult {
    with_command_line(|flags| flags.bind_struct(record))
}

/// Parses the process arguments after the program name.
///
/// # Errors
///
/// Only returns an error if the default set was replaced with one using
/// [`ErrorHandling::ContinueOnError`]; see [`FlagSet::parse`].
pub fn parse() -> ParseResult {
    parse_from(std::env::args().skip(1))
}

/// Parses `args` with the default set.
///
/// # Errors
///
/// See [`FlagSet::parse`].
pub fn parse_from<I, S>(args: I) -> ParseResult
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    with_command_line(|flags| flags.parse(args))
}

/// Whether the default set has been parsed.
#[must_use]
pub fn parsed() -> bool {
    with_command_line(|flags| flags.parsed())
}

/// Arguments left after the flags.
#[must_use]
pub fn args() -> Vec<String> {
    with_command_line(|flags| flags.args().to_vec())
}

/// The `i`th leftover argument, or an empty string.
#[must_use]
pub fn arg(i: usize) -> String {
    with_command_line(|flags| flags.arg(i).to_owned())
}

/// Number of leftover arguments.
#[must_use]
pub fn n_arg() -> usize {
    with_command_line(|flags| flags.n_arg())
}

/// Redirects usage and error output of the default set.
pub fn set_output<W: Write + 'static>(output: W) {
    with_command_line(|flags| flags.set_output(output));
}

/// Writes the default set's flag listing.
///
/// # Errors
///
/// Propagates write failures.
pub fn print_defaults() -> io::Result<()> {
    with_command_line(FlagSet::print_defaults)
}
