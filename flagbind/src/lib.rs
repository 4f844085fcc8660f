//! Declarative command-line flag binding.
//!
//! Bind program variables to single-dash flags and let the parser fill them
//! in. The flag's type follows from the variable: signed and unsigned 32/64
//! bit integers, `f64`, `String` and `bool` bind as scalars, and `Vec`s of
//! the non-boolean types bind as repeatable flags that collect every
//! occurrence, optionally splitting each one on a delimiter.
//!
//! ```rust
//! use flagbind::{ErrorHandling, FlagSet, FlagStruct};
//!
//! #[derive(Debug, Default, FlagStruct)]
//! struct MyFlags {
//!     #[flagbind("ip, del=',', usage='The IP address'")]
//!     pub ips: Vec<String>,
//!     #[flagbind("cnt, usage='The count'")]
//!     pub counts: Vec<i64>,
//!     #[flagbind("quote, usage='Field to show embedded (\\') chars'")]
//!     pub quote: String,
//! }
//!
//! let mut opts = MyFlags::default();
//! let mut flags = FlagSet::new("demo", ErrorHandling::ContinueOnError);
//! flags.bind_struct(&mut opts).expect("bind MyFlags");
//! flags
//!     .parse(["-ip", "10.0.0.1,10.0.0.2", "-cnt", "1", "-cnt", "2", "-ip", "10.0.0.3"])
//!     .expect("parse arguments");
//! drop(flags);
//!
//! assert_eq!(opts.ips, ["10.0.0.1", "10.0.0.2", "10.0.0.3"]);
//! assert_eq!(opts.counts, [1, 2]);
//! ```
//!
//! Defaults are whatever the variables hold before parsing. Sequence
//! destinations are only overwritten when their flag appears, and only
//! after the whole argument list parsed cleanly.
//!
//! The free functions such as [`bind`] and [`parse`] drive a default set
//! built from `std::env::args`. That set is per-thread rather than
//! process-wide, because a [`FlagSet`] borrows its destinations and is not
//! `Send`.

pub use flagbind_macros::FlagStruct;

mod accumulator;
mod command_line;
mod convert;
mod destination;
mod error;
mod flag_set;
mod record;
mod registry;
mod tag;
mod usage;
mod value;

pub use accumulator::Accumulator;
pub use command_line::{
    arg, args, bind, bind_struct, bind_with_delimiter, n_arg, parse, parse_from, parsed,
    print_defaults, reset_command_line, set_output, with_command_line,
};
pub use convert::{FlagScalar, ValueKind};
pub use destination::{Bindable, Destination};
pub use error::{BindError, BindResult, ConversionError, ParseError, ParseResult, TagError};
pub use flag_set::{ErrorHandling, FlagSet};
pub use record::{FlagStruct, StructBinder};
pub use tag::{FlagTag, parse_tag};
pub use usage::{FlagInfo, UsageFn};
pub use value::Value;
