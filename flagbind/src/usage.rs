//! Flag metadata and the default usage listing.

use std::io::{self, Write};

/// Replacement usage printer installed with [`crate::FlagSet::set_usage`].
pub type UsageFn<'a> = Box<dyn Fn(&mut dyn Write, &[FlagInfo]) -> io::Result<()> + 'a>;

/// Description of one registered flag.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct FlagInfo {
    /// Name as typed after the dash.
    pub name: String,
    /// Usage text given at registration.
    pub usage: String,
    /// Rendering of the value the flag had when it was registered.
    pub default_text: String,
    /// Placeholder for the value in usage listings; empty for booleans.
    pub type_name: String,
    /// Whether the flag may appear without a value.
    pub is_bool: bool,
    /// Whether the flag was supplied during parsing or via `set`.
    pub is_set: bool,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub(crate) zero_text: String,
}

impl FlagInfo {
    /// Reports whether the registered default differs from the type's zero
    /// value and is therefore worth displaying.
    #[must_use]
    pub fn has_default(&self) -> bool {
        self.default_text != self.zero_text
    }

    /// Returns the value placeholder and the usage text with any
    /// back-quoted placeholder unquoted.
    ///
    /// ```rust
    /// # use flagbind::{ErrorHandling, FlagSet};
    /// let mut dir = String::new();
    /// let mut flags = FlagSet::new("demo", ErrorHandling::ContinueOnError);
    /// flags.bind(&mut dir, "dir", "search `directory` for files").expect("bind dir");
    /// let info = flags.lookup("dir").expect("dir is registered");
    /// assert_eq!(
    ///     info.unquote_usage(),
    ///     ("directory".to_owned(), "search directory for files".to_owned())
    /// );
    /// ```
    #[must_use]
    pub fn unquote_usage(&self) -> (String, String) {
        if let Some((before, rest)) = self.usage.split_once('`') {
            if let Some((placeholder, after)) = rest.split_once('`') {
                return (
                    placeholder.to_owned(),
                    format!("{before}{placeholder}{after}"),
                );
            }
        }
        (self.type_name.clone(), self.usage.clone())
    }
}

/// Writes one entry per flag in the order given.
///
/// Each entry is `  -name placeholder` followed by the usage text on an
/// indented line. Entries short enough to fit (a single-letter boolean)
/// keep the usage on the same line after a tab.
pub(crate) fn write_defaults(out: &mut dyn Write, flags: &[FlagInfo]) -> io::Result<()> {
    for flag in flags {
        writeln!(out, "{}", render_entry(flag))?;
    }
    Ok(())
}

pub(crate) fn write_usage(out: &mut dyn Write, name: &str, flags: &[FlagInfo]) -> io::Result<()> {
    if name.is_empty() {
        writeln!(out, "Usage:")?;
    } else {
        writeln!(out, "Usage of {name}:")?;
    }
    write_defaults(out, flags)
}

fn render_entry(flag: &FlagInfo) -> String {
    let (placeholder, usage) = flag.unquote_usage();
    let mut entry = format!("  -{}", flag.name);
    if !placeholder.is_empty() {
        entry.push(' ');
        entry.push_str(&placeholder);
    }
    if entry.len() <= 4 {
        entry.push('\t');
    } else {
        entry.push_str("\n    \t");
    }
    entry.push_str(&usage.replace('\n', "\n    \t"));
    if flag.has_default() {
        if flag.type_name == "string" {
            entry.push_str(&format!(" (default {:?})", flag.default_text));
        } else {
            entry.push_str(&format!(" (default {})", flag.default_text));
        }
    }
    entry
}
