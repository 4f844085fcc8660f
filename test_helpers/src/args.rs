//! Helpers for assembling argument lists.

/// Converts string slices into the owned argument vector `parse` expects.
///
/// # Examples
///
/// ```
/// use flagbind_test_helpers::argv;
///
/// assert_eq!(argv(["-ip", "127.0.0.2"]), vec!["-ip".to_owned(), "127.0.0.2".to_owned()]);
/// ```
#[must_use]
pub fn argv<I, S>(items: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    items
        .into_iter()
        .map(|item| item.as_ref().to_owned())
        .collect()
}

/// Splits a command line on ASCII whitespace into an argument vector.
///
/// No quoting rules apply; use [`argv`] when an argument contains spaces.
#[must_use]
pub fn split_args(line: &str) -> Vec<String> {
    line.split_ascii_whitespace().map(str::to_owned).collect()
}
