//! Append-only buffers for sequence-typed flags.
//!
//! The registry's native semantics overwrite a value on each occurrence.
//! Sequence flags instead route every occurrence through an
//! [`Accumulator`], which appends in argument order. The engine copies the
//! accumulated values into the caller's destination once, after a
//! successful parse.

use std::cell::RefCell;
use std::rc::Rc;

use crate::convert::FlagScalar;
use crate::error::ConversionError;
use crate::value::Value;

/// Collects every occurrence of one sequence flag.
///
/// # Examples
///
/// ```rust
/// use flagbind::Accumulator;
///
/// let mut nums = Accumulator::<i64>::new(",");
/// nums.accept("1").expect("single value");
/// nums.accept("2,3").expect("delimited values");
/// assert_eq!(nums.snapshot(), vec![1, 2, 3]);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Accumulator<T> {
    values: Vec<T>,
    delimiter: Option<String>,
}

impl<T: FlagScalar> Accumulator<T> {
    /// Creates an empty accumulator. An empty `delimiter` keeps each
    /// occurrence whole.
    #[must_use]
    pub fn new(delimiter: &str) -> Self {
        Self {
            values: Vec::new(),
            delimiter: (!delimiter.is_empty()).then(|| delimiter.to_owned()),
        }
    }

    /// Splits `raw` on the delimiter, converts every piece and appends them
    /// in order.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConversionError`]. Nothing from `raw` is appended
    /// in that case, even pieces that converted cleanly.
    pub fn accept(&mut self, raw: &str) -> Result<(), ConversionError> {
        let converted = match self.delimiter.as_deref() {
            Some(delimiter) => raw
                .split(delimiter)
                .map(T::parse_flag)
                .collect::<Result<Vec<_>, _>>()?,
            None => vec![T::parse_flag(raw)?],
        };
        tracing::trace!(
            accepted = converted.len(),
            total = self.values.len() + converted.len(),
            "accumulated flag occurrence"
        );
        self.values.extend(converted);
        Ok(())
    }

    /// Returns a copy of everything accumulated so far.
    #[must_use]
    pub fn snapshot(&self) -> Vec<T> {
        self.values.clone()
    }

    /// Borrows the accumulated values.
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    /// Number of values accumulated.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.values.len()
    }

    /// Reports whether no occurrence has been accepted.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Drops values accepted after the first `len`.
    pub(crate) fn rewind(&mut self, len: usize) {
        self.values.truncate(len);
    }

    /// The configured delimiter, if any.
    #[must_use]
    pub fn delimiter(&self) -> Option<&str> {
        self.delimiter.as_deref()
    }
}

impl<T: FlagScalar> Value for Accumulator<T> {
    fn set(&mut self, raw: &str) -> Result<(), ConversionError> {
        self.accept(raw)
    }

    fn render(&self) -> String {
        render_list(&self.values)
    }

    fn zero_text(&self) -> String {
        render_list::<T>(&[])
    }
}

/// Formats a sequence as `[a b c]` for usage listings.
pub(crate) fn render_list<T: FlagScalar>(values: &[T]) -> String {
    let items: Vec<String> = values.iter().map(FlagScalar::render).collect();
    format!("[{}]", items.join(" "))
}

/// Accumulator shared between the registry handler and the deferred commit
/// that later copies it into the destination.
pub(crate) struct SharedAccumulator<T>(Rc<RefCell<Accumulator<T>>>);

impl<T: FlagScalar> SharedAccumulator<T> {
    pub(crate) fn new(delimiter: &str) -> Self {
        Self(Rc::new(RefCell::new(Accumulator::new(delimiter))))
    }

    pub(crate) fn handle(&self) -> Rc<RefCell<Accumulator<T>>> {
        Rc::clone(&self.0)
    }
}

impl<T: FlagScalar> Value for SharedAccumulator<T> {
    fn set(&mut self, raw: &str) -> Result<(), ConversionError> {
        self.0.borrow_mut().accept(raw)
    }

    fn render(&self) -> String {
        self.0.borrow().render()
    }

    fn zero_text(&self) -> String {
        render_list::<T>(&[])
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for accumulation order and all-or-nothing occurrences.

    use super::{Accumulator, SharedAccumulator, render_list};
    use crate::value::Value;
    use rstest::rstest;

    #[rstest]
    fn starts_empty() {
        let acc = Accumulator::<String>::new(",");
        assert!(acc.is_empty());
        assert_eq!(acc.delimiter(), Some(","));
    }

    #[rstest]
    fn empty_delimiter_keeps_occurrence_whole() {
        let mut acc = Accumulator::<String>::new("");
        assert!(acc.accept("a,b").is_ok());
        assert_eq!(acc.delimiter(), None);
        assert_eq!(acc.values(), ["a,b".to_owned()]);
    }

    #[rstest]
    #[case(",", &["1", "2,3"], &[1, 2, 3])]
    #[case(":", &["4:5", "6"], &[4, 5, 6])]
    #[case("", &["7", "8"], &[7, 8])]
    #[case("::", &["1::2::3"], &[1, 2, 3])]
    fn appends_in_argument_order(
        #[case] delimiter: &str,
        #[case] occurrences: &[&str],
        #[case] expected: &[u64],
    ) {
        let mut acc = Accumulator::<u64>::new(delimiter);
        for raw in occurrences {
            assert!(acc.accept(raw).is_ok(), "occurrence {raw:?} rejected");
        }
        assert_eq!(acc.snapshot(), expected);
    }

    #[rstest]
    fn malformed_piece_rejects_whole_occurrence() {
        let mut acc = Accumulator::<i32>::new(",");
        assert!(acc.accept("1").is_ok());
        let err = acc.accept("2,x,4").expect_err("x is not an integer");
        assert_eq!(err.text, "x");
        assert_eq!(acc.snapshot(), vec![1]);
    }

    #[rstest]
    fn empty_pieces_are_kept_for_text() {
        let mut acc = Accumulator::<String>::new(",");
        assert!(acc.accept("a,,b").is_ok());
        assert_eq!(acc.len(), 3);
        assert_eq!(acc.values().get(1).map(String::as_str), Some(""));
    }

    #[rstest]
    fn rewind_discards_later_occurrences() {
        let mut acc = Accumulator::<u32>::new(",");
        assert!(acc.accept("1").is_ok());
        let mark = acc.len();
        assert!(acc.accept("2,3").is_ok());
        acc.rewind(mark);
        assert_eq!(acc.snapshot(), vec![1]);
        acc.rewind(5);
        assert_eq!(acc.len(), 1);
    }

    #[rstest]
    fn renders_like_a_list() {
        let mut acc = Accumulator::<f64>::new("");
        assert_eq!(acc.render(), "[]");
        assert!(acc.set("1.5").is_ok());
        assert!(acc.set("2").is_ok());
        assert_eq!(acc.render(), "[1.5 2]");
        assert_eq!(acc.zero_text(), "[]");
    }

    #[rstest]
    fn shared_handle_sees_handler_writes() {
        let mut shared = SharedAccumulator::<i64>::new(",");
        let handle = shared.handle();
        assert!(shared.set("-1,-2").is_ok());
        assert_eq!(handle.borrow().snapshot(), vec![-1, -2]);
        assert_eq!(render_list(handle.borrow().values()), "[-1 -2]");
    }
}
