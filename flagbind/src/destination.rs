//! The closed set of variables a flag can be bound to.

use std::any::Any;

use crate::convert::ValueKind;

/// A mutable reference to a supported flag destination.
///
/// Scalars are written directly while parsing. Sequences are filled through
/// an accumulator and committed after a successful parse.
#[derive(Debug)]
#[non_exhaustive]
pub enum Destination<'a> {
    /// `i32` scalar.
    Int32(&'a mut i32),
    /// `i64` scalar.
    Int64(&'a mut i64),
    /// `u32` scalar.
    Uint32(&'a mut u32),
    /// `u64` scalar.
    Uint64(&'a mut u64),
    /// `f64` scalar.
    Float64(&'a mut f64),
    /// `String` scalar.
    Text(&'a mut String),
    /// `bool` scalar.
    Bool(&'a mut bool),
    /// Sequence of `i32`.
    Int32List(&'a mut Vec<i32>),
    /// Sequence of `i64`.
    Int64List(&'a mut Vec<i64>),
    /// Sequence of `u32`.
    Uint32List(&'a mut Vec<u32>),
    /// Sequence of `u64`.
    Uint64List(&'a mut Vec<u64>),
    /// Sequence of `f64`.
    Float64List(&'a mut Vec<f64>),
    /// Sequence of `String`.
    TextList(&'a mut Vec<String>),
}

macro_rules! downcast_into {
    ($dest:ident, $($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            if $dest.is::<$ty>() {
                return $dest.downcast_mut::<$ty>().map(Destination::$variant);
            }
        )+
    };
}

impl<'a> Destination<'a> {
    /// Element kind of the destination.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Int32(_) | Self::Int32List(_) => ValueKind::Int32,
            Self::Int64(_) | Self::Int64List(_) => ValueKind::Int64,
            Self::Uint32(_) | Self::Uint32List(_) => ValueKind::Uint32,
            Self::Uint64(_) | Self::Uint64List(_) => ValueKind::Uint64,
            Self::Float64(_) | Self::Float64List(_) => ValueKind::Float64,
            Self::Text(_) | Self::TextList(_) => ValueKind::Text,
            Self::Bool(_) => ValueKind::Bool,
        }
    }

    /// Reports whether the destination collects multiple values.
    #[must_use]
    pub const fn is_sequence(&self) -> bool {
        matches!(
            self,
            Self::Int32List(_)
                | Self::Int64List(_)
                | Self::Uint32List(_)
                | Self::Uint64List(_)
                | Self::Float64List(_)
                | Self::TextList(_)
        )
    }

    /// Classifies a type-erased reference. Returns `None` when the
    /// referenced type is outside the supported set.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use flagbind::Destination;
    ///
    /// let mut ports: Vec<u32> = Vec::new();
    /// assert!(Destination::from_any(&mut ports).is_some_and(|d| d.is_sequence()));
    ///
    /// let mut flags: Vec<bool> = Vec::new();
    /// assert!(Destination::from_any(&mut flags).is_none());
    /// ```
    pub fn from_any(dest: &'a mut dyn Any) -> Option<Self> {
        downcast_into!(
            dest,
            i32 => Int32,
            i64 => Int64,
            u32 => Uint32,
            u64 => Uint64,
            f64 => Float64,
            String => Text,
            bool => Bool,
            Vec<i32> => Int32List,
            Vec<i64> => Int64List,
            Vec<u32> => Uint32List,
            Vec<u64> => Uint64List,
            Vec<f64> => Float64List,
            Vec<String> => TextList,
        );
        None
    }
}

/// Types that can be bound to a flag.
///
/// Implemented for exactly the types [`Destination`] covers, so binding an
/// unsupported type is a compile error.
pub trait Bindable {
    /// Wraps a mutable borrow of `self` as a [`Destination`].
    fn destination(&mut self) -> Destination<'_>;
}

macro_rules! bindable {
    ($($ty:ty => $variant:ident),+ $(,)?) => {
        $(
            impl Bindable for $ty {
                fn destination(&mut self) -> Destination<'_> {
                    Destination::$variant(self)
                }
            }
        )+
    };
}

bindable!(
    i32 => Int32,
    i64 => Int64,
    u32 => Uint32,
    u64 => Uint64,
    f64 => Float64,
    String => Text,
    bool => Bool,
    Vec<i32> => Int32List,
    Vec<i64> => Int64List,
    Vec<u32> => Uint32List,
    Vec<u64> => Uint64List,
    Vec<f64> => Float64List,
    Vec<String> => TextList,
);
