//! Selector types for parsed JSONPath segments.
//!
//! A [`Selector`] is one matching rule within a segment: an object key name,
//! an array index, an array slice, a wildcard, or a filter predicate. The
//! five variants are closed by RFC 9535.

use std::fmt;

use super::filter::FilterSelector;

/// A single selector in an RFC 9535 JSONPath segment.
#[derive(Debug, Clone, PartialEq)]
pub enum Selector {
    /// Key name selector, e.g. `"name"` or `.name`.
    Name(String),
    /// Array index selector, e.g. `[3]`. Negative indexes count from the end.
    Index(i64),
    /// Array slice selector, e.g. `[0:100:5]`.
    Slice(SliceSelector),
    /// Wildcard selector, `*` or `[*]`.
    Wildcard,
    /// Filter selector, e.g. `[?@.price < 10]`.
    Filter(FilterSelector),
}

impl Selector {
    /// Creates a key name selector.
    pub fn name(name: impl Into<String>) -> Self {
        Selector::Name(name.into())
    }

    /// Creates an array index selector.
    pub fn index(index: i64) -> Self {
        Selector::Index(index)
    }

    /// Creates an array slice selector. Pass `None` for any bound to use the
    /// RFC 9535 default for the step direction.
    pub fn slice(
        start: impl Into<Option<i64>>,
        end: impl Into<Option<i64>>,
        step: impl Into<Option<i64>>,
    ) -> Self {
        Selector::Slice(SliceSelector::new(start, end, step))
    }

    /// Creates a wildcard selector.
    pub fn wildcard() -> Self {
        Selector::Wildcard
    }

    /// Creates a filter selector.
    pub fn filter(filter: FilterSelector) -> Self {
        Selector::Filter(filter)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selector::Name(name) => write!(f, "{name:?}"),
            Selector::Index(index) => write!(f, "{index}"),
            Selector::Slice(slice) => write!(f, "{slice}"),
            Selector::Wildcard => f.write_str("*"),
            Selector::Filter(filter) => write!(f, "{filter}"),
        }
    }
}

/// An array slice selector with its bounds resolved.
///
/// Defaults are applied at construction: `step` defaults to 1, `start` to 0
/// and `end` to [`i64::MAX`] for forward slices, and `start` to [`i64::MAX`]
/// and `end` to [`i64::MIN`] for backward slices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SliceSelector {
    start: i64,
    end: i64,
    step: i64,
}

impl SliceSelector {
    /// Creates a slice selector, resolving omitted bounds to the RFC 9535
    /// defaults for the step direction.
    pub fn new(
        start: impl Into<Option<i64>>,
        end: impl Into<Option<i64>>,
        step: impl Into<Option<i64>>,
    ) -> Self {
        let step = step.into().unwrap_or(1);
        let start = start.into().unwrap_or(if step < 0 { i64::MAX } else { 0 });
        let end = end.into().unwrap_or(if step < 0 { i64::MIN } else { i64::MAX });
        SliceSelector { start, end, step }
    }

    /// The resolved start of the slice.
    pub fn start(&self) -> i64 {
        self.start
    }

    /// The resolved end of the slice.
    pub fn end(&self) -> i64 {
        self.end
    }

    /// The step between selected indexes.
    pub fn step(&self) -> i64 {
        self.step
    }

    /// Returns the lower and upper iteration bounds for an array of `len`
    /// elements, per RFC 9535 §2.3.4.2.2.
    ///
    /// For a positive step, iterate `lower..upper`. For a negative step,
    /// iterate from `upper` down to just above `lower`. A zero step selects
    /// nothing.
    pub fn bounds(&self, len: i64) -> (i64, i64) {
        let start = normalize(self.start, len);
        let end = normalize(self.end, len);
        match self.step {
            step if step > 0 => (start.min(len).max(0), end.min(len).max(0)),
            step if step < 0 => (end.min(len - 1).max(-1), start.min(len - 1).max(-1)),
            _ => (0, 0),
        }
    }

    /// True if this slice can never select an element: a zero step, equal
    /// bounds, or bounds that contradict the step direction.
    pub(crate) fn selects_nothing(&self) -> bool {
        self.step == 0
            || self.start == self.end
            || (self.step > 0 && self.start > self.end)
            || (self.step < 0 && self.start < self.end)
    }
}

/// Normalizes index `i` relative to an array of `len` elements.
fn normalize(i: i64, len: i64) -> i64 {
    if i >= 0 {
        return i;
    }
    len + i
}

impl fmt::Display for SliceSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (default_start, default_end) = if self.step < 0 {
            (i64::MAX, i64::MIN)
        } else {
            (0, i64::MAX)
        };
        if self.start != default_start {
            write!(f, "{}", self.start)?;
        }
        f.write_str(":")?;
        if self.end != default_end {
            write!(f, "{}", self.end)?;
        }
        if self.step != 1 {
            write!(f, ":{}", self.step)?;
        }
        Ok(())
    }
}
