//! Parsed representation of RFC 9535 JSONPath queries.
//!
//! This crate does not parse JSONPath text. Callers construct [`Path`]
//! values from segments and selectors, typically from the output of a
//! JSONPath parser, and hand them to [`Tree::compile`](crate::Tree::compile).

mod filter;
mod selector;

use std::fmt;

pub use filter::{FilterPredicate, FilterSelector};
pub use selector::{Selector, SliceSelector};

/// One step of a parsed JSONPath query: a child (`[...]`) or descendant
/// (`..[...]`) segment holding one or more selectors.
#[derive(Debug, Clone, PartialEq)]
pub struct PathSegment {
    descendant: bool,
    selectors: Vec<Selector>,
}

impl PathSegment {
    /// Creates a child segment, matching the immediate children of the
    /// current value.
    pub fn child(selectors: Vec<Selector>) -> Self {
        PathSegment { descendant: false, selectors }
    }

    /// Creates a descendant segment, matching at the current value and at
    /// any depth beneath it.
    pub fn descendant(selectors: Vec<Selector>) -> Self {
        PathSegment { descendant: true, selectors }
    }

    /// True for descendant (`..`) segments.
    pub fn is_descendant(&self) -> bool {
        self.descendant
    }

    /// The segment's selectors.
    pub fn selectors(&self) -> &[Selector] {
        &self.selectors
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.descendant {
            f.write_str("..")?;
        }
        f.write_str("[")?;
        for (i, sel) in self.selectors.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{sel}")?;
        }
        f.write_str("]")
    }
}

/// A parsed JSONPath query: an ordered sequence of segments applied from the
/// document root.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    segments: Vec<PathSegment>,
}

impl Path {
    /// Creates a path from its segments.
    pub fn new(segments: Vec<PathSegment>) -> Self {
        Path { segments }
    }

    /// Creates the root-only path `$`.
    pub fn root() -> Self {
        Path::default()
    }

    /// Appends a child segment and returns the path.
    pub fn child(mut self, selectors: Vec<Selector>) -> Self {
        self.segments.push(PathSegment::child(selectors));
        self
    }

    /// Appends a descendant segment and returns the path.
    pub fn descendant(mut self, selectors: Vec<Selector>) -> Self {
        self.segments.push(PathSegment::descendant(selectors));
        self
    }

    /// The path's segments.
    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("$")?;
        for seg in &self.segments {
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}
