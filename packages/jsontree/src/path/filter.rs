//! Filter selector: an opaque predicate with a canonical textual form.
//!
//! Filter expression parsing and evaluation live outside this crate. A
//! [`FilterSelector`] carries only the two things selection needs: a
//! predicate to run against each candidate value and the canonical source
//! text used as its identity.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

/// Predicate contract for filter selectors. Receives the candidate value and
/// the root of the queried document.
pub type FilterPredicate = dyn Fn(&Value, &Value) -> bool + Send + Sync;

/// A filter selector, e.g. `[?@.price < 10]`.
///
/// Two filters are equal when their canonical expressions are equal.
/// Logically equivalent expressions with different spellings, such as
/// `@.x > @.y` and `@.y < @.x`, are distinct.
#[derive(Clone)]
pub struct FilterSelector {
    expression: String,
    predicate: Arc<FilterPredicate>,
}

impl FilterSelector {
    /// Creates a filter selector from its canonical expression text and the
    /// predicate that implements it. The expression is written without the
    /// leading `?`.
    pub fn new(
        expression: impl Into<String>,
        predicate: impl Fn(&Value, &Value) -> bool + Send + Sync + 'static,
    ) -> Self {
        FilterSelector {
            expression: expression.into(),
            predicate: Arc::new(predicate),
        }
    }

    /// Runs the predicate against `current`, with `root` as the document
    /// being queried.
    pub fn evaluate(&self, current: &Value, root: &Value) -> bool {
        (self.predicate)(current, root)
    }

    /// The canonical expression text, without the leading `?`.
    pub fn expression(&self) -> &str {
        &self.expression
    }
}

impl PartialEq for FilterSelector {
    fn eq(&self, other: &Self) -> bool {
        self.expression == other.expression
    }
}

impl Eq for FilterSelector {}

impl fmt::Debug for FilterSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("FilterSelector").field(&self.expression).finish()
    }
}

impl fmt::Display for FilterSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "?{}", self.expression)
    }
}
