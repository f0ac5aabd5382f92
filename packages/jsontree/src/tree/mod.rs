//! Tree queries: many JSONPath expressions compiled into one selector tree.
//!
//! [`Tree::compile`] folds a batch of parsed paths into a single tree whose
//! evaluation selects the union of all of their locations. Shared path
//! prefixes collapse into shared branches, duplicate selectors are dropped,
//! and selectors subsumed by a wider one in the same segment (an index
//! inside a slice, anything under a wildcard) are absorbed.

mod predicates;
mod segment;
mod select;

use std::fmt;

use tracing::debug;

use crate::path::{Path, PathSegment, Selector};

use self::predicates::selectors_contain;
use self::segment::Segment;

/// A compiled tree query.
///
/// Immutable once compiled; may be shared freely across threads and
/// evaluated concurrently with [`Tree::select`](Tree::select).
#[derive(Debug)]
pub struct Tree {
    root: Segment,
    fixed: bool,
}

impl Tree {
    /// Compiles `paths` into an ordered mode tree. Array items selected by
    /// the paths are preserved in the order in which they appear in the
    /// input value passed to [`select`](Tree::select); unselected indexes
    /// are omitted.
    pub fn compile(paths: &[Path]) -> Self {
        let mut root = Segment::child(Vec::new());
        for path in paths {
            debug!(path = %path, "folding path into tree");
            fold_path(&mut root, path.segments());
        }
        root.deduplicate();
        Tree { root, fixed: false }
    }

    /// Compiles `paths` into a fixed mode tree. Array items selected by the
    /// paths are preserved at the index in which they appear in the input
    /// value passed to [`select`](Tree::select); preceding unselected
    /// indexes are filled with null.
    pub fn compile_fixed(paths: &[Path]) -> Self {
        let mut tree = Tree::compile(paths);
        tree.fixed = true;
        tree
    }
}

/// Folds one path's remaining segments into the tree below `cur`, merging
/// into an existing child where one covers the same ground and appending
/// new segments where none does.
fn fold_path(cur: &mut Segment, segments: &[PathSegment]) {
    let Some((seg, rest)) = segments.split_first() else {
        return;
    };

    let (selectors, is_wild) = normalize_selectors(seg.selectors());
    if is_wild && rest.is_empty() {
        // A trailing wildcard selects the same values as its parent, so it
        // adds nothing.
        return;
    }

    for i in 0..cur.children.len() {
        let child = &mut cur.children[i];
        if child.descendant == seg.is_descendant() {
            if child.is_branch(rest) {
                // The rest of the path is already a branch below this
                // child.
                child.merge_selectors(&selectors);
                return fold_path(child, rest);
            }
            if child.has_same_selectors(&selectors) {
                if child.children.is_empty() {
                    // Everything below this child is already selected
                    // wholesale; the narrower path adds nothing.
                    return;
                }
                if rest.is_empty() {
                    // This path selects everything below the child, so the
                    // narrower branches are obsolete.
                    child.children.clear();
                    return;
                }
                return fold_path(child, rest);
            }
        } else if is_wild && !child.descendant && child.is_wildcard() && child.is_branch(rest) {
            // A descendant wildcard over the same branch subsumes the
            // non-descendant one.
            child.descendant = true;
            return fold_path(child, rest);
        }
    }

    cur.children.push(Segment::new(seg.is_descendant(), selectors));
    let last = cur.children.len() - 1;
    fold_path(&mut cur.children[last], rest);
}

/// Returns `selectors` sorted and deduplicated for folding, along with a
/// flag reporting whether they collapse to a wildcard.
///
/// Slices sort ahead of names and indexes so subsequent indexes can be
/// checked for inclusion in them; filters sort last. A wildcard anywhere
/// collapses the whole list.
fn normalize_selectors(selectors: &[Selector]) -> (Vec<Selector>, bool) {
    if selectors.iter().any(|s| matches!(s, Selector::Wildcard)) {
        return (vec![Selector::Wildcard], true);
    }

    let mut sorted = selectors.to_vec();
    sorted.sort_by_key(|sel| match sel {
        Selector::Wildcard => 0,
        Selector::Slice(_) => 1,
        Selector::Name(_) | Selector::Index(_) => 2,
        Selector::Filter(_) => 3,
    });

    let mut ret: Vec<Selector> = Vec::with_capacity(sorted.len());
    for sel in sorted {
        if !selectors_contain(&ret, &sel) {
            ret.push(sel);
        }
    }
    (ret, false)
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut buf = String::from("$\n");
        let last_index = self.root.children.len().saturating_sub(1);
        for (i, child) in self.root.children.iter().enumerate() {
            child.write_to(&mut buf, "", i == last_index);
        }
        f.write_str(&buf)
    }
}
