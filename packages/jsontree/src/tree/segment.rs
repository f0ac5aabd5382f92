//! Tree segment: one node of a compiled tree query.
//!
//! A segment holds the selectors applied at its level, the child segments
//! applied to each value it matches, and a flag marking it as a descendant
//! segment. Merging keeps the invariants the evaluator relies on: no
//! selector is loosely contained by a sibling, a wildcard is always alone,
//! and no two children share identical branches.

use crate::path::{PathSegment, Selector};

use super::predicates::{selectors_contain, selectors_contain_exact, slice_in_slice};

const ELBOW: &str = "└── ";
const PIPE: &str = "│   ";
const TEE: &str = "├── ";
const BLANK: &str = "    ";

/// A single node in a compiled tree query.
#[derive(Debug)]
pub(crate) struct Segment {
    pub(crate) selectors: Vec<Selector>,
    pub(crate) children: Vec<Segment>,
    pub(crate) descendant: bool,
}

impl Segment {
    /// Creates a child segment node.
    pub(crate) fn child(selectors: Vec<Selector>) -> Self {
        Segment { selectors, children: Vec::new(), descendant: false }
    }

    /// Creates a segment node with the given descendant flag.
    pub(crate) fn new(descendant: bool, selectors: Vec<Selector>) -> Self {
        Segment { selectors, children: Vec::new(), descendant }
    }

    /// True if this segment loosely contains `sel`.
    pub(crate) fn has_selector(&self, sel: &Selector) -> bool {
        selectors_contain(&self.selectors, sel)
    }

    /// True if this segment loosely contains every member of `selectors`.
    pub(crate) fn has_selectors(&self, selectors: &[Selector]) -> bool {
        selectors.iter().all(|sel| self.has_selector(sel))
    }

    /// True if this segment's selectors are loosely the same set as
    /// `selectors`.
    pub(crate) fn has_same_selectors(&self, selectors: &[Selector]) -> bool {
        self.selectors.len() == selectors.len() && self.has_selectors(selectors)
    }

    /// True if this segment's selectors are exactly the same set as
    /// `selectors`: indexes do not match slices and slices must be
    /// identical.
    fn has_exact_selectors(&self, selectors: &[Selector]) -> bool {
        self.selectors.len() == selectors.len()
            && selectors
                .iter()
                .all(|sel| selectors_contain_exact(&self.selectors, sel))
    }

    /// True if this segment's descendants form a single chain with the same
    /// length, descendant flags, and selectors as `path_segments`,
    /// terminating at a leaf.
    pub(crate) fn is_branch(&self, path_segments: &[PathSegment]) -> bool {
        let mut cur = self;
        for path_seg in path_segments {
            let [child] = cur.children.as_slice() else {
                return false;
            };
            cur = child;
            if cur.descendant != path_seg.is_descendant() {
                return false;
            }
            if cur.selectors.len() != path_seg.selectors().len()
                || !cur.has_selectors(path_seg.selectors())
            {
                return false;
            }
        }
        cur.children.is_empty()
    }

    /// Merges `selectors` into this segment, skipping any that are already
    /// loosely contained. Merging a wildcard collapses the segment to a
    /// lone wildcard.
    pub(crate) fn merge_selectors(&mut self, selectors: &[Selector]) {
        for sel in selectors {
            if matches!(sel, Selector::Wildcard) {
                if !self.is_wildcard() {
                    self.selectors = vec![Selector::Wildcard];
                }
                continue;
            }
            if !self.has_selector(sel) {
                self.selectors.push(sel.clone());
            }
        }
    }

    /// Eliminates slice selectors that are subsets of another slice in this
    /// segment, iterating until no replacement occurs.
    fn merge_slices(&mut self) {
        let mut moved = true;
        while moved {
            moved = false;
            let orig = std::mem::take(&mut self.selectors);
            let mut merged: Vec<Selector> = Vec::with_capacity(orig.len());

            'sel: for sel in orig {
                if let Selector::Slice(sub) = &sel {
                    for kept in merged.iter_mut() {
                        if let Selector::Slice(sup) = kept {
                            if slice_in_slice(sub, sup) {
                                continue 'sel;
                            }
                            if slice_in_slice(sup, sub) {
                                *kept = sel.clone();
                                moved = true;
                                continue 'sel;
                            }
                        }
                    }
                }
                merged.push(sel);
            }

            self.selectors = merged;
        }
    }

    /// Removes from `other` every selector this segment loosely contains.
    /// Returns true if `other` is left with no selectors.
    fn remove_common_selectors_from(&self, other: &mut Segment) -> bool {
        other.selectors.retain(|sel| !self.has_selector(sel));
        other.selectors.is_empty()
    }

    /// True if this segment and `other` have structurally identical
    /// branches: matching children with exactly the same selectors,
    /// recursively, in any order.
    fn same_branches(&self, other: &Segment) -> bool {
        self.children.len() == other.children.len()
            && self.children.iter().all(|c1| {
                other
                    .children
                    .iter()
                    .any(|c2| c1.has_exact_selectors(&c2.selectors) && c1.same_branches(c2))
            })
    }

    /// True if this segment is a lone wildcard.
    pub(crate) fn is_wildcard(&self) -> bool {
        matches!(self.selectors.as_slice(), [Selector::Wildcard])
    }

    /// Recursively deduplicates this segment's children.
    ///
    /// Children with identical branches are reconciled: equal descendant
    /// flags merge outright, and a descendant sibling absorbs the selectors
    /// it already covers from a non-descendant one, dropping the segment
    /// that ends up empty. Finishes by merging this segment's own slices.
    pub(crate) fn deduplicate(&mut self) {
        let children = std::mem::take(&mut self.children);
        let mut merged: Vec<Segment> = Vec::with_capacity(children.len());

        'child: for mut child in children {
            child.deduplicate();

            for i in 0..merged.len() {
                if !merged[i].same_branches(&child) {
                    continue;
                }
                if merged[i].descendant == child.descendant {
                    let selectors = std::mem::take(&mut child.selectors);
                    merged[i].merge_selectors(&selectors);
                    continue 'child;
                }
                if child.descendant {
                    if child.remove_common_selectors_from(&mut merged[i]) {
                        merged[i] = child;
                        continue 'child;
                    }
                } else if merged[i].remove_common_selectors_from(&mut child) {
                    continue 'child;
                }
            }

            merged.push(child);
        }

        self.children = merged;
        self.merge_slices();
    }

    /// Writes this segment's selector list, prefixed with `..` for
    /// descendant segments.
    fn write_selectors(&self, buf: &mut String) {
        if self.descendant {
            buf.push_str("..");
        }
        buf.push('[');
        for (i, sel) in self.selectors.iter().enumerate() {
            if i > 0 {
                buf.push(',');
            }
            buf.push_str(&sel.to_string());
        }
        buf.push_str("]\n");
    }

    /// Writes this segment and its children as one branch of a tree
    /// diagram.
    pub(crate) fn write_to(&self, buf: &mut String, prefix: &str, last: bool) {
        buf.push_str(prefix);
        buf.push_str(if last { ELBOW } else { TEE });
        self.write_selectors(buf);

        let last_index = self.children.len().saturating_sub(1);
        let child_prefix = format!("{prefix}{}", if last { BLANK } else { PIPE });
        for (i, child) in self.children.iter().enumerate() {
            child.write_to(buf, &child_prefix, i == last_index);
        }
    }
}
