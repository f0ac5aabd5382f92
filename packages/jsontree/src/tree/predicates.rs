//! Containment queries over selector lists.
//!
//! Segment merging relies on two notions of containment. Loose containment
//! asks whether a selector is dominated by some member of a list: a wildcard
//! dominates everything, a slice can absorb an index it provably selects,
//! and one slice can absorb another it is a superset of. Exact containment
//! is used for branch equivalence and only matches identical selectors.

use crate::path::{FilterSelector, Selector, SliceSelector};

/// Loose containment: true if `sel` is dominated by some member of
/// `selectors`.
pub(crate) fn selectors_contain(selectors: &[Selector], sel: &Selector) -> bool {
    if let [Selector::Wildcard] = selectors {
        // A wildcard selector is always the only selector and dominates
        // every other kind.
        return true;
    }

    match sel {
        Selector::Wildcard => false,
        Selector::Name(name) => contains_name(selectors, name),
        Selector::Index(index) => contains_index(selectors, *index),
        Selector::Slice(slice) => contains_slice(selectors, slice),
        Selector::Filter(filter) => contains_filter(selectors, filter),
    }
}

/// Exact containment: indexes match only indexes, slices only identical
/// slices, wildcard only a lone wildcard, and filters by expression.
pub(crate) fn selectors_contain_exact(selectors: &[Selector], sel: &Selector) -> bool {
    match sel {
        Selector::Wildcard => matches!(selectors, [Selector::Wildcard]),
        Selector::Name(name) => contains_name(selectors, name),
        Selector::Index(index) => selectors
            .iter()
            .any(|s| matches!(s, Selector::Index(i) if i == index)),
        Selector::Slice(slice) => selectors
            .iter()
            .any(|s| matches!(s, Selector::Slice(sl) if sl == slice)),
        Selector::Filter(filter) => contains_filter(selectors, filter),
    }
}

/// True if `selectors` contains the name selector `name`.
fn contains_name(selectors: &[Selector], name: &str) -> bool {
    selectors
        .iter()
        .any(|s| matches!(s, Selector::Name(n) if n == name))
}

/// True if `selectors` contains `index`, either as an identical index
/// selector or within a slice whose membership can be decided without
/// knowing the input length.
fn contains_index(selectors: &[Selector], index: i64) -> bool {
    for s in selectors {
        match s {
            Selector::Index(i) if *i == index => return true,
            Selector::Slice(slice) if slice_contains_index(slice, index) => return true,
            _ => {}
        }
    }
    false
}

/// True if `slice` provably selects `index`.
///
/// A slice with a negative start, or a backward slice with a step other
/// than -1, selects positions that depend on the input length, so it never
/// absorbs an index.
fn slice_contains_index(slice: &SliceSelector, index: i64) -> bool {
    if slice.start() < 0 || (slice.end() < slice.start() && slice.step() != -1) {
        return false;
    }

    // Size a virtual input just big enough to cover the index and the slice
    // bounds, then test membership against the resulting iteration range.
    let mut size = index
        .saturating_abs()
        .max(slice.start())
        .max(slice.end());
    if size != i64::MAX {
        size += 1;
    }
    let (lower, upper) = slice.bounds(size);

    let sel = if index < 0 { upper + index } else { index };
    let step = slice.step();
    match step {
        step if step > 0 => sel >= lower && sel < upper && (sel - lower) % step == 0,
        // Any other negative step depends on the input length.
        -1 => sel <= upper && sel > lower,
        _ => false,
    }
}

/// True if `selectors` contains `slice`: a slice in the list is a superset
/// of it, or an index in the list equals its single selected element. A
/// slice that selects nothing is vacuously contained.
fn contains_slice(selectors: &[Selector], slice: &SliceSelector) -> bool {
    if slice.selects_nothing() {
        return true;
    }

    for s in selectors {
        match s {
            Selector::Slice(sup) if slice_in_slice(slice, sup) => return true,
            Selector::Index(index) => {
                if (slice.start() == *index
                    && slice.end() == index.saturating_add(1)
                    && slice.step() > 0)
                    || (slice.start() == index.saturating_add(1)
                        && slice.end() == *index
                        && slice.step() < 0)
                {
                    return true;
                }
            }
            _ => {}
        }
    }
    false
}

/// True if `sub` selects a subset of the elements selected by `sup`.
///
/// Requires `sub`'s step to be a multiple of `sup`'s. Mixed-direction pairs
/// are compared by translating one direction's bounds into the other's.
pub(crate) fn slice_in_slice(sub: &SliceSelector, sup: &SliceSelector) -> bool {
    if sup.step() == 0 || sub.step() % sup.step() != 0 {
        return false;
    }

    let (sub_step, sup_step) = (sub.step(), sup.step());
    if sub_step > 0 && sup_step > 0 {
        sub.start() >= sup.start() && sub.end() <= sup.end()
    } else if sub_step < 0 && sup_step < 0 {
        sub.start() <= sup.start() && sub.end() >= sup.end()
    } else if sub_step <= 1 && sup_step > 0 {
        // Backward sub against forward sup.
        sub.start() < sup.end() && sub.end() >= sup.start().saturating_sub(1)
    } else if sub_step > 0 && sup_step < 0 {
        // Forward sub against backward sup.
        sub.start() > sup.end() && sub.end().saturating_sub(1) <= sup.start()
    } else {
        false
    }
}

/// True if `selectors` contains a filter with the same canonical expression.
fn contains_filter(selectors: &[Selector], filter: &FilterSelector) -> bool {
    selectors
        .iter()
        .any(|s| matches!(s, Selector::Filter(f) if f.expression() == filter.expression()))
}
