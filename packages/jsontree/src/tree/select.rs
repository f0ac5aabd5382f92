//! Evaluation: projecting a tree query's selections out of a JSON value.
//!
//! Selection walks the input and the compiled tree together, copying every
//! selected location into a fresh destination value while preserving the
//! ancestor objects and arrays along each path. Many selectors may write
//! into the same destination, so object slots are merged in place and array
//! slots use a sentinel scheme to track which indexes were selected.
//!
//! In ordered mode an unselected array slot holds plain null and a selected
//! JSON null is recorded as a private marker, letting the final compression
//! pass drop the former and keep the latter. In fixed mode values stay at
//! their original indexes and gaps are reported as null.

use serde_json::{Map, Value};
use tracing::trace;

use crate::path::{Selector, SliceSelector};

use super::segment::Segment;
use super::Tree;

/// Marker key for a selected JSON null in ordered mode. The NUL bytes keep
/// it out of the space of keys real documents use.
const SELECTED_NULL_KEY: &str = "\u{0}jsontree\u{0}null";

/// A selected JSON null, distinguishable from an unselected slot.
fn selected_null() -> Value {
    let mut marker = Map::with_capacity(1);
    marker.insert(SELECTED_NULL_KEY.to_owned(), Value::Null);
    Value::Object(marker)
}

/// True if `value` is the marker produced by [`selected_null`].
fn is_selected_null(value: &Value) -> bool {
    matches!(value, Value::Object(m) if m.len() == 1 && m.contains_key(SELECTED_NULL_KEY))
}

/// The JSON type name of `value`, for diagnostics.
fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Takes the value at `dst[idx]`, leaving the unselected sentinel behind.
/// Returns `None` for slots beyond the current length.
fn take_slot(dst: &mut [Value], idx: usize) -> Option<Value> {
    if idx < dst.len() {
        Some(std::mem::replace(&mut dst[idx], Value::Null))
    } else {
        None
    }
}

impl Tree {
    /// Selects this tree's paths from `value` into a new value.
    ///
    /// A tree with no children is the identity projection and returns
    /// `value` unchanged. Otherwise objects and arrays are projected, and
    /// any other value yields null.
    pub fn select(&self, value: &Value) -> Value {
        if self.root.children.is_empty() {
            return value.clone();
        }
        trace!("selecting tree query from value");

        match value {
            Value::Object(cur) => {
                let mut dst = Map::new();
                self.select_object_segment(&self.root, value, cur, &mut dst);
                if self.fixed {
                    Value::Object(dst)
                } else {
                    Value::Object(compress_object(dst))
                }
            }
            Value::Array(cur) => {
                let mut dst = Vec::with_capacity(cur.len());
                self.select_array_segment(&self.root, value, cur, &mut dst);
                if dst.is_empty() {
                    Value::Array(Vec::new())
                } else if self.fixed {
                    Value::Array(dst)
                } else {
                    Value::Array(compress_array(dst))
                }
            }
            _ => Value::Null,
        }
    }

    /// Applies `seg`'s selectors and then each of its children's selectors
    /// to `cur`, writing selections into `dst`.
    fn select_object_segment(
        &self,
        seg: &Segment,
        root: &Value,
        cur: &Map<String, Value>,
        dst: &mut Map<String, Value>,
    ) {
        self.select_object(seg, root, cur, dst);
        for child in &seg.children {
            self.select_object(child, root, cur, dst);
        }
    }

    /// Applies `seg`'s selectors to the object `cur`. Index and slice
    /// selectors never match an object. A descendant segment additionally
    /// recurses into every container value of `cur`.
    fn select_object(
        &self,
        seg: &Segment,
        root: &Value,
        cur: &Map<String, Value>,
        dst: &mut Map<String, Value>,
    ) {
        for sel in &seg.selectors {
            match sel {
                Selector::Name(name) => self.process_key(name, seg, root, cur, dst),
                Selector::Wildcard => {
                    for key in cur.keys() {
                        self.process_key(key, seg, root, cur, dst);
                    }
                }
                Selector::Filter(filter) => {
                    for (key, val) in cur {
                        if filter.evaluate(val, root) {
                            self.process_key(key, seg, root, cur, dst);
                        }
                    }
                }
                Selector::Index(_) | Selector::Slice(_) => {}
            }
        }

        if seg.descendant {
            self.descend_object(seg, root, cur, dst);
        }
    }

    /// Selects `seg`'s paths from every container value of `cur` into the
    /// matching slot of `dst`.
    fn descend_object(
        &self,
        seg: &Segment,
        root: &Value,
        cur: &Map<String, Value>,
        dst: &mut Map<String, Value>,
    ) {
        for (key, val) in cur {
            match val {
                Value::Object(sub_cur) => {
                    let existing = dst.remove(key);
                    if let Some(sub) = self.dispatch_object(seg, root, sub_cur, existing) {
                        dst.insert(key.clone(), Value::Object(sub));
                    }
                }
                Value::Array(sub_cur) => {
                    let existing = dst.remove(key);
                    if let Some(sub) = self.dispatch_array(seg, root, sub_cur, existing) {
                        dst.insert(key.clone(), Value::Array(sub));
                    }
                }
                _ => {}
            }
        }
    }

    /// Copies `cur[key]`, if present, into `dst`. A leaf segment keeps the
    /// raw value; otherwise selection dispatches into container values so
    /// the child segments can select from them.
    fn process_key(
        &self,
        key: &str,
        seg: &Segment,
        root: &Value,
        cur: &Map<String, Value>,
        dst: &mut Map<String, Value>,
    ) {
        let Some(val) = cur.get(key) else {
            return;
        };

        if seg.children.is_empty() {
            dst.insert(key.to_owned(), val.clone());
            return;
        }

        match val {
            Value::Object(sub_cur) => {
                let existing = dst.remove(key);
                if let Some(sub) = self.dispatch_object(seg, root, sub_cur, existing) {
                    dst.insert(key.to_owned(), Value::Object(sub));
                }
            }
            Value::Array(sub_cur) => {
                let existing = dst.remove(key);
                if let Some(sub) = self.dispatch_array(seg, root, sub_cur, existing) {
                    dst.insert(key.to_owned(), Value::Array(sub));
                }
            }
            _ => {}
        }
    }

    /// Selects `seg` from the object `cur` into `dst`, which must be an
    /// object when present. Returns the destination to store, or `None`
    /// when a freshly created one ends up empty.
    fn dispatch_object(
        &self,
        seg: &Segment,
        root: &Value,
        cur: &Map<String, Value>,
        dst: Option<Value>,
    ) -> Option<Map<String, Value>> {
        match dst {
            Some(Value::Object(mut sub)) => {
                self.select_object_segment(seg, root, cur, &mut sub);
                Some(sub)
            }
            Some(Value::Null) | None => {
                let mut sub = Map::new();
                self.select_object_segment(seg, root, cur, &mut sub);
                // An empty object selected nothing and is not kept.
                if sub.is_empty() {
                    None
                } else {
                    Some(sub)
                }
            }
            Some(other) => {
                panic!("jsontree: expected destination object but got {}", json_type(&other))
            }
        }
    }

    /// Applies `seg`'s selectors and then each of its children's selectors
    /// to the array `cur`, writing selections into `dst`.
    fn select_array_segment(
        &self,
        seg: &Segment,
        root: &Value,
        cur: &[Value],
        dst: &mut Vec<Value>,
    ) {
        self.select_array(seg, root, cur, dst);
        for child in &seg.children {
            self.select_array(child, root, cur, dst);
        }
    }

    /// Applies `seg`'s selectors to the array `cur`. Name selectors never
    /// match an array. A descendant segment additionally recurses into
    /// every container element of `cur`.
    fn select_array(&self, seg: &Segment, root: &Value, cur: &[Value], dst: &mut Vec<Value>) {
        for sel in &seg.selectors {
            match sel {
                Selector::Index(index) => {
                    let idx = if *index < 0 { cur.len() as i64 + index } else { *index };
                    if idx >= 0 && (idx as usize) < cur.len() {
                        self.process_index(idx as usize, seg, root, cur, dst);
                    }
                }
                Selector::Wildcard => {
                    for i in 0..cur.len() {
                        self.process_index(i, seg, root, cur, dst);
                    }
                }
                Selector::Slice(slice) => self.process_slice(seg, slice, root, cur, dst),
                Selector::Filter(filter) => {
                    for (i, val) in cur.iter().enumerate() {
                        if filter.evaluate(val, root) {
                            self.process_index(i, seg, root, cur, dst);
                        }
                    }
                }
                Selector::Name(_) => {}
            }
        }

        if seg.descendant {
            self.descend_array(seg, root, cur, dst);
        }
    }

    /// Iterates the indexes selected by `slice` over `cur` and processes
    /// each. A zero step selects nothing.
    fn process_slice(
        &self,
        seg: &Segment,
        slice: &SliceSelector,
        root: &Value,
        cur: &[Value],
        dst: &mut Vec<Value>,
    ) {
        let len = cur.len() as i64;
        let step = slice.step();
        if step > 0 {
            let (lower, upper) = slice.bounds(len);
            let mut i = lower;
            while i < upper {
                self.process_index(i as usize, seg, root, cur, dst);
                i += step;
            }
        } else if step < 0 {
            let (lower, upper) = slice.bounds(len);
            let mut i = upper;
            while lower < i {
                self.process_index(i as usize, seg, root, cur, dst);
                i += step;
            }
        }
    }

    /// Selects `seg`'s paths from every container element of `cur` into the
    /// matching index of `dst`.
    fn descend_array(&self, seg: &Segment, root: &Value, cur: &[Value], dst: &mut Vec<Value>) {
        for (i, val) in cur.iter().enumerate() {
            match val {
                Value::Object(sub_cur) => {
                    let existing = take_slot(dst, i);
                    if let Some(sub) = self.dispatch_object(seg, root, sub_cur, existing) {
                        self.insert(i, dst, Value::Object(sub));
                    }
                }
                Value::Array(sub_cur) => {
                    let existing = take_slot(dst, i);
                    if let Some(sub) = self.dispatch_array(seg, root, sub_cur, existing) {
                        self.insert(i, dst, Value::Array(sub));
                    }
                }
                _ => {}
            }
        }
    }

    /// Copies `cur[idx]` into `dst[idx]`. A leaf segment keeps the raw
    /// value; otherwise selection dispatches into container values. If the
    /// call grew `dst` and nothing was selected, the growth is undone so
    /// absence leaves no trailing sentinels.
    fn process_index(
        &self,
        idx: usize,
        seg: &Segment,
        root: &Value,
        cur: &[Value],
        dst: &mut Vec<Value>,
    ) {
        let prev_len = if idx >= dst.len() {
            let len = dst.len();
            dst.resize(idx + 1, Value::Null);
            Some(len)
        } else {
            None
        };

        if seg.children.is_empty() {
            self.insert(idx, dst, cur[idx].clone());
            return;
        }

        match &cur[idx] {
            Value::Object(sub_cur) => {
                let existing = take_slot(dst, idx);
                if let Some(sub) = self.dispatch_object(seg, root, sub_cur, existing) {
                    self.insert(idx, dst, Value::Object(sub));
                    return;
                }
            }
            Value::Array(sub_cur) => {
                let existing = take_slot(dst, idx);
                if let Some(sub) = self.dispatch_array(seg, root, sub_cur, existing) {
                    self.insert(idx, dst, Value::Array(sub));
                    return;
                }
            }
            _ => {}
        }

        if let Some(len) = prev_len {
            dst.truncate(len);
        }
    }

    /// Selects `seg` from the array `cur` into `dst`, which must be an
    /// array when present. Returns the destination to store, or `None` when
    /// nothing was selected.
    fn dispatch_array(
        &self,
        seg: &Segment,
        root: &Value,
        cur: &[Value],
        dst: Option<Value>,
    ) -> Option<Vec<Value>> {
        let mut sub = match dst {
            Some(Value::Array(sub)) => sub,
            Some(Value::Null) | None => Vec::with_capacity(cur.len()),
            Some(other) => {
                panic!("jsontree: expected destination array but got {}", json_type(&other))
            }
        };

        self.select_array_segment(seg, root, cur, &mut sub);
        if sub.is_empty() {
            None
        } else {
            Some(sub)
        }
    }

    /// Writes `val` at `dst[idx]`. In ordered mode a selected null becomes
    /// the marker value so compression keeps it.
    fn insert(&self, idx: usize, dst: &mut Vec<Value>, val: Value) {
        if idx >= dst.len() {
            dst.resize(idx + 1, Value::Null);
        }
        dst[idx] = if !self.fixed && val.is_null() {
            selected_null()
        } else {
            val
        };
    }
}

/// Recursively removes unselected indexes from `array` and every array
/// beneath it, converting selected null markers back to plain null.
fn compress_array(array: Vec<Value>) -> Vec<Value> {
    let mut ret = Vec::with_capacity(array.len());
    for val in array {
        if is_selected_null(&val) {
            ret.push(Value::Null);
            continue;
        }
        match val {
            Value::Null => {}
            Value::Array(sub) => ret.push(Value::Array(compress_array(sub))),
            Value::Object(sub) => ret.push(Value::Object(compress_object(sub))),
            other => ret.push(other),
        }
    }
    ret
}

/// Recursively removes unselected indexes from every array under `object`.
fn compress_object(object: Map<String, Value>) -> Map<String, Value> {
    object
        .into_iter()
        .map(|(key, val)| {
            let val = match val {
                Value::Array(sub) => Value::Array(compress_array(sub)),
                Value::Object(sub) => Value::Object(compress_object(sub)),
                other => other,
            };
            (key, val)
        })
        .collect()
}
