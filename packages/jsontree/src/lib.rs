//! # jsontree
//!
//! Compiles multiple RFC 9535 JSONPath queries into a single *tree query*
//! and selects all of their paths from a JSON value at once, producing a
//! structure-preserving projection: a new value containing exactly the
//! selected locations with every ancestor object and array retained.
//!
//! Paths that share a prefix share a branch in the compiled tree, duplicate
//! selectors are dropped, and selectors subsumed by a wider one (an index
//! covered by a slice, anything covered by a wildcard) are absorbed, so the
//! input is walked once no matter how many queries were merged.
//!
//! Array projections come in two modes. [`Tree::compile`] builds an ordered
//! mode tree, which keeps selected array items contiguous in their original
//! order. [`Tree::compile_fixed`] builds a fixed mode tree, which keeps
//! selected items at their original indexes and fills the gaps with null.
//!
//! This crate does not parse JSONPath text; it consumes parsed [`Path`]
//! values built from [`PathSegment`]s and [`Selector`]s, and delegates
//! filter predicates to the caller through [`FilterSelector`].
//!
//! ## Example
//!
//! Select every field named `"last"` under `"profile"`, and the `"primary"`
//! field of every object under `"contacts"`:
//!
//! ```
//! use jsontree::{Path, Selector, Tree};
//! use serde_json::json;
//!
//! let profile = json!({
//!     "meta": {
//!         "id": "0c2d9747-c323-4f68-96d0-6c187a1826dc"
//!     },
//!     "profile": {
//!         "name": {
//!             "first": "Barrack",
//!             "last": "Obama"
//!         },
//!         "contacts": {
//!             "email": {
//!                 "primary": "foo@example.com",
//!                 "secondary": "2nd@example.net"
//!             },
//!             "phones": {
//!                 "primary": "+1-234-567-8901",
//!                 "fax": "+1-293-847-5829"
//!             }
//!         }
//!     }
//! });
//!
//! // $.profile..last and $.profile..contacts.primary
//! let tree = Tree::compile(&[
//!     Path::root()
//!         .child(vec![Selector::name("profile")])
//!         .descendant(vec![Selector::name("last")]),
//!     Path::root()
//!         .child(vec![Selector::name("profile")])
//!         .descendant(vec![Selector::name("contacts")])
//!         .child(vec![Selector::name("primary")]),
//! ]);
//!
//! assert_eq!(
//!     tree.select(&profile),
//!     json!({
//!         "profile": {
//!             "name": {
//!                 "last": "Obama"
//!             },
//!             "contacts": {
//!                 "email": {
//!                     "primary": "foo@example.com"
//!                 },
//!                 "phones": {
//!                     "primary": "+1-234-567-8901"
//!                 }
//!             }
//!         }
//!     }),
//! );
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod path;
pub mod tree;

pub use path::{FilterPredicate, FilterSelector, Path, PathSegment, Selector, SliceSelector};
pub use tree::Tree;
