//! Tests for compiling batches of paths into a tree query.
//!
//! Tree shapes are asserted through the display form, which renders the
//! compiled tree as a diagram rooted at `$`.

use jsontree::{FilterSelector, Path, Selector, Tree};

fn name(n: &str) -> Selector {
    Selector::name(n)
}

fn index(i: i64) -> Selector {
    Selector::index(i)
}

fn filter(expr: &str) -> Selector {
    Selector::filter(FilterSelector::new(expr, |_, _| true))
}

fn compiled(paths: &[Path]) -> String {
    Tree::compile(paths).to_string()
}

#[test]
fn root_only() {
    assert_eq!(compiled(&[Path::root()]), "$\n");
    assert_eq!(compiled(&[Path::root(), Path::root()]), "$\n");
    assert_eq!(compiled(&[]), "$\n");
}

#[test]
fn single_paths() {
    for (test, paths, exp) in [
        (
            "one_name",
            vec![Path::root().child(vec![name("a")])],
            "$\n└── [\"a\"]\n",
        ),
        (
            "two_names",
            vec![Path::root().child(vec![name("a")]).child(vec![name("b")])],
            "$\n└── [\"a\"]\n    └── [\"b\"]\n",
        ),
        (
            "two_names_index",
            vec![Path::root()
                .child(vec![name("a")])
                .child(vec![name("b")])
                .child(vec![index(1)])],
            "$\n└── [\"a\"]\n    └── [\"b\"]\n        └── [1]\n",
        ),
        (
            "two_names_descendant",
            vec![Path::root().child(vec![name("a")]).descendant(vec![name("b")])],
            "$\n└── [\"a\"]\n    └── ..[\"b\"]\n",
        ),
    ] {
        assert_eq!(compiled(&paths), exp, "{test}");
    }
}

#[test]
fn merges_shared_structure() {
    for (test, paths, exp) in [
        (
            "two_single_key_paths",
            vec![
                Path::root().child(vec![name("a")]),
                Path::root().child(vec![name("b")]),
            ],
            "$\n└── [\"a\",\"b\"]\n",
        ),
        (
            "two_identical_paths",
            vec![
                Path::root().child(vec![name("a")]).child(vec![name("b")]),
                Path::root().child(vec![name("a")]).child(vec![name("b")]),
            ],
            "$\n└── [\"a\"]\n    └── [\"b\"]\n",
        ),
        (
            "diff_parents_same_child",
            vec![
                Path::root().child(vec![name("a")]).child(vec![name("x")]),
                Path::root().child(vec![name("b")]).child(vec![name("x")]),
            ],
            "$\n└── [\"a\",\"b\"]\n    └── [\"x\"]\n",
        ),
        (
            "same_parent_different_child",
            vec![
                Path::root().child(vec![name("a")]).child(vec![name("x")]),
                Path::root().child(vec![name("a")]).child(vec![name("y")]),
            ],
            "$\n└── [\"a\"]\n    └── [\"x\",\"y\"]\n",
        ),
        (
            "deeply_nested_same_from_diff_parent",
            vec![
                Path::root()
                    .child(vec![name("a")])
                    .child(vec![name("b")])
                    .child(vec![name("c")])
                    .child(vec![name("d")]),
                Path::root()
                    .child(vec![name("a")])
                    .child(vec![name("x")])
                    .child(vec![name("c")])
                    .child(vec![name("d")]),
            ],
            "$\n└── [\"a\"]\n    └── [\"b\",\"x\"]\n        └── [\"c\"]\n            └── [\"d\"]\n",
        ),
    ] {
        assert_eq!(compiled(&paths), exp, "{test}");
    }
}

#[test]
fn does_not_merge_uneven_branches() {
    let paths = vec![
        Path::root()
            .child(vec![name("a")])
            .child(vec![name("b")])
            .child(vec![name("c")])
            .child(vec![name("d")]),
        Path::root()
            .child(vec![name("a")])
            .child(vec![name("x")])
            .child(vec![name("c")])
            .child(vec![name("d")])
            .child(vec![name("e")]),
    ];
    let exp = "\
$
└── [\"a\"]
    ├── [\"b\"]
    │   └── [\"c\"]
    │       └── [\"d\"]
    └── [\"x\"]
        └── [\"c\"]
            └── [\"d\"]
                └── [\"e\"]
";
    assert_eq!(compiled(&paths), exp);
}

#[test]
fn splits_at_divergence() {
    let paths = vec![
        Path::root()
            .child(vec![name("a")])
            .child(vec![name("b")])
            .child(vec![name("c")])
            .child(vec![name("d")])
            .child(vec![name("f")]),
        Path::root()
            .child(vec![name("a")])
            .child(vec![name("b")])
            .child(vec![name("c")])
            .child(vec![name("e")])
            .child(vec![name("g")]),
    ];
    let exp = "\
$
└── [\"a\"]
    └── [\"b\"]
        └── [\"c\"]
            ├── [\"d\"]
            │   └── [\"f\"]
            └── [\"e\"]
                └── [\"g\"]
";
    assert_eq!(compiled(&paths), exp);
}

#[test]
fn merges_complementary_sibling_names() {
    // $.a.x.b, $.a.y.c, $.a.x.c, $.a.y.b collapse into one lattice.
    let paths = vec![
        Path::root().child(vec![name("a")]).child(vec![name("x")]).child(vec![name("b")]),
        Path::root().child(vec![name("a")]).child(vec![name("y")]).child(vec![name("c")]),
        Path::root().child(vec![name("a")]).child(vec![name("x")]).child(vec![name("c")]),
        Path::root().child(vec![name("a")]).child(vec![name("y")]).child(vec![name("b")]),
    ];
    let exp = "\
$
└── [\"a\"]
    └── [\"x\",\"y\"]
        └── [\"b\",\"c\"]
";
    assert_eq!(compiled(&paths), exp);
}

#[test]
fn merges_complementary_descendant_siblings() {
    let paths = vec![
        Path::root().child(vec![name("a")]).descendant(vec![name("x")]).child(vec![name("b")]),
        Path::root().child(vec![name("a")]).descendant(vec![name("y")]).child(vec![name("c")]),
        Path::root().child(vec![name("a")]).descendant(vec![name("x")]).child(vec![name("c")]),
        Path::root().child(vec![name("a")]).descendant(vec![name("y")]).child(vec![name("b")]),
    ];
    let exp = "\
$
└── [\"a\"]
    └── ..[\"x\",\"y\"]
        └── [\"b\",\"c\"]
";
    assert_eq!(compiled(&paths), exp);
}

#[test]
fn descendant_absorbs_child_siblings() {
    // Child segments whose branches a descendant sibling already covers are
    // absorbed into it.
    let paths = vec![
        Path::root().child(vec![name("a")]).child(vec![name("x")]).child(vec![name("b")]),
        Path::root().child(vec![name("a")]).child(vec![name("y")]).child(vec![name("b")]),
        Path::root().child(vec![name("a")]).descendant(vec![name("x")]).child(vec![name("b")]),
        Path::root().child(vec![name("a")]).descendant(vec![name("y")]).child(vec![name("b")]),
    ];
    let exp = "\
$
└── [\"a\"]
    └── ..[\"x\",\"y\"]
        └── [\"b\"]
";
    assert_eq!(compiled(&paths), exp);
}

#[test]
fn keeps_partial_descendant_overlap_separate() {
    let paths = vec![
        Path::root().child(vec![name("a")]).descendant(vec![name("x")]).child(vec![name("b")]),
        Path::root().child(vec![name("a")]).descendant(vec![name("y")]).child(vec![name("c")]),
        Path::root().child(vec![name("a")]).descendant(vec![name("x")]).child(vec![name("c")]),
        Path::root().child(vec![name("a")]).child(vec![name("y")]).child(vec![name("b")]),
    ];
    let exp = "\
$
└── [\"a\"]
    ├── ..[\"x\"]
    │   └── [\"b\",\"c\"]
    ├── ..[\"y\"]
    │   └── [\"c\"]
    └── [\"y\"]
        └── [\"b\"]
";
    assert_eq!(compiled(&paths), exp);
}

#[test]
fn keeps_top_level_descendant_separate() {
    let paths = vec![
        Path::root().descendant(vec![name("a")]).child(vec![name("y")]).child(vec![name("c")]),
        Path::root().child(vec![name("a")]).child(vec![name("y")]).child(vec![name("b")]),
    ];
    let exp = "\
$
├── ..[\"a\"]
│   └── [\"y\"]
│       └── [\"c\"]
└── [\"a\"]
    └── [\"y\"]
        └── [\"b\"]
";
    assert_eq!(compiled(&paths), exp);
}

#[test]
fn descendant_dominates_identical_child() {
    // $.a..b and $.a.b reduce to the descendant segment alone.
    let paths = vec![
        Path::root().child(vec![name("a")]).descendant(vec![name("b")]),
        Path::root().child(vec![name("a")]).child(vec![name("b")]),
    ];
    assert_eq!(compiled(&paths), "$\n└── [\"a\"]\n    └── ..[\"b\"]\n");

    let paths = vec![
        Path::root().child(vec![name("a")]).descendant(vec![name("b")]).child(vec![name("c")]),
        Path::root().child(vec![name("a")]).child(vec![name("b")]).child(vec![name("c")]),
    ];
    assert_eq!(
        compiled(&paths),
        "$\n└── [\"a\"]\n    └── ..[\"b\"]\n        └── [\"c\"]\n"
    );
}

#[test]
fn merges_branch_into_existing_tree() {
    let paths = vec![
        Path::root().child(vec![name("a")]).child(vec![name("b")]).child(vec![name("c")]),
        Path::root().child(vec![name("d")]),
        Path::root().child(vec![name("a")]).descendant(vec![name("x")]).child(vec![name("c")]),
    ];
    let exp = "\
$
├── [\"a\"]
│   ├── [\"b\"]
│   │   └── [\"c\"]
│   └── ..[\"x\"]
│       └── [\"c\"]
└── [\"d\"]
";
    assert_eq!(compiled(&paths), exp);

    let paths = vec![
        Path::root().child(vec![name("a")]).child(vec![name("b")]).child(vec![name("c")]),
        Path::root().child(vec![name("d")]),
        Path::root().child(vec![name("a")]).child(vec![name("x")]).child(vec![name("c")]),
    ];
    let exp = "\
$
├── [\"a\"]
│   └── [\"b\",\"x\"]
│       └── [\"c\"]
└── [\"d\"]
";
    assert_eq!(compiled(&paths), exp);
}

#[test]
fn wildcard_reduces_to_identity() {
    for (test, paths) in [
        (
            "trailing_dot_wildcards",
            vec![
                Path::root().child(vec![Selector::wildcard()]),
                Path::root().child(vec![Selector::wildcard()]),
            ],
        ),
        (
            "wildcard_union_trumps_all",
            vec![
                Path::root().child(vec![name("x"), index(4), Selector::wildcard()]),
                Path::root().child(vec![Selector::wildcard(), index(1)]),
            ],
        ),
        (
            "wildcard_union_trumps_all_inverse",
            vec![
                Path::root().child(vec![index(1), Selector::wildcard()]),
                Path::root().child(vec![name("x"), index(4), Selector::wildcard()]),
            ],
        ),
        (
            "descendant_trailing_wildcard",
            vec![
                Path::root().child(vec![Selector::wildcard()]),
                Path::root().descendant(vec![Selector::wildcard()]),
            ],
        ),
    ] {
        assert_eq!(compiled(&paths), "$\n", "{test}");
    }
}

#[test]
fn drops_trailing_wildcard_segment() {
    let paths = vec![
        Path::root().child(vec![name("a")]).child(vec![Selector::wildcard()]),
        Path::root().child(vec![name("b")]).child(vec![Selector::wildcard()]),
    ];
    assert_eq!(compiled(&paths), "$\n└── [\"a\",\"b\"]\n");
}

#[test]
fn interior_wildcards_merge() {
    for (test, paths, exp) in [
        (
            "wildcard_then_same_child",
            vec![
                Path::root()
                    .child(vec![index(1), Selector::wildcard()])
                    .child(vec![name("a")]),
                Path::root()
                    .child(vec![name("x"), index(4), Selector::wildcard()])
                    .child(vec![name("a")]),
            ],
            "$\n└── [*]\n    └── [\"a\"]\n",
        ),
        (
            "wildcard_then_diff_children",
            vec![
                Path::root()
                    .child(vec![index(1), Selector::wildcard()])
                    .child(vec![name("a")]),
                Path::root()
                    .child(vec![name("x"), index(4), Selector::wildcard()])
                    .child(vec![name("b")]),
            ],
            "$\n└── [*]\n    └── [\"a\",\"b\"]\n",
        ),
        (
            "wildcard_then_diff_then_same",
            vec![
                Path::root()
                    .child(vec![Selector::wildcard()])
                    .child(vec![name("a")])
                    .child(vec![name("c")]),
                Path::root()
                    .child(vec![Selector::wildcard()])
                    .child(vec![name("b")])
                    .child(vec![name("c")]),
            ],
            "$\n└── [*]\n    └── [\"a\",\"b\"]\n        └── [\"c\"]\n",
        ),
        (
            "wildcard_then_divergent_paths",
            vec![
                Path::root()
                    .child(vec![Selector::wildcard()])
                    .child(vec![name("a")])
                    .child(vec![name("b")]),
                Path::root()
                    .child(vec![Selector::wildcard()])
                    .child(vec![name("x")])
                    .child(vec![name("y")]),
            ],
            "$\n└── [*]\n    ├── [\"a\"]\n    │   └── [\"b\"]\n    └── [\"x\"]\n        └── [\"y\"]\n",
        ),
    ] {
        assert_eq!(compiled(&paths), exp, "{test}");
    }
}

#[test]
fn descendant_wildcard_upgrades_child_wildcard() {
    let paths = vec![
        Path::root().child(vec![Selector::wildcard()]).child(vec![name("a")]),
        Path::root().descendant(vec![Selector::wildcard()]).child(vec![name("a")]),
    ];
    assert_eq!(compiled(&paths), "$\n└── ..[*]\n    └── [\"a\"]\n");

    // Different children stay separate.
    let paths = vec![
        Path::root().child(vec![Selector::wildcard()]).child(vec![name("a")]),
        Path::root().descendant(vec![Selector::wildcard()]).child(vec![name("b")]),
    ];
    assert_eq!(
        compiled(&paths),
        "$\n├── [*]\n│   └── [\"a\"]\n└── ..[*]\n    └── [\"b\"]\n"
    );
}

#[test]
fn merges_selectors_within_a_segment() {
    for (test, paths, exp) in [
        (
            "duplicate_indexes",
            vec![Path::root().child(vec![index(1), index(2), index(1), index(2), index(3)])],
            "$\n└── [1,2,3]\n",
        ),
        (
            "duplicate_names",
            vec![Path::root().child(vec![
                name("x"),
                name("y"),
                name("x"),
                name("r"),
                name("y"),
            ])],
            "$\n└── [\"x\",\"y\",\"r\"]\n",
        ),
        (
            "slice_absorbs_indexes",
            vec![Path::root().child(vec![
                name("x"),
                index(1),
                name("x"),
                index(1),
                index(2),
                Selector::slice(2, None, None),
            ])],
            "$\n└── [2:,\"x\",1]\n",
        ),
        (
            "index_absorbed_into_slice",
            vec![Path::root().child(vec![
                index(1),
                index(2),
                index(3),
                Selector::slice(0, 4, None),
            ])],
            "$\n└── [:4]\n",
        ),
        (
            "merge_across_paths",
            vec![
                Path::root().child(vec![
                    name("x"),
                    index(1),
                    name("x"),
                    index(1),
                    index(2),
                    Selector::slice(2, None, None),
                ]),
                Path::root().child(vec![name("x"), index(2), name("y")]),
            ],
            "$\n└── [2:,\"x\",1,\"y\"]\n",
        ),
    ] {
        assert_eq!(compiled(&paths), exp, "{test}");
    }
}

#[test]
fn prefix_path_truncates_branch() {
    // A path that stops at c makes the deeper selections below c redundant.
    for (test, paths) in [
        (
            "prefix_first",
            vec![
                Path::root().child(vec![name("a")]).child(vec![name("b")]).child(vec![name("c")]),
                Path::root()
                    .child(vec![name("a")])
                    .child(vec![name("b")])
                    .child(vec![name("c")])
                    .child(vec![name("d")])
                    .child(vec![name("e")]),
            ],
        ),
        (
            "prefix_last",
            vec![
                Path::root()
                    .child(vec![name("a")])
                    .child(vec![name("b")])
                    .child(vec![name("c")])
                    .child(vec![name("d")])
                    .child(vec![name("e")]),
                Path::root().child(vec![name("a")]).child(vec![name("b")]).child(vec![name("c")]),
            ],
        ),
        (
            "trailing_wildcard_prefix",
            vec![
                Path::root()
                    .child(vec![name("a")])
                    .child(vec![name("b")])
                    .child(vec![name("c")])
                    .child(vec![Selector::wildcard()]),
                Path::root()
                    .child(vec![name("a")])
                    .child(vec![name("b")])
                    .child(vec![name("c")])
                    .child(vec![name("d")])
                    .child(vec![name("e")]),
            ],
        ),
    ] {
        assert_eq!(
            compiled(&paths),
            "$\n└── [\"a\"]\n    └── [\"b\"]\n        └── [\"c\"]\n",
            "{test}"
        );
    }
}

#[test]
fn merges_selectors_into_deep_leaf() {
    let paths = vec![
        Path::root()
            .child(vec![name("a")])
            .child(vec![name("b")])
            .child(vec![name("c")])
            .child(vec![name("d")]),
        Path::root()
            .child(vec![name("a")])
            .child(vec![name("b")])
            .child(vec![name("c")])
            .child(vec![name("e"), name("f")]),
    ];
    assert_eq!(
        compiled(&paths),
        "$\n└── [\"a\"]\n    └── [\"b\"]\n        └── [\"c\"]\n            └── [\"d\",\"e\",\"f\"]\n"
    );
}

#[test]
fn filters_deduplicate_by_expression() {
    let paths = vec![
        Path::root().child(vec![filter("@.x")]),
        Path::root().child(vec![filter("@.x")]),
    ];
    assert_eq!(compiled(&paths), "$\n└── [?@.x]\n");

    let paths = vec![
        Path::root().child(vec![filter("@.x")]),
        Path::root().child(vec![filter("@.y")]),
    ];
    assert_eq!(compiled(&paths), "$\n└── [?@.x,?@.y]\n");

    // Logically equivalent spellings stay distinct.
    let paths = vec![
        Path::root().child(vec![filter("@.x > @.y")]),
        Path::root().child(vec![filter("@.y < @.x")]),
    ];
    assert_eq!(compiled(&paths), "$\n└── [?@.x > @.y,?@.y < @.x]\n");
}

#[test]
fn filters_sort_after_names() {
    let paths = vec![Path::root().child(vec![filter("@.x"), name("a")])];
    assert_eq!(compiled(&paths), "$\n└── [\"a\",?@.x]\n");
}

#[test]
fn compilation_is_deterministic() {
    let paths = vec![
        Path::root().child(vec![name("a")]).descendant(vec![name("x")]).child(vec![name("b")]),
        Path::root().child(vec![name("a")]).child(vec![index(0), Selector::slice(1, 5, 2)]),
        Path::root().descendant(vec![Selector::wildcard()]).child(vec![name("q")]),
    ];
    assert_eq!(compiled(&paths), compiled(&paths));
}

#[test]
fn duplicate_path_changes_nothing() {
    let base = vec![
        Path::root().child(vec![name("a")]).descendant(vec![name("x")]).child(vec![name("b")]),
        Path::root().child(vec![name("c")]).child(vec![index(2)]),
    ];
    let mut extended = base.clone();
    extended.push(base[0].clone());
    assert_eq!(compiled(&base), compiled(&extended));
}

#[test]
fn fixed_mode_compiles_same_shape() {
    let paths = vec![
        Path::root().child(vec![name("a")]).child(vec![name("b")]),
        Path::root().child(vec![name("c")]),
    ];
    assert_eq!(
        Tree::compile(&paths).to_string(),
        Tree::compile_fixed(&paths).to_string()
    );
}
