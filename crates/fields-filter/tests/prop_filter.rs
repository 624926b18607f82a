/// Property-based tests for the fields filter.
///
/// Uses the `proptest` crate to generate random field paths and JSON values
/// over a small shared alphabet of names, so generated filters and data
/// actually overlap. Properties checked:
///
/// - Path order in a spec never changes the resulting tree or its output
/// - Include and exclude filters built from the same paths answer
///   `is_included` as negations of each other, except on shared prefixes
/// - `apply` keeps array lengths and matches `apply_owned`
/// - `to_spec` output parses back to the same tree
/// - The empty spec is the identity
/// - Arbitrary input never panics the parser
use fields_filter::{parse_fields_filter, FieldsFilter};
use proptest::prelude::*;
use serde_json::{Map, Value};

// ============================================================================
// Strategies
// ============================================================================

const NAMES: &[&str] = &["a", "b", "c", "d", "e"];

fn arb_name() -> impl Strategy<Value = String> {
    prop::sample::select(NAMES).prop_map(str::to_string)
}

/// A field path of one to four segments.
fn arb_path() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_name(), 1..=4)
}

fn arb_paths() -> impl Strategy<Value = Vec<Vec<String>>> {
    prop::collection::vec(arb_path(), 1..=6)
}

/// JSON values whose object keys come from the same alphabet as the paths.
fn arb_value() -> impl Strategy<Value = Value> {
    let leaf = prop_oneof![
        Just(Value::Null),
        any::<bool>().prop_map(Value::Bool),
        (-1000i64..1000).prop_map(Value::from),
        "[a-z]{0,8}".prop_map(Value::String),
    ];
    leaf.prop_recursive(4, 48, 5, |inner| {
        prop_oneof![
            prop::collection::vec(inner.clone(), 0..4).prop_map(Value::Array),
            prop::collection::vec((arb_name(), inner), 0..5)
                .prop_map(|pairs| Value::Object(pairs.into_iter().collect::<Map<_, _>>())),
        ]
    })
}

// ============================================================================
// Helpers
// ============================================================================

fn spec_from(paths: &[Vec<String>], exclude: bool) -> String {
    let items: Vec<String> = paths.iter().map(|p| p.join("~")).collect();
    format!("{}({})", if exclude { "!" } else { "" }, items.join(","))
}

fn is_strict_prefix(prefix: &[String], path: &[String]) -> bool {
    prefix.len() < path.len() && path.starts_with(prefix)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(300))]

    /// Writing the same paths in a different order yields an equal tree
    /// with identical output.
    #[test]
    fn merge_is_order_independent(
        (paths, shuffled) in arb_paths().prop_flat_map(|p| (Just(p.clone()), Just(p).prop_shuffle())),
        exclude in any::<bool>(),
        data in arb_value(),
    ) {
        let a = parse_fields_filter(&spec_from(&paths, exclude)).unwrap();
        let b = parse_fields_filter(&spec_from(&shuffled, exclude)).unwrap();
        prop_assert_eq!(&a, &b);
        prop_assert_eq!(a.apply(&data), b.apply(&data));
    }

    /// Include and exclude trees from the same paths are negations, except
    /// on strict prefixes of a written path where both are branches.
    #[test]
    fn include_exclude_symmetry(paths in arb_paths(), query in arb_path()) {
        let include = parse_fields_filter(&spec_from(&paths, false)).unwrap();
        let exclude = parse_fields_filter(&spec_from(&paths, true)).unwrap();
        let dotted = query.join(".");
        let inc = include.is_included(Some(dotted.as_str()));
        let exc = exclude.is_included(Some(dotted.as_str()));

        if paths.iter().any(|p| is_strict_prefix(&query, p)) {
            prop_assert!(inc && exc, "{} on {:?}", dotted, paths);
        } else {
            prop_assert_eq!(inc, !exc, "{} on {:?}", dotted, paths);
        }
    }

    /// Arrays keep their length and element order under any filter.
    #[test]
    fn apply_preserves_array_length(
        paths in arb_paths(),
        exclude in any::<bool>(),
        items in prop::collection::vec(arb_value(), 0..6),
    ) {
        let filter = parse_fields_filter(&spec_from(&paths, exclude)).unwrap();
        let filtered = filter.apply(&Value::Array(items.clone()));
        let filtered = filtered.as_array().unwrap();
        prop_assert_eq!(filtered.len(), items.len());
        for (item, out) in items.iter().zip(filtered) {
            prop_assert_eq!(&filter.apply(item), out);
        }
    }

    /// The consuming variant agrees with the borrowing one.
    #[test]
    fn apply_owned_matches_apply(paths in arb_paths(), exclude in any::<bool>(), data in arb_value()) {
        let filter = parse_fields_filter(&spec_from(&paths, exclude)).unwrap();
        prop_assert_eq!(filter.apply_owned(data.clone()), filter.apply(&data));
    }

    /// An include filter never introduces keys, and only keeps named ones
    /// at the top level.
    #[test]
    fn include_only_keeps_named_top_level_keys(paths in arb_paths(), data in arb_value()) {
        let filter = parse_fields_filter(&spec_from(&paths, false)).unwrap();
        if let Value::Object(out) = filter.apply(&data) {
            for key in out.keys() {
                prop_assert!(paths.iter().any(|p| &p[0] == key), "unexpected key {}", key);
                prop_assert!(data.get(key).is_some());
            }
        }
    }

    /// Canonical spec text parses back to the same tree.
    #[test]
    fn to_spec_roundtrip(paths in arb_paths(), exclude in any::<bool>()) {
        let filter = parse_fields_filter(&spec_from(&paths, exclude)).unwrap();
        let spec = filter.to_spec().unwrap();
        prop_assert_eq!(parse_fields_filter(&spec).unwrap(), filter);
    }

    /// The empty spec returns its input unchanged.
    #[test]
    fn empty_spec_is_identity(data in arb_value()) {
        let filter = parse_fields_filter("").unwrap();
        prop_assert_eq!(&filter, &FieldsFilter::Included);
        prop_assert_eq!(filter.apply(&data), data);
    }

    /// Any string either parses or fails with an error; nothing panics.
    #[test]
    fn parser_is_total(input in "\\PC{0,40}") {
        let _ = parse_fields_filter(&input);
    }

    /// Strings over the grammar's own alphabet exercise the error paths harder.
    #[test]
    fn parser_is_total_on_grammar_alphabet(input in "[!(),~ab.]{0,24}") {
        if let Err(err) = parse_fields_filter(&input) {
            prop_assert!(err.is_invalid_format());
        }
    }
}
