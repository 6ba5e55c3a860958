//! Property-based tests for the parsing engine.
//!
//! Whatever the input, a parse must cover it exactly, nest node ranges
//! properly, be reproducible, and agree with an incremental re-parse after
//! arbitrary edits.

use std::sync::{Arc, OnceLock};

use grove_compiler::{CompileConfig, compile};
use grove_core::Grammar;
use grove_runtime::{InputEdit, Node, Parser};
use grove_table::ParseTable;
use proptest::prelude::*;

fn table(json: &str) -> Arc<ParseTable> {
    let grammar = Grammar::from_json(json).unwrap();
    Arc::new(compile(&grammar, &CompileConfig::default()).unwrap().table)
}

fn arith() -> Parser {
    static TABLE: OnceLock<Arc<ParseTable>> = OnceLock::new();
    let table = TABLE.get_or_init(|| table(include_str!("../../../fixtures/arith.json")));
    Parser::new(table.clone())
}

fn calc() -> Parser {
    static TABLE: OnceLock<Arc<ParseTable>> = OnceLock::new();
    let table = TABLE.get_or_init(|| table(include_str!("../../../fixtures/calc.json")));
    Parser::new(table.clone())
}

fn arith_source() -> impl Strategy<Value = String> {
    "[0-9+ $]{0,16}"
}

fn calc_source() -> impl Strategy<Value = String> {
    prop::collection::vec(
        prop::sample::select(vec![
            "let ", "x", "y1", " = ", "1", "2.5", " + ", "*", "-", "^", "(", ")", ",", ";", "\n",
            "# c\n", "f(", "@",
        ]),
        0..16,
    )
    .prop_map(|parts| parts.concat())
}

/// A replacement expressed relative to whatever text it is applied to.
#[derive(Clone, Debug)]
struct Edit {
    start: prop::sample::Index,
    removed: usize,
    inserted: String,
}

fn edit(alphabet: &'static str) -> impl Strategy<Value = Edit> {
    (any::<prop::sample::Index>(), 0usize..4, alphabet).prop_map(|(start, removed, inserted)| {
        Edit {
            start,
            removed,
            inserted,
        }
    })
}

/// Apply `edits` to `text` (ASCII), returning the new text and the edits in
/// the form the parser expects.
fn apply(text: &str, edits: &[Edit]) -> (String, Vec<InputEdit>) {
    let mut text = text.to_owned();
    let mut input_edits = Vec::new();
    for edit in edits {
        let start = edit.start.index(text.len() + 1);
        let end = (start + edit.removed).min(text.len());
        text.replace_range(start..end, &edit.inserted);
        input_edits.push(InputEdit::replace(start..end, edit.inserted.len()));
    }
    (text, input_edits)
}

fn check_ranges(node: Node<'_>) -> Result<(), TestCaseError> {
    let range = node.byte_range();
    prop_assert!(range.start <= range.end);
    let mut last_end = range.start;
    for child in node.children() {
        let child_range = child.byte_range();
        prop_assert!(
            range.start <= child_range.start && child_range.end <= range.end,
            "{child:?} escapes {node:?}"
        );
        prop_assert!(last_end <= child_range.start, "{child:?} overlaps a sibling");
        last_end = child_range.end;
        check_ranges(child)?;
    }
    Ok(())
}

proptest! {
    #[test]
    fn root_covers_any_bytes(source in prop::collection::vec(any::<u8>(), 0..48)) {
        let tree = calc().parse(&source);
        prop_assert_eq!(tree.root_node().byte_range(), 0..source.len());
    }

    #[test]
    fn ranges_nest(source in calc_source()) {
        let tree = calc().parse(source.as_bytes());
        prop_assert_eq!(tree.source_len(), source.len());
        check_ranges(tree.root_node())?;
    }

    #[test]
    fn parse_is_deterministic(source in calc_source()) {
        let parser = calc();
        let first = parser.parse(source.as_bytes());
        let second = parser.parse(source.as_bytes());
        prop_assert!(first.same_structure(&second));
    }

    #[test]
    fn clean_arith_has_no_errors(terms in prop::collection::vec(0u32..1000, 1..8)) {
        let source = terms
            .iter()
            .map(u32::to_string)
            .collect::<Vec<_>>()
            .join(" + ");
        let tree = arith().parse(source.as_bytes());
        prop_assert!(!tree.has_error(), "{}", tree.to_sexp());
    }

    #[test]
    fn incremental_matches_fresh_arith(
        source in arith_source(),
        edits in prop::collection::vec(edit("[0-9+ ]{0,3}"), 1..3),
    ) {
        let parser = arith();
        let old = parser.parse(source.as_bytes());
        let (text, input_edits) = apply(&source, &edits);

        let incremental = parser.parse_incremental(text.as_bytes(), &old, &input_edits);
        let fresh = parser.parse(text.as_bytes());
        prop_assert!(
            incremental.same_structure(&fresh),
            "{:?} -> {:?}: {} vs {}",
            source,
            text,
            incremental.to_sexp(),
            fresh.to_sexp()
        );
    }

    #[test]
    fn incremental_matches_fresh_calc(
        source in calc_source(),
        edits in prop::collection::vec(edit("[a-z0-9+;() ]{0,3}"), 1..3),
    ) {
        let parser = calc();
        let old = parser.parse(source.as_bytes());
        let (text, input_edits) = apply(&source, &edits);

        let incremental = parser.parse_incremental(text.as_bytes(), &old, &input_edits);
        let fresh = parser.parse(text.as_bytes());
        prop_assert!(
            incremental.same_structure(&fresh),
            "{:?} -> {:?}: {} vs {}",
            source,
            text,
            incremental.to_sexp(),
            fresh.to_sexp()
        );
    }
}
