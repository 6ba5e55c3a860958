use super::ReuseCursor;
use crate::test_tables::{arith, arith_parser};

fn kinds(chain: &[crate::subtree::Subtree]) -> Vec<&str> {
    let table = arith();
    chain
        .iter()
        .map(|s| match table.symbol_name(s.symbol) {
            "expr" => "expr",
            "number" => "number",
            "+" => "+",
            _ => "other",
        })
        .collect()
}

#[test]
fn offers_largest_first() {
    let tree = arith_parser().parse(b"1+2+3");
    let mut cursor = ReuseCursor::new(tree.root_subtree());

    let chain = cursor.candidates_at(0);
    assert_eq!(kinds(&chain), ["expr", "expr", "number"]);
    assert_eq!(chain[0].total(), 3);
    assert_eq!(chain[2].total(), 1);
}

#[test]
fn walks_forward_through_siblings() {
    let tree = arith_parser().parse(b"1+2+3");
    let mut cursor = ReuseCursor::new(tree.root_subtree());

    assert_eq!(kinds(&cursor.candidates_at(1)), ["+"]);
    assert_eq!(kinds(&cursor.candidates_at(2)), ["expr", "number"]);
    assert_eq!(kinds(&cursor.candidates_at(3)), ["+"]);
    assert_eq!(kinds(&cursor.candidates_at(4)), ["expr", "number"]);
}

#[test]
fn skipped_positions_are_fine() {
    let tree = arith_parser().parse(b"1+2+3");
    let mut cursor = ReuseCursor::new(tree.root_subtree());

    assert_eq!(cursor.candidates_at(0).len(), 3);
    assert_eq!(kinds(&cursor.candidates_at(4)), ["expr", "number"]);
}

#[test]
fn nothing_starts_mid_token() {
    let tree = arith_parser().parse(b"12+3");
    let mut cursor = ReuseCursor::new(tree.root_subtree());

    assert!(cursor.candidates_at(1).is_empty());
    assert_eq!(kinds(&cursor.candidates_at(2)), ["+"]);
}

#[test]
fn past_the_end_is_empty() {
    let tree = arith_parser().parse(b"1");
    let mut cursor = ReuseCursor::new(tree.root_subtree());

    assert!(cursor.candidates_at(1).is_empty());
    assert!(cursor.candidates_at(7).is_empty());
}

#[test]
fn error_ranges_come_from_the_prior_tree() {
    let clean = arith_parser().parse(b"1+2+3");
    let cursor = ReuseCursor::new(clean.root_subtree());
    assert!(!cursor.near_error(0..5));

    let broken = arith_parser().parse(b"1++2");
    assert!(broken.has_error());
    let cursor = ReuseCursor::new(broken.root_subtree());
    assert!(cursor.near_error(0..4));
    assert!(!cursor.near_error(4..4));
}
