use std::ops::Range;

use grove_core::Colors;

use crate::test_tables::{arith, arith_parser};
use crate::{Node, ParseConfig, Parser, PrintTracer, RecoveryConfig, Tree};

/// Ranges of the outermost `ERROR` nodes, in document order.
fn errors(tree: &Tree) -> Vec<Range<usize>> {
    fn walk(node: Node<'_>, out: &mut Vec<Range<usize>>) {
        for child in node.children() {
            if child.is_error() {
                out.push(child.byte_range());
            } else {
                walk(child, out);
            }
        }
    }
    let mut out = Vec::new();
    walk(tree.root_node(), &mut out);
    out
}

fn parser_with(recovery: RecoveryConfig) -> Parser {
    let config = ParseConfig {
        recovery,
        ..ParseConfig::default()
    };
    Parser::with_config(arith(), config)
}

#[test]
fn missing_operand() {
    let tree = arith_parser().parse(b"1+");

    assert!(tree.has_error());
    assert_eq!(tree.root_node().byte_range(), 0..2);
    assert_eq!(tree.to_sexp(), "(expr (number) (ERROR))");
    assert_eq!(errors(&tree), [1..2]);

    let number = tree.root_node().child(0).unwrap();
    assert_eq!(number.kind(), "number");
    assert_eq!(number.byte_range(), 0..1);
}

#[test]
fn doubled_operator() {
    let tree = arith_parser().parse(b"1++2");

    assert_eq!(
        tree.to_sexp(),
        "(expr left: (expr (number)) (ERROR) right: (expr (number)))"
    );
    assert_eq!(errors(&tree), [1..2]);
}

#[test]
fn costly_pops_prefer_skipping() {
    let parser = parser_with(RecoveryConfig {
        per_skipped_token: 1,
        per_popped_state: 5,
        max_skipped_tokens: None,
    });
    let tree = parser.parse(b"1++2");

    assert_eq!(
        tree.to_sexp(),
        "(expr left: (expr (number)) (ERROR) right: (expr (number)))"
    );
    assert_eq!(errors(&tree), [2..3]);
}

#[test]
fn unknown_character_is_wrapped() {
    let source = b"1 $ 2";
    let tree = arith_parser().parse(source);

    assert!(tree.has_error());
    assert_eq!(tree.root_node().byte_range(), 0..5);
    assert_eq!(errors(&tree), [0..3]);

    let last = tree.root_node().named_children().pop().unwrap();
    assert_eq!(last.kind(), "number");
    assert_eq!(last.utf8_text(source).unwrap(), "2");
}

#[test]
fn lone_operator_fails() {
    let tree = arith_parser().parse(b"+");
    let root = tree.root_node();

    assert!(root.is_error());
    assert_eq!(root.byte_range(), 0..1);
    assert_eq!(tree.to_sexp(), "(ERROR (ERROR))");
}

#[test]
fn empty_input_fails() {
    let tree = arith_parser().parse(b"");

    assert!(tree.root_node().is_error());
    assert_eq!(tree.root_node().byte_range(), 0..0);
    assert_eq!(tree.to_sexp(), "(ERROR)");
}

#[test]
fn skip_limit_gives_up() {
    let table = arith();
    let parser = parser_with(RecoveryConfig {
        max_skipped_tokens: Some(0),
        ..RecoveryConfig::default()
    });

    let mut tracer = PrintTracer::new(&table, Colors::OFF);
    let tree = parser.parse_with(b"1 $ 2", None, &mut tracer);

    assert_eq!(tree.to_sexp(), "(ERROR (number) (ERROR (ERROR) (number)))");
    assert_eq!(tree.root_node().byte_range(), 0..5);
    assert!(tracer.lines().contains(&"mode    Failed".to_owned()));
}

#[test]
fn garbage_never_panics() {
    let parser = arith_parser();
    for source in ["++++", "1 1 1", "((", "1+\u{7f}+", "\u{1F600}", "1+2+", " + 3"] {
        let tree = parser.parse(source.as_bytes());
        assert_eq!(tree.root_node().byte_range(), 0..source.len(), "{source:?}");
    }
}
