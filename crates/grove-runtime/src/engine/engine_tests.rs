use std::sync::Arc;

use crate::test_tables::{arith, arith_parser, calc_parser};
use crate::{ParseConfig, Parser};

#[test]
fn left_associative_sum() {
    let tree = arith_parser().parse(b"1+2+3");
    let root = tree.root_node();

    assert_eq!(root.byte_range(), 0..5);
    assert!(!tree.has_error());
    insta::assert_snapshot!(
        tree.to_sexp(),
        @"(expr left: (expr left: (expr (number)) right: (expr (number))) right: (expr (number)))"
    );

    let left = root.child_by_field_name("left").unwrap();
    assert_eq!(left.byte_range(), 0..3);
    let right = root.child_by_field_name("right").unwrap();
    assert_eq!(right.byte_range(), 4..5);
}

#[test]
fn single_number() {
    let tree = arith_parser().parse(b"42");

    assert!(!tree.has_error());
    assert_eq!(tree.to_sexp(), "(expr (number))");
    assert_eq!(tree.root_node().byte_range(), 0..2);
}

#[test]
fn whitespace_is_padding() {
    let tree = arith_parser().parse(b" 1 +\n2 ");

    assert!(!tree.has_error());
    assert_eq!(tree.root_node().byte_range(), 0..7);
    assert_eq!(tree.to_sexp(), "(expr left: (expr (number)) right: (expr (number)))");
}

#[test]
fn precedence_shapes_calc_tree() {
    let tree = calc_parser().parse(b"1 + 2 * 3;");

    assert!(!tree.has_error());
    insta::assert_snapshot!(
        tree.to_sexp(),
        @"(program (expression_statement (binary_expression left: (number) right: (binary_expression left: (number) right: (number)))))"
    );
}

#[test]
fn right_associative_power() {
    let tree = calc_parser().parse(b"2 ^ 3 ^ 4;");

    assert!(!tree.has_error());
    insta::assert_snapshot!(
        tree.to_sexp(),
        @"(program (expression_statement (binary_expression left: (number) right: (binary_expression left: (number) right: (number)))))"
    );
}

#[test]
fn calls_and_keywords() {
    let source = b"let total = sum(a, 1);\n# done\n";
    let tree = calc_parser().parse(source);

    assert!(!tree.has_error());
    assert_eq!(tree.root_node().byte_range(), 0..source.len());
    insta::assert_snapshot!(
        tree.to_sexp(),
        @"(program (let_statement name: (identifier) value: (call_expression function: (identifier) arguments: (arguments (identifier) (number)))) (comment))"
    );
}

#[test]
fn parse_is_deterministic() {
    let parser = calc_parser();
    let source = b"let a = -(b + 1) * c(2);";

    let first = parser.parse(source);
    let second = parser.parse(source);
    assert!(first.same_structure(&second));
    assert_eq!(first.to_sexp(), second.to_sexp());
}

#[test]
fn parser_is_shareable_across_threads() {
    let parser = Arc::new(arith_parser());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let parser = parser.clone();
            std::thread::spawn(move || {
                let source = format!("{i}+{i}");
                parser.parse(source.as_bytes()).to_sexp()
            })
        })
        .collect();

    for handle in handles {
        assert_eq!(
            handle.join().unwrap(),
            "(expr left: (expr (number)) right: (expr (number)))"
        );
    }
}

#[test]
fn reduction_limit_of_zero_still_terminates() {
    let config = ParseConfig {
        reduction_limit: 0,
        ..ParseConfig::default()
    };
    let parser = Parser::with_config(arith(), config);

    let tree = parser.parse(b"1+2");
    assert_eq!(tree.root_node().byte_range(), 0..3);
}
