use std::sync::Arc;

use grove_compiler::{CompileConfig, compile};
use grove_core::{Colors, Grammar};
use grove_runtime::{Parser, Tree};
use indoc::indoc;

use super::render::{TreeOptions, format_tree, tree_to_json};

const ARITH: &str = include_str!("../../../../fixtures/arith.json");

fn parse_arith(source: &str) -> Tree {
    let grammar = Grammar::from_json(ARITH).unwrap();
    let table = compile(&grammar, &CompileConfig::default()).unwrap().table;
    Parser::new(Arc::new(table)).parse(source.as_bytes())
}

#[test]
fn named_nodes_with_fields() {
    let tree = parse_arith("1+2");
    let out = format_tree(&tree, b"1+2", TreeOptions::default());

    assert_eq!(
        out,
        indoc! {r#"
            (expr
              left: (expr
                (number "1"))
              right: (expr
                (number "2")))
        "#}
    );
}

#[test]
fn raw_includes_anonymous_nodes() {
    let tree = parse_arith("1+2");
    let options = TreeOptions {
        raw: true,
        ..TreeOptions::default()
    };

    assert_eq!(
        format_tree(&tree, b"1+2", options),
        indoc! {r#"
            (expr
              left: (expr
                (number "1"))
              ("+")
              right: (expr
                (number "2")))
        "#}
    );
}

#[test]
fn spans() {
    let tree = parse_arith("1 + 22");
    let options = TreeOptions {
        spans: true,
        ..TreeOptions::default()
    };

    assert_eq!(
        format_tree(&tree, b"1 + 22", options),
        indoc! {r#"
            (expr [0..6]
              left: (expr [0..1]
                (number "1") [0..1])
              right: (expr [4..6]
                (number "22") [4..6]))
        "#}
    );
}

#[test]
fn colors_mark_named_nodes() {
    let tree = parse_arith("1");
    let options = TreeOptions {
        colors: Colors::ON,
        ..TreeOptions::default()
    };

    let out = format_tree(&tree, b"1", options);
    assert!(out.contains(Colors::ON.blue));
    assert!(out.contains(Colors::ON.reset));

    let plain = format_tree(&tree, b"1", TreeOptions::default());
    assert!(!plain.contains('\x1b'));
}

#[test]
fn errors_are_rendered() {
    let tree = parse_arith("1+");
    let options = TreeOptions {
        raw: true,
        ..TreeOptions::default()
    };
    assert!(format_tree(&tree, b"1+", options).contains("(ERROR"));
}

#[test]
fn json_tree() {
    let tree = parse_arith("1+2");
    let json: serde_json::Value = serde_json::from_str(&tree_to_json(&tree, false).unwrap()).unwrap();

    assert_eq!(json["kind"], "expr");
    assert_eq!(json["named"], true);
    assert_eq!(json["start"], 0);
    assert_eq!(json["end"], 3);
    assert!(json.get("field").is_none());
    assert!(json.get("error").is_none());

    let children = json["children"].as_array().unwrap();
    assert_eq!(children.len(), 2);
    assert_eq!(children[0]["field"], "left");
    assert_eq!(children[1]["field"], "right");
    assert_eq!(children[1]["children"][0]["kind"], "number");
    assert!(children[1]["children"][0].get("children").is_none());
}

#[test]
fn json_raw_tree() {
    let tree = parse_arith("1+2");
    let json: serde_json::Value = serde_json::from_str(&tree_to_json(&tree, true).unwrap()).unwrap();

    let children = json["children"].as_array().unwrap();
    assert_eq!(children.len(), 3);
    assert_eq!(children[1]["kind"], "+");
    assert_eq!(children[1]["named"], false);
}

#[test]
fn json_marks_errors() {
    let tree = parse_arith("1+");
    let json = tree_to_json(&tree, true).unwrap();
    assert!(json.contains(r#""error": true"#));
}
