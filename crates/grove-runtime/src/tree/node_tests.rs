use crate::test_tables::{arith_parser, calc_parser};

#[test]
fn root_spans_whole_source() {
    let tree = arith_parser().parse(b"  1 + 2  ");
    let root = tree.root_node();

    assert_eq!(root.byte_range(), 0..9);
    assert_eq!(tree.source_len(), 9);
    assert_eq!(root.kind(), "expr");
    assert!(root.is_named());
}

#[test]
fn children_start_after_padding() {
    let source = b"  1 + 2  ";
    let tree = arith_parser().parse(source);
    let root = tree.root_node();

    let children = root.children();
    assert_eq!(children.len(), 3);
    assert_eq!(children[0].byte_range(), 2..3);
    assert_eq!(children[1].kind(), "+");
    assert!(!children[1].is_named());
    assert_eq!(children[1].utf8_text(source).unwrap(), "+");
    assert_eq!(children[2].byte_range(), 6..7);
}

#[test]
fn fields_label_children() {
    let tree = arith_parser().parse(b"1+2");
    let root = tree.root_node();

    assert_eq!(root.field_name_for_child(0), Some("left"));
    assert_eq!(root.field_name_for_child(1), None);
    assert_eq!(root.field_name_for_child(2), Some("right"));

    let right = root.child_by_field_name("right").unwrap();
    assert_eq!(right.byte_range(), 2..3);
    assert_eq!(right.field_name(), Some("right"));
    assert!(root.child_by_field_name("middle").is_none());
}

#[test]
fn hidden_rules_are_flattened() {
    let source = b"let x = 1 + 2;";
    let tree = calc_parser().parse(source);
    insta::assert_snapshot!(
        tree.to_sexp(),
        @"(program (let_statement name: (identifier) value: (binary_expression left: (number) right: (number))))"
    );

    let statement = tree.root_node().child(0).unwrap();
    let value = statement.child_by_field_name("value").unwrap();
    assert_eq!(value.kind(), "binary_expression");
    assert_eq!(value.utf8_text(source).unwrap(), "1 + 2");

    let operator = value.child_by_field_name("operator").unwrap();
    assert_eq!(operator.kind(), "+");
}

#[test]
fn named_extras_are_nodes() {
    let tree = calc_parser().parse(b"# first\nx;");
    let root = tree.root_node();

    let comment = root.child(0).unwrap();
    assert_eq!(comment.kind(), "comment");
    assert!(comment.is_extra());
    assert_eq!(comment.byte_range(), 0..7);
    assert_eq!(root.named_children().len(), 2);
}

#[test]
fn paths_round_trip() {
    let tree = arith_parser().parse(b"1+2+3");
    let node = tree.node_at_path(&[0, 2]).unwrap();

    assert_eq!(node.byte_range(), 2..3);
    assert_eq!(node.path(), [0, 2]);
    assert_eq!(tree.root_node().path(), Vec::<usize>::new());
    assert!(tree.node_at_path(&[0, 9]).is_none());
}

#[test]
fn descendant_for_range_is_smallest() {
    let tree = arith_parser().parse(b"1+2+3");

    let node = tree.descendant_for_byte_range(2, 3).unwrap();
    assert_eq!(node.kind(), "number");
    assert_eq!(node.byte_range(), 2..3);

    let node = tree.descendant_for_byte_range(0, 3).unwrap();
    assert_eq!(node.kind(), "expr");
    assert_eq!(node.byte_range(), 0..3);

    assert!(tree.descendant_for_byte_range(3, 9).is_none());
}

#[test]
fn leaves_have_no_children() {
    let tree = arith_parser().parse(b"7");
    let number = tree.root_node().child(0).unwrap();

    assert_eq!(number.kind(), "number");
    assert_eq!(number.child_count(), 0);
    assert!(number.children().is_empty());
}

#[test]
fn node_identity() {
    let tree = arith_parser().parse(b"1+2");
    let a = tree.node_at_path(&[0]).unwrap();
    let b = tree.root_node().child(0).unwrap();

    assert_eq!(a, b);
    assert_eq!(a.id(), b.id());
    assert_ne!(a, tree.root_node().child(2).unwrap());
    assert_eq!(format!("{a:?}"), "expr [0..1]");
}
