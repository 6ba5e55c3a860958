use crate::parser::cst::{QueryLang, SyntaxKind::*, TokenSet, token_sets};
use rowan::Language;

#[test]
fn token_set_contains() {
    let set = TokenSet::new(&[ParenOpen, ParenClose, Star]);
    assert!(set.contains(ParenOpen));
    assert!(set.contains(ParenClose));
    assert!(set.contains(Star));
    assert!(!set.contains(Plus));
    assert!(!set.contains(Colon));
}

#[test]
fn token_set_union() {
    let a = TokenSet::new(&[ParenOpen, ParenClose]);
    let b = TokenSet::single(Star);
    let c = a.union(b);
    assert!(c.contains(ParenOpen));
    assert!(c.contains(Star));
    assert!(!c.contains(Plus));
    assert!(!TokenSet::EMPTY.contains(ParenOpen));
}

#[test]
fn token_set_ignores_node_kinds() {
    assert!(!token_sets::EXPR_FIRST.contains(Tree));
    assert!(!token_sets::EXPR_FIRST.contains(__LAST));
}

#[test]
fn token_set_debug() {
    let set = TokenSet::new(&[Colon, ParenOpen]);
    assert_eq!(format!("{set:?}"), "{ParenOpen, Colon}");
}

#[test]
fn negation_only_starts_nested_patterns() {
    assert!(token_sets::EXPR_FIRST.contains(Negation));
    assert!(!token_sets::ROOT_EXPR_FIRST.contains(Negation));
    assert!(!token_sets::VALUE_FIRST.contains(Id));
}

#[test]
fn is_trivia() {
    assert!(Whitespace.is_trivia());
    assert!(Newline.is_trivia());
    assert!(Comment.is_trivia());
    assert!(!ParenOpen.is_trivia());
    assert!(!Error.is_trivia());
}

#[test]
fn is_error() {
    assert!(Error.is_error());
    assert!(Garbage.is_error());
    assert!(Predicate.is_error());
    assert!(!Id.is_error());
    assert!(!Whitespace.is_error());
}

#[test]
fn syntax_kind_count_under_64() {
    assert!(
        (__LAST as u16) < 64,
        "SyntaxKind has {} variants, exceeds TokenSet capacity of 64",
        __LAST as u16
    );
}

#[test]
fn kind_round_trips_through_rowan() {
    for kind in [ParenOpen, Capture, Comment, Root] {
        assert_eq!(QueryLang::kind_from_raw(QueryLang::kind_to_raw(kind)), kind);
    }
}
