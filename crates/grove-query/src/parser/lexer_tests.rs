use crate::parser::cst::SyntaxKind;
use crate::parser::lexer::{Token, lex, token_text};

fn snapshot(source: &str) -> String {
    lex(source)
        .iter()
        .map(|t: &Token| format!("{:?} {:?}", t.kind, token_text(source, t)))
        .collect::<Vec<_>>()
        .join("\n")
}

#[test]
fn simple_tree() {
    insta::assert_snapshot!(snapshot("(number) @n"), @r#"
    ParenOpen "("
    Id "number"
    ParenClose ")"
    Whitespace " "
    At "@"
    Id "n"
    "#);
}

#[test]
fn string_literal_is_split() {
    insta::assert_snapshot!(snapshot(r#""+" """#), @r#"
    DoubleQuote "\""
    StrVal "+"
    DoubleQuote "\""
    Whitespace " "
    DoubleQuote "\""
    DoubleQuote "\""
    "#);
}

#[test]
fn escaped_quote_stays_inside_string() {
    let kinds: Vec<_> = lex(r#""a\"b""#).iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        [SyntaxKind::DoubleQuote, SyntaxKind::StrVal, SyntaxKind::DoubleQuote]
    );
}

#[test]
fn error_keyword_and_identifiers() {
    insta::assert_snapshot!(snapshot("ERROR ERRORS _ _x fn.call"), @r#"
    KwError "ERROR"
    Whitespace " "
    Id "ERRORS"
    Whitespace " "
    Underscore "_"
    Whitespace " "
    Id "_x"
    Whitespace " "
    Id "fn.call"
    "#);
}

#[test]
fn comments_run_to_end_of_line() {
    insta::assert_snapshot!(snapshot("; hi (x)\n(y)"), @r#"
    Comment "; hi (x)"
    Newline "\n"
    ParenOpen "("
    Id "y"
    ParenClose ")"
    "#);
}

#[test]
fn garbage_is_coalesced() {
    insta::assert_snapshot!(snapshot("(a) $%^ (b)"), @r#"
    ParenOpen "("
    Id "a"
    ParenClose ")"
    Whitespace " "
    Garbage "$%^"
    Whitespace " "
    ParenOpen "("
    Id "b"
    ParenClose ")"
    "#);
}

#[test]
fn trailing_garbage() {
    insta::assert_snapshot!(snapshot("(a)$$"), @r#"
    ParenOpen "("
    Id "a"
    ParenClose ")"
    Garbage "$$"
    "#);
}

#[test]
fn predicates() {
    insta::assert_snapshot!(snapshot("#eq? #match"), @r##"
    Predicate "#eq?"
    Whitespace " "
    Predicate "#match"
    "##);
}
