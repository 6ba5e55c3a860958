use indoc::indoc;

use crate::diagnostics::DiagnosticKind;
use crate::parser::parse;

fn kinds(source: &str) -> Vec<DiagnosticKind> {
    parse(source).diagnostics().kinds().collect()
}

#[test]
fn node_with_capture() {
    let parse = parse("(number) @n");
    assert!(parse.diagnostics().is_empty());
    insta::assert_snapshot!(parse.dump(false), @r#"
    Root
      Pattern
        Capture
          Tree
            ParenOpen "("
            Id "number"
            ParenClose ")"
          At "@"
          Id "n"
    "#);
}

#[test]
fn fields_quantifiers_and_negated_fields() {
    let parse = parse("(a f: (b)? !g)");
    assert!(parse.diagnostics().is_empty());
    insta::assert_snapshot!(parse.dump(false), @r#"
    Root
      Pattern
        Tree
          ParenOpen "("
          Id "a"
          Quantifier
            Field
              Id "f"
              Colon ":"
              Tree
                ParenOpen "("
                Id "b"
                ParenClose ")"
            Question "?"
          NegatedField
            Negation "!"
            Id "g"
          ParenClose ")"
    "#);
}

#[test]
fn string_literal_pattern() {
    let parse = parse(r#""+" @op"#);
    assert!(parse.diagnostics().is_empty());
    insta::assert_snapshot!(parse.dump(false), @r#"
    Root
      Pattern
        Capture
          Str
            DoubleQuote "\""
            StrVal "+"
            DoubleQuote "\""
          At "@"
          Id "op"
    "#);
}

#[test]
fn several_captures_nest() {
    let parse = parse("_ @a @b");
    assert!(parse.diagnostics().is_empty());
    insta::assert_snapshot!(parse.dump(false), @r#"
    Root
      Pattern
        Capture
          Capture
            Wildcard
              Underscore "_"
            At "@"
            Id "a"
          At "@"
          Id "b"
    "#);
}

#[test]
fn trivia_is_kept() {
    let source = indoc! {"
        ; numbers
        (number)
    "};
    let parse = parse(source);
    assert!(parse.diagnostics().is_empty());
    assert_eq!(parse.syntax().to_string(), source);
    insta::assert_snapshot!(parse.dump(true), @r#"
    Root
      Comment "; numbers"
      Newline "\n"
      Pattern
        Tree
          ParenOpen "("
          Id "number"
          ParenClose ")"
      Newline "\n"
    "#);
}

#[test]
fn multiple_patterns() {
    let parse = parse("(number)\n(identifier) @id");
    assert!(parse.diagnostics().is_empty());
    let patterns = parse.syntax().children().count();
    assert_eq!(patterns, 2);
}

#[test]
fn unclosed_tree() {
    let parse = parse("(number");
    assert_eq!(
        parse.diagnostics().to_string(),
        "error at 0..7: missing closing `)`; expected `)` (related: node started here at 0..1)"
    );
}

#[test]
fn empty_tree() {
    assert_eq!(kinds("()"), [DiagnosticKind::EmptyTree]);
}

#[test]
fn bare_identifier() {
    let parse = parse("number");
    assert_eq!(
        parse.diagnostics().to_string(),
        "error at 0..6: bare identifier is not a pattern: wrap in parentheses: `(identifier)`"
    );
}

#[test]
fn error_keyword_needs_parens() {
    assert_eq!(kinds("ERROR"), [DiagnosticKind::ErrorOutsideParens]);
    assert!(kinds("(ERROR)").is_empty());
}

#[test]
fn predicate_is_unsupported() {
    let parsed = parse(r#"((identifier) @id (#eq? @id "x"))"#);
    assert_eq!(
        parsed.diagnostics().kinds().collect::<Vec<_>>(),
        [DiagnosticKind::ExpectedKind, DiagnosticKind::UnsupportedPredicate]
    );

    let parsed = parse(r#"(#eq? @id "x")"#);
    assert_eq!(
        parsed.diagnostics().kinds().collect::<Vec<_>>(),
        [DiagnosticKind::UnsupportedPredicate]
    );
    assert!(parsed.dump(false).contains("Error"));
}

#[test]
fn comma_separator_has_fix() {
    let parse = parse("(program (number), (identifier))");
    assert_eq!(
        parse.diagnostics().to_string(),
        "error at 17..18: unexpected separator: patterns are separated by whitespace, not `,` (fix: remove)"
    );
    assert_eq!(parse.syntax().to_string(), "(program (number), (identifier))");
}

#[test]
fn capture_without_name() {
    assert_eq!(kinds("(number) @"), [DiagnosticKind::ExpectedCaptureName]);
}

#[test]
fn capture_without_target() {
    assert_eq!(kinds("@x"), [DiagnosticKind::CaptureWithoutTarget]);
    assert_eq!(kinds("(a @x)"), [DiagnosticKind::CaptureWithoutTarget]);
}

#[test]
fn negated_field_at_top_level() {
    assert_eq!(kinds("!value"), [DiagnosticKind::UnexpectedToken]);
}

#[test]
fn negated_field_without_name() {
    assert_eq!(kinds("(a !)"), [DiagnosticKind::ExpectedFieldName]);
}

#[test]
fn field_without_value() {
    assert_eq!(kinds("(a f:)"), [DiagnosticKind::ExpectedExpression]);
}

#[test]
fn garbage_recovers_at_next_pattern() {
    let parse = parse("$$ (number)");
    assert_eq!(
        parse.diagnostics().kinds().collect::<Vec<_>>(),
        [DiagnosticKind::UnexpectedToken]
    );
    assert_eq!(parse.syntax().children().count(), 2);
}

#[test]
fn deep_nesting_is_cut_off() {
    let source = "(a ".repeat(300) + &")".repeat(300);
    let parse = parse(&source);
    assert!(
        parse
            .diagnostics()
            .kinds()
            .any(|k| k == DiagnosticKind::NestingTooDeep)
    );
    assert_eq!(parse.syntax().to_string(), source);
}
