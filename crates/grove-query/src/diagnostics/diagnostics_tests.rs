use rowan::TextRange;

use super::*;

fn range(start: u32, end: u32) -> TextRange {
    TextRange::new(start.into(), end.into())
}

#[test]
fn severity_display() {
    insta::assert_snapshot!(format!("{}", Severity::Error), @"error");
    insta::assert_snapshot!(format!("{}", Severity::Warning), @"warning");
}

#[test]
fn report_with_default_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::EmptyTree, range(0, 2))
        .emit();

    assert_eq!(diagnostics.len(), 1);
    assert!(diagnostics.has_errors());
    insta::assert_snapshot!(diagnostics.to_string(), @"error at 0..2: empty `()` is not allowed");
}

#[test]
fn report_with_custom_message() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnknownKind, range(1, 5))
        .message("nope")
        .emit();

    insta::assert_snapshot!(diagnostics.to_string(), @"error at 1..5: `nope` is not a node kind of this grammar");
}

#[test]
fn warnings_are_not_errors() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::TopLevelQuantifier, range(8, 9))
        .emit();

    assert!(!diagnostics.is_empty());
    assert!(!diagnostics.has_errors());
    assert_eq!(diagnostics.error_count(), 0);
}

#[test]
fn builder_with_related_and_fix() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::InvalidSeparator, range(4, 5))
        .message("use whitespace")
        .related_to("inside this node", range(0, 1))
        .fix("remove", "")
        .emit();

    insta::assert_snapshot!(
        diagnostics.to_string(),
        @"error at 4..5: unexpected separator: use whitespace (fix: remove) (related: inside this node at 0..1)"
    );
}

#[test]
fn contained_lower_priority_is_suppressed() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnclosedTree, range(0, 10))
        .emit();
    diagnostics
        .report(DiagnosticKind::UnexpectedToken, range(4, 6))
        .emit();

    let filtered = diagnostics.filtered();
    assert_eq!(
        filtered.kinds().collect::<Vec<_>>(),
        [DiagnosticKind::UnclosedTree]
    );
}

#[test]
fn root_cause_beats_structural_at_same_start() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnclosedTree, range(3, 10))
        .emit();
    diagnostics
        .report(DiagnosticKind::ExpectedKind, range(3, 4))
        .emit();

    let filtered = diagnostics.filtered();
    assert_eq!(
        filtered.kinds().collect::<Vec<_>>(),
        [DiagnosticKind::ExpectedKind]
    );
}

#[test]
fn disjoint_diagnostics_are_kept() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::EmptyTree, range(0, 2))
        .emit();
    diagnostics
        .report(DiagnosticKind::BareIdentifier, range(3, 6))
        .emit();

    assert_eq!(diagnostics.filtered(), diagnostics);
}

#[test]
fn extend_appends() {
    let mut a = Diagnostics::new();
    a.report(DiagnosticKind::EmptyTree, range(0, 2)).emit();
    let mut b = Diagnostics::new();
    b.report(DiagnosticKind::TopLevelQuantifier, range(2, 3)).emit();

    a.extend(b);
    assert_eq!(a.len(), 2);
    assert_eq!(a.error_count(), 1);
}

#[test]
fn printer_without_source_is_plain() {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::EmptyTree, range(0, 2))
        .emit();
    diagnostics
        .report(DiagnosticKind::TopLevelQuantifier, range(8, 9))
        .emit();

    insta::assert_snapshot!(diagnostics.printer().render(), @r"
    error at 0..2: empty `()` is not allowed
    warning at 8..9: quantifier on a top-level pattern has no effect
    ");
}

#[test]
fn printer_renders_source_snippet() {
    let source = "(program (number)";
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnclosedTree, range(0, 17))
        .message("expected `)`")
        .related_to("node started here", range(0, 1))
        .emit();

    let rendered = diagnostics.printer().source(source).path("q.scm").render();
    assert!(rendered.contains("error: missing closing `)`; expected `)`"));
    assert!(rendered.contains("q.scm"));
    assert!(rendered.contains("(program (number)"));
    assert!(rendered.contains("node started here"));
}

#[test]
fn printer_renders_fix_as_help() {
    let source = "(a, b)";
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::InvalidSeparator, range(2, 3))
        .fix("remove", "")
        .emit();

    let rendered = diagnostics.printer().source(source).render();
    assert!(rendered.contains("error: unexpected separator"));
    assert!(rendered.contains("help: remove"));
}

#[test]
fn kind_priority_order() {
    assert!(DiagnosticKind::UnclosedTree.suppresses(&DiagnosticKind::UnexpectedToken));
    assert!(!DiagnosticKind::TopLevelQuantifier.suppresses(&DiagnosticKind::EmptyTree));
    assert_eq!(
        DiagnosticKind::EmptyTree.detailed("x"),
        "empty `()` is not allowed: x"
    );
}
