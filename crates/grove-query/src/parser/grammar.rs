//! Grammar productions for the query language.
//!
//! All `parse_*` methods extend [`Parser`]. The syntax is tree-sitter's
//! S-expression query language without predicates, alternations or anchors.

use rowan::Checkpoint;

use super::core::Parser;
use super::cst::SyntaxKind;
use super::cst::token_sets::{EXPR_FIRST, QUANTIFIERS, ROOT_EXPR_FIRST, SEPARATORS, VALUE_FIRST};
use crate::diagnostics::DiagnosticKind;

impl Parser<'_> {
    /// Top level: a sequence of patterns, each wrapped in a `Pattern` node.
    pub fn parse_root(&mut self) {
        self.start_root();

        loop {
            let kind = self.current();
            if self.eof() {
                break;
            }
            if ROOT_EXPR_FIRST.contains(kind) {
                self.start_node(SyntaxKind::Pattern);
                self.parse_expr();
                self.finish_node();
                continue;
            }
            match kind {
                SyntaxKind::At => {
                    self.error(DiagnosticKind::CaptureWithoutTarget);
                    self.bump_named_as_error();
                }
                SyntaxKind::Predicate => self.error_and_bump(DiagnosticKind::UnsupportedPredicate),
                SyntaxKind::Negation => {
                    self.error_msg(
                        DiagnosticKind::UnexpectedToken,
                        "`!field` only applies inside a node",
                    );
                    self.bump_named_as_error();
                }
                _ => self.error_recover(
                    DiagnosticKind::UnexpectedToken,
                    "try `(node)`, `\"literal\"` or `_`",
                    ROOT_EXPR_FIRST,
                ),
            }
        }

        self.eat_trivia();
        self.finish_node();
    }

    fn parse_expr(&mut self) {
        self.parse_expr_inner(true)
    }

    /// Field values take no suffix, so `field: (x) @c` captures the field.
    fn parse_expr_no_suffix(&mut self) {
        self.parse_expr_inner(false)
    }

    fn parse_expr_inner(&mut self, with_suffix: bool) {
        if !self.enter_recursion() {
            self.error(DiagnosticKind::NestingTooDeep);
            self.start_node(SyntaxKind::Error);
            while !self.eof() {
                self.bump();
            }
            self.finish_node();
            return;
        }

        let checkpoint = self.checkpoint();

        match self.current() {
            SyntaxKind::ParenOpen => self.parse_tree(),
            SyntaxKind::Underscore => self.parse_wildcard(),
            SyntaxKind::DoubleQuote => self.parse_str(),
            SyntaxKind::Negation => {
                self.parse_negated_field();
                self.exit_recursion();
                return;
            }
            SyntaxKind::Id if self.next_is(SyntaxKind::Colon) => self.parse_field(),
            SyntaxKind::Id => self.error_and_bump_msg(
                DiagnosticKind::BareIdentifier,
                "wrap in parentheses: `(identifier)`",
            ),
            SyntaxKind::KwError => {
                self.error_and_bump_msg(DiagnosticKind::ErrorOutsideParens, "write `(ERROR)`")
            }
            _ => self.error_and_bump_msg(DiagnosticKind::UnexpectedToken, "not a valid pattern"),
        }

        if with_suffix {
            self.try_parse_quantifier(checkpoint);
            self.try_parse_captures(checkpoint);
        }

        self.exit_recursion();
    }

    /// `(kind child...)` | `(_ child...)` | `(ERROR child...)`
    fn parse_tree(&mut self) {
        let checkpoint = self.checkpoint();
        self.open_paren();
        self.bump(); // consume '('

        match self.current() {
            SyntaxKind::ParenClose => {
                self.start_node_at(checkpoint, SyntaxKind::Tree);
                self.error(DiagnosticKind::EmptyTree);
                self.close_paren();
                self.bump();
                self.finish_node();
                return;
            }
            SyntaxKind::Underscore | SyntaxKind::Id | SyntaxKind::KwError => {
                self.start_node_at(checkpoint, SyntaxKind::Tree);
                self.bump();
            }
            SyntaxKind::Predicate => {
                self.start_node_at(checkpoint, SyntaxKind::Error);
                self.error(DiagnosticKind::UnsupportedPredicate);
                self.bump_balanced();
                self.close_paren();
                self.eat_token(SyntaxKind::ParenClose);
                self.finish_node();
                return;
            }
            _ => {
                self.start_node_at(checkpoint, SyntaxKind::Tree);
                self.error_msg(DiagnosticKind::ExpectedKind, "e.g. `(identifier)` or `(_)`");
            }
        }

        self.parse_children();

        self.close_paren();
        self.expect(SyntaxKind::ParenClose, "closing `)` for node");
        self.finish_node();
    }

    /// Child patterns up to the closing `)`.
    fn parse_children(&mut self) {
        loop {
            let kind = self.current();
            if self.eof() {
                self.error_unclosed(DiagnosticKind::UnclosedTree, "expected `)`", "node started here");
                break;
            }
            if kind == SyntaxKind::ParenClose {
                break;
            }
            if SEPARATORS.contains(kind) {
                self.error_separator();
                continue;
            }
            if EXPR_FIRST.contains(kind) {
                self.parse_expr();
                continue;
            }
            match kind {
                SyntaxKind::At => {
                    self.error(DiagnosticKind::CaptureWithoutTarget);
                    self.bump_named_as_error();
                }
                SyntaxKind::Predicate => self.error_and_bump(DiagnosticKind::UnsupportedPredicate),
                _ => self.error_and_bump_msg(
                    DiagnosticKind::UnexpectedToken,
                    "not valid inside a node; try `(child)` or close with `)`",
                ),
            }
        }
    }

    /// Wrap the current token and an adjacent name in an `Error` node, so
    /// `@x` or `!x` out of place is one error rather than two.
    fn bump_named_as_error(&mut self) {
        self.start_node(SyntaxKind::Error);
        self.bump();
        if self.nth_raw(0) == SyntaxKind::Id {
            self.bump();
        }
        self.finish_node();
    }

    /// Swallow a parenthesized group up to its closing `)`, left unconsumed.
    fn bump_balanced(&mut self) {
        let mut depth = 0u32;
        loop {
            let kind = self.current();
            if self.eof() {
                break;
            }
            match kind {
                SyntaxKind::ParenOpen => depth += 1,
                SyntaxKind::ParenClose if depth == 0 => break,
                SyntaxKind::ParenClose => depth -= 1,
                _ => {}
            }
            self.bump();
        }
    }

    fn parse_wildcard(&mut self) {
        self.start_node(SyntaxKind::Wildcard);
        self.expect(SyntaxKind::Underscore, "`_` wildcard");
        self.finish_node();
    }

    /// `"+"`
    fn parse_str(&mut self) {
        self.start_node(SyntaxKind::Str);
        self.bump(); // opening quote
        if self.nth_raw(0) == SyntaxKind::StrVal {
            self.bump();
        }
        // The lexer only splits complete strings into quote tokens.
        self.assert_current(SyntaxKind::DoubleQuote);
        self.bump();
        self.finish_node();
    }

    /// `!field`: the node has no child with this field.
    fn parse_negated_field(&mut self) {
        self.start_node(SyntaxKind::NegatedField);
        self.assert_current(SyntaxKind::Negation);
        self.bump();

        if self.nth_raw(0) == SyntaxKind::Id {
            self.bump();
        } else {
            self.error_msg(DiagnosticKind::ExpectedFieldName, "e.g. `!value`");
        }
        self.finish_node();
    }

    /// `field: pattern`
    fn parse_field(&mut self) {
        self.start_node(SyntaxKind::Field);
        self.assert_current(SyntaxKind::Id);
        self.bump();
        self.expect(SyntaxKind::Colon, "`:` after field name");

        if VALUE_FIRST.contains(self.current()) {
            self.parse_expr_no_suffix();
        } else {
            self.error_msg(DiagnosticKind::ExpectedExpression, "after `field:`");
        }
        self.finish_node();
    }

    fn error_separator(&mut self) {
        self.error_with_fix(
            DiagnosticKind::InvalidSeparator,
            "patterns are separated by whitespace, not `,`",
            "remove",
            "",
        );
        self.bump_as_error();
    }

    /// Wrap the preceding pattern in a `Quantifier` when one follows.
    fn try_parse_quantifier(&mut self, checkpoint: Checkpoint) {
        if self.currently_is_one_of(QUANTIFIERS) {
            self.start_node_at(checkpoint, SyntaxKind::Quantifier);
            self.bump();
            self.finish_node();
        }
    }

    /// `@name` suffixes; each one wraps everything before it.
    fn try_parse_captures(&mut self, checkpoint: Checkpoint) {
        while self.currently_is(SyntaxKind::At) {
            self.start_node_at(checkpoint, SyntaxKind::Capture);
            self.bump(); // consume '@'
            if self.nth_raw(0) == SyntaxKind::Id {
                self.bump();
            } else {
                self.error(DiagnosticKind::ExpectedCaptureName);
            }
            self.finish_node();
        }
    }
}
