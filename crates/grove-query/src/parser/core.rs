//! Token cursor and tree-building primitives used by the grammar rules.

use std::cell::Cell;

use rowan::{Checkpoint, GreenNode, GreenNodeBuilder, TextRange, TextSize};

use super::cst::{SyntaxKind, TokenSet};
use super::lexer::{Token, token_text};
use crate::diagnostics::{DiagnosticKind, Diagnostics};

/// Nesting depth past which the rest of the input becomes one error node.
pub(super) const MAX_DEPTH: u32 = 256;

/// Lookaheads allowed between two consumed tokens.
pub(super) const LOOKAHEAD_LIMIT: u32 = 256;

/// Recursive-descent parser building a rowan green tree.
///
/// `pos` is the first token not yet in the tree. Trivia after it stays
/// pending until the next node or token is built, so comments and
/// whitespace always attach in front of the element that follows them.
pub struct Parser<'src> {
    source: &'src str,
    tokens: Vec<Token>,
    pos: usize,
    builder: GreenNodeBuilder<'static>,
    diagnostics: Diagnostics,
    depth: u32,
    /// Start of the last reported range; later reports there are dropped.
    last_report: Option<TextSize>,
    /// Spans of the unclosed `(`, innermost last.
    open_parens: Vec<TextRange>,
    pub(super) lookaheads_left: Cell<u32>,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str, tokens: Vec<Token>) -> Self {
        Self {
            source,
            tokens,
            pos: 0,
            builder: GreenNodeBuilder::new(),
            diagnostics: Diagnostics::new(),
            depth: 0,
            last_report: None,
            open_parens: Vec::new(),
            lookaheads_left: Cell::new(LOOKAHEAD_LIMIT),
        }
    }

    pub(super) fn finish(mut self) -> (GreenNode, Diagnostics) {
        self.pos = self.emit_raw(self.pos, self.tokens.len());
        (self.builder.finish(), self.diagnostics)
    }

    /// Index of the next non-trivia token, `tokens.len()` at the end.
    fn significant(&self) -> usize {
        self.tokens[self.pos..]
            .iter()
            .position(|t| !t.kind.is_trivia())
            .map_or(self.tokens.len(), |i| self.pos + i)
    }

    /// Kind of the next non-trivia token; `Error` at end of input.
    pub(super) fn current(&self) -> SyntaxKind {
        self.ensure_progress();
        self.tokens
            .get(self.significant())
            .map_or(SyntaxKind::Error, |t| t.kind)
    }

    /// Kind of the token `n` places after `pos`, trivia included.
    pub(super) fn nth_raw(&self, n: usize) -> SyntaxKind {
        self.ensure_progress();
        self.tokens
            .get(self.pos + n)
            .map_or(SyntaxKind::Error, |t| t.kind)
    }

    /// Kind of the second non-trivia token ahead.
    pub(super) fn next_is(&self, kind: SyntaxKind) -> bool {
        self.ensure_progress();
        self.tokens[self.pos..]
            .iter()
            .filter(|t| !t.kind.is_trivia())
            .nth(1)
            .is_some_and(|t| t.kind == kind)
    }

    pub(super) fn current_span(&self) -> TextRange {
        self.tokens.get(self.significant()).map_or_else(
            || TextRange::empty(TextSize::from(self.source.len() as u32)),
            |t| t.span,
        )
    }

    pub(super) fn eof(&self) -> bool {
        self.significant() >= self.tokens.len()
    }

    pub(super) fn currently_is(&self, kind: SyntaxKind) -> bool {
        self.current() == kind
    }

    pub(super) fn currently_is_one_of(&self, set: TokenSet) -> bool {
        set.contains(self.current())
    }

    /// Add `tokens[from..to]` to the current node; returns `to`.
    fn emit_raw(&mut self, from: usize, to: usize) -> usize {
        for token in &self.tokens[from..to] {
            self.builder
                .token(token.kind.into(), token_text(self.source, token));
        }
        to
    }

    /// Flush pending trivia into the current node.
    pub(super) fn eat_trivia(&mut self) {
        self.pos = self.emit_raw(self.pos, self.significant());
    }

    /// Open the root without flushing, so leading trivia lands inside it.
    pub(super) fn start_root(&mut self) {
        self.builder.start_node(SyntaxKind::Root.into());
    }

    pub(super) fn start_node(&mut self, kind: SyntaxKind) {
        self.eat_trivia();
        self.builder.start_node(kind.into());
    }

    pub(super) fn start_node_at(&mut self, checkpoint: Checkpoint, kind: SyntaxKind) {
        self.builder.start_node_at(checkpoint, kind.into());
    }

    pub(super) fn finish_node(&mut self) {
        self.builder.finish_node();
    }

    pub(super) fn checkpoint(&mut self) -> Checkpoint {
        self.eat_trivia();
        self.builder.checkpoint()
    }

    /// Consume the next non-trivia token along with the trivia before it.
    pub(super) fn bump(&mut self) {
        let next = self.significant();
        assert!(next < self.tokens.len(), "bump past the end of the query");
        self.lookaheads_left.set(LOOKAHEAD_LIMIT);
        self.pos = self.emit_raw(self.pos, next + 1);
    }

    pub(super) fn eat_token(&mut self, kind: SyntaxKind) -> bool {
        let found = self.currently_is(kind);
        if found {
            self.bump();
        }
        found
    }

    /// Consume `kind`, or report what was expected and consume nothing.
    pub(super) fn expect(&mut self, kind: SyntaxKind, what: &str) -> bool {
        if self.eat_token(kind) {
            return true;
        }
        self.error_msg(DiagnosticKind::UnexpectedToken, format!("expected {what}"));
        false
    }

    /// Wrap the next token in an `Error` node.
    pub(super) fn bump_as_error(&mut self) {
        if self.eof() {
            return;
        }
        self.start_node(SyntaxKind::Error);
        self.bump();
        self.finish_node();
    }

    /// Claims `range` for a report. Follow-up errors at the same offset are
    /// dropped.
    fn claim(&mut self, range: TextRange) -> bool {
        let fresh = self.last_report != Some(range.start());
        self.last_report = Some(range.start());
        fresh
    }

    pub(super) fn error(&mut self, kind: DiagnosticKind) {
        let range = self.current_span();
        if self.claim(range) {
            self.diagnostics.report(kind, range).emit();
        }
    }

    pub(super) fn error_msg(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        let range = self.current_span();
        if self.claim(range) {
            self.diagnostics.report(kind, range).message(message).emit();
        }
    }

    pub(super) fn error_and_bump(&mut self, kind: DiagnosticKind) {
        self.error(kind);
        self.bump_as_error();
    }

    pub(super) fn error_and_bump_msg(&mut self, kind: DiagnosticKind, message: impl Into<String>) {
        self.error_msg(kind, message);
        self.bump_as_error();
    }

    /// Report at the next token, then put everything up to a token of
    /// `stop` into one `Error` node.
    pub(super) fn error_recover(&mut self, kind: DiagnosticKind, message: &str, stop: TokenSet) {
        if self.eof() || self.currently_is_one_of(stop) {
            self.error_msg(kind, message);
            return;
        }
        self.start_node(SyntaxKind::Error);
        self.error_msg(kind, message);
        while !self.eof() && !self.currently_is_one_of(stop) {
            self.bump();
        }
        self.finish_node();
    }

    /// Report the next token with a suggested replacement.
    pub(super) fn error_with_fix(
        &mut self,
        kind: DiagnosticKind,
        message: impl Into<String>,
        fix: impl Into<String>,
        replacement: impl Into<String>,
    ) {
        let range = self.current_span();
        if self.claim(range) {
            self.diagnostics
                .report(kind, range)
                .message(message)
                .fix(fix, replacement)
                .emit();
        }
    }

    /// `false` once nesting reaches [`MAX_DEPTH`]; the caller bails out.
    pub(super) fn enter_recursion(&mut self) -> bool {
        if self.depth >= MAX_DEPTH {
            return false;
        }
        self.depth += 1;
        true
    }

    /// Leaving a level counts as progress, so unwinding a deep cut-off
    /// never runs the lookahead budget dry.
    pub(super) fn exit_recursion(&mut self) {
        self.lookaheads_left.set(LOOKAHEAD_LIMIT);
        self.depth = self.depth.saturating_sub(1);
    }

    /// Record the `(` about to be consumed.
    pub(super) fn open_paren(&mut self) {
        let span = self.current_span();
        self.open_parens.push(span);
    }

    pub(super) fn close_paren(&mut self) {
        self.open_parens.pop();
    }

    /// Report the innermost `(` as unclosed, spanning up to the current
    /// position.
    pub(super) fn error_unclosed(&mut self, kind: DiagnosticKind, message: &str, related: &str) {
        let Some(open) = self.open_parens.last().copied() else {
            return;
        };
        let current = self.current_span();
        if !self.claim(current) {
            return;
        }
        self.diagnostics
            .report(kind, TextRange::new(open.start(), current.end()))
            .message(message)
            .related_to(related, open)
            .emit();
    }
}
