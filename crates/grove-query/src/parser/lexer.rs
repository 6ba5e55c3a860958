//! Query tokenizer.
//!
//! Tokens are kinds plus spans. A run of characters no rule accepts becomes
//! a single `Garbage` token, and each string literal is split into its
//! quotes and body so the parser sees `"` `StrVal` `"`.

use std::ops::Range;

use logos::Logos;
use rowan::{TextRange, TextSize};

use super::cst::SyntaxKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token {
    pub kind: SyntaxKind,
    pub span: TextRange,
}

struct TokenSink {
    tokens: Vec<Token>,
    garbage_from: Option<usize>,
}

impl TokenSink {
    fn push(&mut self, kind: SyntaxKind, bytes: Range<usize>) {
        let span = TextRange::new(
            TextSize::from(bytes.start as u32),
            TextSize::from(bytes.end as u32),
        );
        self.tokens.push(Token { kind, span });
    }

    /// Close an open garbage run at `end`.
    fn end_garbage(&mut self, end: usize) {
        if let Some(start) = self.garbage_from.take() {
            self.push(SyntaxKind::Garbage, start..end);
        }
    }
}

pub fn lex(source: &str) -> Vec<Token> {
    let mut sink = TokenSink {
        tokens: Vec::new(),
        garbage_from: None,
    };

    for (result, span) in SyntaxKind::lexer(source).spanned() {
        let Ok(kind) = result else {
            sink.garbage_from.get_or_insert(span.start);
            continue;
        };
        sink.end_garbage(span.start);

        if kind != SyntaxKind::StringLiteral {
            sink.push(kind, span);
            continue;
        }
        let Range { start, end } = span;
        sink.push(SyntaxKind::DoubleQuote, start..start + 1);
        if end - start > 2 {
            sink.push(SyntaxKind::StrVal, start + 1..end - 1);
        }
        sink.push(SyntaxKind::DoubleQuote, end - 1..end);
    }
    sink.end_garbage(source.len());

    sink.tokens
}

pub fn token_text<'q>(source: &'q str, token: &Token) -> &'q str {
    &source[token.span]
}
