//! Parser infrastructure for the query language.
//!
//! # Architecture
//!
//! The parser produces a lossless concrete syntax tree (CST) with Rowan's
//! green tree builder:
//!
//! - Zero-copy lexing: tokens carry spans, text is sliced only when building tree nodes
//! - Trivia buffering: whitespace and comments are attached in front of the next element
//! - Checkpoint-based wrapping: quantifiers and captures wrap the preceding pattern
//!
//! # Recovery
//!
//! The parser always produces a tree. Unknown tokens are wrapped in
//! `SyntaxKind::Error` nodes and consumed; missing tokens produce a
//! diagnostic without consuming anything; past the nesting limit, the rest
//! of the input goes into one `Error` node.

pub mod cst;
pub mod lexer;

mod core;
mod grammar;
mod invariants;

#[cfg(test)]
mod cst_tests;
#[cfg(test)]
mod grammar_tests;
#[cfg(test)]
mod lexer_tests;

use std::fmt::Write;

use rowan::{GreenNode, NodeOrToken};

pub use self::core::Parser;
pub use cst::{SyntaxKind, SyntaxNode, SyntaxToken};

use crate::diagnostics::Diagnostics;
use lexer::lex;

/// Parse result: the green tree plus the problems found on the way.
#[derive(Debug, Clone)]
pub struct Parse {
    cst: GreenNode,
    diagnostics: Diagnostics,
}

impl Parse {
    pub fn as_cst(&self) -> &GreenNode {
        &self.cst
    }

    /// A typed view over the immutable green tree.
    pub fn syntax(&self) -> SyntaxNode {
        SyntaxNode::new_root(self.cst.clone())
    }

    pub fn diagnostics(&self) -> &Diagnostics {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Diagnostics {
        self.diagnostics
    }

    /// Indented CST listing, one element per line. Trivia tokens are listed
    /// only when `trivia` is set.
    pub fn dump(&self, trivia: bool) -> String {
        let mut out = String::new();
        dump_node(&self.syntax(), 0, trivia, &mut out);
        out
    }
}

pub fn parse(source: &str) -> Parse {
    let mut parser = Parser::new(source, lex(source));
    parser.parse_root();
    let (cst, diagnostics) = parser.finish();
    Parse { cst, diagnostics }
}

fn dump_node(node: &SyntaxNode, depth: usize, trivia: bool, out: &mut String) {
    let _ = writeln!(out, "{:indent$}{:?}", "", node.kind(), indent = depth * 2);
    for child in node.children_with_tokens() {
        match child {
            NodeOrToken::Node(child) => dump_node(&child, depth + 1, trivia, out),
            NodeOrToken::Token(token) => {
                if !trivia && token.kind().is_trivia() {
                    continue;
                }
                let _ = writeln!(
                    out,
                    "{:indent$}{:?} {:?}",
                    "",
                    token.kind(),
                    token.text(),
                    indent = (depth + 1) * 2
                );
            }
        }
    }
}
