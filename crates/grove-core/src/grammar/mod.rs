//! Grammar types for tree-sitter grammars.
//!
//! This module provides types for representing tree-sitter `grammar.json` files,
//! with JSON round-tripping, compact binary serialization, validation, and a
//! stable fingerprint used to pair compiled tables with their source grammar.

mod binary;
mod json;
mod types;
mod validate;

#[cfg(test)]
mod json_tests;

pub use types::{Grammar, Precedence, PrecedenceEntry, Rule, is_hidden_name};

/// Errors raised while loading or validating a grammar.
#[derive(Debug, thiserror::Error)]
pub enum GrammarError {
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("binary decode error: {0}")]
    Binary(#[from] postcard::Error),

    #[error("grammar `{0}` defines no rules, so it has no start rule")]
    StartRuleMissing(String),

    #[error("rule `{name}` is defined more than once")]
    DuplicateRule { name: String },

    #[error("undefined symbol `{name}` referenced by `{referenced_by}`")]
    UndefinedSymbol { name: String, referenced_by: String },

    #[error("rule `{name}` is unreachable from the start rule `{start}`")]
    UnreachableRule { name: String, start: String },
}
