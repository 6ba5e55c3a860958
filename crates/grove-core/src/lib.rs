#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for Grove.
//!
//! - [`grammar`]: the tree-sitter `grammar.json` model, its JSON and binary
//!   encodings, validation and fingerprinting.
//! - [`Interner`]: string interning used by the table compiler.
//! - [`Colors`]: ANSI palette shared by the CLI printers.

pub mod colors;
pub mod grammar;
mod interner;

#[cfg(test)]
mod interner_tests;

pub use colors::Colors;
pub use grammar::{Grammar, GrammarError, Precedence, PrecedenceEntry, Rule, is_hidden_name};
pub use interner::{Interner, Symbol};
