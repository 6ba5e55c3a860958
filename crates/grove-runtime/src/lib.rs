#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Grove runtime: contextual lexing, GLR parsing and syntax trees.
//!
//! A [`Parser`] pairs a shared [`ParseTable`](grove_table::ParseTable) with a
//! [`ParseConfig`]. Parsing never fails: malformed input becomes `ERROR`
//! nodes in the returned [`Tree`]. Re-parsing after edits with
//! [`Parser::parse_incremental`] shares unchanged subtrees with the prior
//! tree.

mod config;
mod engine;
mod incremental;
mod invariants;
mod lexer;
mod subtree;
mod trace;
mod tree;

#[cfg(test)]
mod lexer_tests;
#[cfg(test)]
mod test_tables;

pub use config::{ParseConfig, RecoveryConfig};
pub use engine::{Mode, Parser};
pub use incremental::InputEdit;
pub use lexer::{Lexer, Token, Tokens};
pub use trace::{NoopTracer, PrintTracer, Tracer};
pub use tree::{Node, Tree};
