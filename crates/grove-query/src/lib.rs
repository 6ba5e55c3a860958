#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Grove queries: tree-sitter style S-expression patterns over syntax trees.
//!
//! ```text
//! (binary_expression
//!   left: (number) @lhs
//!   operator: "+"
//!   !extra
//!   (comment)* @notes)
//! ```
//!
//! [`Query::new`] parses the pattern source into a lossless CST, reports
//! problems as [`Diagnostics`] and resolves node kinds and fields against a
//! parse table. [`QueryCursor::matches`] then walks a tree and yields
//! [`QueryMatch`]es lazily.

pub mod diagnostics;
pub mod parser;

mod cursor;
mod query;

#[cfg(test)]
mod test_tables;

pub use cursor::{QueryCapture, QueryCursor, QueryMatch, QueryMatches};
pub use diagnostics::{DiagnosticKind, Diagnostics, DiagnosticsPrinter, Severity};
pub use query::{Query, QueryError};
