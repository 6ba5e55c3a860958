pub mod dump;
pub mod generate;
pub mod parse;
pub mod query;
pub mod tokens;

mod input;
mod render;

#[cfg(test)]
mod render_tests;

use std::io;
use std::path::PathBuf;

use grove_core::GrammarError;
use grove_query::QueryError;
use grove_table::TableError;

/// Failure of a CLI command; printed as one `error:` line unless it carries
/// rendered diagnostics.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("cannot read `{}`: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("cannot write `{}`: {source}", path.display())]
    Write { path: PathBuf, source: io::Error },

    #[error("invalid grammar `{}`: {source}", path.display())]
    Grammar { path: PathBuf, source: GrammarError },

    #[error(transparent)]
    Compile(#[from] grove_compiler::Error),

    #[error("cannot load table `{}`: {source}", path.display())]
    Table { path: PathBuf, source: TableError },

    #[error("{error}")]
    Query { error: QueryError, rendered: String },

    #[error("query required (positional QUERY or -q)")]
    MissingQuery,

    #[error("edit {start}..{end} is out of bounds for {len} bytes of source")]
    EditOutOfBounds { start: usize, end: usize, len: usize },

    #[error("cannot encode tree as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Pre-rendered diagnostics that replace the `error:` line.
    pub fn rendered(&self) -> Option<&str> {
        match self {
            CliError::Query { rendered, .. } => Some(rendered),
            _ => None,
        }
    }
}
