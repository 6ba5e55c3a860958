#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Grove table compiler: grammar in, parse table out.
//!
//! Pipeline:
//! - `prepare` - intern rules, extract tokens, expand repeats
//! - `flatten` - rules to productions with per-step metadata
//! - `first` - FIRST sets and nullability
//! - `automaton` - canonical LR(1) item sets
//! - `conflicts` - precedence, declared conflicts, tie-break
//! - `lexical` - token DFAs, overlap analysis, keywords
//! - `minimize` - merge compatible states
//! - `emit` - build the [`ParseTable`]

mod automaton;
mod config;
mod conflicts;
mod emit;
mod first;
mod flatten;
mod lexical;
mod minimize;
mod precedence;
mod prepare;
mod report;

#[cfg(test)]
mod lexical_tests;
#[cfg(test)]
mod precedence_tests;
#[cfg(test)]
mod prepare_tests;

use grove_core::{Grammar, GrammarError};
use grove_table::{ParseTable, TableError};

pub use config::{CompileConfig, TieBreak};
pub use report::{ConflictReport, LexicalConflict, LexicalResolution, ParseConflict, Resolution};

/// Errors that can occur while compiling a grammar.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    /// Two actions remain on one lookahead with nothing to choose between them.
    #[error("ambiguous grammar: `{first}` conflicts with `{second}` on lookahead {lookahead}")]
    AmbiguousGrammar {
        first: String,
        second: String,
        lookahead: String,
    },

    #[error("parse table exceeds the limit of {limit} states")]
    StateLimitExceeded { limit: usize },

    #[error("invalid pattern in `{rule}`: {message}")]
    InvalidPattern { rule: String, message: String },

    #[error("invalid token `{rule}`: {message}")]
    InvalidToken { rule: String, message: String },

    #[error("external token `{0}` needs an external scanner, which is not supported")]
    UnsupportedExternal(String),

    #[error("extra `{0}` must be a token")]
    UnsupportedExtra(String),

    /// More states, symbols or productions than 16-bit table ids address.
    #[error("grammar needs {count} {what}, more than the table limit of {limit}")]
    TableTooLarge {
        what: &'static str,
        count: usize,
        limit: usize,
    },

    #[error(transparent)]
    Table(#[from] TableError),
}

/// Result type for compilation.
pub type Result<T> = std::result::Result<T, Error>;

/// A compiled grammar.
#[derive(Debug)]
pub struct Compiled {
    pub table: ParseTable,
    pub report: ConflictReport,
}

/// Compile a grammar into a parse table.
///
/// Pure: the same grammar and config always produce the same table bytes.
pub fn compile(grammar: &Grammar, config: &CompileConfig) -> Result<Compiled> {
    grammar.validate()?;

    let prepared = prepare::prepare(grammar)?;
    let productions = flatten::flatten(&prepared);
    let first = first::FirstSets::compute(&prepared, &productions);
    let lexical = lexical::analyze(&prepared)?;
    let automaton = automaton::build(&productions, &first, config.max_states)?;

    let mut report = ConflictReport::default();
    let rows = conflicts::resolve(
        &prepared,
        &productions,
        &automaton,
        config.tie_break,
        &mut report,
    )?;
    let rows = minimize::minimize(rows, &lexical);
    lexical.report_conflicts(&prepared, &rows, &mut report);

    tracing::debug!(
        grammar = %grammar.name,
        canonical_states = automaton.states.len(),
        states = rows.len(),
        "compiled parse table"
    );

    let data = emit::emit(&prepared, &productions, &rows, &lexical)?;
    let table = ParseTable::new(data, grammar.fingerprint()?)?;
    Ok(Compiled { table, report })
}
