//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! - `*Params` structs are populated from clap
//! - `Into<*Args>` impls bridge dispatch to the command handlers

use std::path::PathBuf;

use clap::ArgMatches;
use grove_compiler::TieBreak;

use super::ColorChoice;
use super::args::SourceEdit;
use crate::commands::dump::DumpArgs;
use crate::commands::generate::GenerateArgs;
use crate::commands::parse::ParseArgs;
use crate::commands::query::QueryArgs;
use crate::commands::tokens::TokensArgs;

pub struct GenerateParams {
    pub grammar_path: PathBuf,
    pub output: Option<PathBuf>,
    pub tie_break: TieBreak,
    pub max_states: Option<usize>,
}

impl GenerateParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        let tie_break = match m.get_one::<String>("tie_break").map(String::as_str) {
            Some("off") => TieBreak::Off,
            _ => TieBreak::DeclarationOrder,
        };
        Self {
            grammar_path: required_path(m, "grammar_path"),
            output: m.get_one::<PathBuf>("output").cloned(),
            tie_break,
            max_states: m.get_one::<usize>("max_states").copied(),
        }
    }
}

impl From<GenerateParams> for GenerateArgs {
    fn from(p: GenerateParams) -> Self {
        Self {
            grammar_path: p.grammar_path,
            output: p.output,
            tie_break: p.tie_break,
            max_states: p.max_states,
        }
    }
}

pub struct ParseParams {
    pub table_path: PathBuf,
    pub source_path: PathBuf,
    pub grammar_path: Option<PathBuf>,
    pub edits: Vec<SourceEdit>,
    pub spans: bool,
    pub raw: bool,
    pub json: bool,
    pub trace: bool,
    pub color: ColorChoice,
}

impl ParseParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            table_path: required_path(m, "table_path"),
            source_path: required_path(m, "source_path"),
            grammar_path: m.get_one::<PathBuf>("grammar").cloned(),
            edits: m
                .get_many::<SourceEdit>("edit")
                .map(|edits| edits.cloned().collect())
                .unwrap_or_default(),
            spans: m.get_flag("spans"),
            raw: m.get_flag("raw"),
            json: m.get_flag("json"),
            trace: m.get_flag("trace"),
            color: parse_color(m),
        }
    }
}

impl From<ParseParams> for ParseArgs {
    fn from(p: ParseParams) -> Self {
        Self {
            table_path: p.table_path,
            source_path: p.source_path,
            grammar_path: p.grammar_path,
            edits: p.edits,
            spans: p.spans,
            raw: p.raw,
            json: p.json,
            trace: p.trace,
            color: p.color.should_colorize(),
        }
    }
}

pub struct QueryParams {
    pub table_path: PathBuf,
    pub source_path: PathBuf,
    pub query_path: Option<PathBuf>,
    pub query_text: Option<String>,
    pub color: ColorChoice,
}

impl QueryParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            table_path: required_path(m, "table_path"),
            source_path: required_path(m, "source_path"),
            query_path: m.get_one::<PathBuf>("query_path").cloned(),
            query_text: m.get_one::<String>("query_text").cloned(),
            color: parse_color(m),
        }
    }
}

impl From<QueryParams> for QueryArgs {
    fn from(p: QueryParams) -> Self {
        Self {
            table_path: p.table_path,
            source_path: p.source_path,
            query_path: p.query_path,
            query_text: p.query_text,
            color: p.color.should_colorize(),
        }
    }
}

pub struct TokensParams {
    pub table_path: PathBuf,
    pub source_path: PathBuf,
}

impl TokensParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            table_path: required_path(m, "table_path"),
            source_path: required_path(m, "source_path"),
        }
    }
}

impl From<TokensParams> for TokensArgs {
    fn from(p: TokensParams) -> Self {
        Self {
            table_path: p.table_path,
            source_path: p.source_path,
        }
    }
}

pub struct DumpParams {
    pub table_path: PathBuf,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            table_path: required_path(m, "table_path"),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            table_path: p.table_path,
        }
    }
}

/// Positional marked `required(true)`, so clap has already rejected its absence.
fn required_path(m: &ArgMatches, id: &str) -> PathBuf {
    m.get_one::<PathBuf>(id).cloned().unwrap_or_default()
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
