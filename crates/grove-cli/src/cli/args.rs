//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};

/// Grammar file (positional): `grammar.json`, or the binary form otherwise.
pub fn grammar_path_arg() -> Arg {
    Arg::new("grammar_path")
        .value_name("GRAMMAR")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Grammar file (grammar.json or binary grammar)")
}

/// Output path (-o/--output).
pub fn output_arg() -> Arg {
    Arg::new("output")
        .short('o')
        .long("output")
        .value_name("FILE")
        .value_parser(value_parser!(PathBuf))
        .help("Where to write the table [default: GRAMMAR with .grvt extension]")
}

/// Last-resort conflict rule (--tie-break).
pub fn tie_break_arg() -> Arg {
    Arg::new("tie_break")
        .long("tie-break")
        .value_name("RULE")
        .default_value("declaration-order")
        .value_parser(["declaration-order", "off"])
        .help("How to settle conflicts precedence leaves open")
}

/// State limit (--max-states).
pub fn max_states_arg() -> Arg {
    Arg::new("max_states")
        .long("max-states")
        .value_name("N")
        .value_parser(value_parser!(usize))
        .help("Fail when the automaton grows past N states")
}

/// Compiled table (positional).
pub fn table_path_arg() -> Arg {
    Arg::new("table_path")
        .value_name("TABLE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Compiled parse table")
}

/// Source file (positional, `-` for stdin).
pub fn source_path_arg() -> Arg {
    Arg::new("source_path")
        .value_name("SOURCE")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Source file to parse (- for stdin)")
}

/// Query file (positional).
pub fn query_path_arg() -> Arg {
    Arg::new("query_path")
        .value_name("QUERY")
        .value_parser(value_parser!(PathBuf))
        .help("Query file")
}

/// Inline query text (-q/--query).
pub fn query_text_arg() -> Arg {
    Arg::new("query_text")
        .short('q')
        .long("query")
        .value_name("TEXT")
        .conflicts_with("query_path")
        .help("Inline query text")
}

/// Grammar the table must have been compiled from (--grammar).
pub fn grammar_check_arg() -> Arg {
    Arg::new("grammar")
        .long("grammar")
        .value_name("GRAMMAR")
        .value_parser(value_parser!(PathBuf))
        .help("Reject the table unless it was compiled from this grammar")
}

/// Edits to apply before an incremental re-parse (--edit).
pub fn edit_arg() -> Arg {
    Arg::new("edit")
        .long("edit")
        .value_name("START:END:TEXT")
        .action(ArgAction::Append)
        .value_parser(parse_edit)
        .help("Replace bytes START..END with TEXT and re-parse incrementally (repeatable)")
}

/// Show byte spans (--spans).
pub fn spans_arg() -> Arg {
    Arg::new("spans")
        .long("spans")
        .action(ArgAction::SetTrue)
        .help("Show byte spans")
}

/// Include anonymous nodes (--raw).
pub fn raw_arg() -> Arg {
    Arg::new("raw")
        .long("raw")
        .action(ArgAction::SetTrue)
        .help("Include anonymous nodes (literals, punctuation)")
}

/// JSON output (--json).
pub fn json_arg() -> Arg {
    Arg::new("json")
        .long("json")
        .action(ArgAction::SetTrue)
        .help("Print the tree as JSON")
}

/// Engine event trace (--trace).
pub fn trace_arg() -> Arg {
    Arg::new("trace")
        .long("trace")
        .action(ArgAction::SetTrue)
        .help("Print parser events (shifts, reductions, splits, recovery)")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// One `--edit` value: replace `start..end` with `text`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceEdit {
    pub start: usize,
    pub end: usize,
    pub text: String,
}

/// `START:END:TEXT`; the text may itself contain `:`.
fn parse_edit(value: &str) -> Result<SourceEdit, String> {
    let mut parts = value.splitn(3, ':');
    let (Some(start), Some(end), Some(text)) = (parts.next(), parts.next(), parts.next()) else {
        return Err("expected START:END:TEXT".to_string());
    };
    let start: usize = start
        .parse()
        .map_err(|_| format!("invalid start offset `{start}`"))?;
    let end: usize = end
        .parse()
        .map_err(|_| format!("invalid end offset `{end}`"))?;
    if end < start {
        return Err(format!("end {end} is before start {start}"));
    }
    Ok(SourceEdit {
        start,
        end,
        text: text.to_string(),
    })
}
