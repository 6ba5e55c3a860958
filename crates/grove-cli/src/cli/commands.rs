//! Command builders for the CLI.
//!
//! Each command is built from the shared arg builders in `args.rs`.

use clap::Command;

use super::args::*;

/// Build the complete CLI with all subcommands.
pub fn build_cli() -> Command {
    Command::new("grove")
        .about("Grammar-driven incremental parsing")
        .after_help("Set GROVE_LOG (e.g. GROVE_LOG=debug) to see log output.")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(generate_command())
        .subcommand(parse_command())
        .subcommand(query_command())
        .subcommand(tokens_command())
        .subcommand(dump_command())
}

/// Compile a grammar into a parse table.
pub fn generate_command() -> Command {
    Command::new("generate")
        .about("Compile a grammar into a parse table")
        .after_help(
            r#"EXAMPLES:
  grove generate grammar.json                  # writes grammar.grvt
  grove generate grammar.json -o calc.grvt
  grove generate grammar.json --tie-break off  # fail on unresolved conflicts"#,
        )
        .arg(grammar_path_arg())
        .arg(output_arg())
        .arg(tie_break_arg())
        .arg(max_states_arg())
}

/// Parse a source file and print its tree.
pub fn parse_command() -> Command {
    Command::new("parse")
        .about("Parse a source file and print its syntax tree")
        .after_help(
            r#"EXAMPLES:
  grove parse calc.grvt input.calc
  grove parse calc.grvt input.calc --spans --raw
  grove parse calc.grvt input.calc --edit 4:5:total   # incremental re-parse
  grove parse calc.grvt input.calc --trace
  grove parse calc.grvt input.calc --grammar grammar.json"#,
        )
        .arg(table_path_arg())
        .arg(source_path_arg())
        .arg(grammar_check_arg())
        .arg(edit_arg())
        .arg(spans_arg())
        .arg(raw_arg())
        .arg(json_arg())
        .arg(trace_arg())
        .arg(color_arg())
}

/// Run a query over a parsed source file.
pub fn query_command() -> Command {
    Command::new("query")
        .about("Run a query over a source file and print its captures")
        .override_usage(
            "\
  grove query <TABLE> <SOURCE> <QUERY>
  grove query <TABLE> <SOURCE> -q <TEXT>",
        )
        .after_help(
            r#"EXAMPLES:
  grove query calc.grvt input.calc names.scm
  grove query calc.grvt input.calc -q '(let_statement name: (identifier) @name)'"#,
        )
        .arg(table_path_arg())
        .arg(source_path_arg())
        .arg(query_path_arg())
        .arg(query_text_arg())
        .arg(color_arg())
}

/// Print the token stream.
pub fn tokens_command() -> Command {
    Command::new("tokens")
        .about("Print the tokens of a source file, lexed with every token valid")
        .arg(table_path_arg())
        .arg(source_path_arg())
}

/// Describe a compiled table.
pub fn dump_command() -> Command {
    Command::new("dump")
        .about("Show the symbols, productions, lex modes and states of a parse table")
        .arg(table_path_arg())
}
