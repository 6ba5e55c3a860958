use std::fmt::Write;
use std::fs;
use std::path::PathBuf;

use grove_compiler::{CompileConfig, TieBreak, compile};

use super::CliError;
use super::input::load_grammar;

pub struct GenerateArgs {
    pub grammar_path: PathBuf,
    pub output: Option<PathBuf>,
    pub tie_break: TieBreak,
    pub max_states: Option<usize>,
}

pub fn run(args: GenerateArgs) -> Result<(), CliError> {
    print!("{}", execute(&args)?);
    Ok(())
}

/// Compile, write the table and describe what was written.
pub fn execute(args: &GenerateArgs) -> Result<String, CliError> {
    let grammar = load_grammar(&args.grammar_path)?;

    let mut config = CompileConfig {
        tie_break: args.tie_break,
        ..CompileConfig::default()
    };
    if let Some(max_states) = args.max_states {
        config.max_states = max_states;
    }
    let compiled = compile(&grammar, &config)?;

    let output = args
        .output
        .clone()
        .unwrap_or_else(|| args.grammar_path.with_extension("grvt"));
    let bytes = compiled
        .table
        .to_bytes()
        .map_err(|source| CliError::Table {
            path: output.clone(),
            source,
        })?;
    fs::write(&output, &bytes).map_err(|source| CliError::Write {
        path: output.clone(),
        source,
    })?;
    tracing::info!(path = %output.display(), bytes = bytes.len(), "wrote parse table");

    let mut out = String::new();
    if !compiled.report.is_empty() {
        let _ = write!(out, "{}", compiled.report);
    }
    let table = &compiled.table;
    let _ = writeln!(
        out,
        "wrote {}: {} states, {} symbols, {} bytes",
        output.display(),
        table.state_count(),
        table.symbol_count(),
        bytes.len()
    );
    Ok(out)
}
