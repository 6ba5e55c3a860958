use std::fmt::Write;
use std::path::PathBuf;

use grove_runtime::Lexer;

use super::CliError;
use super::input::{load_table, read_bytes};

pub struct TokensArgs {
    pub table_path: PathBuf,
    pub source_path: PathBuf,
}

pub fn run(args: TokensArgs) -> Result<(), CliError> {
    print!("{}", execute(&args)?);
    Ok(())
}

/// One line per token: kind, byte span, text. Anonymous kinds are quoted.
pub fn execute(args: &TokensArgs) -> Result<String, CliError> {
    let table = load_table(&args.table_path)?;
    let source = read_bytes(&args.source_path)?;

    let mut out = String::new();
    for token in Lexer::new(&table, &source).tokens() {
        if token.is_eof() {
            break;
        }
        let symbol = table.symbol(token.symbol);
        let kind = if symbol.named {
            symbol.name.clone()
        } else {
            format!("{:?}", symbol.name)
        };
        let text = String::from_utf8_lossy(&source[token.start..token.end]);
        let _ = writeln!(out, "{kind} [{}..{}] {:?}", token.start, token.end, text);
    }
    Ok(out)
}
