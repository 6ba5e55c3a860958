use std::path::PathBuf;

use super::CliError;
use super::input::load_table;

pub struct DumpArgs {
    pub table_path: PathBuf,
}

pub fn run(args: DumpArgs) -> Result<(), CliError> {
    print!("{}", execute(&args)?);
    Ok(())
}

/// Header, symbols, fields, productions, lex modes and states of a table.
pub fn execute(args: &DumpArgs) -> Result<String, CliError> {
    let table = load_table(&args.table_path)?;
    Ok(grove_table::dump(&table))
}
