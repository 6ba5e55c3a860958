//! Loading grammars, tables and sources from disk.

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use grove_core::Grammar;
use grove_table::ParseTable;

use super::CliError;

/// Contents of `path`, or stdin for `-`.
pub fn read_bytes(path: &Path) -> Result<Vec<u8>, CliError> {
    let read = if path.as_os_str() == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf).map(|_| buf)
    } else {
        fs::read(path)
    };
    read.map_err(|source| CliError::Read {
        path: path.to_path_buf(),
        source,
    })
}

pub fn read_text(path: &Path) -> Result<String, CliError> {
    let bytes = read_bytes(path)?;
    String::from_utf8(bytes).map_err(|e| CliError::Read {
        path: path.to_path_buf(),
        source: io::Error::new(io::ErrorKind::InvalidData, e),
    })
}

/// `grammar.json` by extension, the binary grammar form otherwise.
pub fn load_grammar(path: &Path) -> Result<Grammar, CliError> {
    let is_json = path.extension().is_some_and(|ext| ext == "json");
    let grammar = if is_json {
        Grammar::from_json(&read_text(path)?)
    } else {
        Grammar::from_binary(&read_bytes(path)?)
    };
    grammar.map_err(|source| CliError::Grammar {
        path: path.to_path_buf(),
        source,
    })
}

pub fn load_table(path: &Path) -> Result<Arc<ParseTable>, CliError> {
    let table = ParseTable::from_path(path).map_err(|source| CliError::Table {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::debug!(
        path = %path.display(),
        grammar = table.grammar_name(),
        states = table.state_count(),
        "loaded parse table"
    );
    Ok(Arc::new(table))
}
