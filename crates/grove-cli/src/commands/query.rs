use std::fmt::Write;
use std::path::PathBuf;

use grove_query::{Query, QueryCursor};
use grove_runtime::Parser;

use super::CliError;
use super::input::{load_table, read_bytes, read_text};

pub struct QueryArgs {
    pub table_path: PathBuf,
    pub source_path: PathBuf,
    pub query_path: Option<PathBuf>,
    pub query_text: Option<String>,
    pub color: bool,
}

#[derive(Debug)]
pub struct QueryOutput {
    pub matches: String,
    /// Rendered query warnings, empty when there are none.
    pub warnings: String,
}

pub fn run(args: QueryArgs) -> Result<(), CliError> {
    let output = execute(&args)?;
    eprint!("{}", output.warnings);
    print!("{}", output.matches);
    Ok(())
}

pub fn execute(args: &QueryArgs) -> Result<QueryOutput, CliError> {
    let table = load_table(&args.table_path)?;
    let (text, origin) = match (&args.query_text, &args.query_path) {
        (Some(text), _) => (text.clone(), "<query>".to_string()),
        (None, Some(path)) => (read_text(path)?, path.display().to_string()),
        (None, None) => return Err(CliError::MissingQuery),
    };

    let query = Query::new(&table, &text).map_err(|error| {
        let rendered = error
            .diagnostics()
            .printer()
            .source(&text)
            .path(&origin)
            .colored(args.color)
            .render();
        CliError::Query {
            error,
            rendered: rendered + "\n",
        }
    })?;

    let warnings = if query.warnings().is_empty() {
        String::new()
    } else {
        let rendered = query
            .warnings()
            .printer()
            .source(&text)
            .path(&origin)
            .colored(args.color)
            .render();
        rendered + "\n"
    };

    let source = read_bytes(&args.source_path)?;
    let tree = Parser::new(table.clone()).parse(&source);

    let mut matches = String::new();
    for m in QueryCursor::new().matches(&query, tree.root_node()) {
        let _ = writeln!(matches, "pattern {}", m.pattern_index);
        for capture in &m.captures {
            let name = query
                .capture_names()
                .get(capture.index as usize)
                .map_or("?", String::as_str);
            let node = capture.node;
            let text = String::from_utf8_lossy(&source[node.byte_range()]);
            let _ = writeln!(
                matches,
                "  @{name} {} [{}..{}] {:?}",
                node.kind(),
                node.start_byte(),
                node.end_byte(),
                text
            );
        }
    }
    tracing::debug!(patterns = query.pattern_count(), "ran query");

    Ok(QueryOutput { matches, warnings })
}
