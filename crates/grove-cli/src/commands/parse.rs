use std::fmt::Write;
use std::path::PathBuf;

use grove_core::Colors;
use grove_runtime::{InputEdit, Parser, PrintTracer, Tree};

use super::CliError;
use super::input::{load_grammar, load_table, read_bytes};
use super::render::{TreeOptions, format_tree, tree_to_json};
use crate::cli::SourceEdit;

pub struct ParseArgs {
    pub table_path: PathBuf,
    pub source_path: PathBuf,
    pub grammar_path: Option<PathBuf>,
    pub edits: Vec<SourceEdit>,
    pub spans: bool,
    pub raw: bool,
    pub json: bool,
    pub trace: bool,
    pub color: bool,
}

pub fn run(args: ParseArgs) -> Result<(), CliError> {
    print!("{}", execute(&args)?);
    Ok(())
}

/// Parse, then re-parse after `--edit`s; the output shows the final tree,
/// preceded by trace lines and followed by the reused subtrees.
pub fn execute(args: &ParseArgs) -> Result<String, CliError> {
    let table = load_table(&args.table_path)?;
    if let Some(path) = &args.grammar_path {
        let grammar = load_grammar(path)?;
        table
            .verify_grammar(&grammar)
            .map_err(|source| CliError::Table {
                path: args.table_path.clone(),
                source,
            })?;
    }

    let source = read_bytes(&args.source_path)?;
    let parser = Parser::new(table.clone());
    let colors = Colors::new(args.color);
    let mut out = String::new();

    let tree = parse_traced(&parser, &source, None, args.trace, colors, &mut out);
    if args.edits.is_empty() {
        out.push_str(&render(&tree, &source, args, colors)?);
        return Ok(out);
    }

    let (edited, edits) = apply_edits(&source, &args.edits)?;
    let new_tree = parse_traced(
        &parser,
        &edited,
        Some((&tree, edits.as_slice())),
        args.trace,
        colors,
        &mut out,
    );
    out.push_str(&render(&new_tree, &edited, args, colors)?);

    let shared = new_tree.shared_nodes(&tree);
    let _ = writeln!(out, "reused {} subtree(s)", shared.len());
    for node in shared {
        let _ = writeln!(
            out,
            "  {} [{}..{}]",
            node.kind(),
            node.start_byte(),
            node.end_byte()
        );
    }
    Ok(out)
}

fn parse_traced(
    parser: &Parser,
    source: &[u8],
    prior: Option<(&Tree, &[InputEdit])>,
    trace: bool,
    colors: Colors,
    out: &mut String,
) -> Tree {
    if !trace {
        return parser.parse_with(source, prior, &mut grove_runtime::NoopTracer);
    }
    let table = parser.table();
    let mut tracer = PrintTracer::new(table, colors);
    let tree = parser.parse_with(source, prior, &mut tracer);
    for line in tracer.lines() {
        out.push_str(line);
        out.push('\n');
    }
    tree
}

fn render(tree: &Tree, source: &[u8], args: &ParseArgs, colors: Colors) -> Result<String, CliError> {
    if args.json {
        return Ok(tree_to_json(tree, args.raw)?);
    }
    let options = TreeOptions {
        raw: args.raw,
        spans: args.spans,
        colors,
    };
    Ok(format_tree(tree, source, options))
}

/// Apply edits in order, each in the coordinates left by the previous one.
pub(super) fn apply_edits(
    source: &[u8],
    requested: &[SourceEdit],
) -> Result<(Vec<u8>, Vec<InputEdit>), CliError> {
    let mut text = source.to_vec();
    let mut edits = Vec::with_capacity(requested.len());
    for edit in requested {
        if edit.start > edit.end || edit.end > text.len() {
            return Err(CliError::EditOutOfBounds {
                start: edit.start,
                end: edit.end,
                len: text.len(),
            });
        }
        text.splice(edit.start..edit.end, edit.text.bytes());
        edits.push(InputEdit::replace(edit.start..edit.end, edit.text.len()));
    }
    Ok((text, edits))
}
