//! Text and JSON renderings of syntax trees.

use grove_core::Colors;
use grove_runtime::{Node, Tree};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default)]
pub struct TreeOptions {
    /// Include anonymous nodes.
    pub raw: bool,
    pub spans: bool,
    pub colors: Colors,
}

/// Indented S-expression, one node per line; leaves show their text.
pub fn format_tree(tree: &Tree, source: &[u8], options: TreeOptions) -> String {
    let mut out = String::new();
    format_node(tree.root_node(), source, 0, options, &mut out);
    out.push('\n');
    out
}

fn format_node(node: Node<'_>, source: &[u8], depth: usize, options: TreeOptions, out: &mut String) {
    let c = &options.colors;
    out.push_str(&"  ".repeat(depth));
    if let Some(field) = node.field_name() {
        out.push_str(&format!("{}{field}:{} ", c.dim, c.reset));
    }

    let kind = node.kind();
    let color = if node.is_error() {
        c.red
    } else if node.is_named() {
        c.blue
    } else {
        c.green
    };
    let span = if options.spans {
        format!(" {}[{}..{}]{}", c.dim, node.start_byte(), node.end_byte(), c.reset)
    } else {
        String::new()
    };

    let children: Vec<_> = node
        .children()
        .into_iter()
        .filter(|child| options.raw || child.is_named())
        .collect();

    if children.is_empty() {
        let text = String::from_utf8_lossy(&source[node.byte_range()]);
        if text == kind {
            out.push_str(&format!("({color}\"{}\"{}){span}", escape_string(kind), c.reset));
        } else {
            out.push_str(&format!(
                "({color}{kind}{} \"{}\"){span}",
                c.reset,
                escape_string(&text)
            ));
        }
        return;
    }

    out.push_str(&format!("({color}{kind}{}{span}", c.reset));
    for child in children {
        out.push('\n');
        format_node(child, source, depth + 1, options, out);
    }
    out.push(')');
}

fn escape_string(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            c if c.is_control() => result.push_str(&format!("\\u{{{:04x}}}", c as u32)),
            c => result.push(c),
        }
    }
    result
}

#[derive(Debug, Serialize)]
struct JsonNode<'t> {
    kind: &'t str,
    named: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    field: Option<&'t str>,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    error: bool,
    start: usize,
    end: usize,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<JsonNode<'t>>,
}

impl<'t> JsonNode<'t> {
    fn new(node: Node<'t>, raw: bool) -> Self {
        Self {
            kind: node.kind(),
            named: node.is_named(),
            field: node.field_name(),
            error: node.is_error(),
            start: node.start_byte(),
            end: node.end_byte(),
            children: node
                .children()
                .into_iter()
                .filter(|child| raw || child.is_named())
                .map(|child| JsonNode::new(child, raw))
                .collect(),
        }
    }
}

pub fn tree_to_json(tree: &Tree, raw: bool) -> Result<String, serde_json::Error> {
    let mut json = serde_json::to_string_pretty(&JsonNode::new(tree.root_node(), raw))?;
    json.push('\n');
    Ok(json)
}
