//! Compiled queries: patterns resolved against one parse table.

use std::ops::Range;

use grove_table::{FieldId, ParseTable, SymbolId};
use rowan::TextRange;

use crate::diagnostics::{DiagnosticKind, Diagnostics};
use crate::parser::cst::token_sets::QUANTIFIERS;
use crate::parser::{self, SyntaxKind, SyntaxNode, SyntaxToken};

/// What a pattern requires of the node itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum NodeTest {
    /// `_`
    Any,
    /// `(_)`
    AnyNamed,
    /// `(ERROR)`
    Error,
    /// `(kind)` or `"literal"`, resolved to every visible symbol so named.
    Symbols(Vec<SymbolId>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Repeat {
    One,
    Optional,
    ZeroOrMore,
    OneOrMore,
}

/// One node of a compiled pattern.
#[derive(Debug, Clone)]
pub(crate) struct PatternNode {
    pub test: NodeTest,
    /// Field label the matched node must carry.
    pub field: Option<FieldId>,
    /// Fields no child of the matched node may carry.
    pub absent_fields: Vec<FieldId>,
    /// Child patterns, matched in order against a subsequence of children.
    pub children: Vec<PatternNode>,
    pub repeat: Repeat,
    pub captures: Vec<u32>,
}

impl PatternNode {
    fn new(test: NodeTest) -> Self {
        Self {
            test,
            field: None,
            absent_fields: Vec::new(),
            children: Vec::new(),
            repeat: Repeat::One,
            captures: Vec::new(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum QueryError {
    #[error("invalid query: {} syntax error(s)", .0.error_count())]
    Syntax(Diagnostics),
    #[error("unknown node kind `{name}` at {}..{}", range.start, range.end)]
    UnknownKind { name: String, range: Range<usize> },
    #[error("unknown field `{name}` at {}..{}", range.start, range.end)]
    UnknownField { name: String, range: Range<usize> },
}

impl QueryError {
    /// The problem as diagnostics, for rendering against the query source.
    pub fn diagnostics(&self) -> Diagnostics {
        match self {
            QueryError::Syntax(diagnostics) => diagnostics.filtered(),
            QueryError::UnknownKind { name, range } => {
                single(DiagnosticKind::UnknownKind, name, range)
            }
            QueryError::UnknownField { name, range } => {
                single(DiagnosticKind::UnknownField, name, range)
            }
        }
    }
}

fn single(kind: DiagnosticKind, name: &str, range: &Range<usize>) -> Diagnostics {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(kind, text_range(range))
        .message(name)
        .emit();
    diagnostics
}

/// A set of patterns resolved against a [`ParseTable`].
///
/// Only trees produced with a table of the same grammar fingerprint are
/// matched; other trees yield no matches.
#[derive(Debug, Clone)]
pub struct Query {
    pub(crate) patterns: Vec<PatternNode>,
    pattern_ranges: Vec<Range<usize>>,
    capture_names: Vec<String>,
    pub(crate) fingerprint: u32,
    warnings: Diagnostics,
}

impl Query {
    pub fn new(table: &ParseTable, source: &str) -> Result<Self, QueryError> {
        let parse = parser::parse(source);
        if parse.diagnostics().has_errors() {
            return Err(QueryError::Syntax(parse.into_diagnostics()));
        }

        let mut resolver = Resolver {
            table,
            capture_names: Vec::new(),
            warnings: Diagnostics::new(),
        };
        let mut patterns = Vec::new();
        let mut pattern_ranges = Vec::new();

        for pattern in parse.syntax().children() {
            if pattern.kind() != SyntaxKind::Pattern {
                continue;
            }
            let Some(expr) = pattern.first_child() else {
                continue;
            };
            let mut compiled = resolver.expr(&expr)?;
            if compiled.repeat != Repeat::One {
                let range = quantifier_range(&expr).unwrap_or_else(|| expr.text_range());
                resolver
                    .warnings
                    .report(DiagnosticKind::TopLevelQuantifier, range)
                    .emit();
                compiled.repeat = Repeat::One;
            }
            patterns.push(compiled);
            pattern_ranges.push(range_of(&expr));
        }

        Ok(Query {
            patterns,
            pattern_ranges,
            capture_names: resolver.capture_names,
            fingerprint: table.fingerprint(),
            warnings: resolver.warnings,
        })
    }

    pub fn pattern_count(&self) -> usize {
        self.patterns.len()
    }

    /// Byte range of a top-level pattern in the query source.
    pub fn pattern_range(&self, index: usize) -> Option<Range<usize>> {
        self.pattern_ranges.get(index).cloned()
    }

    /// Capture names in order of first appearance; a capture's index points here.
    pub fn capture_names(&self) -> &[String] {
        &self.capture_names
    }

    pub fn capture_index(&self, name: &str) -> Option<u32> {
        self.capture_names
            .iter()
            .position(|n| n == name)
            .map(|i| i as u32)
    }

    /// Non-fatal problems found while compiling.
    pub fn warnings(&self) -> &Diagnostics {
        &self.warnings
    }
}

struct Resolver<'t> {
    table: &'t ParseTable,
    capture_names: Vec<String>,
    warnings: Diagnostics,
}

impl Resolver<'_> {
    fn expr(&mut self, node: &SyntaxNode) -> Result<PatternNode, QueryError> {
        match node.kind() {
            SyntaxKind::Tree => self.tree(node),
            SyntaxKind::Wildcard => Ok(PatternNode::new(NodeTest::Any)),
            SyntaxKind::Str => self.literal(node),
            SyntaxKind::Field => self.field(node),
            SyntaxKind::Quantifier => {
                let mut inner = self.inner(node)?;
                let quantifier = direct_token(node, |k| QUANTIFIERS.contains(k));
                inner.repeat = match quantifier.map(|t| t.kind()) {
                    Some(SyntaxKind::Star) => Repeat::ZeroOrMore,
                    Some(SyntaxKind::Plus) => Repeat::OneOrMore,
                    _ => Repeat::Optional,
                };
                Ok(inner)
            }
            SyntaxKind::Capture => {
                let mut inner = self.inner(node)?;
                if let Some(name) = direct_token(node, |k| k == SyntaxKind::Id) {
                    inner.captures.push(self.capture(name.text()));
                }
                Ok(inner)
            }
            _ => Err(malformed(node)),
        }
    }

    /// The pattern a wrapper node applies to.
    fn inner(&mut self, node: &SyntaxNode) -> Result<PatternNode, QueryError> {
        let inner = node.first_child().ok_or_else(|| malformed(node))?;
        self.expr(&inner)
    }

    fn tree(&mut self, node: &SyntaxNode) -> Result<PatternNode, QueryError> {
        let head = direct_token(node, |k| {
            matches!(k, SyntaxKind::Underscore | SyntaxKind::Id | SyntaxKind::KwError)
        })
        .ok_or_else(|| malformed(node))?;

        let test = match head.kind() {
            SyntaxKind::Underscore => NodeTest::AnyNamed,
            SyntaxKind::KwError => NodeTest::Error,
            _ => NodeTest::Symbols(self.kind(head.text(), true, head.text_range())?),
        };

        let mut pattern = PatternNode::new(test);
        for child in node.children() {
            if child.kind() == SyntaxKind::NegatedField {
                let name = direct_token(&child, |k| k == SyntaxKind::Id)
                    .ok_or_else(|| malformed(&child))?;
                let field = self.field_id(name.text(), name.text_range())?;
                pattern.absent_fields.push(field);
            } else {
                pattern.children.push(self.expr(&child)?);
            }
        }
        Ok(pattern)
    }

    fn literal(&mut self, node: &SyntaxNode) -> Result<PatternNode, QueryError> {
        let value = direct_token(node, |k| k == SyntaxKind::StrVal)
            .map(|t| unescape(t.text()))
            .unwrap_or_default();
        let ids = self.kind(&value, false, node.text_range())?;
        Ok(PatternNode::new(NodeTest::Symbols(ids)))
    }

    fn field(&mut self, node: &SyntaxNode) -> Result<PatternNode, QueryError> {
        let name = direct_token(node, |k| k == SyntaxKind::Id).ok_or_else(|| malformed(node))?;
        let field = self.field_id(name.text(), name.text_range())?;
        let mut value = self.inner(node)?;
        value.field = Some(field);
        Ok(value)
    }

    fn kind(&self, name: &str, named: bool, range: TextRange) -> Result<Vec<SymbolId>, QueryError> {
        let ids: Vec<SymbolId> = self
            .table
            .symbols_named(name, named)
            .filter(|&id| self.table.symbol(id).visible)
            .collect();
        if ids.is_empty() {
            let name = if named {
                name.to_string()
            } else {
                format!("\"{name}\"")
            };
            return Err(QueryError::UnknownKind {
                name,
                range: to_range(range),
            });
        }
        Ok(ids)
    }

    fn field_id(&self, name: &str, range: TextRange) -> Result<FieldId, QueryError> {
        self.table
            .field_id(name)
            .ok_or_else(|| QueryError::UnknownField {
                name: name.to_string(),
                range: to_range(range),
            })
    }

    fn capture(&mut self, name: &str) -> u32 {
        match self.capture_names.iter().position(|n| n == name) {
            Some(index) => index as u32,
            None => {
                self.capture_names.push(name.to_string());
                (self.capture_names.len() - 1) as u32
            }
        }
    }
}

fn direct_token(node: &SyntaxNode, accept: impl Fn(SyntaxKind) -> bool) -> Option<SyntaxToken> {
    node.children_with_tokens()
        .filter_map(|element| element.into_token())
        .find(|token| accept(token.kind()))
}

/// Range of the quantifier token of a top-level pattern, looking through captures.
fn quantifier_range(expr: &SyntaxNode) -> Option<TextRange> {
    let mut node = expr.clone();
    while node.kind() == SyntaxKind::Capture {
        node = node.first_child()?;
    }
    let token = direct_token(&node, |k| QUANTIFIERS.contains(k))?;
    Some(token.text_range())
}

/// A CST shape the parser reports as an error; unreachable once parsing
/// produced no error diagnostics.
fn malformed(node: &SyntaxNode) -> QueryError {
    let mut diagnostics = Diagnostics::new();
    diagnostics
        .report(DiagnosticKind::UnexpectedToken, node.text_range())
        .emit();
    QueryError::Syntax(diagnostics)
}

fn unescape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('0') => out.push('\0'),
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }
    out
}

fn range_of(node: &SyntaxNode) -> Range<usize> {
    to_range(node.text_range())
}

fn to_range(range: TextRange) -> Range<usize> {
    range.start().into()..range.end().into()
}

fn text_range(range: &Range<usize>) -> TextRange {
    TextRange::new((range.start as u32).into(), (range.end as u32).into())
}
