//! Immutable, reference-counted parse subtrees.
//!
//! Subtrees store sizes, never absolute positions: `padding` is the trivia
//! before the node and `size` its own extent. A subtree can therefore be
//! shared between trees whose text differs before it.

use std::ops::Deref;
use std::sync::Arc;

use grove_table::{LexModeId, ProductionId, StateId, SymbolId};

use crate::lexer::Token;

#[derive(Debug)]
pub(crate) struct SubtreeData {
    pub symbol: SymbolId,
    pub padding: usize,
    pub size: usize,
    /// Bytes past the end whose change invalidates this subtree.
    pub lookahead_bytes: usize,
    /// State on top of the stack when the subtree was pushed.
    pub parse_state: StateId,
    /// Lex mode of the first leaf.
    pub lex_mode: LexModeId,
    /// Lex mode of the token that followed, for nodes.
    pub next_lex_mode: LexModeId,
    pub production: ProductionId,
    /// Lexed token rather than a reduction or error node.
    pub leaf: bool,
    pub extra: bool,
    /// Built while more than one stack version was alive.
    pub fragile: bool,
    pub is_error: bool,
    pub has_error: bool,
    pub error_cost: u32,
    pub dynamic_precedence: i32,
    pub children: Vec<Subtree>,
}

#[derive(Clone, Debug)]
pub(crate) struct Subtree(Arc<SubtreeData>);

impl Deref for Subtree {
    type Target = SubtreeData;

    fn deref(&self) -> &SubtreeData {
        &self.0
    }
}

/// Everything a reduction knows about the node it builds.
pub(crate) struct NodeParts {
    pub symbol: SymbolId,
    pub production: ProductionId,
    pub children: Vec<Subtree>,
    pub parse_state: StateId,
    pub dynamic_precedence: i32,
    pub fragile: bool,
    /// Minimum `lookahead_bytes`: the reduction depended on the lookahead
    /// token after the node.
    pub lookahead_floor: usize,
    pub next_lex_mode: LexModeId,
}

impl Subtree {
    pub fn leaf(
        token: &Token,
        parse_state: StateId,
        extra: bool,
        fragile: bool,
        is_error: bool,
    ) -> Self {
        Subtree(Arc::new(SubtreeData {
            symbol: token.symbol,
            padding: token.padding(),
            size: token.size(),
            lookahead_bytes: token.lookahead_bytes,
            parse_state,
            lex_mode: token.lex_mode,
            next_lex_mode: token.lex_mode,
            production: 0,
            leaf: true,
            extra,
            fragile,
            is_error,
            has_error: is_error,
            error_cost: u32::from(is_error),
            dynamic_precedence: 0,
            children: Vec::new(),
        }))
    }

    pub fn node(parts: NodeParts) -> Self {
        let summary = Summary::of(&parts.children);
        Subtree(Arc::new(SubtreeData {
            symbol: parts.symbol,
            padding: summary.padding,
            size: summary.size,
            lookahead_bytes: summary.lookahead_bytes.max(parts.lookahead_floor),
            parse_state: parts.parse_state,
            lex_mode: summary.lex_mode,
            next_lex_mode: parts.next_lex_mode,
            production: parts.production,
            leaf: false,
            extra: false,
            fragile: parts.fragile || summary.fragile,
            is_error: false,
            has_error: summary.has_error,
            error_cost: summary.error_cost,
            dynamic_precedence: parts.dynamic_precedence + summary.dynamic_precedence,
            children: parts.children,
        }))
    }

    /// An `ERROR` node over skipped or unparsable material.
    pub fn error(symbol: SymbolId, children: Vec<Subtree>, parse_state: StateId, extra: bool) -> Self {
        let summary = Summary::of(&children);
        Subtree(Arc::new(SubtreeData {
            symbol,
            padding: summary.padding,
            size: summary.size,
            lookahead_bytes: summary.lookahead_bytes,
            parse_state,
            lex_mode: summary.lex_mode,
            next_lex_mode: summary.lex_mode,
            production: 0,
            leaf: false,
            extra,
            fragile: summary.fragile,
            is_error: true,
            has_error: true,
            error_cost: 1 + children.len() as u32 + summary.error_cost,
            dynamic_precedence: summary.dynamic_precedence,
            children,
        }))
    }

    pub fn total(&self) -> usize {
        self.padding + self.size
    }

    pub fn ptr_eq(&self, other: &Subtree) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Address of the shared allocation.
    pub fn id(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }

    /// Compare shape and extent, ignoring bookkeeping such as parse states.
    pub fn same_structure(&self, other: &Subtree) -> bool {
        if self.ptr_eq(other) {
            return true;
        }
        self.symbol == other.symbol
            && self.padding == other.padding
            && self.size == other.size
            && self.extra == other.extra
            && self.is_error == other.is_error
            && self.production == other.production
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.same_structure(b))
    }
}

struct Summary {
    padding: usize,
    size: usize,
    lookahead_bytes: usize,
    lex_mode: LexModeId,
    fragile: bool,
    has_error: bool,
    error_cost: u32,
    dynamic_precedence: i32,
}

impl Summary {
    fn of(children: &[Subtree]) -> Self {
        let mut summary = Summary {
            padding: 0,
            size: 0,
            lookahead_bytes: 0,
            lex_mode: 0,
            fragile: false,
            has_error: false,
            error_cost: 0,
            dynamic_precedence: 0,
        };
        let Some(first) = children.first() else {
            return summary;
        };
        summary.padding = first.padding;
        summary.lex_mode = first.lex_mode;

        let mut total = 0;
        let mut dependency_end = 0;
        for child in children {
            total += child.total();
            dependency_end = dependency_end.max(total + child.lookahead_bytes);
            summary.fragile |= child.fragile;
            summary.has_error |= child.has_error;
            summary.error_cost += child.error_cost;
            summary.dynamic_precedence += child.dynamic_precedence;
        }
        summary.size = total - summary.padding;
        summary.lookahead_bytes = dependency_end - total;
        summary
    }
}
