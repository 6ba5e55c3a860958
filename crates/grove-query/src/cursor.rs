//! Running queries over syntax trees.
//!
//! Nodes are visited in pre-order; at each node every pattern is tried in
//! order and yields at most one match. Child patterns match an ordered
//! subsequence of the node's children: siblings between them are skipped.
//! Quantified child patterns are greedy and backtrack when the patterns
//! after them would otherwise fail.

use std::ops::Range;

use grove_runtime::Node;

use crate::query::{NodeTest, PatternNode, Query, Repeat};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryCapture<'t> {
    /// Index into [`Query::capture_names`].
    pub index: u32,
    pub node: Node<'t>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryMatch<'t> {
    pub pattern_index: usize,
    /// Captures in the order their patterns matched, outer before inner.
    pub captures: Vec<QueryCapture<'t>>,
}

impl<'t> QueryMatch<'t> {
    pub fn nodes_for_capture_index(&self, index: u32) -> impl Iterator<Item = Node<'t>> + '_ {
        self.captures
            .iter()
            .filter(move |c| c.index == index)
            .map(|c| c.node)
    }
}

/// Match settings; cheap to create and reusable across queries.
#[derive(Debug, Clone, Default)]
pub struct QueryCursor {
    byte_range: Option<Range<usize>>,
}

impl QueryCursor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Only visit nodes overlapping `range`.
    pub fn set_byte_range(&mut self, range: Range<usize>) -> &mut Self {
        self.byte_range = Some(range);
        self
    }

    /// Matches of `query` in the subtree rooted at `node`.
    ///
    /// The iterator is lazy and can be cloned to restart from its current
    /// position. A tree built from a table of another grammar yields nothing.
    pub fn matches<'q, 't>(&self, query: &'q Query, node: Node<'t>) -> QueryMatches<'q, 't> {
        let compatible = node.tree().table().fingerprint() == query.fingerprint;
        let mut matches = QueryMatches {
            query,
            byte_range: self.byte_range.clone(),
            pending: Vec::new(),
            current: None,
            next_pattern: 0,
        };
        if compatible && matches.visits(&node) {
            matches.pending.push(node);
        }
        matches
    }
}

/// Lazy pre-order iterator over the matches of one query.
#[derive(Debug, Clone)]
pub struct QueryMatches<'q, 't> {
    query: &'q Query,
    byte_range: Option<Range<usize>>,
    /// Nodes still to visit, next on top.
    pending: Vec<Node<'t>>,
    current: Option<Node<'t>>,
    next_pattern: usize,
}

impl<'t> QueryMatches<'_, 't> {
    fn visits(&self, node: &Node<'t>) -> bool {
        self.byte_range
            .as_ref()
            .is_none_or(|r| node.start_byte() < r.end && r.start < node.end_byte())
    }

    fn advance_node(&mut self) -> Option<Node<'t>> {
        let node = self.pending.pop()?;
        let children = node.children();
        for child in children.into_iter().rev() {
            if self.visits(&child) {
                self.pending.push(child);
            }
        }
        self.current = Some(node);
        self.next_pattern = 0;
        Some(node)
    }
}

impl<'t> Iterator for QueryMatches<'_, 't> {
    type Item = QueryMatch<'t>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let node = match self.current {
                Some(node) => node,
                None => self.advance_node()?,
            };
            while let Some(pattern) = self.query.patterns.get(self.next_pattern) {
                let pattern_index = self.next_pattern;
                self.next_pattern += 1;
                let mut captures = Vec::new();
                if match_node(pattern, node, &mut captures) {
                    return Some(QueryMatch {
                        pattern_index,
                        captures,
                    });
                }
            }
            self.current = None;
        }
    }
}

/// `node` itself satisfies `pattern`; captures are appended only on success.
fn match_node<'t>(
    pattern: &PatternNode,
    node: Node<'t>,
    captures: &mut Vec<QueryCapture<'t>>,
) -> bool {
    let kind_ok = match &pattern.test {
        NodeTest::Any => true,
        NodeTest::AnyNamed => node.is_named(),
        NodeTest::Error => node.is_error(),
        NodeTest::Symbols(ids) => !node.is_error() && ids.contains(&node.kind_id()),
    };
    if !kind_ok || pattern.field.is_some_and(|f| node.field_id() != Some(f)) {
        return false;
    }

    let mark = captures.len();
    captures.extend(
        pattern
            .captures
            .iter()
            .map(|&index| QueryCapture { index, node }),
    );
    if pattern.children.is_empty() && pattern.absent_fields.is_empty() {
        return true;
    }

    let children = node.children();
    let has_absent = pattern
        .absent_fields
        .iter()
        .any(|&f| children.iter().any(|c| c.field_id() == Some(f)));
    if !has_absent && Siblings::new(&pattern.children, &children).sequence(0, 0, captures) {
        return true;
    }
    captures.truncate(mark);
    false
}

/// State of matching a pattern list against one node's children.
///
/// Whether the patterns from `k` on match somewhere in the children from `i`
/// on never depends on how that state was reached, so a state that failed
/// once is not explored again. This keeps quantifiers polynomial in the
/// child count.
struct Siblings<'a, 't> {
    patterns: &'a [PatternNode],
    children: &'a [Node<'t>],
    failed: Vec<bool>,
}

#[derive(Clone, Copy)]
enum Step {
    Sequence,
    Repeat,
}

impl<'a, 't> Siblings<'a, 't> {
    fn new(patterns: &'a [PatternNode], children: &'a [Node<'t>]) -> Self {
        let states = (patterns.len() + 1) * (children.len() + 1) * 2;
        Self {
            patterns,
            children,
            failed: vec![false; states],
        }
    }

    fn slot(&self, k: usize, i: usize, step: Step) -> usize {
        (k * (self.children.len() + 1) + i) * 2 + step as usize
    }

    /// `patterns[k..]` match an ordered subsequence of `children[i..]`.
    fn sequence(&mut self, k: usize, i: usize, captures: &mut Vec<QueryCapture<'t>>) -> bool {
        let Some(pattern) = self.patterns.get(k) else {
            return true;
        };
        let slot = self.slot(k, i, Step::Sequence);
        if self.failed[slot] {
            return false;
        }
        let found = match pattern.repeat {
            Repeat::One => self.one_then(k, i, captures),
            Repeat::Optional => {
                self.one_then(k, i, captures) || self.sequence(k + 1, i, captures)
            }
            Repeat::ZeroOrMore => {
                self.many_then(k, i, captures) || self.sequence(k + 1, i, captures)
            }
            Repeat::OneOrMore => self.many_then(k, i, captures),
        };
        if !found {
            self.failed[slot] = true;
        }
        found
    }

    /// Some child from `i` on matches `patterns[k]` and the patterns after
    /// it match the siblings after that child.
    fn one_then(&mut self, k: usize, i: usize, captures: &mut Vec<QueryCapture<'t>>) -> bool {
        for j in i..self.children.len() {
            let mark = captures.len();
            if match_node(&self.patterns[k], self.children[j], captures)
                && self.sequence(k + 1, j + 1, captures)
            {
                return true;
            }
            captures.truncate(mark);
        }
        false
    }

    /// One or more children from `i` on match `patterns[k]`, as many as
    /// possible, and the patterns after it match the siblings after the
    /// last of them.
    fn many_then(&mut self, k: usize, i: usize, captures: &mut Vec<QueryCapture<'t>>) -> bool {
        let slot = self.slot(k, i, Step::Repeat);
        if self.failed[slot] {
            return false;
        }
        for j in i..self.children.len() {
            let mark = captures.len();
            if match_node(&self.patterns[k], self.children[j], captures)
                && (self.many_then(k, j + 1, captures) || self.sequence(k + 1, j + 1, captures))
            {
                return true;
            }
            captures.truncate(mark);
        }
        self.failed[slot] = true;
        false
    }
}
