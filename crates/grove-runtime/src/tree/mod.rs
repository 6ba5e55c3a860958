//! Syntax trees and the public node view.

mod node;

#[cfg(test)]
mod node_tests;

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use grove_table::ParseTable;

pub use node::Node;

use crate::subtree::Subtree;

/// Result of a parse. Cheap to clone: the nodes are shared.
#[derive(Clone)]
pub struct Tree {
    root: Subtree,
    table: Arc<ParseTable>,
}

impl Tree {
    pub(crate) fn new(root: Subtree, table: Arc<ParseTable>) -> Self {
        Self { root, table }
    }

    pub(crate) fn root_subtree(&self) -> &Subtree {
        &self.root
    }

    pub fn table(&self) -> &Arc<ParseTable> {
        &self.table
    }

    pub fn root_node(&self) -> Node<'_> {
        Node::root(self)
    }

    /// Bytes covered, which is the length of the parsed source.
    pub fn source_len(&self) -> usize {
        self.root.total()
    }

    pub fn has_error(&self) -> bool {
        self.root.has_error
    }

    pub fn to_sexp(&self) -> String {
        self.root_node().to_sexp()
    }

    /// Follow child indices from the root.
    pub fn node_at_path(&self, path: &[usize]) -> Option<Node<'_>> {
        path.iter()
            .try_fold(self.root_node(), |node, &index| node.child(index))
    }

    /// Smallest node whose range contains `start..end`.
    pub fn descendant_for_byte_range(&self, start: usize, end: usize) -> Option<Node<'_>> {
        let mut node = self.root_node();
        if start > end || end > node.end_byte() {
            return None;
        }
        'descend: loop {
            for child in node.children() {
                let range = child.byte_range();
                let fits = range.start <= start && end <= range.end;
                if fits && (range.start < range.end || start == end) {
                    node = child;
                    continue 'descend;
                }
            }
            return Some(node);
        }
    }

    /// Same shape, kinds and extents, wherever the subtrees came from.
    pub fn same_structure(&self, other: &Tree) -> bool {
        self.root.same_structure(&other.root)
    }

    /// Outermost nodes of this tree that are shared, by reference, with
    /// `prior`.
    pub fn shared_nodes<'t>(&'t self, prior: &Tree) -> Vec<Node<'t>> {
        let mut ids = HashSet::new();
        collect_ids(&prior.root, &mut ids);

        let mut shared = Vec::new();
        let mut pending = self.root_node().children();
        pending.reverse();
        while let Some(node) = pending.pop() {
            if ids.contains(&node.id()) {
                shared.push(node);
                continue;
            }
            let mut children = node.children();
            children.reverse();
            pending.extend(children);
        }
        shared
    }
}

fn collect_ids(subtree: &Subtree, ids: &mut HashSet<usize>) {
    ids.insert(subtree.id());
    for child in &subtree.children {
        collect_ids(child, ids);
    }
}

impl fmt::Debug for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tree")
            .field("grammar", &self.table.grammar_name())
            .field("root", &self.to_sexp())
            .finish()
    }
}
