use std::fmt;
use std::ops::Range;
use std::str::Utf8Error;

use grove_table::{FieldId, ParseTable, SymbolId};

use super::Tree;
use crate::subtree::Subtree;

/// A visible node of a [`Tree`].
///
/// Hidden rules and auxiliary repeats are flattened away: their children
/// appear in place of them. Aliases rename nodes and fields label them, both
/// as recorded in the production that built the parent.
#[derive(Clone, Copy)]
pub struct Node<'t> {
    tree: &'t Tree,
    subtree: &'t Subtree,
    /// Offset where the subtree's padding starts.
    offset: usize,
    alias: Option<SymbolId>,
    field: Option<FieldId>,
}

impl<'t> Node<'t> {
    pub(super) fn root(tree: &'t Tree) -> Self {
        Node {
            tree,
            subtree: &tree.root,
            offset: 0,
            alias: None,
            field: None,
        }
    }

    /// The tree this node belongs to.
    pub fn tree(&self) -> &'t Tree {
        self.tree
    }

    fn table(&self) -> &'t ParseTable {
        &self.tree.table
    }

    fn is_root(&self) -> bool {
        std::ptr::eq(self.subtree, &self.tree.root)
    }

    pub fn kind_id(&self) -> SymbolId {
        self.alias.unwrap_or(self.subtree.symbol)
    }

    pub fn kind(&self) -> &'t str {
        self.table().symbol_name(self.kind_id())
    }

    pub fn is_named(&self) -> bool {
        self.table().symbol(self.kind_id()).named
    }

    pub fn is_error(&self) -> bool {
        self.subtree.is_error
    }

    pub fn is_extra(&self) -> bool {
        self.subtree.extra
    }

    /// Whether this node is or contains an `ERROR`.
    pub fn has_error(&self) -> bool {
        self.subtree.has_error
    }

    /// The root covers the whole source, leading and trailing trivia
    /// included; every other node starts after its padding.
    pub fn start_byte(&self) -> usize {
        if self.is_root() {
            0
        } else {
            self.offset + self.subtree.padding
        }
    }

    pub fn end_byte(&self) -> usize {
        self.offset + self.subtree.total()
    }

    pub fn byte_range(&self) -> Range<usize> {
        self.start_byte()..self.end_byte()
    }

    pub fn utf8_text<'s>(&self, source: &'s [u8]) -> Result<&'s str, Utf8Error> {
        let bytes = source.get(self.byte_range()).unwrap_or_default();
        std::str::from_utf8(bytes)
    }

    /// Field label given to this node by its parent.
    pub fn field_name(&self) -> Option<&'t str> {
        self.field.map(|f| self.table().field_name(f))
    }

    pub fn field_id(&self) -> Option<FieldId> {
        self.field
    }

    pub fn children(&self) -> Vec<Node<'t>> {
        let mut children = Vec::new();
        if !self.subtree.leaf {
            self.collect(self.subtree, self.offset, None, &mut children);
        }
        children
    }

    pub fn child(&self, index: usize) -> Option<Node<'t>> {
        self.children().into_iter().nth(index)
    }

    pub fn child_count(&self) -> usize {
        self.children().len()
    }

    pub fn named_children(&self) -> Vec<Node<'t>> {
        self.children().into_iter().filter(Node::is_named).collect()
    }

    pub fn child_by_field_name(&self, name: &str) -> Option<Node<'t>> {
        self.children_by_field_name(name).into_iter().next()
    }

    pub fn children_by_field_name(&self, name: &str) -> Vec<Node<'t>> {
        let Some(field) = self.table().field_id(name) else {
            return Vec::new();
        };
        self.children()
            .into_iter()
            .filter(|c| c.field == Some(field))
            .collect()
    }

    pub fn field_name_for_child(&self, index: usize) -> Option<&'t str> {
        self.child(index).and_then(|c| c.field_name())
    }

    /// Child indices leading from the root to this node.
    pub fn path(&self) -> Vec<usize> {
        let mut path = Vec::new();
        find_path(self.tree.root_node(), self, &mut path);
        path
    }

    /// Identity of the underlying subtree. Equal across trees when a subtree
    /// was reused.
    pub fn id(&self) -> usize {
        self.subtree.id()
    }

    /// S-expression of the named nodes, with field labels.
    pub fn to_sexp(&self) -> String {
        let mut out = String::new();
        self.write_sexp(&mut out);
        out
    }

    fn write_sexp(&self, out: &mut String) {
        out.push('(');
        out.push_str(self.kind());
        for child in self.children() {
            if !child.is_named() {
                continue;
            }
            out.push(' ');
            if let Some(field) = child.field_name() {
                out.push_str(field);
                out.push_str(": ");
            }
            child.write_sexp(out);
        }
        out.push(')');
    }

    fn collect(
        &self,
        subtree: &'t Subtree,
        offset: usize,
        inherited: Option<FieldId>,
        out: &mut Vec<Node<'t>>,
    ) {
        let table = self.table();
        let production = (!subtree.is_error).then(|| table.production(subtree.production));
        let mut offset = offset;
        let mut index = 0;

        for child in &subtree.children {
            let (alias, field) = match production {
                Some(production) if !child.extra => {
                    let labels = (
                        production.alias_at(index),
                        inherited.or_else(|| production.fields_at(index).next()),
                    );
                    index += 1;
                    labels
                }
                _ => (None, None),
            };

            let visible = alias.is_some() || child.is_error || table.symbol(child.symbol).visible;
            if visible {
                out.push(Node {
                    tree: self.tree,
                    subtree: child,
                    offset,
                    alias,
                    field,
                });
            } else if !child.leaf {
                self.collect(child, offset, field, out);
            }
            offset += child.total();
        }
    }

    fn same_as(&self, other: &Node<'_>) -> bool {
        std::ptr::eq(self.subtree, other.subtree) && self.offset == other.offset
    }
}

fn find_path(node: Node<'_>, target: &Node<'_>, path: &mut Vec<usize>) -> bool {
    if node.same_as(target) {
        return true;
    }
    for (index, child) in node.children().into_iter().enumerate() {
        let covers =
            child.start_byte() <= target.start_byte() && target.end_byte() <= child.end_byte();
        if !covers {
            continue;
        }
        path.push(index);
        if find_path(child, target, path) {
            return true;
        }
        path.pop();
    }
    false
}

impl PartialEq for Node<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.same_as(other) && self.alias == other.alias
    }
}

impl Eq for Node<'_> {}

impl fmt::Debug for Node<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let range = self.byte_range();
        write!(f, "{} [{}..{}]", self.kind(), range.start, range.end)
    }
}
