//! Cursor over the prior tree that offers reuse candidates.

use std::ops::Range;

use crate::subtree::Subtree;

struct Frame {
    subtree: Subtree,
    /// Old offset where the subtree's padding starts.
    start: usize,
}

impl Frame {
    fn contains(&self, pos: usize) -> bool {
        self.start <= pos && pos < self.start + self.subtree.total()
    }
}

/// Path from the prior root down to the most recent candidate.
///
/// Queries come in increasing order of old offset, so the cursor only backs
/// out as far as the first frame still covering the new offset.
pub(crate) struct ReuseCursor {
    stack: Vec<Frame>,
    /// Old ranges of the prior `ERROR` nodes, in order.
    errors: Vec<Range<usize>>,
}

impl ReuseCursor {
    pub fn new(root: &Subtree) -> Self {
        let mut errors = Vec::new();
        collect_errors(root, 0, &mut errors);
        Self {
            stack: vec![Frame {
                subtree: root.clone(),
                start: 0,
            }],
            errors,
        }
    }

    /// Whether old range `range` overlaps a prior `ERROR`. Recovery chose
    /// the shape around those, so nothing whose lookahead reaches one is
    /// reused.
    pub fn near_error(&self, range: Range<usize>) -> bool {
        let i = self.errors.partition_point(|e| e.end <= range.start);
        self.errors.get(i).is_some_and(|e| e.start < range.end)
    }

    /// Non-empty subtrees whose padding starts at old offset `pos`, largest
    /// first. The root is never offered.
    pub fn candidates_at(&mut self, pos: usize) -> Vec<Subtree> {
        while self.stack.len() > 1 && !self.stack[self.stack.len() - 1].contains(pos) {
            self.stack.pop();
        }
        while self.stack.len() > 2 && self.stack[self.stack.len() - 2].start == pos {
            self.stack.pop();
        }

        loop {
            let Some(top) = self.stack.last() else {
                return Vec::new();
            };
            if self.stack.len() > 1 && top.start == pos {
                break;
            }
            let Some(frame) = child_covering(top, pos) else {
                return Vec::new();
            };
            self.stack.push(frame);
        }

        let mut chain = Vec::new();
        let mut current = self.stack.last().map(|f| f.subtree.clone());
        while let Some(subtree) = current {
            current = subtree.children.iter().find(|c| c.total() > 0).cloned();
            chain.push(subtree);
        }
        chain
    }
}

fn child_covering(frame: &Frame, pos: usize) -> Option<Frame> {
    let mut offset = frame.start;
    for child in &frame.subtree.children {
        if offset > pos {
            return None;
        }
        let end = offset + child.total();
        if pos < end {
            return Some(Frame {
                subtree: child.clone(),
                start: offset,
            });
        }
        offset = end;
    }
    None
}

fn collect_errors(subtree: &Subtree, start: usize, out: &mut Vec<Range<usize>>) {
    if subtree.is_error {
        out.push(start..start + subtree.total());
        return;
    }
    if !subtree.has_error {
        return;
    }
    let mut offset = start;
    for child in &subtree.children {
        collect_errors(child, offset, out);
        offset += child.total();
    }
}
