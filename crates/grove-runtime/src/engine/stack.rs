//! Parse stack of one GLR version.

use grove_table::StateId;

use crate::subtree::Subtree;

#[derive(Clone, Debug)]
pub(crate) struct Entry {
    /// State after pushing `subtree`. Extras keep the state below them.
    pub state: StateId,
    pub subtree: Subtree,
}

/// Entries above the implicit start state 0.
#[derive(Clone, Debug, Default)]
pub(crate) struct Stack {
    entries: Vec<Entry>,
}

/// Subtrees taken off the stack by a reduction.
pub(crate) struct Popped {
    /// The structural children plus any extras between them.
    pub children: Vec<Subtree>,
    /// Extras above the last child; they go back on top of the new node.
    pub trailing: Vec<Subtree>,
}

impl Stack {
    pub fn top_state(&self) -> StateId {
        self.entries.last().map_or(0, |e| e.state)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn push(&mut self, state: StateId, subtree: Subtree) {
        self.entries.push(Entry { state, subtree });
    }

    /// Push an extra, which never changes the state.
    pub fn push_extra(&mut self, subtree: Subtree) {
        let state = self.top_state();
        self.push(state, subtree);
    }

    /// State revealed by popping `count` structural entries.
    pub fn state_below(&self, count: usize) -> Option<StateId> {
        if count == 0 {
            return Some(self.top_state());
        }
        let mut seen = 0;
        for (i, entry) in self.entries.iter().enumerate().rev() {
            if entry.subtree.extra {
                continue;
            }
            seen += 1;
            if seen == count {
                return Some(i.checked_sub(1).map_or(0, |below| self.entries[below].state));
            }
        }
        None
    }

    /// Whether the entry `depth` places below the top is an extra.
    pub fn is_extra_at(&self, depth: usize) -> bool {
        self.entries
            .len()
            .checked_sub(depth + 1)
            .is_some_and(|i| self.entries[i].subtree.extra)
    }

    /// Pop `count` structural entries. `None` when the stack is too shallow,
    /// in which case it is left untouched.
    pub fn pop_children(&mut self, count: usize) -> Option<Popped> {
        let structural = self.entries.iter().filter(|e| !e.subtree.extra).count();
        if structural < count {
            return None;
        }

        let mut trailing = Vec::new();
        while self.entries.last().is_some_and(|e| e.subtree.extra) {
            if let Some(entry) = self.entries.pop() {
                trailing.push(entry.subtree);
            }
        }
        trailing.reverse();

        let mut children = Vec::new();
        let mut taken = 0;
        while taken < count {
            let entry = self.entries.pop()?;
            if !entry.subtree.extra {
                taken += 1;
            }
            children.push(entry.subtree);
        }
        children.reverse();
        Some(Popped { children, trailing })
    }

    /// Pop `count` entries of any kind, bottom-most first.
    pub fn pop_entries(&mut self, count: usize) -> Vec<Subtree> {
        let keep = self.entries.len().saturating_sub(count);
        self.entries.drain(keep..).map(|e| e.subtree).collect()
    }

    /// States of the structural entries after dropping the top `popped`
    /// entries, starting with the implicit state 0.
    pub fn states_below(&self, popped: usize) -> Vec<StateId> {
        let keep = self.entries.len().saturating_sub(popped);
        std::iter::once(0)
            .chain(
                self.entries[..keep]
                    .iter()
                    .filter(|e| !e.subtree.extra)
                    .map(|e| e.state),
            )
            .collect()
    }

    pub fn same_states(&self, other: &Stack) -> bool {
        self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(&other.entries)
                .all(|(a, b)| a.state == b.state && a.subtree.extra == b.subtree.extra)
    }

    pub fn error_cost(&self) -> u32 {
        self.entries.iter().map(|e| e.subtree.error_cost).sum()
    }

    pub fn dynamic_precedence(&self) -> i32 {
        self.entries.iter().map(|e| e.subtree.dynamic_precedence).sum()
    }

    pub fn into_subtrees(self) -> Vec<Subtree> {
        self.entries.into_iter().map(|e| e.subtree).collect()
    }
}
