//! Precedence values and their ordering.

use std::cmp::Ordering;
use std::collections::HashMap;

use grove_core::{Precedence, PrecedenceEntry};

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub(crate) enum PrecValue {
    #[default]
    None,
    Int(i32),
    Name(String),
}

impl From<&Precedence> for PrecValue {
    fn from(value: &Precedence) -> Self {
        match value {
            Precedence::Integer(n) => PrecValue::Int(*n),
            Precedence::Name(name) => PrecValue::Name(name.clone()),
        }
    }
}

impl PrecValue {
    pub(crate) fn is_none(&self) -> bool {
        matches!(self, PrecValue::None)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub(crate) enum Assoc {
    Left,
    Right,
}

/// The grammar's `precedences` lists. Within a list, earlier entries bind
/// tighter.
#[derive(Clone, Debug, Default)]
pub(crate) struct PrecedenceOrder {
    /// For each name, its (list, position) memberships.
    positions: HashMap<String, Vec<(usize, usize)>>,
}

impl PrecedenceOrder {
    pub(crate) fn new(levels: &[Vec<PrecedenceEntry>]) -> Self {
        let mut positions: HashMap<String, Vec<(usize, usize)>> = HashMap::new();
        for (list, entries) in levels.iter().enumerate() {
            for (pos, entry) in entries.iter().enumerate() {
                let name = match entry {
                    PrecedenceEntry::Name(name) | PrecedenceEntry::Symbol(name) => name,
                };
                positions.entry(name.clone()).or_default().push((list, pos));
            }
        }
        Self { positions }
    }

    /// Compare two precedences. `None` means the two cannot be ordered.
    ///
    /// Missing precedence behaves as integer 0. Names only compare with
    /// names that share a `precedences` list.
    pub(crate) fn compare(&self, a: &PrecValue, b: &PrecValue) -> Option<Ordering> {
        let int = |p: &PrecValue| match p {
            PrecValue::None => Some(0),
            PrecValue::Int(n) => Some(*n),
            PrecValue::Name(_) => None,
        };
        match (a, b) {
            (PrecValue::Name(x), PrecValue::Name(y)) => {
                if x == y {
                    return Some(Ordering::Equal);
                }
                let xs = self.positions.get(x)?;
                let ys = self.positions.get(y)?;
                xs.iter().find_map(|&(lx, px)| {
                    ys.iter()
                        .find(|&&(ly, _)| ly == lx)
                        .map(|&(_, py)| py.cmp(&px))
                })
            }
            _ => Some(int(a)?.cmp(&int(b)?)),
        }
    }
}
