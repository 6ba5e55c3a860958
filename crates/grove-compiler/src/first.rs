//! FIRST sets and nullability.

use crate::flatten::{Productions, Step};
use crate::prepare::{Prepared, Sym};

/// Set of terminals (end included), as a fixed-size bitset.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct TokenSet {
    bits: Vec<u64>,
}

impl TokenSet {
    /// Empty set able to hold `terminal_count` terminals plus end.
    pub(crate) fn empty(terminal_count: usize) -> Self {
        Self {
            bits: vec![0; (terminal_count + 1).div_ceil(64)],
        }
    }

    fn index(sym: Sym) -> usize {
        match sym {
            Sym::End => 0,
            Sym::Terminal(t) => t as usize + 1,
            Sym::NonTerminal(_) => unreachable!("non-terminal in token set"),
        }
    }

    pub(crate) fn insert(&mut self, sym: Sym) -> bool {
        let i = Self::index(sym);
        let (word, bit) = (i / 64, 1u64 << (i % 64));
        let fresh = self.bits[word] & bit == 0;
        self.bits[word] |= bit;
        fresh
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, sym: Sym) -> bool {
        let i = Self::index(sym);
        self.bits[i / 64] & (1u64 << (i % 64)) != 0
    }

    /// Add every member of `other`; true if anything was added.
    pub(crate) fn union(&mut self, other: &TokenSet) -> bool {
        let mut changed = false;
        for (a, b) in self.bits.iter_mut().zip(&other.bits) {
            let merged = *a | *b;
            changed |= merged != *a;
            *a = merged;
        }
        changed
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = Sym> + '_ {
        self.bits.iter().enumerate().flat_map(|(w, &word)| {
            (0..64)
                .filter(move |b| word & (1u64 << b) != 0)
                .map(move |b| match w * 64 + b {
                    0 => Sym::End,
                    i => Sym::Terminal((i - 1) as u16),
                })
        })
    }
}

#[derive(Debug)]
pub(crate) struct FirstSets {
    terminal_count: usize,
    first: Vec<TokenSet>,
    nullable: Vec<bool>,
}

impl FirstSets {
    pub(crate) fn compute(prepared: &Prepared, productions: &Productions) -> Self {
        let terminal_count = prepared.tokens.len();
        let vars = prepared.variables.len();
        let mut first = vec![TokenSet::empty(terminal_count); vars];
        let mut nullable = vec![false; vars];

        let mut changed = true;
        while changed {
            changed = false;
            for prod in &productions.list {
                let lhs = prod.lhs as usize;
                let mut all_nullable = true;
                for step in &prod.steps {
                    match step.symbol {
                        Sym::NonTerminal(v) => {
                            let v = v as usize;
                            if v != lhs {
                                let other = first[v].clone();
                                changed |= first[lhs].union(&other);
                            }
                            if !nullable[v] {
                                all_nullable = false;
                                break;
                            }
                        }
                        terminal => {
                            changed |= first[lhs].insert(terminal);
                            all_nullable = false;
                            break;
                        }
                    }
                }
                if all_nullable && !nullable[lhs] {
                    nullable[lhs] = true;
                    changed = true;
                }
            }
        }

        Self {
            terminal_count,
            first,
            nullable,
        }
    }

    pub(crate) fn empty_set(&self) -> TokenSet {
        TokenSet::empty(self.terminal_count)
    }

    #[cfg(test)]
    pub(crate) fn first(&self, var: u16) -> &TokenSet {
        &self.first[var as usize]
    }

    #[cfg(test)]
    pub(crate) fn nullable(&self, var: u16) -> bool {
        self.nullable[var as usize]
    }

    /// FIRST of `steps` followed by `follow`.
    pub(crate) fn sequence(&self, steps: &[Step], follow: &TokenSet) -> TokenSet {
        let mut out = self.empty_set();
        for step in steps {
            match step.symbol {
                Sym::NonTerminal(v) => {
                    out.union(&self.first[v as usize]);
                    if !self.nullable[v as usize] {
                        return out;
                    }
                }
                terminal => {
                    out.insert(terminal);
                    return out;
                }
            }
        }
        out.union(follow);
        out
    }
}
