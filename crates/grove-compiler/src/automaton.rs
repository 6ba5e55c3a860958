//! Canonical LR(1) item sets.

use std::collections::{BTreeMap, HashMap, VecDeque};

use crate::first::{FirstSets, TokenSet};
use crate::flatten::{ProdId, Productions};
use crate::prepare::Sym;
use crate::{Error, Result};

/// The augmented production `S' -> start`.
pub(crate) const AUGMENTED: ProdId = ProdId::MAX;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) struct Item {
    pub prod: ProdId,
    pub dot: usize,
}

impl Item {
    pub(crate) fn next_symbol(self, productions: &Productions) -> Option<Sym> {
        if self.prod == AUGMENTED {
            return (self.dot == 0).then_some(Sym::NonTerminal(0));
        }
        productions
            .get(self.prod)
            .steps
            .get(self.dot)
            .map(|s| s.symbol)
    }

    pub(crate) fn is_complete(self, productions: &Productions) -> bool {
        self.next_symbol(productions).is_none()
    }

    fn advance(self) -> Self {
        Self {
            prod: self.prod,
            dot: self.dot + 1,
        }
    }
}

pub(crate) type ItemSet = BTreeMap<Item, TokenSet>;

#[derive(Debug)]
pub(crate) struct State {
    /// Kernel plus closure, with lookaheads.
    pub items: ItemSet,
    /// Kernel items without lookaheads: states sharing a core are merge
    /// candidates.
    pub core: Vec<Item>,
    pub transitions: BTreeMap<Sym, usize>,
}

#[derive(Debug)]
pub(crate) struct Automaton {
    pub states: Vec<State>,
}

pub(crate) fn build(
    productions: &Productions,
    first: &FirstSets,
    max_states: usize,
) -> Result<Automaton> {
    let mut start = first.empty_set();
    start.insert(Sym::End);
    let kernel: ItemSet = BTreeMap::from([(
        Item {
            prod: AUGMENTED,
            dot: 0,
        },
        start,
    )]);

    let mut index: HashMap<ItemSet, usize> = HashMap::new();
    let mut kernels: Vec<ItemSet> = vec![kernel.clone()];
    index.insert(kernel, 0);
    let mut states: Vec<State> = Vec::new();
    let mut queue = VecDeque::from([0usize]);

    while let Some(id) = queue.pop_front() {
        let kernel = kernels[id].clone();
        let core: Vec<Item> = kernel.keys().copied().collect();
        let items = closure(kernel, productions, first);

        let mut successors: BTreeMap<Sym, ItemSet> = BTreeMap::new();
        for (item, lookahead) in &items {
            if let Some(sym) = item.next_symbol(productions) {
                successors
                    .entry(sym)
                    .or_default()
                    .insert(item.advance(), lookahead.clone());
            }
        }

        let mut transitions = BTreeMap::new();
        for (sym, next) in successors {
            let target = match index.get(&next) {
                Some(&target) => target,
                None => {
                    let target = kernels.len();
                    if target >= max_states {
                        return Err(Error::StateLimitExceeded { limit: max_states });
                    }
                    kernels.push(next.clone());
                    index.insert(next, target);
                    queue.push_back(target);
                    target
                }
            };
            transitions.insert(sym, target);
        }

        // Queue order is creation order, so `states[id]` lines up.
        debug_assert_eq!(states.len(), id);
        states.push(State {
            items,
            core,
            transitions,
        });
    }

    Ok(Automaton { states })
}

fn closure(kernel: ItemSet, productions: &Productions, first: &FirstSets) -> ItemSet {
    let mut items = kernel;
    let mut work: Vec<Item> = items.keys().copied().collect();

    while let Some(item) = work.pop() {
        let Some(Sym::NonTerminal(var)) = item.next_symbol(productions) else {
            continue;
        };
        let rest = if item.prod == AUGMENTED {
            &[][..]
        } else {
            &productions.get(item.prod).steps[item.dot + 1..]
        };
        let follow = first.sequence(rest, &items[&item]);

        for &prod in &productions.by_lhs[var as usize] {
            let next = Item { prod, dot: 0 };
            let grew = match items.get_mut(&next) {
                Some(lookahead) => lookahead.union(&follow),
                None => {
                    items.insert(next, follow.clone());
                    true
                }
            };
            if grew {
                work.push(next);
            }
        }
    }

    items
}
