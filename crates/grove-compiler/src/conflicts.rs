//! Action rows and conflict resolution.
//!
//! Each cell with more than one candidate is settled in order by:
//! precedence and associativity, the grammar's declared `conflicts`
//! (kept for GLR), then the configured tie-break. Whatever is left is an
//! `AmbiguousGrammar` error.

use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};

use crate::automaton::{AUGMENTED, Automaton, Item, State};
use crate::config::TieBreak;
use crate::flatten::{ProdId, Productions};
use crate::precedence::Assoc;
use crate::prepare::{Prepared, Sym, VarId};
use crate::report::{ConflictReport, ParseConflict, Resolution};
use crate::{Error, Result};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub(crate) enum ParseAction {
    Shift(usize),
    ShiftExtra,
    Reduce(ProdId),
    Accept,
}

/// One state's resolved actions.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Row {
    /// Non-empty cells only. Keys are terminals or end.
    pub actions: BTreeMap<Sym, Vec<ParseAction>>,
    pub gotos: BTreeMap<VarId, usize>,
    pub core: Vec<Item>,
}

pub(crate) fn resolve(
    prepared: &Prepared,
    productions: &Productions,
    automaton: &Automaton,
    tie_break: TieBreak,
    report: &mut ConflictReport,
) -> Result<Vec<Row>> {
    let resolver = Resolver {
        prepared,
        productions,
        tie_break,
    };
    let extras: Vec<Sym> = prepared.extra_tokens().map(Sym::Terminal).collect();

    let mut rows = Vec::with_capacity(automaton.states.len());
    for state in &automaton.states {
        let mut candidates: BTreeMap<Sym, Vec<ParseAction>> = BTreeMap::new();
        let mut gotos = BTreeMap::new();

        for (&sym, &target) in &state.transitions {
            match sym {
                Sym::NonTerminal(var) => {
                    gotos.insert(var, target);
                }
                terminal => candidates
                    .entry(terminal)
                    .or_default()
                    .push(ParseAction::Shift(target)),
            }
        }
        for (item, lookahead) in &state.items {
            if !item.is_complete(productions) {
                continue;
            }
            for sym in lookahead.iter() {
                let action = if item.prod == AUGMENTED {
                    ParseAction::Accept
                } else {
                    ParseAction::Reduce(item.prod)
                };
                candidates.entry(sym).or_default().push(action);
            }
        }

        let mut actions = BTreeMap::new();
        for (sym, cell) in candidates {
            let cell = if cell.len() > 1 {
                resolver.resolve_cell(state, sym, cell, report)?
            } else {
                cell
            };
            actions.insert(sym, cell);
        }
        for &extra in &extras {
            actions
                .entry(extra)
                .or_insert_with(|| vec![ParseAction::ShiftExtra]);
        }

        rows.push(Row {
            actions,
            gotos,
            core: state.core.clone(),
        });
    }
    Ok(rows)
}

struct Resolver<'a> {
    prepared: &'a Prepared,
    productions: &'a Productions,
    tie_break: TieBreak,
}

impl Resolver<'_> {
    fn resolve_cell(
        &self,
        state: &State,
        lookahead: Sym,
        cell: Vec<ParseAction>,
        report: &mut ConflictReport,
    ) -> Result<Vec<ParseAction>> {
        let order = &self.prepared.precedence;
        let shift = cell.iter().find_map(|a| match a {
            ParseAction::Shift(target) => Some(*target),
            _ => None,
        });
        let accept = cell.contains(&ParseAction::Accept);
        let all_reduces: Vec<ProdId> = cell
            .iter()
            .filter_map(|a| match a {
                ParseAction::Reduce(p) => Some(*p),
                _ => None,
            })
            .collect();
        let shift_items = self.shift_items(state, lookahead);
        let mut resolution = None;

        // Reductions against each other: keep the highest precedence.
        let mut reduces: Vec<ProdId> = all_reduces
            .iter()
            .copied()
            .filter(|&r| {
                let (rp, _) = self.productions.get(r).reduce_prec();
                !all_reduces.iter().any(|&o| {
                    o != r
                        && order.compare(self.productions.get(o).reduce_prec().0, rp)
                            == Some(Ordering::Greater)
                })
            })
            .collect();
        if reduces.len() < all_reduces.len() {
            resolution = Some(Resolution::Precedence);
        }

        // Shift against each reduction.
        let mut keep_shift = shift.is_some();
        if shift.is_some() && !reduces.is_empty() {
            let mut surviving = Vec::new();
            for &r in &reduces {
                let (rp, assoc) = self.productions.get(r).reduce_prec();
                let ords: Vec<Option<Ordering>> = shift_items
                    .iter()
                    .map(|item| {
                        let sp = self.productions.get(item.prod).shift_prec(item.dot);
                        order.compare(rp, sp)
                    })
                    .collect();
                let all = |o: Ordering| ords.iter().all(|x| *x == Some(o));
                if all(Ordering::Greater) {
                    keep_shift = false;
                    surviving.push(r);
                    resolution = Some(Resolution::Precedence);
                } else if all(Ordering::Less) {
                    resolution = Some(Resolution::Precedence);
                } else if all(Ordering::Equal) && assoc.is_some() {
                    resolution = Some(Resolution::Associativity);
                    if assoc == Some(Assoc::Left) {
                        keep_shift = false;
                        surviving.push(r);
                    }
                } else {
                    surviving.push(r);
                }
            }
            reduces = surviving;
        }

        let mut remaining = Vec::new();
        if keep_shift && let Some(target) = shift {
            remaining.push(ParseAction::Shift(target));
        }
        if accept {
            remaining.push(ParseAction::Accept);
        }
        remaining.extend(reduces.iter().map(|&r| ParseAction::Reduce(r)));

        let items = self.describe_items(&shift_items, &all_reduces, accept);
        let display = self.prepared.display(lookahead);
        if remaining.len() <= 1 {
            if let Some(resolution) = resolution {
                self.record(report, &display, items, resolution);
            }
            return Ok(remaining);
        }

        let shifting = keep_shift && shift.is_some();
        if self.is_declared(&shift_items, shifting, &reduces, accept) {
            self.record(report, &display, items, Resolution::DeclaredConflict);
            return Ok(remaining);
        }

        if self.tie_break == TieBreak::DeclarationOrder
            && let Some(winner) = self.declaration_winner(&remaining, &shift_items)
        {
            self.record(report, &display, items, Resolution::DeclarationOrder);
            return Ok(vec![winner]);
        }

        let describe = |action: &ParseAction| match action {
            ParseAction::Reduce(p) => self.productions.describe(self.prepared, *p),
            ParseAction::Accept => format!("accept {}", self.prepared.variables[0].name),
            _ => shift_items
                .first()
                .map(|i| self.productions.describe(self.prepared, i.prod))
                .unwrap_or_default(),
        };
        Err(Error::AmbiguousGrammar {
            first: describe(&remaining[0]),
            second: describe(&remaining[1]),
            lookahead: display,
        })
    }

    /// Items that would shift `lookahead`. Items past their first step are
    /// preferred: they carry the context the conflict is about.
    fn shift_items(&self, state: &State, lookahead: Sym) -> Vec<Item> {
        let all: Vec<Item> = state
            .items
            .keys()
            .copied()
            .filter(|item| {
                item.prod != AUGMENTED && item.next_symbol(self.productions) == Some(lookahead)
            })
            .collect();
        let advanced: Vec<Item> = all.iter().copied().filter(|i| i.dot > 0).collect();
        if advanced.is_empty() { all } else { advanced }
    }

    fn origin(&self, prod: ProdId) -> usize {
        let lhs = self.productions.get(prod).lhs;
        self.prepared.variables[lhs as usize].origin
    }

    fn is_declared(&self, shift_items: &[Item], shifting: bool, reduces: &[ProdId], accept: bool) -> bool {
        let mut involved = BTreeSet::new();
        if shifting {
            involved.extend(shift_items.iter().map(|i| self.origin(i.prod)));
        }
        involved.extend(reduces.iter().map(|&r| self.origin(r)));
        if accept {
            involved.insert(self.prepared.variables[0].origin);
        }
        self.prepared
            .conflicts
            .iter()
            .any(|group| involved.iter().all(|rule| group.contains(rule)))
    }

    /// The action whose rule was declared first, if exactly one is.
    fn declaration_winner(&self, remaining: &[ParseAction], shift_items: &[Item]) -> Option<ParseAction> {
        let rank = |action: &ParseAction| -> usize {
            match action {
                ParseAction::Reduce(p) => self.origin(*p),
                ParseAction::Accept => self.prepared.variables[0].origin,
                _ => shift_items
                    .iter()
                    .map(|i| self.origin(i.prod))
                    .min()
                    .unwrap_or(usize::MAX),
            }
        };
        let ranked: Vec<(usize, ParseAction)> = remaining.iter().map(|a| (rank(a), *a)).collect();
        let best = ranked.iter().map(|(r, _)| *r).min()?;
        let mut winners = ranked.iter().filter(|(r, _)| *r == best);
        let winner = winners.next()?.1;
        winners.next().is_none().then_some(winner)
    }

    fn describe_items(&self, shift_items: &[Item], reduces: &[ProdId], accept: bool) -> Vec<String> {
        let mut items: Vec<String> = shift_items
            .iter()
            .map(|item| self.describe_item(item.prod, item.dot))
            .collect();
        for &r in reduces {
            let len = self.productions.get(r).steps.len();
            items.push(self.describe_item(r, len));
        }
        if accept {
            items.push(format!("{} •", self.prepared.variables[0].name));
        }
        items
    }

    fn describe_item(&self, prod: ProdId, dot: usize) -> String {
        let production = self.productions.get(prod);
        let mut out = format!("{} ->", self.prepared.variables[production.lhs as usize].name);
        for (i, step) in production.steps.iter().enumerate() {
            if i == dot {
                out.push_str(" •");
            }
            out.push(' ');
            out.push_str(&self.prepared.display(step.symbol));
        }
        if dot == production.steps.len() {
            out.push_str(" •");
        }
        out
    }

    fn record(&self, report: &mut ConflictReport, lookahead: &str, items: Vec<String>, resolution: Resolution) {
        tracing::debug!(lookahead, %resolution, "resolved parse conflict");
        report.push_parse(ParseConflict {
            lookahead: lookahead.to_owned(),
            items,
            resolution,
        });
    }
}
