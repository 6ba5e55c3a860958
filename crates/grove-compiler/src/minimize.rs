//! Merge canonical LR(1) states that share a core.
//!
//! Two states are compatible when every cell they both fill is identical
//! (shift targets compared by group), their gotos agree, and no terminal
//! one of them adds can compete lexically with a token the other already
//! accepts. Groups are split until stable, then renumbered so that each
//! group takes the position of its smallest member; state 0 stays 0.

use std::collections::{BTreeMap, HashMap};

use crate::automaton::Item;
use crate::conflicts::{ParseAction, Row};
use crate::lexical::Lexical;
use crate::prepare::Sym;

pub(crate) fn minimize(rows: Vec<Row>, lexical: &Lexical) -> Vec<Row> {
    let n = rows.len();

    let mut by_core: HashMap<&[Item], usize> = HashMap::new();
    let mut group_of = Vec::with_capacity(n);
    for row in &rows {
        let next = by_core.len();
        group_of.push(*by_core.entry(row.core.as_slice()).or_insert(next));
    }
    let mut group_count = by_core.len();

    loop {
        let mut members: Vec<Vec<usize>> = vec![Vec::new(); group_count];
        for (state, &g) in group_of.iter().enumerate() {
            members[g].push(state);
        }

        let mut next_group = vec![0; n];
        let mut count = 0;
        for block in &members {
            let mut parts: Vec<Vec<usize>> = Vec::new();
            for &state in block {
                let fits = parts.iter_mut().find(|part| {
                    part.iter()
                        .all(|&other| compatible(&rows[state], &rows[other], &group_of, lexical))
                });
                match fits {
                    Some(part) => part.push(state),
                    None => parts.push(vec![state]),
                }
            }
            for part in parts {
                for state in part {
                    next_group[state] = count;
                }
                count += 1;
            }
        }

        group_of = next_group;
        if count == group_count {
            break;
        }
        group_count = count;
    }

    // Renumber by smallest member.
    let mut first_member = vec![usize::MAX; group_count];
    for (state, &g) in group_of.iter().enumerate() {
        first_member[g] = first_member[g].min(state);
    }
    let mut order: Vec<usize> = (0..group_count).collect();
    order.sort_by_key(|&g| first_member[g]);
    let mut renumber = vec![0; group_count];
    for (new, &g) in order.iter().enumerate() {
        renumber[g] = new;
    }
    let final_of = |state: usize| renumber[group_of[state]];

    let mut merged: Vec<Option<Row>> = vec![None; group_count];
    for (state, row) in rows.into_iter().enumerate() {
        let row = remap(row, &final_of);
        let slot = &mut merged[final_of(state)];
        match slot {
            None => *slot = Some(row),
            Some(existing) => {
                for (sym, cell) in row.actions {
                    existing.actions.entry(sym).or_insert(cell);
                }
                for (var, target) in row.gotos {
                    existing.gotos.entry(var).or_insert(target);
                }
            }
        }
    }
    merged.into_iter().flatten().collect()
}

fn remap(row: Row, final_of: &impl Fn(usize) -> usize) -> Row {
    Row {
        actions: row
            .actions
            .into_iter()
            .map(|(sym, cell)| (sym, cell.into_iter().map(|a| map_action(a, final_of)).collect()))
            .collect(),
        gotos: row
            .gotos
            .into_iter()
            .map(|(var, target)| (var, final_of(target)))
            .collect(),
        core: row.core,
    }
}

fn map_action(action: ParseAction, group: &impl Fn(usize) -> usize) -> ParseAction {
    match action {
        ParseAction::Shift(target) => ParseAction::Shift(group(target)),
        other => other,
    }
}

fn compatible(a: &Row, b: &Row, group_of: &[usize], lexical: &Lexical) -> bool {
    let group = |s: usize| group_of[s];
    let same_cell = |x: &Vec<ParseAction>, y: &Vec<ParseAction>| {
        x.len() == y.len()
            && x.iter()
                .zip(y)
                .all(|(p, q)| map_action(*p, &group) == map_action(*q, &group))
    };

    for (sym, cell) in &a.actions {
        match b.actions.get(sym) {
            Some(other) if !same_cell(cell, other) => return false,
            Some(_) => {}
            None if adds_lexical_conflict(*sym, &b.actions, lexical) => return false,
            None => {}
        }
    }
    for sym in b.actions.keys() {
        if !a.actions.contains_key(sym) && adds_lexical_conflict(*sym, &a.actions, lexical) {
            return false;
        }
    }
    a.gotos.iter().all(|(var, &target)| match b.gotos.get(var) {
        Some(&other) => group(target) == group(other),
        None => true,
    })
}

fn adds_lexical_conflict(
    sym: Sym,
    valid: &BTreeMap<Sym, Vec<ParseAction>>,
    lexical: &Lexical,
) -> bool {
    valid.keys().any(|&other| lexical.conflicts(sym, other))
}
