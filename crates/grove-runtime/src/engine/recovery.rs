//! Error recovery search.
//!
//! Candidates are pairs `(k, d)`: skip `k` tokens, pop `d` stack entries.
//! The cheapest candidate whose resumed configuration can eventually shift
//! or accept its lookahead wins; ties go to fewer skipped tokens, then to
//! fewer popped entries.

use std::collections::HashMap;

use grove_table::{Action, ParseTable, StateId, SymbolId};

use super::stack::Stack;
use crate::config::ParseConfig;
use crate::lexer::{Lexer, Token};

/// The configuration recovery settled on.
#[derive(Debug)]
pub(crate) struct Recovery {
    /// Tokens to wrap in the `ERROR` node, lexed with every token valid.
    pub skipped: Vec<Token>,
    pub popped: usize,
    /// Offset where parsing resumes.
    pub resume_at: usize,
}

/// Search for a recovery from an error at `position`. `None` means no
/// configuration resumes before end of input.
pub(crate) fn find(
    table: &ParseTable,
    config: &ParseConfig,
    lexer: &Lexer<'_>,
    stack: &Stack,
    position: usize,
) -> Option<Recovery> {
    let costs = &config.recovery;
    let max_skipped = costs.max_skipped_tokens.unwrap_or(usize::MAX);
    let every = table.error_lex_mode();

    let mut skipped = Vec::new();
    let mut resume = vec![position];
    let mut best: Option<(u64, usize, usize)> = None;

    for k in 0.. {
        if best.is_some_and(|(cost, ..)| costs.cost(k, 0) >= cost) {
            break;
        }

        let at = resume[k];
        let mut lexed = HashMap::new();
        let mut states = stack.states_below(0);
        for d in 0..=stack.len() {
            if d > 0 && !stack.is_extra_at(d - 1) {
                states.pop();
            }
            let key = (costs.cost(k, d), k, d);
            if best.is_some_and(|b| key >= b) {
                continue;
            }
            let Some(&top) = states.last() else {
                break;
            };
            let mode = table.lex_mode_for(top);
            let symbol = lexed
                .entry(mode)
                .or_insert_with(|| lexer.lex(at, mode).symbol);
            if can_resume(table, config.reduction_limit, &states, *symbol) {
                best = Some(key);
            }
        }

        if k >= max_skipped {
            break;
        }
        let token = lexer.lex(at, every);
        if token.is_eof() {
            break;
        }
        skipped.push(token);
        resume.push(token.end);
    }

    let (_, k, d) = best?;
    skipped.truncate(k);
    Some(Recovery {
        skipped,
        popped: d,
        resume_at: resume[k],
    })
}

/// Simulate the preferred actions for `symbol` on top of `states` until a
/// shift or accept (success) or an error (failure).
pub(crate) fn can_resume(
    table: &ParseTable,
    reduction_limit: usize,
    states: &[StateId],
    symbol: SymbolId,
) -> bool {
    // Pops eat into `states` by shrinking `base`; pushes go to `pushed`.
    let mut base = states.len();
    let mut pushed: Vec<StateId> = Vec::new();

    for _ in 0..=reduction_limit {
        let top = match pushed.last() {
            Some(&state) => state,
            None if base > 0 => states[base - 1],
            None => return false,
        };
        match table.actions(top, symbol).first() {
            Some(Action::Shift { .. } | Action::ShiftExtra | Action::Accept) => return true,
            Some(&Action::Reduce {
                symbol: lhs,
                child_count,
                ..
            }) => {
                let mut count = child_count as usize;
                let from_pushed = count.min(pushed.len());
                pushed.truncate(pushed.len() - from_pushed);
                count -= from_pushed;
                if count >= base {
                    return false;
                }
                base -= count;
                let below = match pushed.last() {
                    Some(&state) => state,
                    None => states[base - 1],
                };
                let Some(next) = table.goto(below, lhs) else {
                    return false;
                };
                pushed.push(next);
            }
            _ => return false,
        }
    }
    false
}
