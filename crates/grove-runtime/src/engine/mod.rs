//! GLR parsing engine.
//!
//! Stack versions live in an explicit worklist. The version with the
//! smallest position advances by one token at a time; multi-action cells
//! fork it, and versions that reach identical stacks at the same position
//! merge. A version that errors while another is alive is dropped; the last
//! one standing recovers.

mod recovery;
mod stack;

#[cfg(test)]
mod engine_tests;
#[cfg(test)]
mod recovery_tests;

use std::cmp::Reverse;
use std::sync::Arc;

use grove_table::{Action, LexModeId, ParseTable, ProductionId, StateId, SymbolId};

use crate::config::ParseConfig;
use crate::incremental::{EditMap, InputEdit, ReuseCursor};
use crate::invariants::ensure_covers;
use crate::lexer::{Lexer, Token};
use crate::subtree::{NodeParts, Subtree};
use crate::trace::{NoopTracer, Tracer};
use crate::tree::Tree;

use self::stack::Stack;

/// Engine mode, reported to tracers on every change.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Normal,
    Recovering,
    Done,
    Failed,
}

/// Parses source text against one table.
///
/// A parser holds no per-parse state; it can be shared and used for any
/// number of sequential or concurrent parses.
#[derive(Clone, Debug)]
pub struct Parser {
    table: Arc<ParseTable>,
    config: ParseConfig,
}

impl Parser {
    pub fn new(table: Arc<ParseTable>) -> Self {
        Self::with_config(table, ParseConfig::default())
    }

    pub fn with_config(table: Arc<ParseTable>, config: ParseConfig) -> Self {
        Self { table, config }
    }

    pub fn table(&self) -> &Arc<ParseTable> {
        &self.table
    }

    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Parse `source` from scratch. Never fails: malformed input becomes
    /// `ERROR` nodes.
    pub fn parse(&self, source: &[u8]) -> Tree {
        self.parse_with(source, None, &mut NoopTracer)
    }

    /// Parse `source`, the text of `prior` after `edits`, sharing every
    /// prior subtree that the edits cannot have affected.
    ///
    /// The result is structurally identical to `parse(source)`.
    pub fn parse_incremental(&self, source: &[u8], prior: &Tree, edits: &[InputEdit]) -> Tree {
        self.parse_with(source, Some((prior, edits)), &mut NoopTracer)
    }

    /// Parse with a tracer observing engine events, optionally reusing a
    /// prior tree.
    pub fn parse_with<T: Tracer>(
        &self,
        source: &[u8],
        prior: Option<(&Tree, &[InputEdit])>,
        tracer: &mut T,
    ) -> Tree {
        let reuse = prior
            .filter(|(tree, _)| self.is_compatible(tree))
            .map(|(tree, edits)| Reuse {
                edits: EditMap::new(edits),
                cursor: ReuseCursor::new(tree.root_subtree()),
            });

        let run = Run::new(self, source, reuse, tracer);
        let root = run.run();
        ensure_covers(&root, source.len());

        tracing::debug!(
            grammar = %self.table.grammar_name(),
            bytes = source.len(),
            incremental = prior.is_some(),
            has_error = root.has_error,
            "parsed"
        );
        Tree::new(root, self.table.clone())
    }

    /// Whether subtrees of `tree` carry states of this parser's table.
    fn is_compatible(&self, tree: &Tree) -> bool {
        let other = tree.table();
        Arc::ptr_eq(other, &self.table)
            || (other.fingerprint() == self.table.fingerprint()
                && other.state_count() == self.table.state_count()
                && other.symbol_count() == self.table.symbol_count())
    }
}

struct Reuse {
    edits: EditMap,
    cursor: ReuseCursor,
}

#[derive(Clone)]
struct Lookahead {
    token: Token,
    /// Prior subtrees starting with `token`, largest first.
    reusable: Vec<Subtree>,
}

#[derive(Clone)]
struct Version {
    /// Creation order; earlier versions win ties.
    id: usize,
    stack: Stack,
    /// Where the next token's padding starts.
    position: usize,
    lookahead: Option<Lookahead>,
    /// Lex mode for the next token after a reused node, standing in for
    /// the states inside the node that were skipped.
    lex_mode: Option<LexModeId>,
    /// Reductions performed on the current lookahead.
    reductions: usize,
}

impl Version {
    /// Lower is better: error cost, then dynamic precedence (higher wins),
    /// then creation order.
    fn rank(&self) -> (u32, Reverse<i32>, usize) {
        (
            self.stack.error_cost(),
            Reverse(self.stack.dynamic_precedence()),
            self.id,
        )
    }
}

struct Accepted {
    rank: (u32, Reverse<i32>, usize),
    root: Subtree,
}

enum Step {
    /// Reduced; the same lookahead is still pending.
    Continue,
    Shifted,
    Accepted,
    Error,
}

struct Run<'p, T: Tracer> {
    table: &'p ParseTable,
    config: &'p ParseConfig,
    lexer: Lexer<'p>,
    reuse: Option<Reuse>,
    tracer: &'p mut T,
    versions: Vec<Version>,
    accepted: Vec<Accepted>,
    failed: Option<Subtree>,
    next_id: usize,
    mode: Mode,
}

impl<'p, T: Tracer> Run<'p, T> {
    fn new(parser: &'p Parser, source: &'p [u8], reuse: Option<Reuse>, tracer: &'p mut T) -> Self {
        Run {
            table: &parser.table,
            config: &parser.config,
            lexer: Lexer::new(&parser.table, source),
            reuse,
            tracer,
            versions: vec![Version {
                id: 0,
                stack: Stack::default(),
                position: 0,
                lookahead: None,
                lex_mode: None,
                reductions: 0,
            }],
            accepted: Vec::new(),
            failed: None,
            next_id: 1,
            mode: Mode::Normal,
        }
    }

    fn run(mut self) -> Subtree {
        while let Some(index) = self.next_version() {
            self.advance(index);
            self.merge();
            self.prune();
        }
        self.finish()
    }

    fn next_version(&self) -> Option<usize> {
        self.versions
            .iter()
            .enumerate()
            .min_by_key(|(_, v)| (v.position, v.id))
            .map(|(i, _)| i)
    }

    fn set_mode(&mut self, mode: Mode) {
        if self.mode != mode {
            self.mode = mode;
            self.tracer.trace_mode(mode);
        }
    }

    /// Run the version at `index` until it consumes its lookahead, accepts
    /// or errors.
    fn advance(&mut self, index: usize) {
        let table = self.table;
        let lookahead = self.lookahead(index);

        loop {
            let version = &self.versions[index];
            let cell = table.actions(version.stack.top_state(), lookahead.token.symbol);
            let over_limit = version.reductions > self.config.reduction_limit;
            let Some((&preferred, rest)) = cell.split_first() else {
                self.error(index);
                return;
            };
            if over_limit {
                self.error(index);
                return;
            }

            for &action in rest {
                self.fork(index, action, &lookahead);
            }
            match self.apply(index, preferred, &lookahead) {
                Step::Continue => continue,
                Step::Shifted | Step::Accepted => return,
                Step::Error => {
                    self.error(index);
                    return;
                }
            }
        }
    }

    fn lookahead(&mut self, index: usize) -> Lookahead {
        if let Some(lookahead) = self.versions[index].lookahead.take() {
            return lookahead;
        }

        let version = &self.versions[index];
        let position = version.position;
        let mode = version
            .lex_mode
            .unwrap_or_else(|| self.table.lex_mode_for(version.stack.top_state()));

        if self.versions.len() == 1
            && self.mode == Mode::Normal
            && let Some(lookahead) = self.reusable(position, mode)
        {
            return lookahead;
        }

        let token = self.lexer.lex(position, mode);
        self.tracer.trace_lex(&token);
        Lookahead {
            token,
            reusable: Vec::new(),
        }
    }

    /// Prior subtrees starting at `position` whose first leaf can stand in
    /// for lexing in `mode`.
    fn reusable(&mut self, position: usize, mode: LexModeId) -> Option<Lookahead> {
        let reuse = self.reuse.as_mut()?;
        let old = reuse.edits.to_old(position)?;
        let mut chain = reuse.cursor.candidates_at(old);

        let edits = &reuse.edits;
        let cursor = &reuse.cursor;
        let valid = |s: &Subtree| {
            let end = old + s.total() + s.lookahead_bytes;
            !s.has_error
                && !s.fragile
                && s.symbol != 0
                && edits.unchanged(old, end)
                && !cursor.near_error(old..end)
        };
        let leaf = chain.last()?.clone();
        if !leaf.leaf || leaf.lex_mode != mode || !valid(&leaf) {
            return None;
        }
        chain.retain(valid);

        let start = position + leaf.padding;
        let token = Token {
            symbol: leaf.symbol,
            padding_start: position,
            start,
            end: start + leaf.size,
            lookahead_bytes: leaf.lookahead_bytes,
            lex_mode: mode,
        };
        Some(Lookahead {
            token,
            reusable: chain,
        })
    }

    fn fork(&mut self, index: usize, action: Action, lookahead: &Lookahead) {
        let mut forked = self.versions[index].clone();
        forked.id = self.next_id;
        self.next_id += 1;
        self.tracer.trace_fork(self.versions[index].id, forked.id);
        self.versions.push(forked);

        let at = self.versions.len() - 1;
        match self.apply(at, action, lookahead) {
            Step::Continue => self.versions[at].lookahead = Some(lookahead.clone()),
            Step::Error => {
                let dropped = self.versions.remove(at);
                self.tracer.trace_drop(dropped.id);
            }
            Step::Shifted | Step::Accepted => {}
        }
    }

    fn apply(&mut self, index: usize, action: Action, lookahead: &Lookahead) -> Step {
        match action {
            Action::Shift { state } => {
                self.shift(index, state, lookahead, false);
                Step::Shifted
            }
            Action::ShiftExtra => {
                let state = self.versions[index].stack.top_state();
                self.shift(index, state, lookahead, true);
                Step::Shifted
            }
            Action::Reduce {
                symbol,
                child_count,
                production,
                dynamic_precedence,
            } => {
                let reduction = Reduction {
                    symbol,
                    child_count: child_count as usize,
                    production,
                    dynamic_precedence,
                };
                if self.reduce(index, reduction, &lookahead.token) {
                    Step::Continue
                } else {
                    Step::Error
                }
            }
            Action::Accept => {
                self.accept(index, &lookahead.token);
                Step::Accepted
            }
            Action::Error => Step::Error,
        }
    }

    fn shift(&mut self, index: usize, target: StateId, lookahead: &Lookahead, extra: bool) {
        let fragile = self.versions.len() > 1;
        let table = self.table;
        let version = &mut self.versions[index];
        let state = version.stack.top_state();

        let reused = if fragile {
            None
        } else {
            lookahead
                .reusable
                .iter()
                .filter(|s| s.parse_state == state && s.extra == extra && (s.leaf || !extra))
                .find_map(|s| {
                    if s.leaf {
                        Some((s.clone(), target))
                    } else {
                        table.goto(state, s.symbol).map(|next| (s.clone(), next))
                    }
                })
        };

        match reused {
            Some((subtree, next)) => {
                let start = version.position + subtree.padding;
                let end = version.position + subtree.total();
                let symbol = subtree.symbol;
                version.lex_mode = if subtree.leaf {
                    version.lex_mode.filter(|_| extra)
                } else {
                    Some(subtree.next_lex_mode)
                };
                version.stack.push(next, subtree);
                version.position = end;
                self.tracer.trace_reuse(version.id, symbol, start..end);
            }
            None => {
                let token = &lookahead.token;
                let leaf = Subtree::leaf(token, state, extra, fragile, false);
                if !extra {
                    version.lex_mode = None;
                }
                version.stack.push(target, leaf);
                version.position = token.end;
                self.tracer.trace_shift(version.id, token.symbol, target);
            }
        }
        version.lookahead = None;
        version.reductions = 0;
    }

    fn reduce(&mut self, index: usize, reduction: Reduction, lookahead: &Token) -> bool {
        let fragile = self.versions.len() > 1;
        let table = self.table;
        let version = &mut self.versions[index];

        let Some(below) = version.stack.state_below(reduction.child_count) else {
            return false;
        };
        let Some(next) = table.goto(below, reduction.symbol) else {
            return false;
        };
        let Some(popped) = version.stack.pop_children(reduction.child_count) else {
            return false;
        };

        let trailing: usize = popped.trailing.iter().map(Subtree::total).sum();
        // Reduced on a lookahead past a recovery, not on the token after it.
        let across_recovery = popped.trailing.iter().any(|s| s.has_error);
        let node_end = version.position - trailing;
        let node = Subtree::node(NodeParts {
            symbol: reduction.symbol,
            production: reduction.production,
            children: popped.children,
            parse_state: below,
            dynamic_precedence: reduction.dynamic_precedence,
            fragile: fragile || across_recovery,
            lookahead_floor: lookahead.dependency_end().saturating_sub(node_end),
            next_lex_mode: lookahead.lex_mode,
        });
        version.stack.push(next, node);
        for extra in popped.trailing {
            version.stack.push(next, extra);
        }
        version.reductions += 1;
        self.tracer
            .trace_reduce(version.id, reduction.symbol, reduction.child_count, next);
        true
    }

    fn accept(&mut self, index: usize, eof: &Token) {
        let version = self.versions.remove(index);
        let rank = version.rank();
        let eof = Subtree::leaf(eof, version.stack.top_state(), true, false, false);
        let root = self.build_root(version.stack.into_subtrees(), eof);
        self.tracer.trace_accept(version.id);
        self.accepted.push(Accepted { rank, root });
    }

    /// The start node, widened to hold the extras around it and the EOF
    /// leaf so the root spans the whole input.
    fn build_root(&self, entries: Vec<Subtree>, eof: Subtree) -> Subtree {
        let Some(at) = entries.iter().rposition(|s| !s.extra && !s.leaf) else {
            let mut children = entries;
            children.push(eof);
            return Subtree::error(self.table.error_symbol(), children, 0, false);
        };
        let top = &entries[at];
        let mut children = entries[..at].to_vec();
        children.extend(top.children.iter().cloned());
        children.extend(entries[at + 1..].iter().cloned());
        children.push(eof);

        Subtree::node(NodeParts {
            symbol: top.symbol,
            production: top.production,
            children,
            parse_state: 0,
            dynamic_precedence: self.table.production(top.production).dynamic_precedence,
            fragile: top.fragile,
            lookahead_floor: 0,
            next_lex_mode: top.next_lex_mode,
        })
    }

    fn error(&mut self, index: usize) {
        if self.versions.len() > 1 || !self.accepted.is_empty() {
            let dropped = self.versions.remove(index);
            self.tracer.trace_drop(dropped.id);
            return;
        }
        self.recover(index);
    }

    fn recover(&mut self, index: usize) {
        self.set_mode(Mode::Recovering);
        let version = &self.versions[index];
        let found = recovery::find(
            self.table,
            self.config,
            &self.lexer,
            &version.stack,
            version.position,
        );

        let Some(recovery) = found else {
            let version = self.versions.remove(index);
            self.failed = Some(self.failed_root(version.stack, version.position));
            self.set_mode(Mode::Failed);
            return;
        };

        let error_symbol = self.table.error_symbol();
        let version = &mut self.versions[index];
        let mut children = version.stack.pop_entries(recovery.popped);
        let state = version.stack.top_state();
        children.extend(recovery.skipped.iter().map(|token| {
            Subtree::leaf(token, state, false, false, token.symbol == error_symbol)
        }));
        if !children.is_empty() {
            let error = Subtree::error(error_symbol, children, state, true);
            version.stack.push_extra(error);
        }
        version.position = recovery.resume_at;
        version.lookahead = None;
        version.lex_mode = None;
        version.reductions = 0;

        self.tracer
            .trace_recover(version.id, recovery.skipped.len(), recovery.popped);
        self.set_mode(Mode::Normal);
    }

    /// Root `ERROR` holding whatever was parsed, then one `ERROR` over the
    /// rest of the input.
    fn failed_root(&self, stack: Stack, position: usize) -> Subtree {
        let error_symbol = self.table.error_symbol();
        let mut children = stack.into_subtrees();
        let mut rest = Vec::new();
        let mut eof = None;

        for token in self.lexer.tokens_from(position, self.table.error_lex_mode()) {
            if token.is_eof() {
                eof = Some(Subtree::leaf(&token, 0, true, false, false));
            } else {
                let is_error = token.symbol == error_symbol;
                rest.push(Subtree::leaf(&token, 0, false, false, is_error));
            }
        }
        if !rest.is_empty() {
            children.push(Subtree::error(error_symbol, rest, 0, false));
        }
        children.extend(eof);
        Subtree::error(error_symbol, children, 0, false)
    }

    fn merge(&mut self) {
        let mut i = 0;
        while i < self.versions.len() {
            let mut j = i + 1;
            while j < self.versions.len() {
                let (a, b) = (&self.versions[i], &self.versions[j]);
                if a.position != b.position || !a.stack.same_states(&b.stack) {
                    j += 1;
                    continue;
                }
                if b.rank() < a.rank() {
                    self.versions.swap(i, j);
                }
                let dropped = self.versions.remove(j);
                self.tracer.trace_merge(self.versions[i].id, dropped.id);
            }
            i += 1;
        }
    }

    fn prune(&mut self) {
        let limit = self.config.max_versions.max(1);
        while self.versions.len() > limit {
            let Some(worst) = (0..self.versions.len()).max_by_key(|&i| self.versions[i].rank())
            else {
                return;
            };
            let dropped = self.versions.remove(worst);
            self.tracer.trace_drop(dropped.id);
        }
    }

    fn finish(mut self) -> Subtree {
        let accepted = std::mem::take(&mut self.accepted);
        if let Some(best) = accepted.into_iter().min_by_key(|a| a.rank) {
            self.set_mode(Mode::Done);
            return best.root;
        }
        match self.failed.take() {
            Some(root) => root,
            None => self.failed_root(Stack::default(), 0),
        }
    }
}

#[derive(Clone, Copy)]
struct Reduction {
    symbol: SymbolId,
    child_count: usize,
    production: ProductionId,
    dynamic_precedence: i32,
}
