//! Tracing infrastructure for debugging parser execution.
//!
//! # Design: Zero-Cost Abstraction
//!
//! The engine is generic over [`Tracer`]. With [`NoopTracer`] every method
//! is an `#[inline(always)]` empty function and the calls disappear, so no
//! tracing state lives in the engine itself. [`PrintTracer`] resolves ids to
//! grammar names and collects one line per event.

use std::ops::Range;

use grove_core::Colors;
use grove_table::{ParseTable, StateId, SymbolId};

use crate::engine::Mode;
use crate::lexer::Token;

/// Tracer trait for parser instrumentation.
///
/// Methods receive raw ids; formatting and name resolution happen in the
/// implementation. Versions are identified by a number that is unique
/// within one parse.
///
/// - `trace_lex` - after the lexer produced a token
/// - `trace_shift` - after a token was pushed
/// - `trace_reduce` - after a node was built by a reduction
/// - `trace_fork` - when a multi-action cell split a version
/// - `trace_merge` - when two versions reached the same stack
/// - `trace_drop` - when a version was discarded
/// - `trace_mode` - on every engine mode change
/// - `trace_recover` - after error recovery chose a configuration
/// - `trace_reuse` - when a prior subtree was pushed whole
/// - `trace_accept` - when a version accepted the input
pub trait Tracer {
    fn trace_lex(&mut self, token: &Token);

    fn trace_shift(&mut self, version: usize, symbol: SymbolId, state: StateId);

    fn trace_reduce(&mut self, version: usize, symbol: SymbolId, child_count: usize, state: StateId);

    fn trace_fork(&mut self, version: usize, forked: usize);

    fn trace_merge(&mut self, kept: usize, dropped: usize);

    fn trace_drop(&mut self, version: usize);

    fn trace_mode(&mut self, mode: Mode);

    fn trace_recover(&mut self, version: usize, skipped: usize, popped: usize);

    fn trace_reuse(&mut self, version: usize, symbol: SymbolId, range: Range<usize>);

    fn trace_accept(&mut self, version: usize);
}

/// No-op tracer that gets optimized away.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_lex(&mut self, _token: &Token) {}

    #[inline(always)]
    fn trace_shift(&mut self, _version: usize, _symbol: SymbolId, _state: StateId) {}

    #[inline(always)]
    fn trace_reduce(
        &mut self,
        _version: usize,
        _symbol: SymbolId,
        _child_count: usize,
        _state: StateId,
    ) {
    }

    #[inline(always)]
    fn trace_fork(&mut self, _version: usize, _forked: usize) {}

    #[inline(always)]
    fn trace_merge(&mut self, _kept: usize, _dropped: usize) {}

    #[inline(always)]
    fn trace_drop(&mut self, _version: usize) {}

    #[inline(always)]
    fn trace_mode(&mut self, _mode: Mode) {}

    #[inline(always)]
    fn trace_recover(&mut self, _version: usize, _skipped: usize, _popped: usize) {}

    #[inline(always)]
    fn trace_reuse(&mut self, _version: usize, _symbol: SymbolId, _range: Range<usize>) {}

    #[inline(always)]
    fn trace_accept(&mut self, _version: usize) {}
}

/// Tracer that collects human-readable lines.
pub struct PrintTracer<'t> {
    table: &'t ParseTable,
    colors: Colors,
    lines: Vec<String>,
}

impl<'t> PrintTracer<'t> {
    pub fn new(table: &'t ParseTable, colors: Colors) -> Self {
        Self {
            table,
            colors,
            lines: Vec::new(),
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Print all trace lines.
    pub fn print(&self) {
        for line in &self.lines {
            println!("{}", line);
        }
    }

    /// Symbol name, blue when named and quoted green when anonymous.
    fn symbol(&self, symbol: SymbolId) -> String {
        let c = &self.colors;
        let info = self.table.symbol(symbol);
        if symbol == self.table.error_symbol() {
            format!("{}{}{}", c.red, info.name, c.reset)
        } else if info.named || symbol == self.table.end_symbol() {
            format!("{}{}{}", c.blue, info.name, c.reset)
        } else {
            format!("{}\"{}\"{}", c.green, info.name, c.reset)
        }
    }

    fn push(&mut self, event: &str, version: Option<usize>, content: String) {
        let c = &self.colors;
        let version = version.map_or(String::new(), |v| format!("v{v} "));
        let line = format!("{event:<8}{}{version}{}{content}", c.dim, c.reset);
        self.lines.push(line.trim_end().to_owned());
    }
}

impl Tracer for PrintTracer<'_> {
    fn trace_lex(&mut self, token: &Token) {
        let c = self.colors;
        let content = format!(
            "{} {}{}..{}{}",
            self.symbol(token.symbol),
            c.dim,
            token.start,
            token.end,
            c.reset
        );
        self.push("lex", None, content);
    }

    fn trace_shift(&mut self, version: usize, symbol: SymbolId, state: StateId) {
        let content = format!("{} -> {}", self.symbol(symbol), state);
        self.push("shift", Some(version), content);
    }

    fn trace_reduce(&mut self, version: usize, symbol: SymbolId, child_count: usize, state: StateId) {
        let content = format!("{}/{} -> {}", self.symbol(symbol), child_count, state);
        self.push("reduce", Some(version), content);
    }

    fn trace_fork(&mut self, version: usize, forked: usize) {
        self.push("fork", Some(version), format!("-> v{forked}"));
    }

    fn trace_merge(&mut self, kept: usize, dropped: usize) {
        self.push("merge", Some(kept), format!("absorbs v{dropped}"));
    }

    fn trace_drop(&mut self, version: usize) {
        self.push("drop", Some(version), String::new());
    }

    fn trace_mode(&mut self, mode: Mode) {
        self.push("mode", None, format!("{mode:?}"));
    }

    fn trace_recover(&mut self, version: usize, skipped: usize, popped: usize) {
        let c = self.colors;
        let content = format!("{}skip {skipped} pop {popped}{}", c.red, c.reset);
        self.push("recover", Some(version), content);
    }

    fn trace_reuse(&mut self, version: usize, symbol: SymbolId, range: Range<usize>) {
        let c = self.colors;
        let content = format!(
            "{} {}{}..{}{}",
            self.symbol(symbol),
            c.dim,
            range.start,
            range.end,
            c.reset
        );
        self.push("reuse", Some(version), content);
    }

    fn trace_accept(&mut self, version: usize) {
        self.push("accept", Some(version), String::new());
    }
}
