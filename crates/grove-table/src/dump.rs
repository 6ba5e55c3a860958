//! Human-readable table dump for debugging.

use std::fmt::Write as _;

use crate::action::{Action, StateId, SymbolId};
use crate::table::{ParseTable, SymbolKind};

/// Generate a human-readable dump of the parse table.
pub fn dump(table: &ParseTable) -> String {
    let mut out = String::new();
    let ctx = DumpContext::new(table);

    dump_header(&mut out, table);
    dump_symbols(&mut out, table, &ctx);
    dump_fields(&mut out, table);
    dump_productions(&mut out, table, &ctx);
    dump_lex_modes(&mut out, table, &ctx);
    dump_states(&mut out, table, &ctx);

    out
}

/// Minimum width needed to display numbers up to `count - 1`.
fn width_for_count(count: usize) -> usize {
    if count <= 1 {
        1
    } else {
        ((count - 1) as f64).log10().floor() as usize + 1
    }
}

struct DumpContext {
    symbol_width: usize,
    state_width: usize,
    production_width: usize,
}

impl DumpContext {
    fn new(table: &ParseTable) -> Self {
        Self {
            symbol_width: width_for_count(table.symbol_count()),
            state_width: width_for_count(table.state_count()),
            production_width: width_for_count(table.productions().len()),
        }
    }
}

/// Symbol as written in grammars: named ones bare, anonymous ones quoted.
fn display_symbol(table: &ParseTable, id: SymbolId) -> String {
    let info = table.symbol(id);
    if info.named || info.kind == SymbolKind::End {
        info.name.clone()
    } else {
        format!("{:?}", info.name)
    }
}

fn dump_header(out: &mut String, table: &ParseTable) {
    out.push_str("[table]\n");
    writeln!(out, "grammar = {}", table.grammar_name()).unwrap();
    writeln!(out, "fingerprint = {:#010x}", table.fingerprint()).unwrap();
    writeln!(out, "states = {}", table.state_count()).unwrap();
    writeln!(out, "symbols = {}", table.symbol_count()).unwrap();
    writeln!(out, "start = {}", display_symbol(table, table.start_symbol())).unwrap();
    if let Some(word) = table.word_token() {
        writeln!(out, "word = {}", display_symbol(table, word)).unwrap();
    }
    out.push('\n');
}

fn dump_symbols(out: &mut String, table: &ParseTable, ctx: &DumpContext) {
    out.push_str("[symbols]\n");
    let w = ctx.symbol_width;
    for (i, info) in table.symbols().iter().enumerate() {
        let kind = match info.kind {
            SymbolKind::End => "end",
            SymbolKind::Token => "token",
            SymbolKind::NonTerminal => "rule",
            SymbolKind::Alias => "alias",
            SymbolKind::Error => "error",
        };
        let mut flags = Vec::new();
        if !info.visible {
            flags.push("hidden");
        }
        if info.supertype {
            flags.push("supertype");
        }
        if info.kind == SymbolKind::Token {
            let token = table.token(i as SymbolId);
            if token.extra {
                flags.push("extra");
            }
            if token.keyword {
                flags.push("keyword");
            }
            if token.immediate {
                flags.push("immediate");
            }
        }
        let name = display_symbol(table, i as SymbolId);
        if flags.is_empty() {
            writeln!(out, "S{i:0w$} {kind:<5} {name}").unwrap();
        } else {
            writeln!(out, "S{i:0w$} {kind:<5} {name} ({})", flags.join(", ")).unwrap();
        }
    }
    out.push('\n');
}

fn dump_fields(out: &mut String, table: &ParseTable) {
    if table.fields().is_empty() {
        return;
    }
    out.push_str("[fields]\n");
    let w = width_for_count(table.fields().len());
    for (i, name) in table.fields().iter().enumerate() {
        writeln!(out, "F{i:0w$} {name}").unwrap();
    }
    out.push('\n');
}

fn dump_productions(out: &mut String, table: &ParseTable, ctx: &DumpContext) {
    out.push_str("[productions]\n");
    let w = ctx.production_width;
    for (i, prod) in table.productions().iter().enumerate() {
        write!(
            out,
            "P{i:0w$} {} ({} children",
            display_symbol(table, prod.lhs),
            prod.child_count
        )
        .unwrap();
        if prod.dynamic_precedence != 0 {
            write!(out, ", dynamic {}", prod.dynamic_precedence).unwrap();
        }
        out.push(')');
        for field in &prod.fields {
            write!(
                out,
                " {}@{}",
                table.field_name(field.field),
                field.child_index
            )
            .unwrap();
        }
        for (child, alias) in prod.aliases.iter().enumerate() {
            if let Some(alias) = alias {
                write!(out, " {child}->{}", display_symbol(table, *alias)).unwrap();
            }
        }
        out.push('\n');
    }
    out.push('\n');
}

fn dump_lex_modes(out: &mut String, table: &ParseTable, ctx: &DumpContext) {
    out.push_str("[lex_modes]\n");
    let count = table.data().lex_modes.len();
    let w = width_for_count(count);
    for i in 0..count {
        let mode = table.lex_mode(i as u16);
        let tokens: Vec<_> = mode
            .tokens
            .iter()
            .map(|&t| format!("S{t:0sw$}", sw = ctx.symbol_width))
            .collect();
        let marker = if i == table.error_lex_mode() as usize {
            " (error)"
        } else {
            ""
        };
        writeln!(out, "L{i:0w$}{marker} {}", tokens.join(" ")).unwrap();
    }
    out.push('\n');
}

fn dump_states(out: &mut String, table: &ParseTable, ctx: &DumpContext) {
    out.push_str("[states]\n");
    let sw = ctx.state_width;
    let t = table.terminal_count();
    let n = table.data().nonterminal_count as usize;
    for state in 0..table.state_count() as StateId {
        writeln!(
            out,
            "{state:0sw$}: lex L{}",
            table.lex_mode_for(state)
        )
        .unwrap();
        for symbol in 0..t as SymbolId {
            let cell = table.actions(state, symbol);
            if cell.iter().all(Action::is_error) {
                continue;
            }
            let actions: Vec<_> = cell.iter().map(|a| format_action(a, ctx)).collect();
            writeln!(
                out,
                "  {} => {}",
                display_symbol(table, symbol),
                actions.join(" | ")
            )
            .unwrap();
        }
        for symbol in t..t + n {
            if let Some(next) = table.goto(state, symbol as SymbolId) {
                writeln!(
                    out,
                    "  {} -> {next:0sw$}",
                    display_symbol(table, symbol as SymbolId)
                )
                .unwrap();
            }
        }
    }
}

fn format_action(action: &Action, ctx: &DumpContext) -> String {
    match *action {
        Action::Shift { state } => format!("shift {state:0w$}", w = ctx.state_width),
        Action::ShiftExtra => "shift-extra".to_owned(),
        Action::Reduce {
            child_count,
            production,
            dynamic_precedence,
            ..
        } => {
            let mut s = format!(
                "reduce P{production:0w$}/{child_count}",
                w = ctx.production_width
            );
            if dynamic_precedence != 0 {
                write!(s, " dyn {dynamic_precedence}").unwrap();
            }
            s
        }
        Action::Accept => "accept".to_owned(),
        Action::Error => "error".to_owned(),
    }
}
