//! Table emission: assign symbol ids and flatten rows into [`TableData`].

use std::collections::{BTreeSet, HashMap};

use grove_table::{
    Action, FieldEntry, LexMode, LexModeId, NO_STATE, ProductionInfo, StateId, SymbolId,
    SymbolInfo, SymbolKind, TableData, TokenDef,
};
use indexmap::IndexSet;

use crate::conflicts::{ParseAction, Row};
use crate::{Error, Result};
use crate::flatten::Productions;
use crate::lexical::Lexical;
use crate::prepare::{Prepared, Sym};

pub(crate) fn emit(
    prepared: &Prepared,
    productions: &Productions,
    rows: &[Row],
    lexical: &Lexical,
) -> Result<TableData> {
    let symbols = SymbolLayout::new(prepared, productions);
    id_count("symbols", symbols.infos.len())?;
    id_count("productions", productions.list.len())?;
    let state_count = id_count("states", rows.len())?;
    let fields: Vec<String> = productions
        .list
        .iter()
        .flat_map(|p| p.steps.iter().filter_map(|s| s.field.clone()))
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();
    let field_id = |name: &str| fields.iter().position(|f| f == name).unwrap_or(0) as u16;

    let production_infos: Vec<ProductionInfo> = productions
        .list
        .iter()
        .map(|prod| {
            let fields = prod
                .steps
                .iter()
                .enumerate()
                .filter_map(|(i, step)| {
                    step.field.as_deref().map(|name| FieldEntry {
                        child_index: i as u16,
                        field: field_id(name),
                    })
                })
                .collect();
            let aliases = if prod.steps.iter().any(|s| s.alias.is_some()) {
                prod.steps
                    .iter()
                    .map(|s| s.alias.as_ref().map(|alias| symbols.alias(alias)))
                    .collect()
            } else {
                Vec::new()
            };
            ProductionInfo {
                lhs: symbols.of(Sym::NonTerminal(prod.lhs)),
                child_count: prod.steps.len() as u16,
                dynamic_precedence: prod.dynamic_precedence,
                fields,
                aliases,
            }
        })
        .collect();

    let terminal_count = prepared.tokens.len() + 1;
    let nonterminal_count = prepared.variables.len();

    // Index 0 is the shared error cell.
    let mut action_pool: IndexSet<Vec<Action>> = IndexSet::from([vec![Action::Error]]);
    let mut action_index = vec![0u32; rows.len() * terminal_count];
    let mut goto_table = vec![NO_STATE; rows.len() * nonterminal_count];
    let mut lex_modes: IndexSet<Vec<SymbolId>> = IndexSet::new();
    let mut state_lex_modes = Vec::with_capacity(rows.len());

    for (state, row) in rows.iter().enumerate() {
        for (&sym, cell) in &row.actions {
            let actions: Vec<Action> = cell
                .iter()
                .map(|a| match *a {
                    ParseAction::Shift(target) => Action::Shift {
                        state: target as StateId,
                    },
                    ParseAction::ShiftExtra => Action::ShiftExtra,
                    ParseAction::Accept => Action::Accept,
                    ParseAction::Reduce(p) => {
                        let prod = productions.get(p);
                        Action::Reduce {
                            symbol: symbols.of(Sym::NonTerminal(prod.lhs)),
                            child_count: prod.steps.len() as u16,
                            production: p as u16,
                            dynamic_precedence: prod.dynamic_precedence,
                        }
                    }
                })
                .collect();
            let (idx, _) = action_pool.insert_full(actions);
            action_index[state * terminal_count + symbols.of(sym) as usize] = idx as u32;
        }
        for (&var, &target) in &row.gotos {
            goto_table[state * nonterminal_count + var as usize] = target as StateId;
        }
        let valid: Vec<SymbolId> = row.actions.keys().map(|&s| symbols.of(s)).collect();
        state_lex_modes.push(lex_modes.insert_full(valid).0 as LexModeId);
    }
    let error_lex_mode = lex_modes
        .insert_full((0..terminal_count as SymbolId).collect())
        .0 as LexModeId;

    let tokens = prepared
        .tokens
        .iter()
        .enumerate()
        .map(|(i, token)| TokenDef {
            matcher: lexical.matchers[i].clone(),
            precedence: token.precedence,
            immediate: token.immediate,
            extra: token.extra,
            keyword: lexical.keywords[i],
        })
        .collect();

    let start_symbol = symbols.of(Sym::NonTerminal(0));
    let word_token = prepared.word_token.map(|t| symbols.of(Sym::Terminal(t)));
    Ok(TableData {
        grammar_name: prepared.name.clone(),
        start_symbol,
        error_symbol: symbols.error,
        symbols: symbols.infos,
        terminal_count: terminal_count as u16,
        nonterminal_count: nonterminal_count as u16,
        fields,
        productions: production_infos,
        state_count,
        action_index,
        action_pool: action_pool.into_iter().collect(),
        goto_table,
        lex_modes: lex_modes
            .into_iter()
            .map(|tokens| LexMode { tokens })
            .collect(),
        state_lex_modes,
        error_lex_mode,
        tokens,
        trivia: lexical.trivia.clone(),
        word_token,
    })
}

/// Table ids are 16 bits wide; `NO_STATE` takes the top state id.
pub(crate) fn id_count(what: &'static str, count: usize) -> Result<u16> {
    match u16::try_from(count) {
        Ok(count) if count < u16::MAX => Ok(count),
        _ => Err(Error::TableTooLarge {
            what,
            count,
            limit: usize::from(u16::MAX) - 1,
        }),
    }
}

/// Symbol ids: end, tokens, variables, aliases, ERROR.
struct SymbolLayout {
    infos: Vec<SymbolInfo>,
    terminal_count: usize,
    aliases: HashMap<(String, bool), SymbolId>,
    error: SymbolId,
}

impl SymbolLayout {
    fn new(prepared: &Prepared, productions: &Productions) -> Self {
        let mut infos = vec![SymbolInfo {
            name: "end".to_owned(),
            kind: SymbolKind::End,
            visible: false,
            named: false,
            supertype: false,
        }];
        for token in &prepared.tokens {
            infos.push(SymbolInfo {
                name: token.name.clone(),
                kind: SymbolKind::Token,
                visible: token.visible,
                named: token.named,
                supertype: false,
            });
        }
        for var in &prepared.variables {
            infos.push(SymbolInfo {
                name: var.name.clone(),
                kind: SymbolKind::NonTerminal,
                visible: var.visible(),
                named: true,
                supertype: var.supertype,
            });
        }

        // An alias reuses any visible symbol with the same name.
        let mut aliases = HashMap::new();
        for step in productions.list.iter().flat_map(|p| &p.steps) {
            let Some((name, named)) = &step.alias else {
                continue;
            };
            let key = (name.clone(), *named);
            if aliases.contains_key(&key) {
                continue;
            }
            let existing = infos
                .iter()
                .position(|s| s.visible && s.named == *named && &s.name == name);
            let id = match existing {
                Some(id) => id,
                None => {
                    infos.push(SymbolInfo {
                        name: name.clone(),
                        kind: SymbolKind::Alias,
                        visible: true,
                        named: *named,
                        supertype: false,
                    });
                    infos.len() - 1
                }
            };
            aliases.insert(key, id as SymbolId);
        }

        let error = infos.len() as SymbolId;
        infos.push(SymbolInfo {
            name: "ERROR".to_owned(),
            kind: SymbolKind::Error,
            visible: true,
            named: true,
            supertype: false,
        });

        Self {
            infos,
            terminal_count: prepared.tokens.len() + 1,
            aliases,
            error,
        }
    }

    fn of(&self, sym: Sym) -> SymbolId {
        match sym {
            Sym::End => 0,
            Sym::Terminal(t) => t + 1,
            Sym::NonTerminal(v) => (self.terminal_count + v as usize) as SymbolId,
        }
    }

    fn alias(&self, alias: &(String, bool)) -> SymbolId {
        self.aliases.get(alias).copied().unwrap_or(self.error)
    }
}
