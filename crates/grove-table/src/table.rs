//! Parse table data and its loaded, read-only view.

use std::collections::HashMap;
use std::io;
use std::path::Path;

use grove_core::{Grammar, GrammarError};
use serde::{Deserialize, Serialize};

use crate::action::{Action, FieldId, LexModeId, NO_STATE, ProductionId, StateId, SymbolId};
use crate::header::Header;
use crate::matcher::{Matcher, MatcherDef};
use crate::{HEADER_SIZE, VERSION};

/// Table load error.
#[derive(Debug, thiserror::Error)]
pub enum TableError {
    #[error("invalid magic: expected GRVT")]
    InvalidMagic,
    #[error("unsupported version: {0} (expected {VERSION})")]
    UnsupportedVersion(u32),
    #[error("file too small: {0} bytes (minimum 64)")]
    FileTooSmall(usize),
    #[error("size mismatch: header says {header} bytes, got {actual}")]
    SizeMismatch { header: u32, actual: usize },
    #[error("checksum mismatch: header says {expected:#010x}, body hashes to {actual:#010x}")]
    ChecksumMismatch { expected: u32, actual: u32 },
    #[error(
        "table was compiled from a different grammar (fingerprint {found:#010x}, expected {expected:#010x})"
    )]
    TableGrammarMismatch { expected: u32, found: u32 },
    #[error("malformed table body: {0}")]
    Decode(#[from] postcard::Error),
    #[error("malformed table: {0}")]
    Malformed(String),
    #[error("invalid matcher for token `{token}`: {message}")]
    InvalidDfa { token: String, message: String },
    #[error(transparent)]
    Grammar(#[from] GrammarError),
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SymbolKind {
    /// End of input, always symbol 0.
    End,
    Token,
    NonTerminal,
    /// A name introduced by `alias(...)`, only ever attached to children.
    Alias,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SymbolInfo {
    pub name: String,
    pub kind: SymbolKind,
    /// Hidden symbols are flattened out of the node view.
    pub visible: bool,
    /// Named symbols come from rules; anonymous ones from string literals.
    pub named: bool,
    pub supertype: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldEntry {
    /// Index among the production's structural (non-extra) children.
    pub child_index: u16,
    pub field: FieldId,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductionInfo {
    pub lhs: SymbolId,
    pub child_count: u16,
    pub dynamic_precedence: i32,
    /// Sorted by `child_index`.
    pub fields: Vec<FieldEntry>,
    /// Empty, or one entry per child.
    pub aliases: Vec<Option<SymbolId>>,
}

impl ProductionInfo {
    pub fn alias_at(&self, child_index: usize) -> Option<SymbolId> {
        self.aliases.get(child_index).copied().flatten()
    }

    pub fn fields_at(&self, child_index: usize) -> impl Iterator<Item = FieldId> + '_ {
        self.fields
            .iter()
            .filter(move |f| f.child_index as usize == child_index)
            .map(|f| f.field)
    }
}

/// Set of terminals the lexer may produce in a given context.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LexMode {
    /// Sorted. Includes extras and, when valid, the end symbol.
    pub tokens: Vec<SymbolId>,
}

impl LexMode {
    pub fn contains(&self, symbol: SymbolId) -> bool {
        self.tokens.binary_search(&symbol).is_ok()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDef {
    pub matcher: MatcherDef,
    /// Lexical precedence, from the outermost `prec` around the token.
    pub precedence: i32,
    /// Only matches with no leading trivia.
    pub immediate: bool,
    /// Named extra (e.g. a comment) that may appear between any two tokens.
    pub extra: bool,
    /// String token that the `word` token also matches.
    pub keyword: bool,
}

/// Serialized table body.
///
/// Symbol ids are laid out as: end (0), tokens, non-terminals, aliases, ERROR.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableData {
    pub grammar_name: String,
    pub symbols: Vec<SymbolInfo>,
    /// Tokens plus the end symbol.
    pub terminal_count: u16,
    pub nonterminal_count: u16,
    pub start_symbol: SymbolId,
    pub error_symbol: SymbolId,
    pub fields: Vec<String>,
    pub productions: Vec<ProductionInfo>,
    pub state_count: u16,
    /// `state * terminal_count + terminal` into `action_pool`.
    pub action_index: Vec<u32>,
    /// Entry 0 is the lone error action.
    pub action_pool: Vec<Vec<Action>>,
    /// `state * nonterminal_count + (symbol - terminal_count)`.
    pub goto_table: Vec<StateId>,
    pub lex_modes: Vec<LexMode>,
    pub state_lex_modes: Vec<LexModeId>,
    /// Mode used while skipping input during recovery: every token.
    pub error_lex_mode: LexModeId,
    /// Indexed by `symbol - 1`.
    pub tokens: Vec<TokenDef>,
    pub trivia: Vec<MatcherDef>,
    pub word_token: Option<SymbolId>,
}

/// A loaded parse table.
///
/// Immutable once built; share it across threads behind an `Arc`.
#[derive(Debug)]
pub struct ParseTable {
    data: TableData,
    fingerprint: u32,
    matchers: Vec<Matcher>,
    trivia: Vec<Matcher>,
    keywords: HashMap<Vec<u8>, SymbolId>,
}

const ERROR_CELL: &[Action] = &[Action::Error];

impl ParseTable {
    /// Build the runtime view, checking that every index is in bounds.
    pub fn new(data: TableData, fingerprint: u32) -> Result<Self, TableError> {
        check_shape(&data)?;

        let mut matchers = Vec::with_capacity(data.tokens.len());
        let mut keywords = HashMap::new();
        for (i, token) in data.tokens.iter().enumerate() {
            let symbol = (i + 1) as SymbolId;
            let matcher =
                Matcher::from_def(&token.matcher).map_err(|message| TableError::InvalidDfa {
                    token: data.symbols[symbol as usize].name.clone(),
                    message,
                })?;
            if token.keyword
                && let Some(lit) = matcher.literal()
            {
                keywords.insert(lit.to_vec(), symbol);
            }
            matchers.push(matcher);
        }
        let trivia = data
            .trivia
            .iter()
            .map(|def| {
                Matcher::from_def(def).map_err(|message| TableError::InvalidDfa {
                    token: "extras".to_owned(),
                    message,
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            data,
            fingerprint,
            matchers,
            trivia,
            keywords,
        })
    }

    /// Load a table from bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, TableError> {
        if bytes.len() < HEADER_SIZE {
            return Err(TableError::FileTooSmall(bytes.len()));
        }

        let header = Header::from_bytes(&bytes[..HEADER_SIZE]);
        if !header.validate_magic() {
            return Err(TableError::InvalidMagic);
        }
        if !header.validate_version() {
            return Err(TableError::UnsupportedVersion(header.version));
        }
        if header.total_size as usize != bytes.len() {
            return Err(TableError::SizeMismatch {
                header: header.total_size,
                actual: bytes.len(),
            });
        }

        let body = &bytes[HEADER_SIZE..];
        let actual = crc32fast::hash(body);
        if actual != header.checksum {
            return Err(TableError::ChecksumMismatch {
                expected: header.checksum,
                actual,
            });
        }

        let data: TableData = postcard::from_bytes(body)?;
        if data.state_count != header.state_count
            || data.symbols.len() != header.symbol_count as usize
            || data.terminal_count != header.terminal_count
        {
            return Err(TableError::Malformed(
                "header counts disagree with table body".to_owned(),
            ));
        }
        Self::new(data, header.grammar_fingerprint)
    }

    /// Load a table from a file path.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, TableError> {
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&bytes)
    }

    /// Load a table and check it was compiled from `grammar`.
    pub fn from_bytes_for(bytes: &[u8], grammar: &Grammar) -> Result<Self, TableError> {
        let table = Self::from_bytes(bytes)?;
        table.verify_grammar(grammar)?;
        Ok(table)
    }

    pub fn verify_grammar(&self, grammar: &Grammar) -> Result<(), TableError> {
        let expected = grammar.fingerprint()?;
        if expected != self.fingerprint {
            return Err(TableError::TableGrammarMismatch {
                expected,
                found: self.fingerprint,
            });
        }
        Ok(())
    }

    /// Serialize into the on-disk format.
    pub fn to_bytes(&self) -> Result<Vec<u8>, TableError> {
        let body = postcard::to_allocvec(&self.data)?;
        let header = Header {
            checksum: crc32fast::hash(&body),
            total_size: (HEADER_SIZE + body.len()) as u32,
            grammar_fingerprint: self.fingerprint,
            state_count: self.data.state_count,
            symbol_count: self.data.symbols.len() as u16,
            terminal_count: self.data.terminal_count,
            production_count: self.data.productions.len() as u16,
            field_count: self.data.fields.len() as u16,
            lex_mode_count: self.data.lex_modes.len() as u16,
            ..Default::default()
        };

        let mut out = Vec::with_capacity(HEADER_SIZE + body.len());
        out.extend_from_slice(&header.to_bytes());
        out.extend_from_slice(&body);
        Ok(out)
    }

    pub fn data(&self) -> &TableData {
        &self.data
    }

    pub fn grammar_name(&self) -> &str {
        &self.data.grammar_name
    }

    pub fn fingerprint(&self) -> u32 {
        self.fingerprint
    }

    pub fn state_count(&self) -> usize {
        self.data.state_count as usize
    }

    pub fn symbol_count(&self) -> usize {
        self.data.symbols.len()
    }

    pub fn terminal_count(&self) -> usize {
        self.data.terminal_count as usize
    }

    /// The action cell for `(state, symbol)`.
    ///
    /// Total: any pair outside the terminal range, including the ERROR
    /// symbol, yields a single error action.
    #[inline]
    pub fn actions(&self, state: StateId, symbol: SymbolId) -> &[Action] {
        let t = self.data.terminal_count as usize;
        if symbol as usize >= t || state as usize >= self.state_count() {
            return ERROR_CELL;
        }
        let idx = self.data.action_index[state as usize * t + symbol as usize];
        &self.data.action_pool[idx as usize]
    }

    /// State reached after reducing to `symbol` on top of `state`.
    #[inline]
    pub fn goto(&self, state: StateId, symbol: SymbolId) -> Option<StateId> {
        let t = self.data.terminal_count as usize;
        let n = self.data.nonterminal_count as usize;
        let sym = symbol as usize;
        if sym < t || sym >= t + n || state as usize >= self.state_count() {
            return None;
        }
        let next = self.data.goto_table[state as usize * n + (sym - t)];
        (next != NO_STATE).then_some(next)
    }

    pub fn symbols(&self) -> &[SymbolInfo] {
        &self.data.symbols
    }

    pub fn symbol(&self, id: SymbolId) -> &SymbolInfo {
        &self.data.symbols[id as usize]
    }

    pub fn symbol_name(&self, id: SymbolId) -> &str {
        &self.data.symbols[id as usize].name
    }

    /// Every symbol with the given name and namedness.
    ///
    /// A name can map to several ids: a rule and an alias that reuses its
    /// name, for instance.
    pub fn symbols_named<'a>(
        &'a self,
        name: &'a str,
        named: bool,
    ) -> impl Iterator<Item = SymbolId> + 'a {
        self.data
            .symbols
            .iter()
            .enumerate()
            .filter(move |(_, s)| s.name == name && s.named == named)
            .map(|(i, _)| i as SymbolId)
    }

    pub fn is_terminal(&self, id: SymbolId) -> bool {
        (id as usize) < self.terminal_count()
    }

    pub fn end_symbol(&self) -> SymbolId {
        0
    }

    pub fn start_symbol(&self) -> SymbolId {
        self.data.start_symbol
    }

    pub fn error_symbol(&self) -> SymbolId {
        self.data.error_symbol
    }

    pub fn fields(&self) -> &[String] {
        &self.data.fields
    }

    pub fn field_name(&self, id: FieldId) -> &str {
        &self.data.fields[id as usize]
    }

    pub fn field_id(&self, name: &str) -> Option<FieldId> {
        self.data
            .fields
            .iter()
            .position(|f| f == name)
            .map(|i| i as FieldId)
    }

    pub fn production(&self, id: ProductionId) -> &ProductionInfo {
        &self.data.productions[id as usize]
    }

    pub fn productions(&self) -> &[ProductionInfo] {
        &self.data.productions
    }

    pub fn lex_mode_for(&self, state: StateId) -> LexModeId {
        self.data.state_lex_modes[state as usize]
    }

    pub fn lex_mode(&self, id: LexModeId) -> &LexMode {
        &self.data.lex_modes[id as usize]
    }

    pub fn error_lex_mode(&self) -> LexModeId {
        self.data.error_lex_mode
    }

    /// Token definition for a terminal other than the end symbol.
    pub fn token(&self, symbol: SymbolId) -> &TokenDef {
        &self.data.tokens[symbol as usize - 1]
    }

    pub fn matcher(&self, symbol: SymbolId) -> &Matcher {
        &self.matchers[symbol as usize - 1]
    }

    pub fn trivia(&self) -> &[Matcher] {
        &self.trivia
    }

    pub fn word_token(&self) -> Option<SymbolId> {
        self.data.word_token
    }

    /// Keyword token whose text is exactly `lexeme`.
    pub fn keyword_for(&self, lexeme: &[u8]) -> Option<SymbolId> {
        self.keywords.get(lexeme).copied()
    }
}

fn check_shape(data: &TableData) -> Result<(), TableError> {
    let malformed = |what: &str| Err(TableError::Malformed(what.to_owned()));

    let t = data.terminal_count as usize;
    let n = data.nonterminal_count as usize;
    let states = data.state_count as usize;

    if t == 0 || data.symbols.len() < t + n + 1 {
        return malformed("symbol table too short");
    }
    let id_space = usize::from(u16::MAX);
    if data.symbols.len() > id_space
        || data.productions.len() > id_space
        || data.fields.len() > id_space
        || data.lex_modes.len() > id_space
    {
        return malformed("more entries than 16-bit ids can address");
    }
    if data.tokens.len() != t - 1 {
        return malformed("token count disagrees with terminal count");
    }
    let nonterminal = |id: SymbolId| (t..t + n).contains(&(id as usize));
    if !nonterminal(data.start_symbol) {
        return malformed("start symbol is not a nonterminal");
    }
    if data.word_token.is_some_and(|w| w == 0 || w as usize >= t) {
        return malformed("word token is not a token");
    }
    for prod in &data.productions {
        if !nonterminal(prod.lhs)
            || prod.fields.iter().any(|f| f.field as usize >= data.fields.len())
            || prod.aliases.iter().flatten().any(|&a| a as usize >= data.symbols.len())
        {
            return malformed("production refers to an unknown symbol or field");
        }
    }
    if data
        .lex_modes
        .iter()
        .flat_map(|mode| &mode.tokens)
        .any(|&token| token as usize >= t)
    {
        return malformed("lex mode lists a non-terminal");
    }
    if data.error_symbol as usize >= data.symbols.len() {
        return malformed("error symbol out of range");
    }
    if states == 0 {
        return malformed("no parse states");
    }
    if data.action_index.len() != states * t {
        return malformed("action index has wrong length");
    }
    if data.action_pool.first().map(Vec::as_slice) != Some(ERROR_CELL) {
        return malformed("action pool must start with the error cell");
    }
    if data
        .action_index
        .iter()
        .any(|&i| i as usize >= data.action_pool.len())
    {
        return malformed("action index out of range");
    }
    for action in data.action_pool.iter().flatten() {
        match *action {
            Action::Shift { state } if state as usize >= states => {
                return malformed("shift target out of range");
            }
            Action::Reduce {
                symbol, production, ..
            } if symbol as usize >= t + n || production as usize >= data.productions.len() => {
                return malformed("reduction out of range");
            }
            _ => {}
        }
    }
    if data.goto_table.len() != states * n {
        return malformed("goto table has wrong length");
    }
    if data
        .goto_table
        .iter()
        .any(|&s| s != NO_STATE && s as usize >= states)
    {
        return malformed("goto target out of range");
    }
    if data.state_lex_modes.len() != states
        || data
            .state_lex_modes
            .iter()
            .chain(std::iter::once(&data.error_lex_mode))
            .any(|&m| m as usize >= data.lex_modes.len())
    {
        return malformed("lex mode out of range");
    }
    Ok(())
}
