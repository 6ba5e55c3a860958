//! Contextual lexer.
//!
//! Tokens are lexed on demand at a byte offset, against the valid-token set
//! of a lex mode. Anonymous extras are skipped as padding; every decision
//! records how far past the token the matchers looked, which bounds the
//! region an edit must stay clear of for the token to be reused.

use grove_table::{LexModeId, ParseTable, SymbolId};

/// A lexed token with absolute byte offsets.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Token {
    pub symbol: SymbolId,
    /// Where the leading trivia starts.
    pub padding_start: usize,
    pub start: usize,
    pub end: usize,
    /// Bytes past `end` the lexer inspected to decide this token.
    pub lookahead_bytes: usize,
    /// Lex mode the token was requested in.
    pub lex_mode: LexModeId,
}

impl Token {
    pub fn padding(&self) -> usize {
        self.start - self.padding_start
    }

    pub fn size(&self) -> usize {
        self.end - self.start
    }

    pub fn is_eof(&self) -> bool {
        self.symbol == 0
    }

    /// First byte that cannot influence this token.
    pub fn dependency_end(&self) -> usize {
        self.end + self.lookahead_bytes
    }
}

#[derive(Clone, Copy, Debug)]
pub struct Lexer<'a> {
    table: &'a ParseTable,
    source: &'a [u8],
}

struct Candidate {
    symbol: SymbolId,
    len: usize,
    precedence: i32,
    literal: bool,
    /// The word token, tried only to decide keywords.
    shadow: bool,
}

impl Candidate {
    /// Longer wins, then higher precedence, then literal over pattern.
    /// Equal candidates keep the earlier one.
    fn beats(&self, other: &Candidate) -> bool {
        (self.len, self.precedence, self.literal) > (other.len, other.precedence, other.literal)
    }
}

impl<'a> Lexer<'a> {
    pub fn new(table: &'a ParseTable, source: &'a [u8]) -> Self {
        Self { table, source }
    }

    pub fn source(&self) -> &'a [u8] {
        self.source
    }

    /// Lex one token whose padding starts at `pos`.
    ///
    /// Tries the tokens of `mode` first and every token second. When
    /// nothing matches, the result is an `ERROR` token over one character.
    pub fn lex(&self, pos: usize, mode: LexModeId) -> Token {
        let pos = pos.min(self.source.len());
        let mut examined = pos;
        let start = self.skip_trivia(pos, &mut examined);

        if start >= self.source.len() {
            return self.token(0, pos, start, start, examined, mode);
        }

        let immediate_ok = start == pos;
        let valid = &self.table.lex_mode(mode).tokens;
        let every = &self.table.lex_mode(self.table.error_lex_mode()).tokens;
        let found = self
            .select(start, immediate_ok, valid, &mut examined)
            .or_else(|| self.select(start, immediate_ok, every, &mut examined));

        match found {
            Some((symbol, len)) => self.token(symbol, pos, start, start + len, examined, mode),
            None => {
                let (width, looked) = char_width(&self.source[start..]);
                let end = start + width;
                let examined = examined.max(start + looked);
                self.token(self.table.error_symbol(), pos, start, end, examined, mode)
            }
        }
    }

    /// All tokens from the start of input, lexed with every token valid.
    pub fn tokens(&self) -> Tokens<'a> {
        self.tokens_from(0, self.table.error_lex_mode())
    }

    pub fn tokens_from(&self, pos: usize, mode: LexModeId) -> Tokens<'a> {
        Tokens {
            lexer: *self,
            pos,
            mode,
            done: false,
        }
    }

    fn token(
        &self,
        symbol: SymbolId,
        padding_start: usize,
        start: usize,
        end: usize,
        examined: usize,
        lex_mode: LexModeId,
    ) -> Token {
        Token {
            symbol,
            padding_start,
            start,
            end,
            lookahead_bytes: examined.saturating_sub(end),
            lex_mode,
        }
    }

    fn skip_trivia(&self, mut pos: usize, examined: &mut usize) -> usize {
        loop {
            let mut longest = 0;
            for matcher in self.table.trivia() {
                let result = matcher.longest_match(self.source, pos);
                *examined = (*examined).max(pos + result.examined);
                longest = longest.max(result.len.unwrap_or(0));
            }
            if longest == 0 {
                return pos;
            }
            pos += longest;
        }
    }

    fn select(
        &self,
        start: usize,
        immediate_ok: bool,
        candidates: &[SymbolId],
        examined: &mut usize,
    ) -> Option<(SymbolId, usize)> {
        let word = self.table.word_token();
        let mut best = None;
        let mut has_keyword = false;

        for &symbol in candidates {
            if symbol == 0 {
                continue;
            }
            let def = self.table.token(symbol);
            has_keyword |= def.keyword;
            if def.immediate && !immediate_ok {
                continue;
            }
            self.consider(symbol, start, false, examined, &mut best);
        }

        // A keyword must not match the prefix of a longer word.
        if has_keyword
            && let Some(word) = word
            && !candidates.contains(&word)
        {
            self.consider(word, start, true, examined, &mut best);
        }

        let best = best?;
        if Some(best.symbol) == word {
            let lexeme = &self.source[start..start + best.len];
            if let Some(keyword) = self.table.keyword_for(lexeme)
                && candidates.contains(&keyword)
            {
                return Some((keyword, best.len));
            }
            if best.shadow {
                return None;
            }
        }
        Some((best.symbol, best.len))
    }

    fn consider(
        &self,
        symbol: SymbolId,
        start: usize,
        shadow: bool,
        examined: &mut usize,
        best: &mut Option<Candidate>,
    ) {
        let matcher = self.table.matcher(symbol);
        let result = matcher.longest_match(self.source, start);
        *examined = (*examined).max(start + result.examined);

        let Some(len) = result.len.filter(|&len| len > 0) else {
            return;
        };
        let candidate = Candidate {
            symbol,
            len,
            precedence: self.table.token(symbol).precedence,
            literal: matcher.literal().is_some(),
            shadow,
        };
        if best.as_ref().is_none_or(|b| candidate.beats(b)) {
            *best = Some(candidate);
        }
    }
}

/// Width of the character at the start of `bytes` (1 for invalid UTF-8)
/// and the number of bytes inspected to decide it.
fn char_width(bytes: &[u8]) -> (usize, usize) {
    let width = match bytes.first() {
        Some(&b) if b >= 0xF0 => 4,
        Some(&b) if b >= 0xE0 => 3,
        Some(&b) if b >= 0xC0 => 2,
        _ => 1,
    };
    // A truncated sequence also depended on where the input ends.
    let looked = if bytes.len() < width { bytes.len() + 1 } else { width };
    match bytes.get(..width) {
        Some(prefix) if std::str::from_utf8(prefix).is_ok() => (width, looked),
        _ => (1, looked),
    }
}

/// Lazy token stream ending with (and including) the EOF token.
#[derive(Clone, Debug)]
pub struct Tokens<'a> {
    lexer: Lexer<'a>,
    pos: usize,
    mode: LexModeId,
    done: bool,
}

impl Iterator for Tokens<'_> {
    type Item = Token;

    fn next(&mut self) -> Option<Token> {
        if self.done {
            return None;
        }
        let token = self.lexer.lex(self.pos, self.mode);
        self.pos = token.end;
        self.done = token.is_eof();
        Some(token)
    }
}
