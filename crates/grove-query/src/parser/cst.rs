//! Token and node kinds of the query syntax tree.
//!
//! Token variants carry their logos rules; node variants have none and only
//! appear in the tree the parser builds.

use logos::Logos;
use rowan::Language;

/// Tokens come first, then nodes. `__LAST` bounds the raw values rowan
/// may hand back.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(u16)]
pub enum SyntaxKind {
    #[token("(")]
    ParenOpen = 0,

    #[token(")")]
    ParenClose,

    #[token(":")]
    Colon,

    #[token("!")]
    Negation,

    #[token("_", priority = 3)]
    Underscore,

    #[token("*")]
    Star,

    #[token("+")]
    Plus,

    #[token("?")]
    Question,

    #[token("@")]
    At,

    /// Comma (invalid separator, for error recovery)
    #[token(",")]
    Comma,

    #[regex(r#""(?:[^"\\]|\\.)*""#)]
    #[doc(hidden)]
    StringLiteral, // Lexer-internal only

    DoubleQuote,
    /// String content between quotes
    StrVal,

    #[token("ERROR")]
    KwError,

    /// Node kinds, field names and capture names. Dots and hyphens are
    /// accepted so capture names like `@function.call` lex as one token.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_.\-]*")]
    Id,

    /// Predicates such as `#eq?` (unsupported)
    #[regex(r"#[a-zA-Z_][a-zA-Z0-9_\-]*[?!]?")]
    Predicate,

    #[regex(r"[ \t]+")]
    Whitespace,

    #[token("\n")]
    #[token("\r\n")]
    Newline,

    #[regex(r";[^\n]*", allow_greedy = true)]
    Comment,

    /// Coalesced unrecognized characters
    Garbage,
    Error,

    // --- Node kinds (non-terminals) ---
    Root,
    Pattern,
    Tree,
    Str,
    Wildcard,
    Field,
    NegatedField,
    Quantifier,
    Capture,

    // Must be last - used for bounds checking in `kind_from_raw`
    #[doc(hidden)]
    __LAST,
}

use SyntaxKind::*;

impl SyntaxKind {
    /// Skipped by the parser but kept in the tree.
    pub fn is_trivia(self) -> bool {
        matches!(self, Whitespace | Newline | Comment)
    }

    pub fn is_error(self) -> bool {
        matches!(self, Error | Garbage | Predicate)
    }

    fn from_raw(raw: u16) -> Self {
        assert!(raw < __LAST as u16, "raw syntax kind {raw} out of range");
        // SAFETY: `SyntaxKind` is `repr(u16)` with contiguous discriminants
        // below `__LAST`.
        unsafe { std::mem::transmute::<u16, SyntaxKind>(raw) }
    }
}

impl From<SyntaxKind> for rowan::SyntaxKind {
    fn from(kind: SyntaxKind) -> Self {
        Self(kind as u16)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum QueryLang {}

impl Language for QueryLang {
    type Kind = SyntaxKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> SyntaxKind {
        SyntaxKind::from_raw(raw.0)
    }

    fn kind_to_raw(kind: SyntaxKind) -> rowan::SyntaxKind {
        kind.into()
    }
}

pub type SyntaxNode = rowan::SyntaxNode<QueryLang>;
pub type SyntaxToken = rowan::SyntaxToken<QueryLang>;

/// Set of token kinds; only kinds below 64 fit, checked at compile time.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct TokenSet(u64);

const fn bit(kind: SyntaxKind) -> u64 {
    let raw = kind as u16;
    assert!(raw < 64, "token kind does not fit in a TokenSet");
    1 << raw
}

impl TokenSet {
    pub const EMPTY: TokenSet = TokenSet(0);

    pub const fn new(kinds: &[SyntaxKind]) -> Self {
        let mut set = Self::EMPTY;
        let mut i = 0;
        while i < kinds.len() {
            set = set.union(Self::single(kinds[i]));
            i += 1;
        }
        set
    }

    pub const fn single(kind: SyntaxKind) -> Self {
        TokenSet(bit(kind))
    }

    pub const fn contains(&self, kind: SyntaxKind) -> bool {
        (kind as u16) < 64 && self.0 & (1 << kind as u16) != 0
    }

    pub const fn union(self, other: TokenSet) -> TokenSet {
        TokenSet(self.0 | other.0)
    }
}

impl std::fmt::Debug for TokenSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let members = (0..(__LAST as u16).min(64))
            .filter(|raw| self.0 & (1 << raw) != 0)
            .map(SyntaxKind::from_raw);
        f.debug_set().entries(members).finish()
    }
}

pub mod token_sets {
    use super::*;

    /// Starts of a pattern inside a node. A capture never starts one.
    pub const EXPR_FIRST: TokenSet =
        TokenSet::new(&[ParenOpen, Underscore, Id, DoubleQuote, Negation, KwError]);

    /// Starts of a top-level pattern; `!field` needs an enclosing node.
    pub const ROOT_EXPR_FIRST: TokenSet =
        TokenSet::new(&[ParenOpen, Underscore, Id, DoubleQuote, KwError]);

    pub const QUANTIFIERS: TokenSet = TokenSet::new(&[Star, Plus, Question]);

    pub const SEPARATORS: TokenSet = TokenSet::single(Comma);

    /// Starts of a field value. Fields don't nest.
    pub const VALUE_FIRST: TokenSet =
        TokenSet::new(&[ParenOpen, Underscore, DoubleQuote, KwError]);
}
