//! Conflict report produced alongside the table.

use std::fmt;

/// How a parse conflict was settled.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Resolution {
    Precedence,
    Associativity,
    /// Listed in the grammar's `conflicts`: every action kept for GLR.
    DeclaredConflict,
    DeclarationOrder,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ParseConflict {
    pub lookahead: String,
    /// Conflicting items, with `•` marking the dot.
    pub items: Vec<String>,
    pub resolution: Resolution,
}

/// How the lexer chooses between two tokens that can match the same text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LexicalResolution {
    LongestMatch,
    Precedence,
    /// A string token beats a pattern token matching the same text.
    Specificity,
    DeclarationOrder,
    Keyword,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct LexicalConflict {
    pub first: String,
    pub second: String,
    pub resolution: LexicalResolution,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConflictReport {
    pub parse: Vec<ParseConflict>,
    pub lexical: Vec<LexicalConflict>,
}

impl ConflictReport {
    pub fn is_empty(&self) -> bool {
        self.parse.is_empty() && self.lexical.is_empty()
    }

    pub(crate) fn push_parse(&mut self, conflict: ParseConflict) {
        if !self.parse.contains(&conflict) {
            self.parse.push(conflict);
        }
    }

    pub(crate) fn push_lexical(&mut self, conflict: LexicalConflict) {
        if !self.lexical.contains(&conflict) {
            self.lexical.push(conflict);
        }
    }

    /// Parse conflicts kept as GLR split points.
    pub fn glr_conflicts(&self) -> impl Iterator<Item = &ParseConflict> {
        self.parse
            .iter()
            .filter(|c| c.resolution == Resolution::DeclaredConflict)
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Resolution::Precedence => "precedence",
            Resolution::Associativity => "associativity",
            Resolution::DeclaredConflict => "declared conflict (GLR)",
            Resolution::DeclarationOrder => "declaration order",
        })
    }
}

impl fmt::Display for LexicalResolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LexicalResolution::LongestMatch => "longest match",
            LexicalResolution::Precedence => "token precedence",
            LexicalResolution::Specificity => "string over pattern",
            LexicalResolution::DeclarationOrder => "declaration order",
            LexicalResolution::Keyword => "keyword",
        })
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.parse.is_empty() {
            writeln!(f, "parse conflicts:")?;
            for c in &self.parse {
                writeln!(f, "  on {}: {}", c.lookahead, c.resolution)?;
                for item in &c.items {
                    writeln!(f, "    {item}")?;
                }
            }
        }
        if !self.lexical.is_empty() {
            writeln!(f, "lexical conflicts:")?;
            for c in &self.lexical {
                writeln!(f, "  {} / {}: {}", c.first, c.second, c.resolution)?;
            }
        }
        Ok(())
    }
}
