//! Lexical analysis of the token set.
//!
//! Builds a DFA per token, finds which token pairs can compete for the same
//! input, and marks keywords. The overlap relation keeps state merging from
//! changing what the contextual lexer returns.

use std::collections::VecDeque;

use grove_table::{MatcherDef, build_dfa};
use regex_automata::dfa::{Automaton, dense};
use regex_automata::util::primitives::StateID;
use regex_automata::{Anchored, Input};

use crate::conflicts::Row;
use crate::prepare::{Prepared, Sym, TokenId, TokenPattern};
use crate::report::{ConflictReport, LexicalConflict, LexicalResolution};
use crate::{Error, Result};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Overlap {
    /// Some input matches both tokens.
    pub same_string: bool,
    /// Some match of the first is a proper prefix of a match of the second.
    pub prefix: bool,
}

#[derive(Debug)]
pub(crate) struct Lexical {
    pub matchers: Vec<MatcherDef>,
    pub trivia: Vec<MatcherDef>,
    pub keywords: Vec<bool>,
    /// `overlap[a][b]`, indexed by token id.
    overlap: Vec<Vec<Overlap>>,
}

pub(crate) fn analyze(prepared: &Prepared) -> Result<Lexical> {
    let mut dfas = Vec::with_capacity(prepared.tokens.len());
    let mut matchers = Vec::with_capacity(prepared.tokens.len());
    for token in &prepared.tokens {
        let invalid = |message: String| Error::InvalidPattern {
            rule: token.name.clone(),
            message,
        };
        let dfa = build_dfa(&token.pattern.regex()).map_err(invalid)?;
        let matcher = match &token.pattern {
            TokenPattern::Literal(s) => MatcherDef::Literal(s.as_bytes().to_vec()),
            TokenPattern::Regex(_) => MatcherDef::from_dfa(&dfa).map_err(invalid)?,
        };
        dfas.push(dfa);
        matchers.push(matcher);
    }

    let trivia = prepared
        .trivia
        .iter()
        .map(|pattern| match pattern {
            TokenPattern::Literal(s) => Ok(MatcherDef::Literal(s.as_bytes().to_vec())),
            TokenPattern::Regex(r) => MatcherDef::from_regex(r).map_err(|message| {
                Error::InvalidPattern {
                    rule: "extras".to_owned(),
                    message,
                }
            }),
        })
        .collect::<Result<Vec<_>>>()?;

    let keywords = prepared
        .tokens
        .iter()
        .map(|token| match (&token.pattern, prepared.word_token) {
            (TokenPattern::Literal(s), Some(word)) if !token.named => {
                matches_exactly(&dfas[word as usize], s.as_bytes())
            }
            _ => false,
        })
        .collect();

    let n = dfas.len();
    let mut overlap = vec![vec![Overlap::default(); n]; n];
    for a in 0..n {
        for b in a + 1..n {
            let (ab, ba) = explore(&dfas[a], &dfas[b]);
            overlap[a][b] = ab;
            overlap[b][a] = ba;
        }
    }

    Ok(Lexical {
        matchers,
        trivia,
        keywords,
        overlap,
    })
}

impl Lexical {
    /// Whether tokens `a` and `b` can compete for the same input.
    pub(crate) fn conflicts(&self, a: Sym, b: Sym) -> bool {
        match (a, b) {
            (Sym::Terminal(a), Sym::Terminal(b)) if a != b => {
                let o = self.overlap[a as usize][b as usize];
                let r = self.overlap[b as usize][a as usize];
                o.same_string || o.prefix || r.prefix
            }
            _ => false,
        }
    }

    /// Record how the lexer settles every competing pair that shares a
    /// lex mode.
    pub(crate) fn report_conflicts(&self, prepared: &Prepared, rows: &[Row], report: &mut ConflictReport) {
        let n = prepared.tokens.len();
        let mut together = vec![vec![false; n]; n];
        for row in rows {
            let valid: Vec<TokenId> = row
                .actions
                .keys()
                .filter_map(|s| match s {
                    Sym::Terminal(t) => Some(*t),
                    _ => None,
                })
                .collect();
            for &a in &valid {
                for &b in &valid {
                    together[a as usize][b as usize] = true;
                }
            }
        }

        for a in 0..n {
            for b in a + 1..n {
                if !together[a][b] || !self.conflicts(Sym::Terminal(a as TokenId), Sym::Terminal(b as TokenId)) {
                    continue;
                }
                let resolution = self.resolution(prepared, a, b);
                tracing::debug!(
                    first = %prepared.display(Sym::Terminal(a as TokenId)),
                    second = %prepared.display(Sym::Terminal(b as TokenId)),
                    %resolution,
                    "lexical conflict"
                );
                report.push_lexical(LexicalConflict {
                    first: prepared.display(Sym::Terminal(a as TokenId)),
                    second: prepared.display(Sym::Terminal(b as TokenId)),
                    resolution,
                });
            }
        }
    }

    fn resolution(&self, prepared: &Prepared, a: usize, b: usize) -> LexicalResolution {
        let word = prepared.word_token.map(usize::from);
        if (word == Some(a) && self.keywords[b]) || (word == Some(b) && self.keywords[a]) {
            return LexicalResolution::Keyword;
        }
        let (ta, tb) = (&prepared.tokens[a], &prepared.tokens[b]);
        if ta.precedence != tb.precedence {
            return LexicalResolution::Precedence;
        }
        if self.overlap[a][b].same_string {
            let literal = |p: &TokenPattern| matches!(p, TokenPattern::Literal(_));
            if literal(&ta.pattern) != literal(&tb.pattern) {
                return LexicalResolution::Specificity;
            }
            return LexicalResolution::DeclarationOrder;
        }
        LexicalResolution::LongestMatch
    }
}

fn start_state(dfa: &dense::DFA<Vec<u32>>) -> Option<StateID> {
    dfa.start_state_forward(&Input::new(&[][..]).anchored(Anchored::Yes))
        .ok()
}

fn accepts_here(dfa: &dense::DFA<Vec<u32>>, state: StateID) -> bool {
    dfa.is_match_state(dfa.next_eoi_state(state))
}

/// Match states are delayed by a byte, so a state can be a match for the
/// previous prefix with nowhere left to go.
fn is_final(dfa: &dense::DFA<Vec<u32>>, state: StateID) -> bool {
    dfa.is_match_state(state)
        && (0..=u8::MAX).all(|b| dfa.is_dead_state(dfa.next_state(state, b)))
}

/// Whether a longer match is still reachable from `state`.
fn can_continue(dfa: &dense::DFA<Vec<u32>>, state: StateID) -> bool {
    (0..=u8::MAX).any(|b| {
        let next = dfa.next_state(state, b);
        !dfa.is_dead_state(next) && !is_final(dfa, next)
    })
}

fn matches_exactly(dfa: &dense::DFA<Vec<u32>>, text: &[u8]) -> bool {
    let Some(mut state) = start_state(dfa) else {
        return false;
    };
    for &b in text {
        state = dfa.next_state(state, b);
        if dfa.is_dead_state(state) {
            return false;
        }
    }
    !text.is_empty() && accepts_here(dfa, state)
}

/// Walk both DFAs in lockstep over every input prefix they both survive.
fn explore(a: &dense::DFA<Vec<u32>>, b: &dense::DFA<Vec<u32>>) -> (Overlap, Overlap) {
    let mut ab = Overlap::default();
    let mut ba = Overlap::default();
    let (Some(sa), Some(sb)) = (start_state(a), start_state(b)) else {
        return (ab, ba);
    };

    let mut seen = std::collections::HashSet::new();
    let mut queue = VecDeque::from([(sa, sb, true)]);
    seen.insert((sa, sb));
    while let Some((sa, sb, at_start)) = queue.pop_front() {
        if !at_start {
            let (am, bm) = (accepts_here(a, sa), accepts_here(b, sb));
            if am && bm {
                ab.same_string = true;
                ba.same_string = true;
            }
            if am && can_continue(b, sb) {
                ab.prefix = true;
            }
            if bm && can_continue(a, sa) {
                ba.prefix = true;
            }
            if ab.same_string && ab.prefix && ba.prefix {
                break;
            }
        }
        for byte in 0..=u8::MAX {
            let (na, nb) = (a.next_state(sa, byte), b.next_state(sb, byte));
            if a.is_dead_state(na) || b.is_dead_state(nb) {
                continue;
            }
            if seen.insert((na, nb)) {
                queue.push_back((na, nb, false));
            }
        }
    }
    (ab, ba)
}
