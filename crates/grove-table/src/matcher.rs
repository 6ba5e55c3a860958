//! Token matchers.
//!
//! String tokens match by byte comparison. Pattern tokens carry a serialized
//! anchored sparse DFA which is stepped one byte at a time, so the lexer
//! learns both the longest match and how far it had to look to decide.

use regex_automata::dfa::{Automaton, StartKind, dense, sparse};
use regex_automata::{Anchored, Input, MatchKind};
use serde::{Deserialize, Serialize};

/// Serialized matcher, as stored in the table body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum MatcherDef {
    Literal(Vec<u8>),
    /// Little-endian `sparse::DFA` bytes, anchored start, all-match semantics.
    Dfa(Vec<u8>),
}

impl MatcherDef {
    /// Compile a regex into an anchored sparse DFA.
    pub fn from_regex(pattern: &str) -> Result<Self, String> {
        Self::from_dfa(&build_dfa(pattern)?)
    }

    pub fn from_dfa(dfa: &dense::DFA<Vec<u32>>) -> Result<Self, String> {
        let sparse = dfa.to_sparse().map_err(|e| e.to_string())?;
        Ok(MatcherDef::Dfa(sparse.to_bytes_little_endian()))
    }
}

/// Build the dense DFA used for token matching: anchored at the start,
/// reporting every match so the longest one can be taken.
pub fn build_dfa(pattern: &str) -> Result<dense::DFA<Vec<u32>>, String> {
    dense::DFA::builder()
        .configure(
            dense::DFA::config()
                .start_kind(StartKind::Anchored)
                .match_kind(MatchKind::All)
                .minimize(true),
        )
        .build(pattern)
        .map_err(|e| e.to_string())
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MatchResult {
    /// Length of the longest non-empty match starting at the position.
    pub len: Option<usize>,
    /// Bytes inspected from the start position. Reaching end of input
    /// counts as one extra byte, so a token that could have continued
    /// is invalidated by an append.
    pub examined: usize,
}

#[derive(Clone, Debug)]
pub enum Matcher {
    Literal(Vec<u8>),
    Dfa(sparse::DFA<Vec<u8>>),
}

impl Matcher {
    pub fn from_def(def: &MatcherDef) -> Result<Self, String> {
        match def {
            MatcherDef::Literal(bytes) => Ok(Matcher::Literal(bytes.clone())),
            MatcherDef::Dfa(bytes) => {
                let (dfa, _) = sparse::DFA::from_bytes(bytes).map_err(|e| e.to_string())?;
                Ok(Matcher::Dfa(dfa.to_owned()))
            }
        }
    }

    pub fn literal(&self) -> Option<&[u8]> {
        match self {
            Matcher::Literal(bytes) => Some(bytes),
            Matcher::Dfa(_) => None,
        }
    }

    pub fn longest_match(&self, input: &[u8], pos: usize) -> MatchResult {
        match self {
            Matcher::Literal(lit) => literal_match(lit, input, pos),
            Matcher::Dfa(dfa) => dfa_match(dfa, input, pos),
        }
    }

    /// Whether the matcher accepts exactly `text`.
    pub fn matches_exactly(&self, text: &[u8]) -> bool {
        self.longest_match(text, 0).len == Some(text.len()) && !text.is_empty()
    }
}

fn literal_match(lit: &[u8], input: &[u8], pos: usize) -> MatchResult {
    let rest = input.get(pos..).unwrap_or_default();
    let common = lit.iter().zip(rest).take_while(|(a, b)| a == b).count();

    if common == lit.len() && !lit.is_empty() {
        return MatchResult {
            len: Some(lit.len()),
            examined: lit.len(),
        };
    }
    let examined = if common == rest.len() {
        rest.len() + 1
    } else {
        common + 1
    };
    MatchResult {
        len: None,
        examined,
    }
}

fn dfa_match(dfa: &sparse::DFA<Vec<u8>>, input: &[u8], pos: usize) -> MatchResult {
    let search = Input::new(input).range(pos..).anchored(Anchored::Yes);
    let Ok(mut state) = dfa.start_state_forward(&search) else {
        return MatchResult {
            len: None,
            examined: 0,
        };
    };

    let mut end = None;
    let mut at = pos;
    let examined = loop {
        if at == input.len() {
            let eoi = dfa.next_eoi_state(state);
            if dfa.is_match_state(eoi) {
                end = Some(at);
            }
            break at - pos + 1;
        }
        let prev = state;
        state = dfa.next_state(state, input[at]);
        at += 1;
        // Match states are delayed by one byte.
        if dfa.is_match_state(state) {
            end = Some(at - 1);
        }
        if dfa.is_dead_state(state) || dfa.is_quit_state(state) {
            // A match state with no live successors was already final, so
            // the byte that killed it was never needed.
            if is_final(dfa, prev) {
                break at - 1 - pos;
            }
            break at - pos;
        }
    };

    MatchResult {
        len: end.map(|e| e - pos).filter(|&len| len > 0),
        examined,
    }
}

fn is_final(dfa: &sparse::DFA<Vec<u8>>, state: regex_automata::util::primitives::StateID) -> bool {
    dfa.is_match_state(state) && (0..=u8::MAX).all(|b| dfa.is_dead_state(dfa.next_state(state, b)))
}
