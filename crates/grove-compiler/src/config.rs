//! Compiler configuration.

/// Last-resort rule for conflicts that precedence and declared conflicts
/// leave open.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TieBreak {
    /// The action whose rule was declared first in the grammar wins.
    #[default]
    DeclarationOrder,
    /// Report every remaining conflict as `AmbiguousGrammar`.
    Off,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompileConfig {
    /// Upper bound on canonical LR(1) states, checked during construction.
    pub max_states: usize,
    pub tie_break: TieBreak,
}

impl Default for CompileConfig {
    fn default() -> Self {
        Self {
            max_states: u16::MAX as usize - 1,
            tie_break: TieBreak::default(),
        }
    }
}
