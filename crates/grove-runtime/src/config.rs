//! Parser configuration.

/// Costs used to rank error-recovery candidates.
///
/// A candidate that skips `k` tokens and pops `d` stack entries costs
/// `per_skipped_token * k + per_popped_state * d`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RecoveryConfig {
    pub per_skipped_token: u32,
    pub per_popped_state: u32,
    /// Stop searching after skipping this many tokens. `None` searches up to
    /// end of input.
    pub max_skipped_tokens: Option<usize>,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            per_skipped_token: 1,
            per_popped_state: 0,
            max_skipped_tokens: None,
        }
    }
}

impl RecoveryConfig {
    pub(crate) fn cost(&self, skipped: usize, popped: usize) -> u64 {
        u64::from(self.per_skipped_token) * skipped as u64
            + u64::from(self.per_popped_state) * popped as u64
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParseConfig {
    /// Upper bound on live GLR stack versions. The worst versions are dropped
    /// beyond it.
    pub max_versions: usize,
    /// Reductions allowed on a single lookahead before the version is treated
    /// as erroneous.
    pub reduction_limit: usize,
    pub recovery: RecoveryConfig,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            max_versions: 6,
            reduction_limit: 100_000,
            recovery: RecoveryConfig::default(),
        }
    }
}
