//! Parse actions and table identifiers.

use serde::{Deserialize, Serialize};

pub type StateId = u16;
pub type SymbolId = u16;
pub type ProductionId = u16;
pub type FieldId = u16;
pub type LexModeId = u16;

/// Goto sentinel: no transition.
pub const NO_STATE: StateId = StateId::MAX;

/// One entry of an action cell.
///
/// A cell holding more than one action is a GLR split point. Cells are
/// stored in a deterministic order: shifts first, then reductions by
/// production id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    /// Consume the lookahead and push `state`.
    Shift { state: StateId },
    /// Consume an extra token without changing state.
    ShiftExtra,
    /// Pop `child_count` structural entries and build a `symbol` node.
    Reduce {
        symbol: SymbolId,
        child_count: u16,
        production: ProductionId,
        dynamic_precedence: i32,
    },
    Accept,
    Error,
}

impl Action {
    #[inline]
    pub fn is_error(&self) -> bool {
        matches!(self, Action::Error)
    }

    #[inline]
    pub fn is_shift(&self) -> bool {
        matches!(self, Action::Shift { .. } | Action::ShiftExtra)
    }
}
