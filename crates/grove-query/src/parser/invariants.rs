//! Internal consistency checks. A failure here is a bug in the grammar rules,
//! never in the query being parsed.

#![cfg_attr(coverage_nightly, coverage(off))]

use super::core::Parser;
use super::cst::SyntaxKind;

impl Parser<'_> {
    /// Each lookahead spends one unit; consuming a token refills them. Running
    /// dry means a rule loops without advancing.
    #[inline]
    pub(super) fn ensure_progress(&self) {
        let left = self.lookaheads_left.get();
        assert!(left > 0, "query parser stopped making progress");
        self.lookaheads_left.set(left - 1);
    }

    /// The caller already checked the next token.
    #[inline]
    pub(super) fn assert_current(&self, expected: SyntaxKind) {
        let found = self.current();
        assert!(found == expected, "grammar rule entered on {found:?}, wanted {expected:?}");
    }
}
