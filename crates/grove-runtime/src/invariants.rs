//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

use crate::subtree::Subtree;

/// Every parse, however broken the input, yields a root over all of it.
#[inline]
pub(crate) fn ensure_covers(root: &Subtree, len: usize) {
    assert_eq!(
        root.total(),
        len,
        "broken parser invariant: root covers {} of {len} bytes",
        root.total()
    );
}
