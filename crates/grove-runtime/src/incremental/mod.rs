//! Edit bookkeeping for incremental parsing.

mod reuse;

#[cfg(test)]
mod edit_map_tests;
#[cfg(test)]
mod reuse_tests;

use std::ops::Range;

pub(crate) use reuse::ReuseCursor;

/// One text replacement: old bytes `start..old_end` became
/// `start..new_end`.
///
/// A sequence of edits is applied in order, each in the coordinates of the
/// text produced by the ones before it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InputEdit {
    pub start: usize,
    pub old_end: usize,
    pub new_end: usize,
}

impl InputEdit {
    /// Replace `range` with `replacement_len` bytes.
    pub fn replace(range: Range<usize>, replacement_len: usize) -> Self {
        Self {
            start: range.start,
            old_end: range.end,
            new_end: range.start + replacement_len,
        }
    }
}

/// Length of the run that extends past any input.
const OPEN: usize = usize::MAX / 4;

/// Bytes untouched by every edit, in both coordinate systems.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Segment {
    old_start: usize,
    new_start: usize,
    len: usize,
}

impl Segment {
    fn old_end(&self) -> usize {
        self.old_start.saturating_add(self.len)
    }

    fn new_end(&self) -> usize {
        self.new_start.saturating_add(self.len)
    }
}

/// Composition of a sequence of edits: which new offsets map back to
/// unchanged old bytes.
#[derive(Clone, Debug)]
pub(crate) struct EditMap {
    segments: Vec<Segment>,
}

impl EditMap {
    pub fn new(edits: &[InputEdit]) -> Self {
        let mut map = EditMap {
            segments: vec![Segment {
                old_start: 0,
                new_start: 0,
                len: OPEN,
            }],
        };
        for edit in edits {
            map.apply(edit);
        }
        map
    }

    fn apply(&mut self, edit: &InputEdit) {
        let start = edit.start;
        let old_end = edit.old_end.max(start);
        let new_end = edit.new_end.max(start);

        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        for seg in &self.segments {
            let (seg_start, seg_end) = (seg.new_start, seg.new_end());
            if seg_end <= start {
                segments.push(*seg);
                continue;
            }
            if seg_start >= old_end {
                segments.push(Segment {
                    new_start: seg_start - old_end + new_end,
                    ..*seg
                });
                continue;
            }
            if seg_start < start {
                segments.push(Segment {
                    len: start - seg_start,
                    ..*seg
                });
            }
            if seg_end > old_end {
                let cut = old_end - seg_start;
                segments.push(Segment {
                    old_start: seg.old_start + cut,
                    new_start: new_end,
                    len: seg.len - cut,
                });
            }
        }
        self.segments = segments;
    }

    /// Old offset of new offset `pos`, if `pos` lies in unchanged text.
    pub fn to_old(&self, pos: usize) -> Option<usize> {
        self.segments
            .iter()
            .find(|s| s.new_start <= pos && pos < s.new_end())
            .map(|s| s.old_start + (pos - s.new_start))
    }

    /// Whether old bytes `start..end` sit inside one unchanged run. An edit
    /// beginning exactly at `end` also counts as touching the range.
    pub fn unchanged(&self, start: usize, end: usize) -> bool {
        self.segments
            .iter()
            .any(|s| s.old_start <= start && end < s.old_end())
    }
}
