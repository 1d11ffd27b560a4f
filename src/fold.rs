//! Fold grouper
//!
//! Scans the zipped line-pair sequence, groups it into runs of equal changed
//! status, and collapses the middle of unchanged runs long enough to fold,
//! keeping a fixed amount of context visible on each side. A pure
//! sequence-to-sequence transform: no pair is dropped, duplicated or
//! reordered.

use serde::{Deserialize, Serialize};

use crate::render::{LineClass, RenderPair};

/// Folding parameters, consumed from the caller's configuration layer.
#[derive(Debug, Clone, Copy, Deserialize, Serialize)]
#[serde(default)]
pub struct FoldOptions {
    /// Lines of unchanged context always shown adjacent to a change.
    pub context_len: usize,
    /// Minimum run length, beyond the doubled context, required before
    /// collapsing. Zero folds any unchanged run longer than `2*context_len`.
    pub fold_min: usize,
}

impl Default for FoldOptions {
    fn default() -> Self {
        Self {
            context_len: 5,
            fold_min: 5,
        }
    }
}

/// A collapsed run of unchanged line pairs.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoldGroup {
    /// Initial collapse state for presentation; always constructed collapsed.
    pub collapsed: bool,
    pub pairs: Vec<RenderPair>,
}

/// The unit handed to presentation: either a visible run of line pairs or a
/// collapsed fold group.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Segment {
    Visible(Vec<RenderPair>),
    Folded(FoldGroup),
}

impl Segment {
    /// All pairs in this segment, folded or not.
    pub fn pairs(&self) -> &[RenderPair] {
        match self {
            Segment::Visible(pairs) => pairs,
            Segment::Folded(group) => &group.pairs,
        }
    }
}

/// Partition the pair sequence into visible and folded segments.
pub fn fold(pairs: Vec<RenderPair>, options: &FoldOptions) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut rest = pairs;

    while !rest.is_empty() {
        let unchanged = rest[0].0.class == LineClass::Unchanged;
        let run_len = rest
            .iter()
            .take_while(|(left, _)| (left.class == LineClass::Unchanged) == unchanged)
            .count();
        let tail = rest.split_off(run_len);
        let run = rest;
        rest = tail;

        if unchanged && run.len() > 2 * options.context_len + options.fold_min {
            let context = options.context_len;
            let middle_len = run.len() - 2 * context;
            let mut iter = run.into_iter();
            let head: Vec<RenderPair> = iter.by_ref().take(context).collect();
            let middle: Vec<RenderPair> = iter.by_ref().take(middle_len).collect();
            let tail: Vec<RenderPair> = iter.collect();

            if !head.is_empty() {
                segments.push(Segment::Visible(head));
            }
            segments.push(Segment::Folded(FoldGroup {
                collapsed: true,
                pairs: middle,
            }));
            if !tail.is_empty() {
                segments.push(Segment::Visible(tail));
            }
        } else {
            segments.push(Segment::Visible(run));
        }
    }

    segments
}
