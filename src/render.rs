//! Line pair renderer
//!
//! Turns each aligned line pair into exactly one left and one right
//! [`RenderLine`], inserting empty placeholder records where a side has no
//! line at this position. Every pair yields both sides so downstream code
//! can iterate the two columns zipped without any alignment bookkeeping.

use std::fmt;

use serde::Serialize;

use crate::engine::LinePair;
use crate::split::StyledSpan;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => f.write_str("left"),
            Side::Right => f.write_str("right"),
        }
    }
}

/// Change class of a rendered line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LineClass {
    Unchanged,
    /// Both sides exist and differ.
    Change,
    /// The opposite side has no line at this position.
    Insert,
}

/// One rendered line on one side, including placeholder lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderLine {
    pub side: Side,
    /// Original 1-based line number, or None for a placeholder.
    pub lineno: Option<u32>,
    pub class: LineClass,
    pub spans: Vec<StyledSpan>,
}

pub type RenderPair = (RenderLine, RenderLine);

/// Assemble render lines from the pair stream and the per-side span lists
/// produced by the splitter.
pub fn render_pairs(
    pairs: &[LinePair],
    left_spans: &[Vec<StyledSpan>],
    right_spans: &[Vec<StyledSpan>],
) -> Vec<RenderPair> {
    pairs
        .iter()
        .map(|pair| {
            let class = pair_class(pair);
            let left = render_side(Side::Left, pair.left.as_ref(), class, left_spans);
            let right = render_side(Side::Right, pair.right.as_ref(), class, right_spans);
            (left, right)
        })
        .collect()
}

fn pair_class(pair: &LinePair) -> LineClass {
    if !pair.changed {
        LineClass::Unchanged
    } else if pair.left.is_none() || pair.right.is_none() {
        LineClass::Insert
    } else {
        LineClass::Change
    }
}

fn render_side(
    side: Side,
    line: Option<&crate::engine::SideLine>,
    class: LineClass,
    spans: &[Vec<StyledSpan>],
) -> RenderLine {
    match line {
        Some(line) => RenderLine {
            side,
            lineno: Some(line.lineno),
            class,
            spans: spans
                .get(line.lineno as usize - 1)
                .cloned()
                .unwrap_or_default(),
        },
        None => RenderLine {
            side,
            lineno: None,
            class,
            spans: Vec::new(),
        },
    }
}
