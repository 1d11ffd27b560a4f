//! Diff engine adapter over the `similar` crate
//!
//! Shapes the engine's edit script into an ordered stream of aligned
//! [`LinePair`] records. The actual edit-script computation is delegated;
//! this module only pairs lines up, synthesizes one-sided pairs for pure
//! inserts and deletes, and attaches word-level change markers to paired
//! changed lines.

use similar::{DiffOp, TextDiff};

use crate::error::{DiffError, Result};
use crate::marker::{self, Marker};
use crate::render::Side;

/// One side of an aligned line pair.
#[derive(Debug, Clone)]
pub struct SideLine {
    /// 1-based line number in that side's original text.
    pub lineno: u32,
    /// Line content without the trailing newline.
    pub text: String,
    /// Word-level change markers in byte offsets of `text`. Empty for
    /// unchanged lines and for whole-line inserts/deletes.
    pub markers: Vec<Marker>,
}

/// A pair of aligned lines from the old and new text. At least one side is
/// always present.
#[derive(Debug, Clone)]
pub struct LinePair {
    pub left: Option<SideLine>,
    pub right: Option<SideLine>,
    pub changed: bool,
}

/// Compute the aligned line-pair stream for two texts.
pub fn align(old: &str, new: &str) -> Result<Vec<LinePair>> {
    let old_lines: Vec<&str> = old.lines().collect();
    let new_lines: Vec<&str> = new.lines().collect();
    let diff = TextDiff::from_slices(&old_lines, &new_lines);

    let mut pairs = Vec::new();
    for op in diff.ops() {
        match *op {
            DiffOp::Equal {
                old_index,
                new_index,
                len,
            } => {
                for k in 0..len {
                    let left_text = old_lines[old_index + k];
                    let right_text = new_lines[new_index + k];
                    if left_text != right_text {
                        return Err(DiffError::DiffComputationFailed(format!(
                            "lines {} and {} reported equal but differ",
                            old_index + k + 1,
                            new_index + k + 1
                        )));
                    }
                    pairs.push(LinePair {
                        left: Some(side_line(old_index + k, left_text, Vec::new())),
                        right: Some(side_line(new_index + k, right_text, Vec::new())),
                        changed: false,
                    });
                }
            }
            DiffOp::Delete {
                old_index, old_len, ..
            } => {
                for k in 0..old_len {
                    pairs.push(LinePair {
                        left: Some(side_line(old_index + k, old_lines[old_index + k], Vec::new())),
                        right: None,
                        changed: true,
                    });
                }
            }
            DiffOp::Insert {
                new_index, new_len, ..
            } => {
                for k in 0..new_len {
                    pairs.push(LinePair {
                        left: None,
                        right: Some(side_line(new_index + k, new_lines[new_index + k], Vec::new())),
                        changed: true,
                    });
                }
            }
            DiffOp::Replace {
                old_index,
                old_len,
                new_index,
                new_len,
            } => {
                let paired = old_len.min(new_len);
                for k in 0..paired {
                    let left_text = old_lines[old_index + k];
                    let right_text = new_lines[new_index + k];
                    let (left_markers, right_markers) =
                        marker::word_markers(left_text, right_text)?;
                    pairs.push(LinePair {
                        left: Some(side_line(old_index + k, left_text, left_markers)),
                        right: Some(side_line(new_index + k, right_text, right_markers)),
                        changed: true,
                    });
                }
                for k in paired..old_len {
                    pairs.push(LinePair {
                        left: Some(side_line(old_index + k, old_lines[old_index + k], Vec::new())),
                        right: None,
                        changed: true,
                    });
                }
                for k in paired..new_len {
                    pairs.push(LinePair {
                        left: None,
                        right: Some(side_line(new_index + k, new_lines[new_index + k], Vec::new())),
                        changed: true,
                    });
                }
            }
        }
    }

    Ok(pairs)
}

fn side_line(index: usize, text: &str, markers: Vec<Marker>) -> SideLine {
    SideLine {
        lineno: index as u32 + 1,
        text: text.to_string(),
        markers,
    }
}

/// Collect one side's markers indexed by 0-based line number.
pub fn markers_by_line(pairs: &[LinePair], side: Side, line_count: usize) -> Vec<Vec<Marker>> {
    let mut by_line = vec![Vec::new(); line_count];
    for pair in pairs {
        let side_line = match side {
            Side::Left => pair.left.as_ref(),
            Side::Right => pair.right.as_ref(),
        };
        if let Some(line) = side_line {
            if let Some(slot) = by_line.get_mut(line.lineno as usize - 1) {
                *slot = line.markers.clone();
            }
        }
    }
    by_line
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::marker::MarkerKind;

    #[test]
    fn single_changed_line_scenario() {
        let pairs = align("a\nb\nc\n", "a\nx\nc\n").unwrap();
        assert_eq!(pairs.len(), 3);

        assert!(!pairs[0].changed);
        assert_eq!(pairs[0].left.as_ref().unwrap().lineno, 1);
        assert_eq!(pairs[0].right.as_ref().unwrap().lineno, 1);

        assert!(pairs[1].changed);
        assert_eq!(pairs[1].left.as_ref().unwrap().text, "b");
        assert_eq!(pairs[1].right.as_ref().unwrap().text, "x");

        assert!(!pairs[2].changed);
        assert_eq!(pairs[2].left.as_ref().unwrap().lineno, 3);
        assert_eq!(pairs[2].right.as_ref().unwrap().lineno, 3);
    }

    #[test]
    fn pure_insert_has_no_left_side() {
        let pairs = align("a\nc\n", "a\nb\nc\n").unwrap();
        assert_eq!(pairs.len(), 3);
        let inserted = &pairs[1];
        assert!(inserted.changed);
        assert!(inserted.left.is_none());
        let right = inserted.right.as_ref().unwrap();
        assert_eq!(right.text, "b");
        assert!(right.markers.is_empty());
    }

    #[test]
    fn pure_delete_has_no_right_side() {
        let pairs = align("a\nb\nc\n", "a\nc\n").unwrap();
        assert_eq!(pairs.len(), 3);
        let deleted = &pairs[1];
        assert!(deleted.changed);
        assert!(deleted.right.is_none());
        assert_eq!(deleted.left.as_ref().unwrap().text, "b");
    }

    #[test]
    fn replaced_lines_carry_word_markers() {
        let pairs = align("foo bar baz\n", "foo qux baz\n").unwrap();
        assert_eq!(pairs.len(), 1);
        let pair = &pairs[0];
        assert!(pair.changed);
        let left = pair.left.as_ref().unwrap();
        let right = pair.right.as_ref().unwrap();
        assert_eq!(left.markers[0].kind, MarkerKind::Delete);
        assert_eq!(left.markers[0].offset, 4);
        assert_eq!(right.markers[0].kind, MarkerKind::Add);
        assert_eq!(right.markers[1].offset, 7);
    }

    #[test]
    fn uneven_replace_pads_with_one_sided_pairs() {
        let pairs = align("a\nold1\nold2\nz\n", "a\nnew1\nz\n").unwrap();
        // a | a, old1 | new1, old2 | -, z | z
        assert_eq!(pairs.len(), 4);
        assert!(pairs[1].changed);
        assert!(pairs[1].left.is_some() && pairs[1].right.is_some());
        assert!(pairs[2].changed);
        assert!(pairs[2].right.is_none());
        assert!(!pairs[3].changed);
    }

    #[test]
    fn identical_texts_yield_only_unchanged_pairs() {
        let pairs = align("a\nb\n", "a\nb\n").unwrap();
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|p| !p.changed));
    }

    #[test]
    fn empty_old_text_is_all_inserts() {
        let pairs = align("", "a\nb\n").unwrap();
        assert_eq!(pairs.len(), 2);
        assert!(pairs.iter().all(|p| p.changed && p.left.is_none()));
    }

    #[test]
    fn markers_by_line_places_markers_at_linenos() {
        let pairs = align("a\nfoo bar\n", "a\nfoo qux\n").unwrap();
        let left = markers_by_line(&pairs, Side::Left, 2);
        assert!(left[0].is_empty());
        assert!(!left[1].is_empty());
    }
}
