//! Character-level change markers within a line
//!
//! A marker is a zero-width boundary in a line's plain text where a
//! word-level change region starts or ends. Markers are kept as an explicit
//! typed list threaded alongside the plain text, never as sentinel bytes
//! embedded in the text itself. Offsets are byte offsets in plain-text
//! coordinates and always fall on UTF-8 character boundaries by construction.

use similar::{ChangeTag, TextDiff};

use crate::error::{DiffError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// Start of an inserted region (right side).
    Add,
    /// Start of a deleted region (left side).
    Delete,
    /// End of the currently open region.
    End,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    pub offset: usize,
    pub kind: MarkerKind,
}

/// Compute word-level change markers for a changed line pair.
///
/// Only called when both sides of the pair exist: whole-line inserts and
/// deletes render as a solid highlighted line, so word-level markers are
/// suppressed for them by never computing any.
pub fn word_markers(left_text: &str, right_text: &str) -> Result<(Vec<Marker>, Vec<Marker>)> {
    let diff = TextDiff::from_words(left_text, right_text);

    let mut left_regions: Vec<(usize, usize)> = Vec::new();
    let mut right_regions: Vec<(usize, usize)> = Vec::new();
    let mut left_pos = 0usize;
    let mut right_pos = 0usize;

    for change in diff.iter_all_changes() {
        let len = change.value().len();
        match change.tag() {
            ChangeTag::Equal => {
                left_pos += len;
                right_pos += len;
            }
            ChangeTag::Delete => {
                push_region(&mut left_regions, left_pos, left_pos + len);
                left_pos += len;
            }
            ChangeTag::Insert => {
                push_region(&mut right_regions, right_pos, right_pos + len);
                right_pos += len;
            }
        }
    }

    // The word diff must account for every byte of both lines, otherwise the
    // marker offsets would be corrupt.
    if left_pos != left_text.len() || right_pos != right_text.len() {
        return Err(DiffError::DiffComputationFailed(format!(
            "word diff accounted for {}/{} left and {}/{} right bytes",
            left_pos,
            left_text.len(),
            right_pos,
            right_text.len()
        )));
    }

    let left = markers_from_regions(&left_regions, MarkerKind::Delete);
    let right = markers_from_regions(&right_regions, MarkerKind::Add);
    Ok((left, right))
}

/// Append a region, merging with the previous one when contiguous so that
/// marker offsets stay strictly increasing.
fn push_region(regions: &mut Vec<(usize, usize)>, start: usize, end: usize) {
    if let Some(last) = regions.last_mut() {
        if last.1 == start {
            last.1 = end;
            return;
        }
    }
    regions.push((start, end));
}

fn markers_from_regions(regions: &[(usize, usize)], kind: MarkerKind) -> Vec<Marker> {
    let mut markers = Vec::with_capacity(regions.len() * 2);
    for &(start, end) in regions {
        markers.push(Marker { offset: start, kind });
        markers.push(Marker {
            offset: end,
            kind: MarkerKind::End,
        });
    }
    markers
}

/// Validate the marker invariants for one line: offsets strictly increasing
/// and within the line, every Add/Delete closed by an End, no nested starts.
pub fn validate(markers: &[Marker], line_len: usize, lineno: u32) -> Result<()> {
    let malformed = |reason: &str| DiffError::MalformedMarkerSequence {
        lineno,
        reason: reason.to_string(),
    };

    let mut prev: Option<usize> = None;
    let mut open = false;
    for marker in markers {
        if let Some(p) = prev {
            if marker.offset <= p {
                return Err(malformed("offsets not strictly increasing"));
            }
        }
        if marker.offset > line_len {
            return Err(malformed("offset beyond end of line"));
        }
        match marker.kind {
            MarkerKind::End => {
                if !open {
                    return Err(malformed("End without an open region"));
                }
                open = false;
            }
            MarkerKind::Add | MarkerKind::Delete => {
                if open {
                    return Err(malformed("two region starts without an End"));
                }
                open = true;
            }
        }
        prev = Some(marker.offset);
    }
    if open {
        return Err(malformed("region not closed before end of line"));
    }
    Ok(())
}
