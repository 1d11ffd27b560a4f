//! Token-span splitter
//!
//! Walks one side's lexer token stream and cuts tokens first at newline
//! boundaries, then at word-level marker boundaries, emitting styled spans
//! whose boundaries respect both segmentations. A pure function of its
//! inputs: identical text, tokens and markers always produce identical
//! output.

use serde::Serialize;

use crate::error::{DiffError, Result};
use crate::lexer::{classify, Token};
use crate::marker::{self, Marker, MarkerKind};
use crate::render::Side;

/// The atomic unit of render output: a run of text with one semantic class
/// and one word-level change state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledSpan {
    /// Short semantic class name from [`classify`].
    pub class: &'static str,
    /// True inside a word-level change region.
    pub word_change: bool,
    pub text: String,
}

/// Split a side's full token stream into per-line styled spans.
///
/// `markers_by_line` is indexed by 0-based line number and must cover every
/// line of `text`. Fails with [`DiffError::LexTextMismatch`] if the tokens do
/// not reconstruct `text` exactly, since that would corrupt every offset
/// downstream. Concatenating the spans of one line reconstructs that line's
/// text; newlines separate lines and are not part of any span.
pub fn split_side(
    text: &str,
    tokens: &[Token],
    markers_by_line: &[Vec<Marker>],
    side: Side,
) -> Result<Vec<Vec<StyledSpan>>> {
    check_reconstruction(text, tokens, side)?;

    let mut lines = cut_at_newlines(tokens);
    let expected = text.lines().count();
    // A trailing newline leaves a phantom empty line behind it.
    if lines.len() == expected + 1 && lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    let empty: Vec<Marker> = Vec::new();
    let mut out = Vec::with_capacity(lines.len());
    for (index, line_tokens) in lines.iter().enumerate() {
        let lineno = index as u32 + 1;
        let markers = markers_by_line.get(index).unwrap_or(&empty);
        let line_len: usize = line_tokens.iter().map(|(_, t)| t.len()).sum();
        marker::validate(markers, line_len, lineno)?;
        out.push(split_line(line_tokens, markers, lineno)?);
    }
    Ok(out)
}

/// Verify the precondition that the token texts tile the input exactly.
fn check_reconstruction(text: &str, tokens: &[Token], side: Side) -> Result<()> {
    let mut pos = 0usize;
    for token in tokens {
        let end = pos + token.text.len();
        match text.get(pos..end) {
            Some(slice) if slice == token.text => pos = end,
            _ => {
                let matched = text
                    .as_bytes()
                    .iter()
                    .skip(pos)
                    .zip(token.text.as_bytes())
                    .take_while(|(a, b)| a == b)
                    .count();
                return Err(DiffError::LexTextMismatch {
                    side,
                    offset: pos + matched,
                });
            }
        }
    }
    if pos != text.len() {
        return Err(DiffError::LexTextMismatch { side, offset: pos });
    }
    Ok(())
}

/// Cut the token stream at newline boundaries, attributing each sub-token to
/// its own line. Newline characters themselves are dropped.
fn cut_at_newlines<'a>(tokens: &'a [Token]) -> Vec<Vec<(&'a str, &'a str)>> {
    let mut lines: Vec<Vec<(&'a str, &'a str)>> = vec![Vec::new()];
    for token in tokens {
        let mut rest = token.text.as_str();
        while let Some(idx) = rest.find('\n') {
            if idx > 0 {
                lines
                    .last_mut()
                    .expect("line list is never empty")
                    .push((token.ttype.as_str(), &rest[..idx]));
            }
            lines.push(Vec::new());
            rest = &rest[idx + 1..];
        }
        if !rest.is_empty() {
            lines
                .last_mut()
                .expect("line list is never empty")
                .push((token.ttype.as_str(), rest));
        }
    }
    lines
}

/// Split one line's tokens at its marker boundaries.
///
/// The highlight state toggles each time a boundary is consumed. A boundary
/// exactly at a token edge only toggles; a boundary strictly inside a token
/// splits it, each part keeping the token's semantic class.
fn split_line(
    line_tokens: &[(&str, &str)],
    markers: &[Marker],
    lineno: u32,
) -> Result<Vec<StyledSpan>> {
    let mut spans = Vec::with_capacity(line_tokens.len());
    let mut pos = 0usize;
    let mut next = 0usize;
    let mut highlight = false;

    for &(ttype, text) in line_tokens {
        let class = classify(ttype);
        let mut value = text;
        while next < markers.len() {
            let boundary = markers[next];
            if boundary.offset == pos {
                highlight = boundary.kind != MarkerKind::End;
                next += 1;
                continue;
            }
            if boundary.offset < pos + value.len() {
                let cut = boundary.offset - pos;
                if !value.is_char_boundary(cut) {
                    return Err(DiffError::MalformedMarkerSequence {
                        lineno,
                        reason: format!("offset {} not on a character boundary", boundary.offset),
                    });
                }
                spans.push(StyledSpan {
                    class,
                    word_change: highlight,
                    text: value[..cut].to_string(),
                });
                pos += cut;
                value = &value[cut..];
                highlight = boundary.kind != MarkerKind::End;
                next += 1;
            } else {
                break;
            }
        }
        if !value.is_empty() {
            spans.push(StyledSpan {
                class,
                word_change: highlight,
                text: value.to_string(),
            });
            pos += value.len();
        }
    }

    // Markers at the end of the line close out here.
    while next < markers.len() && markers[next].offset == pos {
        next += 1;
    }
    debug_assert_eq!(next, markers.len());

    Ok(spans)
}
