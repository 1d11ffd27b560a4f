//! sidediff - syntax-aware diff rendering core
//!
//! Merges two independently-segmented views of the same text, the lexer's
//! token stream and the diff engine's edit script, into one ordered sequence
//! of render-ready line records: each line carries its change class, its
//! original line number (or none), and styled sub-spans whose boundaries
//! respect both the token and the word-level change boundaries. Long runs of
//! unchanged line pairs are grouped behind folds with a fixed amount of
//! visible context.
//!
//! Page assembly, CLI handling and file traversal are the caller's concern;
//! the per-file entry point [`render_diff`] is a pure function, so a batch
//! caller can run it concurrently across files.

pub mod engine;
pub mod error;
pub mod fold;
pub mod lexer;
pub mod marker;
pub mod render;
pub mod split;

pub use engine::{LinePair, SideLine};
pub use error::{DiffError, Result};
pub use fold::{fold as fold_pairs, FoldGroup, FoldOptions, Segment};
pub use lexer::{classify, Lexer, SyntectLexer, Token};
pub use marker::{Marker, MarkerKind};
pub use render::{LineClass, RenderLine, RenderPair, Side};
pub use split::StyledSpan;

/// Render the diff between two texts into an ordered segment sequence.
///
/// Runs the full pipeline for one file: line alignment with word-level
/// markers, full-file tokenization of both sides (line-by-line re-lexing
/// would break multi-line token semantics), token splitting, pair rendering
/// and fold grouping. Fails fast if the lexer's tokens do not reconstruct
/// either input text.
pub fn render_diff(
    old: &str,
    new: &str,
    lexer: &dyn Lexer,
    options: &FoldOptions,
) -> Result<Vec<Segment>> {
    let pairs = engine::align(old, new)?;
    log::debug!(
        "aligned {} line pairs, {} changed",
        pairs.len(),
        pairs.iter().filter(|p| p.changed).count()
    );

    let left_markers = engine::markers_by_line(&pairs, Side::Left, old.lines().count());
    let right_markers = engine::markers_by_line(&pairs, Side::Right, new.lines().count());

    let left_tokens = lexer.tokenize(old);
    let left_spans = split::split_side(old, &left_tokens, &left_markers, Side::Left)?;
    let right_tokens = lexer.tokenize(new);
    let right_spans = split::split_side(new, &right_tokens, &right_markers, Side::Right)?;

    let rendered = render::render_pairs(&pairs, &left_spans, &right_spans);
    let segments = fold::fold(rendered, options);
    log::debug!("grouped into {} segments", segments.len());

    Ok(segments)
}
