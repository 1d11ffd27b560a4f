//! Error taxonomy for the diff rendering pipeline
//!
//! Errors only ever originate at the two external boundaries (diff engine,
//! lexer) or from violated cross-component invariants. Everything else in the
//! pipeline is pure and cannot fail on well-formed input.

use thiserror::Error;

use crate::render::Side;

pub type Result<T> = std::result::Result<T, DiffError>;

#[derive(Debug, Error)]
pub enum DiffError {
    /// The external diff engine produced output violating the line-pair
    /// invariants. Fatal for the file; no partial results are returned.
    #[error("diff computation failed: {0}")]
    DiffComputationFailed(String),

    /// Concatenated lexer tokens do not reconstruct the source text. This is
    /// an offset-corrupting upstream bug and is never silently recovered.
    #[error("lexer tokens do not reconstruct the {side} text at byte {offset}")]
    LexTextMismatch { side: Side, offset: usize },

    /// Unbalanced or out-of-order character-level change markers on a line.
    /// Reported, never repaired.
    #[error("malformed marker sequence on line {lineno}: {reason}")]
    MalformedMarkerSequence { lineno: u32, reason: String },
}
