//! Error taxonomy for the zone core.
//!
//! `FormatError` covers the encoded-path contract and is fatal at startup
//! (there is no fallback ring road). `GeometryError` covers invalid buffer
//! inputs and internal computational failures; callers report it and refuse
//! to show a zone for that radius instead of crashing.

use thiserror::Error;

/// Malformed encoded ring-road path.
#[derive(Debug, Error)]
pub enum FormatError {
    #[error("encoded path is empty")]
    Empty,

    /// The leading segment must be two comma-separated finite numbers.
    #[error("invalid first point '{segment}'")]
    InvalidHead { segment: String },

    #[error("failed to parse URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("query parameter 'rl' not found in URL")]
    MissingParam,
}

/// Invalid input to, or failure inside, the buffer computation.
///
/// Containment queries propagate this rather than guessing "not contained" —
/// a geometry failure must never mislabel a valid address.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("path has no vertices")]
    EmptyPath,

    #[error("path contains a non-finite coordinate")]
    NonFinitePath,

    #[error("radius must be a positive number of kilometers, got {0}")]
    InvalidRadius(f64),

    #[error("buffer produced no usable geometry")]
    Degenerate,
}
