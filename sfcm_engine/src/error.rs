// Error types for the engine crate.
//
// The generator itself is infallible for well-formed input; these errors
// come from the two fallible edges around it: parsing a semantic dictionary
// from JSON, and the opt-in validation of a caller's request.

use thiserror::Error;

/// Failure to parse a semantic dictionary source.
///
/// Individual malformed entries are not errors (they are dropped with a
/// warning); only a document that is not a valid dictionary at all is.
#[derive(Debug, Error)]
pub enum DictionaryError {
    #[error("semantic dictionary is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported semantic dictionary version {found} (expected {expected})")]
    UnsupportedVersion { found: u32, expected: u32 },
}

/// A request the calling layer should have rejected before generation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RequestError {
    #[error("keyword list is empty")]
    NoKeywords,

    #[error("keyword at position {index} is empty after trimming")]
    EmptyKeyword { index: usize },

    #[error("canvas size must be positive and finite, got {width}x{height}")]
    InvalidCanvas { width: f64, height: f64 },

    #[error("option `{name}` must be finite, got {value}")]
    NonFiniteOption { name: &'static str, value: f64 },
}
