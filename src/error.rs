//! Errors surfaced by template matching.
//!
//! A template that simply does not describe a request is not an error; the
//! store reports that as `Ok(None)`. The variants here are authoring defects
//! in a template that the caller must see.

/// Matching error.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MatchError {
    /// The body pattern and the observed body are JSON documents whose shapes
    /// cannot be compared at `path` (e.g. an object against an array).
    #[error("Malformed body comparison at '{path}': expected {expected}, found {found}")]
    MalformedBodyComparison {
        path: String,
        expected: &'static str,
        found: &'static str,
    },

    /// A glob pattern could not be compiled.
    #[error("Invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl MatchError {
    /// Whether this error came from comparing a body template.
    pub fn is_body_comparison(&self) -> bool {
        matches!(self, MatchError::MalformedBodyComparison { .. })
    }
}
