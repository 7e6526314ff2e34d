//! Errors raised while constructing statements.

use atrium_core::DomainError;
use thiserror::Error;

/// Malformed input to the builder. Raised before any statement text exists;
/// the builder has no store-side failure modes.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConstructionError {
    #[error("invalid identifier `{0}`: labels and property keys must match [A-Za-z_][A-Za-z0-9_]*")]
    InvalidIdentifier(String),

    #[error("label set must contain at least one label")]
    EmptyLabelSet,

    #[error("relationship target {index} is missing `{field}`")]
    MalformedTarget { index: usize, field: &'static str },
}

impl From<ConstructionError> for DomainError {
    fn from(err: ConstructionError) -> Self {
        DomainError::bad_request(err.to_string())
    }
}
