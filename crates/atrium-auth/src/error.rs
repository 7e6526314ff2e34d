//! Authentication and authorization errors.

use atrium_core::DomainError;
use atrium_graph::GraphError;
use atrium_query::ConstructionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AuthError {
    /// No valid identity could be established. Deliberately generic: the
    /// message never distinguishes "user does not exist" from "not a
    /// member", to avoid leaking which identities exist.
    #[error("access denied")]
    Denied,

    /// Valid identity, insufficient capability for the attempted action.
    #[error("insufficient permissions for {action} on {subject}")]
    Forbidden { action: String, subject: String },

    #[error(transparent)]
    Construction(#[from] ConstructionError),

    #[error(transparent)]
    Graph(#[from] GraphError),
}

impl From<AuthError> for DomainError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Denied => DomainError::unauthorized(err.to_string()),
            AuthError::Forbidden { .. } => DomainError::forbidden(err.to_string()),
            AuthError::Construction(inner) => inner.into(),
            AuthError::Graph(inner) => inner.into(),
        }
    }
}
