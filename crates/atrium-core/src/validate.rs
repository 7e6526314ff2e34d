//! Seam to the external schema-validation subsystem.
//!
//! Entity shapes are validated by a JSON-schema service that lives outside
//! this substrate. The substrate only needs a yes/no answer, so the whole
//! subsystem is consumed through this trait.

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error)]
#[error("shape validation failed: {message}")]
pub struct ValidationError {
    pub message: String,
    pub details: Option<Value>,
}

/// `validate(schema, data)` — is this entity shape valid?
pub trait ShapeValidator: Send + Sync {
    fn validate(&self, schema: &str, data: &Value) -> Result<(), ValidationError>;
}

/// Validator that accepts everything. Useful in tests and tooling where the
/// real validation service is not wired up.
#[derive(Debug, Default, Clone, Copy)]
pub struct AcceptAll;

impl ShapeValidator for AcceptAll {
    fn validate(&self, _schema: &str, _data: &Value) -> Result<(), ValidationError> {
        Ok(())
    }
}
