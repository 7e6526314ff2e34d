//! Uniqueness-constraint declarations.
//!
//! Entity modules contribute one declaration per type during boot; the
//! execution layer consumes the sealed registry exactly once at startup.

use std::collections::BTreeMap;

use atrium_core::Registry;
use serde::{Deserialize, Serialize};

use crate::error::ConstructionError;
use crate::pattern::{check_identifier, Label};
use crate::statement::CompiledStatement;

/// Contributed once per entity type: `{ name, labels, property }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConstraintDeclaration {
    pub name: String,
    pub labels: Vec<String>,
    pub property: String,
}

/// The boot-time registry the execution layer drains at startup.
pub type ConstraintRegistry = Registry<ConstraintDeclaration>;

impl ConstraintDeclaration {
    pub fn new(
        name: impl Into<String>,
        labels: Vec<String>,
        property: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            labels,
            property: property.into(),
        }
    }

    /// Compile to idempotent `CREATE CONSTRAINT ... IF NOT EXISTS` DDL.
    ///
    /// Neo4j uniqueness constraints are single-label, so a declaration
    /// listing several labels compiles to one statement per label; derived
    /// statement names are suffixed with the lowercased label.
    pub fn to_statements(&self) -> Result<Vec<CompiledStatement>, ConstructionError> {
        check_identifier(&self.name)?;
        check_identifier(&self.property)?;
        let labels = self
            .labels
            .iter()
            .map(Label::new)
            .collect::<Result<Vec<_>, _>>()?;
        if labels.is_empty() {
            return Err(ConstructionError::EmptyLabelSet);
        }

        let single = labels.len() == 1;
        Ok(labels
            .iter()
            .map(|label| {
                let name = if single {
                    self.name.clone()
                } else {
                    format!("{}_{}", self.name, label.as_str().to_lowercase())
                };
                let text = format!(
                    "CREATE CONSTRAINT {name} IF NOT EXISTS \
                     FOR (n:{label}) REQUIRE n.{} IS UNIQUE",
                    self.property
                );
                CompiledStatement::new(text, BTreeMap::new())
            })
            .collect())
    }
}
