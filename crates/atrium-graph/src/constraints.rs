//! Startup constraint bootstrap.

use std::collections::BTreeSet;

use atrium_query::ConstraintRegistry;

use crate::client::{GraphClient, GraphError};

impl GraphClient {
    /// Consume the sealed constraint registry and apply every declaration.
    ///
    /// Declarations are deduplicated by name, compiled to `CREATE
    /// CONSTRAINT ... IF NOT EXISTS` statements, and issued inside one
    /// write transaction. The store-side IF NOT EXISTS makes the whole
    /// pass idempotent: running it against an already-bootstrapped store
    /// is a no-op.
    pub async fn setup_constraints(
        &self,
        registry: &ConstraintRegistry,
    ) -> Result<(), GraphError> {
        if !registry.is_sealed() {
            return Err(GraphError::UnsealedRegistry);
        }

        let mut seen = BTreeSet::new();
        let mut statements = Vec::new();
        for declaration in registry {
            if !seen.insert(declaration.name.clone()) {
                continue;
            }
            statements.extend(declaration.to_statements()?);
        }

        let applied = statements.len();
        self.write_transaction(move |txn| {
            Box::pin(async move {
                for statement in &statements {
                    txn.run(statement).await?;
                }
                Ok(())
            })
        })
        .await?;

        tracing::info!(applied, "Applied uniqueness constraints");
        Ok(())
    }
}
