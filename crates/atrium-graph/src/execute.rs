//! Statement execution: auto-commit queries and scoped write transactions.
//!
//! Every driver failure funnels through [`normalize`], which remaps known
//! store failure codes (currently the uniqueness-constraint violation) to a
//! specific domain error and lets everything else pass through generically.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use atrium_query::CompiledStatement;
use neo4rs::{query, BoltMap, BoltNull, BoltType, Query, Row};
use serde_json::Value;

use crate::client::{GraphClient, GraphError};

/// Convert a JSON parameter value into its Bolt equivalent.
pub(crate) fn json_to_bolt(value: &Value) -> BoltType {
    match value {
        Value::Null => BoltType::Null(BoltNull),
        Value::Bool(b) => (*b).into(),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                i.into()
            } else {
                n.as_f64().unwrap_or(f64::NAN).into()
            }
        }
        Value::String(s) => s.clone().into(),
        Value::Array(items) => {
            let list: Vec<BoltType> = items.iter().map(json_to_bolt).collect();
            BoltType::List(list.into())
        }
        Value::Object(map) => {
            let entries: HashMap<neo4rs::BoltString, BoltType> = map
                .iter()
                .map(|(k, v)| (k.clone().into(), json_to_bolt(v)))
                .collect();
            BoltType::Map(BoltMap { value: entries })
        }
    }
}

/// Bind a compiled statement onto a driver query. Parameters only — the
/// statement text is used verbatim.
pub(crate) fn to_query(statement: &CompiledStatement) -> Query {
    let mut q = query(statement.text());
    for (name, value) in statement.params() {
        q = q.param(name, json_to_bolt(value));
    }
    q
}

/// The single error-normalization path for everything the driver returns.
pub(crate) fn normalize(err: neo4rs::Error) -> GraphError {
    let text = err.to_string();
    if text.contains("ConstraintValidationFailed") || text.contains("already exists with") {
        GraphError::ConstraintViolation { detail: text }
    } else {
        GraphError::Query(err)
    }
}

/// Scoped handle to an open write transaction. Only statement execution is
/// exposed; commit and rollback belong to [`GraphClient::write_transaction`].
pub struct TxnHandle {
    pub(crate) txn: neo4rs::Txn,
}

impl TxnHandle {
    pub async fn run(&mut self, statement: &CompiledStatement) -> Result<(), GraphError> {
        self.txn.run(to_query(statement)).await.map_err(normalize)
    }
}

/// The boxed future a transaction callback returns.
pub type TxnFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, GraphError>> + Send + 'a>>;

impl GraphClient {
    /// Execute a single auto-committed statement and shape the result with
    /// the caller-supplied parser.
    pub async fn execute<T, P>(
        &self,
        statement: &CompiledStatement,
        parser: P,
    ) -> Result<T, GraphError>
    where
        P: FnOnce(Vec<Row>) -> Result<T, GraphError>,
    {
        let rows = self.query_rows(statement).await?;
        parser(rows)
    }

    /// Execute a statement and collect all rows.
    pub async fn query_rows(&self, statement: &CompiledStatement) -> Result<Vec<Row>, GraphError> {
        let mut stream = self
            .graph
            .execute(to_query(statement))
            .await
            .map_err(normalize)?;
        let mut rows = Vec::new();
        while let Some(row) = stream.next().await.map_err(normalize)? {
            rows.push(row);
        }
        Ok(rows)
    }

    /// Execute a statement and return the first row, if any.
    pub async fn query_one(
        &self,
        statement: &CompiledStatement,
    ) -> Result<Option<Row>, GraphError> {
        let mut stream = self
            .graph
            .execute(to_query(statement))
            .await
            .map_err(normalize)?;
        stream.next().await.map_err(normalize)
    }

    /// Execute a write-only statement, discarding results.
    pub async fn run(&self, statement: &CompiledStatement) -> Result<(), GraphError> {
        self.graph.run(to_query(statement)).await.map_err(normalize)
    }

    /// Run `work` inside one write transaction.
    ///
    /// The transaction is committed when `work` succeeds and rolled back on
    /// every error path; the session is released either way. Statements
    /// issued through the handle succeed or fail atomically as a unit. A
    /// conflict inside the transaction surfaces as an error — nothing is
    /// retried here.
    pub async fn write_transaction<T, F>(&self, work: F) -> Result<T, GraphError>
    where
        F: for<'a> FnOnce(&'a mut TxnHandle) -> TxnFuture<'a, T>,
    {
        let txn = self.graph.start_txn().await.map_err(normalize)?;
        let mut handle = TxnHandle { txn };
        match work(&mut handle).await {
            Ok(value) => {
                handle.txn.commit().await.map_err(normalize)?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = handle.txn.rollback().await {
                    tracing::warn!(error = %rollback_err, "rollback failed after transaction error");
                }
                Err(err)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_to_bolt_nested() {
        let value = json!({"tags": ["a", "b"], "depth": 2, "ratio": 0.5, "on": true});
        match json_to_bolt(&value) {
            BoltType::Map(map) => assert_eq!(map.value.len(), 4),
            other => panic!("expected map, got {other:?}"),
        }
    }

    #[test]
    fn test_constraint_violation_is_remapped() {
        let err = neo4rs::Error::UnexpectedMessage(
            "Neo.ClientError.Schema.ConstraintValidationFailed: Node already exists with label \
             `User` and property `uuid`"
                .into(),
        );
        assert!(matches!(
            normalize(err),
            GraphError::ConstraintViolation { .. }
        ));
    }

    #[test]
    fn test_unknown_errors_pass_through() {
        let err = neo4rs::Error::UnexpectedMessage("boom".into());
        assert!(matches!(normalize(err), GraphError::Query(_)));
    }
}
