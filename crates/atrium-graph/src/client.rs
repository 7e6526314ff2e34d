//! Neo4j connection management and shared graph client.

use atrium_core::config::GraphConfig;
use atrium_core::DomainError;
use neo4rs::{ConfigBuilder, Graph};

/// Errors from graph operations.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Neo4j connection error: {0}")]
    Connection(String),

    #[error("Neo4j query error: {0}")]
    Query(neo4rs::Error),

    #[error("uniqueness conflict: an entity with the same unique value already exists")]
    ConstraintViolation { detail: String },

    #[error("statement construction error: {0}")]
    Construction(#[from] atrium_query::ConstructionError),

    #[error("constraint registry must be sealed before setup")]
    UnsealedRegistry,

    #[error("serialization error: {0}")]
    Serialization(String),
}

impl From<GraphError> for DomainError {
    fn from(err: GraphError) -> Self {
        match err {
            GraphError::ConstraintViolation { ref detail } => {
                DomainError::conflict(err.to_string())
                    .with_details(serde_json::json!({ "cause": detail }))
            }
            GraphError::Construction(inner) => inner.into(),
            // Everything unclassified keeps its original message and a 500.
            other => DomainError::internal(other.to_string()),
        }
    }
}

/// Thread-safe Neo4j graph client with connection pooling.
///
/// This is the single process-wide handle to the store, shared by every
/// request task. Clone is cheap (inner Arc).
#[derive(Clone)]
pub struct GraphClient {
    pub(crate) graph: Graph,
}

impl GraphClient {
    /// Connect to Neo4j with the given configuration.
    pub async fn connect(config: &GraphConfig) -> Result<Self, GraphError> {
        let neo_config = ConfigBuilder::default()
            .uri(&config.uri)
            .user(&config.user)
            .password(&config.password)
            .max_connections(config.max_connections as usize)
            .fetch_size(config.fetch_size)
            .build()
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        let graph = Graph::connect(neo_config)
            .await
            .map_err(|e| GraphError::Connection(e.to_string()))?;

        tracing::info!(uri = %config.uri, "Connected to Neo4j");
        Ok(Self { graph })
    }
}
