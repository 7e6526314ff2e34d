//! atrium-graph: Neo4j execution and marshalling layer.
//!
//! Consumes compiled statements from atrium-query, runs them against the
//! store (single auto-committed statements or scoped write transactions),
//! and normalizes Bolt values into plain JSON data. The only crate that
//! touches the driver.

pub mod client;
pub mod constraints;
pub mod execute;
pub mod marshal;

pub use client::{GraphClient, GraphError};
pub use execute::{TxnFuture, TxnHandle};
pub use marshal::{bolt_to_json, parse_node, parse_relationship};
