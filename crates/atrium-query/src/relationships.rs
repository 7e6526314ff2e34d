//! Relationship helpers: multi-target fan-out and the workspace ownership
//! fragment.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::error::ConstructionError;
use crate::pattern::{check_identifier, Label};
use crate::statement::{CompiledStatement, Fragment};

/// A reference to one end of a relationship: identifier plus primary label.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelTarget {
    pub uuid: Option<String>,
    pub kind: Option<String>,
}

impl RelTarget {
    pub fn new(uuid: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            uuid: Some(uuid.into()),
            kind: Some(kind.into()),
        }
    }
}

fn checked(target: &RelTarget, index: usize) -> Result<(&str, Label), ConstructionError> {
    let uuid = target
        .uuid
        .as_deref()
        .ok_or(ConstructionError::MalformedTarget {
            index,
            field: "uuid",
        })?;
    let kind = target
        .kind
        .as_deref()
        .ok_or(ConstructionError::MalformedTarget {
            index,
            field: "type",
        })?;
    Ok((uuid, Label::new(kind)?))
}

/// Fan a typed relationship out from one node to many targets.
///
/// Every target must carry both an identifier and a type; validation runs
/// over the whole list before any statement is emitted, so one malformed
/// target means zero statements (all-or-nothing). Emits one MATCH+MERGE
/// statement per target, intended to run inside a single write
/// transaction.
pub fn add_multi_relationship(
    from: &RelTarget,
    rel_type: &str,
    targets: &[RelTarget],
) -> Result<Vec<CompiledStatement>, ConstructionError> {
    let rel = Label::new(rel_type)?;
    let (from_uuid, from_kind) = checked(from, 0)?;
    let ends = targets
        .iter()
        .enumerate()
        .map(|(i, t)| checked(t, i))
        .collect::<Result<Vec<_>, _>>()?;

    let statements = ends
        .into_iter()
        .map(|(to_uuid, to_kind)| {
            let text = format!(
                "MATCH (from:{from_kind} {{uuid: $from_uuid}}) \
                 MATCH (to:{to_kind} {{uuid: $to_uuid}}) \
                 MERGE (from)-[:{rel}]->(to)"
            );
            let mut params = BTreeMap::new();
            params.insert("from_uuid".to_string(), Value::String(from_uuid.to_string()));
            params.insert("to_uuid".to_string(), Value::String(to_uuid.to_string()));
            CompiledStatement::new(text, params)
        })
        .collect();
    Ok(statements)
}

/// Reusable fragment tying an already-bound node to its workspace:
/// matches the workspace by identifier and merges a `BELONGS_TO` edge.
pub fn belongs_to_workspace(
    node_name: &str,
    workspace_uuid: &str,
) -> Result<Fragment, ConstructionError> {
    check_identifier(node_name)?;

    let text = format!(
        "WITH {node_name} MATCH (workspace:Workspace {{uuid: $workspace_uuid}}) \
         MERGE ({node_name})-[:BELONGS_TO]->(workspace)"
    );
    let mut params = BTreeMap::new();
    params.insert(
        "workspace_uuid".to_string(),
        Value::String(workspace_uuid.to_string()),
    );
    Ok(Fragment { text, params })
}
