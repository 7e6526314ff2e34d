//! The marshalled entity shape and the well-known graph vocabulary.
//!
//! Entities are heterogeneous property bags: their shapes are owned by the
//! entity modules (and checked by the external schema validator), so this
//! crate deliberately does not model per-type structs. What every entity
//! shares is a primary label, carried as `type`, and a generated `uuid`.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A node marshalled out of the graph: primary label plus converted properties.
///
/// Serializes to `{ "type": "...", ...properties }` with the property bag
/// flattened beside the tag.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    #[serde(rename = "type")]
    pub kind: String,

    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl Entity {
    pub fn new(kind: impl Into<String>, properties: Map<String, Value>) -> Self {
        Self {
            kind: kind.into(),
            properties,
        }
    }

    /// The generated identifier, if present on this entity.
    pub fn uuid(&self) -> Option<&str> {
        self.properties.get("uuid").and_then(Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }
}

/// Node labels with meaning to the substrate itself.
///
/// Entity modules contribute further labels at registration time; these are
/// the ones the auth traversals and constraint bootstrap rely on.
pub mod labels {
    pub const USER: &str = "User";
    pub const MEMBER: &str = "Member";
    pub const WORKSPACE: &str = "Workspace";
    pub const MAIN_CONFIG: &str = "MainConfig";
}

/// Relationship types with meaning to the substrate itself.
pub mod rels {
    /// Links a user identity to its per-workspace member record.
    pub const SAME_AS: &str = "SAME_AS";
    /// Member-to-workspace edge; carries the `role` property.
    pub const MEMBER_OF: &str = "MEMBER_OF";
    /// Direct user-to-MainConfig edge granting global privileges.
    pub const SYSADMIN: &str = "SYSADMIN";
    /// Generic ownership edge from an entity to its workspace.
    pub const BELONGS_TO: &str = "BELONGS_TO";
}
