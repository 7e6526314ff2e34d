//! Ability rules and the per-request capability set.
//!
//! Entity modules contribute a rule source at boot; the union of every
//! source's rules for a given context forms that request's capability set.
//! The set is computed fresh per request — contexts differ in role and
//! workspace, so nothing here is cached.

use atrium_core::{Entity, Registry};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AuthError;
use crate::resolver::AuthContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    Read,
    Update,
    Delete,
    /// Wildcard: grants every other action on the subject.
    Manage,
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Action::Create => "create",
            Action::Read => "read",
            Action::Update => "update",
            Action::Delete => "delete",
            Action::Manage => "manage",
        };
        f.write_str(name)
    }
}

/// Subject name matching every entity type.
pub const ALL_SUBJECTS: &str = "all";

/// `{ action, subject, conditions? }` — one grant.
///
/// `conditions` is a flat property map; a rule with conditions only
/// applies to entities whose properties contain every listed pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityRule {
    pub action: Action,
    pub subject: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub conditions: Option<Value>,
}

impl AbilityRule {
    pub fn new(action: Action, subject: impl Into<String>) -> Self {
        Self {
            action,
            subject: subject.into(),
            conditions: None,
        }
    }

    pub fn when(mut self, conditions: Value) -> Self {
        self.conditions = Some(conditions);
        self
    }

    fn covers(&self, action: Action, subject: &str) -> bool {
        (self.action == action || self.action == Action::Manage)
            && (self.subject == subject || self.subject == ALL_SUBJECTS)
    }
}

/// An entity module's rule source, evaluated against the request context.
pub trait AbilityContributor: Send + Sync {
    fn rules(&self, context: &AuthContext) -> Vec<AbilityRule>;
}

/// Rule sources registered against the authorization extension point.
pub type AbilityRegistry = Registry<Box<dyn AbilityContributor>>;

/// Build the capability set for one request: the union of every
/// contributor's rules for this context.
pub fn permissions(context: &AuthContext, registry: &AbilityRegistry) -> CapabilitySet {
    let rules = registry
        .iter()
        .flat_map(|contributor| contributor.rules(context))
        .collect();
    CapabilitySet { rules }
}

/// The capability checker handed to the service layer.
#[derive(Debug, Clone)]
pub struct CapabilitySet {
    rules: Vec<AbilityRule>,
}

impl CapabilitySet {
    /// Can the context perform `action` on the subject type at all?
    /// Conditional rules do not grant type-level access.
    pub fn can(&self, action: Action, subject: &str) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.covers(action, subject) && rule.conditions.is_none())
    }

    /// Can the context perform `action` on this concrete entity?
    pub fn can_entity(&self, action: Action, subject: &str, entity: &Entity) -> bool {
        self.rules.iter().any(|rule| {
            rule.covers(action, subject)
                && match &rule.conditions {
                    None => true,
                    Some(conditions) => conditions_match(conditions, entity),
                }
        })
    }

    pub fn authorize(&self, action: Action, subject: &str) -> Result<(), AuthError> {
        if self.can(action, subject) {
            Ok(())
        } else {
            Err(AuthError::Forbidden {
                action: action.to_string(),
                subject: subject.to_string(),
            })
        }
    }

    pub fn rules(&self) -> &[AbilityRule] {
        &self.rules
    }
}

fn conditions_match(conditions: &Value, entity: &Entity) -> bool {
    match conditions.as_object() {
        Some(map) => map
            .iter()
            .all(|(key, expected)| entity.get(key) == Some(expected)),
        None => false,
    }
}
