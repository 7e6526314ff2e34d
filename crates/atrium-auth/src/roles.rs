//! Roles: a fixed base enumeration, extensible at boot.

use atrium_core::Registry;
use serde::{Deserialize, Serialize};

/// A role name. Workspace roles only have meaning relative to a
/// membership edge; `sysadmin` is global.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Role(String);

impl Role {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn sysadmin() -> Self {
        Self::new(SYSADMIN)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_sysadmin(&self) -> bool {
        self.0 == SYSADMIN
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

pub const SYSADMIN: &str = "sysadmin";

/// The base enumeration every deployment starts from.
pub const BASE_ROLES: [&str; 3] = ["sysadmin", "admin", "member"];

/// Role names contributed by entity modules at boot.
pub type RoleRegistry = Registry<String>;

/// A registry pre-seeded with the base roles, left unsealed so entity
/// modules can contribute additional names before the boot phase seals it.
pub fn role_registry() -> RoleRegistry {
    let mut registry = RoleRegistry::new();
    for role in BASE_ROLES {
        registry
            .register(role.to_string())
            .expect("fresh registry is never sealed");
    }
    registry
}

/// The full role enumeration: base roles plus boot-time contributions.
pub fn get_roles(registry: &RoleRegistry) -> Vec<Role> {
    registry.iter().map(|name| Role::new(name.clone())).collect()
}
