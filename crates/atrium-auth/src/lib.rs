//! atrium-auth: authentication strategies and role-scoped authorization.
//!
//! Turns an inbound actor into an [`AuthContext`] by walking one of two
//! relationship shapes in the graph — workspace membership or the global
//! sysadmin edge — and derives a per-request capability set from the
//! ability rules contributed by entity modules at boot.

pub mod abilities;
pub mod error;
pub mod resolver;
pub mod roles;
pub mod strategy;

pub use abilities::{
    permissions, AbilityContributor, AbilityRegistry, AbilityRule, Action, CapabilitySet,
    ALL_SUBJECTS,
};
pub use error::AuthError;
pub use resolver::{AuthContext, Authenticator};
pub use roles::{get_roles, role_registry, Role, RoleRegistry};
pub use strategy::{AuthRequest, AuthStrategy, StrategyRegistry, UserFilter};
