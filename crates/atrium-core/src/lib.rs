//! atrium-core: Shared types, configuration, and error handling for the atrium backend.
//!
//! This crate provides the foundational pieces used across all atrium components:
//! - The marshalled entity shape and well-known graph vocabulary
//! - The domain error shape carried across every service boundary
//! - Sealable registries populated during process initialization
//! - Configuration management
//! - The seam to the external schema-validation subsystem

pub mod config;
pub mod entity;
pub mod error;
pub mod registry;
pub mod validate;

pub use entity::Entity;
pub use error::DomainError;
pub use registry::{Registry, RegistryError};
