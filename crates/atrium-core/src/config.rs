//! Configuration management for atrium services.
//!
//! Settings are loaded from (in priority order):
//! 1. Environment variables (`ATRIUM__` prefix, `__` separator)
//! 2. Config file (`atrium.toml`)
//! 3. Defaults

use serde::Deserialize;

/// Top-level settings for a process embedding the substrate.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Settings {
    /// Graph store connection settings, `[graph]` section.
    #[serde(default)]
    pub graph: GraphConfig,
}

/// Connection settings for the Neo4j store.
#[derive(Debug, Clone, Deserialize)]
pub struct GraphConfig {
    #[serde(default = "default_uri")]
    pub uri: String,

    #[serde(default = "default_user")]
    pub user: String,

    #[serde(default)]
    pub password: String,

    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    #[serde(default = "default_fetch_size")]
    pub fetch_size: usize,
}

fn default_uri() -> String {
    "bolt://localhost:7687".to_string()
}

fn default_user() -> String {
    "neo4j".to_string()
}

fn default_max_connections() -> u32 {
    16
}

fn default_fetch_size() -> usize {
    256
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            uri: default_uri(),
            user: default_user(),
            password: String::new(),
            max_connections: default_max_connections(),
            fetch_size: default_fetch_size(),
        }
    }
}

impl Settings {
    /// Load settings from `atrium.toml` and `ATRIUM__*` environment overrides.
    pub fn load() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::with_name("atrium").required(false))
            .add_source(config::Environment::with_prefix("ATRIUM").separator("__"))
            .build()?
            .try_deserialize()
    }
}
