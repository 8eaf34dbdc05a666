//! Agent configuration (agent.toml)

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::filter::ProfilableClassFilter;
use crate::server::ServerKind;

/// Errors that can occur while loading the agent configuration
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read the configuration file
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Agent configuration.
///
/// Every field has a default so an empty file (or no file) is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AgentConfig {
    /// Class name prefixes eligible for the wildcard fallback
    #[serde(default)]
    pub profile_includes: Vec<String>,

    /// Extra class name prefixes the skip filter rejects, on top of the
    /// built-in system prefixes
    #[serde(default)]
    pub skip_prefixes: Vec<String>,

    /// Built-in modifier group toggles
    #[serde(default)]
    pub builtins: BuiltinToggles,

    /// Server kind assumed when detection finds nothing
    #[serde(default)]
    pub default_server_kind: Option<ServerKind>,
}

/// Which built-in modifier groups are registered at startup
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct BuiltinToggles {
    /// Wildcard method-trace modifier (the `*` registry entry)
    #[serde(default = "default_true")]
    pub method_trace: bool,

    /// HTTP entry-point editor, active only on container server kinds
    #[serde(default = "default_true")]
    pub http_entry: bool,
}

impl Default for BuiltinToggles {
    fn default() -> Self {
        Self {
            method_trace: true,
            http_entry: true,
        }
    }
}

fn default_true() -> bool {
    true
}

impl AgentConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    /// Profilable filter built from the configured include prefixes
    pub fn profilable_filter(&self) -> ProfilableClassFilter {
        ProfilableClassFilter::new(self.profile_includes.clone())
    }
}
