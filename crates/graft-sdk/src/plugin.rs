//! Agent plugin interface
//!
//! A plugin contributes class editors for the target classes it knows about.
//! Editors are always bound to a target class name, so the engine can key
//! them into its registry directly; the only contribution the engine may
//! reject is a plugin compiled against a different API version.

use serde_json::Value;

use crate::editor::ClassEditor;

/// Version of the plugin API this SDK was compiled with.
///
/// The engine skips (and logs) plugins reporting a different version.
pub const PLUGIN_API_VERSION: u32 = 1;

/// Read-only values handed to plugins while they build their editors
#[derive(Debug, Clone)]
pub struct PluginContext {
    agent_version: String,
    settings: Value,
}

impl PluginContext {
    /// Create a context for the given agent version
    pub fn new(agent_version: impl Into<String>) -> Self {
        Self {
            agent_version: agent_version.into(),
            settings: Value::Null,
        }
    }

    /// Attach free-form settings (from the agent configuration)
    pub fn with_settings(mut self, settings: Value) -> Self {
        self.settings = settings;
        self
    }

    /// Version of the running agent
    pub fn agent_version(&self) -> &str {
        &self.agent_version
    }

    /// Free-form plugin settings; `Null` when none were configured
    pub fn settings(&self) -> &Value {
        &self.settings
    }
}

/// An extension package contributing class edits to the agent
pub trait AgentPlugin: Send + Sync {
    /// Plugin name used in logs
    fn name(&self) -> &str;

    /// API version the plugin was built against
    fn api_version(&self) -> u32 {
        PLUGIN_API_VERSION
    }

    /// Build the editors this plugin contributes, one per target class
    fn class_editors(&self, context: &PluginContext) -> Vec<ClassEditor>;
}
