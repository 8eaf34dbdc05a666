//! Error types for the Graft SDK

use crate::instrument::InstrumentError;

/// Errors raised while applying an edit to a class representation
#[derive(Debug, Clone, thiserror::Error)]
pub enum PluginError {
    /// An interceptor factory failed to produce an instance
    #[error("Interceptor creation failed: {0}")]
    InterceptorCreation(String),

    /// The rewriting capability rejected an operation
    #[error(transparent)]
    Instrument(#[from] InstrumentError),

    /// Plugin-specific failure
    #[error("Plugin error: {0}")]
    PluginFailed(String),
}

impl From<String> for PluginError {
    fn from(s: String) -> Self {
        PluginError::PluginFailed(s)
    }
}

impl From<&str> for PluginError {
    fn from(s: &str) -> Self {
        PluginError::PluginFailed(s.to_string())
    }
}
