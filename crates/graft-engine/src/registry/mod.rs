//! Modifier registry: construction and lookup
//!
//! The registry maps exact class names to modifiers and carries one optional
//! wildcard entry. It is assembled once during startup — built-ins first,
//! then discovered providers, then plugin class editors — and is immutable
//! afterwards, so concurrent lookups need no synchronization.

mod adaptor;
mod builtin;
mod provider;

pub use adaptor::ClassEditorAdaptor;
pub use provider::{ModifierProvider, MODIFIER_API_VERSION};

use std::sync::Arc;

use graft_sdk::{AgentPlugin, EditError, Instrumentor, PluginContext, PLUGIN_API_VERSION};
use rustc_hash::FxHashMap;
use tracing::{info, warn};

use crate::config::AgentConfig;
use crate::modifier::Modifier;
use crate::server::ServerProfile;

/// Errors raised while assembling the registry.
///
/// These are configuration errors and may propagate: registry construction
/// completes strictly before the engine receives load events.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Two modifiers were registered for the same exact class name
    #[error("Duplicate modifier for target class: {0}")]
    DuplicateTarget(String),

    /// Two wildcard modifiers were registered
    #[error("Duplicate wildcard modifier")]
    DuplicateWildcard,

    /// A built-in edit specification failed validation
    #[error("Invalid built-in editor: {0}")]
    InvalidBuiltin(#[from] EditError),
}

/// Immutable class name → modifier mapping with one wildcard slot
pub struct ModifierRegistry {
    modifiers: FxHashMap<String, Arc<dyn Modifier>>,
    wildcard: Option<Arc<dyn Modifier>>,
}

impl ModifierRegistry {
    /// Exact lookup; never consults the wildcard
    pub fn find(&self, class_name: &str) -> Option<&Arc<dyn Modifier>> {
        self.modifiers.get(class_name)
    }

    /// The wildcard modifier, if one was registered
    pub fn wildcard(&self) -> Option<&Arc<dyn Modifier>> {
        self.wildcard.as_ref()
    }

    /// Number of exact-name entries
    pub fn len(&self) -> usize {
        self.modifiers.len()
    }

    /// True when no exact-name entries exist
    pub fn is_empty(&self) -> bool {
        self.modifiers.is_empty()
    }
}

/// Builder for the one-time registry construction phase
#[derive(Default)]
pub struct ModifierRegistryBuilder {
    modifiers: FxHashMap<String, Arc<dyn Modifier>>,
    wildcard: Option<Arc<dyn Modifier>>,
}

impl ModifierRegistryBuilder {
    /// Create an empty builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a modifier under its target class name.
    ///
    /// A second registration for the same name is rejected with a diagnostic
    /// rather than silently replacing the first.
    pub fn register(&mut self, modifier: Arc<dyn Modifier>) -> Result<(), RegistryError> {
        let target = modifier.target_class_name().to_string();
        if self.modifiers.contains_key(&target) {
            return Err(RegistryError::DuplicateTarget(target));
        }
        info!(target = %target, "registered modifier");
        self.modifiers.insert(target, modifier);
        Ok(())
    }

    /// Register the wildcard fallback modifier
    pub fn register_wildcard(&mut self, modifier: Arc<dyn Modifier>) -> Result<(), RegistryError> {
        if self.wildcard.is_some() {
            return Err(RegistryError::DuplicateWildcard);
        }
        info!("registered wildcard modifier");
        self.wildcard = Some(modifier);
        Ok(())
    }

    /// Freeze the registry
    pub fn build(self) -> ModifierRegistry {
        ModifierRegistry {
            modifiers: self.modifiers,
            wildcard: self.wildcard,
        }
    }
}

/// Assemble the complete registry from all modifier sources.
///
/// Registration order is built-ins, then providers, then plugin editors.
/// Order only matters for log clarity: duplicate targets from providers and
/// plugins are skipped with a warning (a discovery problem is never fatal),
/// while duplicates among built-ins propagate as configuration errors.
pub fn build_registry(
    config: &AgentConfig,
    profile: &ServerProfile,
    instrumentor: &Arc<dyn Instrumentor>,
    providers: &[Box<dyn ModifierProvider>],
    plugins: &[Box<dyn AgentPlugin>],
) -> Result<ModifierRegistry, RegistryError> {
    let mut builder = ModifierRegistryBuilder::new();

    builtin::register_builtins(&mut builder, config, profile, instrumentor)?;

    for provider in providers {
        if provider.api_version() != MODIFIER_API_VERSION {
            warn!(
                provider = provider.name(),
                version = provider.api_version(),
                expected = MODIFIER_API_VERSION,
                "skipping provider with unsupported api version"
            );
            continue;
        }
        for modifier in provider.modifiers(instrumentor) {
            info!(
                provider = provider.name(),
                target = modifier.target_class_name(),
                "registering provider modifier"
            );
            if let Err(e) = builder.register(modifier) {
                warn!(provider = provider.name(), error = %e, "skipping provider modifier");
            }
        }
    }

    let plugin_context = PluginContext::new(env!("CARGO_PKG_VERSION"));
    for plugin in plugins {
        if plugin.api_version() != PLUGIN_API_VERSION {
            warn!(
                plugin = plugin.name(),
                version = plugin.api_version(),
                expected = PLUGIN_API_VERSION,
                "skipping plugin with unsupported api version"
            );
            continue;
        }
        info!(plugin = plugin.name(), "loading plugin");
        for editor in plugin.class_editors(&plugin_context) {
            info!(
                plugin = plugin.name(),
                target = editor.target_class_name(),
                "registering class editor"
            );
            let adaptor = ClassEditorAdaptor::new(Arc::clone(instrumentor), editor);
            if let Err(e) = builder.register(Arc::new(adaptor)) {
                warn!(plugin = plugin.name(), error = %e, "skipping class editor");
            }
        }
    }

    Ok(builder.build())
}
