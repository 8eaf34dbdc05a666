//! Modifier provider interface
//!
//! Providers are discovered by an external mechanism and handed to
//! [`build_registry`](crate::registry::build_registry) already instantiated.
//! They return modifiers directly — there is no opaque-object shape check —
//! so the only contribution the engine can reject is a provider compiled
//! against a different API version, which is skipped and logged.

use std::sync::Arc;

use graft_sdk::Instrumentor;

use crate::modifier::Modifier;

/// Version of the modifier API this engine was compiled with
pub const MODIFIER_API_VERSION: u32 = 1;

/// A discovered source of ready-made modifiers
pub trait ModifierProvider: Send + Sync {
    /// Provider name used in logs
    fn name(&self) -> &str;

    /// API version the provider was built against
    fn api_version(&self) -> u32 {
        MODIFIER_API_VERSION
    }

    /// The modifiers this provider contributes; may be empty
    fn modifiers(&self, instrumentor: &Arc<dyn Instrumentor>) -> Vec<Arc<dyn Modifier>>;
}
