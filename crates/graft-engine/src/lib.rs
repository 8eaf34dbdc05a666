//! Graft Engine — runtime edit dispatch for load-time class transformation
//!
//! The engine sits between the host's module-loading path and the declarative
//! class edits written against `graft-sdk`:
//! - **Registry**: class name → modifier mapping, assembled once at startup
//!   from built-ins, discovered providers, and plugin class editors
//!   (`registry` module)
//! - **Dispatcher**: per load event, applies the skip filter, resolves a
//!   modifier (exact match or profilable-gated wildcard), and isolates every
//!   failure so the host's load path never sees an error (`dispatcher` module)
//! - **Context**: ambient per-thread loader context, swapped in and out with
//!   a scope guard for the duration of each transformation (`context` module)
//!
//! The engine owns no threads: dispatch runs synchronously on whichever
//! threads the host loads classes from, and the registry is immutable after
//! construction, so the hot path takes no locks.

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

// ============================================================================
// Core Modules
// ============================================================================

/// Agent configuration parsed from `agent.toml`
pub mod config;

/// Ambient per-thread execution context
pub mod context;

/// Class-load dispatch engine
pub mod dispatcher;

/// Skip and profilable filters
pub mod filter;

/// Modifier trait and load event types
pub mod modifier;

/// Modifier registry: construction and lookup
pub mod registry;

/// Server-type resolution (profile for built-in activation)
pub mod server;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{AgentConfig, BuiltinToggles, ConfigError};
pub use context::{current_context, ContextScope, LoaderContext};
pub use dispatcher::ClassLoadDispatcher;
pub use filter::{ClassFileFilter, ClassNameFilter, DefaultClassFileFilter, ProfilableClassFilter};
pub use modifier::{ClassLoadEvent, Modifier, ModifyError};
pub use registry::{
    build_registry, ClassEditorAdaptor, ModifierProvider, ModifierRegistry,
    ModifierRegistryBuilder, RegistryError, MODIFIER_API_VERSION,
};
pub use server::{ServerDetectPlugin, ServerKind, ServerProfile, ServerTypeResolver};
