//! Graft SDK - Lightweight SDK for writing agent plugins
//!
//! This crate provides the types and traits needed to describe load-time
//! class edits declaratively, without depending on the full graft-engine.
//! A plugin names a target class, optionally gates the whole edit on a
//! [`Condition`], and attaches interceptor / metadata / field-access
//! injectors through [`ClassEditBuilder`]. The built [`ClassEditor`] is
//! immutable and is applied by the engine once per matching load event.
//!
//! # Example
//!
//! ```ignore
//! use graft_sdk::{AgentPlugin, ClassEditBuilder, ClassEditor, PluginContext};
//!
//! struct WidgetPlugin;
//!
//! impl AgentPlugin for WidgetPlugin {
//!     fn name(&self) -> &str {
//!         "widget"
//!     }
//!
//!     fn class_editors(&self, _context: &PluginContext) -> Vec<ClassEditor> {
//!         let mut builder = ClassEditBuilder::new("com.example.Widget");
//!         builder
//!             .interceptor()
//!             .intercept_method("render", &["java.lang.String"])
//!             .with(|ctx| Ok(my_interceptor(ctx)));
//!         vec![builder.build().expect("valid edit")]
//!     }
//! }
//! ```
//!
//! The bytecode rewriting engine itself is an external collaborator: the SDK
//! only defines the [`Instrumentor`] and [`InstrumentClass`] capability
//! traits it is invoked through.

#![warn(missing_docs)]

pub mod builder;
pub mod condition;
pub mod editor;
pub mod error;
pub mod injector;
pub mod instrument;
pub mod interceptor;
pub mod plugin;

#[cfg(test)]
pub(crate) mod testkit;

pub use builder::{ClassEditBuilder, EditError, FieldSnooperBuilder, InterceptorBuilder, MetadataBuilder};
pub use condition::{Condition, HasMethod, MethodFilter};
pub use editor::ClassEditor;
pub use error::PluginError;
pub use injector::{
    ConditionalInjector, ConstructorInterceptorInjector, DedicatedInterceptorInjector,
    FieldSnooperInjector, FilteringInterceptorInjector, Injector, MetadataInjector,
};
pub use instrument::{
    FieldSnooper, InstrumentClass, InstrumentError, Instrumentor, LoaderRef, MetadataAccessor,
    MetadataInitStrategy, MethodDescriptor, ProtectionDomain,
};
pub use interceptor::{
    Interceptor, InterceptorContext, InterceptorConstructor, InterceptorFactory, InterceptorHandle,
};
pub use plugin::{AgentPlugin, PluginContext, PLUGIN_API_VERSION};
