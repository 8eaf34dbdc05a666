//! Interceptors and interceptor factories
//!
//! An [`Interceptor`] is the behavior attached around a matched method or
//! constructor call. Its data capture logic lives in the tracing runtime and
//! is opaque here; the SDK only moves instances around. An
//! [`InterceptorFactory`] carries everything needed to produce one instance:
//! a constructor closure, constructor-style arguments, and an optional named
//! scope used to correlate grouped interceptors at run time.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::error::PluginError;
use crate::instrument::InstrumentClass;

/// Behavior attached around a matched call site.
///
/// Instances may be shared across call sites (see the `singleton` flag on
/// filtering injectors), so implementations must be `Send + Sync`.
pub trait Interceptor: Send + Sync {
    /// Diagnostic name used in logs
    fn name(&self) -> &str;
}

/// Shared handle to an interceptor instance
pub type InterceptorHandle = Arc<dyn Interceptor>;

/// Resolved inputs handed to an interceptor constructor
#[derive(Debug)]
pub struct InterceptorContext<'a> {
    /// Name of the class being instrumented
    pub class_name: &'a str,
    /// Constructor-style arguments configured on the factory
    pub arguments: &'a [Value],
    /// Named scope for correlating grouped interceptors, if any
    pub scope: Option<&'a str>,
}

/// Constructor closure producing one interceptor instance per call
pub type InterceptorConstructor =
    Arc<dyn Fn(&InterceptorContext<'_>) -> Result<InterceptorHandle, PluginError> + Send + Sync>;

/// Produces interceptor instances for one injector.
///
/// The factory is invoked once per attachment (or once per class-editor
/// application when the injector is a singleton filter) — it never caches
/// instances itself.
#[derive(Clone)]
pub struct InterceptorFactory {
    constructor: InterceptorConstructor,
    arguments: Vec<Value>,
    scope: Option<String>,
}

impl fmt::Debug for InterceptorFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorFactory")
            .field("arguments", &self.arguments)
            .field("scope", &self.scope)
            .finish()
    }
}

impl InterceptorFactory {
    /// Create a factory from a constructor closure
    pub fn new(
        constructor: impl Fn(&InterceptorContext<'_>) -> Result<InterceptorHandle, PluginError>
            + Send
            + Sync
            + 'static,
    ) -> Self {
        Self::from_parts(Arc::new(constructor), Vec::new(), None)
    }

    /// Assemble a factory from already-shared parts
    pub fn from_parts(
        constructor: InterceptorConstructor,
        arguments: Vec<Value>,
        scope: Option<String>,
    ) -> Self {
        Self {
            constructor,
            arguments,
            scope,
        }
    }

    /// Set constructor-style arguments passed to every created instance
    pub fn with_arguments(mut self, arguments: Vec<Value>) -> Self {
        self.arguments = arguments;
        self
    }

    /// Set the named scope for correlating grouped interceptors
    pub fn with_scope(mut self, scope: impl Into<String>) -> Self {
        self.scope = Some(scope.into());
        self
    }

    /// Named scope, if configured
    pub fn scope(&self) -> Option<&str> {
        self.scope.as_deref()
    }

    /// Produce one interceptor instance for `class`
    pub fn create(&self, class: &dyn InstrumentClass) -> Result<InterceptorHandle, PluginError> {
        let context = InterceptorContext {
            class_name: class.name(),
            arguments: &self.arguments,
            scope: self.scope.as_deref(),
        };
        (self.constructor)(&context)
    }
}
