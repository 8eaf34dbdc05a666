//! Built-in modifiers registered at startup
//!
//! Built-ins are ordinary class editors constructed through the SDK builder
//! and adapted like any plugin contribution. Which groups activate depends on
//! configuration toggles and on the resolved server profile: the HTTP entry
//! editor only applies inside a container.

use std::sync::Arc;

use graft_sdk::{
    ClassEditBuilder, ClassEditor, EditError, Instrumentor, Interceptor, InterceptorContext,
    InterceptorHandle, MetadataAccessor, MethodDescriptor, PluginError,
};
use tracing::debug;

use crate::config::AgentConfig;
use crate::registry::{ClassEditorAdaptor, ModifierRegistryBuilder, RegistryError};
use crate::server::ServerProfile;

/// Request entry point of a Catalina-style container
const HTTP_ENTRY_CLASS: &str = "org.apache.catalina.core.StandardHostValve";

struct TraceInterceptor {
    name: String,
}

impl Interceptor for TraceInterceptor {
    fn name(&self) -> &str {
        &self.name
    }
}

fn trace_constructor(ctx: &InterceptorContext<'_>) -> Result<InterceptorHandle, PluginError> {
    let scope = ctx.scope.unwrap_or("default");
    let handle: InterceptorHandle = Arc::new(TraceInterceptor {
        name: format!("{}:{}", scope, ctx.class_name),
    });
    Ok(handle)
}

/// Wildcard method-trace edit: intercept every public method of a profilable
/// class, one interceptor instance per call site.
fn method_trace_editor() -> Result<ClassEditor, EditError> {
    let mut builder = ClassEditBuilder::new("*");
    builder
        .interceptor()
        .intercept_filtered(|m: &MethodDescriptor| m.is_public)
        .singleton(false)
        .in_scope("method-trace")
        .with(trace_constructor);
    builder.build()
}

/// Container request entry edit: intercept the dispatch method and attach a
/// trace metadata accessor so nested interceptors can correlate one request.
fn http_entry_editor() -> Result<ClassEditor, EditError> {
    let mut builder = ClassEditBuilder::new(HTTP_ENTRY_CLASS);
    builder
        .interceptor()
        .intercept_method(
            "invoke",
            &[
                "org.apache.catalina.connector.Request",
                "org.apache.catalina.connector.Response",
            ],
        )
        .in_scope("http-entry")
        .with(trace_constructor);
    builder
        .metadata()
        .inject(MetadataAccessor::new("RequestTraceValue"));
    builder.build()
}

/// Register the built-in modifier groups selected by configuration and the
/// resolved server profile
pub(crate) fn register_builtins(
    builder: &mut ModifierRegistryBuilder,
    config: &AgentConfig,
    profile: &ServerProfile,
    instrumentor: &Arc<dyn Instrumentor>,
) -> Result<(), RegistryError> {
    if config.builtins.method_trace {
        let editor = method_trace_editor()?;
        builder.register_wildcard(Arc::new(ClassEditorAdaptor::new(
            Arc::clone(instrumentor),
            editor,
        )))?;
    } else {
        debug!("method trace built-in disabled");
    }

    if config.builtins.http_entry && profile.kind.is_container() {
        let editor = http_entry_editor()?;
        builder.register(Arc::new(ClassEditorAdaptor::new(
            Arc::clone(instrumentor),
            editor,
        )))?;
    } else {
        debug!("http entry built-in inactive");
    }

    Ok(())
}
