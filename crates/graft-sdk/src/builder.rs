//! Fluent construction of class edits
//!
//! A [`ClassEditBuilder`] collects a target class name, an optional
//! whole-editor condition, and an ordered list of sub-builders. Nothing is
//! materialized until [`build`](ClassEditBuilder::build), which validates
//! every sub-builder and returns an immutable [`ClassEditor`]. `build` is
//! idempotent: calling it twice yields two independent, equivalent editors.
//!
//! The interceptor sub-builder's three modes — named method, named
//! constructor, method filter — are mutually exclusive. Configuring more than
//! one (or none) is an [`EditError`] at build time rather than a silent
//! precedence rule.

use std::sync::Arc;

use serde_json::Value;

use crate::condition::{Condition, MethodFilter};
use crate::editor::ClassEditor;
use crate::error::PluginError;
use crate::injector::{
    ConditionalInjector, ConstructorInterceptorInjector, DedicatedInterceptorInjector,
    FieldSnooperInjector, FilteringInterceptorInjector, Injector, MetadataInjector,
};
use crate::instrument::{FieldSnooper, MetadataAccessor, MetadataInitStrategy};
use crate::interceptor::{InterceptorContext, InterceptorFactory, InterceptorHandle};

/// Errors detected while finalizing an edit specification.
///
/// These are configuration errors: they surface to the caller at `build()`
/// time, before any class loading is in flight.
#[derive(Debug, Clone, thiserror::Error)]
pub enum EditError {
    /// The target class name is empty
    #[error("Target class name is empty")]
    EmptyTargetName,

    /// More than one interception mode was configured on one sub-builder
    #[error("Interception modes {0:?} are mutually exclusive; configure exactly one")]
    AmbiguousInterception(Vec<&'static str>),

    /// No interception mode was configured
    #[error(
        "No interception mode configured; call intercept_method, intercept_constructor, \
         or intercept_filtered"
    )]
    MissingInterceptionMode,

    /// No interceptor constructor was configured
    #[error("No interceptor configured; call with()")]
    MissingInterceptor,

    /// `singleton(true)` was set on a non-filter interception mode
    #[error("singleton applies to filter-mode interception only")]
    SingletonWithoutFilter,

    /// A metadata sub-builder has no accessor
    #[error("No metadata accessor configured; call inject()")]
    MissingAccessor,

    /// A field snooper sub-builder is incomplete
    #[error("Field snooper is incomplete; call inject() and to_access()")]
    IncompleteFieldSnooper,
}

/// Builder for one target class's full edit
pub struct ClassEditBuilder {
    target_class_name: String,
    condition: Option<Arc<dyn Condition>>,
    injector_builders: Vec<InjectorBuilder>,
}

enum InjectorBuilder {
    Interceptor(InterceptorBuilder),
    Metadata(MetadataBuilder),
    FieldSnooper(FieldSnooperBuilder),
}

impl InjectorBuilder {
    fn build(&self) -> Result<Box<dyn Injector>, EditError> {
        match self {
            InjectorBuilder::Interceptor(b) => b.build(),
            InjectorBuilder::Metadata(b) => b.build(),
            InjectorBuilder::FieldSnooper(b) => b.build(),
        }
    }
}

impl ClassEditBuilder {
    /// Start an edit for `target_class_name`
    pub fn new(target_class_name: impl Into<String>) -> Self {
        Self {
            target_class_name: target_class_name.into(),
            condition: None,
            injector_builders: Vec::new(),
        }
    }

    /// Gate the whole editor on `condition`
    pub fn when(&mut self, condition: impl Condition + 'static) -> &mut Self {
        self.condition = Some(Arc::new(condition));
        self
    }

    /// Append an interceptor sub-builder
    pub fn interceptor(&mut self) -> &mut InterceptorBuilder {
        self.injector_builders
            .push(InjectorBuilder::Interceptor(InterceptorBuilder::default()));
        match self.injector_builders.last_mut() {
            Some(InjectorBuilder::Interceptor(b)) => b,
            _ => unreachable!("just pushed an interceptor builder"),
        }
    }

    /// Append a metadata sub-builder
    pub fn metadata(&mut self) -> &mut MetadataBuilder {
        self.injector_builders
            .push(InjectorBuilder::Metadata(MetadataBuilder::default()));
        match self.injector_builders.last_mut() {
            Some(InjectorBuilder::Metadata(b)) => b,
            _ => unreachable!("just pushed a metadata builder"),
        }
    }

    /// Append a field snooper sub-builder
    pub fn field_snooper(&mut self) -> &mut FieldSnooperBuilder {
        self.injector_builders
            .push(InjectorBuilder::FieldSnooper(FieldSnooperBuilder::default()));
        match self.injector_builders.last_mut() {
            Some(InjectorBuilder::FieldSnooper(b)) => b,
            _ => unreachable!("just pushed a field snooper builder"),
        }
    }

    /// Materialize the editor, validating every sub-builder.
    ///
    /// Side-effect free beyond producing the editor; may be called repeatedly.
    pub fn build(&self) -> Result<ClassEditor, EditError> {
        if self.target_class_name.is_empty() {
            return Err(EditError::EmptyTargetName);
        }

        let mut injectors = Vec::with_capacity(self.injector_builders.len());
        for builder in &self.injector_builders {
            injectors.push(builder.build()?);
        }

        Ok(ClassEditor::new(
            self.target_class_name.clone(),
            self.condition.clone(),
            injectors,
        ))
    }
}

/// Sub-builder for one interceptor injector
#[derive(Default)]
pub struct InterceptorBuilder {
    method: Option<(String, Vec<String>)>,
    constructor_params: Option<Vec<String>>,
    filter: Option<Arc<dyn MethodFilter>>,
    constructor: Option<
        Arc<dyn Fn(&InterceptorContext<'_>) -> Result<InterceptorHandle, PluginError> + Send + Sync>,
    >,
    arguments: Vec<Value>,
    scope: Option<String>,
    singleton: bool,
    condition: Option<Arc<dyn Condition>>,
}

impl InterceptorBuilder {
    /// Intercept the named method with the given parameter type names
    pub fn intercept_method(&mut self, method_name: &str, parameter_types: &[&str]) -> &mut Self {
        self.method = Some((
            method_name.to_string(),
            parameter_types.iter().map(|p| p.to_string()).collect(),
        ));
        self
    }

    /// Intercept the constructor with the given parameter type names
    pub fn intercept_constructor(&mut self, parameter_types: &[&str]) -> &mut Self {
        self.constructor_params =
            Some(parameter_types.iter().map(|p| p.to_string()).collect());
        self
    }

    /// Intercept every method accepted by `filter`
    pub fn intercept_filtered(&mut self, filter: impl MethodFilter + 'static) -> &mut Self {
        self.filter = Some(Arc::new(filter));
        self
    }

    /// Set the interceptor constructor
    pub fn with(
        &mut self,
        constructor: impl Fn(&InterceptorContext<'_>) -> Result<InterceptorHandle, PluginError>
            + Send
            + Sync
            + 'static,
    ) -> &mut Self {
        self.constructor = Some(Arc::new(constructor));
        self
    }

    /// Set constructor-style arguments passed to every created instance
    pub fn constructed_with(&mut self, arguments: Vec<Value>) -> &mut Self {
        self.arguments = arguments;
        self
    }

    /// Correlate instances under a named scope
    pub fn in_scope(&mut self, scope: impl Into<String>) -> &mut Self {
        self.scope = Some(scope.into());
        self
    }

    /// Share one instance across all filter-matched methods (filter mode only)
    pub fn singleton(&mut self, singleton: bool) -> &mut Self {
        self.singleton = singleton;
        self
    }

    /// Gate this injector on `condition`
    pub fn when(&mut self, condition: impl Condition + 'static) -> &mut Self {
        self.condition = Some(Arc::new(condition));
        self
    }

    fn build(&self) -> Result<Box<dyn Injector>, EditError> {
        let mut modes: Vec<&'static str> = Vec::new();
        if self.filter.is_some() {
            modes.push("filter");
        }
        if self.method.is_some() {
            modes.push("method");
        }
        if self.constructor_params.is_some() {
            modes.push("constructor");
        }
        if modes.len() > 1 {
            return Err(EditError::AmbiguousInterception(modes));
        }
        if self.singleton && self.filter.is_none() {
            return Err(EditError::SingletonWithoutFilter);
        }

        let constructor = self.constructor.clone().ok_or(EditError::MissingInterceptor)?;
        let factory =
            InterceptorFactory::from_parts(constructor, self.arguments.clone(), self.scope.clone());

        let injector: Box<dyn Injector> = if let Some(filter) = &self.filter {
            Box::new(FilteringInterceptorInjector::new(
                Arc::clone(filter),
                factory,
                self.singleton,
            ))
        } else if let Some((method_name, parameter_types)) = &self.method {
            Box::new(DedicatedInterceptorInjector::new(
                method_name.clone(),
                parameter_types.clone(),
                factory,
            ))
        } else if let Some(parameter_types) = &self.constructor_params {
            Box::new(ConstructorInterceptorInjector::new(
                parameter_types.clone(),
                factory,
            ))
        } else {
            return Err(EditError::MissingInterceptionMode);
        };

        Ok(match &self.condition {
            Some(condition) => Box::new(ConditionalInjector::new(Arc::clone(condition), injector)),
            None => injector,
        })
    }
}

/// Sub-builder for one metadata injector
#[derive(Default)]
pub struct MetadataBuilder {
    accessor: Option<MetadataAccessor>,
    init: Option<MetadataInitStrategy>,
}

impl MetadataBuilder {
    /// Attach `accessor` to the target class
    pub fn inject(&mut self, accessor: MetadataAccessor) -> &mut Self {
        self.accessor = Some(accessor);
        self
    }

    /// Initialize the accessor via the default constructor of `class_name`
    pub fn initialize_with_default_constructor_of(&mut self, class_name: &str) -> &mut Self {
        self.init = Some(MetadataInitStrategy::ByDefaultConstructor {
            class_name: class_name.to_string(),
        });
        self
    }

    fn build(&self) -> Result<Box<dyn Injector>, EditError> {
        let accessor = self.accessor.clone().ok_or(EditError::MissingAccessor)?;
        Ok(Box::new(MetadataInjector::new(accessor, self.init.clone())))
    }
}

/// Sub-builder for one field snooper injector
#[derive(Default)]
pub struct FieldSnooperBuilder {
    snooper: Option<FieldSnooper>,
    field_name: Option<String>,
}

impl FieldSnooperBuilder {
    /// Attach `snooper` to the target class
    pub fn inject(&mut self, snooper: FieldSnooper) -> &mut Self {
        self.snooper = Some(snooper);
        self
    }

    /// Name the field the snooper must be able to read and write
    pub fn to_access(&mut self, field_name: &str) -> &mut Self {
        self.field_name = Some(field_name.to_string());
        self
    }

    fn build(&self) -> Result<Box<dyn Injector>, EditError> {
        match (&self.snooper, &self.field_name) {
            (Some(snooper), Some(field_name)) => Ok(Box::new(FieldSnooperInjector::new(
                snooper.clone(),
                field_name.clone(),
            ))),
            _ => Err(EditError::IncompleteFieldSnooper),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::instrument::{InstrumentClass, MethodDescriptor};
    use crate::testkit::{FakeClass, NamedInterceptor};

    fn trace_constructor(
        ctx: &InterceptorContext<'_>,
    ) -> Result<InterceptorHandle, PluginError> {
        let handle: InterceptorHandle =
            Arc::new(NamedInterceptor::new(&format!("trace:{}", ctx.class_name)));
        Ok(handle)
    }

    fn widget() -> FakeClass {
        FakeClass::new(
            "com.example.Widget",
            &[
                MethodDescriptor::new("render", &["java.lang.String"]),
                MethodDescriptor::new("resize", &["int", "int"]),
            ],
        )
    }

    #[test]
    fn test_build_full_edit() {
        let mut builder = ClassEditBuilder::new("com.example.Widget");
        builder
            .interceptor()
            .intercept_method("render", &["java.lang.String"])
            .in_scope("widget")
            .with(trace_constructor);
        builder
            .metadata()
            .inject(MetadataAccessor::new("TraceValue"))
            .initialize_with_default_constructor_of("com.example.TraceValueImpl");
        builder
            .field_snooper()
            .inject(FieldSnooper::new("PoolSnooper"))
            .to_access("pool");

        let editor = builder.build().unwrap();
        assert_eq!(editor.target_class_name(), "com.example.Widget");
        assert_eq!(editor.injector_count(), 3);

        let mut class = widget();
        assert!(editor.edit(&mut class).unwrap());
        assert_eq!(class.interceptors.len(), 1);
        assert_eq!(class.metadata.len(), 1);
        assert_eq!(class.snoopers.len(), 1);
    }

    #[test]
    fn test_build_is_idempotent() {
        let mut builder = ClassEditBuilder::new("com.example.Widget");
        builder
            .interceptor()
            .intercept_method("render", &["java.lang.String"])
            .with(trace_constructor);

        let first = builder.build().unwrap();
        let second = builder.build().unwrap();

        let mut a = widget();
        let mut b = widget();
        first.edit(&mut a).unwrap();
        second.edit(&mut b).unwrap();
        assert_eq!(a.to_bytes().unwrap(), b.to_bytes().unwrap());
    }

    #[test]
    fn test_ambiguous_interception_mode_is_an_error() {
        let mut builder = ClassEditBuilder::new("com.example.Widget");
        builder
            .interceptor()
            .intercept_method("render", &["java.lang.String"])
            .intercept_filtered(|_: &MethodDescriptor| true)
            .with(trace_constructor);

        match builder.build() {
            Err(EditError::AmbiguousInterception(modes)) => {
                assert_eq!(modes, vec!["filter", "method"]);
            }
            other => panic!("expected ambiguity error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_mode_and_missing_interceptor() {
        let mut builder = ClassEditBuilder::new("com.example.Widget");
        builder.interceptor().with(trace_constructor);
        assert!(matches!(
            builder.build(),
            Err(EditError::MissingInterceptionMode)
        ));

        let mut builder = ClassEditBuilder::new("com.example.Widget");
        builder
            .interceptor()
            .intercept_method("render", &["java.lang.String"]);
        assert!(matches!(builder.build(), Err(EditError::MissingInterceptor)));
    }

    #[test]
    fn test_singleton_requires_filter_mode() {
        let mut builder = ClassEditBuilder::new("com.example.Widget");
        builder
            .interceptor()
            .intercept_method("render", &["java.lang.String"])
            .singleton(true)
            .with(trace_constructor);
        assert!(matches!(
            builder.build(),
            Err(EditError::SingletonWithoutFilter)
        ));

        let mut builder = ClassEditBuilder::new("com.example.Widget");
        builder
            .interceptor()
            .intercept_filtered(|_: &MethodDescriptor| true)
            .singleton(true)
            .with(trace_constructor);
        assert!(builder.build().is_ok());
    }

    #[test]
    fn test_metadata_without_accessor_rejected() {
        let mut builder = ClassEditBuilder::new("com.example.Widget");
        builder
            .metadata()
            .initialize_with_default_constructor_of("com.example.TraceValueImpl");
        assert!(matches!(builder.build(), Err(EditError::MissingAccessor)));
    }

    #[test]
    fn test_incomplete_field_snooper_rejected() {
        let mut builder = ClassEditBuilder::new("com.example.Widget");
        builder.field_snooper().inject(FieldSnooper::new("PoolSnooper"));
        assert!(matches!(
            builder.build(),
            Err(EditError::IncompleteFieldSnooper)
        ));

        let mut builder = ClassEditBuilder::new("com.example.Widget");
        builder.field_snooper().to_access("pool");
        assert!(matches!(
            builder.build(),
            Err(EditError::IncompleteFieldSnooper)
        ));
    }

    #[test]
    fn test_empty_target_name_rejected() {
        let builder = ClassEditBuilder::new("");
        assert!(matches!(builder.build(), Err(EditError::EmptyTargetName)));
    }

    #[test]
    fn test_editor_condition_skips_whole_edit() {
        let mut builder = ClassEditBuilder::new("com.example.Widget");
        builder.when(|_: &dyn InstrumentClass| false);
        builder
            .interceptor()
            .intercept_method("render", &["java.lang.String"])
            .with(trace_constructor);

        let editor = builder.build().unwrap();
        let mut class = widget();
        assert!(!editor.edit(&mut class).unwrap());
        assert!(class.is_untouched());
    }

    #[test]
    fn test_independent_injector_conditions() {
        // Two injectors with opposite conditions: only the true one applies,
        // regardless of declaration order.
        for flip in [false, true] {
            let mut builder = ClassEditBuilder::new("com.example.Widget");

            let first = builder
                .interceptor()
                .intercept_method("render", &["java.lang.String"]);
            first.with(trace_constructor);
            first.when(move |_: &dyn InstrumentClass| !flip);

            let second = builder.interceptor().intercept_constructor(&["int"]);
            second.with(trace_constructor);
            second.when(move |_: &dyn InstrumentClass| flip);

            let editor = builder.build().unwrap();
            let mut class = widget();
            editor.edit(&mut class).unwrap();

            if flip {
                assert!(class.interceptors.is_empty());
                assert_eq!(class.constructor_interceptors.len(), 1);
            } else {
                assert_eq!(class.interceptors.len(), 1);
                assert!(class.constructor_interceptors.is_empty());
            }
        }
    }
}
