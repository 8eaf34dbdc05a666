//! Shared test doubles for engine integration tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use graft_engine::context::{current_context, LoaderContext};
use graft_engine::filter::{ClassFileFilter, ClassNameFilter};
use graft_engine::modifier::{ClassLoadEvent, Modifier, ModifyError};
use graft_sdk::{
    FieldSnooper, InstrumentClass, InstrumentError, Instrumentor, InterceptorHandle, LoaderRef,
    MetadataAccessor, MetadataInitStrategy, MethodDescriptor,
};

pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init()
        .ok();
}

pub fn agent_loader() -> LoaderRef {
    LoaderRef::new(100, "agent")
}

pub fn app_loader() -> LoaderRef {
    LoaderRef::new(1, "app")
}

/// Skip filter that never skips (so tests reach lookup for any name)
pub struct PassFilter;

impl ClassFileFilter for PassFilter {
    fn skip(&self, _loader: &LoaderRef, _class_name: &str) -> bool {
        false
    }
}

/// Skip filter driven by a fixed prefix
pub struct PrefixSkipFilter(pub &'static str);

impl ClassFileFilter for PrefixSkipFilter {
    fn skip(&self, _loader: &LoaderRef, class_name: &str) -> bool {
        class_name.starts_with(self.0)
    }
}

/// Skip filter that panics on every call
pub struct PanickingFilter;

impl ClassFileFilter for PanickingFilter {
    fn skip(&self, _loader: &LoaderRef, _class_name: &str) -> bool {
        panic!("skip filter exploded")
    }
}

/// Profilable filter accepting a fixed prefix
pub struct PrefixProfilable(pub &'static str);

impl ClassNameFilter for PrefixProfilable {
    fn accept(&self, class_name: &str) -> bool {
        class_name.starts_with(self.0)
    }
}

/// Profilable filter that panics on every call
pub struct PanickingProfilable;

impl ClassNameFilter for PanickingProfilable {
    fn accept(&self, _class_name: &str) -> bool {
        panic!("profilable predicate exploded")
    }
}

/// What a spy modifier does when invoked
pub enum SpyBehavior {
    Unchanged,
    Rewrite(Vec<u8>),
    Fail(&'static str),
    Panic(&'static str),
}

/// Modifier that records invocations and the ambient context it observed
pub struct SpyModifier {
    target: &'static str,
    behavior: SpyBehavior,
    invocations: AtomicUsize,
    observed_contexts: Mutex<Vec<Option<LoaderContext>>>,
}

impl SpyModifier {
    pub fn new(target: &'static str, behavior: SpyBehavior) -> Arc<Self> {
        Arc::new(Self {
            target,
            behavior,
            invocations: AtomicUsize::new(0),
            observed_contexts: Mutex::new(Vec::new()),
        })
    }

    pub fn invocations(&self) -> usize {
        self.invocations.load(Ordering::SeqCst)
    }

    pub fn observed_contexts(&self) -> Vec<Option<LoaderContext>> {
        self.observed_contexts.lock().unwrap().clone()
    }
}

impl Modifier for SpyModifier {
    fn target_class_name(&self) -> &str {
        self.target
    }

    fn modify(&self, _event: &ClassLoadEvent<'_>) -> Result<Option<Vec<u8>>, ModifyError> {
        self.invocations.fetch_add(1, Ordering::SeqCst);
        self.observed_contexts.lock().unwrap().push(current_context());
        match &self.behavior {
            SpyBehavior::Unchanged => Ok(None),
            SpyBehavior::Rewrite(bytes) => Ok(Some(bytes.clone())),
            SpyBehavior::Fail(msg) => Err(ModifyError::Other(msg.to_string())),
            SpyBehavior::Panic(msg) => panic!("{}", msg),
        }
    }
}

/// In-memory editable class handed out by [`FakeInstrumentor`]
pub struct FakeLoadedClass {
    name: String,
    methods: Vec<MethodDescriptor>,
    edits: Vec<String>,
}

impl InstrumentClass for FakeLoadedClass {
    fn name(&self) -> &str {
        &self.name
    }

    fn declared_methods(&self) -> Vec<MethodDescriptor> {
        self.methods.clone()
    }

    fn add_interceptor(
        &mut self,
        method_name: &str,
        _parameter_types: &[String],
        interceptor: InterceptorHandle,
    ) -> Result<(), InstrumentError> {
        self.edits
            .push(format!("intercept:{}:{}", method_name, interceptor.name()));
        Ok(())
    }

    fn add_constructor_interceptor(
        &mut self,
        parameter_types: &[String],
        interceptor: InterceptorHandle,
    ) -> Result<(), InstrumentError> {
        self.edits.push(format!(
            "intercept-ctor:({}):{}",
            parameter_types.join(","),
            interceptor.name()
        ));
        Ok(())
    }

    fn add_metadata_accessor(
        &mut self,
        accessor: &MetadataAccessor,
        _init: Option<&MetadataInitStrategy>,
    ) -> Result<(), InstrumentError> {
        self.edits.push(format!("metadata:{}", accessor.name()));
        Ok(())
    }

    fn add_field_snooper(
        &mut self,
        snooper: &FieldSnooper,
        field_name: &str,
    ) -> Result<(), InstrumentError> {
        self.edits
            .push(format!("snoop:{}@{}", snooper.name(), field_name));
        Ok(())
    }

    fn to_bytes(&self) -> Result<Vec<u8>, InstrumentError> {
        Ok(format!("instrumented[{}]{}", self.name, self.edits.join("|")).into_bytes())
    }
}

/// Instrumentor producing [`FakeLoadedClass`] values with a fixed method
/// inventory per class
pub struct FakeInstrumentor {
    methods: Vec<MethodDescriptor>,
}

impl FakeInstrumentor {
    pub fn new() -> Arc<dyn Instrumentor> {
        Arc::new(Self {
            methods: vec![
                MethodDescriptor::new("invoke", &[
                    "org.apache.catalina.connector.Request",
                    "org.apache.catalina.connector.Response",
                ]),
                MethodDescriptor::new("execute", &["java.lang.String"]),
            ],
        })
    }
}

impl Instrumentor for FakeInstrumentor {
    fn instrument(
        &self,
        _loader: &LoaderRef,
        class_name: &str,
        _bytes: &[u8],
    ) -> Result<Box<dyn InstrumentClass>, InstrumentError> {
        Ok(Box::new(FakeLoadedClass {
            name: class_name.to_string(),
            methods: self.methods.clone(),
            edits: Vec::new(),
        }))
    }
}
