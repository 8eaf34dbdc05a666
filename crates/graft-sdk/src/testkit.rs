//! Test doubles shared by SDK unit tests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::instrument::{
    FieldSnooper, InstrumentClass, InstrumentError, MetadataAccessor, MetadataInitStrategy,
    MethodDescriptor,
};
use crate::interceptor::{Interceptor, InterceptorFactory, InterceptorHandle};

/// In-memory class representation recording every capability call
pub(crate) struct FakeClass {
    name: String,
    methods: Vec<MethodDescriptor>,
    pub interceptors: Vec<(String, Vec<String>, InterceptorHandle)>,
    pub constructor_interceptors: Vec<(Vec<String>, InterceptorHandle)>,
    pub metadata: Vec<(MetadataAccessor, Option<MetadataInitStrategy>)>,
    pub snoopers: Vec<(FieldSnooper, String)>,
}

impl FakeClass {
    pub fn new(name: &str, methods: &[MethodDescriptor]) -> Self {
        Self {
            name: name.to_string(),
            methods: methods.to_vec(),
            interceptors: Vec::new(),
            constructor_interceptors: Vec::new(),
            metadata: Vec::new(),
            snoopers: Vec::new(),
        }
    }

    pub fn is_untouched(&self) -> bool {
        self.interceptors.is_empty()
            && self.constructor_interceptors.is_empty()
            && self.metadata.is_empty()
            && self.snoopers.is_empty()
    }
}

impl InstrumentClass for FakeClass {
    fn name(&self) -> &str {
        &self.name
    }

    fn declared_methods(&self) -> Vec<MethodDescriptor> {
        self.methods.clone()
    }

    fn add_interceptor(
        &mut self,
        method_name: &str,
        parameter_types: &[String],
        interceptor: InterceptorHandle,
    ) -> Result<(), InstrumentError> {
        if !self.methods.iter().any(|m| m.name == method_name) {
            return Err(InstrumentError::MethodNotFound {
                class_name: self.name.clone(),
                method_name: method_name.to_string(),
            });
        }
        self.interceptors
            .push((method_name.to_string(), parameter_types.to_vec(), interceptor));
        Ok(())
    }

    fn add_constructor_interceptor(
        &mut self,
        parameter_types: &[String],
        interceptor: InterceptorHandle,
    ) -> Result<(), InstrumentError> {
        self.constructor_interceptors
            .push((parameter_types.to_vec(), interceptor));
        Ok(())
    }

    fn add_metadata_accessor(
        &mut self,
        accessor: &MetadataAccessor,
        init: Option<&MetadataInitStrategy>,
    ) -> Result<(), InstrumentError> {
        self.metadata.push((accessor.clone(), init.cloned()));
        Ok(())
    }

    fn add_field_snooper(
        &mut self,
        snooper: &FieldSnooper,
        field_name: &str,
    ) -> Result<(), InstrumentError> {
        self.snoopers.push((snooper.clone(), field_name.to_string()));
        Ok(())
    }

    fn to_bytes(&self) -> Result<Vec<u8>, InstrumentError> {
        // Deterministic rendering of the recorded edits, so structural
        // equality can be checked byte-for-byte in tests.
        let mut out = self.name.clone();
        for (method, params, interceptor) in &self.interceptors {
            out.push_str(&format!("|i:{}({}):{}", method, params.join(","), interceptor.name()));
        }
        for (params, interceptor) in &self.constructor_interceptors {
            out.push_str(&format!("|c:({}):{}", params.join(","), interceptor.name()));
        }
        for (accessor, _) in &self.metadata {
            out.push_str(&format!("|m:{}", accessor.name()));
        }
        for (snooper, field) in &self.snoopers {
            out.push_str(&format!("|s:{}@{}", snooper.name(), field));
        }
        Ok(out.into_bytes())
    }
}

/// Interceptor carrying only a name
pub(crate) struct NamedInterceptor {
    name: String,
}

impl NamedInterceptor {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Interceptor for NamedInterceptor {
    fn name(&self) -> &str {
        &self.name
    }
}

/// Counts how many instances a factory has produced
#[derive(Clone)]
pub(crate) struct Counter(Arc<AtomicUsize>);

impl Counter {
    pub fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Factory whose constructor increments a counter on every invocation
pub(crate) fn counting_factory() -> (InterceptorFactory, Counter) {
    let counter = Counter(Arc::new(AtomicUsize::new(0)));
    let seen = Arc::clone(&counter.0);
    let factory = InterceptorFactory::new(move |_ctx| {
        let n = seen.fetch_add(1, Ordering::SeqCst);
        let handle: InterceptorHandle = Arc::new(NamedInterceptor::new(&format!("trace-{n}")));
        Ok(handle)
    });
    (factory, counter)
}
