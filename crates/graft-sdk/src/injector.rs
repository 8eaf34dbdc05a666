//! Injector variants — composable units of class transformation
//!
//! Each injector mutates an [`InstrumentClass`] through one capability:
//! intercepting a named method, intercepting a constructor, intercepting
//! every method selected by a filter, attaching a metadata accessor, or
//! attaching a field snooper. Injectors must not fail for "this class is not
//! for me" — wrapping in a [`ConditionalInjector`] is the only sanctioned way
//! to skip.

use std::sync::Arc;

use crate::condition::{Condition, MethodFilter};
use crate::error::PluginError;
use crate::instrument::{
    FieldSnooper, InstrumentClass, MetadataAccessor, MetadataInitStrategy,
};
use crate::interceptor::{InterceptorFactory, InterceptorHandle};

/// A unit of transformation behavior applied to a class representation
pub trait Injector: Send + Sync {
    /// Apply this injector to `class`
    fn inject(&self, class: &mut dyn InstrumentClass) -> Result<(), PluginError>;
}

/// Attaches one interceptor to one named method
pub struct DedicatedInterceptorInjector {
    method_name: String,
    parameter_types: Vec<String>,
    factory: InterceptorFactory,
}

impl DedicatedInterceptorInjector {
    /// Intercept `method_name(parameter_types)` with an instance from `factory`
    pub fn new(
        method_name: impl Into<String>,
        parameter_types: Vec<String>,
        factory: InterceptorFactory,
    ) -> Self {
        Self {
            method_name: method_name.into(),
            parameter_types,
            factory,
        }
    }
}

impl Injector for DedicatedInterceptorInjector {
    fn inject(&self, class: &mut dyn InstrumentClass) -> Result<(), PluginError> {
        let interceptor = self.factory.create(&*class)?;
        class.add_interceptor(&self.method_name, &self.parameter_types, interceptor)?;
        Ok(())
    }
}

/// Attaches one interceptor to the constructor with a given signature
pub struct ConstructorInterceptorInjector {
    parameter_types: Vec<String>,
    factory: InterceptorFactory,
}

impl ConstructorInterceptorInjector {
    /// Intercept the constructor taking `parameter_types`
    pub fn new(parameter_types: Vec<String>, factory: InterceptorFactory) -> Self {
        Self {
            parameter_types,
            factory,
        }
    }
}

impl Injector for ConstructorInterceptorInjector {
    fn inject(&self, class: &mut dyn InstrumentClass) -> Result<(), PluginError> {
        let interceptor = self.factory.create(&*class)?;
        class.add_constructor_interceptor(&self.parameter_types, interceptor)?;
        Ok(())
    }
}

/// Attaches interceptors to every method selected by a filter.
///
/// Unlike the dedicated variants, the filter is evaluated against the class's
/// full method inventory at transform time and may match zero, one, or many
/// methods. With `singleton` set, exactly one factory-produced instance is
/// shared by all matched methods of one application, so interceptor-local
/// state spans call sites; otherwise the factory runs once per matched method.
pub struct FilteringInterceptorInjector {
    filter: Arc<dyn MethodFilter>,
    factory: InterceptorFactory,
    singleton: bool,
}

impl FilteringInterceptorInjector {
    /// Intercept all methods accepted by `filter`
    pub fn new(filter: Arc<dyn MethodFilter>, factory: InterceptorFactory, singleton: bool) -> Self {
        Self {
            filter,
            factory,
            singleton,
        }
    }
}

impl Injector for FilteringInterceptorInjector {
    fn inject(&self, class: &mut dyn InstrumentClass) -> Result<(), PluginError> {
        let methods = class.declared_methods();
        let mut shared: Option<InterceptorHandle> = None;

        for method in methods.iter().filter(|m| self.filter.accept(m)) {
            let interceptor = if self.singleton {
                match &shared {
                    Some(existing) => Arc::clone(existing),
                    None => {
                        let created = self.factory.create(&*class)?;
                        shared = Some(Arc::clone(&created));
                        created
                    }
                }
            } else {
                self.factory.create(&*class)?
            };
            class.add_interceptor(&method.name, &method.parameter_types, interceptor)?;
        }
        Ok(())
    }
}

/// Attaches a metadata accessor capability to the class
pub struct MetadataInjector {
    accessor: MetadataAccessor,
    init: Option<MetadataInitStrategy>,
}

impl MetadataInjector {
    /// Attach `accessor`, optionally initialized via `init`
    pub fn new(accessor: MetadataAccessor, init: Option<MetadataInitStrategy>) -> Self {
        Self { accessor, init }
    }
}

impl Injector for MetadataInjector {
    fn inject(&self, class: &mut dyn InstrumentClass) -> Result<(), PluginError> {
        class.add_metadata_accessor(&self.accessor, self.init.as_ref())?;
        Ok(())
    }
}

/// Attaches a field snooper capability bound to a named field
pub struct FieldSnooperInjector {
    snooper: FieldSnooper,
    field_name: String,
}

impl FieldSnooperInjector {
    /// Give `snooper` access to `field_name`
    pub fn new(snooper: FieldSnooper, field_name: impl Into<String>) -> Self {
        Self {
            snooper,
            field_name: field_name.into(),
        }
    }
}

impl Injector for FieldSnooperInjector {
    fn inject(&self, class: &mut dyn InstrumentClass) -> Result<(), PluginError> {
        class.add_field_snooper(&self.snooper, &self.field_name)?;
        Ok(())
    }
}

/// Gates an injector on a condition; a `false` outcome is a no-op
pub struct ConditionalInjector {
    condition: Arc<dyn Condition>,
    inner: Box<dyn Injector>,
}

impl ConditionalInjector {
    /// Apply `inner` only when `condition` holds for the candidate class
    pub fn new(condition: Arc<dyn Condition>, inner: Box<dyn Injector>) -> Self {
        Self { condition, inner }
    }
}

impl Injector for ConditionalInjector {
    fn inject(&self, class: &mut dyn InstrumentClass) -> Result<(), PluginError> {
        if self.condition.test(&*class) {
            self.inner.inject(class)
        } else {
            Ok(())
        }
    }
}
