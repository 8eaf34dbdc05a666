//! Gating predicates for class edits
//!
//! A [`Condition`] decides whether an injector (or a whole class editor)
//! applies to a candidate class. Conditions run on every matching dispatch,
//! so they must be side-effect free and cheap. A [`MethodFilter`] is the
//! per-method analogue used by filtering interceptor injectors.

use crate::instrument::{InstrumentClass, MethodDescriptor};

/// Boolean predicate over a candidate class.
///
/// Wrapping an injector in two conditions is the logical AND of both:
/// composition is associative and a `false` outcome leaves the class
/// representation untouched.
pub trait Condition: Send + Sync {
    /// Test whether the edit applies to `class`
    fn test(&self, class: &dyn InstrumentClass) -> bool;
}

impl<F> Condition for F
where
    F: Fn(&dyn InstrumentClass) -> bool + Send + Sync,
{
    fn test(&self, class: &dyn InstrumentClass) -> bool {
        self(class)
    }
}

/// Predicate selecting methods from a class's full method inventory
pub trait MethodFilter: Send + Sync {
    /// Test whether `method` should receive an interceptor
    fn accept(&self, method: &MethodDescriptor) -> bool;
}

impl<F> MethodFilter for F
where
    F: Fn(&MethodDescriptor) -> bool + Send + Sync,
{
    fn accept(&self, method: &MethodDescriptor) -> bool {
        self(method)
    }
}

/// Condition that holds when the candidate declares a method with the given
/// name and parameter types
#[derive(Debug, Clone)]
pub struct HasMethod {
    name: String,
    parameter_types: Vec<String>,
}

impl HasMethod {
    /// Match a method by name and exact parameter type names
    pub fn new(name: impl Into<String>, parameter_types: &[&str]) -> Self {
        Self {
            name: name.into(),
            parameter_types: parameter_types.iter().map(|p| p.to_string()).collect(),
        }
    }
}

impl Condition for HasMethod {
    fn test(&self, class: &dyn InstrumentClass) -> bool {
        class
            .declared_methods()
            .iter()
            .any(|m| m.name == self.name && m.parameter_types == self.parameter_types)
    }
}
