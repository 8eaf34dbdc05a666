//! Instrumentation capability traits
//!
//! The bytecode rewriting engine is an external collaborator. This module
//! defines the surface the edit machinery is written against: an
//! [`Instrumentor`] turns raw class bytes into an editable [`InstrumentClass`],
//! and injectors mutate that representation through capability methods.
//! How the rewriting is actually encoded is out of scope for the SDK.

use std::fmt;
use std::hash::{Hash, Hasher};

use crate::interceptor::InterceptorHandle;

/// Errors raised by the opaque rewriting capability
#[derive(Debug, Clone, thiserror::Error)]
pub enum InstrumentError {
    /// The named method does not exist on the target class
    #[error("Method not found: {class_name}.{method_name}")]
    MethodNotFound {
        /// Class being instrumented
        class_name: String,
        /// Method that was requested
        method_name: String,
    },

    /// No constructor with the given signature exists on the target class
    #[error("Constructor not found: {class_name}({signature})")]
    ConstructorNotFound {
        /// Class being instrumented
        class_name: String,
        /// Comma-joined parameter type names
        signature: String,
    },

    /// The named field does not exist on the target class
    #[error("Field not found: {class_name}.{field_name}")]
    FieldNotFound {
        /// Class being instrumented
        class_name: String,
        /// Field that was requested
        field_name: String,
    },

    /// The class bytes could not be parsed into an editable representation
    #[error("Class format error: {0}")]
    ClassFormat(String),

    /// Any other rewriting failure
    #[error("Instrumentation failed: {0}")]
    InstrumentFailed(String),
}

/// Identity of a module loader.
///
/// Equality and hashing use the numeric id only; the description is carried
/// for diagnostics. Id `0` is reserved for the bootstrap loader.
#[derive(Debug, Clone)]
pub struct LoaderRef {
    id: u64,
    description: String,
}

impl LoaderRef {
    /// Create a loader reference with a diagnostic description
    pub fn new(id: u64, description: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
        }
    }

    /// The bootstrap loader (id 0)
    pub fn bootstrap() -> Self {
        Self::new(0, "bootstrap")
    }

    /// Numeric loader id
    pub fn id(&self) -> u64 {
        self.id
    }

    /// Human-readable description for logging
    pub fn description(&self) -> &str {
        &self.description
    }
}

impl PartialEq for LoaderRef {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for LoaderRef {}

impl Hash for LoaderRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for LoaderRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.description, self.id)
    }
}

/// Origin metadata carried with a load event (security/protection domain
/// equivalent). Opaque to the engine; forwarded to handlers as-is.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProtectionDomain {
    /// Where the class bytes came from, if known
    pub code_source: Option<String>,
}

/// One method of a class, as seen by method filters at transform time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodDescriptor {
    /// Method name
    pub name: String,
    /// Parameter type names, in declaration order
    pub parameter_types: Vec<String>,
    /// Whether the method is visible outside the class
    pub is_public: bool,
}

impl MethodDescriptor {
    /// Create a public method descriptor
    pub fn new(name: impl Into<String>, parameter_types: &[&str]) -> Self {
        Self {
            name: name.into(),
            parameter_types: parameter_types.iter().map(|p| p.to_string()).collect(),
            is_public: true,
        }
    }
}

/// A metadata accessor capability type attached to a class.
///
/// Identified by name; the rewriting engine decides how the capability is
/// realized on the target class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataAccessor {
    name: String,
}

impl MetadataAccessor {
    /// Create an accessor capability identified by `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Capability type name
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// How an attached metadata accessor gets its initial value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MetadataInitStrategy {
    /// Construct the initial value via the no-argument constructor of the
    /// named class
    ByDefaultConstructor {
        /// Class whose default constructor produces the initial value
        class_name: String,
    },
}

/// A snooper capability type that reads/writes a field from outside normal
/// access rules
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSnooper {
    name: String,
}

impl FieldSnooper {
    /// Create a snooper capability identified by `name`
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Capability type name
    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Editable in-memory representation of one class.
///
/// Injectors mutate the representation through these capability methods;
/// [`to_bytes`](InstrumentClass::to_bytes) serializes the rewritten class
/// back for the host's load path.
pub trait InstrumentClass: Send {
    /// Fully qualified name of the class being edited
    fn name(&self) -> &str;

    /// Full method inventory of the class, used by filtering injectors
    fn declared_methods(&self) -> Vec<MethodDescriptor>;

    /// Attach an interceptor to the named method
    fn add_interceptor(
        &mut self,
        method_name: &str,
        parameter_types: &[String],
        interceptor: InterceptorHandle,
    ) -> Result<(), InstrumentError>;

    /// Attach an interceptor to the constructor with the given signature
    fn add_constructor_interceptor(
        &mut self,
        parameter_types: &[String],
        interceptor: InterceptorHandle,
    ) -> Result<(), InstrumentError>;

    /// Attach a metadata accessor capability, optionally with an
    /// initialization strategy
    fn add_metadata_accessor(
        &mut self,
        accessor: &MetadataAccessor,
        init: Option<&MetadataInitStrategy>,
    ) -> Result<(), InstrumentError>;

    /// Attach a field snooper capability bound to the named field
    fn add_field_snooper(
        &mut self,
        snooper: &FieldSnooper,
        field_name: &str,
    ) -> Result<(), InstrumentError>;

    /// Serialize the (possibly rewritten) class back to bytes
    fn to_bytes(&self) -> Result<Vec<u8>, InstrumentError>;
}

/// The opaque rewriting engine: turns raw class bytes into an editable
/// representation
pub trait Instrumentor: Send + Sync {
    /// Parse `bytes` into an editable class representation
    fn instrument(
        &self,
        loader: &LoaderRef,
        class_name: &str,
        bytes: &[u8],
    ) -> Result<Box<dyn InstrumentClass>, InstrumentError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loader_ref_identity() {
        let a = LoaderRef::new(7, "app");
        let b = LoaderRef::new(7, "same loader, renamed");
        let c = LoaderRef::new(8, "app");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.to_string(), "app#7");
    }

    #[test]
    fn test_bootstrap_loader() {
        assert_eq!(LoaderRef::bootstrap().id(), 0);
    }

    #[test]
    fn test_method_descriptor() {
        let m = MethodDescriptor::new("execute", &["java.lang.String", "int"]);
        assert_eq!(m.name, "execute");
        assert_eq!(m.parameter_types.len(), 2);
        assert!(m.is_public);
    }
}
