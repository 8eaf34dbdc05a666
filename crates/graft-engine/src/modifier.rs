//! Modifier trait and load event types
//!
//! A modifier is a registered transformation bound to a class name. The
//! dispatcher resolves at most one modifier per load event and invokes it
//! with the event's original bytes; `Ok(None)` means "load unchanged".

use graft_sdk::{InstrumentError, LoaderRef, PluginError, ProtectionDomain};

/// One module-load event as seen by the engine
#[derive(Debug)]
pub struct ClassLoadEvent<'a> {
    /// Loader performing the load
    pub loader: &'a LoaderRef,
    /// Fully qualified name of the class being loaded
    pub class_name: &'a str,
    /// True when an already-loaded class is being redefined
    pub redefined: bool,
    /// Security/protection domain metadata, if the host supplies it
    pub protection_domain: Option<&'a ProtectionDomain>,
    /// Original class bytes
    pub bytes: &'a [u8],
}

/// Errors raised by a modifier during one transformation attempt.
///
/// These never reach the host: the dispatcher logs them and degrades the
/// event to "no change".
#[derive(Debug, thiserror::Error)]
pub enum ModifyError {
    /// The rewriting capability failed
    #[error(transparent)]
    Instrument(#[from] InstrumentError),

    /// A class edit failed while being applied
    #[error(transparent)]
    Plugin(#[from] PluginError),

    /// Any other transformation failure
    #[error("Modify failed: {0}")]
    Other(String),
}

/// A registered transformation bound to a class name
pub trait Modifier: Send + Sync {
    /// Class name this modifier targets (`"*"` for the wildcard entry)
    fn target_class_name(&self) -> &str;

    /// Transform the event's class bytes; `Ok(None)` leaves the class
    /// unchanged
    fn modify(&self, event: &ClassLoadEvent<'_>) -> Result<Option<Vec<u8>>, ModifyError>;
}
