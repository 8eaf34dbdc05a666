//! Skip and profilable filters
//!
//! Two independent predicates gate dispatch. The skip filter runs first and
//! keeps the engine away from classes it must never touch — above all its own
//! code, which would otherwise be re-instrumented recursively. The profilable
//! filter runs only when no exact modifier matched and decides whether the
//! wildcard fallback applies.

use graft_sdk::LoaderRef;

/// Prefixes that are never instrumented regardless of configuration
const DEFAULT_SKIP_PREFIXES: &[&str] = &["java.", "javax.", "sun.", "jdk.", "graft."];

/// Decides whether a load event is skipped before any lookup happens
pub trait ClassFileFilter: Send + Sync {
    /// True when the event must not be transformed
    fn skip(&self, loader: &LoaderRef, class_name: &str) -> bool;
}

/// Skips the agent's own loader, the agent namespace, and system classes
#[derive(Debug, Clone)]
pub struct DefaultClassFileFilter {
    agent_loader: LoaderRef,
    skip_prefixes: Vec<String>,
}

impl DefaultClassFileFilter {
    /// Filter for an agent running under `agent_loader`
    pub fn new(agent_loader: LoaderRef) -> Self {
        Self {
            agent_loader,
            skip_prefixes: DEFAULT_SKIP_PREFIXES.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// Add configured skip prefixes on top of the defaults
    pub fn with_extra_prefixes(mut self, prefixes: &[String]) -> Self {
        self.skip_prefixes.extend(prefixes.iter().cloned());
        self
    }
}

impl ClassFileFilter for DefaultClassFileFilter {
    fn skip(&self, loader: &LoaderRef, class_name: &str) -> bool {
        if loader == &self.agent_loader {
            return true;
        }
        self.skip_prefixes.iter().any(|p| class_name.starts_with(p))
    }
}

/// Fallback-eligibility test for the wildcard modifier
pub trait ClassNameFilter: Send + Sync {
    /// True when the class is eligible for the wildcard fallback
    fn accept(&self, class_name: &str) -> bool;
}

/// Accepts class names matching any configured include prefix.
///
/// An empty include list accepts nothing: the wildcard fallback is opt-in.
#[derive(Debug, Clone, Default)]
pub struct ProfilableClassFilter {
    includes: Vec<String>,
}

impl ProfilableClassFilter {
    /// Filter over the given include prefixes
    pub fn new(includes: Vec<String>) -> Self {
        Self { includes }
    }
}

impl ClassNameFilter for ProfilableClassFilter {
    fn accept(&self, class_name: &str) -> bool {
        self.includes.iter().any(|p| class_name.starts_with(p))
    }
}
