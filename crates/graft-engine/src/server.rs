//! Server-type resolution
//!
//! Upstream configuration consults the resolved [`ServerProfile`] before
//! activating certain built-in modifiers (the HTTP entry editor only makes
//! sense inside a servlet container). Resolution order: a detect plugin may
//! claim the environment; otherwise the application home is probed for a
//! container marker; otherwise the configured default applies; otherwise the
//! process is treated as standalone.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Kind of process the agent is attached to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServerKind {
    /// Catalina-style servlet container
    Catalina,
    /// Plain standalone process
    Standalone,
    /// Standalone process under test harnesses
    TestStandalone,
}

impl ServerKind {
    /// True for kinds that accept HTTP requests through a container
    pub fn is_container(self) -> bool {
        matches!(self, ServerKind::Catalina)
    }
}

/// Resolved server profile consumed read-only by registry assembly
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerProfile {
    /// Detected or configured server kind
    pub kind: ServerKind,
    /// Server libraries the agent needs on its instrumentation path
    pub lib_paths: Vec<PathBuf>,
    /// True when the host has no acceptor and the agent must start the
    /// trace runtime itself
    pub manual_startup_required: bool,
}

impl ServerProfile {
    fn standalone(kind: ServerKind) -> Self {
        Self {
            kind,
            lib_paths: Vec::new(),
            manual_startup_required: true,
        }
    }

    fn catalina(home: &Path) -> Self {
        Self {
            kind: ServerKind::Catalina,
            lib_paths: vec![home.join("lib/servlet-api.jar"), home.join("lib/catalina.jar")],
            manual_startup_required: false,
        }
    }
}

/// A plugin that can claim the environment it was built for
pub trait ServerDetectPlugin: Send + Sync {
    /// Plugin name used in logs
    fn name(&self) -> &str;

    /// Return a profile when this plugin recognizes the environment
    fn detect(&self) -> Option<ServerProfile>;
}

/// Resolves the server profile once during agent startup
pub struct ServerTypeResolver {
    plugins: Vec<Box<dyn ServerDetectPlugin>>,
    default_kind: Option<ServerKind>,
    application_home: PathBuf,
}

impl ServerTypeResolver {
    /// Resolver using `CATALINA_HOME` (falling back to the current directory)
    /// as the application home
    pub fn new(plugins: Vec<Box<dyn ServerDetectPlugin>>, default_kind: Option<ServerKind>) -> Self {
        let application_home = std::env::var_os("CATALINA_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::current_dir().ok())
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            plugins,
            default_kind,
            application_home,
        }
    }

    /// Override the probed application home (used by tests)
    pub fn with_application_home(mut self, home: impl Into<PathBuf>) -> Self {
        self.application_home = home.into();
        self
    }

    /// Resolve the server profile
    pub fn resolve(&self) -> ServerProfile {
        for plugin in &self.plugins {
            debug!(plugin = plugin.name(), "trying server detect plugin");
            if let Some(profile) = plugin.detect() {
                info!(
                    plugin = plugin.name(),
                    kind = ?profile.kind,
                    "server type claimed by plugin"
                );
                return profile;
            }
        }

        info!(home = %self.application_home.display(), "resolved application home");

        if self.catalina_marker_present() {
            let profile = ServerProfile::catalina(&self.application_home);
            info!(kind = ?profile.kind, lib_paths = ?profile.lib_paths, "server type detected");
            return profile;
        }

        let kind = self.default_kind.unwrap_or(ServerKind::Standalone);
        info!(kind = ?kind, "server type defaulted");
        match kind {
            ServerKind::Catalina => ServerProfile::catalina(&self.application_home),
            other => ServerProfile::standalone(other),
        }
    }

    fn catalina_marker_present(&self) -> bool {
        let marker = self.application_home.join("lib/catalina.jar");
        let found = marker.exists();
        debug!(marker = %marker.display(), found, "container marker probe");
        found
    }
}
