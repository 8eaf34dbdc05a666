//! Class-load dispatch engine
//!
//! Invoked synchronously by the host once per module-load event, possibly
//! from many threads at once. Per event: apply the skip filter, resolve a
//! modifier (exact name, then the profilable-gated wildcard), swap the
//! ambient loader context for the duration of the transformation, and isolate
//! every failure. Nothing raised inside one dispatch ever escapes to the
//! host's load path — the worst outcome is always "load the original bytes".

use std::any::Any;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use graft_sdk::{LoaderRef, ProtectionDomain};
use tracing::{debug, error};

use crate::context::{current_context, ContextScope, LoaderContext};
use crate::filter::{ClassFileFilter, ClassNameFilter};
use crate::modifier::{ClassLoadEvent, Modifier};
use crate::registry::ModifierRegistry;

/// The runtime edit dispatch engine
pub struct ClassLoadDispatcher {
    registry: ModifierRegistry,
    skip_filter: Box<dyn ClassFileFilter>,
    profilable: Box<dyn ClassNameFilter>,
    agent_context: LoaderContext,
}

impl ClassLoadDispatcher {
    /// Create a dispatcher over a frozen registry.
    ///
    /// The registry must be fully built before the dispatcher is installed
    /// to receive load events; the engine never mutates it afterwards.
    pub fn new(
        registry: ModifierRegistry,
        skip_filter: Box<dyn ClassFileFilter>,
        profilable: Box<dyn ClassNameFilter>,
        agent_loader: LoaderRef,
    ) -> Self {
        Self {
            registry,
            skip_filter,
            profilable,
            agent_context: LoaderContext::new(agent_loader),
        }
    }

    /// Handle one module-load event.
    ///
    /// Returns the rewritten class bytes, or `None` when the class loads
    /// unchanged — because it was filtered, no modifier matched, or the
    /// matched modifier failed.
    pub fn on_class_load(
        &self,
        loader: &LoaderRef,
        class_name: &str,
        redefined: bool,
        protection_domain: Option<&ProtectionDomain>,
        bytes: &[u8],
    ) -> Option<Vec<u8>> {
        // A filter failure must not decide in favor of transforming.
        let skip = catch_unwind(AssertUnwindSafe(|| {
            self.skip_filter.skip(loader, class_name)
        }))
        .unwrap_or(true);
        if skip {
            return None;
        }

        let modifier = match self.registry.find(class_name) {
            Some(modifier) => modifier,
            None => {
                let profilable = catch_unwind(AssertUnwindSafe(|| {
                    self.profilable.accept(class_name)
                }))
                .unwrap_or(false);
                if !profilable {
                    return None;
                }
                self.registry.wildcard()?
            }
        };

        debug!(
            loader = %loader,
            class_name,
            modifier = modifier.target_class_name(),
            "transforming"
        );

        let event = ClassLoadEvent {
            loader,
            class_name,
            redefined,
            protection_domain,
            bytes,
        };

        let context_before = current_context();
        let result = {
            let _scope = ContextScope::enter(self.agent_context.clone());
            catch_unwind(AssertUnwindSafe(|| modifier.modify(&event)))
            // _scope drops here, restoring the previous context even when
            // the modifier unwound.
        };

        match result {
            Ok(Ok(rewritten)) => rewritten,
            Ok(Err(e)) => {
                self.log_failure(modifier, loader, &context_before, &e.to_string());
                None
            }
            Err(payload) => {
                self.log_failure(modifier, loader, &context_before, &panic_message(&payload));
                None
            }
        }
    }

    fn log_failure(
        &self,
        modifier: &Arc<dyn Modifier>,
        loader: &LoaderRef,
        context_before: &Option<LoaderContext>,
        cause: &str,
    ) {
        error!(
            modifier = modifier.target_class_name(),
            loader = %loader,
            context_before = ?context_before,
            context_after = ?current_context(),
            agent_context = ?self.agent_context,
            cause,
            "modify failed; loading class unmodified"
        );
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
