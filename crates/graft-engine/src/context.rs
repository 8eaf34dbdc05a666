//! Ambient per-thread execution context
//!
//! Transformations may read the current loader context while they run. The
//! dispatcher installs an engine-scoped context around every transformation
//! attempt via [`ContextScope`], which restores the previous value on drop —
//! on every exit path, including unwinding out of a failed modifier.

use std::cell::RefCell;
use std::marker::PhantomData;

use graft_sdk::LoaderRef;

thread_local! {
    static CURRENT: RefCell<Option<LoaderContext>> = const { RefCell::new(None) };
}

/// The loader context visible to transformations on the current thread
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoaderContext {
    loader: LoaderRef,
}

impl LoaderContext {
    /// Context for the given loader
    pub fn new(loader: LoaderRef) -> Self {
        Self { loader }
    }

    /// Loader this context refers to
    pub fn loader(&self) -> &LoaderRef {
        &self.loader
    }
}

/// Current ambient context of the calling thread, if any
pub fn current_context() -> Option<LoaderContext> {
    CURRENT.with(|c| c.borrow().clone())
}

/// Guard that installs a loader context for the calling thread and restores
/// the previous value (even `None`) when dropped.
///
/// The guard is deliberately `!Send`: the restore must happen on the thread
/// that entered the scope.
#[must_use = "dropping the scope restores the previous context"]
pub struct ContextScope {
    previous: Option<LoaderContext>,
    _thread_bound: PhantomData<*const ()>,
}

impl ContextScope {
    /// Install `context` as the calling thread's ambient value
    pub fn enter(context: LoaderContext) -> Self {
        let previous = CURRENT.with(|c| c.borrow_mut().replace(context));
        Self {
            previous,
            _thread_bound: PhantomData,
        }
    }
}

impl Drop for ContextScope {
    fn drop(&mut self) {
        let previous = self.previous.take();
        CURRENT.with(|c| *c.borrow_mut() = previous);
    }
}
