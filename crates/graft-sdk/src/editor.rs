//! The built, immutable class editor

use std::fmt;
use std::sync::Arc;

use crate::condition::Condition;
use crate::error::PluginError;
use crate::injector::Injector;
use crate::instrument::InstrumentClass;

/// Immutable edit for one target class: an ordered list of injectors,
/// optionally gated by a whole-editor condition.
///
/// Built once by [`ClassEditBuilder`](crate::builder::ClassEditBuilder) and
/// applied many times — once per matching load event, possibly concurrently
/// and under different module loaders.
pub struct ClassEditor {
    target_class_name: String,
    condition: Option<Arc<dyn Condition>>,
    injectors: Vec<Box<dyn Injector>>,
}

impl ClassEditor {
    pub(crate) fn new(
        target_class_name: String,
        condition: Option<Arc<dyn Condition>>,
        injectors: Vec<Box<dyn Injector>>,
    ) -> Self {
        Self {
            target_class_name,
            condition,
            injectors,
        }
    }

    /// Class name this editor is bound to
    pub fn target_class_name(&self) -> &str {
        &self.target_class_name
    }

    /// Number of injectors the editor applies
    pub fn injector_count(&self) -> usize {
        self.injectors.len()
    }

    /// Apply the edit to `class`.
    ///
    /// Returns `Ok(false)` without touching the class when the whole-editor
    /// condition rejects the candidate; `Ok(true)` after all injectors ran.
    pub fn edit(&self, class: &mut dyn InstrumentClass) -> Result<bool, PluginError> {
        if let Some(condition) = &self.condition {
            if !condition.test(&*class) {
                return Ok(false);
            }
        }
        for injector in &self.injectors {
            injector.inject(class)?;
        }
        Ok(true)
    }
}

impl fmt::Debug for ClassEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClassEditor")
            .field("target_class_name", &self.target_class_name)
            .field("conditional", &self.condition.is_some())
            .field("injectors", &self.injectors.len())
            .finish()
    }
}
