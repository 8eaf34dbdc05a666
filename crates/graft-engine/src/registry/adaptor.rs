//! Adapts a plugin class editor into a registry modifier

use std::sync::Arc;

use graft_sdk::{ClassEditor, Instrumentor};

use crate::modifier::{ClassLoadEvent, Modifier, ModifyError};

/// Bridges a declarative [`ClassEditor`] to the [`Modifier`] interface:
/// instrument the event's bytes into an editable representation, run the
/// editor, and serialize back. An editor whose condition rejects the
/// candidate maps to "unchanged".
pub struct ClassEditorAdaptor {
    instrumentor: Arc<dyn Instrumentor>,
    editor: ClassEditor,
}

impl ClassEditorAdaptor {
    /// Wrap `editor`, using `instrumentor` to materialize class
    /// representations
    pub fn new(instrumentor: Arc<dyn Instrumentor>, editor: ClassEditor) -> Self {
        Self {
            instrumentor,
            editor,
        }
    }
}

impl Modifier for ClassEditorAdaptor {
    fn target_class_name(&self) -> &str {
        self.editor.target_class_name()
    }

    fn modify(&self, event: &ClassLoadEvent<'_>) -> Result<Option<Vec<u8>>, ModifyError> {
        let mut class =
            self.instrumentor
                .instrument(event.loader, event.class_name, event.bytes)?;
        if self.editor.edit(class.as_mut())? {
            Ok(Some(class.to_bytes()?))
        } else {
            Ok(None)
        }
    }
}
