//! Workflow documents loaded from disk.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use wfscript_types::WorkflowDefinition;

/// Workflows loaded from one document, keyed by name in document order.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct WorkflowBundle {
    pub workflows: IndexMap<String, WorkflowDefinition>,
}

impl WorkflowBundle {
    /// Returns the workflow keyed `name`, or the first workflow when no name is given.
    pub fn get_or_first(&self, name: Option<&str>) -> Option<&WorkflowDefinition> {
        match name {
            Some(name) => self.workflows.get(name),
            None => self.workflows.values().next(),
        }
    }

    pub fn len(&self) -> usize {
        self.workflows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.workflows.is_empty()
    }
}
