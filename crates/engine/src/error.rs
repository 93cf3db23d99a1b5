use thiserror::Error;
use wfscript_registry::RegistryError;

/// Errors that abort declaration generation.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// An activity type could not be resolved or described.
    #[error(transparent)]
    Registry(RegistryError),

    /// The caller cancelled generation.
    #[error("declaration generation was cancelled")]
    Cancelled,

    /// Two named activities share a name and duplicates are rejected.
    #[error("duplicate activity name '{name}'")]
    DuplicateActivityName { name: String },
}

impl GenerationError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, GenerationError::Cancelled)
    }
}

impl From<RegistryError> for GenerationError {
    fn from(error: RegistryError) -> Self {
        if error.is_cancelled() {
            GenerationError::Cancelled
        } else {
            GenerationError::Registry(error)
        }
    }
}
