use std::path::PathBuf;

use thiserror::Error;

/// Errors produced while resolving or loading activity types.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// No activity type is registered under the requested name.
    #[error("unknown activity type '{name}'")]
    UnknownActivityType { name: String },

    #[error("failed to read activity manifest {}: {source}", path.display())]
    ManifestIo {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse activity manifest {}: {source}", path.display())]
    ManifestParse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    /// The caller cancelled the operation.
    #[error("activity type resolution was cancelled")]
    Cancelled,
}

impl RegistryError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, RegistryError::Cancelled)
    }
}
