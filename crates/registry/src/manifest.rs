//! Activity manifests.
//!
//! A manifest is a YAML or JSON document listing activity descriptors and the
//! structural host types those activities expose:
//!
//! ```yaml
//! declaredTypes:
//!   - Acme.Http.HttpRequestModel
//! activities:
//!   - type: HttpEndpoint
//!     inputProperties:
//!       - { name: Path, type: System.String }
//!     outputProperties:
//!       - { name: Output, type: Acme.Http.HttpRequestModel }
//! ```

use std::{fs, path::Path};

use serde::{Deserialize, Serialize};
use tracing::debug;
use wfscript_types::ActivityDescriptor;

use crate::RegistryError;

/// Activity descriptors and declared structural types loaded from one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityManifest {
    /// Full names of structural host types known to the scripting surface.
    #[serde(default)]
    pub declared_types: Vec<String>,
    /// Activity descriptors in manifest order.
    #[serde(default)]
    pub activities: Vec<ActivityDescriptor>,
}

impl ActivityManifest {
    /// Parses a manifest from YAML or JSON text.
    pub fn from_str_content(content: &str) -> Result<Self, serde_yaml::Error> {
        serde_yaml::from_str(content)
    }
}

/// Loads a manifest from disk.
///
/// # Errors
/// Returns [`RegistryError::ManifestIo`] when the file cannot be read and
/// [`RegistryError::ManifestParse`] when its content is not a valid manifest.
pub fn load_manifest_from_path(path: &Path) -> Result<ActivityManifest, RegistryError> {
    let content = fs::read_to_string(path).map_err(|source| RegistryError::ManifestIo {
        path: path.to_path_buf(),
        source,
    })?;
    let manifest = ActivityManifest::from_str_content(&content).map_err(|source| RegistryError::ManifestParse {
        path: path.to_path_buf(),
        source,
    })?;
    debug!(
        path = %path.display(),
        activity_count = manifest.activities.len(),
        declared_type_count = manifest.declared_types.len(),
        "activity manifest loaded"
    );
    Ok(manifest)
}
