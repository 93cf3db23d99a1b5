use std::{
    env, fs,
    io::Error,
    path::{Path, PathBuf},
};

use dirs_next::config_dir;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use wfscript_util::expand_tilde;

use crate::{ActivityManifest, load_manifest_from_path};

/// Environment variable overriding the registry config location.
pub const REGISTRY_CONFIG_PATH_ENV: &str = "WFSCRIPT_REGISTRY_CONFIG_PATH";

/// Persisted registry configuration.
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryConfig {
    /// Activity manifests loaded on startup, in order.
    #[serde(default)]
    pub manifests: Option<Vec<PathBuf>>,
    /// Additional structural host types known to the scripting surface.
    #[serde(default)]
    pub declared_types: Vec<String>,
}

impl RegistryConfig {
    /// Loads the config from [`default_config_path`].
    ///
    /// A missing or unreadable config yields the default config.
    pub fn load() -> Self {
        Self::load_from_path(&default_config_path())
    }

    pub fn load_from_path(path: &Path) -> Self {
        let Ok(content) = fs::read_to_string(path) else {
            debug!(path = %path.display(), "no registry config found; using defaults");
            return Self::default();
        };
        match serde_json::from_str(&content) {
            Ok(config) => config,
            Err(error) => {
                warn!(path = %path.display(), %error, "registry config is not valid JSON; using defaults");
                Self::default()
            }
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), Error> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    /// Loads every configured manifest, skipping the ones that fail to load.
    pub fn load_manifests(&self) -> Vec<ActivityManifest> {
        let Some(paths) = self.manifests.as_ref() else {
            return Vec::new();
        };

        paths
            .iter()
            .filter_map(|path| {
                let path = expand_tilde(&path.to_string_lossy());
                load_manifest_from_path(&path)
                    .inspect_err(|error| warn!(%error, "skipping configured activity manifest"))
                    .ok()
            })
            .collect()
    }
}

/// Get the default path for the registry configuration file.
pub fn default_config_path() -> PathBuf {
    if let Ok(path) = env::var(REGISTRY_CONFIG_PATH_ENV)
        && !path.trim().is_empty()
    {
        return expand_tilde(&path);
    }

    config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("wfscript")
        .join("registry.json")
}
