//! Activity type registry for wfscript.
//!
//! This crate provides the capabilities the declaration generator resolves
//! activity types through, an in-memory registry implementing them, manifest
//! loading, the host type catalog, and the persisted registry config.

pub mod activity_type;
pub mod catalog;
pub mod config;
pub mod error;
pub mod manifest;
pub mod models;

pub use activity_type::{ActivityType, ActivityTypeResolver, DescribedActivityType};
pub use catalog::TypeCatalog;
pub use config::{REGISTRY_CONFIG_PATH_ENV, RegistryConfig, default_config_path};
pub use error::RegistryError;
pub use manifest::{ActivityManifest, load_manifest_from_path};
pub use models::ActivityTypeRegistry;
