//! Activity type capabilities.
//!
//! The declaration generator never talks to a concrete registry. It resolves
//! activity types through [`ActivityTypeResolver`] and asks each resolved
//! [`ActivityType`] to describe itself, so a registry can be backed by
//! manifests, a remote service, or generated code without changing callers.

use std::{fmt, sync::Arc};

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;
use wfscript_types::ActivityDescriptor;

use crate::RegistryError;

/// A resolved activity type.
#[async_trait]
pub trait ActivityType: Send + Sync + fmt::Debug {
    /// Name used for the activity type's declaration block.
    fn type_name(&self) -> &str;

    /// Produces the activity type's input and output properties.
    ///
    /// Implementations may be costly (remote lookups, reflection over plugin
    /// metadata); callers describe each distinct type at most once per request.
    async fn describe(&self, cancellation: &CancellationToken) -> Result<ActivityDescriptor, RegistryError>;
}

/// Resolves activity type keys to activity types.
#[async_trait]
pub trait ActivityTypeResolver: Send + Sync {
    /// Resolves `name` to its activity type.
    ///
    /// # Errors
    /// - [`RegistryError::UnknownActivityType`] when nothing is registered under `name`.
    /// - [`RegistryError::Cancelled`] when `cancellation` fires first.
    async fn resolve_activity_type(&self, name: &str, cancellation: &CancellationToken) -> Result<Arc<dyn ActivityType>, RegistryError>;
}

/// Activity type backed by a static descriptor, typically loaded from a manifest.
#[derive(Debug, Clone)]
pub struct DescribedActivityType {
    descriptor: ActivityDescriptor,
}

impl DescribedActivityType {
    pub fn new(descriptor: ActivityDescriptor) -> Self {
        Self { descriptor }
    }

    pub fn descriptor(&self) -> &ActivityDescriptor {
        &self.descriptor
    }
}

#[async_trait]
impl ActivityType for DescribedActivityType {
    fn type_name(&self) -> &str {
        &self.descriptor.r#type
    }

    async fn describe(&self, cancellation: &CancellationToken) -> Result<ActivityDescriptor, RegistryError> {
        if cancellation.is_cancelled() {
            return Err(RegistryError::Cancelled);
        }
        Ok(self.descriptor.clone())
    }
}
