use std::{fmt, sync::Arc};

use async_trait::async_trait;
use indexmap::IndexMap;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use wfscript_types::ActivityDescriptor;

use crate::{ActivityManifest, ActivityType, ActivityTypeResolver, DescribedActivityType, RegistryError};

type ActivityTypeMap = IndexMap<String, Arc<dyn ActivityType>>;

/// In-memory registry of activity types keyed by type name.
///
/// The registry is cheap to clone; clones share the same underlying map, so
/// one instance can serve many concurrent lookups while registrations are
/// still applied.
#[derive(Clone, Default)]
pub struct ActivityTypeRegistry {
    activity_types: Arc<RwLock<ActivityTypeMap>>,
}

impl fmt::Debug for ActivityTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let type_count = self.activity_types.try_read().map(|types| types.len()).ok();
        f.debug_struct("ActivityTypeRegistry").field("type_count", &type_count).finish()
    }
}

impl ActivityTypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from manifests, in order.
    ///
    /// When two manifests describe the same activity type, the later
    /// descriptor replaces the earlier one.
    pub fn from_manifests<'a>(manifests: impl IntoIterator<Item = &'a ActivityManifest>) -> Self {
        let mut activity_types = ActivityTypeMap::new();
        for manifest in manifests {
            for descriptor in &manifest.activities {
                insert_descriptor(&mut activity_types, descriptor.clone());
            }
        }
        Self {
            activity_types: Arc::new(RwLock::new(activity_types)),
        }
    }

    /// Registers an activity type, returning the one it replaced.
    pub async fn register(&self, activity_type: Arc<dyn ActivityType>) -> Option<Arc<dyn ActivityType>> {
        let name = activity_type.type_name().to_string();
        let mut activity_types = self.activity_types.write().await;
        let previous = activity_types.insert(name.clone(), activity_type);
        if previous.is_some() {
            warn!(activity_type = %name, "activity type registration replaced an existing type");
        }
        previous
    }

    /// Registers a descriptor-backed activity type.
    pub async fn register_descriptor(&self, descriptor: ActivityDescriptor) -> Option<Arc<dyn ActivityType>> {
        self.register(Arc::new(DescribedActivityType::new(descriptor))).await
    }

    /// Removes an activity type.
    pub async fn unregister(&self, name: &str) -> Option<Arc<dyn ActivityType>> {
        self.activity_types.write().await.shift_remove(name)
    }

    /// Retrieves an activity type by name.
    pub async fn get(&self, name: &str) -> Option<Arc<dyn ActivityType>> {
        self.activity_types.read().await.get(name).cloned()
    }

    /// Lists registered type names in registration order.
    pub async fn list_activity_types(&self) -> Vec<String> {
        self.activity_types.read().await.keys().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.activity_types.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.activity_types.read().await.is_empty()
    }
}

fn insert_descriptor(activity_types: &mut ActivityTypeMap, descriptor: ActivityDescriptor) {
    let name = descriptor.r#type.clone();
    if activity_types.contains_key(&name) {
        warn!(activity_type = %name, "activity manifest overrides an earlier descriptor");
    }
    activity_types.insert(name, Arc::new(DescribedActivityType::new(descriptor)));
}

#[async_trait]
impl ActivityTypeResolver for ActivityTypeRegistry {
    async fn resolve_activity_type(&self, name: &str, cancellation: &CancellationToken) -> Result<Arc<dyn ActivityType>, RegistryError> {
        let activity_types = tokio::select! {
            biased;
            _ = cancellation.cancelled() => return Err(RegistryError::Cancelled),
            guard = self.activity_types.read() => guard,
        };
        let activity_type = activity_types.get(name).cloned().ok_or_else(|| RegistryError::UnknownActivityType { name: name.to_string() })?;
        debug!(activity_type = %name, "activity type resolved");
        Ok(activity_type)
    }
}
