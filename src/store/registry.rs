use std::collections::HashMap;

use crate::model::ResourceKind;
use crate::store::traits::DocumentStore;

/// Handle to the collection backing one resource
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CollectionHandle {
    pub kind: ResourceKind,
    pub collection: &'static str,
}

#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    #[error("Collection for resource '{0}' is not registered")]
    Unavailable(String),
    #[error("Document store is unreachable: {0:#}")]
    Startup(anyhow::Error),
}

/// Maps resource names to their collection handles.
///
/// Built once during startup and only read afterwards; it is owned by the
/// application context rather than living in a global.
#[derive(Debug, Clone, Default)]
pub struct CollectionRegistry {
    collections: HashMap<&'static str, CollectionHandle>,
}

impl CollectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check the store is reachable, then register every known resource
    pub async fn initialize<S: DocumentStore>(store: &S) -> Result<Self, RegistryError> {
        store.ping().await.map_err(RegistryError::Startup)?;

        let mut registry = Self::new();
        for kind in ResourceKind::ALL {
            registry.register(kind);
        }
        log::info!("Registered {} collections", registry.len());
        Ok(registry)
    }

    pub fn register(&mut self, kind: ResourceKind) {
        self.collections.insert(
            kind.path(),
            CollectionHandle {
                kind,
                collection: kind.collection_name(),
            },
        );
    }

    pub fn resolve(&self, name: &str) -> Result<&CollectionHandle, RegistryError> {
        self.collections
            .get(name)
            .ok_or_else(|| RegistryError::Unavailable(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }
}
