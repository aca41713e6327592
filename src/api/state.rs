use std::sync::Arc;

use crate::config::NestedConfig;
use crate::store::{CollectionRegistry, DocumentStore, ObjectStorage, RegistryError};

/// Everything a request handler needs, built once at startup
pub struct AppContext<S> {
    pub store: Arc<S>,
    pub registry: CollectionRegistry,
    pub uploads: Arc<dyn ObjectStorage>,
    pub allowed_arrays: Vec<String>,
}

pub type AppState<S> = Arc<AppContext<S>>;

impl<S: DocumentStore> AppContext<S> {
    /// Fails if the document store cannot be reached
    pub async fn initialize(
        store: Arc<S>,
        uploads: Arc<dyn ObjectStorage>,
        nested: &NestedConfig,
    ) -> Result<Self, RegistryError> {
        let registry = CollectionRegistry::initialize(&*store).await?;

        Ok(Self {
            store,
            registry,
            uploads,
            allowed_arrays: nested.allowed_arrays.clone(),
        })
    }
}
