use crate::logic::{PayloadValidator, ServiceError};
use crate::model::{with_id, Document, Identifier};
use crate::store::{CollectionHandle, DocumentFilter, DocumentStore, DocumentUpdate};

/// List / get / create / patch / delete over one resource collection
pub struct ResourceService<'a, S: DocumentStore> {
    store: &'a S,
    handle: &'a CollectionHandle,
}

impl<'a, S: DocumentStore> ResourceService<'a, S> {
    pub fn new(store: &'a S, handle: &'a CollectionHandle) -> Self {
        Self { store, handle }
    }

    pub async fn list(&self) -> Result<Vec<Document>, ServiceError> {
        Ok(self.store.find(self.handle.collection).await?)
    }

    pub async fn get_by_id(&self, id: &Identifier) -> Result<Document, ServiceError> {
        self.store
            .find_one(self.handle.collection, id)
            .await?
            .ok_or_else(|| self.not_found(id))
    }

    /// Store the payload as given; the store assigns the identifier
    pub async fn create(&self, payload: Document) -> Result<(Identifier, Document), ServiceError> {
        PayloadValidator::validate_create(self.handle.kind, &payload)?;

        let id = self
            .store
            .insert_one(self.handle.collection, payload.clone())
            .await?;
        log::info!("Created {} {}", self.handle.kind.label(), id);

        Ok((id, with_id(payload, &id)))
    }

    /// Shallow-merge `patch` into the stored document
    pub async fn replace_fields(
        &self,
        id: &Identifier,
        patch: Document,
    ) -> Result<u64, ServiceError> {
        PayloadValidator::validate_patch(self.handle.kind, &patch)?;

        let matched = self
            .store
            .update_one(
                self.handle.collection,
                &DocumentFilter::by_id(id),
                &DocumentUpdate::Set(patch),
            )
            .await?;

        if matched == 0 {
            return Err(self.not_found(id));
        }
        Ok(matched)
    }

    pub async fn delete_by_id(&self, id: &Identifier) -> Result<u64, ServiceError> {
        let deleted = self.store.delete_one(self.handle.collection, id).await?;
        if deleted == 0 {
            return Err(self.not_found(id));
        }
        log::info!("Deleted {} {}", self.handle.kind.label(), id);
        Ok(deleted)
    }

    fn not_found(&self, id: &Identifier) -> ServiceError {
        ServiceError::NotFound(format!("{} {} not found", self.handle.kind.label(), id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ResourceKind;
    use crate::store::{CollectionRegistry, MemoryStore};
    use serde_json::{json, Value};

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    fn registry() -> CollectionRegistry {
        let mut registry = CollectionRegistry::new();
        for kind in ResourceKind::ALL {
            registry.register(kind);
        }
        registry
    }

    #[tokio::test]
    async fn test_create_then_get_returns_superset() {
        let store = MemoryStore::new();
        let registry = registry();
        let service = ResourceService::new(&store, registry.resolve("institutes").unwrap());

        let payload = doc(json!({"name": "Acme", "city": "Pune", "founded": 1999}));
        let (id, stored) = service.create(payload.clone()).await.unwrap();
        assert_eq!(stored["_id"], json!(id.to_hex()));

        let fetched = service.get_by_id(&id).await.unwrap();
        for (key, value) in &payload {
            assert_eq!(&fetched[key], value);
        }
        assert_eq!(fetched["_id"], json!(id.to_hex()));
    }

    #[tokio::test]
    async fn test_list_empty_collection() {
        let store = MemoryStore::new();
        let registry = registry();
        let service = ResourceService::new(&store, registry.resolve("marketingData").unwrap());
        assert!(service.list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_replace_fields_leaves_other_fields() {
        let store = MemoryStore::new();
        let registry = registry();
        let service = ResourceService::new(&store, registry.resolve("audioclips").unwrap());

        let (id, _) = service
            .create(doc(json!({"title": "Intro", "duration": 30})))
            .await
            .unwrap();
        service
            .replace_fields(&id, doc(json!({"duration": 45})))
            .await
            .unwrap();

        let fetched = service.get_by_id(&id).await.unwrap();
        assert_eq!(fetched["duration"], json!(45));
        assert_eq!(fetched["title"], json!("Intro"));
    }

    #[tokio::test]
    async fn test_missing_documents_are_not_found() {
        let store = MemoryStore::new();
        let registry = registry();
        let service = ResourceService::new(&store, registry.resolve("groups").unwrap());
        let id = Identifier::generate();

        assert!(matches!(service.get_by_id(&id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(
            service.replace_fields(&id, doc(json!({"size": 1}))).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(matches!(service.delete_by_id(&id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let store = MemoryStore::new();
        let registry = registry();
        let service = ResourceService::new(&store, registry.resolve("formSubmissions").unwrap());

        let (id, _) = service.create(doc(json!({"form": "admission"}))).await.unwrap();
        assert_eq!(service.delete_by_id(&id).await.unwrap(), 1);
        assert!(matches!(service.get_by_id(&id).await, Err(ServiceError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_invalid_group_never_reaches_store() {
        let store = MemoryStore::new();
        let registry = registry();
        let service = ResourceService::new(&store, registry.resolve("groups").unwrap());

        let err = service.create(doc(json!({"name": "A"}))).await.unwrap_err();
        assert!(matches!(err, ServiceError::ValidationFailure(_)));
        assert_eq!(store.operation_count(), 0);
    }
}
