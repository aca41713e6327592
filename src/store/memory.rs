use anyhow::Result;
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::model::{element_has_id, with_id, ArrayField, Document, Identifier, ID_FIELD};
use crate::store::traits::{DocumentFilter, DocumentStore, DocumentUpdate, FieldTypeMismatch};

/// Process-local document store.
///
/// Each collection is an identifier-ordered map guarded by a single lock, so
/// every update is atomic with respect to concurrent readers.
#[derive(Debug, Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, BTreeMap<Identifier, Document>>>,
    operations: AtomicU64,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of store calls served so far
    pub fn operation_count(&self) -> u64 {
        self.operations.load(Ordering::SeqCst)
    }

    fn record_operation(&self) {
        self.operations.fetch_add(1, Ordering::SeqCst);
    }
}

fn array_mut<'a>(
    document: &'a mut Document,
    field: &ArrayField,
) -> Result<Option<&'a mut Vec<Value>>> {
    match document.get_mut(field.as_str()) {
        None => Ok(None),
        Some(Value::Array(items)) => Ok(Some(items)),
        Some(_) => Err(FieldTypeMismatch {
            field: field.to_string(),
        }
        .into()),
    }
}

fn element_matches(document: &Document, filter: &DocumentFilter) -> bool {
    let Some(element) = &filter.element else {
        return true;
    };

    match document.get(element.field.as_str()) {
        Some(Value::Array(items)) => items
            .iter()
            .any(|item| element_has_id(item, &element.element_id)),
        _ => false,
    }
}

/// Apply an update to a document that already satisfied the filter
fn apply_update(
    document: &mut Document,
    filter: &DocumentFilter,
    update: &DocumentUpdate,
) -> Result<()> {
    match update {
        DocumentUpdate::Set(patch) => {
            for (key, value) in patch {
                if key != ID_FIELD {
                    document.insert(key.clone(), value.clone());
                }
            }
        }
        DocumentUpdate::Push { field, element } => match array_mut(document, field)? {
            Some(items) => items.push(element.clone()),
            None => {
                document.insert(field.to_string(), Value::Array(vec![element.clone()]));
            }
        },
        DocumentUpdate::SetMatchedElement { field, element } => {
            let Some(element_id) = filter.element.as_ref().map(|m| m.element_id) else {
                anyhow::bail!("Positional element update requires an element match in the filter");
            };
            if let Some(items) = array_mut(document, field)? {
                let slot = items
                    .iter_mut()
                    .find(|item| element_has_id(item, &element_id));
                if let Some(slot) = slot {
                    *slot = element.clone();
                }
            }
        }
        DocumentUpdate::Pull { field, element_id } => {
            if let Some(items) = array_mut(document, field)? {
                items.retain(|item| !element_has_id(item, element_id));
            }
        }
    }
    Ok(())
}

#[async_trait::async_trait]
impl DocumentStore for MemoryStore {
    async fn ping(&self) -> Result<()> {
        self.record_operation();
        Ok(())
    }

    async fn insert_one(&self, collection: &str, document: Document) -> Result<Identifier> {
        self.record_operation();
        let id = Identifier::generate();
        let mut collections = self.collections.write();
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(id, with_id(document, &id));
        Ok(id)
    }

    async fn find(&self, collection: &str) -> Result<Vec<Document>> {
        self.record_operation();
        let collections = self.collections.read();
        Ok(collections
            .get(collection)
            .map(|docs| docs.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn find_one(&self, collection: &str, id: &Identifier) -> Result<Option<Document>> {
        self.record_operation();
        let collections = self.collections.read();
        Ok(collections.get(collection).and_then(|docs| docs.get(id)).cloned())
    }

    async fn update_one(
        &self,
        collection: &str,
        filter: &DocumentFilter,
        update: &DocumentUpdate,
    ) -> Result<u64> {
        self.record_operation();
        let mut collections = self.collections.write();
        let Some(document) = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(&filter.id))
        else {
            return Ok(0);
        };

        if !element_matches(document, filter) {
            return Ok(0);
        }

        // Work on a copy so a rejected update leaves the stored document untouched
        let mut updated = document.clone();
        apply_update(&mut updated, filter, update)?;
        *document = updated;
        Ok(1)
    }

    async fn delete_one(&self, collection: &str, id: &Identifier) -> Result<u64> {
        self.record_operation();
        let mut collections = self.collections.write();
        let removed = collections
            .get_mut(collection)
            .and_then(|docs| docs.remove(id))
            .is_some();
        Ok(u64::from(removed))
    }
}
