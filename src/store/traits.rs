use crate::model::{ArrayField, Document, Identifier};
use anyhow::Result;
use serde_json::Value;

/// Matches a single parent document, optionally requiring one of its nested
/// array elements to carry a given identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentFilter {
    pub id: Identifier,
    pub element: Option<ElementMatch>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ElementMatch {
    pub field: ArrayField,
    pub element_id: Identifier,
}

impl DocumentFilter {
    pub fn by_id(id: &Identifier) -> Self {
        Self {
            id: *id,
            element: None,
        }
    }

    pub fn with_element(id: &Identifier, field: &ArrayField, element_id: &Identifier) -> Self {
        Self {
            id: *id,
            element: Some(ElementMatch {
                field: field.clone(),
                element_id: *element_id,
            }),
        }
    }
}

/// A single-document mutation, applied atomically by the store
#[derive(Debug, Clone, PartialEq)]
pub enum DocumentUpdate {
    /// Shallow merge: each top-level field of the patch overwrites the stored one
    Set(Document),
    /// Append to an array field, creating it when absent
    Push { field: ArrayField, element: Value },
    /// Replace the first element matched by the filter's element match
    SetMatchedElement { field: ArrayField, element: Value },
    /// Remove every element whose `_id` equals `element_id`
    Pull {
        field: ArrayField,
        element_id: Identifier,
    },
}

/// Raised when an array operation targets a field holding a non-array value
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Field '{field}' exists but is not an array")]
pub struct FieldTypeMismatch {
    pub field: String,
}

#[async_trait::async_trait]
pub trait DocumentStore: Send + Sync {
    /// Verify the backing store is reachable
    async fn ping(&self) -> Result<()>;
    /// Insert a document, assigning it a fresh identifier (any `_id` in the document is replaced)
    async fn insert_one(&self, collection: &str, document: Document) -> Result<Identifier>;
    /// All documents of a collection, in no guaranteed order
    async fn find(&self, collection: &str) -> Result<Vec<Document>>;
    async fn find_one(&self, collection: &str, id: &Identifier) -> Result<Option<Document>>;
    /// Apply `update` to the document matched by `filter`; returns the matched count (0 or 1)
    async fn update_one(
        &self,
        collection: &str,
        filter: &DocumentFilter,
        update: &DocumentUpdate,
    ) -> Result<u64>;
    /// Returns the deleted count (0 or 1)
    async fn delete_one(&self, collection: &str, id: &Identifier) -> Result<u64>;
}
