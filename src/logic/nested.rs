use serde_json::Value;

use crate::logic::ServiceError;
use crate::model::{with_id, ArrayField, Document, Identifier, ID_FIELD};
use crate::store::{CollectionHandle, DocumentFilter, DocumentStore, DocumentUpdate};

/// Mutations on an array of identified sub-documents embedded in a parent
/// document. Each call is one store update, so the parent match and the
/// element match are evaluated together.
pub struct NestedArrayService<'a, S: DocumentStore> {
    store: &'a S,
    handle: &'a CollectionHandle,
    allowed_arrays: &'a [String],
}

impl<'a, S: DocumentStore> NestedArrayService<'a, S> {
    pub fn new(
        store: &'a S,
        handle: &'a CollectionHandle,
        allowed_arrays: &'a [String],
    ) -> Result<Self, ServiceError> {
        if !handle.kind.supports_nested_arrays() {
            return Err(ServiceError::Unavailable(format!(
                "{} do not have nested arrays",
                handle.kind.plural_label()
            )));
        }
        Ok(Self {
            store,
            handle,
            allowed_arrays,
        })
    }

    /// Validate a caller-supplied array name before it is used in any query
    pub fn array_field(&self, raw: &str) -> Result<ArrayField, ServiceError> {
        Ok(ArrayField::parse(raw, self.allowed_arrays)?)
    }

    pub async fn get_array(
        &self,
        parent_id: &Identifier,
        field: &ArrayField,
    ) -> Result<Vec<Value>, ServiceError> {
        let parent = self
            .store
            .find_one(self.handle.collection, parent_id)
            .await?
            .ok_or_else(|| self.parent_not_found(parent_id))?;

        match parent.get(field.as_str()) {
            None => Ok(Vec::new()),
            Some(Value::Array(items)) => Ok(items.clone()),
            Some(_) => Err(ServiceError::ValidationFailure(format!(
                "Field '{}' exists but is not an array",
                field
            ))),
        }
    }

    /// Append `element` with a freshly assigned identifier; returns the stored element
    pub async fn append(
        &self,
        parent_id: &Identifier,
        field: &ArrayField,
        element: Document,
    ) -> Result<Document, ServiceError> {
        if element.contains_key(ID_FIELD) {
            return Err(ServiceError::ValidationFailure(
                "Field '_id' is assigned by the server and cannot be set".to_string(),
            ));
        }

        let element = with_id(element, &Identifier::generate());
        let matched = self
            .store
            .update_one(
                self.handle.collection,
                &DocumentFilter::by_id(parent_id),
                &DocumentUpdate::Push {
                    field: field.clone(),
                    element: Value::Object(element.clone()),
                },
            )
            .await?;

        if matched == 0 {
            return Err(self.parent_not_found(parent_id));
        }
        Ok(element)
    }

    /// Replace the first element carrying `element_id`; the element keeps its identifier
    pub async fn replace_element(
        &self,
        parent_id: &Identifier,
        field: &ArrayField,
        element_id: &Identifier,
        element: Document,
    ) -> Result<Document, ServiceError> {
        if let Some(supplied) = element.get(ID_FIELD) {
            if supplied.as_str() != Some(element_id.to_hex().as_str()) {
                return Err(ServiceError::ValidationFailure(
                    "Element '_id' cannot be changed".to_string(),
                ));
            }
        }

        let element = with_id(element, element_id);
        let matched = self
            .store
            .update_one(
                self.handle.collection,
                &DocumentFilter::with_element(parent_id, field, element_id),
                &DocumentUpdate::SetMatchedElement {
                    field: field.clone(),
                    element: Value::Object(element.clone()),
                },
            )
            .await?;

        if matched == 0 {
            return Err(self.element_not_found(parent_id, field, element_id));
        }
        Ok(element)
    }

    /// Remove every element carrying `element_id`
    pub async fn remove_element(
        &self,
        parent_id: &Identifier,
        field: &ArrayField,
        element_id: &Identifier,
    ) -> Result<u64, ServiceError> {
        let matched = self
            .store
            .update_one(
                self.handle.collection,
                &DocumentFilter::with_element(parent_id, field, element_id),
                &DocumentUpdate::Pull {
                    field: field.clone(),
                    element_id: *element_id,
                },
            )
            .await?;

        if matched == 0 {
            return Err(self.element_not_found(parent_id, field, element_id));
        }
        Ok(matched)
    }

    fn parent_not_found(&self, parent_id: &Identifier) -> ServiceError {
        ServiceError::NotFound(format!("{} {} not found", self.handle.kind.label(), parent_id))
    }

    fn element_not_found(
        &self,
        parent_id: &Identifier,
        field: &ArrayField,
        element_id: &Identifier,
    ) -> ServiceError {
        ServiceError::NotFound(format!(
            "No element {} in '{}' of {} {}",
            element_id,
            field,
            self.handle.kind.label(),
            parent_id
        ))
    }
}
