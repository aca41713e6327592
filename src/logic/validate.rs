use serde_json::Value;

use crate::logic::ServiceError;
use crate::model::{Document, ResourceKind, ID_FIELD};

/// Shape checks applied on the create and patch paths of each resource
pub struct PayloadValidator;

impl PayloadValidator {
    /// A new document must not choose its own identifier and must carry every required field
    pub fn validate_create(kind: ResourceKind, payload: &Document) -> Result<(), ServiceError> {
        Self::reject_identifier(payload)?;

        for field in kind.required_fields() {
            match payload.get(*field) {
                Some(value) if is_present(value) => {}
                _ => {
                    return Err(ServiceError::ValidationFailure(format!(
                        "{} requires a non-empty '{}' field",
                        kind.label(),
                        field
                    )))
                }
            }
        }
        Ok(())
    }

    /// A patch must change something, and may not blank out a required field
    pub fn validate_patch(kind: ResourceKind, patch: &Document) -> Result<(), ServiceError> {
        if patch.is_empty() {
            return Err(ServiceError::ValidationFailure(
                "Update must contain at least one field".to_string(),
            ));
        }
        Self::reject_identifier(patch)?;

        for field in kind.required_fields() {
            if let Some(value) = patch.get(*field) {
                if !is_present(value) {
                    return Err(ServiceError::ValidationFailure(format!(
                        "{} field '{}' cannot be empty",
                        kind.label(),
                        field
                    )));
                }
            }
        }
        Ok(())
    }

    fn reject_identifier(payload: &Document) -> Result<(), ServiceError> {
        if payload.contains_key(ID_FIELD) {
            return Err(ServiceError::ValidationFailure(
                "Field '_id' is assigned by the server and cannot be set".to_string(),
            ));
        }
        Ok(())
    }
}

fn is_present(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(s) => !s.trim().is_empty(),
        _ => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc(value: Value) -> Document {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn test_group_requires_name_and_category() {
        let ok = doc(json!({"name": "Batch A", "category": "science"}));
        assert!(PayloadValidator::validate_create(ResourceKind::Groups, &ok).is_ok());

        for bad in [
            json!({"name": "Batch A"}),
            json!({"name": "  ", "category": "science"}),
            json!({"name": null, "category": "science"}),
        ] {
            let err =
                PayloadValidator::validate_create(ResourceKind::Groups, &doc(bad)).unwrap_err();
            assert!(matches!(err, ServiceError::ValidationFailure(_)));
        }
    }

    #[test]
    fn test_schemaless_resources_accept_anything() {
        let empty = Document::new();
        assert!(PayloadValidator::validate_create(ResourceKind::Institutes, &empty).is_ok());
        let clip = doc(json!({"x": [1, 2]}));
        assert!(PayloadValidator::validate_create(ResourceKind::AudioClips, &clip).is_ok());
    }

    #[test]
    fn test_client_identifier_is_rejected() {
        let payload = doc(json!({"_id": "507f1f77bcf86cd799439011", "name": "Acme"}));
        assert!(PayloadValidator::validate_create(ResourceKind::Institutes, &payload).is_err());
        assert!(PayloadValidator::validate_patch(ResourceKind::Institutes, &payload).is_err());
    }

    #[test]
    fn test_patch_rules() {
        let empty = Document::new();
        assert!(PayloadValidator::validate_patch(ResourceKind::Institutes, &empty).is_err());
        let resize = doc(json!({"size": 4}));
        assert!(PayloadValidator::validate_patch(ResourceKind::Groups, &resize).is_ok());
        let blank_category = doc(json!({"category": ""}));
        assert!(PayloadValidator::validate_patch(ResourceKind::Groups, &blank_category).is_err());
    }
}
