use crate::model::Identifier;
use serde_json::{Map, Value};
use std::fmt;

/// Schemaless record stored in a collection
pub type Document = Map<String, Value>;

/// Field holding a document's (or nested element's) identifier
pub const ID_FIELD: &str = "_id";

const MAX_ARRAY_FIELD_LEN: usize = 64;

/// Read the identifier carried by a document, if it has a well-formed one
pub fn document_id(document: &Document) -> Option<Identifier> {
    document
        .get(ID_FIELD)
        .and_then(Value::as_str)
        .and_then(|raw| Identifier::parse(raw).ok())
}

/// Stamp `id` onto the document, replacing any existing `_id`
pub fn with_id(mut document: Document, id: &Identifier) -> Document {
    document.insert(ID_FIELD.to_string(), Value::String(id.to_hex()));
    document
}

/// True if the value is an object whose `_id` equals `id`
pub fn element_has_id(element: &Value, id: &Identifier) -> bool {
    element
        .get(ID_FIELD)
        .and_then(Value::as_str)
        .map_or(false, |raw| raw == id.to_hex())
}

/// Name of a nested array field on a parent document.
///
/// Only plain field names are representable: no dotted paths, no operators,
/// and never the identifier field.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArrayField(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ArrayFieldError {
    #[error("Array field name '{0}' is not a valid field name")]
    Malformed(String),
    #[error("Array field '{0}' is not permitted")]
    NotAllowed(String),
}

impl ArrayField {
    /// Validate a caller-supplied array field name against the syntax rules and
    /// an optional allow-list (empty allow-list accepts any well-formed name).
    pub fn parse(raw: &str, allowed: &[String]) -> Result<Self, ArrayFieldError> {
        let mut chars = raw.chars();
        let well_formed = match chars.next() {
            Some(first) => {
                first.is_ascii_alphabetic()
                    && chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
                    && raw.len() <= MAX_ARRAY_FIELD_LEN
            }
            None => false,
        };

        if !well_formed || raw == ID_FIELD {
            return Err(ArrayFieldError::Malformed(raw.to_string()));
        }

        if !allowed.is_empty() && !allowed.iter().any(|name| name == raw) {
            return Err(ArrayFieldError::NotAllowed(raw.to_string()));
        }

        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArrayField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_array_field_accepts_plain_names() {
        assert_eq!(ArrayField::parse("courses", &[]).unwrap().as_str(), "courses");
        assert!(ArrayField::parse("student_batches2", &[]).is_ok());
    }

    #[test]
    fn test_array_field_rejects_paths_and_operators() {
        for raw in ["", "_id", "a.b", "$set", "1courses", "name with space", "courses[0]"] {
            assert_eq!(
                ArrayField::parse(raw, &[]),
                Err(ArrayFieldError::Malformed(raw.to_string())),
                "{raw} should be rejected"
            );
        }
        let too_long = "a".repeat(65);
        assert!(ArrayField::parse(&too_long, &[]).is_err());
    }

    #[test]
    fn test_array_field_allow_list() {
        let allowed = vec!["courses".to_string(), "faculty".to_string()];
        assert!(ArrayField::parse("faculty", &allowed).is_ok());
        assert_eq!(
            ArrayField::parse("name", &allowed),
            Err(ArrayFieldError::NotAllowed("name".to_string()))
        );
    }

    #[test]
    fn test_document_id_helpers() {
        let id = Identifier::generate();
        let doc = with_id(Document::new(), &id);
        assert_eq!(document_id(&doc), Some(id));
        assert!(element_has_id(&Value::Object(doc), &id));

        let other = json!({"_id": "not-an-id"});
        assert!(!element_has_id(&other, &id));
        assert_eq!(document_id(other.as_object().unwrap()), None);
        assert!(!element_has_id(&json!("scalar"), &id));
    }
}
