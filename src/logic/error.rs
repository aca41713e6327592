use crate::model::{ArrayFieldError, MalformedIdentifier};
use crate::store::{FieldTypeMismatch, RegistryError};

/// Failures surfaced by the resource and nested-array services
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    MalformedIdentifier(#[from] MalformedIdentifier),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    ValidationFailure(String),
    #[error("Collection unavailable: {0}")]
    Unavailable(String),
    #[error("Storage failure: {0:#}")]
    StorageFailure(anyhow::Error),
}

impl From<anyhow::Error> for ServiceError {
    fn from(error: anyhow::Error) -> Self {
        match error.downcast_ref::<FieldTypeMismatch>() {
            Some(mismatch) => ServiceError::ValidationFailure(mismatch.to_string()),
            None => ServiceError::StorageFailure(error),
        }
    }
}

impl From<ArrayFieldError> for ServiceError {
    fn from(error: ArrayFieldError) -> Self {
        ServiceError::ValidationFailure(error.to_string())
    }
}

impl From<RegistryError> for ServiceError {
    fn from(error: RegistryError) -> Self {
        match error {
            RegistryError::Unavailable(name) => ServiceError::Unavailable(name),
            RegistryError::Startup(source) => ServiceError::StorageFailure(source),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_type_mismatch_becomes_validation_failure() {
        let error = anyhow::Error::new(FieldTypeMismatch {
            field: "name".to_string(),
        })
        .context("Failed to update document");
        match ServiceError::from(error) {
            ServiceError::ValidationFailure(message) => assert!(message.contains("'name'")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_other_store_errors_are_storage_failures() {
        let error = anyhow::anyhow!("connection reset");
        assert!(matches!(ServiceError::from(error), ServiceError::StorageFailure(_)));
    }
}
