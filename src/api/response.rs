use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path,
    },
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::logic::ServiceError;
use crate::model::{Document, Identifier};

/// Body of every successful response
#[derive(Debug, Serialize)]
pub struct SuccessResponse<T> {
    pub success: String,
    pub result: T,
}

/// Body of every failed response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub failure: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedResult {
    pub inserted_id: Identifier,
    pub document: Document,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedResult {
    pub matched_count: u64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedResult {
    pub deleted_count: u64,
}

pub type ApiResult<T> = Result<(StatusCode, Json<SuccessResponse<T>>), ServiceError>;

pub fn success<T: Serialize>(
    status: StatusCode,
    message: impl Into<String>,
    result: T,
) -> (StatusCode, Json<SuccessResponse<T>>) {
    (
        status,
        Json(SuccessResponse {
            success: message.into(),
            result,
        }),
    )
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            failure: message.to_string(),
        }
    }
}

impl ServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::MalformedIdentifier(_) | ServiceError::ValidationFailure(_) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::NotFound(_) => StatusCode::NOT_FOUND,
            ServiceError::Unavailable(_) | ServiceError::StorageFailure(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = if status.is_server_error() {
            log::error!("Request failed: {:#}", self);
            format!("Error occurred: {}", self)
        } else {
            log::warn!("Request rejected: {}", self);
            self.to_string()
        };

        (status, Json(ErrorResponse::new(&message))).into_response()
    }
}

/// Accept only a JSON object as a request body
pub fn into_document(
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Document, ServiceError> {
    match payload {
        Ok(Json(Value::Object(document))) => Ok(document),
        Ok(Json(_)) => Err(ServiceError::ValidationFailure(
            "Request body must be a JSON object".to_string(),
        )),
        Err(rejection) => Err(ServiceError::ValidationFailure(rejection.body_text())),
    }
}

/// Path segments that fail to decode are a client error in the usual envelope
pub fn path_params<T>(path: Result<Path<T>, PathRejection>) -> Result<T, ServiceError> {
    match path {
        Ok(Path(params)) => Ok(params),
        Err(rejection) => Err(ServiceError::ValidationFailure(rejection.body_text())),
    }
}
