use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::{Method, StatusCode, Uri},
    Extension, Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::api::response::{
    into_document, path_params, success, ApiResult, CreatedResult, DeletedResult, ErrorResponse,
    MatchedResult,
};
use crate::api::state::AppState;
use crate::logic::ResourceService;
use crate::model::{Document, Identifier, ResourceKind};
use crate::store::DocumentStore;

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

pub async fn root() -> Json<Value> {
    Json(serde_json::json!({ "success": "Hello World" }))
}

/// Unknown paths answer in the failure envelope
pub async fn route_not_found(uri: Uri) -> (StatusCode, Json<ErrorResponse>) {
    log::warn!("No route for {}", uri.path());
    (
        StatusCode::NOT_FOUND,
        Json(ErrorResponse::new(&format!("No route for {}", uri.path()))),
    )
}

pub async fn method_not_allowed(method: Method, uri: Uri) -> (StatusCode, Json<ErrorResponse>) {
    let message = format!("Method {} is not allowed on {}", method, uri.path());
    log::warn!("{}", message);
    (StatusCode::METHOD_NOT_ALLOWED, Json(ErrorResponse::new(&message)))
}

pub async fn list_documents<S: DocumentStore + 'static>(
    State(ctx): State<AppState<S>>,
    Extension(kind): Extension<ResourceKind>,
) -> ApiResult<Vec<Document>> {
    let handle = ctx.registry.resolve(kind.path())?;
    let documents = ResourceService::new(&*ctx.store, handle).list().await?;

    Ok(success(
        StatusCode::OK,
        format!("{} sent successfully", kind.plural_label()),
        documents,
    ))
}

pub async fn get_document<S: DocumentStore + 'static>(
    State(ctx): State<AppState<S>>,
    Extension(kind): Extension<ResourceKind>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Document> {
    let id = Identifier::parse(&path_params(path)?)?;
    let handle = ctx.registry.resolve(kind.path())?;
    let document = ResourceService::new(&*ctx.store, handle).get_by_id(&id).await?;

    Ok(success(
        StatusCode::OK,
        format!("{} sent successfully", kind.label()),
        document,
    ))
}

pub async fn create_document<S: DocumentStore + 'static>(
    State(ctx): State<AppState<S>>,
    Extension(kind): Extension<ResourceKind>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<CreatedResult> {
    let payload = into_document(payload)?;
    let handle = ctx.registry.resolve(kind.path())?;
    let (inserted_id, document) = ResourceService::new(&*ctx.store, handle)
        .create(payload)
        .await?;

    Ok(success(
        StatusCode::CREATED,
        format!("{} added successfully", kind.label()),
        CreatedResult {
            inserted_id,
            document,
        },
    ))
}

/// PUT applies patch semantics: only the fields present in the body change
pub async fn replace_document_fields<S: DocumentStore + 'static>(
    State(ctx): State<AppState<S>>,
    Extension(kind): Extension<ResourceKind>,
    path: Result<Path<String>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<MatchedResult> {
    let id = Identifier::parse(&path_params(path)?)?;
    let patch = into_document(payload)?;
    let handle = ctx.registry.resolve(kind.path())?;
    let matched_count = ResourceService::new(&*ctx.store, handle)
        .replace_fields(&id, patch)
        .await?;

    Ok(success(
        StatusCode::OK,
        format!("{} updated successfully", kind.label()),
        MatchedResult { matched_count },
    ))
}

pub async fn delete_document<S: DocumentStore + 'static>(
    State(ctx): State<AppState<S>>,
    Extension(kind): Extension<ResourceKind>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<DeletedResult> {
    let id = Identifier::parse(&path_params(path)?)?;
    let handle = ctx.registry.resolve(kind.path())?;
    let deleted_count = ResourceService::new(&*ctx.store, handle)
        .delete_by_id(&id)
        .await?;

    Ok(success(
        StatusCode::OK,
        format!("{} deleted successfully", kind.label()),
        DeletedResult { deleted_count },
    ))
}
