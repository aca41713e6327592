use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Extension, Json,
};
use serde_json::Value;

use crate::api::response::{into_document, path_params, success, ApiResult, MatchedResult};
use crate::api::state::{AppContext, AppState};
use crate::logic::{NestedArrayService, ServiceError};
use crate::model::{Document, Identifier, ResourceKind};
use crate::store::DocumentStore;

fn nested_service<S: DocumentStore>(
    ctx: &AppContext<S>,
    kind: ResourceKind,
) -> Result<NestedArrayService<'_, S>, ServiceError> {
    let handle = ctx.registry.resolve(kind.path())?;
    NestedArrayService::new(&*ctx.store, handle, &ctx.allowed_arrays)
}

pub async fn get_array<S: DocumentStore + 'static>(
    State(ctx): State<AppState<S>>,
    Extension(kind): Extension<ResourceKind>,
    path: Result<Path<(String, String)>, PathRejection>,
) -> ApiResult<Vec<Value>> {
    let (id, array_name) = path_params(path)?;
    let parent_id = Identifier::parse(&id)?;
    let service = nested_service(&*ctx, kind)?;
    let field = service.array_field(&array_name)?;
    let items = service.get_array(&parent_id, &field).await?;

    Ok(success(
        StatusCode::OK,
        format!("{} sent successfully", field),
        items,
    ))
}

pub async fn append_element<S: DocumentStore + 'static>(
    State(ctx): State<AppState<S>>,
    Extension(kind): Extension<ResourceKind>,
    path: Result<Path<(String, String)>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Document> {
    let (id, array_name) = path_params(path)?;
    let parent_id = Identifier::parse(&id)?;
    let service = nested_service(&*ctx, kind)?;
    let field = service.array_field(&array_name)?;
    let element = into_document(payload)?;
    let stored = service.append(&parent_id, &field, element).await?;

    Ok(success(
        StatusCode::CREATED,
        format!("Added to {} successfully", field),
        stored,
    ))
}

pub async fn replace_element<S: DocumentStore + 'static>(
    State(ctx): State<AppState<S>>,
    Extension(kind): Extension<ResourceKind>,
    path: Result<Path<(String, String, String)>, PathRejection>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Document> {
    let (id, array_name, element_id) = path_params(path)?;
    let parent_id = Identifier::parse(&id)?;
    let element_id = Identifier::parse(&element_id)?;
    let service = nested_service(&*ctx, kind)?;
    let field = service.array_field(&array_name)?;
    let element = into_document(payload)?;
    let stored = service
        .replace_element(&parent_id, &field, &element_id, element)
        .await?;

    Ok(success(
        StatusCode::OK,
        format!("Updated {} successfully", field),
        stored,
    ))
}

pub async fn remove_element<S: DocumentStore + 'static>(
    State(ctx): State<AppState<S>>,
    Extension(kind): Extension<ResourceKind>,
    path: Result<Path<(String, String, String)>, PathRejection>,
) -> ApiResult<MatchedResult> {
    let (id, array_name, element_id) = path_params(path)?;
    let parent_id = Identifier::parse(&id)?;
    let element_id = Identifier::parse(&element_id)?;
    let service = nested_service(&*ctx, kind)?;
    let field = service.array_field(&array_name)?;
    let matched_count = service.remove_element(&parent_id, &field, &element_id).await?;

    Ok(success(
        StatusCode::OK,
        format!("Deleted from {} successfully", field),
        MatchedResult { matched_count },
    ))
}
