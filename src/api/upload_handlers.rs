use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::StatusCode,
};

use crate::api::response::{success, ApiResult};
use crate::api::state::AppState;
use crate::logic::ServiceError;
use crate::store::{generate_object_key, DocumentStore, StoredObject};

/// Name of the multipart field carrying the file
pub const UPLOAD_FIELD: &str = "file";

/// Store the uploaded file under a fresh key.
///
/// Exactly one response is produced: the stored object's metadata or a failure.
pub async fn upload_file<S: DocumentStore + 'static>(
    State(ctx): State<AppState<S>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<StoredObject> {
    let mut multipart =
        multipart.map_err(|rejection| ServiceError::ValidationFailure(rejection.body_text()))?;
    let mut upload = None;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServiceError::ValidationFailure(e.body_text()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let original_name = field.file_name().map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ServiceError::ValidationFailure(e.body_text()))?;
        upload = Some((original_name, bytes));
        break;
    }

    let Some((original_name, bytes)) = upload else {
        return Err(ServiceError::ValidationFailure(format!(
            "Missing '{}' field in upload",
            UPLOAD_FIELD
        )));
    };

    let key = generate_object_key(original_name.as_deref());
    let stored = ctx.uploads.put(&key, &bytes).await?;
    log::info!("Stored upload {} ({} bytes)", stored.key, stored.size);

    Ok(success(StatusCode::CREATED, "File uploaded successfully", stored))
}
