use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Extension, Router,
};
use tower::ServiceBuilder;
use tower_http::cors::CorsLayer;

use crate::api::state::AppState;
use crate::api::{handlers, nested_handlers, upload_handlers};
use crate::model::ResourceKind;
use crate::store::DocumentStore;

/// Largest accepted upload body
pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

pub fn create_router<S: DocumentStore + 'static>() -> Router<AppState<S>> {
    let mut router = Router::new()
        .route("/", get(handlers::root).fallback(handlers::method_not_allowed))
        .route(
            "/health",
            get(handlers::health_check).fallback(handlers::method_not_allowed),
        )
        .route(
            "/upload",
            post(upload_handlers::upload_file::<S>)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
                .fallback(handlers::method_not_allowed),
        );

    for kind in ResourceKind::ALL {
        router = router.nest(&format!("/{}", kind.path()), resource_router::<S>(kind));
    }

    router
        .fallback(handlers::route_not_found)
        .layer(ServiceBuilder::new().layer(CorsLayer::permissive()))
}

/// `/{resource}` and `/{resource}/:id`, plus the nested array routes for
/// resources that have them. Unsupported methods get a 405 failure envelope.
fn resource_router<S: DocumentStore + 'static>(kind: ResourceKind) -> Router<AppState<S>> {
    let mut router = Router::new()
        .route(
            "/",
            get(handlers::list_documents::<S>)
                .post(handlers::create_document::<S>)
                .fallback(handlers::method_not_allowed),
        )
        .route(
            "/:id",
            get(handlers::get_document::<S>)
                .put(handlers::replace_document_fields::<S>)
                .delete(handlers::delete_document::<S>)
                .fallback(handlers::method_not_allowed),
        );

    if kind.supports_nested_arrays() {
        router = router
            .route(
                "/:id/:array_name",
                get(nested_handlers::get_array::<S>)
                    .post(nested_handlers::append_element::<S>)
                    .fallback(handlers::method_not_allowed),
            )
            .route(
                "/:id/:array_name/:element_id",
                put(nested_handlers::replace_element::<S>)
                    .delete(nested_handlers::remove_element::<S>)
                    .fallback(handlers::method_not_allowed),
            );
    }

    router.layer(Extension(kind))
}
