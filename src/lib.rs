pub mod api;
pub mod config;
pub mod logic;
pub mod model;
pub mod seed;
pub mod store;

pub use api::routes;
pub use api::{AppContext, AppState};

pub use logic::{NestedArrayService, ResourceService, ServiceError};

pub use model::*;

pub use store::{
    CollectionRegistry, DocumentStore, LocalObjectStorage, MemoryStore, ObjectStorage,
    PostgresStore,
};

use std::sync::Arc;
use tokio::net::TcpListener;

/// Build the HTTP application for an initialized context
pub fn build_app<S: DocumentStore + 'static>(ctx: AppContext<S>) -> axum::Router {
    api::routes::create_router::<S>().with_state(Arc::new(ctx))
}

/// Serve the application until the listener is closed
pub async fn serve_app(listener: TcpListener, app: axum::Router) -> anyhow::Result<()> {
    axum::serve(listener, app).await?;
    Ok(())
}
