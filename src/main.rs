use institute_api::config::{AppConfig, StoreBackend};
use institute_api::store::{DocumentStore, LocalObjectStorage, MemoryStore, PostgresStore};
use institute_api::{build_app, seed, serve_app, AppContext};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new()
        .filter_level(LevelFilter::Info)
        .filter_module("sqlx", LevelFilter::Warn)
        .parse_default_env()
        .init();

    log::info!("Institute API server starting");

    let config = AppConfig::load()?;
    log::info!(
        "Configuration loaded: server={}:{}, backend={:?}",
        config.server.host,
        config.server.port,
        config.database.backend
    );

    match config.database.backend {
        StoreBackend::Postgres => {
            log::info!("Connecting to PostgreSQL...");
            let store = PostgresStore::new(
                &config.database_url(),
                config.database.max_connections.unwrap_or(20),
            )
            .await?;
            store.migrate().await?;
            log::info!("Database ready");
            run_server(Arc::new(store), &config).await
        }
        StoreBackend::Memory => {
            log::warn!("Using the in-memory store; data is lost on shutdown");
            run_server(Arc::new(MemoryStore::new()), &config).await
        }
    }
}

async fn run_server<S: DocumentStore + 'static>(
    store: Arc<S>,
    config: &AppConfig,
) -> anyhow::Result<()> {
    let uploads = Arc::new(LocalObjectStorage::new(&config.storage.upload_dir));
    let ctx = AppContext::initialize(store, uploads, &config.nested).await?;

    if std::env::var("LOAD_SEED_DATA").unwrap_or_default() == "true" {
        log::info!("Loading seed data...");
        seed::load_seed_data(&ctx).await?;
        log::info!("Seed data loaded successfully");
    }

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    log::info!("Server is running at http://{}", bind_address);

    serve_app(listener, build_app(ctx)).await
}
