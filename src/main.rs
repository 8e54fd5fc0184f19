use std::sync::Arc;

use itinerary::config::{AppConfig, StorageBackend};
use itinerary::db::{init_pool, run_migrations};
use itinerary::error::AppError;
use itinerary::routes::create_router;
use itinerary::services::{
    memory::MemoryStore, sqlite::SqliteStore, storage::SharedRepository,
};
use itinerary::state::AppState;
use tokio::net::TcpListener;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_logging();

    let config = AppConfig::from_env()?;
    let repository = open_repository(&config.storage).await?;

    let state = AppState::with_shared(config.clone(), repository);
    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!("listening on {}", listener.local_addr()?);
    axum::serve(listener, app.into_make_service()).await?;

    Ok(())
}

async fn open_repository(backend: &StorageBackend) -> Result<SharedRepository, AppError> {
    match backend {
        StorageBackend::Memory => {
            warn!("using in-memory storage, trips are lost on restart");
            Ok(Arc::new(MemoryStore::new()))
        }
        StorageBackend::Sqlite { database_url } => {
            let db = init_pool(database_url).await?;
            if let Err(err) = run_migrations(&db).await {
                error!("migration failed: {err:?}");
                return Err(err);
            }
            info!(database_url = %database_url, "using sqlite storage");
            Ok(Arc::new(SqliteStore::new(db)))
        }
    }
}

fn init_logging() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    let fmt_layer = tracing_subscriber::fmt::layer().with_target(false);
    let filter_layer = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,itinerary=debug,tower_http=debug".into());

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
