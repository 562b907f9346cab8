mod config;
mod db;
mod error;
mod handlers;
mod middleware;
mod models;
mod services;
mod storage;

use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::db::Database;
use crate::services::{BroadcastEventBus, CustomEmojiService, DriveService, RoleService};
use crate::storage::{LocalStorage, StorageProvider};

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: Arc<Config>,
    pub drive: DriveService,
}

impl AppState {
    /// Wire the drive service to the database, the local blob store and the event bus
    pub fn new(
        db: Database,
        config: Arc<Config>,
        storage: Arc<dyn StorageProvider>,
        events: BroadcastEventBus,
    ) -> Self {
        let drive = DriveService::new(
            db.clone(),
            storage,
            Arc::new(CustomEmojiService::new(db.clone())),
            Arc::new(RoleService::new(db.clone())),
            Arc::new(events),
            config.drive.clone(),
        );

        Self { db, config, drive }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "driveguard=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting driveguard...");

    let config = Config::load()?;
    let config = Arc::new(config);
    tracing::info!("Configuration loaded");

    let db = Database::new(&config.database.path).await?;
    db.run_migrations().await?;
    tracing::info!("Database initialized");

    let storage: Arc<dyn StorageProvider> =
        Arc::new(LocalStorage::new(&config.storage.local_path));

    let events = BroadcastEventBus::default();
    tokio::spawn(services::events::log_file_deletions(events.subscribe()));

    let state = AppState::new(db, config.clone(), storage, events);

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let public_routes = Router::new().route("/health", get(handlers::health::health));

    let protected_routes = Router::new()
        .route("/drive/files/delete", post(handlers::drive::delete_file))
        .route(
            "/admin/federation/delete-all-files",
            post(handlers::admin::delete_all_files_from_host),
        )
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            middleware::auth::auth_middleware,
        ));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// State over an in-memory database and a temporary blob directory
#[cfg(test)]
pub(crate) async fn test_state() -> (AppState, tempfile::TempDir) {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::in_memory().await.unwrap();
    let mut config = Config::default();
    config.storage.local_path = dir.path().to_string_lossy().into_owned();
    let storage: Arc<dyn StorageProvider> = Arc::new(LocalStorage::new(dir.path()));
    let state = AppState::new(db, Arc::new(config), storage, BroadcastEventBus::default());
    (state, dir)
}
