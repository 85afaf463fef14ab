//! Carrot Console Backend
//!
//! Local single-user service behind the classroom console: clip ledger, carrot
//! meter, class settings and weekly digest export/import over a SQLite-backed
//! key-value store.

mod api;
mod codec;
mod config;
mod db;
mod digest;
mod errors;
mod ledger;
mod models;
mod rewards;
mod settings;
mod store;

use std::sync::Arc;

use axum::{
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
    Router,
};
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use config::{Config, LogFormat};
use digest::DigestService;
use ledger::ClipLedger;
use rewards::RewardCounter;
use settings::SettingsStore;
use store::Store;

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<Store>,
    pub ledger: Arc<ClipLedger>,
    pub rewards: Arc<RewardCounter>,
    pub settings: Arc<SettingsStore>,
    pub digest: Arc<DigestService>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire every component to the one store instance.
    pub fn new(store: Store, config: Config) -> Self {
        let store = Arc::new(store);
        let ledger = Arc::new(ClipLedger::new(store.clone()));
        let rewards = Arc::new(RewardCounter::new(store.clone()));
        let settings = Arc::new(SettingsStore::new(store.clone()));
        let digest = Arc::new(DigestService::new(
            store.clone(),
            ledger.clone(),
            rewards.clone(),
            settings.clone(),
        ));

        Self {
            store,
            ledger,
            rewards,
            settings,
            digest,
            config: Arc::new(config),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    init_tracing(&config);

    tracing::info!("Starting Carrot Console Backend");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);

    // Initialize database
    let pool = db::init_database(&config.db_path).await?;
    let state = AppState::new(Store::new(pool), config.clone());

    let clip_count = state.ledger.list_all().await?.len();
    let meter = state.rewards.percentage().await?;
    tracing::info!("Ledger holds {} clips, meter at {}%", clip_count, meter);

    // Build router
    let app = create_router(state);

    // Start server
    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    tracing::info!("Server listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let registry = tracing_subscriber::registry().with(env_filter);

    match config.log_format {
        LogFormat::Json => registry
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let upload_limit = DefaultBodyLimit::max(state.config.max_upload_bytes);

    // API routes
    let api_routes = Router::new()
        // Clips
        .route("/clips", get(api::list_clips).post(api::create_clip))
        .route("/clips/{id}", get(api::get_clip).delete(api::delete_clip))
        .route("/clips/{id}/audio", get(api::get_clip_audio))
        // Rewards
        .route("/rewards", get(api::get_rewards))
        .route("/rewards/carrots", post(api::add_carrots))
        .route("/rewards/resets", post(api::add_reset))
        // Settings
        .route("/settings", get(api::get_settings).put(api::save_settings))
        // Digest
        .route("/digest", get(api::get_digest))
        .route("/digest/export/{format}", get(api::export_digest))
        .route("/digest/import", post(api::import_digest))
        // Maintenance
        .route("/data", delete(api::wipe_data))
        .layer(upload_limit);

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
