//! Visitor Intake Server
//!
//! REST endpoint accepting overnight visitor registrations.

use axum::{
    extract::DefaultBodyLimit,
    routing::{any, get},
    Router,
};
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use visitor_intake_server::{
    api,
    config::AppConfig,
    repository::{RecordStore, Repository},
    services::Services,
    storage::{ObjectStore, SupabaseStorage},
    AppState,
};

/// Room for the text fields on top of two maximum-size files
const FORM_OVERHEAD_BYTES: usize = 1024 * 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("visitor_intake_server={},tower_http=debug", config.logging.level).into()
    });

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting Visitor Intake Server v{}", env!("CARGO_PKG_VERSION"));

    // Create database connection pool
    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .min_connections(config.database.min_connections)
        .connect(&config.database.url)
        .await?;

    tracing::info!("Connected to database");

    sqlx::migrate!("./migrations").run(&pool).await?;

    tracing::info!("Database migrations completed");

    let storage = SupabaseStorage::from_config(&config.storage)?;
    match &storage {
        Some(_) => tracing::info!("Object storage bucket: {}", config.storage.bucket),
        None => tracing::warn!(
            "SUPABASE_URL or SUPABASE_SERVICE_ROLE_KEY not set, submissions will be refused"
        ),
    }

    let records: Arc<dyn RecordStore> = Arc::new(Repository::new(pool));
    let storage = storage.map(|s| Arc::new(s) as Arc<dyn ObjectStore>);
    let services = Services::new(records, storage, config.intake.clone());

    let addr = SocketAddr::new(config.server.host.parse()?, config.server.port);
    let body_limit = config.intake.max_file_size_bytes() * 2 + FORM_OVERHEAD_BYTES;

    let state = AppState {
        services: Arc::new(services),
    };

    let app = create_router(state, body_limit);

    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

/// Create the application router with all routes
fn create_router(state: AppState, body_limit: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        .route("/health", get(api::health::health_check))
        .route("/ready", get(api::health::readiness_check))
        .route("/visits/submit", any(api::visits::submit_visit))
        .with_state(state.clone());

    // Unversioned path used by existing intake forms
    let legacy = Router::new()
        .route("/api/submit", any(api::visits::submit_visit))
        .with_state(state);

    Router::new()
        .nest("/api/v1", api_v1)
        .merge(legacy)
        .merge(api::openapi::create_openapi_router())
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
