//! Specialist Chat - topic-primed chat sessions over a remote model
//!
//! Serves an HTTP API that keeps one primed conversation per topic, relays
//! each message to the inference endpoint, and persists the exchange.

mod api;
mod catalog;
mod config;
mod exchange;
mod preferences;
mod session;
mod store;
mod transport;

use api::{create_router, AppState};
use catalog::Catalog;
use config::Config;
use exchange::ExchangeController;
use preferences::PreferenceStore;
use session::SessionStore;
use std::net::SocketAddr;
use std::sync::Arc;
use store::{KeyValueStore, SqliteStore};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use transport::{HttpTransport, LoggingTransport};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "specialist_chat=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = Config::from_env();

    // Durable preferences
    tracing::info!(path = %config.prefs_path.display(), "Opening preferences database");
    let prefs_kv: Arc<dyn KeyValueStore> = Arc::new(SqliteStore::open(&config.prefs_path)?);
    let preference_store = PreferenceStore::new(prefs_kv);
    let preferences = preference_store.load()?;

    // Session-scoped conversations live only as long as the process
    let sessions = SessionStore::new(SqliteStore::open_in_memory()?);

    let catalog = match &config.catalog_path {
        Some(path) => {
            tracing::info!(path = %path.display(), "Loading catalog override");
            Catalog::from_file(path)?
        }
        None => Catalog::embedded()?,
    };
    tracing::info!(topics = catalog.topics().len(), "Catalog loaded");

    let transport = LoggingTransport::new(Arc::new(HttpTransport::new(&config.endpoint)?));
    tracing::info!(endpoint = %config.endpoint, "Inference endpoint configured");

    let controller = ExchangeController::new(sessions, transport);
    let state = AppState::new(catalog, controller, preference_store, preferences);

    // Create router
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Specialist chat server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
