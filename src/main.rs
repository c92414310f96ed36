//! price-guess-bot server entry point.
//!
//! Starts the Axum HTTP server with the chat event endpoint, the REST API
//! and the WebSocket event stream.

use std::sync::Arc;

use anyhow::Context;
use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use price_guess_bot::adapters::{BusMessenger, CatalogProductSource};
use price_guess_bot::api;
use price_guess_bot::app_state::AppState;
use price_guess_bot::config::BotConfig;
use price_guess_bot::domain::{EventBus, RoundRegistry, StatsAggregator};
use price_guess_bot::service::GameService;
use price_guess_bot::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = BotConfig::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    tracing::info!(addr = %config.listen_addr, "starting price-guess-bot");

    let catalog = match &config.product_catalog_path {
        Some(path) => CatalogProductSource::from_json_file(path)
            .with_context(|| format!("loading product catalog {}", path.display()))?,
        None => CatalogProductSource::builtin(),
    };
    if catalog.is_empty() {
        tracing::warn!("product catalog is empty, rounds will fail to start");
    }
    tracing::info!(products = catalog.len(), "product catalog loaded");

    // Domain layer
    let registry = Arc::new(RoundRegistry::new());
    let stats = Arc::new(StatsAggregator::new());
    let event_bus = EventBus::new(config.event_bus_capacity);
    let messenger = Arc::new(BusMessenger::new(event_bus.clone()));

    // Service layer
    let game_service = Arc::new(GameService::new(
        registry,
        stats,
        Arc::new(catalog),
        messenger,
        event_bus.clone(),
        config.game.clone(),
    ));

    if config.verification_token.is_none() {
        tracing::warn!("SLACK_VERIFICATION_TOKEN not set, event callbacks are not verified");
    }
    let app_state = AppState {
        game_service,
        event_bus,
        verification_token: config.verification_token.as_deref().map(Arc::from),
    };

    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    let listener = tokio::net::TcpListener::bind(config.listen_addr)
        .await
        .with_context(|| format!("binding {}", config.listen_addr))?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
