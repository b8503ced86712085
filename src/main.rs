use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

mod auth;
mod config;
mod database;
mod error;
mod handlers;
mod media;
mod middleware;
mod state;

use crate::database::DatabaseManager;
use crate::media::HttpMediaClient;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, JWT_SECRET, etc.
    let _ = dotenvy::dotenv();

    // Initialize configuration (this loads the config singleton)
    let config = crate::config::config();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    info!("Starting Gavel API in {:?} mode", config.environment);

    let pool = DatabaseManager::connect().await?;
    DatabaseManager::run_migrations(&pool).await?;

    let media = HttpMediaClient::from_config(&config.media)?;
    let state = AppState::new(pool, Arc::new(media));

    let app = app(state);

    // Allow tests or deployments to override port via env
    let port = std::env::var("GAVEL_API_PORT")
        .ok()
        .or_else(|| std::env::var("PORT").ok())
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(3000);

    let bind_addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;

    info!("Gavel API listening on http://{}", bind_addr);

    axum::serve(listener, app).await?;
    Ok(())
}

fn app(state: AppState) -> Router {
    let max_upload = crate::config::config().api.max_upload_size_bytes;

    Router::new()
        // Public
        .route("/", get(handlers::root::root))
        .route("/health", get(handlers::root::health))
        // Auth
        .route("/signup", post(handlers::auth::signup))
        .route("/login", post(handlers::auth::login))
        .route("/refresh", post(handlers::auth::refresh))
        // Auctions (reads public, mutations admin-gated in the handlers)
        .route(
            "/auctions",
            get(handlers::auctions::list).post(handlers::auctions::create),
        )
        .route(
            "/auction/:id",
            get(handlers::auctions::show)
                .delete(handlers::auctions::destroy)
                .patch(handlers::auctions::update),
        )
        // Items (reads public, mutations require authentication)
        .route(
            "/items",
            get(handlers::items::list).post(handlers::items::create),
        )
        .route(
            "/item/:id",
            get(handlers::items::show)
                .delete(handlers::items::destroy)
                .patch(handlers::items::update),
        )
        .route("/item/:id/images", get(handlers::items::images))
        // Global middleware
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        // Multipart item uploads need room beyond the axum default
        .layer(DefaultBodyLimit::max(max_upload))
        .with_state(state)
}
