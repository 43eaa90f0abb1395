//! Widget market event watcher entry point.
//!
//! Starts a background task that polls Soroban `getEvents` RPC for widget
//! market contract events and keeps the most recent ones in memory.
//! Simultaneously exposes a small Axum REST API over that feed.

mod api;
mod config;
mod errors;
mod events;
mod feed;
mod rpc;
mod watcher;

use std::sync::Arc;

use reqwest::Client;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use config::Config;
use feed::EventFeed;
use watcher::WatcherState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialise structured logging (RUST_LOG controls verbosity).
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    // Load optional .env file (ignored if missing).
    let _ = dotenvy::dotenv();

    let config = Config::from_env().map_err(|e| anyhow::anyhow!("{e}"))?;
    let feed = Arc::new(EventFeed::new(config.feed_capacity));

    let client = Client::builder()
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    // ─── Background watcher ───────────────────────────────
    let watcher_state = Arc::new(WatcherState {
        feed: feed.clone(),
        config: config.clone(),
        client,
    });
    tokio::spawn(watcher::run(watcher_state));

    // ─── REST API ─────────────────────────────────────────
    let app = api::router(Arc::new(api::ApiState { feed }))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = format!("0.0.0.0:{}", config.api_port);
    info!("API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
