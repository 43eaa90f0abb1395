//! Axum REST API handlers.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use serde::Serialize;

use crate::events::MarketEvent;
use crate::feed::EventFeed;

#[derive(Clone)]
pub struct ApiState {
    pub feed: Arc<EventFeed>,
}

// ─────────────────────────────────────────────────────────
// Response shapes
// ─────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct BinEventsResponse {
    pub bin: u32,
    pub count: usize,
    pub events: Vec<MarketEvent>,
}

#[derive(Serialize)]
pub struct AllEventsResponse {
    pub count: usize,
    pub events: Vec<MarketEvent>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    pub buffered: usize,
}

pub fn router(state: Arc<ApiState>) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/events", get(get_all_events))
        .route("/bins/:id/events", get(get_bin_events))
        .with_state(state)
}

// ─────────────────────────────────────────────────────────
// Handlers
// ─────────────────────────────────────────────────────────

/// `GET /health`
pub async fn health(State(state): State<Arc<ApiState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
        buffered: state.feed.len().await,
    })
}

/// `GET /bins/:id/events`
///
/// Returns buffered classification, tuning and sale events for one bin.
pub async fn get_bin_events(
    State(state): State<Arc<ApiState>>,
    Path(bin): Path<u32>,
) -> Json<BinEventsResponse> {
    let events = state.feed.for_bin(bin).await;
    Json(BinEventsResponse {
        bin,
        count: events.len(),
        events,
    })
}

/// `GET /events`
pub async fn get_all_events(State(state): State<Arc<ApiState>>) -> Json<AllEventsResponse> {
    let events = state.feed.all().await;
    Json(AllEventsResponse {
        count: events.len(),
        events,
    })
}
