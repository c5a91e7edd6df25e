//! Defines the router of the server.

mod extractor;
mod status;
mod websocket;

use crate::conn::{Hub, HubHandle};
use crate::Config;
use axum::{routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Shared state of the relay endpoints.
pub struct AppState {
    pub config: Config,
    pub hub: HubHandle,
}

/// Create router of the application.
///
/// Spawns the hub control loop; the returned router keeps the only
/// long-lived handle to it.
pub fn make_app(config: Config) -> Router {
    let (hub, handle) = Hub::new(config.event_queue_capacity);
    tokio::spawn(hub.run());

    let state = Arc::new(AppState {
        config,
        hub: handle,
    });

    Router::new()
        .route("/ws", get(websocket::ws_handler))
        .route("/api/status", get(status::status_handler))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}
