//! Handler for the hub status endpoint.

use super::AppState;
use crate::conn::HubStatus;
use axum::{extract::State, Json};
use std::sync::Arc;

pub async fn status_handler(State(state): State<Arc<AppState>>) -> Json<HubStatus> {
    Json(state.hub.status())
}
