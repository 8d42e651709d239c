use std::sync::Arc;

use axum::Json;
use axum::extract::State;

use crate::service::{DataService, Stats};

/// GET /api/stats
pub async fn stats(State(service): State<Arc<DataService>>) -> Json<Stats> {
    Json(service.stats())
}
