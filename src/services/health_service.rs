use tracing::debug;

use crate::{dto::health::HealthResponse, state::SharedState};

/// Report liveness along with the in-memory match count and platform request counters.
pub fn health_status(state: &SharedState) -> HealthResponse {
    let tracked_matches = state.match_count();
    let requests = state.counters().snapshot();
    debug!(tracked_matches, "health check");

    HealthResponse::ok(tracked_matches, requests)
}
