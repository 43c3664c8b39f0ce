use std::collections::BTreeMap;

use serde::Serialize;
use utoipa::ToSchema;

use crate::services::metrics::RequestKind;

/// Health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status, always "ok" while the process serves requests.
    pub status: String,
    /// Matches currently tracked in memory.
    pub tracked_matches: usize,
    /// Platform requests issued since start, per kind.
    #[schema(value_type = BTreeMap<String, u64>)]
    pub requests: BTreeMap<RequestKind, u64>,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok(tracked_matches: usize, requests: BTreeMap<RequestKind, u64>) -> Self {
        Self {
            status: "ok".to_string(),
            tracked_matches,
            requests,
        }
    }
}
