use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for the status beacon.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::matches::start_match,
        crate::routes::matches::apply_telemetry,
        crate::routes::matches::pause_match,
        crate::routes::matches::resume_match,
        crate::routes::matches::select_color,
        crate::routes::matches::get_match,
        crate::routes::matches::end_match,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::matches::StartMatchRequest,
            crate::dto::matches::TelemetryRequest,
            crate::dto::matches::PlayerUpdate,
            crate::dto::matches::LinkRequest,
            crate::dto::matches::SyncStatus,
            crate::dto::matches::SyncResponse,
            crate::dto::matches::LinkResponse,
            crate::dto::matches::EndMatchResponse,
            crate::dto::matches::MatchSnapshot,
            crate::dto::embed::Embed,
            crate::state::phase::GamePhase,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "matches", description = "Match tracking and status message control"),
    )
)]
/// OpenAPI description of the HTTP surface.
pub struct ApiDoc;
