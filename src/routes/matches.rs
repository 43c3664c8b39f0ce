use axum::{
    Json, Router,
    body::Body,
    extract::{Path, State},
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
};
use validator::Validate;

use crate::{
    dto::matches::{
        EndMatchResponse, LinkRequest, LinkResponse, MatchSnapshot, StartMatchRequest,
        SyncResponse, TelemetryRequest,
    },
    error::AppError,
    services::match_service,
    state::SharedState,
};

const API_TOKEN_HEADER: &str = "x-api-token";

/// Match control endpoints driven by the bot's command layer and the capture client.
pub fn router(state: SharedState) -> Router<SharedState> {
    Router::new()
        .route("/matches/{guild_id}", get(get_match).delete(end_match))
        .route("/matches/{guild_id}/start", post(start_match))
        .route("/matches/{guild_id}/telemetry", post(apply_telemetry))
        .route("/matches/{guild_id}/pause", post(pause_match))
        .route("/matches/{guild_id}/resume", post(resume_match))
        .route("/matches/{guild_id}/links", post(select_color))
        .route_layer(middleware::from_fn_with_state(state, require_api_token))
}

/// Reset the guild's match and post a fresh status message.
#[utoipa::path(
    post,
    path = "/matches/{guild_id}/start",
    tag = "matches",
    params(("X-Api-Token" = Option<String>, Header, description = "Required when STATUS_API_TOKEN is set"),
    ("guild_id" = String, Path, description = "Guild the match belongs to")),
    request_body = StartMatchRequest,
    responses(
        (status = 200, description = "Match started", body = MatchSnapshot),
        (status = 502, description = "Status message could not be sent")
    )
)]
pub async fn start_match(
    State(state): State<SharedState>,
    Path(guild_id): Path<String>,
    Json(payload): Json<StartMatchRequest>,
) -> Result<Json<MatchSnapshot>, AppError> {
    payload.validate()?;
    Ok(Json(match_service::start_match(&state, &guild_id, payload).await?))
}

/// Apply a capture-client update and sync the status message.
#[utoipa::path(
    post,
    path = "/matches/{guild_id}/telemetry",
    tag = "matches",
    params(("X-Api-Token" = Option<String>, Header, description = "Required when STATUS_API_TOKEN is set"),
    ("guild_id" = String, Path, description = "Guild the match belongs to")),
    request_body = TelemetryRequest,
    responses(
        (status = 200, description = "Update applied", body = SyncResponse),
        (status = 409, description = "Phase change not allowed")
    )
)]
pub async fn apply_telemetry(
    State(state): State<SharedState>,
    Path(guild_id): Path<String>,
    Json(payload): Json<TelemetryRequest>,
) -> Result<Json<SyncResponse>, AppError> {
    payload.validate()?;
    Ok(Json(match_service::apply_telemetry(&state, &guild_id, payload).await?))
}

/// Stop automatic tracking; the status turns into the paused warning.
#[utoipa::path(
    post,
    path = "/matches/{guild_id}/pause",
    tag = "matches",
    params(("X-Api-Token" = Option<String>, Header, description = "Required when STATUS_API_TOKEN is set"),
    ("guild_id" = String, Path, description = "Guild the match belongs to")),
    responses((status = 200, description = "Tracking paused", body = SyncResponse))
)]
pub async fn pause_match(
    State(state): State<SharedState>,
    Path(guild_id): Path<String>,
) -> Result<Json<SyncResponse>, AppError> {
    Ok(Json(match_service::set_running(&state, &guild_id, false).await?))
}

/// Resume automatic tracking.
#[utoipa::path(
    post,
    path = "/matches/{guild_id}/resume",
    tag = "matches",
    params(("X-Api-Token" = Option<String>, Header, description = "Required when STATUS_API_TOKEN is set"),
    ("guild_id" = String, Path, description = "Guild the match belongs to")),
    responses((status = 200, description = "Tracking resumed", body = SyncResponse))
)]
pub async fn resume_match(
    State(state): State<SharedState>,
    Path(guild_id): Path<String>,
) -> Result<Json<SyncResponse>, AppError> {
    Ok(Json(match_service::set_running(&state, &guild_id, true).await?))
}

/// Link a participant to the player wearing the selected colour, or unlink them.
#[utoipa::path(
    post,
    path = "/matches/{guild_id}/links",
    tag = "matches",
    params(("X-Api-Token" = Option<String>, Header, description = "Required when STATUS_API_TOKEN is set"),
    ("guild_id" = String, Path, description = "Guild the match belongs to")),
    request_body = LinkRequest,
    responses(
        (status = 200, description = "Selection applied", body = LinkResponse),
        (status = 409, description = "Nobody wears the selected colour")
    )
)]
pub async fn select_color(
    State(state): State<SharedState>,
    Path(guild_id): Path<String>,
    Json(payload): Json<LinkRequest>,
) -> Result<Json<LinkResponse>, AppError> {
    payload.validate()?;
    Ok(Json(match_service::select_color(&state, &guild_id, payload).await?))
}

/// Read a match together with the embed it would render now.
#[utoipa::path(
    get,
    path = "/matches/{guild_id}",
    tag = "matches",
    params(("X-Api-Token" = Option<String>, Header, description = "Required when STATUS_API_TOKEN is set"),
    ("guild_id" = String, Path, description = "Guild the match belongs to")),
    responses(
        (status = 200, description = "Match snapshot", body = MatchSnapshot),
        (status = 404, description = "No match tracked for this guild")
    )
)]
pub async fn get_match(
    State(state): State<SharedState>,
    Path(guild_id): Path<String>,
) -> Result<Json<MatchSnapshot>, AppError> {
    Ok(Json(match_service::snapshot(&state, &guild_id).await?))
}

/// Post the game-over summary, delete the status message and stop tracking.
#[utoipa::path(
    delete,
    path = "/matches/{guild_id}",
    tag = "matches",
    params(("X-Api-Token" = Option<String>, Header, description = "Required when STATUS_API_TOKEN is set"),
    ("guild_id" = String, Path, description = "Guild the match belongs to")),
    responses((status = 200, description = "Match ended", body = EndMatchResponse))
)]
pub async fn end_match(
    State(state): State<SharedState>,
    Path(guild_id): Path<String>,
) -> Result<Json<EndMatchResponse>, AppError> {
    Ok(Json(match_service::end_match(&state, &guild_id).await?))
}

async fn require_api_token(
    State(state): State<SharedState>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(expected) = state.api_token() else {
        return Ok(next.run(req).await);
    };

    let provided = req
        .headers()
        .get(API_TOKEN_HEADER)
        .and_then(|value| value.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized("missing api token header `X-Api-Token`".into()))?;

    if provided == expected {
        Ok(next.run(req).await)
    } else {
        Err(AppError::Unauthorized("invalid api token".into()))
    }
}
