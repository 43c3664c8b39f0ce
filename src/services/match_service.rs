//! Commands and telemetry that mutate a tracked match, followed by a status sync.

use tracing::{info, warn};

use crate::{
    dto::matches::{
        EndMatchResponse, LinkRequest, LinkResponse, MatchSnapshot, StartMatchRequest,
        StatusMessageView, SyncResponse, SyncStatus, TelemetryRequest,
    },
    error::ServiceError,
    services::{
        renderer::render,
        status_service::{
            self, DispatchOutcome, create_message, delete_status_message,
            dispatch_refresh_or_edit,
        },
    },
    state::{MatchHandle, SharedState, match_state::LinkOutcome},
};

/// Reset the guild's match, issue a new connect code and post the status message.
///
/// A message left over from a previous match is deleted first. Concurrent
/// starts for the same guild run one after the other, each replacing the
/// message the previous one posted.
pub async fn start_match(
    state: &SharedState,
    guild_id: &str,
    request: StartMatchRequest,
) -> Result<MatchSnapshot, ServiceError> {
    let lifecycle = state.lock_lifecycle(guild_id).await;
    let handle = state.match_or_insert(guild_id);

    let previous = {
        let mut current = handle.lock().await;
        let previous = current.take_binding();
        current.reset();
        current.regenerate_connect_code();
        current.running = true;
        current.voice_channel = request.voice_channel_id;
        previous
    };
    if previous.exists() {
        delete_status_message(state, &previous).await;
    }

    create_message(state, &handle, &request.channel_id, &request.leader_id).await?;
    drop(lifecycle);
    info!(guild_id, "match started");

    snapshot(state, guild_id).await
}

/// Apply a telemetry update and sync the status message.
///
/// The phase change is validated before anything else is applied, so a
/// rejected update leaves the match untouched.
pub async fn apply_telemetry(
    state: &SharedState,
    guild_id: &str,
    request: TelemetryRequest,
) -> Result<SyncResponse, ServiceError> {
    let handle = require_match(state, guild_id)?;
    {
        let mut current = handle.lock().await;
        if let Some(phase) = request.phase {
            let previous = current.game.phase;
            let next = current.apply_phase(phase)?;
            // a new round starts without the previous winners
            if next.in_round() && !previous.in_round() {
                current.game.winners = None;
            }
        }
        if let Some(linked) = request.linked {
            current.linked = linked;
        }
        if let Some(match_id) = request.match_id {
            current.match_id = match_id;
        }
        if let Some(started) = request.match_start_unix {
            current.match_start_unix = started;
        }
        if let Some(winners) = request.winners {
            current.game.winners = Some(winners);
        }
        for player in request.players {
            current.upsert_player(player.into());
        }
    }

    sync(state, guild_id).await
}

/// Pause or resume automatic tracking.
pub async fn set_running(
    state: &SharedState,
    guild_id: &str,
    running: bool,
) -> Result<SyncResponse, ServiceError> {
    let handle = require_match(state, guild_id)?;
    handle.lock().await.running = running;
    info!(guild_id, running, "tracking toggled");

    sync(state, guild_id).await
}

/// Apply a colour-control selection for a participant.
pub async fn select_color(
    state: &SharedState,
    guild_id: &str,
    request: LinkRequest,
) -> Result<LinkResponse, ServiceError> {
    let handle = require_match(state, guild_id)?;
    let outcome = handle.lock().await.link_participant(
        &request.participant_id,
        &request.display_name,
        request.selection(),
    )?;

    let dispatch = dispatch_refresh_or_edit(state, guild_id).await?;
    Ok(LinkResponse {
        in_game_name: match outcome {
            LinkOutcome::Linked { in_game_name } => Some(in_game_name),
            LinkOutcome::Unlinked => None,
        },
        sync: SyncStatus::from(&dispatch),
    })
}

/// Read model of a match with the embed it would render right now.
pub async fn snapshot(state: &SharedState, guild_id: &str) -> Result<MatchSnapshot, ServiceError> {
    let handle = require_match(state, guild_id)?;
    let current = handle.lock().await;
    let preview = render(&current, &state.render_context());
    Ok(MatchSnapshot::from_state(&current, preview))
}

/// Post the game-over summary, delete the live message and stop tracking.
pub async fn end_match(
    state: &SharedState,
    guild_id: &str,
) -> Result<EndMatchResponse, ServiceError> {
    require_match(state, guild_id)?;
    let _lifecycle = state.lock_lifecycle(guild_id).await;
    let handle = state
        .remove_match(guild_id)
        .ok_or_else(|| not_found(guild_id))?;

    let (snapshot, bound) = {
        let mut current = handle.lock().await;
        let snapshot = current.clone();
        (snapshot, current.take_binding())
    };

    let summary_message_id = if bound.exists() {
        match status_service::post_game_over_summary(state, &snapshot).await {
            Ok(sent) => Some(sent.id),
            Err(err) => {
                warn!(guild_id, error = %err, "failed to post game-over summary");
                None
            }
        }
    } else {
        None
    };
    let status_message_deleted = delete_status_message(state, &bound).await;
    info!(guild_id, "match ended");

    Ok(EndMatchResponse {
        summary_message_id,
        status_message_deleted,
    })
}

async fn sync(state: &SharedState, guild_id: &str) -> Result<SyncResponse, ServiceError> {
    let dispatch = dispatch_refresh_or_edit(state, guild_id).await?;
    let status_message = match &dispatch {
        DispatchOutcome::Recreated(message) => StatusMessageView::from_bound(message),
        _ => {
            let handle = require_match(state, guild_id)?;
            let current = handle.lock().await;
            StatusMessageView::from_bound(&current.status_message)
        }
    };
    Ok(SyncResponse {
        sync: SyncStatus::from(&dispatch),
        status_message,
    })
}

fn require_match(state: &SharedState, guild_id: &str) -> Result<MatchHandle, ServiceError> {
    state.match_handle(guild_id).ok_or_else(|| not_found(guild_id))
}

fn not_found(guild_id: &str) -> ServiceError {
    ServiceError::NotFound(format!("match `{guild_id}` not found"))
}
