//! Lifecycle of the live status message: create, edit-or-recreate, delete.
//!
//! Match locks are only held to snapshot or bind; every platform call runs
//! with the lock released.

use std::{sync::Arc, time::Duration};

use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::{
    dto::embed::Embed,
    error::ServiceError,
    platform::{MessagingPlatform, SentMessage},
    services::{
        components::color_control_rows,
        localization::keys,
        metrics::{EventRecorder, RequestCounters, RequestKind},
        renderer::{game_over_message, render},
    },
    state::{
        MatchHandle, SharedState, catalog::ColorCatalog, match_state::MatchState,
        status_message::StatusMessage,
    },
};

/// What [`dispatch_refresh_or_edit`] ended up doing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// Payload handed to the edit dispatcher.
    Queued {
        /// Whether the submission opened a new coalescing window.
        new_window: bool,
    },
    /// The stale message was deleted and a new one sent.
    Recreated(StatusMessage),
    /// No message is bound; nothing to sync.
    Unbound,
}

/// Send a status message with colour controls and bind it to the match.
///
/// Nothing is mutated when the send fails.
pub async fn create_message(
    state: &SharedState,
    handle: &MatchHandle,
    channel_id: &str,
    leader_id: &str,
) -> Result<StatusMessage, ServiceError> {
    let embed = {
        let current = handle.lock().await;
        let mut preview = current.clone();
        preview.status_message.leader_id = leader_id.to_string();
        render(&preview, &state.render_context())
    };
    let unlink = state.localizer().localize(keys::CONTROLS_UNLINK, &[]);
    let controls = color_control_rows(&ColorCatalog, &unlink);

    let sent = state
        .platform()
        .send_message(channel_id, &embed, &controls)
        .await?;
    state.counters().record_event(RequestKind::MessageCreate, 1);

    let mut current = handle.lock().await;
    current.bind_message(leader_id, sent);
    info!(
        guild_id = %current.guild_id(),
        message_id = %current.status_message.message_id,
        "status message created"
    );
    Ok(current.status_message.clone())
}

/// Bring the bound message up to date with the match.
///
/// A message past the staleness horizon is deleted and recreated in the same
/// channel; otherwise the rendered payload goes through the edit dispatcher.
/// Runs under the guild's lifecycle guard, so a sync arriving while the
/// message is being recreated waits and then edits the new message.
pub async fn dispatch_refresh_or_edit(
    state: &SharedState,
    guild_id: &str,
) -> Result<DispatchOutcome, ServiceError> {
    let not_found = || ServiceError::NotFound(format!("match `{guild_id}` not found"));
    if state.match_handle(guild_id).is_none() {
        return Err(not_found());
    }
    let _lifecycle = state.lock_lifecycle(guild_id).await;
    let handle = state.match_handle(guild_id).ok_or_else(not_found)?;

    let (embed, bound) = {
        let current = handle.lock().await;
        let embed = (!current.is_stale(state.config().stale_after()))
            .then(|| render(&current, &state.render_context()));
        (embed, current.status_message.clone())
    };

    if !bound.exists() {
        debug!(guild_id, "no status message bound; skipping sync");
        return Ok(DispatchOutcome::Unbound);
    }

    match embed {
        Some(embed) => {
            let new_window = submit(state, &bound, embed).await;
            Ok(DispatchOutcome::Queued { new_window })
        }
        None => refresh(state, &handle).await.map(DispatchOutcome::Recreated),
    }
}

async fn submit(state: &SharedState, bound: &StatusMessage, embed: Embed) -> bool {
    let new_window = state
        .dispatcher()
        .submit_edit(&bound.message_id, &bound.channel_id, embed)
        .await;
    if new_window {
        state.counters().record_event(RequestKind::MessageEdit, 1);
    }
    new_window
}

/// Replace the bound message with a freshly sent one for the same leader.
///
/// The caller holds the guild's lifecycle guard.
pub async fn refresh(
    state: &SharedState,
    handle: &MatchHandle,
) -> Result<StatusMessage, ServiceError> {
    let previous = handle.lock().await.take_binding();
    if !previous.exists() {
        return Err(ServiceError::InvalidState(
            "no status message to refresh".into(),
        ));
    }

    info!(message_id = %previous.message_id, "recreating stale status message");
    delete_status_message(state, &previous).await;

    create_message(state, handle, &previous.channel_id, &previous.leader_id).await
}

/// Drop any queued edit and delete the message; reports whether the platform confirmed.
pub async fn delete_status_message(state: &SharedState, message: &StatusMessage) -> bool {
    state.dispatcher().remove_pending(&message.message_id).await;
    let deleted = message.delete(state.platform().as_ref()).await;
    if deleted {
        state.counters().record_event(RequestKind::MessageDelete, 1);
    }
    deleted
}

/// Post the game-over summary as its own message, without controls.
///
/// When a retention window is configured the summary is deleted after it elapses.
pub async fn post_game_over_summary(
    state: &SharedState,
    snapshot: &MatchState,
) -> Result<SentMessage, ServiceError> {
    let channel_id = &snapshot.status_message.channel_id;
    if channel_id.is_empty() {
        return Err(ServiceError::InvalidState(
            "no channel to post the summary in".into(),
        ));
    }

    let embed = game_over_message(snapshot, &state.render_context());
    let sent = state.platform().send_message(channel_id, &embed, &[]).await?;
    state.counters().record_event(RequestKind::MessageCreate, 1);

    let minutes = state.config().delete_summary_minutes();
    if minutes > 0 {
        schedule_deletion(
            Arc::clone(state.platform()),
            Arc::clone(state.counters()),
            sent.clone(),
            Duration::from_secs(u64::from(minutes) * 60),
        );
    }
    Ok(sent)
}

fn schedule_deletion(
    platform: Arc<dyn MessagingPlatform>,
    counters: Arc<RequestCounters>,
    message: SentMessage,
    after: Duration,
) {
    tokio::spawn(async move {
        sleep(after).await;
        match platform.delete_message(&message.channel_id, &message.id).await {
            Ok(()) => counters.record_event(RequestKind::MessageDelete, 1),
            Err(err) => warn!(
                message_id = %message.id,
                error = %err,
                "failed to delete game-over summary"
            ),
        }
    });
}
