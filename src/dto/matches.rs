use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    dto::{embed::Embed, format_system_time, validation::validate_snowflake},
    services::{components::parse_selection, status_service::DispatchOutcome},
    state::{
        match_state::{InGamePlayer, MatchState, NO_MATCH},
        phase::GamePhase,
        status_message::StatusMessage,
    },
};

/// Payload starting (or restarting) tracking for a guild.
#[derive(Debug, Deserialize, ToSchema)]
pub struct StartMatchRequest {
    /// Text channel that receives the status message.
    /// Channel of the bound message.
    pub channel_id: String,
    /// Participant who started the match; shown as host.
    /// Participant shown as host.
    pub leader_id: String,
    /// Voice channel displayed in the meta block.
    #[serde(default)]
    pub voice_channel_id: Option<String>,
}

impl Validate for StartMatchRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_snowflake(&self.channel_id) {
            errors.add("channel_id", e);
        }
        if let Err(e) = validate_snowflake(&self.leader_id) {
            errors.add("leader_id", e);
        }
        if let Some(ref voice) = self.voice_channel_id {
            if let Err(e) = validate_snowflake(voice) {
                errors.add("voice_channel_id", e);
            }
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Player entry reported by the capture client.
#[derive(Debug, Serialize, Deserialize, ToSchema, Validate)]
pub struct PlayerUpdate {
    /// Colour id; values outside `0..=17` are kept but never rendered.
    pub color: i32,
    /// Defaults to alive when omitted.
    #[serde(default = "default_alive")]
    pub alive: bool,
    /// In-game name.
    #[validate(length(min = 1, max = 64))]
    pub name: String,
}

fn default_alive() -> bool {
    true
}

impl From<PlayerUpdate> for InGamePlayer {
    fn from(value: PlayerUpdate) -> Self {
        Self {
            color: value.color,
            alive: value.alive,
            name: value.name,
        }
    }
}

/// Partial match update; absent members are left untouched.
#[derive(Debug, Default, Deserialize, ToSchema, Validate)]
pub struct TelemetryRequest {
    /// Capture client connection state.
    #[serde(default)]
    pub linked: Option<bool>,
    /// New phase; validated against the current one.
    #[serde(default)]
    pub phase: Option<GamePhase>,
    /// Players to insert or replace by colour.
    #[serde(default)]
    #[validate(length(max = 32), nested)]
    pub players: Vec<PlayerUpdate>,
    /// Game-assigned match id.
    #[serde(default)]
    pub match_id: Option<i64>,
    /// Match start in unix seconds.
    #[serde(default)]
    pub match_start_unix: Option<i64>,
    /// Winner text reported at game over.
    #[serde(default)]
    pub winners: Option<String>,
}

/// Colour-control interaction.
#[derive(Debug, Deserialize, ToSchema)]
pub struct LinkRequest {
    /// Platform user who pressed the control.
    pub participant_id: String,
    /// Nickname to show for the participant.
    #[serde(default)]
    pub display_name: String,
    /// Colour key (`"red"`), `"X"` to unlink, or the raw button id (`"select-color:red"`).
    pub selection: String,
}

impl LinkRequest {
    /// Selection with the button prefix stripped.
    pub fn selection(&self) -> &str {
        parse_selection(&self.selection).unwrap_or(&self.selection)
    }
}

impl Validate for LinkRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_snowflake(&self.participant_id) {
            errors.add("participant_id", e);
        }
        if self.selection().is_empty() {
            let mut err = ValidationError::new("selection_empty");
            err.message = Some("Selection must not be empty".into());
            errors.add("selection", err);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// How an update reached the status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SyncStatus {
    /// Opened a new coalescing window; one edit will follow.
    Queued,
    /// Folded into an already pending edit.
    Coalesced,
    /// Stale message replaced by a new one.
    Recreated,
    /// No status message bound.
    Unbound,
}

impl From<&DispatchOutcome> for SyncStatus {
    fn from(value: &DispatchOutcome) -> Self {
        match value {
            DispatchOutcome::Queued { new_window: true } => SyncStatus::Queued,
            DispatchOutcome::Queued { new_window: false } => SyncStatus::Coalesced,
            DispatchOutcome::Recreated(_) => SyncStatus::Recreated,
            DispatchOutcome::Unbound => SyncStatus::Unbound,
        }
    }
}

/// Public view of the bound status message.
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusMessageView {
    /// Bound message id.
    pub message_id: String,
    /// Channel of the bound message.
    pub channel_id: String,
    /// Participant shown as host.
    pub leader_id: String,
    /// RFC 3339 creation time.
    pub created_at: Option<String>,
}

impl StatusMessageView {
    /// `None` when no message is bound.
    pub fn from_bound(message: &StatusMessage) -> Option<Self> {
        message.exists().then(|| Self {
            message_id: message.message_id.clone(),
            channel_id: message.channel_id.clone(),
            leader_id: message.leader_id.clone(),
            created_at: message.created_at.map(format_system_time),
        })
    }
}

/// Result of a mutation that triggers a status sync.
#[derive(Debug, Serialize, ToSchema)]
pub struct SyncResponse {
    /// What the status sync did.
    pub sync: SyncStatus,
    /// Message bound after the sync.
    pub status_message: Option<StatusMessageView>,
}

/// Result of a colour selection.
#[derive(Debug, Serialize, ToSchema)]
pub struct LinkResponse {
    /// In-game name now associated; absent after an unlink.
    pub in_game_name: Option<String>,
    /// What the status sync did.
    pub sync: SyncStatus,
}

/// Result of ending a match.
#[derive(Debug, Serialize, ToSchema)]
pub struct EndMatchResponse {
    /// Game-over summary message, when it could be posted.
    pub summary_message_id: Option<String>,
    /// Whether the platform confirmed deleting the live status message.
    pub status_message_deleted: bool,
}

/// Player as stored in the match.
#[derive(Debug, Serialize, ToSchema)]
pub struct PlayerView {
    /// Colour id.
    pub color: i32,
    /// Alive flag.
    pub alive: bool,
    /// In-game name.
    pub name: String,
}

/// Participant and the player they are linked to.
#[derive(Debug, Serialize, ToSchema)]
pub struct ParticipantView {
    /// Platform user id.
    pub participant_id: String,
    /// Name shown for the participant.
    pub display_name: String,
    /// Linked player, if any.
    pub in_game_name: Option<String>,
}

/// Full read model of a tracked match, with the embed it would render now.
#[derive(Debug, Serialize, ToSchema)]
pub struct MatchSnapshot {
    /// Guild the match belongs to.
    pub guild_id: String,
    /// Code shown in the meta block.
    pub connect_code: String,
    /// Capture client connection state.
    pub linked: bool,
    /// Whether automatic tracking is enabled.
    pub running: bool,
    /// Current phase.
    pub phase: GamePhase,
    /// Game-assigned match id.
    pub match_id: Option<i64>,
    /// Match start in unix seconds.
    pub match_start_unix: Option<i64>,
    /// Winner text, if reported.
    pub winners: Option<String>,
    /// Voice channel shown in the meta block.
    pub voice_channel_id: Option<String>,
    /// Players in report order.
    pub players: Vec<PlayerView>,
    /// Participants in link order.
    pub participants: Vec<ParticipantView>,
    /// Currently bound message.
    pub status_message: Option<StatusMessageView>,
    /// Embed the match would render now.
    pub preview: Embed,
}

fn present(value: i64) -> Option<i64> {
    (value != NO_MATCH).then_some(value)
}

impl MatchSnapshot {
    /// Read model of `state` with the given rendered preview.
    pub fn from_state(state: &MatchState, preview: Embed) -> Self {
        Self {
            guild_id: state.guild_id().to_string(),
            connect_code: state.connect_code.clone(),
            linked: state.linked,
            running: state.running,
            phase: state.game.phase,
            match_id: present(state.match_id),
            match_start_unix: present(state.match_start_unix),
            winners: state.game.winners.clone(),
            voice_channel_id: state.voice_channel.clone(),
            players: state
                .game
                .players
                .iter()
                .map(|player| PlayerView {
                    color: player.color,
                    alive: player.alive,
                    name: player.name.clone(),
                })
                .collect(),
            participants: state
                .participants
                .values()
                .map(|link| ParticipantView {
                    participant_id: link.participant_id.clone(),
                    display_name: link.shown_name().to_string(),
                    in_game_name: (!link.in_game_name.is_empty())
                        .then(|| link.in_game_name.clone()),
                })
                .collect(),
            status_message: StatusMessageView::from_bound(&state.status_message),
            preview,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn start_request_requires_numeric_ids() {
        let request = StartMatchRequest {
            channel_id: "123".into(),
            leader_id: "abc".into(),
            voice_channel_id: Some("".into()),
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("leader_id"));
        assert!(fields.contains_key("voice_channel_id"));
        assert!(!fields.contains_key("channel_id"));
    }

    #[test]
    fn telemetry_accepts_partial_documents() {
        let request: TelemetryRequest =
            serde_json::from_str(r#"{ "phase": "TASKS", "players": [{ "color": 3, "name": "bob" }] }"#)
                .unwrap();
        assert!(request.validate().is_ok());
        assert_eq!(request.phase, Some(GamePhase::Tasks));
        assert!(request.players[0].alive);
        assert_eq!(request.linked, None);
    }

    #[test]
    fn telemetry_rejects_nameless_players() {
        let request: TelemetryRequest =
            serde_json::from_str(r#"{ "players": [{ "color": 3, "name": "" }] }"#).unwrap();
        assert!(request.validate().is_err());
    }

    #[test]
    fn telemetry_caps_the_player_list() {
        let players = (0..33)
            .map(|color| PlayerUpdate {
                color,
                alive: true,
                name: format!("p{color}"),
            })
            .collect();
        let request = TelemetryRequest {
            players,
            ..TelemetryRequest::default()
        };
        let errors = request.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("players"));
    }

    #[test]
    fn link_selection_accepts_button_ids() {
        let request = LinkRequest {
            participant_id: "42".into(),
            display_name: String::new(),
            selection: "select-color:cyan".into(),
        };
        assert_eq!(request.selection(), "cyan");
        assert!(request.validate().is_ok());

        let empty = LinkRequest {
            selection: String::new(),
            ..request
        };
        assert!(empty.validate().is_err());
    }

    #[test]
    fn sync_status_reflects_dispatch_outcome() {
        assert_eq!(
            SyncStatus::from(&DispatchOutcome::Queued { new_window: false }),
            SyncStatus::Coalesced
        );
        assert_eq!(
            SyncStatus::from(&DispatchOutcome::Unbound),
            SyncStatus::Unbound
        );
    }

    #[test]
    fn snapshot_hides_sentinels() {
        let state = MatchState::new("g");
        let snapshot = MatchSnapshot::from_state(&state, Embed::default());
        assert_eq!(snapshot.match_id, None);
        assert!(snapshot.status_message.is_none());
        assert_eq!(snapshot.phase, GamePhase::Menu);
    }
}
