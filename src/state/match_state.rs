use std::time::{Duration, SystemTime};

use indexmap::IndexMap;
use rand::Rng;
use thiserror::Error;

use crate::{
    platform::{MessagingPlatform, SentMessage},
    state::{
        catalog::ColorCatalog,
        phase::{GamePhase, InvalidTransition},
        status_message::StatusMessage,
    },
};

/// Control value that clears a participant's in-game association.
pub const UNLINK_SELECTION: &str = "X";
/// Sentinel stored in `match_id` / `match_start_unix` between matches.
pub const NO_MATCH: i64 = -1;

const CONNECT_CODE_LEN: usize = 8;

/// Platform participant that may be linked to an in-game player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParticipantLink {
    /// Platform user id.
    pub participant_id: String,
    /// Nickname or username captured when the participant linked.
    pub display_name: String,
    /// In-game name this participant plays as; empty when not associated.
    pub in_game_name: String,
}

impl ParticipantLink {
    /// Name to render, falling back to the participant id.
    pub fn shown_name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.participant_id
        } else {
            &self.display_name
        }
    }
}

/// Player entry reported by game telemetry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InGamePlayer {
    /// Colour id, `0..=17` when well formed.
    pub color: i32,
    /// Dead players stay listed.
    pub alive: bool,
    /// In-game name.
    pub name: String,
}

impl InGamePlayer {
    /// Whether the colour id is inside the known range.
    pub fn has_valid_color(&self) -> bool {
        ColorCatalog.game_color_name(self.color).is_some()
    }
}

/// Telemetry-owned part of the match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GameData {
    /// Current game phase.
    pub phase: GamePhase,
    /// Players in report order.
    pub players: Vec<InGamePlayer>,
    /// Winner text reported at game over.
    pub winners: Option<String>,
}

/// Why a colour selection could not be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LinkError {
    /// The selection is neither a catalog colour nor the unlink value.
    #[error("unknown colour selection `{0}`")]
    UnknownSelection(String),
    /// Nobody in the game currently wears the selected colour.
    #[error("no detected player wears `{0}`")]
    ColorNotInGame(String),
}

/// Outcome of a successful colour selection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkOutcome {
    /// Participant is now associated with the named player.
    Linked {
        /// Name of the player wearing the selected colour.
        in_game_name: String,
    },
    /// Participant association was cleared.
    Unlinked,
}

/// Authoritative record of one tracked match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchState {
    guild_id: String,
    /// Eight-letter code shown in the meta block and summary.
    pub connect_code: String,
    /// Whether the capture client is connected.
    pub linked: bool,
    /// Whether automatic tracking is enabled.
    pub running: bool,
    /// Game-assigned match id, `NO_MATCH` when unknown.
    pub match_id: i64,
    /// Match start in unix seconds, `NO_MATCH` when unknown.
    pub match_start_unix: i64,
    /// Chat participants keyed by id, in link order.
    pub participants: IndexMap<String, ParticipantLink>,
    /// Telemetry-owned data.
    pub game: GameData,
    /// Voice channel shown in the meta block.
    pub voice_channel: Option<String>,
    /// Bound status message, empty when unbound.
    pub status_message: StatusMessage,
}

impl MatchState {
    /// Build a fresh, reset state for the given context.
    pub fn new(guild_id: impl Into<String>) -> Self {
        let mut state = Self {
            guild_id: guild_id.into(),
            connect_code: String::new(),
            linked: false,
            running: false,
            match_id: NO_MATCH,
            match_start_unix: NO_MATCH,
            participants: IndexMap::new(),
            game: GameData::default(),
            voice_channel: None,
            status_message: StatusMessage::default(),
        };
        state.reset();
        state
    }

    /// Permanent context identifier.
    pub fn guild_id(&self) -> &str {
        &self.guild_id
    }

    /// Clear every mutable field; the guild id survives.
    pub fn reset(&mut self) {
        self.connect_code.clear();
        self.linked = false;
        self.running = false;
        self.match_id = NO_MATCH;
        self.match_start_unix = NO_MATCH;
        self.participants = IndexMap::new();
        self.game = GameData::default();
        self.voice_channel = None;
        self.status_message = StatusMessage::default();
    }

    /// Generate a new code for the capture client to connect with.
    pub fn regenerate_connect_code(&mut self) {
        let mut rng = rand::rng();
        self.connect_code = (0..CONNECT_CODE_LEN)
            .map(|_| char::from(rng.random_range(b'A'..=b'Z')))
            .collect();
    }

    /// Store the identifiers of a freshly sent status message.
    pub fn bind_message(&mut self, leader_id: impl Into<String>, sent: SentMessage) {
        self.status_message = StatusMessage::bound(leader_id, sent, SystemTime::now());
    }

    /// Remove the bound message reference, optionally deleting it on the platform.
    ///
    /// Local state is always cleared; the return value only reports whether the
    /// remote delete succeeded.
    pub async fn unbind(
        &mut self,
        platform: &dyn MessagingPlatform,
        delete_from_platform: bool,
    ) -> bool {
        let previous = self.take_binding();
        if delete_from_platform {
            previous.delete(platform).await
        } else {
            false
        }
    }

    /// Clear the binding and hand back the previous record.
    ///
    /// Lets callers release the match lock before deleting the message remotely.
    pub fn take_binding(&mut self) -> StatusMessage {
        std::mem::take(&mut self.status_message)
    }

    /// Whether the bound message is older than `horizon` and must be recreated.
    pub fn is_stale(&self, horizon: Duration) -> bool {
        self.status_message.is_stale_at(SystemTime::now(), horizon)
    }

    /// Move to `next`, validating the transition.
    pub fn apply_phase(&mut self, next: GamePhase) -> Result<GamePhase, InvalidTransition> {
        let phase = self.game.phase.transition(next)?;
        self.game.phase = phase;
        Ok(phase)
    }

    /// Insert or replace a player, keyed by in-game name.
    pub fn upsert_player(&mut self, player: InGamePlayer) {
        match self
            .game
            .players
            .iter_mut()
            .find(|existing| existing.name == player.name)
        {
            Some(existing) => *existing = player,
            None => self.game.players.push(player),
        }
    }

    /// Players whose colour is in range, first occurrence per colour.
    pub fn detected_players(&self) -> impl Iterator<Item = &InGamePlayer> {
        let mut seen = [false; crate::state::catalog::COLOR_COUNT];
        self.game.players.iter().filter(move |player| {
            let Some(index) = usize::try_from(player.color)
                .ok()
                .filter(|_| player.has_valid_color())
            else {
                return false;
            };
            !std::mem::replace(&mut seen[index], true)
        })
    }

    /// Number of players detected with a valid colour.
    pub fn detected_player_count(&self) -> usize {
        self.detected_players().count()
    }

    /// Number of participants associated with an in-game name.
    pub fn linked_participant_count(&self) -> usize {
        self.participants
            .values()
            .filter(|link| !link.in_game_name.is_empty())
            .count()
    }

    /// Apply a colour-control selection for a participant.
    ///
    /// `selection` is a catalog key (`"red"`) or [`UNLINK_SELECTION`].
    pub fn link_participant(
        &mut self,
        participant_id: &str,
        display_name: &str,
        selection: &str,
    ) -> Result<LinkOutcome, LinkError> {
        if selection.eq_ignore_ascii_case(UNLINK_SELECTION) {
            if let Some(link) = self.participants.get_mut(participant_id) {
                link.in_game_name.clear();
            }
            return Ok(LinkOutcome::Unlinked);
        }

        let color = ColorCatalog
            .color_index(selection)
            .ok_or_else(|| LinkError::UnknownSelection(selection.to_string()))?;
        let in_game_name = self
            .detected_players()
            .find(|player| player.color == color)
            .map(|player| player.name.clone())
            .ok_or_else(|| LinkError::ColorNotInGame(selection.to_string()))?;

        let link = self
            .participants
            .entry(participant_id.to_string())
            .or_insert_with(|| ParticipantLink {
                participant_id: participant_id.to_string(),
                display_name: String::new(),
                in_game_name: String::new(),
            });
        if !display_name.is_empty() {
            link.display_name = display_name.to_string();
        }
        link.in_game_name = in_game_name.clone();

        Ok(LinkOutcome::Linked { in_game_name })
    }
}
