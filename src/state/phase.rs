use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// Mutually exclusive stages of a tracked match, as reported by the capture client.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum GamePhase {
    /// Player sits in the main menu; no lobby joined yet.
    #[default]
    Menu,
    /// Players gather in a lobby and pick their colours.
    Lobby,
    /// Round in progress.
    Tasks,
    /// Emergency meeting / discussion.
    Discuss,
    /// Round finished; terminal until the match is reset.
    GameOver,
}

/// Error returned when telemetry reports a phase change the match cannot take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid transition: cannot move from {from:?} to {to:?}")]
pub struct InvalidTransition {
    /// Phase the match was in.
    pub from: GamePhase,
    /// Phase that was requested.
    pub to: GamePhase,
}

impl GamePhase {
    /// Validate a move to `next`, returning the resulting phase.
    ///
    /// Re-reporting the current phase is accepted as a no-op.
    pub fn transition(self, next: GamePhase) -> Result<GamePhase, InvalidTransition> {
        use GamePhase::*;

        if self == next {
            return Ok(next);
        }

        match (self, next) {
            (Menu, Lobby)
            | (Lobby, Menu)
            | (Lobby, Tasks)
            | (Tasks, Discuss)
            | (Discuss, Tasks)
            | (Tasks | Discuss, GameOver)
            | (Tasks | Discuss, Lobby)
            | (Tasks | Discuss, Menu) => Ok(next),
            (from, to) => Err(InvalidTransition { from, to }),
        }
    }

    /// Whether a round is being played (tasks or discussion).
    pub fn in_round(self) -> bool {
        matches!(self, GamePhase::Tasks | GamePhase::Discuss)
    }
}
