//! Resolves in-game players to linked platform participants.

use crate::state::{
    catalog::{ColorCatalog, ResolvedColor},
    match_state::MatchState,
};

/// Who a display row is attributed to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowLink {
    /// Participant display name.
    Linked(String),
    /// Localized "unlinked" label.
    Unlinked(String),
}

impl RowLink {
    /// Text to render as the row heading.
    pub fn label(&self) -> &str {
        match self {
            RowLink::Linked(name) | RowLink::Unlinked(name) => name,
        }
    }

    /// Whether a participant claimed this row.
    pub fn is_linked(&self) -> bool {
        matches!(self, RowLink::Linked(_))
    }
}

/// One rendered player line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    /// In-game colour id.
    pub color: i32,
    /// Catalog entry for `color`.
    pub resolved: ResolvedColor,
    /// Name reported by telemetry.
    pub in_game_name: String,
    /// Alive flag reported by telemetry.
    pub alive: bool,
    /// Linked participant or the unlinked label.
    pub link: RowLink,
}

/// Ordered display rows for every player wearing a known colour.
///
/// Rows ascend by colour id. Players outside `0..=17` never reach rendering,
/// and when two players report the same colour the first one reported wins.
pub fn link_display_rows(
    state: &MatchState,
    catalog: &ColorCatalog,
    unlinked_label: &str,
) -> Vec<DisplayRow> {
    let mut rows: Vec<DisplayRow> = state
        .detected_players()
        .filter_map(|player| {
            let resolved = catalog.for_color(player.color)?;
            let link = state
                .participants
                .values()
                .find(|participant| participant.in_game_name == player.name)
                .map(|participant| RowLink::Linked(participant.shown_name().to_string()))
                .unwrap_or_else(|| RowLink::Unlinked(unlinked_label.to_string()));

            Some(DisplayRow {
                color: player.color,
                resolved,
                in_game_name: player.name.clone(),
                alive: player.alive,
                link,
            })
        })
        .collect();

    rows.sort_by_key(|row| row.color);
    rows
}
