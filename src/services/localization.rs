use std::collections::HashMap;

/// Message ids understood by [`MessageCatalog`].
#[allow(missing_docs)]
pub mod keys {
    pub const STATUS_NOT_LINKED: &str = "status.not_linked";
    pub const STATUS_PAUSED: &str = "status.paused";
    pub const META_HOST: &str = "meta.host";
    pub const META_PLAYERS_LINKED: &str = "meta.players_linked";
    pub const META_VOICE_CHANNEL: &str = "meta.voice_channel";
    pub const TITLE_MENU: &str = "title.menu";
    pub const TITLE_LOBBY: &str = "title.lobby";
    pub const TITLE_TASKS: &str = "title.tasks";
    pub const TITLE_DISCUSS: &str = "title.discuss";
    pub const TITLE_GAME_OVER: &str = "title.game_over";
    pub const FOOTER_MENU: &str = "footer.menu";
    pub const FOOTER_LOBBY: &str = "footer.lobby";
    pub const PLAYERS_UNLINKED: &str = "players.unlinked";
    pub const PLAYERS_ALIVE: &str = "players.alive";
    pub const PLAYERS_DEAD: &str = "players.dead";
    pub const PLAYERS_ROW: &str = "players.row";
    pub const GAME_OVER_SUMMARY: &str = "game_over.summary";
    pub const GAME_OVER_DELETE_NOTICE: &str = "game_over.delete_notice";
    pub const CONTROLS_UNLINK: &str = "controls.unlink";
}

const DEFAULT_MESSAGES: &[(&str, &str)] = &[
    (
        keys::STATUS_NOT_LINKED,
        "❌ **The capture client is not linked!** Connect it with code `{code}`.",
    ),
    (
        keys::STATUS_PAUSED,
        "⚠ **Tracking is paused.** Resume it to update players automatically.",
    ),
    (keys::META_HOST, "Host"),
    (keys::META_PLAYERS_LINKED, "Players Linked"),
    (keys::META_VOICE_CHANNEL, "Voice Channel"),
    (keys::TITLE_MENU, "Main Menu"),
    (keys::TITLE_LOBBY, "Lobby"),
    (keys::TITLE_TASKS, "Tasks"),
    (keys::TITLE_DISCUSS, "Discussion"),
    (keys::TITLE_GAME_OVER, "Game Over"),
    (
        keys::FOOTER_MENU,
        "Join a lobby in game and the match will start automatically.",
    ),
    (
        keys::FOOTER_LOBBY,
        "Pick your colour with the buttons below ({unlink} to unlink).",
    ),
    (keys::PLAYERS_UNLINKED, "Unlinked"),
    (keys::PLAYERS_ALIVE, "Alive"),
    (keys::PLAYERS_DEAD, "Dead"),
    (keys::PLAYERS_ROW, "{status} · {glyph} {color}"),
    (
        keys::GAME_OVER_SUMMARY,
        "Game over! Match ID: `{match_id}`\n{winners}",
    ),
    (
        keys::GAME_OVER_DELETE_NOTICE,
        "This summary will be deleted in {minutes} minute(s).",
    ),
    (keys::CONTROLS_UNLINK, "✖ Unlink"),
];

/// Resolves message ids to user-facing strings.
pub trait Localizer: Send + Sync {
    /// Render `key` with `{name}` placeholders replaced from `args`.
    fn localize(&self, key: &str, args: &[(&str, &str)]) -> String;
}

/// Built-in English catalog with per-key overrides from configuration.
#[derive(Debug, Clone, Default)]
pub struct MessageCatalog {
    overrides: HashMap<String, String>,
}

impl MessageCatalog {
    /// Catalog with the English defaults and the given overrides.
    pub fn new(overrides: HashMap<String, String>) -> Self {
        Self { overrides }
    }

    fn template(&self, key: &str) -> Option<&str> {
        self.overrides.get(key).map(String::as_str).or_else(|| {
            DEFAULT_MESSAGES
                .iter()
                .find(|(id, _)| *id == key)
                .map(|(_, template)| *template)
        })
    }
}

impl Localizer for MessageCatalog {
    fn localize(&self, key: &str, args: &[(&str, &str)]) -> String {
        let Some(template) = self.template(key) else {
            return key.to_string();
        };

        args.iter()
            .fold(template.to_string(), |text, (name, value)| {
                text.replace(&format!("{{{name}}}"), value)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_templated() {
        let catalog = MessageCatalog::default();
        assert_eq!(
            catalog.localize(keys::GAME_OVER_DELETE_NOTICE, &[("minutes", "5")]),
            "This summary will be deleted in 5 minute(s)."
        );
    }

    #[test]
    fn overrides_win_over_defaults() {
        let catalog = MessageCatalog::new(HashMap::from([(
            keys::PLAYERS_UNLINKED.to_string(),
            "未リンク".to_string(),
        )]));
        assert_eq!(catalog.localize(keys::PLAYERS_UNLINKED, &[]), "未リンク");
        assert_eq!(catalog.localize(keys::META_HOST, &[]), "Host");
    }

    #[test]
    fn unknown_key_echoes_the_key() {
        assert_eq!(MessageCatalog::default().localize("nope", &[]), "nope");
    }

    #[test]
    fn every_default_key_is_unique() {
        let mut ids: Vec<_> = DEFAULT_MESSAGES.iter().map(|(id, _)| *id).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), DEFAULT_MESSAGES.len());
    }
}
