//! Phase-driven rendering of the status embed.
//!
//! Everything here is pure: a [`MatchState`] snapshot plus a [`RenderContext`]
//! in, an [`Embed`] out.

use std::time::SystemTime;

use crate::{
    dto::{
        embed::{Embed, EmbedColor, EmbedField, EmbedFooter},
        format_system_time,
    },
    services::{
        linker::link_display_rows,
        localization::{Localizer, keys},
    },
    state::{catalog::ColorCatalog, match_state::MatchState, phase::GamePhase},
};

/// Collaborators and knobs a render needs besides the match itself.
pub struct RenderContext<'a> {
    /// Source of every user-facing string.
    pub localizer: &'a dyn Localizer,
    /// Colour table used to label player rows.
    pub catalog: ColorCatalog,
    /// Retention of the game-over summary; zero disables the notice.
    pub delete_summary_minutes: u32,
    /// Clock used for the embed timestamp.
    pub timestamp: SystemTime,
}

impl<'a> RenderContext<'a> {
    /// Context stamped with the current time.
    pub fn new(localizer: &'a dyn Localizer, delete_summary_minutes: u32) -> Self {
        Self {
            localizer,
            catalog: ColorCatalog,
            delete_summary_minutes,
            timestamp: SystemTime::now(),
        }
    }

    fn text(&self, key: &str) -> String {
        self.localizer.localize(key, &[])
    }
}

/// Warning state shared by every phase.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StatusLine {
    NotLinked,
    Paused,
    Normal,
}

impl StatusLine {
    fn of(state: &MatchState) -> Self {
        if !state.linked {
            StatusLine::NotLinked
        } else if !state.running {
            StatusLine::Paused
        } else {
            StatusLine::Normal
        }
    }
}

/// Accent colour used when neither warning applies.
pub fn phase_color(phase: GamePhase) -> EmbedColor {
    match phase {
        GamePhase::Menu | GamePhase::Lobby => EmbedColor::Green,
        GamePhase::Tasks => EmbedColor::Blue,
        GamePhase::Discuss => EmbedColor::Purple,
        GamePhase::GameOver => EmbedColor::DarkGold,
    }
}

/// Status description and accent colour; warnings override the phase colour.
pub fn description_and_color(
    state: &MatchState,
    ctx: &RenderContext<'_>,
) -> (Option<String>, EmbedColor) {
    match StatusLine::of(state) {
        StatusLine::NotLinked => (
            Some(ctx.localizer.localize(
                keys::STATUS_NOT_LINKED,
                &[("code", state.connect_code.as_str())],
            )),
            EmbedColor::Red,
        ),
        StatusLine::Paused => (Some(ctx.text(keys::STATUS_PAUSED)), EmbedColor::DarkOrange),
        StatusLine::Normal => (None, phase_color(state.game.phase)),
    }
}

/// Host, linked ratio and voice channel, in that order; absent data is omitted.
pub fn meta_fields(state: &MatchState, ctx: &RenderContext<'_>) -> Vec<EmbedField> {
    let mut fields = Vec::with_capacity(3);

    let leader = &state.status_message.leader_id;
    if !leader.is_empty() {
        fields.push(inline_field(ctx.text(keys::META_HOST), format!("<@{leader}>")));
    }

    let total = state.detected_player_count();
    if total > 0 {
        let linked = state.linked_participant_count().min(total);
        fields.push(inline_field(
            ctx.text(keys::META_PLAYERS_LINKED),
            format!("{linked}/{total}"),
        ));
    }

    if let Some(channel) = state.voice_channel.as_deref().filter(|id| !id.is_empty()) {
        fields.push(inline_field(
            ctx.text(keys::META_VOICE_CHANNEL),
            format!("<#{channel}>"),
        ));
    }

    fields
}

fn inline_field(name: String, value: String) -> EmbedField {
    EmbedField {
        inline: true,
        ..EmbedField::new(name, value)
    }
}

/// One field per detected player, ascending by colour.
///
/// During a round the row shows alive/dead; otherwise it shows the in-game name.
fn player_fields(state: &MatchState, ctx: &RenderContext<'_>) -> Vec<EmbedField> {
    let unlinked = ctx.text(keys::PLAYERS_UNLINKED);
    let in_round = state.game.phase.in_round();

    link_display_rows(state, &ctx.catalog, &unlinked)
        .into_iter()
        .map(|row| {
            let status = if in_round {
                ctx.text(if row.alive {
                    keys::PLAYERS_ALIVE
                } else {
                    keys::PLAYERS_DEAD
                })
            } else {
                row.in_game_name.clone()
            };
            let value = ctx.localizer.localize(
                keys::PLAYERS_ROW,
                &[
                    ("status", status.as_str()),
                    ("glyph", row.resolved.glyph.as_str()),
                    ("color", row.resolved.label.as_str()),
                ],
            );
            EmbedField::new(row.link.label(), value)
        })
        .collect()
}

fn base_message(state: &MatchState, ctx: &RenderContext<'_>, title_key: &str) -> Embed {
    let (description, color) = description_and_color(state, ctx);
    let mut fields = meta_fields(state, ctx);
    fields.extend(player_fields(state, ctx));

    Embed {
        title: Some(ctx.text(title_key)),
        description,
        timestamp: Some(format_system_time(ctx.timestamp)),
        color: color.value(),
        footer: None,
        fields,
    }
}

fn footer_when_normal(state: &MatchState, text: String) -> Option<EmbedFooter> {
    (StatusLine::of(state) == StatusLine::Normal).then_some(EmbedFooter { text })
}

/// Main menu: status, meta block and linking hint.
pub fn menu_message(state: &MatchState, ctx: &RenderContext<'_>) -> Embed {
    let mut embed = base_message(state, ctx, keys::TITLE_MENU);
    embed.footer = footer_when_normal(state, ctx.text(keys::FOOTER_MENU));
    embed
}

/// Lobby: player rows with in-game names and the unlink hint.
pub fn lobby_message(state: &MatchState, ctx: &RenderContext<'_>) -> Embed {
    let mut embed = base_message(state, ctx, keys::TITLE_LOBBY);
    let unlink = ctx.text(keys::CONTROLS_UNLINK);
    embed.footer = footer_when_normal(
        state,
        ctx.localizer
            .localize(keys::FOOTER_LOBBY, &[("unlink", unlink.as_str())]),
    );
    embed
}

/// Tasks and discussion share a layout and differ in title and colour.
pub fn game_play_message(state: &MatchState, ctx: &RenderContext<'_>) -> Embed {
    let title = if state.game.phase == GamePhase::Discuss {
        keys::TITLE_DISCUSS
    } else {
        keys::TITLE_TASKS
    };
    base_message(state, ctx, title)
}

/// Final state with winners, match reference and the delete notice.
pub fn game_over_message(state: &MatchState, ctx: &RenderContext<'_>) -> Embed {
    let mut embed = base_message(state, ctx, keys::TITLE_GAME_OVER);
    let summary = game_over_summary(state, ctx);
    embed.description = Some(match embed.description.take() {
        Some(status) => format!("{status}\n\n{summary}"),
        None => summary,
    });
    embed.footer = delete_notice(ctx);
    embed
}

/// Closing line naming the match (`CODE:id`) and the winners.
pub fn game_over_summary(state: &MatchState, ctx: &RenderContext<'_>) -> String {
    let match_ref = format!("{}:{}", state.connect_code, state.match_id);
    ctx.localizer
        .localize(
            keys::GAME_OVER_SUMMARY,
            &[
                ("match_id", match_ref.as_str()),
                ("winners", state.game.winners.as_deref().unwrap_or_default()),
            ],
        )
        .trim_end()
        .to_string()
}

/// Auto-delete notice, only when a retention window is configured.
pub fn delete_notice(ctx: &RenderContext<'_>) -> Option<EmbedFooter> {
    (ctx.delete_summary_minutes > 0).then(|| EmbedFooter {
        text: ctx.localizer.localize(
            keys::GAME_OVER_DELETE_NOTICE,
            &[("minutes", ctx.delete_summary_minutes.to_string().as_str())],
        ),
    })
}

/// Render the embed for the match's current phase.
pub fn render(state: &MatchState, ctx: &RenderContext<'_>) -> Embed {
    match state.game.phase {
        GamePhase::Menu => menu_message(state, ctx),
        GamePhase::Lobby => lobby_message(state, ctx),
        GamePhase::Tasks | GamePhase::Discuss => game_play_message(state, ctx),
        GamePhase::GameOver => game_over_message(state, ctx),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        platform::SentMessage,
        services::localization::MessageCatalog,
        state::match_state::InGamePlayer,
    };
    use std::time::UNIX_EPOCH;

    const ALL_PHASES: [GamePhase; 5] = [
        GamePhase::Menu,
        GamePhase::Lobby,
        GamePhase::Tasks,
        GamePhase::Discuss,
        GamePhase::GameOver,
    ];

    fn ctx(catalog: &MessageCatalog, minutes: u32) -> RenderContext<'_> {
        RenderContext {
            timestamp: UNIX_EPOCH,
            ..RenderContext::new(catalog, minutes)
        }
    }

    fn running_state(phase: GamePhase) -> MatchState {
        let mut state = MatchState::new("g");
        state.connect_code = "ABCDEFGH".into();
        state.linked = true;
        state.running = true;
        state.game.phase = phase;
        state
    }

    fn add_players(state: &mut MatchState, colors: &[i32]) {
        for color in colors {
            state.upsert_player(InGamePlayer {
                color: *color,
                alive: *color % 2 == 0,
                name: format!("player-{color}"),
            });
        }
    }

    fn field<'e>(embed: &'e Embed, name: &str) -> Option<&'e EmbedField> {
        embed.fields.iter().find(|field| field.name == name)
    }

    #[test]
    fn unlinked_is_red_in_every_phase() {
        let catalog = MessageCatalog::default();
        for phase in ALL_PHASES {
            let mut state = running_state(phase);
            state.linked = false;
            let embed = render(&state, &ctx(&catalog, 0));
            assert_eq!(embed.color, EmbedColor::Red.value(), "{phase:?}");
            assert!(embed.description.unwrap().contains("ABCDEFGH"));
        }
    }

    #[test]
    fn paused_is_dark_orange_in_every_phase() {
        let catalog = MessageCatalog::default();
        for phase in ALL_PHASES {
            let mut state = running_state(phase);
            state.running = false;
            let embed = render(&state, &ctx(&catalog, 0));
            assert_eq!(embed.color, EmbedColor::DarkOrange.value(), "{phase:?}");
            assert_eq!(embed.footer, None, "{phase:?}");
        }
    }

    #[test]
    fn normal_status_uses_phase_colour() {
        let catalog = MessageCatalog::default();
        let expected = [
            (GamePhase::Menu, EmbedColor::Green),
            (GamePhase::Lobby, EmbedColor::Green),
            (GamePhase::Tasks, EmbedColor::Blue),
            (GamePhase::Discuss, EmbedColor::Purple),
            (GamePhase::GameOver, EmbedColor::DarkGold),
        ];
        for (phase, color) in expected {
            let embed = render(&running_state(phase), &ctx(&catalog, 0));
            assert_eq!(embed.color, color.value(), "{phase:?}");
        }
    }

    #[test]
    fn linked_ratio_is_capped_at_detected_players() {
        let catalog = MessageCatalog::default();
        let mut state = running_state(GamePhase::Lobby);
        add_players(&mut state, &[0, 1, 2]);
        for (participant, colour) in [
            ("a", "red"),
            ("b", "blue"),
            ("c", "green"),
            ("d", "red"),
            ("e", "blue"),
        ] {
            state.link_participant(participant, "", colour).unwrap();
        }
        assert_eq!(state.linked_participant_count(), 5);

        let embed = render(&state, &ctx(&catalog, 0));
        assert_eq!(field(&embed, "Players Linked").unwrap().value, "3/3");
    }

    #[test]
    fn ratio_row_is_omitted_without_players() {
        let catalog = MessageCatalog::default();
        let embed = render(&running_state(GamePhase::Lobby), &ctx(&catalog, 0));
        assert!(field(&embed, "Players Linked").is_none());
        assert!(embed.has_valid_fields());
    }

    #[test]
    fn meta_block_lists_host_and_voice_channel() {
        let catalog = MessageCatalog::default();
        let mut state = running_state(GamePhase::Menu);
        state.bind_message(
            "leader-1",
            SentMessage {
                id: "m".into(),
                channel_id: "c".into(),
            },
        );
        state.voice_channel = Some("vc-9".into());

        let embed = render(&state, &ctx(&catalog, 0));
        let names: Vec<_> = embed.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Host", "Voice Channel"]);
        assert_eq!(embed.fields[0].value, "<@leader-1>");
        assert_eq!(embed.fields[1].value, "<#vc-9>");
        assert!(embed.fields.iter().all(|f| f.inline));
    }

    #[test]
    fn player_rows_follow_meta_block_in_colour_order() {
        let catalog = MessageCatalog::default();
        let mut state = running_state(GamePhase::Tasks);
        add_players(&mut state, &[2, 0, 1, 40]);
        state.link_participant("u1", "Uno", "blue").unwrap();

        let embed = render(&state, &ctx(&catalog, 0));
        let rows: Vec<_> = embed
            .fields
            .iter()
            .skip(1)
            .map(|f| (f.name.as_str(), f.value.as_str()))
            .collect();
        assert_eq!(
            rows,
            vec![
                ("Unlinked", "Alive · 🟥 Red"),
                ("Uno", "Dead · 🔵 Blue"),
                ("Unlinked", "Alive · 🌲 Green"),
            ]
        );
    }

    #[test]
    fn lobby_rows_show_in_game_names_and_footer() {
        let catalog = MessageCatalog::default();
        let mut state = running_state(GamePhase::Lobby);
        add_players(&mut state, &[0]);

        let embed = render(&state, &ctx(&catalog, 0));
        assert_eq!(embed.title.as_deref(), Some("Lobby"));
        assert_eq!(embed.fields[1].value, "player-0 · 🟥 Red");
        assert!(embed.footer.unwrap().text.contains("✖ Unlink"));
    }

    #[test]
    fn game_over_carries_summary_and_delete_notice() {
        let catalog = MessageCatalog::default();
        let mut state = running_state(GamePhase::GameOver);
        state.match_id = 42;
        state.game.winners = Some("Crewmates win".into());

        let embed = render(&state, &ctx(&catalog, 5));
        assert_eq!(
            embed.description.as_deref(),
            Some("Game over! Match ID: `ABCDEFGH:42`\nCrewmates win")
        );
        assert_eq!(
            embed.footer.unwrap().text,
            "This summary will be deleted in 5 minute(s)."
        );

        let embed = render(&state, &ctx(&catalog, 0));
        assert_eq!(embed.footer, None);
    }

    #[test]
    fn game_over_without_winners_has_no_trailing_blank() {
        let catalog = MessageCatalog::default();
        let mut state = running_state(GamePhase::GameOver);
        state.match_id = 7;
        assert_eq!(
            game_over_summary(&state, &ctx(&catalog, 0)),
            "Game over! Match ID: `ABCDEFGH:7`"
        );
    }

    #[test]
    fn timestamp_is_rfc3339() {
        let catalog = MessageCatalog::default();
        let embed = render(&running_state(GamePhase::Menu), &ctx(&catalog, 0));
        assert_eq!(embed.timestamp.as_deref(), Some("1970-01-01T00:00:00Z"));
    }
}
