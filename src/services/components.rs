//! Colour-selection buttons attached to a freshly created status message.

use crate::{
    dto::embed::{ActionRow, Button},
    state::{catalog::ColorCatalog, match_state::UNLINK_SELECTION},
};

/// Custom-id prefix shared by every colour button.
pub const SELECT_COLOR_PREFIX: &str = "select-color:";
/// Buttons per action row.
pub const BUTTONS_PER_ROW: usize = 5;

/// One button per catalog colour followed by the unlink button, five per row.
pub fn color_control_rows(catalog: &ColorCatalog, unlink_label: &str) -> Vec<ActionRow> {
    let buttons: Vec<Button> = catalog
        .entries()
        .iter()
        .map(|entry| {
            Button::secondary(
                format!("{SELECT_COLOR_PREFIX}{}", entry.key),
                format!("{} {}", entry.glyph, entry.label),
            )
        })
        .chain(std::iter::once(Button::secondary(
            format!("{SELECT_COLOR_PREFIX}{UNLINK_SELECTION}"),
            unlink_label,
        )))
        .collect();

    buttons
        .chunks(BUTTONS_PER_ROW)
        .map(|chunk| ActionRow::new(chunk.to_vec()))
        .collect()
}

/// Selection carried by a button custom id (`"select-color:red"` → `"red"`).
pub fn parse_selection(custom_id: &str) -> Option<&str> {
    custom_id
        .strip_prefix(SELECT_COLOR_PREFIX)
        .filter(|selection| !selection.is_empty())
}
