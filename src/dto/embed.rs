//! Chat-platform payload shapes: the status embed and its interactive controls.

use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use utoipa::ToSchema;

const COMPONENT_ACTION_ROW: u8 = 1;
const COMPONENT_BUTTON: u8 = 2;
const BUTTON_STYLE_SECONDARY: u8 = 2;

/// Accent colours used by the status embed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmbedColor {
    /// No colour; placeholder for "use the phase default".
    Default,
    /// Capture client not linked.
    Red,
    /// Tracking paused.
    DarkOrange,
    /// Menu and lobby.
    Green,
    /// Tasks.
    Blue,
    /// Discussion.
    Purple,
    /// Game over.
    DarkGold,
}

impl EmbedColor {
    /// Integer RGB value understood by the platform.
    pub fn value(self) -> u32 {
        match self {
            EmbedColor::Default => 0,
            EmbedColor::Red => 15_158_332,
            EmbedColor::DarkOrange => 11_027_200,
            EmbedColor::Green => 3_066_993,
            EmbedColor::Blue => 3_447_003,
            EmbedColor::Purple => 10_181_046,
            EmbedColor::DarkGold => 12_745_742,
        }
    }
}

/// Structured rich-message payload (title, description, colour, fields).
#[skip_serializing_none]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Embed {
    /// Heading line.
    pub title: Option<String>,
    /// Status line and extra text.
    pub description: Option<String>,
    /// RFC 3339 timestamp shown in the embed footer.
    pub timestamp: Option<String>,
    /// Accent colour as `0xRRGGBB`.
    pub color: u32,
    /// Hint shown below the fields.
    pub footer: Option<EmbedFooter>,
    /// Meta block followed by player rows.
    #[serde(default)]
    pub fields: Vec<EmbedField>,
}

/// A single name/value block inside an [`Embed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EmbedField {
    /// Field heading.
    pub name: String,
    /// Field body.
    pub value: String,
    /// Whether the field may share a line with its neighbours.
    #[serde(default)]
    pub inline: bool,
}

/// Footer line of an [`Embed`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct EmbedFooter {
    /// Footer text.
    pub text: String,
}

impl Embed {
    /// True when every field carries a non-empty name and value.
    ///
    /// The platform rejects empty field parts, and a half-built state should
    /// never reach users anyway.
    pub fn has_valid_fields(&self) -> bool {
        self.fields
            .iter()
            .all(|field| !field.name.is_empty() && !field.value.is_empty())
    }
}

impl EmbedField {
    /// Build a non-inline field.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            inline: false,
        }
    }
}

/// Row of up to five buttons.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionRow {
    #[serde(rename = "type")]
    kind: u8,
    /// Buttons in display order.
    pub components: Vec<Button>,
}

impl ActionRow {
    /// Wrap the given buttons in a row.
    pub fn new(components: Vec<Button>) -> Self {
        Self {
            kind: COMPONENT_ACTION_ROW,
            components,
        }
    }
}

/// Clickable control attached to a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Button {
    #[serde(rename = "type")]
    kind: u8,
    style: u8,
    /// Button text.
    pub label: String,
    /// Identifier echoed back on interaction.
    pub custom_id: String,
}

impl Button {
    /// Grey button carrying `custom_id` back in the interaction.
    pub fn secondary(custom_id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            kind: COMPONENT_BUTTON,
            style: BUTTON_STYLE_SECONDARY,
            label: label.into(),
            custom_id: custom_id.into(),
        }
    }
}
