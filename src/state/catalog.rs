//! Static colour table used to label players and build the colour-selection controls.

/// Number of distinct in-game colours.
pub const COLOR_COUNT: usize = 18;

/// Glyph shown when a raw colour label matches no known key.
pub const UNKNOWN_GLYPH: &str = "❓";

/// Raw colour names as reported by the game, indexed by colour id.
const GAME_COLOR_NAMES: [&str; COLOR_COUNT] = [
    "Red", "Blue", "Green", "Pink", "Orange", "Yellow", "Black", "White", "Purple", "Brown",
    "Cyan", "Lime", "Maroon", "Rose", "Banana", "Gray", "Tan", "Coral",
];

/// Display metadata for one canonical colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColorEntry {
    /// Lowercase key matched against raw labels.
    pub key: &'static str,
    /// Human label.
    pub label: &'static str,
    /// Emoji glyph rendered next to the label.
    pub glyph: &'static str,
}

/// Resolved colour description; either a catalog entry or the raw fallback.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedColor {
    /// Human label.
    pub label: String,
    /// Emoji glyph, or [`UNKNOWN_GLYPH`].
    pub glyph: String,
}

/// Ordered key list; resolution walks it front to back and stops at the first hit.
const ENTRIES: [ColorEntry; COLOR_COUNT] = [
    ColorEntry { key: "red", label: "Red", glyph: "🟥" },
    ColorEntry { key: "black", label: "Black", glyph: "⬛" },
    ColorEntry { key: "white", label: "White", glyph: "⬜" },
    ColorEntry { key: "rose", label: "Rose", glyph: "🌸" },
    ColorEntry { key: "blue", label: "Blue", glyph: "🔵" },
    ColorEntry { key: "cyan", label: "Cyan", glyph: "🟦" },
    ColorEntry { key: "yellow", label: "Yellow", glyph: "🟨" },
    ColorEntry { key: "pink", label: "Pink", glyph: "💗" },
    ColorEntry { key: "purple", label: "Purple", glyph: "🟣" },
    ColorEntry { key: "orange", label: "Orange", glyph: "🟧" },
    ColorEntry { key: "banana", label: "Banana", glyph: "🍌" },
    ColorEntry { key: "coral", label: "Coral", glyph: "🧱" },
    ColorEntry { key: "lime", label: "Lime", glyph: "🥬" },
    ColorEntry { key: "green", label: "Green", glyph: "🌲" },
    ColorEntry { key: "gray", label: "Gray", glyph: "🩶" },
    ColorEntry { key: "maroon", label: "Maroon", glyph: "🍷" },
    ColorEntry { key: "brown", label: "Brown", glyph: "🤎" },
    ColorEntry { key: "tan", label: "Tan", glyph: "🟫" },
];

/// Deterministic colour lookup shared by the linker and the controls builder.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorCatalog;

impl ColorCatalog {
    /// Catalog entries in declaration (tie-break) order.
    pub fn entries(&self) -> &'static [ColorEntry] {
        &ENTRIES
    }

    /// Resolve a raw label by case-insensitive substring containment.
    ///
    /// A label such as `"AliveRed"` or `"Red Crewmate"` resolves to the red
    /// entry. When a label contains several keys, the one declared first wins.
    pub fn lookup(&self, raw: &str) -> Option<&'static ColorEntry> {
        let lower = raw.to_lowercase();
        ENTRIES.iter().find(|entry| lower.contains(entry.key))
    }

    /// Like [`ColorCatalog::lookup`] but falls back to the raw label and a placeholder glyph.
    pub fn resolve(&self, raw: &str) -> ResolvedColor {
        match self.lookup(raw) {
            Some(entry) => ResolvedColor {
                label: entry.label.to_string(),
                glyph: entry.glyph.to_string(),
            },
            None => ResolvedColor {
                label: raw.to_string(),
                glyph: UNKNOWN_GLYPH.to_string(),
            },
        }
    }

    /// Raw game name for a colour id, `None` outside `0..=17`.
    pub fn game_color_name(&self, color: i32) -> Option<&'static str> {
        usize::try_from(color)
            .ok()
            .and_then(|index| GAME_COLOR_NAMES.get(index))
            .copied()
    }

    /// Colour id worn in game for a catalog key (`"red"` → `0`).
    pub fn color_index(&self, key: &str) -> Option<i32> {
        let entry = self.lookup(key)?;
        GAME_COLOR_NAMES
            .iter()
            .position(|name| name.eq_ignore_ascii_case(entry.key))
            .and_then(|index| i32::try_from(index).ok())
    }

    /// Resolve the display metadata for a colour id.
    pub fn for_color(&self, color: i32) -> Option<ResolvedColor> {
        self.game_color_name(color).map(|name| self.resolve(name))
    }
}
