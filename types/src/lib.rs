//! Shared configuration types for rezwatch
//!
//! This crate contains serializable configuration types that are shared between
//! the tracking engine (rezwatch-core) and any frontend that edits them.

use serde::{Deserialize, Serialize};

// ─────────────────────────────────────────────────────────────────────────────
// Color Type
// ─────────────────────────────────────────────────────────────────────────────

/// RGBA color as [r, g, b, a] bytes
pub type Color = [u8; 4];

/// Default colors for highlight states
pub mod highlight_colors {
    use super::Color;

    pub const CURRENTLY_RAISING: Color = [80, 200, 80, 160]; // Green
    pub const ALREADY_RAISED: Color = [140, 90, 220, 160]; // Purple
    pub const REDUNDANT: Color = [220, 60, 60, 160]; // Red
    pub const DISPELLABLE: Color = [230, 200, 60, 160]; // Yellow
    pub const CURRENTLY_DISPELLING: Color = [60, 170, 230, 160]; // Blue
    pub const IN_WORLD_BG_RAISE: Color = [30, 30, 30, 200];
    pub const IN_WORLD_BG_DISPEL: Color = [40, 25, 50, 200];

    /// Format a color as `#RRGGBBAA` (used for "reset to default" tooltips)
    pub fn to_hex(color: Color) -> String {
        format!(
            "#{:02X}{:02X}{:02X}{:02X}",
            color[0], color[1], color[2], color[3]
        )
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Rectangle Style
// ─────────────────────────────────────────────────────────────────────────────

/// How highlight rectangles are drawn on party/alliance frames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RectType {
    /// Translucent fill
    #[default]
    Filled,
    /// Translucent outline only
    OutlineOnly,
    /// Outline drawn at full opacity
    OpaqueOutlineOnly,
    /// Translucent fill plus a fully opaque outline
    FilledOpaqueOutline,
}

impl RectType {
    pub const ALL: [RectType; 4] = [
        RectType::Filled,
        RectType::OutlineOnly,
        RectType::OpaqueOutlineOnly,
        RectType::FilledOpaqueOutline,
    ];

    /// Whether the rectangle interior is painted (cast progress needs a fill)
    pub fn fills(&self) -> bool {
        matches!(self, RectType::Filled | RectType::FilledOpaqueOutline)
    }

    /// Whether the outline is forced to full alpha
    pub fn opaque_outline(&self) -> bool {
        matches!(
            self,
            RectType::OpaqueOutlineOnly | RectType::FilledOpaqueOutline
        )
    }

    pub fn label(&self) -> &'static str {
        match self {
            RectType::Filled => "Filled",
            RectType::OutlineOnly => "Outline only",
            RectType::OpaqueOutlineOnly => "Fully opaque outline only",
            RectType::FilledOpaqueOutline => "Filled and fully opaque outline",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Highlight Settings
// ─────────────────────────────────────────────────────────────────────────────

pub const MIN_ICON_SCALE: f32 = 0.1;
pub const MAX_ICON_SCALE: f32 = 3.0;

/// Presentation settings for raise/dispel highlighting.
///
/// Every toggle is a pure display gate; the tracking engine computes its
/// state regardless of these values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighlightConfig {
    /// Master switch
    #[serde(default = "default_true")]
    pub enabled: bool,

    // ─── Raise ──────────────────────────────────────────────────────────────
    #[serde(default = "default_true")]
    pub enabled_raise: bool,
    /// Only show raise info when the local player can raise
    #[serde(default)]
    pub restricted_jobs: bool,
    #[serde(default = "default_true")]
    pub show_icon: bool,
    #[serde(default = "default_true")]
    pub show_in_world_text: bool,

    // ─── Dispel ─────────────────────────────────────────────────────────────
    #[serde(default = "default_true")]
    pub enabled_dispel: bool,
    /// Only show dispel info when the local player can dispel
    #[serde(default)]
    pub restricted_jobs_dispel: bool,
    #[serde(default = "default_true")]
    pub show_icon_dispel: bool,
    #[serde(default = "default_true")]
    pub show_in_world_text_dispel: bool,

    // ─── General ────────────────────────────────────────────────────────────
    #[serde(default)]
    pub show_cast_progress: bool,
    #[serde(default)]
    pub hide_symbols_on_self: bool,
    /// Highlight the local player's own frame
    #[serde(default = "default_true")]
    pub show_self: bool,
    #[serde(default = "default_true")]
    pub show_group_frame: bool,
    #[serde(default = "default_true")]
    pub show_alliance_frame: bool,
    #[serde(default = "default_true")]
    pub show_caster_names: bool,
    #[serde(default)]
    pub rect_type: RectType,
    #[serde(default = "default_icon_scale")]
    pub icon_scale: f32,

    // ─── Colors ─────────────────────────────────────────────────────────────
    #[serde(default = "default_currently_raising_color")]
    pub currently_raising_color: Color,
    #[serde(default = "default_raised_color")]
    pub raised_color: Color,
    /// Shared by redundant raises and redundant dispels
    #[serde(default = "default_redundant_color")]
    pub redundant_color: Color,
    #[serde(default = "default_dispellable_color")]
    pub dispellable_color: Color,
    #[serde(default = "default_currently_dispelling_color")]
    pub currently_dispelling_color: Color,
    #[serde(default = "default_in_world_bg_raise")]
    pub in_world_background_color: Color,
    #[serde(default = "default_in_world_bg_dispel")]
    pub in_world_background_color_dispel: Color,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            enabled_raise: true,
            restricted_jobs: false,
            show_icon: true,
            show_in_world_text: true,
            enabled_dispel: true,
            restricted_jobs_dispel: false,
            show_icon_dispel: true,
            show_in_world_text_dispel: true,
            show_cast_progress: false,
            hide_symbols_on_self: false,
            show_self: true,
            show_group_frame: true,
            show_alliance_frame: true,
            show_caster_names: true,
            rect_type: RectType::Filled,
            icon_scale: 1.0,
            currently_raising_color: highlight_colors::CURRENTLY_RAISING,
            raised_color: highlight_colors::ALREADY_RAISED,
            redundant_color: highlight_colors::REDUNDANT,
            dispellable_color: highlight_colors::DISPELLABLE,
            currently_dispelling_color: highlight_colors::CURRENTLY_DISPELLING,
            in_world_background_color: highlight_colors::IN_WORLD_BG_RAISE,
            in_world_background_color_dispel: highlight_colors::IN_WORLD_BG_DISPEL,
        }
    }
}

impl HighlightConfig {
    /// Icon scale clamped to the supported range
    pub fn clamped_icon_scale(&self) -> f32 {
        if self.icon_scale.is_nan() {
            return 1.0;
        }
        self.icon_scale.clamp(MIN_ICON_SCALE, MAX_ICON_SCALE)
    }

    /// Set the icon scale, clamping to the supported range
    pub fn set_icon_scale(&mut self, scale: f32) {
        self.icon_scale = scale.clamp(MIN_ICON_SCALE, MAX_ICON_SCALE);
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tracking Settings
// ─────────────────────────────────────────────────────────────────────────────

/// Tuning for the tracking engine itself (not presentation)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackingSettings {
    /// Forget handles/actors not seen for this many consecutive ticks
    #[serde(default = "default_evict_after_ticks")]
    pub evict_after_ticks: u32,
    /// Drop a cast whose elapsed time has not advanced for this long
    #[serde(default = "default_stale_cast_secs")]
    pub stale_cast_secs: f32,
}

impl Default for TrackingSettings {
    fn default() -> Self {
        Self {
            evict_after_ticks: default_evict_after_ticks(),
            stale_cast_secs: default_stale_cast_secs(),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Application Config
// ─────────────────────────────────────────────────────────────────────────────

/// Everything persisted between sessions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Status ids the user moved to the ignored list
    #[serde(default)]
    pub disabled_statuses: Vec<u32>,
    #[serde(default)]
    pub highlight: HighlightConfig,
    #[serde(default)]
    pub tracking: TrackingSettings,
}

// ─────────────────────────────────────────────────────────────────────────────
// Serde Default Helpers
// ─────────────────────────────────────────────────────────────────────────────

fn default_true() -> bool {
    true
}
fn default_icon_scale() -> f32 {
    1.0
}
fn default_currently_raising_color() -> Color {
    highlight_colors::CURRENTLY_RAISING
}
fn default_raised_color() -> Color {
    highlight_colors::ALREADY_RAISED
}
fn default_redundant_color() -> Color {
    highlight_colors::REDUNDANT
}
fn default_dispellable_color() -> Color {
    highlight_colors::DISPELLABLE
}
fn default_currently_dispelling_color() -> Color {
    highlight_colors::CURRENTLY_DISPELLING
}
fn default_in_world_bg_raise() -> Color {
    highlight_colors::IN_WORLD_BG_RAISE
}
fn default_in_world_bg_dispel() -> Color {
    highlight_colors::IN_WORLD_BG_DISPEL
}
fn default_evict_after_ticks() -> u32 {
    120
}
fn default_stale_cast_secs() -> f32 {
    5.0
}
