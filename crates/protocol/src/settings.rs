use serde::{Deserialize, Serialize};

use crate::theme::Palette;

/// What happens to a comment that finds every visible row occupied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overflow {
    /// Discard the comment.
    #[default]
    Hidden,
    /// Admit it into a deeper lane that reuses the visible rows at a
    /// reduced opacity.
    Stack,
}

/// Read-only layout settings snapshot supplied by the settings provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    /// Number of visible rows.
    pub rows: u32,
    /// Seconds a banner takes to cross the surface.
    pub speed: f64,
    pub overflow: Overflow,
    /// Per-depth opacity decay factor, in `(0, 1]`.
    pub opacity: f64,
    pub palette: Palette,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rows: 12,
            speed: 5.0,
            overflow: Overflow::Hidden,
            opacity: 0.8,
            palette: Palette::default(),
        }
    }
}
