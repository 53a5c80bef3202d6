//! Display configuration for the item engine.

use serde::{Deserialize, Serialize};

/// Device-wide display setting.
///
/// Expert mode adds items (chain id, timestamps, gas, hashes) for the same transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum DisplayMode {
    /// Regular review.
    #[default]
    Normal,
    /// Detailed review.
    Expert,
}

impl DisplayMode {
    /// Returns `true` in expert mode.
    pub fn is_expert(&self) -> bool {
        matches!(self, DisplayMode::Expert)
    }
}

impl From<bool> for DisplayMode {
    fn from(expert: bool) -> Self {
        if expert {
            DisplayMode::Expert
        } else {
            DisplayMode::Normal
        }
    }
}

/// How items are laid out on screen.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Initial display mode.
    pub mode: DisplayMode,
    /// Characters of a value shown per page.
    pub value_width: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            mode: DisplayMode::Normal,
            value_width: 39,
        }
    }
}
