//! Configuration type definitions

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::defaults::*;
use crate::hotkeys::RegistrationPolicy;
use crate::tray_presenter::BadgeRange;

/// User preferences. Every field is optional in the file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Config {
    /// Chord installed at startup, e.g. `"Ctrl+Y+E+S"`
    pub hotkey: String,
    /// Chord reset window in milliseconds (default: 1500)
    pub chord_timeout_ms: u64,
    /// What to do when only some chord stages can be registered
    pub registration_policy: RegistrationPolicy,
    /// Whether the tray badge shows dollars or usage percent
    pub badge_range: BadgeRange,
    /// Brand tag shown in the tray tooltip
    pub brand: String,
    /// Start expanded instead of as a capsule
    pub start_in_panel: bool,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            hotkey: DEFAULT_HOTKEY.to_string(),
            chord_timeout_ms: DEFAULT_CHORD_TIMEOUT_MS,
            registration_policy: RegistrationPolicy::default(),
            badge_range: BadgeRange::default(),
            brand: DEFAULT_BRAND.to_string(),
            start_in_panel: DEFAULT_START_IN_PANEL,
        }
    }
}

impl Config {
    /// Chord timeout, falling back to the default for a zero value.
    pub fn chord_timeout(&self) -> Duration {
        match self.chord_timeout_ms {
            0 => Duration::from_millis(DEFAULT_CHORD_TIMEOUT_MS),
            ms => Duration::from_millis(ms),
        }
    }
}
