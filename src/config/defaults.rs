//! Default configuration values

/// Chord installed when the user has not chosen one.
pub const DEFAULT_HOTKEY: &str = "Ctrl+Y+E+S";

/// Inactivity window before a half-typed chord resets.
pub const DEFAULT_CHORD_TIMEOUT_MS: u64 = 1500;

/// Brand tag at the start of the tray tooltip.
pub const DEFAULT_BRAND: &str = "yesCode";

pub const DEFAULT_START_IN_PANEL: bool = false;

/// Config file location, tilde-expanded at load time.
pub const CONFIG_PATH: &str = "~/.yescode-status/config.json";
