//! Configuration module - user preferences for the status companion
//!
//! - `defaults` - All default constant values
//! - `types` - `Config` and its accessors
//! - `loader` - File system loading and parsing of `~/.yescode-status/config.json`

mod defaults;
mod loader;
mod types;

pub use defaults::{DEFAULT_BRAND, DEFAULT_CHORD_TIMEOUT_MS, DEFAULT_HOTKEY};

pub use types::Config;

pub use loader::{default_config_path, load_config, load_config_from};

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
