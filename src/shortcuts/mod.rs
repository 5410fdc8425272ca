//! Hotkey chord parsing.
//!
//! This module provides:
//! - Parsing of human-readable shortcut text into multi-stage chords
//! - Canonical key/modifier normalization
//! - Conversion of a chord stage into an OS accelerator
//!
//! # Example
//!
//! ```
//! use yescode_status::shortcuts::parse_hotkey;
//!
//! let chord = parse_hotkey("Ctrl+Y+E+S").unwrap();
//! assert_eq!(chord.display(), "Ctrl + Y + E + S");
//! assert_eq!(chord.len(), 3);
//! ```

mod hotkey_compat;
mod parser;
mod types;

#[cfg(test)]
#[path = "types_tests.rs"]
mod types_tests;

pub use hotkey_compat::{key_to_code, to_global_modifiers, Accelerator};
pub use parser::parse_hotkey;
pub use types::{ChordSpec, HotkeyParseError, KeyToken, ModifierSet, MAX_SEQUENCE};
