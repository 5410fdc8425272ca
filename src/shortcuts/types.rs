//! Core chord types with proper error handling and deterministic display.
//!
//! This module provides:
//! - `ModifierSet` - Modifier flags held across every stage of a chord
//! - `KeyToken` - One canonical key in a chord sequence
//! - `ChordSpec` - A validated multi-stage shortcut (modifiers + 1..=4 keys)
//! - `HotkeyParseError` - Detailed parse errors for user feedback

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Longest key sequence a chord may contain.
pub const MAX_SEQUENCE: usize = 4;

/// Errors that can occur when parsing a hotkey string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HotkeyParseError {
    #[error("hotkey must not be empty (for example Ctrl+Y+E+S)")]
    Empty,
    #[error("hotkey has no usable tokens, only separators")]
    NoTokens,
    #[error("unrecognized key '{0}'")]
    UnrecognizedKey(String),
    #[error("need at least one concrete key (for example Y or F1)")]
    MissingKey,
    #[error("at most {max} keys supported, got {count}")]
    TooManyKeys { count: usize, max: usize },
}

bitflags! {
    /// Modifier keys held for every stage of a chord.
    ///
    /// `PRIMARY` is the platform accelerator: Command on macOS, Control elsewhere.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    pub struct ModifierSet: u8 {
        const PRIMARY = 1 << 0;
        const COMMAND = 1 << 1;
        const ALT = 1 << 2;
        const SHIFT = 1 << 3;
        const SUPER = 1 << 4;
    }
}

impl ModifierSet {
    /// Resolve a user-facing modifier name (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "ctrl" | "control" => Some(Self::PRIMARY),
            "cmd" | "command" => Some(Self::COMMAND),
            "option" | "alt" => Some(Self::ALT),
            "shift" => Some(Self::SHIFT),
            "super" | "meta" | "win" => Some(Self::SUPER),
            _ => None,
        }
    }

    /// Display aliases in canonical order.
    pub fn display_names(&self) -> Vec<&'static str> {
        let mut names = Vec::new();
        if self.contains(Self::PRIMARY) {
            names.push("Ctrl");
        }
        if self.contains(Self::COMMAND) {
            names.push("Cmd");
        }
        if self.contains(Self::ALT) {
            names.push("Alt");
        }
        if self.contains(Self::SHIFT) {
            names.push("Shift");
        }
        if self.contains(Self::SUPER) {
            names.push("Win");
        }
        names
    }
}

/// A single key in canonical form: named keys (`Space`, `PageUp`, `=`),
/// function keys (`F1`) or one uppercased character.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KeyToken(String);

impl KeyToken {
    /// Normalize a raw token, or `None` when it names no key.
    pub fn normalize(token: &str) -> Option<Self> {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return None;
        }
        if let Some(named) = named_key(&trimmed.to_lowercase()) {
            return Some(Self(named.to_string()));
        }
        if is_function_key(trimmed) {
            return Some(Self(trimmed.to_uppercase()));
        }
        let mut chars = trimmed.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(Self(c.to_uppercase().collect())),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KeyToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn named_key(lower: &str) -> Option<&'static str> {
    let name = match lower {
        "space" => "Space",
        "tab" => "Tab",
        "enter" | "return" => "Enter",
        "esc" | "escape" => "Escape",
        "up" | "arrowup" => "Up",
        "down" | "arrowdown" => "Down",
        "left" | "arrowleft" => "Left",
        "right" | "arrowright" => "Right",
        "plus" => "=",
        "comma" => ",",
        "period" => ".",
        "pageup" => "PageUp",
        "pagedown" => "PageDown",
        _ => return None,
    };
    Some(name)
}

/// `F` followed by one or two digits, either case.
fn is_function_key(token: &str) -> bool {
    let mut chars = token.chars();
    if !matches!(chars.next(), Some('f' | 'F')) {
        return false;
    }
    let digits = chars.as_str();
    (1..=2).contains(&digits.len()) && digits.chars().all(|c| c.is_ascii_digit())
}

/// A validated multi-stage shortcut.
///
/// Immutable once produced; a new shortcut replaces it wholesale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChordSpec {
    raw: String,
    modifiers: ModifierSet,
    sequence: Vec<KeyToken>,
    display: String,
}

impl ChordSpec {
    /// Build a chord from already-validated parts. `sequence` must hold 1..=4 keys.
    pub(crate) fn new(raw: String, modifiers: ModifierSet, sequence: Vec<KeyToken>) -> Self {
        debug_assert!(!sequence.is_empty() && sequence.len() <= MAX_SEQUENCE);
        let modifiers = if modifiers.is_empty() {
            ModifierSet::PRIMARY
        } else {
            modifiers
        };
        let display = modifiers
            .display_names()
            .into_iter()
            .map(str::to_string)
            .chain(sequence.iter().map(|k| k.to_string()))
            .collect::<Vec<_>>()
            .join(" + ");
        Self {
            raw,
            modifiers,
            sequence,
            display,
        }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn modifiers(&self) -> ModifierSet {
        self.modifiers
    }

    pub fn sequence(&self) -> &[KeyToken] {
        &self.sequence
    }

    /// Number of stages (always at least 1).
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    pub fn is_single_stage(&self) -> bool {
        self.sequence.len() == 1
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    /// Display string for one stage, e.g. `Ctrl + E`.
    pub fn stage_display(&self, stage: usize) -> Option<String> {
        let key = self.sequence.get(stage)?;
        let mut parts: Vec<String> = self
            .modifiers
            .display_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        parts.push(key.to_string());
        Some(parts.join(" + "))
    }
}

impl fmt::Display for ChordSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}
