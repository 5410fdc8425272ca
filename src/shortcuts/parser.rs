//! Hotkey text parsing.
//!
//! Turns `"Ctrl+Y+E+S"` into a [`ChordSpec`]. Leading modifier names are
//! collected until the first key is accepted; after that every token is a key,
//! even one spelled like a modifier.

use tracing::debug;

use super::types::{ChordSpec, HotkeyParseError, KeyToken, ModifierSet, MAX_SEQUENCE};

/// Parse raw shortcut text into a validated chord.
pub fn parse_hotkey(raw: &str) -> Result<ChordSpec, HotkeyParseError> {
    let input = raw.trim();
    if input.is_empty() {
        return Err(HotkeyParseError::Empty);
    }

    let tokens: Vec<&str> = input
        .split('+')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .collect();
    if tokens.is_empty() {
        return Err(HotkeyParseError::NoTokens);
    }

    let mut modifiers = ModifierSet::empty();
    let mut sequence: Vec<KeyToken> = Vec::new();

    for token in tokens {
        if sequence.is_empty() {
            if let Some(modifier) = ModifierSet::from_name(token) {
                modifiers |= modifier;
                continue;
            }
        }
        let key = KeyToken::normalize(token)
            .ok_or_else(|| HotkeyParseError::UnrecognizedKey(token.to_string()))?;
        sequence.push(key);
    }

    if sequence.is_empty() {
        return Err(HotkeyParseError::MissingKey);
    }
    if sequence.len() > MAX_SEQUENCE {
        return Err(HotkeyParseError::TooManyKeys {
            count: sequence.len(),
            max: MAX_SEQUENCE,
        });
    }

    let spec = ChordSpec::new(input.to_string(), modifiers, sequence);
    debug!(raw = input, display = spec.display(), "Parsed hotkey");
    Ok(spec)
}
