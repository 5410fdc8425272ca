//! Conversion from chord stages to `global_hotkey` types.

use global_hotkey::hotkey::{Code, HotKey, Modifiers};

use super::types::{KeyToken, ModifierSet};
use crate::platform::Platform;

/// One OS-level binding: the chord's modifiers plus a single stage key.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Accelerator {
    pub modifiers: ModifierSet,
    pub key: KeyToken,
}

impl Accelerator {
    pub fn new(modifiers: ModifierSet, key: KeyToken) -> Self {
        Self { modifiers, key }
    }

    /// `Ctrl + Shift + E` style rendering, used in logs and diagnostics.
    pub fn display(&self) -> String {
        let mut parts: Vec<String> = self
            .modifiers
            .display_names()
            .into_iter()
            .map(str::to_string)
            .collect();
        parts.push(self.key.to_string());
        parts.join(" + ")
    }

    /// Build the `global_hotkey` binding, or `None` when the key has no OS code.
    pub fn to_hotkey(&self, platform: Platform) -> Option<HotKey> {
        let code = key_to_code(&self.key)?;
        Some(HotKey::new(
            Some(to_global_modifiers(self.modifiers, platform)),
            code,
        ))
    }
}

/// Map chord modifiers onto `global_hotkey` flags.
///
/// `PRIMARY` resolves to Command on macOS and Control elsewhere.
pub fn to_global_modifiers(set: ModifierSet, platform: Platform) -> Modifiers {
    let mut mods = Modifiers::empty();
    if set.contains(ModifierSet::PRIMARY) {
        mods |= match platform {
            Platform::MacOS => Modifiers::META,
            Platform::Windows | Platform::Linux => Modifiers::CONTROL,
        };
    }
    if set.contains(ModifierSet::COMMAND) {
        mods |= Modifiers::META;
    }
    if set.contains(ModifierSet::ALT) {
        mods |= Modifiers::ALT;
    }
    if set.contains(ModifierSet::SHIFT) {
        mods |= Modifiers::SHIFT;
    }
    if set.contains(ModifierSet::SUPER) {
        mods |= Modifiers::SUPER;
    }
    mods
}

/// Map a canonical key token to a physical key code.
pub fn key_to_code(key: &KeyToken) -> Option<Code> {
    let code = match key.as_str() {
        "Space" => Code::Space,
        "Tab" => Code::Tab,
        "Enter" => Code::Enter,
        "Escape" => Code::Escape,
        "Up" => Code::ArrowUp,
        "Down" => Code::ArrowDown,
        "Left" => Code::ArrowLeft,
        "Right" => Code::ArrowRight,
        "PageUp" => Code::PageUp,
        "PageDown" => Code::PageDown,
        "=" => Code::Equal,
        "," => Code::Comma,
        "." => Code::Period,
        "-" => Code::Minus,
        ";" => Code::Semicolon,
        "'" => Code::Quote,
        "/" => Code::Slash,
        "\\" => Code::Backslash,
        "[" => Code::BracketLeft,
        "]" => Code::BracketRight,
        "`" => Code::Backquote,
        "A" => Code::KeyA,
        "B" => Code::KeyB,
        "C" => Code::KeyC,
        "D" => Code::KeyD,
        "E" => Code::KeyE,
        "F" => Code::KeyF,
        "G" => Code::KeyG,
        "H" => Code::KeyH,
        "I" => Code::KeyI,
        "J" => Code::KeyJ,
        "K" => Code::KeyK,
        "L" => Code::KeyL,
        "M" => Code::KeyM,
        "N" => Code::KeyN,
        "O" => Code::KeyO,
        "P" => Code::KeyP,
        "Q" => Code::KeyQ,
        "R" => Code::KeyR,
        "S" => Code::KeyS,
        "T" => Code::KeyT,
        "U" => Code::KeyU,
        "V" => Code::KeyV,
        "W" => Code::KeyW,
        "X" => Code::KeyX,
        "Y" => Code::KeyY,
        "Z" => Code::KeyZ,
        "0" => Code::Digit0,
        "1" => Code::Digit1,
        "2" => Code::Digit2,
        "3" => Code::Digit3,
        "4" => Code::Digit4,
        "5" => Code::Digit5,
        "6" => Code::Digit6,
        "7" => Code::Digit7,
        "8" => Code::Digit8,
        "9" => Code::Digit9,
        "F1" => Code::F1,
        "F2" => Code::F2,
        "F3" => Code::F3,
        "F4" => Code::F4,
        "F5" => Code::F5,
        "F6" => Code::F6,
        "F7" => Code::F7,
        "F8" => Code::F8,
        "F9" => Code::F9,
        "F10" => Code::F10,
        "F11" => Code::F11,
        "F12" => Code::F12,
        "F13" => Code::F13,
        "F14" => Code::F14,
        "F15" => Code::F15,
        "F16" => Code::F16,
        "F17" => Code::F17,
        "F18" => Code::F18,
        "F19" => Code::F19,
        "F20" => Code::F20,
        "F21" => Code::F21,
        "F22" => Code::F22,
        "F23" => Code::F23,
        "F24" => Code::F24,
        _ => return None,
    };
    Some(code)
}
