//! Tests for chord parsing and canonical key handling.

use super::*;
use crate::platform::Platform;
use global_hotkey::hotkey::{Code, Modifiers};

fn keys(spec: &ChordSpec) -> Vec<&str> {
    spec.sequence().iter().map(KeyToken::as_str).collect()
}

// ========================================
// parse_hotkey: happy paths
// ========================================

#[test]
fn test_parse_default_chord() {
    let spec = parse_hotkey("Ctrl+Y+E+S").unwrap();
    assert_eq!(spec.modifiers(), ModifierSet::PRIMARY);
    assert_eq!(keys(&spec), vec!["Y", "E", "S"]);
    assert_eq!(spec.display(), "Ctrl + Y + E + S");
    assert_eq!(spec.raw(), "Ctrl+Y+E+S");
}

#[test]
fn test_parse_trims_input_and_tokens() {
    let spec = parse_hotkey("  ctrl + shift +  k ").unwrap();
    assert_eq!(spec.raw(), "ctrl + shift +  k");
    assert_eq!(spec.modifiers(), ModifierSet::PRIMARY | ModifierSet::SHIFT);
    assert_eq!(keys(&spec), vec!["K"]);
    assert_eq!(spec.display(), "Ctrl + Shift + K");
}

#[test]
fn test_parse_defaults_to_primary_modifier() {
    let spec = parse_hotkey("F5").unwrap();
    assert_eq!(spec.modifiers(), ModifierSet::PRIMARY);
    assert_eq!(spec.display(), "Ctrl + F5");
    assert!(spec.is_single_stage());
}

#[test]
fn test_parse_modifier_aliases() {
    let spec = parse_hotkey("command+option+meta+A").unwrap();
    assert_eq!(
        spec.modifiers(),
        ModifierSet::COMMAND | ModifierSet::ALT | ModifierSet::SUPER
    );
    assert_eq!(spec.display(), "Cmd + Alt + Win + A");
}

#[test]
fn test_parse_modifiers_are_deduplicated_and_order_insensitive() {
    let a = parse_hotkey("Shift+Ctrl+Control+X").unwrap();
    let b = parse_hotkey("Ctrl+Shift+X").unwrap();
    assert_eq!(a.modifiers(), b.modifiers());
    assert_eq!(a.display(), b.display());
    assert_eq!(a.display(), "Ctrl + Shift + X");
}

#[test]
fn test_parse_named_keys() {
    let spec = parse_hotkey("Alt+space+Return+esc+PageDown").unwrap();
    assert_eq!(keys(&spec), vec!["Space", "Enter", "Escape", "PageDown"]);
}

#[test]
fn test_parse_plus_comma_period_names() {
    let spec = parse_hotkey("Ctrl+plus+comma+period").unwrap();
    assert_eq!(keys(&spec), vec!["=", ",", "."]);
}

#[test]
fn test_parse_function_keys_uppercase() {
    let spec = parse_hotkey("shift+f12+F3").unwrap();
    assert_eq!(keys(&spec), vec!["F12", "F3"]);
}

#[test]
fn test_parse_modifier_name_after_key_is_literal() {
    // "A" closes modifier collection; "alt" is then a key token and is not a key
    let err = parse_hotkey("Ctrl+A+alt").unwrap_err();
    assert_eq!(err, HotkeyParseError::UnrecognizedKey("alt".to_string()));
}

#[test]
fn test_parse_single_char_modifier_lookalike_after_key() {
    let spec = parse_hotkey("Ctrl+Y+e+s").unwrap();
    assert_eq!(keys(&spec), vec!["Y", "E", "S"]);
}

#[test]
fn test_parse_repeated_key_is_kept() {
    let spec = parse_hotkey("Ctrl+A+A").unwrap();
    assert_eq!(keys(&spec), vec!["A", "A"]);
}

// ========================================
// parse_hotkey: errors
// ========================================

#[test]
fn test_parse_empty_is_error() {
    assert_eq!(parse_hotkey(""), Err(HotkeyParseError::Empty));
    assert_eq!(parse_hotkey("   "), Err(HotkeyParseError::Empty));
}

#[test]
fn test_parse_only_separators_is_error() {
    assert_eq!(parse_hotkey("+ +"), Err(HotkeyParseError::NoTokens));
}

#[test]
fn test_parse_only_modifiers_is_error() {
    let err = parse_hotkey("Ctrl+Shift").unwrap_err();
    assert_eq!(err, HotkeyParseError::MissingKey);
    assert!(err.to_string().contains("at least one concrete key"));
}

#[test]
fn test_parse_five_keys_is_error() {
    let err = parse_hotkey("A+B+C+D+E").unwrap_err();
    assert_eq!(err, HotkeyParseError::TooManyKeys { count: 5, max: 4 });
    assert!(err.to_string().contains("at most 4 keys"));
}

#[test]
fn test_parse_four_keys_is_ok() {
    let spec = parse_hotkey("A+B+C+D").unwrap();
    assert_eq!(spec.len(), 4);
}

#[test]
fn test_parse_unknown_word_is_error() {
    let err = parse_hotkey("Ctrl+Hyper").unwrap_err();
    assert_eq!(err, HotkeyParseError::UnrecognizedKey("Hyper".to_string()));
    assert!(err.to_string().contains("Hyper"));
}

#[test]
fn test_parse_three_digit_function_key_is_error() {
    assert!(matches!(
        parse_hotkey("F100"),
        Err(HotkeyParseError::UnrecognizedKey(_))
    ));
}

// ========================================
// ChordSpec helpers
// ========================================

#[test]
fn test_stage_display() {
    let spec = parse_hotkey("Ctrl+Shift+Y+E").unwrap();
    assert_eq!(spec.stage_display(1).as_deref(), Some("Ctrl + Shift + E"));
    assert_eq!(spec.stage_display(2), None);
}

// ========================================
// Accelerator conversion
// ========================================

#[test]
fn test_primary_modifier_maps_per_platform() {
    assert_eq!(
        to_global_modifiers(ModifierSet::PRIMARY, Platform::MacOS),
        Modifiers::META
    );
    assert_eq!(
        to_global_modifiers(ModifierSet::PRIMARY, Platform::Windows),
        Modifiers::CONTROL
    );
    assert_eq!(
        to_global_modifiers(ModifierSet::ALT | ModifierSet::SHIFT, Platform::Linux),
        Modifiers::ALT | Modifiers::SHIFT
    );
}

#[test]
fn test_key_to_code() {
    let spec = parse_hotkey("Ctrl+Y+F24+plus+Up").unwrap();
    let codes: Vec<_> = spec.sequence().iter().map(key_to_code).collect();
    assert_eq!(
        codes,
        vec![
            Some(Code::KeyY),
            Some(Code::F24),
            Some(Code::Equal),
            Some(Code::ArrowUp)
        ]
    );
}

#[test]
fn test_key_without_os_code() {
    let spec = parse_hotkey("Ctrl+F99").unwrap();
    assert_eq!(key_to_code(&spec.sequence()[0]), None);
    let accel = Accelerator::new(spec.modifiers(), spec.sequence()[0].clone());
    assert!(accel.to_hotkey(Platform::Linux).is_none());
    assert_eq!(accel.display(), "Ctrl + F99");
}
