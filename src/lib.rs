//! yesCode Status - native integration layer for the yesCode status-bar companion
//!
//! This library provides the chord hotkey recognizer, the panel/capsule
//! window state machine, tray iconography and the stdin boundary protocol.
//! The binary wires them to winit, global-hotkey and tray-icon.

pub mod config;
pub mod error;
pub mod hotkeys;
pub mod logging;
pub mod platform;
pub mod scheduler;
pub mod shortcuts;
pub mod status_app;
pub mod stdin_commands;
pub mod tray;
pub mod tray_presenter;
pub mod window_control;
pub mod window_manager;
pub mod window_state;

#[cfg(test)]
mod test_support;
