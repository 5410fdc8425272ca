//! Boundary commands via stdin.
//!
//! The companion UI (or a test harness) drives the native layer by writing
//! JSON objects to stdin, one per line. Commands that answer write one JSON
//! line to stdout.
//!
//! # Protocol
//!
//! ```json
//! {"type": "set-global-hotkey", "raw": "Ctrl+Y+E+S", "requestId": "1"}
//! {"type": "resize-window", "height": 240}
//! {"type": "move-window", "x": 100, "y": 40}
//! {"type": "get-window-position", "requestId": "2"}
//! {"type": "open-floating-window"}
//! {"type": "toggle-taskbar-panel"}
//! {"type": "minimize-window"}
//! {"type": "hide-window"}
//! {"type": "quit-app"}
//! {"type": "update-tray-tooltip", "total": 12.5, "usage": 37.2}
//! ```
//!
//! Responses echo the command type and `requestId`:
//!
//! ```json
//! {"type":"set-global-hotkey","requestId":"1","result":{"success":true,"display":"Ctrl + Y + E + S"}}
//! {"type":"get-window-position","requestId":"2","result":{"x":1628,"y":872,"width":280,"height":136}}
//! ```

use std::io::{BufRead, Write};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::error::StatusError;
use crate::window_state::Bounds;

/// Commands the companion UI can send.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ExternalCommand {
    /// Parse and install a new chord
    SetGlobalHotkey { raw: String },
    /// Panel height; ignored outside panel mode
    ResizeWindow { height: f64 },
    MoveWindow { x: f64, y: f64 },
    GetWindowPosition,
    /// Show the panel
    OpenFloatingWindow,
    /// Switch between panel and capsule
    ToggleTaskbarPanel,
    /// Collapse to the capsule
    MinimizeWindow,
    HideWindow,
    QuitApp,
    UpdateTrayTooltip {
        #[serde(default)]
        total: f64,
        #[serde(default)]
        usage: f64,
    },
}

impl ExternalCommand {
    /// Wire name, echoed in responses.
    pub fn name(&self) -> &'static str {
        match self {
            ExternalCommand::SetGlobalHotkey { .. } => "set-global-hotkey",
            ExternalCommand::ResizeWindow { .. } => "resize-window",
            ExternalCommand::MoveWindow { .. } => "move-window",
            ExternalCommand::GetWindowPosition => "get-window-position",
            ExternalCommand::OpenFloatingWindow => "open-floating-window",
            ExternalCommand::ToggleTaskbarPanel => "toggle-taskbar-panel",
            ExternalCommand::MinimizeWindow => "minimize-window",
            ExternalCommand::HideWindow => "hide-window",
            ExternalCommand::QuitApp => "quit-app",
            ExternalCommand::UpdateTrayTooltip { .. } => "update-tray-tooltip",
        }
    }
}

/// A command plus its optional correlation id.
///
/// When present, the request id is logged with the command and echoed in
/// the response, so callers can trace a request through the logs.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CommandRequest {
    #[serde(flatten)]
    pub command: ExternalCommand,
    #[serde(default, rename = "requestId")]
    pub request_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HotkeyResult {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum CommandResult {
    Hotkey(HotkeyResult),
    Position(Bounds),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandResponse {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(rename = "requestId", skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    pub result: CommandResult,
}

/// Parse one stdin line. Blank lines yield `None`.
pub fn parse_command_line(line: &str) -> Option<crate::error::Result<CommandRequest>> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }
    Some(serde_json::from_str(line).map_err(StatusError::from))
}

/// Start a thread that reads JSONL commands from stdin.
///
/// Each parsed command is handed to `forward`; the thread exits when stdin
/// closes or `forward` returns false (the receiving side is gone).
/// Malformed lines are logged and skipped.
pub fn start_stdin_listener<F>(mut forward: F) -> std::io::Result<std::thread::JoinHandle<()>>
where
    F: FnMut(CommandRequest) -> bool + Send + 'static,
{
    std::thread::Builder::new()
        .name("stdin-commands".into())
        .spawn(move || {
            info!("External command listener started");
            let stdin = std::io::stdin();
            for line in stdin.lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(e) => {
                        warn!(error = %e, "Error reading stdin");
                        break;
                    }
                };
                match parse_command_line(&line) {
                    None => {}
                    Some(Ok(request)) => {
                        debug!(
                            command = request.command.name(),
                            request_id = ?request.request_id,
                            "Parsed command"
                        );
                        if !forward(request) {
                            info!("Command receiver closed, exiting");
                            break;
                        }
                    }
                    Some(Err(e)) => {
                        warn!(error = %e, line = %line, "Failed to parse command");
                    }
                }
            }
            info!("External command listener exiting");
        })
}

/// Write one response line and flush.
pub fn write_response<W: Write>(writer: &mut W, response: &CommandResponse) -> std::io::Result<()> {
    serde_json::to_writer(&mut *writer, response)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

// ============================================================================
// Tests
// ============================================================================
