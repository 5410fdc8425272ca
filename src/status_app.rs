//! Boundary layer.
//!
//! [`StatusApp`] owns the chord engine, the window controller and the tray
//! presenter, and routes every OS event and boundary command into them. The
//! host loop calls it from one thread; nothing here blocks.

use tracing::{debug, info, warn};

use crate::hotkeys::{AcceleratorId, HotkeySequenceEngine, StageOutcome};
use crate::scheduler::TimerId;
use crate::shortcuts::parse_hotkey;
use crate::stdin_commands::{
    CommandRequest, CommandResponse, CommandResult, ExternalCommand, HotkeyResult,
};
use crate::tray::{TrayMenuAction, TraySurface};
use crate::tray_presenter::TrayPresenter;
use crate::window_manager::{CloseDecision, WindowHost, WindowModeController};
use crate::window_state::{Bounds, PresentationMode};

pub struct StatusApp {
    engine: HotkeySequenceEngine,
    windows: WindowModeController,
    tray: TrayPresenter,
    exit_requested: bool,
}

impl StatusApp {
    pub fn new(
        engine: HotkeySequenceEngine,
        windows: WindowModeController,
        tray: TrayPresenter,
    ) -> Self {
        Self {
            engine,
            windows,
            tray,
            exit_requested: false,
        }
    }

    pub fn engine(&self) -> &HotkeySequenceEngine {
        &self.engine
    }

    pub fn windows(&self) -> &WindowModeController {
        &self.windows
    }

    pub fn attach_window(&mut self, window: Box<dyn WindowHost>) {
        self.windows.attach_window(window);
    }

    pub fn attach_tray(&mut self, surface: Box<dyn TraySurface>) {
        self.tray.attach(surface);
    }

    /// Install the configured chord and show the initial presentation.
    ///
    /// A chord that fails to install is logged; the app keeps running
    /// without one.
    pub fn start(&mut self, hotkey: &str, start_in_panel: bool) -> HotkeyResult {
        let result = self.set_global_hotkey(hotkey);
        if !result.success {
            warn!(hotkey, error = ?result.error, "Starting without a global hotkey");
        }
        if start_in_panel {
            self.windows.show_panel();
        } else {
            self.windows.show_capsule();
        }
        result
    }

    /// Parse `raw`, then install it as the active chord.
    pub fn set_global_hotkey(&mut self, raw: &str) -> HotkeyResult {
        let spec = match parse_hotkey(raw) {
            Ok(spec) => spec,
            Err(e) => {
                warn!(raw, error = %e, "Rejected hotkey");
                return HotkeyResult {
                    success: false,
                    error: Some(e.to_string()),
                    display: None,
                };
            }
        };
        match self.engine.install(spec) {
            Ok(report) => HotkeyResult {
                success: true,
                error: report.diagnostic(),
                display: Some(report.display),
            },
            Err(e) => HotkeyResult {
                success: false,
                error: Some(e.to_string()),
                display: None,
            },
        }
    }

    // ------------------------------------------------------------------
    // OS events
    // ------------------------------------------------------------------

    /// A completed chord brings up the capsule.
    pub fn on_accelerator(&mut self, id: AcceleratorId) -> StageOutcome {
        let outcome = self.engine.on_accelerator(id);
        if outcome == StageOutcome::Completed {
            self.windows.show_capsule();
        }
        outcome
    }

    pub fn on_timer(&mut self, id: TimerId) {
        self.engine.on_timer(id);
    }

    pub fn on_tray_click(&mut self) {
        self.windows.toggle();
    }

    pub fn on_menu_action(&mut self, action: TrayMenuAction) {
        debug!(?action, "Tray menu action");
        match action {
            TrayMenuAction::OpenPanel => self.windows.show_panel(),
            TrayMenuAction::ShowCapsule => self.windows.show_capsule(),
            TrayMenuAction::Quit => self.request_quit(),
        }
    }

    pub fn on_window_moved(&mut self, bounds: Bounds) {
        self.windows.on_window_moved(bounds);
    }

    pub fn on_close_requested(&mut self) -> CloseDecision {
        let decision = self.windows.on_close_requested();
        if decision.allow {
            self.exit_requested = true;
        }
        decision
    }

    pub fn on_display_geometry_changed(&mut self) {
        self.windows.on_display_geometry_changed();
    }

    /// Poll for display changes the OS did not report as events.
    pub fn check_display_geometry(&mut self) -> bool {
        self.windows.check_display_geometry()
    }

    // ------------------------------------------------------------------
    // Boundary commands
    // ------------------------------------------------------------------

    /// Execute one command. Returns the response line for commands that answer.
    pub fn handle_command(&mut self, request: CommandRequest) -> Option<CommandResponse> {
        let CommandRequest {
            command,
            request_id,
        } = request;
        let kind = command.name();
        debug!(command = kind, request_id = ?request_id, "Handling command");

        let result = match command {
            ExternalCommand::SetGlobalHotkey { raw } => {
                Some(CommandResult::Hotkey(self.set_global_hotkey(&raw)))
            }
            ExternalCommand::ResizeWindow { height } => {
                self.windows.resize_panel(to_pixels(height));
                None
            }
            ExternalCommand::MoveWindow { x, y } => {
                self.windows.move_to(to_pixels(x), to_pixels(y));
                None
            }
            ExternalCommand::GetWindowPosition => {
                Some(CommandResult::Position(self.windows.window_bounds()))
            }
            ExternalCommand::OpenFloatingWindow => {
                self.windows.show_panel();
                None
            }
            ExternalCommand::ToggleTaskbarPanel => {
                self.windows.toggle();
                None
            }
            ExternalCommand::MinimizeWindow => {
                self.windows.show_capsule();
                None
            }
            ExternalCommand::HideWindow => {
                self.windows.hide();
                None
            }
            ExternalCommand::QuitApp => {
                self.request_quit();
                None
            }
            ExternalCommand::UpdateTrayTooltip { total, usage } => {
                self.tray.update(total, usage);
                None
            }
        };

        result.map(|result| CommandResponse {
            kind,
            request_id,
            result,
        })
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    pub fn current_mode(&self) -> PresentationMode {
        self.windows.current_mode()
    }

    /// Enter the quitting state; the host loop exits once it sees [`Self::should_exit`].
    pub fn request_quit(&mut self) {
        info!("Quit requested");
        self.windows.begin_quit();
        self.exit_requested = true;
    }

    pub fn should_exit(&self) -> bool {
        self.exit_requested
    }

    /// Release OS hotkeys. Called once when the host loop exits.
    pub fn teardown(&mut self) {
        self.engine.teardown();
    }
}

/// Largest coordinate accepted from the boundary, far beyond any desktop.
const MAX_COORDINATE: i32 = 1 << 20;

/// Boundary numbers arrive as JSON doubles.
fn to_pixels(value: f64) -> i32 {
    if value.is_finite() {
        value
            .round()
            .clamp(f64::from(-MAX_COORDINATE), f64::from(MAX_COORDINATE)) as i32
    } else {
        0
    }
}

#[cfg(test)]
#[path = "status_app_tests.rs"]
mod tests;
