//! Overlay presentation state machine.
//!
//! # Modes
//!
//! ```text
//!   ┌──────────┐  show_panel / toggle / tray click   ┌─────────┐
//!   │ Capsule  │ ──────────────────────────────────▶ │  Panel  │
//!   │ (corner, │ ◀────────────────────────────────── │ (moved  │
//!   │ no focus)│  show_capsule / toggle / close /    │  freely)│
//!   └──────────┘  minimize                           └─────────┘
//! ```
//!
//! The capsule is anchored to a corner of the primary work area and is
//! re-anchored whenever display geometry changes. The panel remembers where
//! the user put it (`panel_position`) for the lifetime of the process.
//!
//! Closing the window hides it to the capsule unless [`WindowModeController::begin_quit`]
//! was called first.
//!
//! # Capabilities
//!
//! The controller never talks to the OS directly. [`WindowHost`] is the one
//! overlay window and [`DisplayProvider`] answers work-area queries. Until a
//! window is attached every operation is a silent no-op.

use tracing::{debug, info, warn};

use crate::platform::PlatformPolicy;
use crate::window_state::{
    capsule_bounds, clamp_bounds_to_displays, default_panel_position, is_bounds_visible, Bounds,
    Position, PresentationMode, PANEL_SIZE,
};

/// The overlay window as seen by the controller. Calls are fire-and-forget.
pub trait WindowHost {
    fn set_bounds(&mut self, bounds: Bounds);
    fn bounds(&self) -> Option<Bounds>;
    fn set_skip_taskbar(&mut self, skip: bool);
    fn set_resizable(&mut self, resizable: bool);
    fn set_always_on_top(&mut self, on_top: bool);
    /// Make the window visible; `focus` requests keyboard focus as well.
    fn show(&mut self, focus: bool);
    fn hide(&mut self);
}

/// Display geometry. The primary work area is where the overlay lives.
pub trait DisplayProvider {
    fn primary_work_area(&self) -> Option<Bounds>;
    fn work_areas(&self) -> Vec<Bounds>;
}

/// Answer to a window close request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CloseDecision {
    pub allow: bool,
}

/// Remembers the last seen work areas and reports when they change.
#[derive(Debug, Default)]
pub struct DisplayWatcher {
    last: Option<Vec<Bounds>>,
}

impl DisplayWatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `current`; true if it differs from the previous observation.
    /// The first observation only primes the watcher.
    pub fn observe(&mut self, current: Vec<Bounds>) -> bool {
        match self.last.replace(current) {
            Some(previous) => self.last.as_ref() != Some(&previous),
            None => false,
        }
    }
}

pub struct WindowModeController {
    window: Option<Box<dyn WindowHost>>,
    displays: Box<dyn DisplayProvider>,
    policy: PlatformPolicy,
    watcher: DisplayWatcher,
    mode: PresentationMode,
    panel_position: Option<Position>,
    quitting: bool,
}

impl WindowModeController {
    pub fn new(displays: Box<dyn DisplayProvider>, policy: PlatformPolicy) -> Self {
        let mut watcher = DisplayWatcher::new();
        watcher.observe(displays.work_areas());
        Self {
            window: None,
            displays,
            policy,
            watcher,
            mode: PresentationMode::Capsule,
            panel_position: None,
            quitting: false,
        }
    }

    pub fn attach_window(&mut self, window: Box<dyn WindowHost>) {
        self.window = Some(window);
        debug!("Overlay window attached");
    }

    pub fn has_window(&self) -> bool {
        self.window.is_some()
    }

    pub fn current_mode(&self) -> PresentationMode {
        self.mode
    }

    pub fn panel_position(&self) -> Option<Position> {
        self.panel_position
    }

    pub fn is_quitting(&self) -> bool {
        self.quitting
    }

    /// Expanded, focusable, taskbar-visible presentation.
    pub fn show_panel(&mut self) {
        if self.window.is_none() {
            return;
        }
        let target = self.panel_target();
        let resizable = self.policy.panel_resizable;
        let Some(window) = self.window.as_mut() else {
            return;
        };
        self.mode = PresentationMode::Panel;
        window.set_skip_taskbar(false);
        window.set_resizable(resizable);
        window.set_always_on_top(true);
        if let Some(bounds) = target {
            window.set_bounds(bounds);
        }
        window.show(true);
        info!(mode = %self.mode, position = ?target.map(|b| b.position()), "Showing panel");
    }

    /// Minimal corner capsule that never steals focus.
    pub fn show_capsule(&mut self) {
        let target = self.capsule_target();
        let takes_focus = self.policy.capsule_takes_focus;
        let Some(window) = self.window.as_mut() else {
            return;
        };
        self.mode = PresentationMode::Capsule;
        window.set_skip_taskbar(true);
        window.set_resizable(false);
        window.set_always_on_top(true);
        if let Some(bounds) = target {
            window.set_bounds(bounds);
        }
        window.show(takes_focus);
        info!(mode = %self.mode, position = ?target.map(|b| b.position()), "Showing capsule");
    }

    pub fn toggle(&mut self) {
        match self.mode {
            PresentationMode::Capsule => self.show_panel(),
            PresentationMode::Panel => self.show_capsule(),
        }
    }

    /// Re-anchor the capsule after a monitor or resolution change.
    pub fn on_display_geometry_changed(&mut self) {
        if self.mode != PresentationMode::Capsule {
            return;
        }
        let Some(target) = self.capsule_target() else {
            warn!("Display geometry changed but no primary work area is available");
            return;
        };
        if let Some(window) = self.window.as_mut() {
            window.set_bounds(target);
            debug!(x = target.x, y = target.y, "Capsule re-anchored");
        }
    }

    /// Poll display geometry; re-anchors and returns true when it changed.
    pub fn check_display_geometry(&mut self) -> bool {
        let changed = self.watcher.observe(self.displays.work_areas());
        if changed {
            info!("Display geometry changed");
            self.on_display_geometry_changed();
        }
        changed
    }

    /// Only panel moves are remembered; the capsule position is always derived.
    pub fn on_window_moved(&mut self, bounds: Bounds) {
        if self.mode == PresentationMode::Panel {
            self.panel_position = Some(bounds.position());
            debug!(x = bounds.x, y = bounds.y, "Panel position saved");
        }
    }

    pub fn on_close_requested(&mut self) -> CloseDecision {
        if self.quitting {
            return CloseDecision { allow: true };
        }
        debug!("Close requested, hiding to capsule");
        self.show_capsule();
        CloseDecision { allow: false }
    }

    /// Enter the quitting state; later close requests are allowed.
    pub fn begin_quit(&mut self) {
        self.quitting = true;
    }

    /// Grow or shrink the panel height, never below the default panel height.
    pub fn resize_panel(&mut self, height: i32) {
        if self.mode != PresentationMode::Panel {
            return;
        }
        let Some(window) = self.window.as_mut() else {
            return;
        };
        let Some(mut bounds) = window.bounds() else {
            return;
        };
        bounds.height = height.max(PANEL_SIZE.height);
        window.set_bounds(bounds);
    }

    /// Programmatic move. In panel mode the new position is remembered.
    pub fn move_to(&mut self, x: i32, y: i32) {
        let Some(window) = self.window.as_mut() else {
            return;
        };
        let Some(mut bounds) = window.bounds() else {
            return;
        };
        bounds.x = x;
        bounds.y = y;
        window.set_bounds(bounds);
        self.on_window_moved(bounds);
    }

    /// Current window bounds, all zero when no window exists.
    pub fn window_bounds(&self) -> Bounds {
        self.window
            .as_ref()
            .and_then(|w| w.bounds())
            .unwrap_or_default()
    }

    pub fn hide(&mut self) {
        if let Some(window) = self.window.as_mut() {
            window.hide();
        }
    }

    fn capsule_target(&self) -> Option<Bounds> {
        let work_area = self.displays.primary_work_area()?;
        Some(capsule_bounds(&work_area, &self.policy))
    }

    fn panel_target(&mut self) -> Option<Bounds> {
        let primary = self.displays.primary_work_area();
        match self.panel_position {
            Some(saved) => {
                let bounds = Bounds::at(saved, PANEL_SIZE);
                let work_areas = self.displays.work_areas();
                if work_areas.is_empty() || is_bounds_visible(&bounds, &work_areas) {
                    return Some(bounds);
                }
                let clamped = primary
                    .and_then(|area| clamp_bounds_to_displays(&bounds, &[area]))
                    .unwrap_or(bounds);
                info!(
                    from_x = saved.x,
                    from_y = saved.y,
                    x = clamped.x,
                    y = clamped.y,
                    "Saved panel position off-screen, clamped"
                );
                self.panel_position = Some(clamped.position());
                Some(clamped)
            }
            None => {
                let area = primary?;
                Some(Bounds::at(
                    default_panel_position(&area, &self.policy),
                    PANEL_SIZE,
                ))
            }
        }
    }
}

#[cfg(test)]
#[path = "window_manager_tests.rs"]
mod tests;
