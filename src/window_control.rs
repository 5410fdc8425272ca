//! winit-backed window and display capabilities.
//!
//! Geometry crosses this boundary in logical pixels. winit does not expose
//! per-monitor work areas, so monitor bounds stand in for them; the platform
//! policy margins keep the capsule clear of the menu bar or taskbar.

use std::rc::Rc;

use winit::dpi::{LogicalPosition, LogicalSize, PhysicalPosition, PhysicalSize};
use winit::monitor::MonitorHandle;
use winit::window::{Window, WindowLevel};

use crate::window_manager::{DisplayProvider, WindowHost};
use crate::window_state::Bounds;

/// Convert physical geometry to logical [`Bounds`].
pub fn logical_bounds(position: PhysicalPosition<i32>, size: PhysicalSize<u32>, scale: f64) -> Bounds {
    let position: LogicalPosition<f64> = position.to_logical(scale);
    let size: LogicalSize<f64> = size.to_logical(scale);
    Bounds::new(
        position.x.round() as i32,
        position.y.round() as i32,
        size.width.round() as i32,
        size.height.round() as i32,
    )
}

fn monitor_bounds(monitor: &MonitorHandle) -> Bounds {
    logical_bounds(monitor.position(), monitor.size(), monitor.scale_factor())
}

/// Current outer position and inner size of `window`, in logical pixels.
pub fn window_bounds(window: &Window) -> Option<Bounds> {
    let position = window.outer_position().ok()?;
    Some(logical_bounds(
        position,
        window.inner_size(),
        window.scale_factor(),
    ))
}

/// [`WindowHost`] over the single overlay window.
pub struct WinitWindowHost {
    window: Rc<Window>,
}

impl WinitWindowHost {
    pub fn new(window: Rc<Window>) -> Self {
        Self { window }
    }
}

impl WindowHost for WinitWindowHost {
    fn set_bounds(&mut self, bounds: Bounds) {
        self.window
            .set_outer_position(LogicalPosition::new(bounds.x, bounds.y));
        let _ = self
            .window
            .request_inner_size(LogicalSize::new(bounds.width, bounds.height));
    }

    fn bounds(&self) -> Option<Bounds> {
        window_bounds(&self.window)
    }

    #[cfg(target_os = "windows")]
    fn set_skip_taskbar(&mut self, skip: bool) {
        use winit::platform::windows::WindowExtWindows;
        self.window.set_skip_taskbar(skip);
    }

    // macOS hides the app from the Dock via the accessory activation policy;
    // other platforms only honor skip-taskbar at window creation.
    #[cfg(not(target_os = "windows"))]
    fn set_skip_taskbar(&mut self, skip: bool) {
        tracing::debug!(skip, "Skip-taskbar is fixed at creation on this platform");
    }

    fn set_resizable(&mut self, resizable: bool) {
        self.window.set_resizable(resizable);
    }

    fn set_always_on_top(&mut self, on_top: bool) {
        let level = if on_top {
            WindowLevel::AlwaysOnTop
        } else {
            WindowLevel::Normal
        };
        self.window.set_window_level(level);
    }

    fn show(&mut self, focus: bool) {
        self.window.set_visible(true);
        if focus {
            self.window.focus_window();
        }
    }

    fn hide(&mut self) {
        self.window.set_visible(false);
    }
}

/// [`DisplayProvider`] answering from the monitors the overlay window can see.
pub struct WinitDisplays {
    window: Rc<Window>,
}

impl WinitDisplays {
    pub fn new(window: Rc<Window>) -> Self {
        Self { window }
    }
}

impl DisplayProvider for WinitDisplays {
    fn primary_work_area(&self) -> Option<Bounds> {
        self.window
            .primary_monitor()
            .or_else(|| self.window.available_monitors().next())
            .map(|m| monitor_bounds(&m))
    }

    fn work_areas(&self) -> Vec<Bounds> {
        let primary = self.primary_work_area();
        let mut areas: Vec<Bounds> = self
            .window
            .available_monitors()
            .map(|m| monitor_bounds(&m))
            .collect();
        // primary first
        if let Some(primary) = primary {
            if let Some(index) = areas.iter().position(|a| *a == primary) {
                areas.swap(0, index);
            }
        }
        areas
    }
}
