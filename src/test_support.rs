//! In-memory stand-ins for the OS capabilities, shared by unit tests.
//!
//! Each fake is a cloneable handle: hand one clone to the component under
//! test and keep another to script failures and inspect what was called.

use std::cell::RefCell;
use std::collections::HashSet;
use std::rc::Rc;

use crate::hotkeys::{AcceleratorHost, AcceleratorId, RegistrationError};
use crate::shortcuts::Accelerator;
use crate::tray::TraySurface;
use crate::tray_presenter::BadgeIcon;
use crate::window_manager::{DisplayProvider, WindowHost};
use crate::window_state::Bounds;

// ============================================================================
// Accelerators
// ============================================================================

#[derive(Debug, Default)]
struct HostState {
    next_id: u32,
    registered: Vec<(AcceleratorId, Accelerator)>,
    rejected: HashSet<String>,
    register_calls: usize,
    unregister_calls: usize,
}

#[derive(Clone, Debug, Default)]
pub struct FakeAcceleratorHost {
    inner: Rc<RefCell<HostState>>,
}

impl FakeAcceleratorHost {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make registration of `display` (e.g. `"Ctrl + E"`) fail as if another app owned it.
    pub fn reject(&self, display: &str) {
        self.inner.borrow_mut().rejected.insert(display.to_string());
    }

    pub fn id_of(&self, display: &str) -> Option<AcceleratorId> {
        self.inner
            .borrow()
            .registered
            .iter()
            .find(|(_, accel)| accel.display() == display)
            .map(|(id, _)| *id)
    }

    pub fn registered(&self) -> Vec<String> {
        self.inner
            .borrow()
            .registered
            .iter()
            .map(|(_, accel)| accel.display())
            .collect()
    }

    pub fn register_calls(&self) -> usize {
        self.inner.borrow().register_calls
    }

    pub fn unregister_calls(&self) -> usize {
        self.inner.borrow().unregister_calls
    }
}

impl AcceleratorHost for FakeAcceleratorHost {
    fn register(&mut self, accelerator: &Accelerator) -> Result<AcceleratorId, RegistrationError> {
        let mut state = self.inner.borrow_mut();
        state.register_calls += 1;
        let display = accelerator.display();
        if state.rejected.contains(&display) {
            return Err(RegistrationError::AlreadyRegistered(display));
        }
        state.next_id += 1;
        let id = AcceleratorId(state.next_id);
        state.registered.push((id, accelerator.clone()));
        Ok(id)
    }

    fn unregister(&mut self, id: AcceleratorId) {
        let mut state = self.inner.borrow_mut();
        state.unregister_calls += 1;
        state.registered.retain(|(existing, _)| *existing != id);
    }
}

// ============================================================================
// Window + displays
// ============================================================================

#[derive(Debug, Default)]
pub struct WindowRecord {
    pub bounds: Option<Bounds>,
    pub visible: bool,
    pub focused: bool,
    pub skip_taskbar: bool,
    pub resizable: bool,
    pub always_on_top: bool,
    pub set_bounds_calls: usize,
}

#[derive(Clone, Debug, Default)]
pub struct FakeWindowHost {
    inner: Rc<RefCell<WindowRecord>>,
}

impl FakeWindowHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) -> std::cell::Ref<'_, WindowRecord> {
        self.inner.borrow()
    }

    /// Simulate the user dragging the window.
    pub fn drag_to(&self, x: i32, y: i32) -> Bounds {
        let mut record = self.inner.borrow_mut();
        let mut bounds = record.bounds.unwrap_or_default();
        bounds.x = x;
        bounds.y = y;
        record.bounds = Some(bounds);
        bounds
    }
}

impl WindowHost for FakeWindowHost {
    fn set_bounds(&mut self, bounds: Bounds) {
        let mut record = self.inner.borrow_mut();
        record.bounds = Some(bounds);
        record.set_bounds_calls += 1;
    }

    fn bounds(&self) -> Option<Bounds> {
        self.inner.borrow().bounds
    }

    fn set_skip_taskbar(&mut self, skip: bool) {
        self.inner.borrow_mut().skip_taskbar = skip;
    }

    fn set_resizable(&mut self, resizable: bool) {
        self.inner.borrow_mut().resizable = resizable;
    }

    fn set_always_on_top(&mut self, on_top: bool) {
        self.inner.borrow_mut().always_on_top = on_top;
    }

    fn show(&mut self, focus: bool) {
        let mut record = self.inner.borrow_mut();
        record.visible = true;
        record.focused = focus;
    }

    fn hide(&mut self) {
        let mut record = self.inner.borrow_mut();
        record.visible = false;
        record.focused = false;
    }
}

/// Work areas; the first one is the primary display.
#[derive(Clone, Debug, Default)]
pub struct FakeDisplays {
    inner: Rc<RefCell<Vec<Bounds>>>,
}

impl FakeDisplays {
    pub fn new(work_areas: Vec<Bounds>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(work_areas)),
        }
    }

    pub fn single(width: i32, height: i32) -> Self {
        Self::new(vec![Bounds::new(0, 0, width, height)])
    }

    pub fn set(&self, work_areas: Vec<Bounds>) {
        *self.inner.borrow_mut() = work_areas;
    }
}

impl DisplayProvider for FakeDisplays {
    fn primary_work_area(&self) -> Option<Bounds> {
        self.inner.borrow().first().copied()
    }

    fn work_areas(&self) -> Vec<Bounds> {
        self.inner.borrow().clone()
    }
}

// ============================================================================
// Tray
// ============================================================================

#[derive(Debug, Default)]
pub struct TrayRecord {
    pub tooltip: Option<String>,
    pub title: Option<String>,
    pub icons: Vec<BadgeIcon>,
}

#[derive(Clone, Debug, Default)]
pub struct FakeTray {
    inner: Rc<RefCell<TrayRecord>>,
}

impl FakeTray {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self) -> std::cell::Ref<'_, TrayRecord> {
        self.inner.borrow()
    }
}

impl TraySurface for FakeTray {
    fn set_tooltip(&mut self, tooltip: &str) {
        self.inner.borrow_mut().tooltip = Some(tooltip.to_string());
    }

    fn set_title(&mut self, title: Option<&str>) {
        self.inner.borrow_mut().title = title.map(str::to_string);
    }

    fn set_icon(&mut self, icon: &BadgeIcon) {
        self.inner.borrow_mut().icons.push(icon.clone());
    }
}
