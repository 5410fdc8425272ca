//! System tray icon for yesCode Status.
//!
//! The tray carries the balance badge, a tooltip, a title on macOS, and a
//! small context menu. Left click toggles between panel and capsule.

use std::time::Duration;

use anyhow::{Context, Result};
use tray_icon::{
    menu::{Menu, MenuEvent, MenuItem, PredefinedMenuItem},
    Icon, MouseButton, MouseButtonState, TrayIcon, TrayIconBuilder, TrayIconEvent,
};
use tracing::info;

use crate::error::ResultExt;
use crate::tray_presenter::{base_icon_rgba, BadgeIcon};

/// How often the host loop must pump the tray toolkit, if it needs pumping.
///
/// On Linux `tray-icon` builds on GTK, which only dispatches its events when
/// its main loop runs. The winit loop drives it through [`pump_toolkit`].
pub const fn toolkit_pump_interval() -> Option<Duration> {
    if cfg!(target_os = "linux") {
        Some(Duration::from_millis(50))
    } else {
        None
    }
}

/// Prepare the toolkit the tray is built on. Must run on the main thread
/// before [`TrayManager::new`]; a tray must not be created when this fails.
#[cfg(target_os = "linux")]
pub fn init_toolkit() -> Result<()> {
    gtk::init().context("Failed to initialize GTK for the tray")
}

#[cfg(not(target_os = "linux"))]
pub fn init_toolkit() -> Result<()> {
    Ok(())
}

/// Dispatch pending toolkit events without blocking.
#[cfg(target_os = "linux")]
pub fn pump_toolkit() {
    while gtk::events_pending() {
        gtk::main_iteration_do(false);
    }
}

#[cfg(not(target_os = "linux"))]
pub fn pump_toolkit() {}

/// What [`crate::tray_presenter::TrayPresenter`] draws on.
pub trait TraySurface {
    fn set_tooltip(&mut self, tooltip: &str);
    /// `None` clears the title.
    fn set_title(&mut self, title: Option<&str>);
    fn set_icon(&mut self, icon: &BadgeIcon);
}

/// Menu item identifiers for matching events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrayMenuAction {
    OpenPanel,
    ShowCapsule,
    Quit,
}

/// True for a completed left click on the tray icon.
pub fn is_toggle_click(event: &TrayIconEvent) -> bool {
    matches!(
        event,
        TrayIconEvent::Click {
            button: MouseButton::Left,
            button_state: MouseButtonState::Up,
            ..
        }
    )
}

/// Menu item ids, kept apart from [`TrayManager`] so menu events can be
/// matched after the manager has been handed to the presenter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrayMenuIds {
    open_panel: String,
    show_capsule: String,
    quit: String,
}

impl TrayMenuIds {
    /// Matches a menu event to a TrayMenuAction
    pub fn match_menu_event(&self, event: &MenuEvent) -> Option<TrayMenuAction> {
        self.match_id(&event.id.0)
    }

    fn match_id(&self, id: &str) -> Option<TrayMenuAction> {
        if id == self.open_panel {
            Some(TrayMenuAction::OpenPanel)
        } else if id == self.show_capsule {
            Some(TrayMenuAction::ShowCapsule)
        } else if id == self.quit {
            Some(TrayMenuAction::Quit)
        } else {
            None
        }
    }
}

/// Manages the system tray icon and menu
pub struct TrayManager {
    tray_icon: TrayIcon,
    base_icon: Icon,
    menu_ids: TrayMenuIds,
}

impl TrayManager {
    /// Creates the tray icon with the logo and menu.
    ///
    /// Must run on the main thread after the event loop has started.
    pub fn new(tooltip: &str) -> Result<Self> {
        let base_icon = Self::create_base_icon()?;
        let (menu, menu_ids) = Self::create_menu()?;

        let tray_icon = TrayIconBuilder::new()
            .with_icon(base_icon.clone())
            .with_tooltip(tooltip)
            .with_menu(Box::new(menu))
            .with_menu_on_left_click(false)
            .build()
            .context("Failed to create tray icon")?;
        info!("Tray icon created");

        Ok(Self {
            tray_icon,
            base_icon,
            menu_ids,
        })
    }

    pub fn menu_ids(&self) -> TrayMenuIds {
        self.menu_ids.clone()
    }

    fn create_base_icon() -> Result<Icon> {
        let (rgba, width, height) = base_icon_rgba()?;
        Icon::from_rgba(rgba, width, height).context("Failed to create icon from RGBA data")
    }

    /// Menu structure:
    /// 1. Open Panel
    /// 2. Show Capsule
    /// 3. ---
    /// 4. Quit yesCode Status
    fn create_menu() -> Result<(Menu, TrayMenuIds)> {
        let menu = Menu::new();

        let open_panel_item = MenuItem::new("Open Panel", true, None);
        let show_capsule_item = MenuItem::new("Show Capsule", true, None);
        let quit_item = MenuItem::new("Quit yesCode Status", true, None);

        let menu_ids = TrayMenuIds {
            open_panel: open_panel_item.id().0.clone(),
            show_capsule: show_capsule_item.id().0.clone(),
            quit: quit_item.id().0.clone(),
        };

        menu.append(&open_panel_item)
            .context("Failed to add Open Panel item")?;
        menu.append(&show_capsule_item)
            .context("Failed to add Show Capsule item")?;
        menu.append(&PredefinedMenuItem::separator())
            .context("Failed to add separator")?;
        menu.append(&quit_item).context("Failed to add Quit item")?;

        Ok((menu, menu_ids))
    }
}

impl TraySurface for TrayManager {
    fn set_tooltip(&mut self, tooltip: &str) {
        self.tray_icon.set_tooltip(Some(tooltip)).warn_on_err();
    }

    fn set_title(&mut self, title: Option<&str>) {
        self.tray_icon.set_title(title);
    }

    fn set_icon(&mut self, icon: &BadgeIcon) {
        let icon = match icon {
            BadgeIcon::Base => Some(self.base_icon.clone()),
            BadgeIcon::Badge { rgba, size, .. } => {
                Icon::from_rgba(rgba.clone(), *size, *size).warn_on_err()
            }
        };
        if let Some(icon) = icon {
            self.tray_icon.set_icon(Some(icon)).warn_on_err();
        }
    }
}
