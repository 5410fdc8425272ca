//! Platform detection and per-platform presentation policy.
//!
//! Everything that differs between macOS and the other desktops is resolved
//! once at startup into a [`PlatformPolicy`]; the window and tray code read
//! the policy instead of branching on the OS.

/// Platform enum for policy lookup and modifier mapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Platform {
    MacOS,
    Windows,
    Linux,
}

impl Platform {
    pub fn current() -> Self {
        #[cfg(target_os = "macos")]
        {
            Platform::MacOS
        }
        #[cfg(target_os = "windows")]
        {
            Platform::Windows
        }
        #[cfg(target_os = "linux")]
        {
            Platform::Linux
        }
        #[cfg(not(any(target_os = "macos", target_os = "windows", target_os = "linux")))]
        {
            Platform::Linux
        }
    }
}

/// Which corner of the primary work area the capsule sticks to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AnchorCorner {
    TopRight,
    BottomRight,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PlatformPolicy {
    pub platform: Platform,
    /// Capsule corner; top-right clears the macOS menu bar, bottom-right sits above a taskbar.
    pub capsule_anchor: AnchorCorner,
    /// Gap between the capsule and the right edge of the work area.
    pub capsule_margin_x: i32,
    /// Gap between the capsule and the anchored top/bottom edge.
    pub capsule_margin_y: i32,
    /// Whether showing the capsule may take keyboard focus.
    pub capsule_takes_focus: bool,
    /// Whether the panel can be resized by the user.
    pub panel_resizable: bool,
    /// Distance from the top of the work area for the default panel position.
    pub panel_top_margin: i32,
    /// Whether the tray supports a text title next to the icon.
    pub tray_title: bool,
}

impl PlatformPolicy {
    pub fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::MacOS => Self {
                platform,
                capsule_anchor: AnchorCorner::TopRight,
                capsule_margin_x: 12,
                capsule_margin_y: 28,
                capsule_takes_focus: false,
                panel_resizable: true,
                panel_top_margin: 20,
                tray_title: true,
            },
            Platform::Windows | Platform::Linux => Self {
                platform,
                capsule_anchor: AnchorCorner::BottomRight,
                capsule_margin_x: 12,
                capsule_margin_y: 32,
                capsule_takes_focus: false,
                panel_resizable: true,
                panel_top_margin: 20,
                tray_title: false,
            },
        }
    }

    pub fn current() -> Self {
        Self::for_platform(Platform::current())
    }
}
