//! Overlay window geometry.
//!
//! Coordinates are logical pixels in a global top-left origin space, y
//! increasing downward. Work areas are display bounds minus the menu bar or
//! taskbar.
//!
//! The capsule is never persisted: its bounds are recomputed from the current
//! primary work area every time. The panel keeps the position the user last
//! dragged it to, which is validated against the current displays before
//! reuse (geometry intersection, not display ids, which can change).

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::platform::{AnchorCorner, PlatformPolicy};

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Bounds {
    pub const fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn at(position: Position, size: Size) -> Self {
        Self::new(position.x, position.y, size.width, size.height)
    }

    pub fn position(&self) -> Position {
        Position {
            x: self.x,
            y: self.y,
        }
    }

    pub fn size(&self) -> Size {
        Size {
            width: self.width,
            height: self.height,
        }
    }

    /// Saturates instead of overflowing for bounds far off any display.
    pub fn right(&self) -> i32 {
        self.x.saturating_add(self.width)
    }

    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(self.height)
    }

    fn area(&self) -> i64 {
        i64::from(self.width) * i64::from(self.height)
    }

    fn contains_point(&self, x: i32, y: i32) -> bool {
        x >= self.x && x < self.right() && y >= self.y && y < self.bottom()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Size {
    pub width: i32,
    pub height: i32,
}

/// How the overlay window is currently presented.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PresentationMode {
    Panel,
    #[default]
    Capsule,
}

impl PresentationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            PresentationMode::Panel => "panel",
            PresentationMode::Capsule => "capsule",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            PresentationMode::Panel => PresentationMode::Capsule,
            PresentationMode::Capsule => PresentationMode::Panel,
        }
    }
}

impl fmt::Display for PresentationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

pub const PANEL_SIZE: Size = Size {
    width: 360,
    height: 168,
};

pub const CAPSULE_SIZE: Size = Size {
    width: 280,
    height: 136,
};

// ============================================================================
// Placement
// ============================================================================

/// Capsule bounds anchored to the policy's corner of `work_area`.
pub fn capsule_bounds(work_area: &Bounds, policy: &PlatformPolicy) -> Bounds {
    let x = work_area.right() - CAPSULE_SIZE.width - policy.capsule_margin_x;
    let y = match policy.capsule_anchor {
        AnchorCorner::TopRight => work_area.y + policy.capsule_margin_y,
        AnchorCorner::BottomRight => {
            work_area.bottom() - CAPSULE_SIZE.height - policy.capsule_margin_y
        }
    };
    Bounds::at(Position { x, y }, CAPSULE_SIZE)
}

/// Panel position used before the user has moved the panel:
/// horizontally centered on `work_area`, a fixed distance below its top.
pub fn default_panel_position(work_area: &Bounds, policy: &PlatformPolicy) -> Position {
    Position {
        x: work_area.x + (work_area.width - PANEL_SIZE.width).div_euclid(2),
        y: work_area.y + policy.panel_top_margin,
    }
}

// ============================================================================
// Visibility Validation
// ============================================================================

const MIN_VISIBLE_AREA: i64 = 64 * 64;
const MIN_EDGE_MARGIN: i32 = 50;

/// Whether enough of `bounds` lies on some work area for the user to grab it.
pub fn is_bounds_visible(bounds: &Bounds, work_areas: &[Bounds]) -> bool {
    work_areas.iter().any(|area| {
        rect_intersection(bounds, area).is_some_and(|overlap| overlap.area() >= MIN_VISIBLE_AREA)
    })
}

fn rect_intersection(a: &Bounds, b: &Bounds) -> Option<Bounds> {
    let left = a.x.max(b.x);
    let top = a.y.max(b.y);
    let right = a.right().min(b.right());
    let bottom = a.bottom().min(b.bottom());
    (left < right && top < bottom).then(|| {
        Bounds::new(
            left,
            top,
            right.saturating_sub(left),
            bottom.saturating_sub(top),
        )
    })
}

/// Move `bounds` onto the best matching work area, keeping an edge margin.
///
/// Size is only reduced when the work area is too small to hold it.
pub fn clamp_bounds_to_displays(bounds: &Bounds, work_areas: &[Bounds]) -> Option<Bounds> {
    let target = find_best_display_for_bounds(bounds, work_areas)?;
    let mut clamped = *bounds;
    clamped.width = clamped
        .width
        .min(target.width - MIN_EDGE_MARGIN * 2)
        .max(1);
    clamped.height = clamped
        .height
        .min(target.height - MIN_EDGE_MARGIN * 2)
        .max(1);

    let min_x = target.x + MIN_EDGE_MARGIN;
    let max_x = (target.right() - clamped.width - MIN_EDGE_MARGIN).max(min_x);
    clamped.x = clamped.x.clamp(min_x, max_x);

    let min_y = target.y + MIN_EDGE_MARGIN;
    let max_y = (target.bottom() - clamped.height - MIN_EDGE_MARGIN).max(min_y);
    clamped.y = clamped.y.clamp(min_y, max_y);
    Some(clamped)
}

/// Work area containing the center of `bounds`, else the one with the
/// largest overlap, else the first (primary).
fn find_best_display_for_bounds<'a>(bounds: &Bounds, work_areas: &'a [Bounds]) -> Option<&'a Bounds> {
    let cx = bounds.x.saturating_add(bounds.width / 2);
    let cy = bounds.y.saturating_add(bounds.height / 2);
    if let Some(area) = work_areas.iter().find(|a| a.contains_point(cx, cy)) {
        return Some(area);
    }
    work_areas
        .iter()
        .filter_map(|a| rect_intersection(bounds, a).map(|overlap| (overlap.area(), a)))
        .max_by_key(|(area, _)| *area)
        .map(|(_, a)| a)
        .or_else(|| work_areas.first())
}

#[cfg(test)]
#[path = "window_state_tests.rs"]
mod tests;
