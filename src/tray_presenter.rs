//! Tray iconography and text.
//!
//! The tray shows the current balance as a small numeric badge. Badges are
//! drawn with tiny-skia as seven-segment digits on a rounded square, so no
//! font is needed at runtime. A clamped value of zero shows the static logo
//! instead.

use serde::{Deserialize, Serialize};
use tiny_skia::{FillRule, Paint, Path, PathBuilder, Pixmap, Rect, Transform};
use tracing::debug;

use crate::error::StatusError;
use crate::tray::TraySurface;

/// Logo shown when there is nothing to badge (32x32).
const LOGO_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="32" height="32" viewBox="0 0 32 32">
  <rect width="32" height="32" rx="7" fill="#111827"/>
  <path fill="#60a5fa" d="M9 8h4l3 6 3-6h4l-5 9v7h-4v-7z"/>
</svg>"##;

pub const BADGE_SIZE: u32 = 32;
const BADGE_RADIUS: f32 = 6.0;
const BADGE_BACKGROUND: (u8, u8, u8, u8) = (0x11, 0x18, 0x27, 0xee);
const BADGE_FOREGROUND: (u8, u8, u8, u8) = (0x60, 0xa5, 0xfa, 0xff);

const DIGIT_WIDTH: f32 = 7.0;
const DIGIT_HEIGHT: f32 = 14.0;
const DIGIT_GAP: f32 = 2.0;
const SEGMENT: f32 = 2.0;

/// Which number the badge represents and the range it is clamped to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum BadgeRange {
    /// Balance in whole dollars, `[0, 999]`.
    #[default]
    Dollars,
    /// Usage percentage, `[0, 100]`.
    Percent,
}

impl BadgeRange {
    pub fn max(&self) -> u32 {
        match self {
            BadgeRange::Dollars => 999,
            BadgeRange::Percent => 100,
        }
    }
}

/// Icon the tray should display.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BadgeIcon {
    Base,
    Badge {
        label: String,
        rgba: Vec<u8>,
        size: u32,
    },
}

/// Round, then clamp into the range. Non-finite input counts as zero.
pub fn clamp_badge_value(value: f64, range: BadgeRange) -> u32 {
    if !value.is_finite() {
        return 0;
    }
    value.round().clamp(0.0, f64::from(range.max())) as u32
}

/// Text drawn on the badge, or `None` when the base icon should be used.
pub fn badge_label(value: f64, range: BadgeRange) -> Option<String> {
    match clamp_badge_value(value, range) {
        0 => None,
        clamped => Some(clamped.to_string()),
    }
}

pub fn render_badge(value: f64, range: BadgeRange) -> BadgeIcon {
    let Some(label) = badge_label(value, range) else {
        return BadgeIcon::Base;
    };
    match draw_badge(&label) {
        Some(rgba) => BadgeIcon::Badge {
            label,
            rgba,
            size: BADGE_SIZE,
        },
        None => BadgeIcon::Base,
    }
}

pub fn render_tooltip(brand: &str, total: f64, usage_percent: f64) -> String {
    format!(
        "{brand} · ${:.2} · {:.1}%",
        finite_or_zero(total),
        finite_or_zero(usage_percent)
    )
}

/// Text next to the tray icon on platforms that support it.
pub fn tray_title(total: f64) -> String {
    format!("${:.2}", finite_or_zero(total))
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Rasterize the embedded logo into straight RGBA.
pub fn base_icon_rgba() -> Result<(Vec<u8>, u32, u32), StatusError> {
    let opts = usvg::Options::default();
    let tree = usvg::Tree::from_str(LOGO_SVG, &opts)
        .map_err(|e| StatusError::Tray(format!("failed to parse logo SVG: {e}")))?;
    let size = tree.size();
    let width = size.width() as u32;
    let height = size.height() as u32;
    let mut pixmap = Pixmap::new(width, height)
        .ok_or_else(|| StatusError::Tray("failed to create logo pixmap".into()))?;
    resvg::render(&tree, Transform::default(), &mut pixmap.as_mut());
    Ok((straight_rgba(&pixmap), width, height))
}

// ============================================================================
// Badge drawing
// ============================================================================

// Bits: a=top, b=top right, c=bottom right, d=bottom, e=bottom left, f=top left, g=middle
const SEGMENTS: [u8; 10] = [0x3F, 0x06, 0x5B, 0x4F, 0x66, 0x6D, 0x7D, 0x07, 0x7F, 0x6F];

fn draw_badge(label: &str) -> Option<Vec<u8>> {
    let size = BADGE_SIZE as f32;
    let mut pixmap = Pixmap::new(BADGE_SIZE, BADGE_SIZE)?;

    let mut background = Paint::default();
    let (r, g, b, a) = BADGE_BACKGROUND;
    background.set_color_rgba8(r, g, b, a);
    background.anti_alias = true;
    let square = rounded_rect(0.0, 0.0, size, size, BADGE_RADIUS)?;
    pixmap.fill_path(
        &square,
        &background,
        FillRule::Winding,
        Transform::identity(),
        None,
    );

    let mut digit_paint = Paint::default();
    let (r, g, b, a) = BADGE_FOREGROUND;
    digit_paint.set_color_rgba8(r, g, b, a);

    let digits: Vec<u32> = label.chars().filter_map(|c| c.to_digit(10)).collect();
    let count = digits.len() as f32;
    let total_width = count * DIGIT_WIDTH + (count - 1.0).max(0.0) * DIGIT_GAP;
    let mut x = (size - total_width) / 2.0;
    let y = (size - DIGIT_HEIGHT) / 2.0;
    for digit in digits {
        for rect in segment_rects(SEGMENTS[digit as usize], x, y) {
            pixmap.fill_rect(rect, &digit_paint, Transform::identity(), None);
        }
        x += DIGIT_WIDTH + DIGIT_GAP;
    }

    debug!(label, "Rendered tray badge");
    Some(straight_rgba(&pixmap))
}

fn segment_rects(mask: u8, x: f32, y: f32) -> Vec<Rect> {
    let (w, h, t) = (DIGIT_WIDTH, DIGIT_HEIGHT, SEGMENT);
    let half = h / 2.0;
    let candidates = [
        (x, y, w, t),
        (x + w - t, y, t, half),
        (x + w - t, y + half, t, half),
        (x, y + h - t, w, t),
        (x, y + half, t, half),
        (x, y, t, half),
        (x, y + half - t / 2.0, w, t),
    ];
    candidates
        .iter()
        .enumerate()
        .filter(|(bit, _)| mask & (1 << bit) != 0)
        .filter_map(|(_, &(sx, sy, sw, sh))| Rect::from_xywh(sx, sy, sw, sh))
        .collect()
}

fn rounded_rect(x: f32, y: f32, w: f32, h: f32, r: f32) -> Option<Path> {
    let mut pb = PathBuilder::new();
    pb.move_to(x + r, y);
    pb.line_to(x + w - r, y);
    pb.quad_to(x + w, y, x + w, y + r);
    pb.line_to(x + w, y + h - r);
    pb.quad_to(x + w, y + h, x + w - r, y + h);
    pb.line_to(x + r, y + h);
    pb.quad_to(x, y + h, x, y + h - r);
    pb.line_to(x, y + r);
    pb.quad_to(x, y, x + r, y);
    pb.close();
    pb.finish()
}

/// tiny-skia stores premultiplied pixels; tray icons expect straight alpha.
fn straight_rgba(pixmap: &Pixmap) -> Vec<u8> {
    pixmap
        .pixels()
        .iter()
        .flat_map(|p| {
            let c = p.demultiply();
            [c.red(), c.green(), c.blue(), c.alpha()]
        })
        .collect()
}

// ============================================================================
// Presenter
// ============================================================================

/// Pushes balance snapshots to the tray surface.
pub struct TrayPresenter {
    brand: String,
    range: BadgeRange,
    show_title: bool,
    surface: Option<Box<dyn TraySurface>>,
    last_badge: Option<u32>,
}

impl TrayPresenter {
    pub fn new(brand: impl Into<String>, range: BadgeRange, show_title: bool) -> Self {
        Self {
            brand: brand.into(),
            range,
            show_title,
            surface: None,
            last_badge: None,
        }
    }

    pub fn attach(&mut self, surface: Box<dyn TraySurface>) {
        self.surface = Some(surface);
        self.last_badge = None;
    }

    pub fn has_surface(&self) -> bool {
        self.surface.is_some()
    }

    pub fn render_badge(&self, value: f64) -> BadgeIcon {
        render_badge(value, self.range)
    }

    pub fn render_tooltip(&self, total: f64, usage_percent: f64) -> String {
        render_tooltip(&self.brand, total, usage_percent)
    }

    /// Apply a snapshot. Without a tray this does nothing.
    pub fn update(&mut self, total: f64, usage_percent: f64) {
        let tooltip = self.render_tooltip(total, usage_percent);
        let badge_source = match self.range {
            BadgeRange::Dollars => total,
            BadgeRange::Percent => usage_percent,
        };
        let clamped = clamp_badge_value(badge_source, self.range);
        let icon = (self.last_badge != Some(clamped)).then(|| self.render_badge(badge_source));
        let title = self.show_title.then(|| tray_title(total));

        let Some(surface) = self.surface.as_mut() else {
            return;
        };
        surface.set_tooltip(&tooltip);
        if let Some(title) = title {
            surface.set_title(Some(&title));
        }
        if let Some(icon) = icon {
            surface.set_icon(&icon);
            self.last_badge = Some(clamped);
        }
    }
}
