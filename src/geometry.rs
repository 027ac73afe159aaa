use ratatui::prelude::Rect;

use crate::constants::{MIN_WINDOW_HEIGHT, MIN_WINDOW_WIDTH};

/// Signed window rectangle with unsigned size.
///
/// The origin is signed so drag/resize math can produce off-screen
/// intermediates; [`clamp_to_viewport`] brings them back on screen before
/// they are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WinRect {
    pub x: i32,
    pub y: i32,
    pub width: u16,
    pub height: u16,
}

impl WinRect {
    pub fn new(x: i32, y: i32, width: u16, height: u16) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// One past the rightmost column.
    pub fn right(&self) -> i32 {
        self.x.saturating_add(i32::from(self.width))
    }

    /// One past the bottom row.
    pub fn bottom(&self) -> i32 {
        self.y.saturating_add(i32::from(self.height))
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        let column = i32::from(column);
        let row = i32::from(row);
        column >= self.x && column < self.right() && row >= self.y && row < self.bottom()
    }

    /// Buffer-space rectangle for rendering. Callers are expected to have
    /// clamped the rect first; a negative origin is floored at zero.
    pub fn to_rect(&self) -> Rect {
        Rect {
            x: self.x.max(0) as u16,
            y: self.y.max(0) as u16,
            width: self.width,
            height: self.height,
        }
    }
}

/// The drawable terminal area. `reserved_bottom` rows (the taskbar) are off
/// limits to windows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
    pub reserved_bottom: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16, reserved_bottom: u16) -> Self {
        Self {
            width,
            height,
            reserved_bottom,
        }
    }

    /// Rows available to windows once the reserved chrome is subtracted.
    pub fn usable_height(&self) -> u16 {
        self.height.saturating_sub(self.reserved_bottom)
    }
}

/// Minimum window dimensions applied by the clamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SizeLimits {
    pub min_width: u16,
    pub min_height: u16,
}

impl Default for SizeLimits {
    fn default() -> Self {
        Self {
            min_width: MIN_WINDOW_WIDTH,
            min_height: MIN_WINDOW_HEIGHT,
        }
    }
}

/// Clamp a proposed rectangle so it lies fully inside the viewport.
///
/// Size is clamped before position: width/height first settle into
/// `[min, available]`, then the origin is clamped so the settled rectangle
/// fits. When the viewport is smaller than the minimum size the minimum
/// wins and the origin floors at zero. Pure and idempotent.
pub fn clamp_to_viewport(rect: WinRect, viewport: Viewport, limits: SizeLimits) -> WinRect {
    let max_width = viewport.width.max(limits.min_width);
    let max_height = viewport.usable_height().max(limits.min_height);
    let width = rect.width.clamp(limits.min_width, max_width);
    let height = rect.height.clamp(limits.min_height, max_height);

    let max_x = i32::from(viewport.width) - i32::from(width);
    let max_y = i32::from(viewport.usable_height()) - i32::from(height);
    let x = rect.x.clamp(0, max_x.max(0));
    let y = rect.y.clamp(0, max_y.max(0));

    WinRect {
        x,
        y,
        width,
        height,
    }
}
