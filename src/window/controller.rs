use ratatui::prelude::Rect;

use crate::geometry::{SizeLimits, Viewport, WinRect, clamp_to_viewport};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Normal,
    Minimized,
}

/// Drag state for one window. `Dragging` remembers where inside the header
/// the pointer grabbed the window so the window moves with the pointer
/// instead of snapping its origin to it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging { grab_x: i32, grab_y: i32 },
}

/// Resize state for one window. `Resizing` remembers the pointer position
/// and window size at the moment the handle was grabbed; every update is
/// computed from those, never from the previous update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResizeState {
    Idle,
    Resizing {
        start_x: i32,
        start_y: i32,
        start_width: u16,
        start_height: u16,
    },
}

/// What a pointer press on the header row lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderHit {
    Drag,
    Minimize,
    Close,
}

/// Owns one window's rectangle, visibility, and the drag/resize state
/// machines. All pointer coordinates are terminal cells; out-of-range
/// values are absorbed by the clamp, never rejected.
#[derive(Debug)]
pub struct WindowController {
    rect: WinRect,
    visibility: Visibility,
    drag: DragState,
    resize: ResizeState,
    limits: SizeLimits,
    title: String,
}

impl WindowController {
    pub fn new(rect: WinRect, viewport: Viewport, title: impl Into<String>) -> Self {
        Self::with_limits(rect, viewport, SizeLimits::default(), title)
    }

    pub fn with_limits(
        rect: WinRect,
        viewport: Viewport,
        limits: SizeLimits,
        title: impl Into<String>,
    ) -> Self {
        Self {
            rect: clamp_to_viewport(rect, viewport, limits),
            visibility: Visibility::Normal,
            drag: DragState::Idle,
            resize: ResizeState::Idle,
            limits,
            title: title.into(),
        }
    }

    pub fn rect(&self) -> WinRect {
        self.rect
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn is_minimized(&self) -> bool {
        self.visibility == Visibility::Minimized
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn resize_state(&self) -> ResizeState {
        self.resize
    }

    pub fn minimize(&mut self) {
        self.visibility = Visibility::Minimized;
        // a hidden window cannot keep a pointer grab
        self.drag = DragState::Idle;
        self.resize = ResizeState::Idle;
    }

    pub fn restore(&mut self) {
        self.visibility = Visibility::Normal;
    }

    /// Re-establish the rect invariant after the viewport changed.
    pub fn clamp_to(&mut self, viewport: Viewport) {
        self.rect = clamp_to_viewport(self.rect, viewport, self.limits);
    }

    pub fn begin_drag(&mut self, column: i32, row: i32) {
        self.drag = DragState::Dragging {
            grab_x: column - self.rect.x,
            grab_y: row - self.rect.y,
        };
    }

    /// Move the window so the grab point follows the pointer. No-op unless a
    /// drag is in progress; idempotent for a repeated pointer position.
    pub fn update_drag(&mut self, column: i32, row: i32, viewport: Viewport) {
        let DragState::Dragging { grab_x, grab_y } = self.drag else {
            return;
        };
        let proposed = WinRect {
            x: column - grab_x,
            y: row - grab_y,
            ..self.rect
        };
        self.rect = clamp_to_viewport(proposed, viewport, self.limits);
    }

    pub fn end_drag(&mut self) {
        self.drag = DragState::Idle;
    }

    pub fn begin_resize(&mut self, column: i32, row: i32) {
        self.resize = ResizeState::Resizing {
            start_x: column,
            start_y: row,
            start_width: self.rect.width,
            start_height: self.rect.height,
        };
    }

    /// Grow or shrink from the bottom-right handle: new size is the start
    /// size plus the pointer delta, symmetric on both axes. No-op unless a
    /// resize is in progress.
    pub fn update_resize(&mut self, column: i32, row: i32, viewport: Viewport) {
        let ResizeState::Resizing {
            start_x,
            start_y,
            start_width,
            start_height,
        } = self.resize
        else {
            return;
        };
        let width = i32::from(start_width) + (column - start_x);
        let height = i32::from(start_height) + (row - start_y);
        let proposed = WinRect {
            width: width.clamp(i32::from(self.limits.min_width), i32::from(u16::MAX)) as u16,
            height: height.clamp(i32::from(self.limits.min_height), i32::from(u16::MAX)) as u16,
            ..self.rect
        };
        self.rect = clamp_to_viewport(proposed, viewport, self.limits);
    }

    pub fn end_resize(&mut self) {
        self.resize = ResizeState::Idle;
    }

    // Chrome geometry. Render code and hit-testing share these so the
    // clickable cells are exactly the painted ones.

    /// Row carrying the title and the control buttons, inside the top border.
    pub fn header_row(&self) -> i32 {
        self.rect.y + 1
    }

    /// Cell of the minimize button.
    pub fn minimize_cell(&self) -> i32 {
        self.rect.right() - 5
    }

    /// Cell of the close button.
    pub fn close_cell(&self) -> i32 {
        self.rect.right() - 3
    }

    /// Cell of the bottom-right resize handle.
    pub fn resize_cell(&self) -> (i32, i32) {
        (self.rect.right() - 1, self.rect.bottom() - 1)
    }

    /// Content area inside the border and below the header row.
    pub fn content_rect(&self) -> Rect {
        let full = self.rect.to_rect();
        Rect {
            x: full.x.saturating_add(1),
            y: full.y.saturating_add(2),
            width: full.width.saturating_sub(2),
            height: full.height.saturating_sub(3),
        }
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        self.rect.contains(column, row)
    }

    /// Classify a pointer press on the header row. Control buttons win over
    /// the drag surface; presses outside the header report nothing.
    pub fn header_hit(&self, column: u16, row: u16) -> Option<HeaderHit> {
        let column = i32::from(column);
        if i32::from(row) != self.header_row() {
            return None;
        }
        if column <= self.rect.x || column >= self.rect.right() - 1 {
            return None;
        }
        if column == self.close_cell() {
            return Some(HeaderHit::Close);
        }
        if column == self.minimize_cell() {
            return Some(HeaderHit::Minimize);
        }
        Some(HeaderHit::Drag)
    }

    pub fn resize_hit(&self, column: u16, row: u16) -> bool {
        (i32::from(column), i32::from(row)) == self.resize_cell()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewport() -> Viewport {
        Viewport::new(800, 600, 50)
    }

    fn limits() -> SizeLimits {
        SizeLimits {
            min_width: 320,
            min_height: 250,
        }
    }

    fn controller() -> WindowController {
        WindowController::with_limits(
            WinRect::new(100, 100, 400, 300),
            viewport(),
            limits(),
            "Chat 1",
        )
    }

    #[test]
    fn drag_far_off_screen_pins_to_origin() {
        let mut win = controller();
        win.begin_drag(150, 150);
        win.update_drag(150 - 500, 150 - 500, viewport());
        assert_eq!(win.rect().x, 0);
        assert_eq!(win.rect().y, 0);
        win.end_drag();
        assert_eq!(win.drag_state(), DragState::Idle);
    }

    #[test]
    fn drag_preserves_grab_offset() {
        let mut win = controller();
        win.begin_drag(150, 150);
        win.update_drag(170, 160, viewport());
        assert_eq!(win.rect().x, 120);
        assert_eq!(win.rect().y, 110);
        // same pointer position applies the same rect
        win.update_drag(170, 160, viewport());
        assert_eq!(win.rect().x, 120);
        assert_eq!(win.rect().y, 110);
    }

    #[test]
    fn update_drag_without_begin_is_a_no_op() {
        let mut win = controller();
        let before = win.rect();
        win.update_drag(0, 0, viewport());
        assert_eq!(win.rect(), before);
        // ending an idle drag is safe
        win.end_drag();
        win.end_drag();
    }

    #[test]
    fn resize_below_minimum_clamps_to_minimum() {
        let mut win = controller();
        win.begin_resize(500, 400);
        // pointer delta of -300 would take the width to 100
        win.update_resize(200, 400, viewport());
        assert_eq!(win.rect().width, 320);
        assert_eq!(win.rect().height, 250);
        win.end_resize();
        win.end_resize();
        assert_eq!(win.resize_state(), ResizeState::Idle);
    }

    #[test]
    fn resize_is_symmetric_and_anchored_at_start_size() {
        let mut win = controller();
        win.begin_resize(500, 400);
        win.update_resize(530, 420, viewport());
        assert_eq!(win.rect().width, 430);
        assert_eq!(win.rect().height, 320);
        // computed from the start size, not from the previous update
        win.update_resize(510, 405, viewport());
        assert_eq!(win.rect().width, 410);
        assert_eq!(win.rect().height, 305);
    }

    #[test]
    fn resize_never_escapes_the_viewport() {
        let mut win = controller();
        win.begin_resize(500, 400);
        win.update_resize(5000, 5000, viewport());
        let rect = win.rect();
        assert!(rect.right() <= 800);
        assert!(rect.bottom() <= 550);
    }

    #[test]
    fn header_buttons_never_report_drag() {
        let win = controller();
        let row = win.header_row() as u16;
        assert_eq!(
            win.header_hit(win.close_cell() as u16, row),
            Some(HeaderHit::Close)
        );
        assert_eq!(
            win.header_hit(win.minimize_cell() as u16, row),
            Some(HeaderHit::Minimize)
        );
        assert_eq!(win.header_hit(150, row), Some(HeaderHit::Drag));
        // off the header row nothing registers
        assert_eq!(win.header_hit(150, row + 1), None);
    }

    #[test]
    fn minimize_drops_an_active_grab() {
        let mut win = controller();
        win.begin_drag(150, 150);
        win.minimize();
        assert!(win.is_minimized());
        assert_eq!(win.drag_state(), DragState::Idle);
        win.restore();
        assert_eq!(win.visibility(), Visibility::Normal);
    }

    #[test]
    fn clamp_to_restores_invariant_after_viewport_shrink() {
        let mut win = controller();
        let small = Viewport::new(400, 300, 10);
        win.clamp_to(small);
        let rect = win.rect();
        assert_eq!(rect.x, 0);
        assert_eq!(rect.y, 0);
        assert_eq!(rect.width, 400);
        assert_eq!(rect.height, 290);
    }
}
