//! Buffer drawing helpers shared by the panel, window chrome, and dialogs.
//!
//! Components sometimes compute coordinates that drift past the edge of the
//! buffer (a window hugging the right edge, a clock on a narrow terminal).
//! Writing out of bounds into a `Buffer` panics, so every raw write goes
//! through these clipped helpers.

use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;

/// Write `text` at `(x, y)`, truncated to whatever fits inside `bounds`.
/// Writes that start outside the bounds are dropped.
pub(crate) fn safe_set_string(
    buffer: &mut Buffer,
    bounds: Rect,
    x: u16,
    y: u16,
    text: &str,
    style: Style,
) {
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let max_x = bounds.x.saturating_add(bounds.width);
    let max_y = bounds.y.saturating_add(bounds.height);
    if x < bounds.x || x >= max_x || y < bounds.y || y >= max_y {
        return;
    }
    let text = truncate_to_width(text, usize::from(max_x.saturating_sub(x)));
    buffer.set_string(x, y, text, style);
}

pub(crate) fn truncate_to_width(value: &str, width: usize) -> String {
    if value.chars().count() <= width {
        return value.to_string();
    }
    value.chars().take(width).collect()
}

/// Repaint every cell of `rect` (clipped to the buffer area) with a blank
/// symbol in `style`. Used for panel rows and window backgrounds.
pub(crate) fn fill_rect(buffer: &mut Buffer, rect: Rect, style: Style) {
    let bounds = rect.intersection(buffer.area);
    for y in bounds.y..bounds.y.saturating_add(bounds.height) {
        for x in bounds.x..bounds.x.saturating_add(bounds.width) {
            if let Some(cell) = buffer.cell_mut((x, y)) {
                cell.set_symbol(" ");
                cell.set_style(style);
            }
        }
    }
}

pub(crate) fn rect_contains(rect: Rect, column: u16, row: u16) -> bool {
    column >= rect.x
        && column < rect.x.saturating_add(rect.width)
        && row >= rect.y
        && row < rect.y.saturating_add(rect.height)
}
