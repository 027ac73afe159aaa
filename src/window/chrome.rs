//! Window decoration: border, header row with title and control buttons,
//! and the bottom-right resize handle. The clickable cells are defined by
//! the controller so hit-testing and painting cannot drift apart.

use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Clear, Widget};

use crate::theme;
use crate::ui::{fill_rect, safe_set_string};

use super::WindowController;

pub fn render_window_chrome(frame: &mut Frame, window: &WindowController, focused: bool) {
    let rect = window.rect().to_rect();
    let bounds = rect.intersection(frame.area());
    if bounds.width < 3 || bounds.height < 4 {
        return;
    }
    let buffer = frame.buffer_mut();

    Clear.render(bounds, buffer);
    fill_rect(buffer, bounds, Style::default().bg(theme::window_bg()));

    let border_style = Style::default()
        .fg(theme::border_fg())
        .bg(theme::window_bg());
    let left = rect.x;
    let top = rect.y;
    let right = rect.x + rect.width - 1;
    let bottom = rect.y + rect.height - 1;

    for x in left..=right {
        let symbol = if x == left {
            "┌"
        } else if x == right {
            "┐"
        } else {
            "─"
        };
        safe_set_string(buffer, bounds, x, top, symbol, border_style);
        let symbol = if x == left {
            "└"
        } else if x == right {
            "┘"
        } else {
            "─"
        };
        safe_set_string(buffer, bounds, x, bottom, symbol, border_style);
    }
    for y in top + 1..bottom {
        safe_set_string(buffer, bounds, left, y, "│", border_style);
        safe_set_string(buffer, bounds, right, y, "│", border_style);
    }

    // header row inside the top border
    let header_style = if focused {
        Style::default()
            .bg(theme::header_focused_bg())
            .fg(theme::header_focused_fg())
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().bg(theme::header_bg()).fg(theme::header_fg())
    };
    let header_y = window.header_row() as u16;
    for x in left + 1..right {
        safe_set_string(buffer, bounds, x, header_y, " ", header_style);
    }
    let title = window.title();
    let header_width = usize::from(rect.width.saturating_sub(2));
    if title.chars().count() + 2 <= header_width {
        safe_set_string(buffer, bounds, left + 2, header_y, title, header_style);
    }
    safe_set_string(
        buffer,
        bounds,
        window.minimize_cell() as u16,
        header_y,
        "_",
        header_style,
    );
    safe_set_string(
        buffer,
        bounds,
        window.close_cell() as u16,
        header_y,
        "×",
        header_style,
    );

    // resize handle in the bottom-right border corner
    let (handle_x, handle_y) = window.resize_cell();
    safe_set_string(
        buffer,
        bounds,
        handle_x as u16,
        handle_y as u16,
        "◢",
        border_style,
    );
}
