use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::theme;
use crate::ui::{rect_contains, safe_set_string};

/// A centered modal dialog with a single `[ OK ]` button. Used for both the
/// validation-error dialog and the credits dialog; while visible it owns
/// the input stream.
#[derive(Debug, Clone)]
pub struct DialogOverlay {
    title: String,
    body: String,
    visible: bool,
    width: u16,
    height: u16,
    accent_title: bool,
    // rebuilt on every render for hit-testing
    ok_rect: Option<Rect>,
}

impl DialogOverlay {
    pub fn new() -> Self {
        Self {
            title: String::new(),
            body: String::new(),
            visible: false,
            width: 48,
            height: 8,
            accent_title: false,
            ok_rect: None,
        }
    }

    /// Tint the title in the error color.
    pub fn with_accent_title(mut self) -> Self {
        self.accent_title = true;
        self
    }

    pub fn set_size(&mut self, width: u16, height: u16) {
        self.width = width;
        self.height = height;
    }

    pub fn open(&mut self, title: impl Into<String>, body: impl Into<String>) {
        self.title = title.into();
        self.body = body.into();
        self.visible = true;
    }

    pub fn close(&mut self) {
        self.visible = false;
        self.ok_rect = None;
    }

    pub fn visible(&self) -> bool {
        self.visible
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    /// Clamp the dialog to the available area so a cramped terminal never
    /// draws outside the buffer.
    pub fn rect_for(&self, area: Rect) -> Rect {
        let mut width = area.width.min(self.width).max(1);
        let mut height = area.height.min(self.height).max(1);
        if area.width >= 24 {
            width = width.max(24);
        }
        if area.height >= 5 {
            height = height.max(5);
        }
        let x = area.x.saturating_add(area.width.saturating_sub(width) / 2);
        let y = area
            .y
            .saturating_add(area.height.saturating_sub(height) / 2);
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.ok_rect = None;
        if !self.visible || area.width == 0 || area.height == 0 {
            return;
        }
        let rect = self.rect_for(area);
        frame.render_widget(Clear, rect);

        let title_style = if self.accent_title {
            Style::default()
                .fg(theme::error_fg())
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
                .fg(theme::dialog_fg())
                .add_modifier(Modifier::BOLD)
        };
        let block = Block::default()
            .title(self.title.as_str())
            .title_style(title_style)
            .borders(Borders::ALL);
        let paragraph = Paragraph::new(self.body.as_str())
            .style(
                Style::default()
                    .bg(theme::dialog_bg())
                    .fg(theme::dialog_fg()),
            )
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, rect);

        // OK button on the row above the bottom border
        const OK: &str = "[ OK ]";
        if rect.height >= 3 && rect.width as usize >= OK.len() + 2 {
            let ok_width = OK.len() as u16;
            let ok_x = rect.x + (rect.width - ok_width) / 2;
            let ok_y = rect.y + rect.height - 2;
            let ok_rect = Rect {
                x: ok_x,
                y: ok_y,
                width: ok_width,
                height: 1,
            };
            let style = Style::default()
                .bg(theme::menu_selected_bg())
                .fg(theme::menu_selected_fg())
                .add_modifier(Modifier::BOLD);
            safe_set_string(frame.buffer_mut(), rect, ok_x, ok_y, OK, style);
            self.ok_rect = Some(ok_rect);
        }
    }

    /// True when a pointer press lands on the OK button.
    pub fn hit_ok(&self, column: u16, row: u16) -> bool {
        self.ok_rect
            .is_some_and(|rect| rect_contains(rect, column, row))
    }
}

impl Default for DialogOverlay {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_for_clamps_to_tiny_areas() {
        let dlg = DialogOverlay::new();
        let area = Rect {
            x: 0,
            y: 0,
            width: 10,
            height: 2,
        };
        let r = dlg.rect_for(area);
        assert!(r.width >= 1 && r.width <= 10);
        assert!(r.height >= 1 && r.height <= 2);

        let area2 = Rect {
            x: 0,
            y: 0,
            width: 80,
            height: 24,
        };
        let r2 = dlg.rect_for(area2);
        assert!(r2.width >= 24);
        assert!(r2.height >= 5);
    }

    #[test]
    fn open_close_round_trip() {
        let mut dlg = DialogOverlay::new();
        assert!(!dlg.visible());
        dlg.open("Error", "Please enter a message to send.");
        assert!(dlg.visible());
        assert_eq!(dlg.body(), "Please enter a message to send.");
        dlg.close();
        assert!(!dlg.visible());
        // no stale hit rect survives a close
        assert!(!dlg.hit_ok(0, 0));
    }
}
