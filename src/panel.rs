use crossterm::event::{Event, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Clear;

use crate::theme;
use crate::ui::{fill_rect, rect_contains, safe_set_string, truncate_to_width};
use crate::window::WindowId;

/// Start-menu entries, top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartMenuAction {
    NewChat,
    Source,
    Credits,
    Exit,
}

pub const START_MENU_ITEMS: &[(&str, StartMenuAction)] = &[
    ("New Chat", StartMenuAction::NewChat),
    ("Source", StartMenuAction::Source),
    ("Credits", StartMenuAction::Credits),
    ("Exit", StartMenuAction::Exit),
];

/// One taskbar button per window, as the shell sees it.
#[derive(Debug, Clone)]
pub struct PanelItem {
    pub id: WindowId,
    pub label: String,
    pub focused: bool,
    pub minimized: bool,
}

/// The taskbar row at the bottom of the terminal: start button, one button
/// per window, and a clock on the right. The start menu pops up above the
/// row. Hit rectangles are rebuilt every frame.
#[derive(Debug, Default)]
pub struct Panel {
    area: Rect,
    start_rect: Option<Rect>,
    menu_bounds: Option<Rect>,
    window_hits: Vec<(WindowId, Rect)>,
    menu_item_hits: Vec<(usize, Rect)>,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    /// Split the terminal into the managed desktop area and the taskbar
    /// row at the bottom.
    pub fn split_area(&mut self, area: Rect, height: u16) -> (Rect, Rect) {
        let bar_height = height.min(area.height);
        let bar = Rect {
            x: area.x,
            y: area
                .y
                .saturating_add(area.height)
                .saturating_sub(bar_height),
            width: area.width,
            height: bar_height,
        };
        let managed = Rect {
            x: area.x,
            y: area.y,
            width: area.width,
            height: area.height.saturating_sub(bar_height),
        };
        self.area = bar;
        (managed, bar)
    }

    pub fn begin_frame(&mut self) {
        self.start_rect = None;
        self.menu_bounds = None;
        self.window_hits.clear();
        self.menu_item_hits.clear();
    }

    pub fn render(&mut self, frame: &mut Frame, items: &[PanelItem], menu_open: bool, clock: &str) {
        let area = self.area;
        if area.width == 0 || area.height == 0 {
            return;
        }
        let buffer = frame.buffer_mut();
        let bounds = area.intersection(buffer.area);
        if bounds.width == 0 || bounds.height == 0 {
            return;
        }
        fill_rect(
            buffer,
            bounds,
            Style::default().bg(theme::panel_bg()).fg(theme::panel_fg()),
        );

        let mut x = area.x;
        let y = area.y;
        let max_x = area.x.saturating_add(area.width);

        const PKG_NAME: &str = env!("CARGO_PKG_NAME");
        let start_label = format!("≡ {PKG_NAME}");
        let start_width = start_label.chars().count() as u16;
        if x.saturating_add(start_width) <= max_x {
            let start_style = if menu_open {
                Style::default()
                    .bg(theme::menu_bg())
                    .fg(theme::menu_fg())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default()
                    .bg(theme::panel_bg())
                    .fg(theme::panel_fg())
                    .add_modifier(Modifier::BOLD)
            };
            safe_set_string(buffer, bounds, x, y, &start_label, start_style);
            self.start_rect = Some(Rect {
                x,
                y,
                width: start_width,
                height: 1,
            });
            x = x.saturating_add(start_width).saturating_add(1);
        }

        // clock on the right edge; window buttons get whatever is left
        let clock_width = clock.chars().count() as u16;
        let clock_x = max_x.saturating_sub(clock_width.saturating_add(1));
        let buttons_end = clock_x.saturating_sub(1);

        for item in items {
            let label = truncate_to_width(&item.label, 12);
            let chunk = format!(" {label} ");
            let chunk_width = chunk.chars().count() as u16;
            if x.saturating_add(chunk_width) > buttons_end {
                break;
            }
            let style = if item.focused {
                Style::default()
                    .bg(theme::menu_selected_bg())
                    .fg(theme::menu_selected_fg())
                    .add_modifier(Modifier::BOLD)
            } else if item.minimized {
                Style::default()
                    .bg(theme::panel_bg())
                    .fg(theme::panel_inactive_fg())
                    .add_modifier(Modifier::DIM)
            } else {
                Style::default().bg(theme::panel_bg()).fg(theme::panel_fg())
            };
            safe_set_string(buffer, bounds, x, y, &chunk, style);
            self.window_hits.push((
                item.id,
                Rect {
                    x,
                    y,
                    width: chunk_width,
                    height: 1,
                },
            ));
            x = x.saturating_add(chunk_width);
        }

        if clock_width > 0 && clock_x >= area.x {
            safe_set_string(
                buffer,
                bounds,
                clock_x,
                y,
                clock,
                Style::default().bg(theme::panel_bg()).fg(theme::panel_fg()),
            );
        }
    }

    /// Draw the start menu above the taskbar when it is open.
    pub fn render_menu(&mut self, frame: &mut Frame, screen: Rect, open: bool, selected: usize) {
        if !open {
            return;
        }
        let Some(anchor) = self.start_rect else {
            return;
        };
        let label_width = START_MENU_ITEMS
            .iter()
            .map(|(label, _)| label.chars().count() as u16)
            .max()
            .unwrap_or(1);
        let width = (label_width + 4).min(screen.width);
        let height = (START_MENU_ITEMS.len() as u16).min(anchor.y.saturating_sub(screen.y));
        if width == 0 || height == 0 {
            return;
        }
        let rect = Rect {
            x: anchor.x.min(screen.x + screen.width - width),
            y: anchor.y.saturating_sub(height),
            width,
            height,
        };
        self.menu_bounds = Some(rect);
        frame.render_widget(Clear, rect);
        let buffer = frame.buffer_mut();
        fill_rect(
            buffer,
            rect,
            Style::default().bg(theme::menu_bg()).fg(theme::menu_fg()),
        );
        for (idx, (label, _)) in START_MENU_ITEMS.iter().enumerate().take(usize::from(height)) {
            let y = rect.y + idx as u16;
            let marker = if idx == selected { ">" } else { " " };
            let line = truncate_to_width(&format!("{marker} {label}"), usize::from(width));
            let style = if idx == selected {
                Style::default()
                    .bg(theme::menu_selected_bg())
                    .fg(theme::menu_selected_fg())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().bg(theme::menu_bg()).fg(theme::menu_fg())
            };
            safe_set_string(buffer, rect, rect.x, y, &line, style);
            self.menu_item_hits.push((
                idx,
                Rect {
                    x: rect.x,
                    y,
                    width,
                    height: 1,
                },
            ));
        }
    }

    pub fn hit_start(&self, event: &Event) -> bool {
        let Event::Mouse(mouse) = event else {
            return false;
        };
        if !matches!(mouse.kind, MouseEventKind::Down(_)) {
            return false;
        }
        self.start_rect
            .is_some_and(|rect| rect_contains(rect, mouse.column, mouse.row))
    }

    pub fn hit_window(&self, event: &Event) -> Option<WindowId> {
        let Event::Mouse(mouse) = event else {
            return None;
        };
        if !matches!(mouse.kind, MouseEventKind::Down(_)) {
            return None;
        }
        self.window_hits
            .iter()
            .find(|(_, rect)| rect_contains(*rect, mouse.column, mouse.row))
            .map(|(id, _)| *id)
    }

    pub fn hit_menu_item(&self, event: &Event) -> Option<StartMenuAction> {
        let Event::Mouse(mouse) = event else {
            return None;
        };
        if !matches!(mouse.kind, MouseEventKind::Down(_)) {
            return None;
        }
        self.menu_item_hits
            .iter()
            .find(|(_, rect)| rect_contains(*rect, mouse.column, mouse.row))
            .map(|(idx, _)| START_MENU_ITEMS[*idx].1)
    }

    pub fn menu_contains(&self, column: u16, row: u16) -> bool {
        self.menu_bounds
            .is_some_and(|rect| rect_contains(rect, column, row))
    }

    pub fn contains(&self, column: u16, row: u16) -> bool {
        rect_contains(self.area, column, row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyModifiers, MouseButton, MouseEvent};

    fn click(column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind: MouseEventKind::Down(MouseButton::Left),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn split_area_reserves_the_bottom_row() {
        let mut panel = Panel::new();
        let area = Rect {
            x: 0,
            y: 0,
            width: 80,
            height: 24,
        };
        let (managed, bar) = panel.split_area(area, 1);
        assert_eq!(managed.height, 23);
        assert_eq!(bar.y, 23);
        assert_eq!(bar.height, 1);
        assert_eq!(panel.area(), bar);
    }

    #[test]
    fn hit_tests_miss_before_any_render() {
        let mut panel = Panel::new();
        panel.begin_frame();
        assert!(!panel.hit_start(&click(0, 0)));
        assert!(panel.hit_window(&click(0, 0)).is_none());
        assert!(panel.hit_menu_item(&click(0, 0)).is_none());
        assert!(!panel.menu_contains(0, 0));
    }

    #[test]
    fn menu_items_cover_all_actions() {
        let actions: Vec<StartMenuAction> =
            START_MENU_ITEMS.iter().map(|(_, action)| *action).collect();
        assert!(actions.contains(&StartMenuAction::NewChat));
        assert!(actions.contains(&StartMenuAction::Source));
        assert!(actions.contains(&StartMenuAction::Credits));
        assert!(actions.contains(&StartMenuAction::Exit));
    }
}
