use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Clear;

use crate::chat::{ChatSession, Role};
use crate::models::ModelId;
use crate::theme;
use crate::ui::{fill_rect, rect_contains, safe_set_string, truncate_to_width};

/// What the shell should do in response to an input event the view handled.
/// The view never talks to the session or the network itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatViewAction {
    Submit(String),
    SelectModel(ModelId),
    NewChat,
}

/// Transcript scroll position, measured in lines up from the bottom so a
/// growing transcript stays anchored at the latest entry. Wheel deltas
/// accumulate in `pending` and are folded in once the line count for the
/// frame is known.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScrollState {
    offset: usize,
    pending: isize,
}

impl ScrollState {
    pub fn reset(&mut self) {
        self.offset = 0;
        self.pending = 0;
    }

    pub fn bump(&mut self, delta: isize) {
        self.pending = self.pending.saturating_add(delta);
    }

    /// Fold pending deltas into the offset and clamp it to the scrollable
    /// range. Returns the settled offset.
    pub fn apply(&mut self, total: usize, view: usize) -> usize {
        let max_offset = total.saturating_sub(view);
        if self.pending != 0 {
            let delta = self.pending;
            self.pending = 0;
            self.offset = if delta.is_negative() {
                self.offset.saturating_sub(delta.unsigned_abs())
            } else {
                self.offset.saturating_add(delta as usize)
            };
        }
        self.offset = self.offset.min(max_offset);
        self.offset
    }
}

const NEW_CHAT_LABEL: &str = "[ New Chat ]";
const SEND_LABEL: &str = "[ Send ]";

/// Everything inside one chat window's content area: toolbar, transcript,
/// model dropdown, input line, and footer. Hit rectangles are rebuilt on
/// every render, so clickable cells are exactly the painted ones.
#[derive(Debug, Default)]
pub struct ChatView {
    input: String,
    scroll: ScrollState,
    dropdown_open: bool,
    new_chat_rect: Option<Rect>,
    model_rect: Option<Rect>,
    send_rect: Option<Rect>,
    transcript_rect: Option<Rect>,
    dropdown_hits: Vec<(ModelId, Rect)>,
}

impl ChatView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    pub fn dropdown_open(&self) -> bool {
        self.dropdown_open
    }

    /// Jump back to the latest transcript entry.
    pub fn scroll_to_bottom(&mut self) {
        self.scroll.reset();
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, session: &ChatSession, focused: bool) {
        self.new_chat_rect = None;
        self.model_rect = None;
        self.send_rect = None;
        self.transcript_rect = None;
        self.dropdown_hits.clear();
        if area.width < 10 || area.height < 4 {
            return;
        }

        let toolbar_y = area.y;
        let footer_y = area.y + area.height - 1;
        let input_y = footer_y - 1;
        let transcript = Rect {
            x: area.x,
            y: toolbar_y + 1,
            width: area.width,
            height: input_y.saturating_sub(toolbar_y + 1),
        };
        self.transcript_rect = Some(transcript);

        self.render_toolbar(frame, area, toolbar_y, session);
        self.render_transcript(frame, transcript, session);
        self.render_input(frame, area, input_y, session, focused);
        self.render_footer(frame, area, footer_y, session);
        if self.dropdown_open {
            self.render_dropdown(frame, area, transcript, session);
        }
    }

    fn render_toolbar(&mut self, frame: &mut Frame, bounds: Rect, y: u16, session: &ChatSession) {
        let buffer = frame.buffer_mut();
        let button_style = Style::default()
            .bg(theme::panel_bg())
            .fg(theme::panel_fg());
        let mut x = bounds.x;

        safe_set_string(buffer, bounds, x, y, NEW_CHAT_LABEL, button_style);
        self.new_chat_rect = Some(Rect {
            x,
            y,
            width: NEW_CHAT_LABEL.len() as u16,
            height: 1,
        });
        x += NEW_CHAT_LABEL.len() as u16 + 1;

        let model_label = match session.model() {
            Some(model) => format!("[ {} ▼ ]", model.label()),
            None => "[ Select Model ▼ ]".to_string(),
        };
        let available = (bounds.x + bounds.width).saturating_sub(x);
        let model_width = (model_label.chars().count() as u16).min(available);
        safe_set_string(buffer, bounds, x, y, &model_label, button_style);
        if model_width > 0 {
            self.model_rect = Some(Rect {
                x,
                y,
                width: model_width,
                height: 1,
            });
        }
    }

    fn render_transcript(&mut self, frame: &mut Frame, area: Rect, session: &ChatSession) {
        if area.width == 0 || area.height == 0 {
            return;
        }
        let lines = transcript_lines(session, usize::from(area.width));
        let view = usize::from(area.height);
        let offset = self.scroll.apply(lines.len(), view);
        let end = lines.len() - offset.min(lines.len());
        let start = end.saturating_sub(view);

        let buffer = frame.buffer_mut();
        for (row, (text, style)) in lines[start..end].iter().enumerate() {
            safe_set_string(buffer, area, area.x, area.y + row as u16, text, *style);
        }
    }

    fn render_input(
        &mut self,
        frame: &mut Frame,
        bounds: Rect,
        y: u16,
        session: &ChatSession,
        focused: bool,
    ) {
        let buffer = frame.buffer_mut();
        let send_width = SEND_LABEL.len() as u16;
        let field_width = bounds.width.saturating_sub(send_width + 3);

        let prompt_style = Style::default().fg(theme::muted_fg());
        safe_set_string(buffer, bounds, bounds.x, y, ">", prompt_style);

        // show the tail of the input when it outgrows the field
        let mut text: String = self
            .input
            .chars()
            .rev()
            .take(usize::from(field_width.saturating_sub(1)))
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        if focused && !session.is_pending() {
            text.push('_');
        }
        safe_set_string(buffer, bounds, bounds.x + 2, y, &text, Style::default());

        if session.is_pending() {
            // the send affordance disappears while a request is in flight
            safe_set_string(
                buffer,
                bounds,
                bounds.x + bounds.width - send_width,
                y,
                "[ …    ]",
                Style::default().fg(theme::muted_fg()),
            );
        } else {
            let send_x = bounds.x + bounds.width - send_width;
            safe_set_string(
                buffer,
                bounds,
                send_x,
                y,
                SEND_LABEL,
                Style::default()
                    .bg(theme::panel_bg())
                    .fg(theme::panel_fg()),
            );
            self.send_rect = Some(Rect {
                x: send_x,
                y,
                width: send_width,
                height: 1,
            });
        }
    }

    fn render_footer(&mut self, frame: &mut Frame, bounds: Rect, y: u16, session: &ChatSession) {
        let text = if session.is_pending() {
            "Thinking…".to_string()
        } else {
            match session.model() {
                Some(model) => format!("Model: {}", model.label()),
                None => "Select a model to begin".to_string(),
            }
        };
        let style = Style::default().fg(theme::muted_fg());
        safe_set_string(frame.buffer_mut(), bounds, bounds.x, y, &text, style);
    }

    fn render_dropdown(
        &mut self,
        frame: &mut Frame,
        bounds: Rect,
        below: Rect,
        session: &ChatSession,
    ) {
        let width = ModelId::ALL
            .iter()
            .map(|model| model.label().chars().count() as u16 + 4)
            .max()
            .unwrap_or(8)
            .min(bounds.width);
        let height = (ModelId::ALL.len() as u16).min(below.height);
        if width == 0 || height == 0 {
            return;
        }
        let anchor_x = self.model_rect.map(|rect| rect.x).unwrap_or(bounds.x);
        let x = anchor_x.min(bounds.x + bounds.width - width);
        let rect = Rect {
            x,
            y: below.y,
            width,
            height,
        };
        frame.render_widget(Clear, rect);
        let buffer = frame.buffer_mut();
        fill_rect(
            buffer,
            rect,
            Style::default().bg(theme::menu_bg()).fg(theme::menu_fg()),
        );
        for (idx, model) in ModelId::ALL.iter().enumerate().take(usize::from(height)) {
            let y = rect.y + idx as u16;
            let selected = session.model() == Some(*model);
            let marker = if selected { "●" } else { "○" };
            let line = truncate_to_width(
                &format!(" {marker} {} ", model.label()),
                usize::from(width),
            );
            let style = if selected {
                Style::default()
                    .bg(theme::menu_selected_bg())
                    .fg(theme::menu_selected_fg())
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().bg(theme::menu_bg()).fg(theme::menu_fg())
            };
            safe_set_string(buffer, rect, rect.x, y, &line, style);
            self.dropdown_hits.push((
                *model,
                Rect {
                    x: rect.x,
                    y,
                    width,
                    height: 1,
                },
            ));
        }
    }

    /// Keyboard input for the focused window.
    pub fn handle_key(&mut self, key: &KeyEvent) -> Option<ChatViewAction> {
        if self.dropdown_open && key.code == KeyCode::Esc {
            self.dropdown_open = false;
            return None;
        }
        match key.code {
            KeyCode::Enter => Some(ChatViewAction::Submit(self.input.clone())),
            KeyCode::Backspace => {
                self.input.pop();
                None
            }
            KeyCode::PageUp => {
                self.scroll.bump(3);
                None
            }
            KeyCode::PageDown => {
                self.scroll.bump(-3);
                None
            }
            KeyCode::Char(ch)
                if !key
                    .modifiers
                    .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.input.push(ch);
                None
            }
            _ => None,
        }
    }

    /// Pointer input anywhere in the window content area.
    pub fn handle_mouse(&mut self, mouse: &MouseEvent) -> Option<ChatViewAction> {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                let (column, row) = (mouse.column, mouse.row);
                if self.dropdown_open {
                    // an open dropdown swallows the press: select or dismiss
                    self.dropdown_open = false;
                    let hit = self
                        .dropdown_hits
                        .iter()
                        .find(|(_, rect)| rect_contains(*rect, column, row))
                        .map(|(model, _)| *model);
                    return hit.map(ChatViewAction::SelectModel);
                }
                if self
                    .model_rect
                    .is_some_and(|rect| rect_contains(rect, column, row))
                {
                    self.dropdown_open = true;
                    return None;
                }
                if self
                    .new_chat_rect
                    .is_some_and(|rect| rect_contains(rect, column, row))
                {
                    return Some(ChatViewAction::NewChat);
                }
                if self
                    .send_rect
                    .is_some_and(|rect| rect_contains(rect, column, row))
                {
                    return Some(ChatViewAction::Submit(self.input.clone()));
                }
                None
            }
            MouseEventKind::ScrollUp => {
                if self
                    .transcript_rect
                    .is_some_and(|rect| rect_contains(rect, mouse.column, mouse.row))
                {
                    self.scroll.bump(3);
                }
                None
            }
            MouseEventKind::ScrollDown => {
                if self
                    .transcript_rect
                    .is_some_and(|rect| rect_contains(rect, mouse.column, mouse.row))
                {
                    self.scroll.bump(-3);
                }
                None
            }
            _ => None,
        }
    }
}

/// Flatten the transcript into styled, wrapped lines for the viewport.
fn transcript_lines(session: &ChatSession, width: usize) -> Vec<(String, Style)> {
    let mut lines = Vec::new();
    for entry in session.transcript() {
        let (prefix, color) = match entry.role {
            Role::User => ("You: ", theme::user_fg()),
            Role::Assistant => ("AI: ", theme::assistant_fg()),
        };
        let style = Style::default().fg(color);
        for (idx, line) in wrap_text(&format!("{prefix}{}", entry.text), width)
            .into_iter()
            .enumerate()
        {
            // continuation lines keep the role color but indent slightly
            let text = if idx == 0 { line } else { format!("  {line}") };
            lines.push((text, style));
        }
    }
    lines
}

/// Greedy word wrap on character counts. Words longer than the width are
/// hard-split rather than overflowing the window border.
fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let mut lines = Vec::new();
    for raw_line in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0usize;
        for word in raw_line.split_whitespace() {
            let word_len = word.chars().count();
            let sep = usize::from(current_len > 0);
            if current_len + sep + word_len <= width {
                if sep == 1 {
                    current.push(' ');
                }
                current.push_str(word);
                current_len += sep + word_len;
                continue;
            }
            if current_len > 0 {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if word_len <= width {
                current.push_str(word);
                current_len = word_len;
            } else {
                // hard-split an overlong word; the last chunk stays open so
                // a following word can share its line
                let mut chars = word.chars().peekable();
                while chars.peek().is_some() {
                    let chunk: String = chars.by_ref().take(width).collect();
                    if chars.peek().is_some() {
                        lines.push(chunk);
                    } else {
                        current_len = chunk.chars().count();
                        current = chunk;
                    }
                }
            }
        }
        lines.push(current);
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Viewport;
    use crate::window::WindowManager;

    fn session() -> ChatSession {
        let mut wm = WindowManager::new(Viewport::new(100, 40, 1));
        let id = wm.create_window(|_| ());
        ChatSession::new(id)
    }

    #[test]
    fn wrap_text_wraps_on_word_boundaries() {
        let lines = wrap_text("the quick brown fox jumps", 10);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn wrap_text_hard_splits_overlong_words() {
        let lines = wrap_text("abcdefghij", 4);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_text_keeps_explicit_newlines() {
        let lines = wrap_text("a\nb", 10);
        assert_eq!(lines, vec!["a", "b"]);
    }

    #[test]
    fn transcript_lines_prefix_roles() {
        let mut s = session();
        s.select_model(ModelId::GptOss20b);
        s.submit("hello").unwrap();
        s.resolve(Ok("hi".to_string()));
        let lines = transcript_lines(&s, 40);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].0, "You: hello");
        assert_eq!(lines[1].0, "AI: hi");
    }

    #[test]
    fn typing_and_backspace_edit_the_input() {
        let mut view = ChatView::new();
        for ch in "hey".chars() {
            view.handle_key(&KeyEvent::new(KeyCode::Char(ch), KeyModifiers::NONE));
        }
        view.handle_key(&KeyEvent::new(KeyCode::Backspace, KeyModifiers::NONE));
        assert_eq!(view.input(), "he");
    }

    #[test]
    fn control_chords_do_not_reach_the_input() {
        let mut view = ChatView::new();
        view.handle_key(&KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert_eq!(view.input(), "");
    }

    #[test]
    fn enter_submits_current_input_without_clearing_it() {
        let mut view = ChatView::new();
        view.handle_key(&KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        let action = view.handle_key(&KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert_eq!(action, Some(ChatViewAction::Submit("x".to_string())));
        // the shell clears the input only after a successful submit
        assert_eq!(view.input(), "x");
    }

    #[test]
    fn scroll_state_clamps_and_anchors_at_bottom() {
        let mut scroll = ScrollState::default();
        assert_eq!(scroll.apply(100, 10), 0);
        scroll.bump(1000);
        assert_eq!(scroll.apply(100, 10), 90);
        scroll.bump(-5);
        assert_eq!(scroll.apply(100, 10), 85);
        // shrinking content pulls the offset back in range
        assert_eq!(scroll.apply(20, 10), 10);
    }
}
