use ratatui::style::Color;

// Centralized theme colors. Kept as small helpers so the palette can be
// swapped in one place.

// Desktop
pub fn desktop_bg() -> Color {
    Color::Indexed(6)
}

// Window chrome
pub fn header_focused_bg() -> Color {
    Color::Blue
}
pub fn header_focused_fg() -> Color {
    Color::White
}
pub fn header_bg() -> Color {
    Color::DarkGray
}
pub fn header_fg() -> Color {
    Color::Gray
}
pub fn border_fg() -> Color {
    Color::DarkGray
}
pub fn window_bg() -> Color {
    Color::Black
}

// Transcript
pub fn user_fg() -> Color {
    Color::Cyan
}
pub fn assistant_fg() -> Color {
    Color::Green
}
pub fn muted_fg() -> Color {
    Color::DarkGray
}

// Panel / menu
pub fn panel_bg() -> Color {
    Color::Gray
}
pub fn panel_fg() -> Color {
    Color::Black
}
pub fn panel_inactive_fg() -> Color {
    Color::DarkGray
}
pub fn menu_bg() -> Color {
    Color::DarkGray
}
pub fn menu_fg() -> Color {
    Color::White
}
pub fn menu_selected_bg() -> Color {
    Color::Gray
}
pub fn menu_selected_fg() -> Color {
    Color::Black
}

// Dialogs
pub fn dialog_bg() -> Color {
    Color::Black
}
pub fn dialog_fg() -> Color {
    Color::White
}
pub fn error_fg() -> Color {
    Color::Red
}
