//! Color constants for the TUI.

use ratatui::style::{Color, Modifier, Style};

/// Header bar foreground.
pub const HEADER_FG: Color = Color::White;
/// Header bar background.
pub const HEADER_BG: Color = Color::Blue;
/// Footer help text color.
pub const FOOTER_FG: Color = Color::DarkGray;
/// Section titles in the action list.
pub const SECTION_FG: Color = Color::Cyan;
/// Successful response text.
pub const RESULT_OK: Color = Color::Green;
/// Error response text.
pub const RESULT_ERR: Color = Color::Red;
/// "Loading…" indicator.
pub const PENDING: Color = Color::Yellow;
/// Placeholder and disabled text.
pub const MUTED: Color = Color::DarkGray;

/// Border style for a widget, highlighted when focused.
pub fn border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    }
}

/// Style for an action entry.
///
/// Entries are dimmed while a request is in flight, since triggers are
/// refused until it settles.
pub fn action(selected: bool, in_flight: bool) -> Style {
    let base = if in_flight {
        Style::default().fg(MUTED)
    } else {
        Style::default()
    };
    if selected {
        base.add_modifier(Modifier::REVERSED | Modifier::BOLD)
    } else {
        base
    }
}
