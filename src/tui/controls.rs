//! Keyboard input handling for the TUI.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::runtime::{App, Focus};
use crate::client::Transport;

/// Maps a key event to an application action.
///
/// Guards on [`KeyEventKind::Press`] to avoid double-fire on some terminals.
pub fn handle_key<T: Transport>(app: &mut App<T>, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.quit = true;
        return;
    }
    match key.code {
        KeyCode::Tab => return app.focus_next(),
        KeyCode::BackTab => return app.focus_prev(),
        KeyCode::Esc if app.focus != Focus::Actions => {
            app.focus = Focus::Actions;
            return;
        }
        _ => {}
    }

    match app.focus {
        Focus::Actions => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => app.quit = true,
            KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
            KeyCode::Down | KeyCode::Char('j') => app.select_next(),
            KeyCode::Enter => app.trigger_selected(),
            _ => {}
        },
        Focus::SymType => match key.code {
            KeyCode::Left | KeyCode::Right | KeyCode::Char(' ') => app.toggle_sym_type(),
            KeyCode::Enter => app.focus = Focus::Actions,
            _ => {}
        },
        Focus::LoadingLevel | Focus::RandomCases | Focus::Items => match key.code {
            KeyCode::Char(c) => app.input_char(c),
            KeyCode::Backspace => app.backspace(),
            KeyCode::Enter => app.focus = Focus::Actions,
            _ => {}
        },
    }
}
