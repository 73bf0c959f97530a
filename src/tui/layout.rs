//! TUI layout and widget rendering.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use super::runtime::{App, Focus};
use super::style;
use crate::catalogue::{ActionKind, SymType};
use crate::client::Transport;
use crate::view::Phase;

/// Renders the full TUI frame.
pub fn render<T: Transport>(frame: &mut Frame, app: &App<T>) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // header
            Constraint::Min(10),   // body
            Constraint::Length(1), // footer
        ])
        .split(frame.area());

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(46), Constraint::Min(20)])
        .split(rows[1]);

    let left = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(5)])
        .split(body[0]);

    render_header(frame, app, rows[0]);
    render_form(frame, app, left[0]);
    render_actions(frame, app, left[1]);
    render_response(frame, app, body[1]);
    render_footer(frame, app, rows[2]);
}

/// Header bar: project name, backend, request state.
fn render_header<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let state_label = match app.state().phase() {
        Phase::Idle => "IDLE",
        Phase::Pending => "PENDING",
        Phase::Settled => "READY",
    };
    let header = Line::from(vec![
        Span::styled(
            " HYNET ",
            Style::default()
                .fg(style::HEADER_FG)
                .bg(style::HEADER_BG)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" {} │ {state_label} ", app.backend)),
    ]);
    frame.render_widget(Paragraph::new(header), area);
}

/// One form row, `label: value`, with a cursor when the field is focused.
fn field_line<'a>(label: &'a str, value: String, focused: bool) -> Line<'a> {
    let marker = if focused { "▸ " } else { "  " };
    let cursor = if focused { "_" } else { "" };
    Line::from(vec![
        Span::raw(marker),
        Span::styled(format!("{label:<14}"), Style::default().fg(style::SECTION_FG)),
        Span::raw(format!("{value}{cursor}")),
    ])
}

fn render_form<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let sym = SymType::ALL
        .iter()
        .map(|t| {
            if *t == app.form.sym_type {
                format!("[{t}]")
            } else {
                format!(" {t} ")
            }
        })
        .collect::<Vec<_>>()
        .join(" ");
    let items = if app.form.items.is_empty() && app.focus != Focus::Items {
        "(all)".to_string()
    } else {
        app.form.items.clone()
    };

    let lines = vec![
        Line::from(vec![
            Span::raw(if app.focus == Focus::SymType { "▸ " } else { "  " }),
            Span::styled(
                format!("{:<14}", "Sym type"),
                Style::default().fg(style::SECTION_FG),
            ),
            Span::raw(sym),
        ]),
        field_line(
            "Loading level",
            app.form.loading_level.clone(),
            app.focus == Focus::LoadingLevel,
        ),
        field_line(
            "Random cases",
            app.form.random_cases.clone(),
            app.focus == Focus::RandomCases,
        ),
        field_line("Items", items, app.focus == Focus::Items),
    ];

    let focused = app.focus != Focus::Actions;
    let block = Block::default()
        .title(" Parameters ")
        .borders(Borders::ALL)
        .border_style(style::border(focused));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

/// Action list grouped by section, scrolled to keep the selection visible.
fn render_actions<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let in_flight = app.is_in_flight();
    let mut lines = Vec::new();
    let mut selected_line = 0;
    let mut section = None;
    for (i, kind) in ActionKind::ALL.iter().enumerate() {
        if section != Some(kind.section()) {
            section = Some(kind.section());
            lines.push(Line::from(Span::styled(
                kind.section().title(),
                Style::default()
                    .fg(style::SECTION_FG)
                    .add_modifier(Modifier::BOLD),
            )));
        }
        if i == app.selected {
            selected_line = lines.len();
        }
        lines.push(Line::from(Span::styled(
            format!("  {}", kind.label()),
            style::action(i == app.selected, in_flight),
        )));
    }

    let inner_height = usize::from(area.height.saturating_sub(2));
    let scroll = (selected_line + 1).saturating_sub(inner_height);

    let block = Block::default()
        .title(" Actions ")
        .borders(Borders::ALL)
        .border_style(style::border(app.focus == Focus::Actions));
    let paragraph = Paragraph::new(lines)
        .block(block)
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));
    frame.render_widget(paragraph, area);
}

/// Last response: loading indicator, error, pretty JSON, or a hint.
fn render_response<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let state = app.state();
    let mut lines = Vec::new();

    if let Some(pending) = state.pending() {
        lines.push(Line::from(Span::styled(
            format!("Loading… ({})", pending.action.label()),
            Style::default().fg(style::PENDING),
        )));
    }
    if let Some(error) = state.last_error() {
        lines.extend(error.lines().map(|l| {
            Line::from(Span::styled(
                l.to_string(),
                Style::default().fg(style::RESULT_ERR),
            ))
        }));
    } else if let Some(result) = state.last_result() {
        lines.extend(result.to_pretty().lines().map(|l| {
            Line::from(Span::styled(
                l.to_string(),
                Style::default().fg(style::RESULT_OK),
            ))
        }));
    } else if !state.is_in_flight() {
        lines.push(Line::from(Span::styled(
            "Trigger an action to see the API response here.",
            Style::default().fg(style::MUTED),
        )));
    }

    let title = match state.shown_action() {
        Some(kind) => format!(" Last response: {} ", kind.label()),
        None => " Last response ".to_string(),
    };
    let block = Block::default().title(title).borders(Borders::ALL);
    frame.render_widget(
        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false }),
        area,
    );
}

/// Footer with keybinding hints, or the current notice.
fn render_footer<T: Transport>(frame: &mut Frame, app: &App<T>, area: Rect) {
    let text = match &app.notice {
        Some(notice) => format!(" {notice}"),
        None if app.focus == Focus::Actions => {
            " q:Quit  ↑/↓:Select  Enter:Run  Tab:Edit parameters".to_string()
        }
        None => " Esc:Back  Tab:Next field  ←/→/Space:Toggle  Ctrl-C:Quit".to_string(),
    };
    let footer = Paragraph::new(Line::from(Span::styled(
        text,
        Style::default().fg(style::FOOTER_FG),
    )));
    frame.render_widget(footer, area);
}

#[cfg(test)]
mod tests {
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    use super::*;
    use crate::client::testing::RecordingTransport;
    use crate::view::FormFields;

    fn screen(app: &App<RecordingTransport>) -> String {
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();
        let buffer = terminal.backend().buffer();
        buffer
            .content()
            .chunks(usize::from(buffer.area.width))
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn idle_screen_shows_hint_and_sections() {
        let app = App::new(
            RecordingTransport::default(),
            FormFields::default(),
            "http://127.0.0.1:8000/api/example",
        );
        let text = screen(&app);
        assert!(text.contains("HYNET"));
        assert!(text.contains("IDLE"));
        assert!(text.contains("Generator"));
        assert!(text.contains("Change sym type"));
        assert!(text.contains("[classical]"));
        assert!(text.contains("Trigger an action"));
    }
}
