//! Shared UI components (header, status bar, banners, modal helpers).
//!
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::app::keymap::KeyAction;
use crate::app::{AppState, InputMode, MessageKind, ModalState};

/// Title bar with the endpoint and the list size (or a loading marker).
pub fn render_header(f: &mut Frame, area: Rect, app: &AppState) {
    let meta = if app.view.loading {
        "Loading...".to_string()
    } else {
        format!("{} users", app.view.users.len())
    };
    let p = Paragraph::new(format!("{}  |  {meta}", app.endpoint))
        .block(
            Block::default()
                .title("User management")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        )
        .style(
            Style::default()
                .fg(app.theme.header_fg)
                .bg(app.theme.header_bg),
        );
    f.render_widget(p, area);
}

pub fn render_error_banner(f: &mut Frame, area: Rect, app: &AppState, message: &str) {
    let p = Paragraph::new(message.to_string())
        .style(Style::default().fg(app.theme.danger))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.danger)),
        );
    f.render_widget(p, area);
}

fn first_key(app: &AppState, action: KeyAction) -> String {
    app.keymap
        .keys_for(action)
        .into_iter()
        .next()
        .unwrap_or_else(|| "-".to_string())
}

/// Render the bottom status bar with mode, in-flight work and key hints.
pub fn render_status_bar(f: &mut Frame, area: Rect, app: &AppState) {
    let mode = match app.input_mode {
        InputMode::Normal => "LIST",
        InputMode::Form => "FORM",
        InputMode::Modal => "DIALOG",
    };
    let busy = app
        .view
        .pending
        .map(|k| format!("  {}", k.progress_label()))
        .unwrap_or_default();
    let hints = [
        (KeyAction::FocusForm, "new"),
        (KeyAction::EditSelection, "edit"),
        (KeyAction::DeleteSelection, "delete"),
        (KeyAction::Refresh, "refresh"),
        (KeyAction::OpenHelp, "help"),
        (KeyAction::Quit, "quit"),
    ]
    .iter()
    .map(|(action, label)| format!("{}: {label}", first_key(app, *action)))
    .collect::<Vec<_>>()
    .join("  ");
    let msg = format!("mode: {mode}{busy}  |  {hints}");
    let p = Paragraph::new(msg).style(
        Style::default()
            .fg(app.theme.status_fg)
            .bg(app.theme.status_bg),
    );
    f.render_widget(p, area);
}

/// Compute a rectangle centered within `area` with a maximum size.
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect {
        x,
        y,
        width: width.min(area.width),
        height: height.min(area.height),
    }
}

/// Blocking warning or error dialog.
pub fn render_message_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    if let ModalState::Message { kind, title, text } = state {
        let color = match kind {
            MessageKind::Warning => app.theme.highlight_fg,
            MessageKind::Error => app.theme.danger,
        };
        let max_w = area.width.saturating_sub(6).max(30);
        let width = 46u16.min(max_w);
        let approx_lines = (text.len() as u16 / width.saturating_sub(4).max(10)).max(1);
        let height = (approx_lines + 5).min(area.height.saturating_sub(4).max(6));
        let rect = centered_rect(width, height, area);
        let lines = vec![
            Line::raw(text.clone()),
            Line::raw(""),
            Line::from(Span::styled(
                "Enter: OK",
                Style::default().add_modifier(Modifier::ITALIC),
            )),
        ];
        let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
            Block::default()
                .title(title.as_str())
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
        f.render_widget(Clear, rect);
        f.render_widget(p, rect);
    }
}

/// Transient notification pinned to the top-right corner.
pub fn render_toast(f: &mut Frame, area: Rect, app: &AppState) {
    let Some(toast) = &app.toast else {
        return;
    };
    let width = (toast.title.chars().count() as u16 + 6)
        .max(20)
        .min(area.width);
    let rect = Rect {
        x: area.x + area.width.saturating_sub(width + 1),
        y: area.y + 1,
        width,
        height: 3u16.min(area.height),
    };
    let p = Paragraph::new(format!("✔ {}", toast.title))
        .style(Style::default().fg(app.theme.success))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.success)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}

/// Render the help modal with the active keybindings.
pub fn render_help_modal(f: &mut Frame, area: Rect, app: &AppState, scroll: u16) {
    let width = 64u16.min(area.width.saturating_sub(4)).max(40);
    let height = 20u16.min(area.height.saturating_sub(4)).max(10);
    let rect = centered_rect(width, height, area);

    let bold = Style::default().add_modifier(Modifier::BOLD);
    let italic = Style::default().add_modifier(Modifier::ITALIC);
    let row = |label: &str, keys: String| {
        Line::from(vec![
            Span::raw(format!("  {label:<22}")),
            Span::styled(keys, italic),
        ])
    };
    let keys = |action: KeyAction| app.keymap.keys_for(action).join(", ");

    let mut lines: Vec<Line> = vec![Line::from(Span::styled("Users list", bold))];
    for (label, action) in [
        ("Move", KeyAction::MoveDown),
        ("Move up", KeyAction::MoveUp),
        ("Page down", KeyAction::PageDown),
        ("Page up", KeyAction::PageUp),
        ("Edit user", KeyAction::EditSelection),
        ("Delete user", KeyAction::DeleteSelection),
        ("Refresh", KeyAction::Refresh),
        ("New user form", KeyAction::FocusForm),
        ("Help", KeyAction::OpenHelp),
        ("Quit", KeyAction::Quit),
    ] {
        lines.push(row(label, keys(action)));
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled("Form and dialogs", bold)));
    for (label, value) in [
        ("Next / previous field", "Tab / Shift+Tab"),
        ("Submit / confirm", "Enter"),
        ("Clear field", "Ctrl+u"),
        ("Cancel / close", "Esc"),
        ("Pick answer", "Left / Right, y / n"),
    ] {
        lines.push(row(label, value.to_string()));
    }

    let p = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .title("Help")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(app.theme.border)),
        );
    f.render_widget(Clear, rect);
    f.render_widget(p, rect);
}
