use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap};

use crate::api::{Field, UserFields};
use crate::app::{AppState, InputMode, ModalState};
use crate::ui::components::centered_rect;

/// One labelled input line; `focused` adds the marker and a cursor.
fn field_lines(values: &UserFields, focused: Option<Field>, app: &AppState) -> Vec<Line<'static>> {
    let mut lines = Vec::with_capacity(Field::ALL.len() * 2);
    for field in Field::ALL {
        let is_focused = focused == Some(field);
        let marker = if is_focused { "▶ " } else { "  " };
        let cursor = if is_focused { "_" } else { "" };
        let label_style = if is_focused {
            Style::default()
                .fg(app.theme.highlight_fg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.muted)
        };
        lines.push(Line::from(Span::styled(
            format!("{marker}{}:", field.label()),
            label_style,
        )));
        lines.push(Line::from(Span::styled(
            format!("    {}{cursor}", values.get(field)),
            Style::default().fg(app.theme.text),
        )));
    }
    lines
}

/// Render the "new user" form from the console's draft.
pub fn render_user_form(f: &mut Frame, area: Rect, app: &AppState) {
    let editing = app.input_mode == InputMode::Form
        || (app.input_mode == InputMode::Modal && app.resume_mode == InputMode::Form);
    let focused = editing.then_some(app.form_field);
    let mut lines = field_lines(&app.view.draft, focused, app);
    lines.push(Line::raw(""));
    let hint = if editing {
        "[ Add user ]  Enter: submit  Tab: next  Esc: leave"
    } else {
        "n: start typing"
    };
    lines.push(Line::from(Span::styled(
        hint,
        Style::default().fg(app.theme.muted),
    )));

    let border = if editing {
        app.theme.highlight_fg
    } else {
        app.theme.border
    };
    let p = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title("New user")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border)),
    );
    f.render_widget(p, area);
}

pub fn render_users_table(f: &mut Frame, area: Rect, app: &mut AppState) {
    let block = Block::default()
        .title("Users")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(if app.input_mode == InputMode::Normal {
            app.theme.highlight_fg
        } else {
            app.theme.border
        }));

    if app.view.users.is_empty() {
        let text = if app.view.loading {
            "Loading..."
        } else {
            "No users registered"
        };
        let p = Paragraph::new(text)
            .style(Style::default().fg(app.theme.muted))
            .block(block);
        f.render_widget(p, area);
        return;
    }

    let body_height = area.height.saturating_sub(3) as usize;
    if body_height > 0 {
        app.rows_per_page = body_height;
    }

    let start = (app.selected_user_index / app.rows_per_page) * app.rows_per_page;
    let end = (start + app.rows_per_page).min(app.view.users.len());
    let slice = &app.view.users[start..end];

    let rows = slice.iter().enumerate().map(|(i, u)| {
        let absolute_index = start + i;
        let style = if absolute_index == app.selected_user_index {
            Style::default()
                .fg(app.theme.highlight_fg)
                .bg(app.theme.highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(app.theme.text)
        };
        let avatar = u.avatar().map(|a| format!("({a})")).unwrap_or_default();
        Row::new(vec![
            Cell::from(avatar),
            Cell::from(u.id.to_string()),
            Cell::from(u.full_name.clone()),
            Cell::from(u.email.clone()),
            Cell::from(u.phone_display().to_string()),
        ])
        .style(style)
    });

    let widths = [
        Constraint::Length(4),
        Constraint::Length(6),
        Constraint::Fill(3),
        Constraint::Fill(4),
        Constraint::Length(14),
    ];

    let header = Row::new(vec!["", "ID", "NAME", "EMAIL", "PHONE"]).style(
        Style::default()
            .fg(app.theme.title)
            .add_modifier(Modifier::BOLD),
    );

    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .column_spacing(1);

    f.render_widget(table, area);
}

pub fn render_user_modal(f: &mut Frame, area: Rect, app: &AppState, state: &ModalState) {
    match state {
        ModalState::EditUser { values, field } => {
            let rect = centered_rect(56, 11, area);
            let mut lines = field_lines(values, Some(*field), app);
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                "Enter: save  Tab: next field  Esc: cancel",
                Style::default().fg(app.theme.muted),
            )));
            let p = Paragraph::new(lines).block(
                Block::default()
                    .title("Edit user")
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.border)),
            );
            f.render_widget(Clear, rect);
            f.render_widget(p, rect);
        }
        ModalState::Confirm {
            title,
            text,
            confirm_label,
            cancel_label,
            selected,
        } => {
            let rect = centered_rect(50, 7, area);
            let button = |label: &str, active: bool| {
                if active {
                    format!("[{label}]")
                } else {
                    format!(" {label} ")
                }
            };
            let body = format!(
                "{text}\n\n  {}    {}",
                button(confirm_label, *selected == 0),
                button(cancel_label, *selected == 1)
            );
            let p = Paragraph::new(body).wrap(Wrap { trim: false }).block(
                Block::default()
                    .title(title.as_str())
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(app.theme.danger)),
            );
            f.render_widget(Clear, rect);
            f.render_widget(p, rect);
        }
        ModalState::Message { .. } | ModalState::Help { .. } => { /* routed to components */ }
    }
}
