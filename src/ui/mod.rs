pub mod components;
pub mod users;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use crate::app::{AppState, ModalState};

pub fn render(f: &mut Frame, app: &mut AppState) {
    let root = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(8), Constraint::Length(1)].as_ref())
        .split(f.area());
    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(35), Constraint::Percentage(65)].as_ref())
        .split(root[1]);

    components::render_header(f, root[0], app);
    users::render_user_form(f, body[0], app);

    if let Some(message) = app.view.error.clone() {
        let right = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(3), Constraint::Min(5)].as_ref())
            .split(body[1]);
        components::render_error_banner(f, right[0], app, &message);
        users::render_users_table(f, right[1], app);
    } else {
        users::render_users_table(f, body[1], app);
    }

    components::render_status_bar(f, root[2], app);

    let area = f.area();
    if app.modal.is_some() {
        render_modal(f, area, app);
    }
    if app.toast.is_some() {
        components::render_toast(f, area, app);
    }
}

fn render_modal(f: &mut Frame, area: Rect, app: &AppState) {
    if let Some(state) = &app.modal {
        match state {
            ModalState::Confirm { .. } | ModalState::EditUser { .. } => {
                users::render_user_modal(f, area, app, state);
            }
            ModalState::Message { .. } => {
                components::render_message_modal(f, area, app, state);
            }
            ModalState::Help { scroll } => {
                components::render_help_modal(f, area, app, *scroll);
            }
        }
    }
}
