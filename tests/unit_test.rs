// UI-side tests for user-console: key handling, prompt plumbing and rendering.
// They drive AppState directly; no real terminal is needed.

fn user(id: i64, name: &str, phone: Option<&str>) -> user_console::api::User {
    user_console::api::User {
        id: user_console::api::UserId::Number(id),
        full_name: name.to_string(),
        email: format!("{}@x.io", name.to_lowercase()),
        phone: phone.map(str::to_string),
    }
}

fn test_app() -> user_console::app::AppState {
    use user_console::app::AppState;
    use user_console::app::keymap::Keymap;
    use user_console::app::theme::Theme;

    AppState::new(
        "http://localhost:8080/api/usuarios",
        Theme::dark(),
        Keymap::default(),
    )
}

fn press(code: crossterm::event::KeyCode) -> crossterm::event::KeyEvent {
    crossterm::event::KeyEvent::new(code, crossterm::event::KeyModifiers::NONE)
}

fn ctrl(c: char) -> crossterm::event::KeyEvent {
    crossterm::event::KeyEvent::new(
        crossterm::event::KeyCode::Char(c),
        crossterm::event::KeyModifiers::CONTROL,
    )
}

#[cfg(test)]
mod key_tests {
    use super::*;
    use crossterm::event::KeyCode;
    use tokio::sync::mpsc;
    use user_console::api::{Field, UserId};
    use user_console::app::console::{Command, DraftEdit, ViewState};
    use user_console::app::update::{Flow, handle_key};
    use user_console::app::InputMode;

    fn loaded_app() -> user_console::app::AppState {
        let mut app = test_app();
        app.apply_snapshot(ViewState {
            users: vec![user(1, "Ana", None), user(2, "Bo", Some("555"))],
            ..ViewState::default()
        });
        app
    }

    #[test]
    fn quit_key_stops_the_loop() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = loaded_app();
        assert_eq!(handle_key(&mut app, press(KeyCode::Char('q')), &tx), Flow::Quit);
    }

    #[test]
    fn list_keys_target_the_selected_user() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = loaded_app();

        handle_key(&mut app, press(KeyCode::Char('j')), &tx);
        handle_key(&mut app, press(KeyCode::Char('j')), &tx);
        assert_eq!(app.selected_user_index, 1);

        handle_key(&mut app, press(KeyCode::Char('d')), &tx);
        handle_key(&mut app, press(KeyCode::Enter), &tx);
        handle_key(&mut app, press(KeyCode::Char('r')), &tx);
        assert_eq!(rx.try_recv().unwrap(), Command::Delete(UserId::Number(2)));
        assert_eq!(rx.try_recv().unwrap(), Command::Edit(UserId::Number(2)));
        assert_eq!(rx.try_recv().unwrap(), Command::Refresh);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn empty_list_sends_no_row_commands() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = test_app();
        handle_key(&mut app, press(KeyCode::Char('d')), &tx);
        handle_key(&mut app, press(KeyCode::Char('e')), &tx);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn form_mode_edits_draft_and_submits() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = loaded_app();

        handle_key(&mut app, press(KeyCode::Char('n')), &tx);
        assert_eq!(app.input_mode, InputMode::Form);

        handle_key(&mut app, press(KeyCode::Char('q')), &tx);
        handle_key(&mut app, press(KeyCode::Tab), &tx);
        handle_key(&mut app, press(KeyCode::Backspace), &tx);
        handle_key(&mut app, press(KeyCode::Enter), &tx);
        handle_key(&mut app, press(KeyCode::Esc), &tx);

        assert_eq!(
            rx.try_recv().unwrap(),
            Command::EditDraft {
                field: Field::FullName,
                edit: DraftEdit::Push('q')
            }
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            Command::EditDraft {
                field: Field::Email,
                edit: DraftEdit::Pop
            }
        );
        assert_eq!(rx.try_recv().unwrap(), Command::SubmitCreate);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn help_opens_and_closes_without_commands() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = loaded_app();
        handle_key(&mut app, press(KeyCode::Char('?')), &tx);
        assert_eq!(app.input_mode, InputMode::Modal);
        handle_key(&mut app, press(KeyCode::Esc), &tx);
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.modal.is_none());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn snapshot_clamps_selection() {
        let mut app = loaded_app();
        app.selected_user_index = 1;
        app.apply_snapshot(ViewState {
            users: vec![user(1, "Ana", None)],
            ..ViewState::default()
        });
        assert_eq!(app.selected_user_index, 0);
        app.apply_snapshot(ViewState::default());
        assert_eq!(app.selected_user_index, 0);
        assert!(app.selected_user().is_none());
    }
}

#[cfg(test)]
mod prompt_tests {
    use super::*;
    use crossterm::event::KeyCode;
    use std::time::{Duration, Instant};
    use tokio::sync::{mpsc, oneshot};
    use user_console::api::UserFields;
    use user_console::app::update::{Flow, handle_key};
    use user_console::app::{InputMode, ModalState};
    use user_console::dialog::{DialogOutcome, Prompt, PromptRequest};

    fn ask(
        app: &mut user_console::app::AppState,
        prompt: Prompt,
    ) -> oneshot::Receiver<DialogOutcome> {
        let (reply, answer) = oneshot::channel();
        app.open_prompt(
            PromptRequest {
                prompt,
                reply: Some(reply),
            },
            Instant::now(),
        );
        answer
    }

    fn confirm() -> Prompt {
        Prompt::Confirm {
            title: "Delete user?".into(),
            text: "This action cannot be undone.".into(),
            confirm_label: "Yes, delete".into(),
            cancel_label: "Cancel".into(),
        }
    }

    #[test]
    fn confirm_defaults_to_cancel() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = test_app();
        let mut answer = ask(&mut app, confirm());
        assert_eq!(app.input_mode, InputMode::Modal);

        handle_key(&mut app, press(KeyCode::Enter), &tx);
        assert_eq!(answer.try_recv().unwrap(), DialogOutcome::Dismissed);
        assert_eq!(app.input_mode, InputMode::Normal);
    }

    #[test]
    fn confirm_accepts_after_switching_button() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = test_app();

        let mut answer = ask(&mut app, confirm());
        handle_key(&mut app, press(KeyCode::Left), &tx);
        handle_key(&mut app, press(KeyCode::Enter), &tx);
        assert_eq!(answer.try_recv().unwrap(), DialogOutcome::Confirmed);

        let mut answer = ask(&mut app, confirm());
        handle_key(&mut app, press(KeyCode::Char('y')), &tx);
        assert_eq!(answer.try_recv().unwrap(), DialogOutcome::Confirmed);
    }

    #[test]
    fn edit_dialog_submits_all_three_fields() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = test_app();
        let mut answer = ask(
            &mut app,
            Prompt::EditUser {
                initial: UserFields::new("Ana", "ana@x.io", "55"),
            },
        );

        handle_key(&mut app, press(KeyCode::Backspace), &tx);
        handle_key(&mut app, press(KeyCode::Tab), &tx);
        handle_key(&mut app, press(KeyCode::Tab), &tx);
        handle_key(&mut app, press(KeyCode::Char('7')), &tx);
        handle_key(&mut app, press(KeyCode::Enter), &tx);

        assert_eq!(
            answer.try_recv().unwrap(),
            DialogOutcome::Submitted(UserFields::new("An", "ana@x.io", "557"))
        );
        // Typing inside a dialog never reaches the console as draft edits.
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn edit_dialog_ctrl_u_clears_focused_field() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = test_app();
        let mut answer = ask(
            &mut app,
            Prompt::EditUser {
                initial: UserFields::new("Ana", "ana@x.io", "55"),
            },
        );

        handle_key(&mut app, press(KeyCode::Tab), &tx);
        handle_key(&mut app, ctrl('u'), &tx);
        handle_key(&mut app, press(KeyCode::Char('b')), &tx);
        handle_key(&mut app, press(KeyCode::Enter), &tx);

        assert_eq!(
            answer.try_recv().unwrap(),
            DialogOutcome::Submitted(UserFields::new("Ana", "b", "55"))
        );
    }

    #[test]
    fn ctrl_c_quits_from_form_and_dialogs() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut app = test_app();
        app.input_mode = InputMode::Form;
        assert_eq!(handle_key(&mut app, ctrl('c'), &tx), Flow::Quit);

        let _answer = ask(&mut app, confirm());
        assert_eq!(handle_key(&mut app, ctrl('c'), &tx), Flow::Quit);
        // Nothing was typed into the draft.
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn edit_dialog_cancel_is_dismissed() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = test_app();
        let mut answer = ask(
            &mut app,
            Prompt::EditUser {
                initial: UserFields::default(),
            },
        );
        handle_key(&mut app, press(KeyCode::Esc), &tx);
        assert_eq!(answer.try_recv().unwrap(), DialogOutcome::Dismissed);
        assert!(app.modal.is_none());
    }

    #[test]
    fn warning_returns_to_form_mode() {
        let (tx, _rx) = mpsc::unbounded_channel();
        let mut app = test_app();
        app.input_mode = InputMode::Form;
        let mut answer = ask(
            &mut app,
            Prompt::Warning {
                title: "Incomplete fields".into(),
                text: "Please fill in all fields.".into(),
            },
        );
        assert!(matches!(app.modal, Some(ModalState::Message { .. })));
        handle_key(&mut app, press(KeyCode::Enter), &tx);
        assert_eq!(answer.try_recv().unwrap(), DialogOutcome::Dismissed);
        assert_eq!(app.input_mode, InputMode::Form);
    }

    #[test]
    fn toast_does_not_take_focus_and_expires() {
        let mut app = test_app();
        let now = Instant::now();
        app.open_prompt(
            PromptRequest {
                prompt: Prompt::Toast {
                    title: "User added".into(),
                    duration: Duration::from_millis(1400),
                },
                reply: None,
            },
            now,
        );
        assert_eq!(app.input_mode, InputMode::Normal);
        assert!(app.toast.is_some());
        app.expire_toast(now + Duration::from_millis(1399));
        assert!(app.toast.is_some());
        app.expire_toast(now + Duration::from_millis(1400));
        assert!(app.toast.is_none());
    }
}

#[cfg(test)]
mod render_tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;
    use user_console::api::UserFields;
    use user_console::app::ModalState;
    use user_console::app::console::ViewState;
    use user_console::ui;

    fn draw(app: &mut user_console::app::AppState) -> Vec<String> {
        let mut terminal = Terminal::new(TestBackend::new(110, 30)).unwrap();
        terminal.draw(|f| ui::render(f, app)).unwrap();
        let buffer = terminal.backend().buffer().clone();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|c| c.symbol()).collect::<String>())
            .collect()
    }

    fn screen(lines: &[String]) -> String {
        lines.join("\n")
    }

    #[test]
    fn rows_show_avatar_and_phone_placeholder() {
        let mut app = test_app();
        app.apply_snapshot(ViewState {
            users: vec![user(1, "ana", Some("555-1234")), user(2, "Bo", None)],
            ..ViewState::default()
        });
        let lines = draw(&mut app);
        let text = screen(&lines);
        assert!(text.contains("(A)"));
        assert!(text.contains("555-1234"));
        assert!(text.contains("2 users"));
        let bo_row = lines
            .iter()
            .find(|l| l.contains("bo@x.io"))
            .expect("row for Bo");
        assert!(bo_row.contains("(B)"));
        assert!(bo_row.contains(" - "));
    }

    #[test]
    fn empty_and_loading_states() {
        let mut app = test_app();
        assert!(screen(&draw(&mut app)).contains("Loading..."));

        app.apply_snapshot(ViewState::default());
        let text = screen(&draw(&mut app));
        assert!(text.contains("No users registered"));
        assert!(text.contains("0 users"));
    }

    #[test]
    fn error_banner_keeps_stale_rows() {
        let mut app = test_app();
        app.apply_snapshot(ViewState {
            users: vec![user(1, "Ana", None)],
            error: Some("Could not load users".into()),
            ..ViewState::default()
        });
        let text = screen(&draw(&mut app));
        assert!(text.contains("Could not load users"));
        assert!(text.contains("ana@x.io"));
    }

    #[test]
    fn edit_modal_shows_current_values() {
        let mut app = test_app();
        app.apply_snapshot(ViewState::default());
        app.open_modal(ModalState::EditUser {
            values: UserFields::new("Ana Ruiz", "ana@x.io", "555"),
            field: user_console::api::Field::Email,
        });
        let text = screen(&draw(&mut app));
        assert!(text.contains("Edit user"));
        assert!(text.contains("Ana Ruiz"));
        assert!(text.contains("ana@x.io_"));
    }
}

#[cfg(test)]
mod wiring_tests {
    use super::*;
    use std::time::{Duration, Instant};
    use user_console::api::{HttpUsersApi, UsersApi};
    use user_console::app::update::{spawn_console, sync_from_console};

    // Nothing listens on port 9; the refresh fails and surfaces as the banner.
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn unreachable_server_sets_error_banner() {
        let api = HttpUsersApi::new("http://127.0.0.1:9/api/usuarios");
        assert!(api.list_users().await.is_err());

        let mut link = spawn_console(&tokio::runtime::Handle::current(), api);
        let mut app = test_app();
        let deadline = Instant::now() + Duration::from_secs(10);
        while app.view.error.is_none() && Instant::now() < deadline {
            tokio::time::sleep(Duration::from_millis(50)).await;
            sync_from_console(&mut app, &mut link, Instant::now());
        }
        assert_eq!(app.view.error.as_deref(), Some("Could not load users"));
        assert!(!app.view.loading);
        assert!(app.view.users.is_empty());
        // A failed load is a banner, not a dialog.
        assert!(app.modal.is_none());
    }
}
