use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::Backend;
use std::time::{Duration, Instant};
use tokio::runtime::Handle;
use tokio::sync::{mpsc, watch};

use crate::api::{HttpUsersApi, UsersApi};
use crate::app::console::{Command, Console, DraftEdit, ViewState};
use crate::app::keymap::{KeyAction, Keymap};
use crate::app::theme::Theme;
use crate::app::{AppState, InputMode, ModalState};
use crate::config::Cli;
use crate::dialog::{ChannelDialogs, DialogOutcome, PromptRequest};
use crate::ui;

/// The UI's end of a running console.
pub struct ConsoleLink {
    pub commands: mpsc::UnboundedSender<Command>,
    pub snapshots: watch::Receiver<ViewState>,
    pub prompts: mpsc::UnboundedReceiver<PromptRequest>,
}

/// Whether the event loop should keep going.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Start a console over `api` on `handle`. It performs the initial refresh right away.
pub fn spawn_console<A>(handle: &Handle, api: A) -> ConsoleLink
where
    A: UsersApi + 'static,
{
    let (dialogs, prompts) = ChannelDialogs::new();
    let (snapshot_tx, snapshots) = watch::channel(ViewState {
        loading: true,
        ..ViewState::default()
    });
    let (commands, command_rx) = mpsc::unbounded_channel();
    let console = Console::new(api, dialogs).with_snapshots(snapshot_tx);
    handle.spawn(console.run(command_rx));
    ConsoleLink {
        commands,
        snapshots,
        prompts,
    }
}

/// Run the whole application against the configured endpoint.
pub fn run<B: Backend>(terminal: &mut Terminal<B>, cli: &Cli) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_all()
        .build()?;
    let endpoint = cli.api.base_url();
    tracing::info!(%endpoint, "starting user console");

    let link = spawn_console(runtime.handle(), HttpUsersApi::new(endpoint.clone()));
    let app = AppState::new(
        endpoint,
        Theme::load_or_init(&cli.theme),
        Keymap::load_or_init(&cli.keybinds),
    );
    let res = run_app(terminal, app, link);

    runtime.shutdown_timeout(Duration::from_millis(500));
    tracing::info!("user console stopped");
    res
}

pub fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut app: AppState,
    mut link: ConsoleLink,
) -> Result<()> {
    loop {
        sync_from_console(&mut app, &mut link, Instant::now());
        terminal.draw(|f| ui::render(f, &mut app))?;

        if event::poll(Duration::from_millis(100))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && handle_key(&mut app, key, &link.commands) == Flow::Quit
        {
            break;
        }
    }
    // Release a console that is still waiting on us.
    app.answer(DialogOutcome::Dismissed);
    Ok(())
}

/// Pull the latest snapshot and any pending prompts into `app`.
pub fn sync_from_console(app: &mut AppState, link: &mut ConsoleLink, now: Instant) {
    if link.snapshots.has_changed().unwrap_or(false) {
        let view = link.snapshots.borrow_and_update().clone();
        app.apply_snapshot(view);
    }
    while let Ok(request) = link.prompts.try_recv() {
        app.open_prompt(request, now);
    }
    app.expire_toast(now);
}

fn send(commands: &mpsc::UnboundedSender<Command>, command: Command) {
    if let Err(err) = commands.send(command) {
        tracing::warn!(command = ?err.0, "console stopped; command dropped");
    }
}

fn is_ctrl(key: &KeyEvent, c: char) -> bool {
    key.code == KeyCode::Char(c) && key.modifiers.contains(KeyModifiers::CONTROL)
}

fn is_text_input(key: &KeyEvent) -> bool {
    !key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
}

pub fn handle_key(
    app: &mut AppState,
    key: KeyEvent,
    commands: &mpsc::UnboundedSender<Command>,
) -> Flow {
    // Ctrl+c quits from anywhere; the list resolves it through the keymap.
    if app.input_mode != InputMode::Normal && is_ctrl(&key, 'c') {
        return Flow::Quit;
    }
    match app.input_mode {
        InputMode::Normal => return handle_list_key(app, key, commands),
        InputMode::Form => handle_form_key(app, key, commands),
        InputMode::Modal => handle_modal_key(app, key),
    }
    Flow::Continue
}

fn handle_list_key(
    app: &mut AppState,
    key: KeyEvent,
    commands: &mpsc::UnboundedSender<Command>,
) -> Flow {
    let Some(action) = app.keymap.resolve(&key) else {
        return Flow::Continue;
    };
    let len = app.view.users.len();
    let rpp = app.rows_per_page.max(1);
    match action {
        KeyAction::Quit => return Flow::Quit,
        KeyAction::OpenHelp => app.open_modal(ModalState::Help { scroll: 0 }),
        KeyAction::FocusForm => app.input_mode = InputMode::Form,
        KeyAction::EditSelection => {
            if let Some(u) = app.selected_user() {
                send(commands, Command::Edit(u.id.clone()));
            }
        }
        KeyAction::DeleteSelection => {
            if let Some(u) = app.selected_user() {
                send(commands, Command::Delete(u.id.clone()));
            }
        }
        KeyAction::Refresh => send(commands, Command::Refresh),
        KeyAction::MoveUp => {
            app.selected_user_index = app.selected_user_index.saturating_sub(1);
        }
        KeyAction::MoveDown => {
            if app.selected_user_index + 1 < len {
                app.selected_user_index += 1;
            }
        }
        KeyAction::PageUp => {
            app.selected_user_index = app.selected_user_index.saturating_sub(rpp);
        }
        KeyAction::PageDown => {
            let new_idx = app.selected_user_index.saturating_add(rpp);
            app.selected_user_index = new_idx.min(len.saturating_sub(1));
        }
        KeyAction::Ignore => {}
    }
    Flow::Continue
}

fn handle_form_key(app: &mut AppState, key: KeyEvent, commands: &mpsc::UnboundedSender<Command>) {
    let field = app.form_field;
    match key.code {
        KeyCode::Esc => app.input_mode = InputMode::Normal,
        KeyCode::Tab | KeyCode::Down => app.form_field = field.next(),
        KeyCode::BackTab | KeyCode::Up => app.form_field = field.prev(),
        KeyCode::Enter => send(commands, Command::SubmitCreate),
        KeyCode::Backspace => send(
            commands,
            Command::EditDraft {
                field,
                edit: DraftEdit::Pop,
            },
        ),
        KeyCode::Char('u') if is_ctrl(&key, 'u') => send(
            commands,
            Command::EditDraft {
                field,
                edit: DraftEdit::Clear,
            },
        ),
        KeyCode::Char(c) if is_text_input(&key) => send(
            commands,
            Command::EditDraft {
                field,
                edit: DraftEdit::Push(c),
            },
        ),
        _ => {}
    }
}

fn handle_modal_key(app: &mut AppState, key: KeyEvent) {
    let Some(modal) = app.modal.as_mut() else {
        app.close_modal();
        return;
    };
    match modal {
        ModalState::Message { .. } => {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                app.answer(DialogOutcome::Dismissed);
            }
        }
        ModalState::Confirm { selected, .. } => match key.code {
            KeyCode::Left
            | KeyCode::Right
            | KeyCode::Tab
            | KeyCode::BackTab
            | KeyCode::Char('h')
            | KeyCode::Char('l') => *selected = (*selected + 1) % 2,
            KeyCode::Enter => {
                let outcome = if *selected == 0 {
                    DialogOutcome::Confirmed
                } else {
                    DialogOutcome::Dismissed
                };
                app.answer(outcome);
            }
            KeyCode::Char('y') => app.answer(DialogOutcome::Confirmed),
            KeyCode::Char('n') | KeyCode::Esc => app.answer(DialogOutcome::Dismissed),
            _ => {}
        },
        ModalState::EditUser { values, field } => match key.code {
            KeyCode::Esc => app.answer(DialogOutcome::Dismissed),
            KeyCode::Enter => {
                let submitted = values.clone();
                app.answer(DialogOutcome::Submitted(submitted));
            }
            KeyCode::Tab | KeyCode::Down => *field = field.next(),
            KeyCode::BackTab | KeyCode::Up => *field = field.prev(),
            KeyCode::Backspace => {
                values.get_mut(*field).pop();
            }
            KeyCode::Char('u') if is_ctrl(&key, 'u') => values.get_mut(*field).clear(),
            KeyCode::Char(c) if is_text_input(&key) => values.get_mut(*field).push(c),
            _ => {}
        },
        ModalState::Help { scroll } => match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.close_modal()
            }
            KeyCode::Up | KeyCode::Char('k') => *scroll = scroll.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => *scroll = scroll.saturating_add(1),
            _ => {}
        },
    }
}
