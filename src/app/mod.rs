//! Application state types and entry glue.
//!
//! `AppState` is what the terminal side owns: the latest console snapshot plus
//! purely visual state (selection, focus, open modal, toast). The console itself
//! lives in `console` and runs on the async runtime.
//!
pub mod console;
pub mod keymap;
pub mod theme;
pub mod update;

use std::time::Instant;
use tokio::sync::oneshot;

use crate::api::{Field, User, UserFields};
use crate::dialog::{DialogOutcome, Prompt, PromptRequest};
use console::ViewState;
use keymap::Keymap;
use theme::Theme;

/// Where key presses go.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InputMode {
    /// Users list; keys resolve through the keymap.
    Normal,
    /// Typing into the "new user" form.
    Form,
    /// A modal is open.
    Modal,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MessageKind {
    Warning,
    Error,
}

/// Modal dialog states.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ModalState {
    Message {
        kind: MessageKind,
        title: String,
        text: String,
    },
    /// `selected`: 0 = confirm, 1 = cancel.
    Confirm {
        title: String,
        text: String,
        confirm_label: String,
        cancel_label: String,
        selected: usize,
    },
    EditUser {
        values: UserFields,
        field: Field,
    },
    Help {
        scroll: u16,
    },
}

impl ModalState {
    /// Modal for a blocking prompt. Toasts have none.
    pub fn from_prompt(prompt: Prompt) -> Option<Self> {
        Some(match prompt {
            Prompt::Warning { title, text } => ModalState::Message {
                kind: MessageKind::Warning,
                title,
                text,
            },
            Prompt::Error { title, text } => ModalState::Message {
                kind: MessageKind::Error,
                title,
                text,
            },
            Prompt::Confirm {
                title,
                text,
                confirm_label,
                cancel_label,
            } => ModalState::Confirm {
                title,
                text,
                confirm_label,
                cancel_label,
                // Default to the safe answer.
                selected: 1,
            },
            Prompt::EditUser { initial } => ModalState::EditUser {
                values: initial,
                field: Field::FullName,
            },
            Prompt::Toast { .. } => return None,
        })
    }
}

/// Transient notification in the top-right corner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub expires_at: Instant,
}

pub struct AppState {
    pub view: ViewState,
    pub endpoint: String,
    pub selected_user_index: usize,
    pub rows_per_page: usize,
    pub input_mode: InputMode,
    /// Mode to go back to when the modal closes.
    pub resume_mode: InputMode,
    pub form_field: Field,
    pub theme: Theme,
    pub keymap: Keymap,
    pub modal: Option<ModalState>,
    pub reply: Option<oneshot::Sender<DialogOutcome>>,
    pub toast: Option<Toast>,
}

impl AppState {
    pub fn new(endpoint: impl Into<String>, theme: Theme, keymap: Keymap) -> Self {
        Self {
            view: ViewState {
                loading: true,
                ..ViewState::default()
            },
            endpoint: endpoint.into(),
            selected_user_index: 0,
            rows_per_page: 10,
            input_mode: InputMode::Normal,
            resume_mode: InputMode::Normal,
            form_field: Field::FullName,
            theme,
            keymap,
            modal: None,
            reply: None,
            toast: None,
        }
    }

    pub fn selected_user(&self) -> Option<&User> {
        self.view.users.get(self.selected_user_index)
    }

    /// Take a new console snapshot, keeping the cursor inside the list.
    pub fn apply_snapshot(&mut self, view: ViewState) {
        self.view = view;
        let last = self.view.users.len().saturating_sub(1);
        self.selected_user_index = self.selected_user_index.min(last);
    }

    pub fn open_modal(&mut self, modal: ModalState) {
        if self.input_mode != InputMode::Modal {
            self.resume_mode = self.input_mode;
        }
        self.modal = Some(modal);
        self.input_mode = InputMode::Modal;
    }

    pub fn close_modal(&mut self) {
        self.modal = None;
        self.input_mode = self.resume_mode;
    }

    /// Show a prompt from the console. A toast is shown without taking focus.
    pub fn open_prompt(&mut self, request: PromptRequest, now: Instant) {
        let PromptRequest { prompt, reply } = request;
        if let Prompt::Toast { title, duration } = &prompt {
            self.toast = Some(Toast {
                title: title.clone(),
                expires_at: now + *duration,
            });
            return;
        }
        if let Some(modal) = ModalState::from_prompt(prompt) {
            // An unanswered earlier prompt is cancelled.
            self.answer(DialogOutcome::Dismissed);
            self.open_modal(modal);
            self.reply = reply;
        }
    }

    /// Answer the open prompt, if any, and close its modal.
    pub fn answer(&mut self, outcome: DialogOutcome) {
        if let Some(tx) = self.reply.take() {
            let _ = tx.send(outcome);
        }
        if self.modal.is_some() {
            self.close_modal();
        }
    }

    pub fn expire_toast(&mut self, now: Instant) {
        if self.toast.as_ref().is_some_and(|t| now >= t.expires_at) {
            self.toast = None;
        }
    }
}

/// Re-export the application entry function.
pub use update::run;
