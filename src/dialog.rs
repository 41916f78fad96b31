//! Prompt-and-wait dialogs.
//!
//! The console describes what it needs to ask with a [`Prompt`] and suspends on
//! [`Dialogs::show`] until the answer arrives. [`ChannelDialogs`] hands prompts to
//! the terminal UI; tests plug in a scripted implementation instead.
//!
use async_trait::async_trait;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

use crate::api::UserFields;

/// What a dialog should show.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Prompt {
    /// Blocking warning, dismissed with Enter/Esc.
    Warning { title: String, text: String },
    /// Blocking error, dismissed with Enter/Esc.
    Error { title: String, text: String },
    /// Yes/no question.
    Confirm {
        title: String,
        text: String,
        confirm_label: String,
        cancel_label: String,
    },
    /// Three-field edit form, pre-filled.
    EditUser { initial: UserFields },
    /// Transient notification; nobody waits for it.
    Toast { title: String, duration: Duration },
}

impl Prompt {
    pub fn is_blocking(&self) -> bool {
        !matches!(self, Prompt::Toast { .. })
    }
}

/// How a dialog was closed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogOutcome {
    /// Cancelled, declined, closed, or a non-question dialog acknowledged.
    Dismissed,
    Confirmed,
    Submitted(UserFields),
}

impl DialogOutcome {
    pub fn is_confirmed(&self) -> bool {
        matches!(self, DialogOutcome::Confirmed)
    }

    pub fn into_submitted(self) -> Option<UserFields> {
        match self {
            DialogOutcome::Submitted(fields) => Some(fields),
            _ => None,
        }
    }
}

#[async_trait]
pub trait Dialogs: Send {
    async fn show(&mut self, prompt: Prompt) -> DialogOutcome;
}

/// A prompt on its way to the UI. `reply` is `None` for toasts.
#[derive(Debug)]
pub struct PromptRequest {
    pub prompt: Prompt,
    pub reply: Option<oneshot::Sender<DialogOutcome>>,
}

impl PromptRequest {
    pub fn answer(self, outcome: DialogOutcome) {
        if let Some(tx) = self.reply {
            let _ = tx.send(outcome);
        }
    }
}

/// Forwards prompts over a channel and waits for the UI to answer.
pub struct ChannelDialogs {
    tx: mpsc::UnboundedSender<PromptRequest>,
}

impl ChannelDialogs {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<PromptRequest>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

#[async_trait]
impl Dialogs for ChannelDialogs {
    async fn show(&mut self, prompt: Prompt) -> DialogOutcome {
        if !prompt.is_blocking() {
            if self.tx.send(PromptRequest { prompt, reply: None }).is_err() {
                tracing::debug!("toast dropped: UI is gone");
            }
            return DialogOutcome::Dismissed;
        }
        let (reply, answer) = oneshot::channel();
        if self
            .tx
            .send(PromptRequest {
                prompt,
                reply: Some(reply),
            })
            .is_err()
        {
            tracing::warn!("prompt dropped: UI is gone");
            return DialogOutcome::Dismissed;
        }
        // A reply sender dropped without answering counts as a cancel.
        answer.await.unwrap_or(DialogOutcome::Dismissed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning() -> Prompt {
        Prompt::Warning {
            title: "t".into(),
            text: "x".into(),
        }
    }

    #[tokio::test]
    async fn toast_does_not_wait() {
        let (mut dialogs, mut rx) = ChannelDialogs::new();
        let outcome = dialogs
            .show(Prompt::Toast {
                title: "done".into(),
                duration: Duration::from_millis(10),
            })
            .await;
        assert_eq!(outcome, DialogOutcome::Dismissed);
        let req = rx.recv().await.unwrap();
        assert!(req.reply.is_none());
    }

    #[tokio::test]
    async fn blocking_prompt_returns_ui_answer() {
        let (mut dialogs, mut rx) = ChannelDialogs::new();
        let ui = tokio::spawn(async move {
            let req = rx.recv().await.unwrap();
            assert!(matches!(req.prompt, Prompt::EditUser { .. }));
            req.answer(DialogOutcome::Submitted(UserFields::new("a", "b", "c")));
        });
        let outcome = dialogs
            .show(Prompt::EditUser {
                initial: UserFields::default(),
            })
            .await;
        ui.await.unwrap();
        assert_eq!(outcome.into_submitted(), Some(UserFields::new("a", "b", "c")));
    }

    #[tokio::test]
    async fn dropped_reply_is_dismissed() {
        let (mut dialogs, mut rx) = ChannelDialogs::new();
        let ui = tokio::spawn(async move {
            let req = rx.recv().await.unwrap();
            drop(req);
        });
        assert_eq!(dialogs.show(warning()).await, DialogOutcome::Dismissed);
        ui.await.unwrap();
    }

    #[tokio::test]
    async fn closed_ui_is_dismissed() {
        let (mut dialogs, rx) = ChannelDialogs::new();
        drop(rx);
        assert!(!dialogs.show(warning()).await.is_confirmed());
    }
}
