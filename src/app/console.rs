//! The console: application state and the request/response flows behind it.
//!
//! `ViewState` is changed only through its transition methods. `Console` runs
//! one [`Command`] at a time to completion, suspending on the network and on
//! dialogs, and publishes a snapshot of the state after every transition.
//!
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::api::{Field, User, UserFields, UserId, UsersApi};
use crate::dialog::{DialogOutcome, Dialogs, Prompt};

/// Banner text for a failed refresh.
pub const LOAD_ERROR_MESSAGE: &str = "Could not load users";

/// Which write is in flight or just finished.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl MutationKind {
    pub fn success_title(self) -> &'static str {
        match self {
            MutationKind::Create => "User added",
            MutationKind::Update => "User updated",
            MutationKind::Delete => "User deleted",
        }
    }

    pub fn failure_text(self) -> &'static str {
        match self {
            MutationKind::Create => "Could not create the user.",
            MutationKind::Update => "Could not update the user.",
            MutationKind::Delete => "Could not delete the user.",
        }
    }

    pub fn toast_duration(self) -> Duration {
        match self {
            MutationKind::Create | MutationKind::Update => Duration::from_millis(1400),
            MutationKind::Delete => Duration::from_millis(1200),
        }
    }

    /// Status bar hint while the request is in flight.
    pub fn progress_label(self) -> &'static str {
        match self {
            MutationKind::Create => "Creating user...",
            MutationKind::Update => "Saving user...",
            MutationKind::Delete => "Deleting user...",
        }
    }
}

/// A write against the users resource.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mutation {
    Create(UserFields),
    Update(UserId, UserFields),
    Delete(UserId),
}

impl Mutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Mutation::Create(_) => MutationKind::Create,
            Mutation::Update(..) => MutationKind::Update,
            Mutation::Delete(_) => MutationKind::Delete,
        }
    }
}

/// Everything the view shows. `users` mirrors the last successful list response.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ViewState {
    pub users: Vec<User>,
    pub draft: UserFields,
    pub loading: bool,
    pub error: Option<String>,
    pub pending: Option<MutationKind>,
}

impl ViewState {
    pub fn refresh_started(&mut self) {
        self.loading = true;
        self.error = None;
    }

    pub fn refresh_succeeded(&mut self, users: Vec<User>) {
        self.users = users;
        self.loading = false;
    }

    /// Keeps the stale list on screen.
    pub fn refresh_failed(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
        self.loading = false;
    }

    pub fn mutation_started(&mut self, kind: MutationKind) {
        self.pending = Some(kind);
    }

    pub fn mutation_succeeded(&mut self, kind: MutationKind) {
        self.pending = None;
        if kind == MutationKind::Create {
            self.draft = UserFields::default();
        }
    }

    pub fn mutation_failed(&mut self, _kind: MutationKind) {
        self.pending = None;
    }

    pub fn find(&self, id: &UserId) -> Option<&User> {
        self.users.iter().find(|u| &u.id == id)
    }

    pub fn edit_draft(&mut self, field: Field, edit: &DraftEdit) {
        let value = self.draft.get_mut(field);
        match edit {
            DraftEdit::Push(c) => value.push(*c),
            DraftEdit::Pop => {
                value.pop();
            }
            DraftEdit::Clear => value.clear(),
        }
    }
}

/// Keystroke-level change to one draft field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DraftEdit {
    Push(char),
    Pop,
    Clear,
}

/// User actions, as sent by the UI.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Refresh,
    EditDraft { field: Field, edit: DraftEdit },
    SubmitCreate,
    Edit(UserId),
    Delete(UserId),
}

pub struct Console<A, D> {
    api: A,
    dialogs: D,
    state: ViewState,
    snapshots: Option<watch::Sender<ViewState>>,
}

impl<A: UsersApi, D: Dialogs> Console<A, D> {
    pub fn new(api: A, dialogs: D) -> Self {
        Self {
            api,
            dialogs,
            state: ViewState::default(),
            snapshots: None,
        }
    }

    /// Publish every state change on `tx`.
    pub fn with_snapshots(mut self, tx: watch::Sender<ViewState>) -> Self {
        self.snapshots = Some(tx);
        self
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn dialogs(&self) -> &D {
        &self.dialogs
    }

    fn publish(&self) {
        if let Some(tx) = &self.snapshots {
            tx.send_replace(self.state.clone());
        }
    }

    /// Initial refresh, then commands in arrival order until the sender is dropped.
    pub async fn run(mut self, mut commands: mpsc::UnboundedReceiver<Command>) {
        self.refresh().await;
        while let Some(command) = commands.recv().await {
            self.handle(command).await;
        }
        debug!("command channel closed; console stopping");
    }

    pub async fn handle(&mut self, command: Command) {
        debug!(?command, "handling command");
        match command {
            Command::Refresh => self.refresh().await,
            Command::EditDraft { field, edit } => {
                self.state.edit_draft(field, &edit);
                self.publish();
            }
            Command::SubmitCreate => self.submit_create().await,
            Command::Edit(id) => self.edit(&id).await,
            Command::Delete(id) => self.delete(&id).await,
        }
    }

    /// Replace `users` with a fresh full read.
    pub async fn refresh(&mut self) {
        self.state.refresh_started();
        self.publish();
        match self.api.list_users().await {
            Ok(users) => {
                info!(count = users.len(), "users loaded");
                self.state.refresh_succeeded(users);
            }
            Err(err) => {
                error!(error = %err, "failed to load users");
                self.state.refresh_failed(LOAD_ERROR_MESSAGE);
            }
        }
        self.publish();
    }

    pub async fn submit_create(&mut self) {
        if !self.state.draft.is_complete() {
            self.dialogs
                .show(Prompt::Warning {
                    title: "Incomplete fields".into(),
                    text: "Please fill in all fields.".into(),
                })
                .await;
            return;
        }
        let fields = self.state.draft.clone();
        self.refresh_after(Mutation::Create(fields)).await;
    }

    pub async fn edit(&mut self, id: &UserId) {
        let Some(user) = self.state.find(id) else {
            warn!(%id, "edit for a user no longer listed; ignoring");
            return;
        };
        let initial = user.fields();
        let outcome = self.dialogs.show(Prompt::EditUser { initial }).await;
        if let Some(fields) = outcome.into_submitted() {
            self.refresh_after(Mutation::Update(id.clone(), fields)).await;
        }
    }

    pub async fn delete(&mut self, id: &UserId) {
        if self.state.find(id).is_none() {
            warn!(%id, "delete for a user no longer listed; ignoring");
            return;
        }
        let outcome = self
            .dialogs
            .show(Prompt::Confirm {
                title: "Delete user?".into(),
                text: "This action cannot be undone.".into(),
                confirm_label: "Yes, delete".into(),
                cancel_label: "Cancel".into(),
            })
            .await;
        if outcome == DialogOutcome::Confirmed {
            self.refresh_after(Mutation::Delete(id.clone())).await;
        }
    }

    /// Run `mutation`, then refresh and toast on success, or show the blocking
    /// error dialog on failure. Returns whether the write succeeded.
    pub async fn refresh_after(&mut self, mutation: Mutation) -> bool {
        let kind = mutation.kind();
        self.state.mutation_started(kind);
        self.publish();

        let result = match &mutation {
            Mutation::Create(fields) => self.api.create_user(fields).await,
            Mutation::Update(id, fields) => self.api.update_user(id, fields).await,
            Mutation::Delete(id) => self.api.delete_user(id).await,
        };

        match result {
            Ok(()) => {
                info!(?kind, "mutation succeeded");
                self.state.mutation_succeeded(kind);
                self.publish();
                self.refresh().await;
                self.dialogs
                    .show(Prompt::Toast {
                        title: kind.success_title().into(),
                        duration: kind.toast_duration(),
                    })
                    .await;
                true
            }
            Err(err) => {
                error!(error = %err, ?kind, "mutation failed");
                self.state.mutation_failed(kind);
                self.publish();
                self.dialogs
                    .show(Prompt::Error {
                        title: "Error".into(),
                        text: kind.failure_text().into(),
                    })
                    .await;
                false
            }
        }
    }
}
