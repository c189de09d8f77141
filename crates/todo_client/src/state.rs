//! Client-side task list state machine.
//!
//! # Responsibility
//! - Hold the cached task list, the create draft and the single edit session.
//! - Turn user actions into at most one store request each.
//! - Patch the local cache from responses instead of re-fetching.
//!
//! # Invariants
//! - At most one task is in edit mode at a time.
//! - Blank (whitespace-only) fields never reach the network.
//! - A failed action leaves `tasks` exactly as it was.
//! - The cache is a projection of the store and may be stale.

use crate::api::TodoApi;
use crate::confirm::Confirm;
use log::{debug, warn};
use std::time::{Duration, Instant};
use todo_core::{Task, TaskFields, TaskId};

pub const CREATED_MESSAGE: &str = "Item added successfully";
pub const UPDATED_MESSAGE: &str = "Item updated successfully";
pub const CREATE_FAILED_MESSAGE: &str = "Unable to create Todo item";
pub const UPDATE_FAILED_MESSAGE: &str = "Unable to update Todo item";
pub const DELETE_FAILED_MESSAGE: &str = "Unable to delete Todo item";
pub const DELETE_PROMPT: &str = "Are you sure you want to delete?";

/// How long a success message stays visible.
pub const STATUS_TTL: Duration = Duration::from_secs(3);

/// What a delete does with the store's answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeletePolicy {
    /// Any HTTP response removes the row; only a transport failure keeps it.
    #[default]
    FireAndForget,
    /// Only a success response removes the row; anything else is an error.
    Strict,
}

/// Result of one user action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Preconditions not met or user declined; nothing was sent.
    Skipped,
    /// The request completed and local state was patched.
    Applied,
    /// The request failed; local tasks are unchanged.
    Failed,
}

/// The task currently open for in-place editing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditSession {
    pub id: TaskId,
    pub fields: TaskFields,
}

/// Which form currently has the user's attention.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Idle,
    Composing,
    Editing(TaskId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct StatusMessage {
    text: &'static str,
    expires_at: Instant,
}

/// Task list client over a `TodoApi` transport.
pub struct TaskClient<A, C> {
    api: A,
    confirm: C,
    delete_policy: DeletePolicy,
    tasks: Vec<Task>,
    draft: TaskFields,
    edit: Option<EditSession>,
    error_message: Option<&'static str>,
    status: Option<StatusMessage>,
}

impl<A: TodoApi, C: Confirm> TaskClient<A, C> {
    pub fn new(api: A, confirm: C) -> Self {
        Self {
            api,
            confirm,
            delete_policy: DeletePolicy::default(),
            tasks: Vec::new(),
            draft: TaskFields::default(),
            edit: None,
            error_message: None,
            status: None,
        }
    }

    pub fn with_delete_policy(mut self, policy: DeletePolicy) -> Self {
        self.delete_policy = policy;
        self
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn draft(&self) -> &TaskFields {
        &self.draft
    }

    pub fn set_draft_title(&mut self, title: impl Into<String>) {
        self.draft.title = title.into();
    }

    pub fn set_draft_description(&mut self, description: impl Into<String>) {
        self.draft.description = description.into();
    }

    pub fn edit_session(&self) -> Option<&EditSession> {
        self.edit.as_ref()
    }

    /// No-op outside edit mode.
    pub fn set_edit_title(&mut self, title: impl Into<String>) {
        if let Some(session) = self.edit.as_mut() {
            session.fields.title = title.into();
        }
    }

    /// No-op outside edit mode.
    pub fn set_edit_description(&mut self, description: impl Into<String>) {
        if let Some(session) = self.edit.as_mut() {
            session.fields.description = description.into();
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message
    }

    pub fn status_message(&self) -> Option<&str> {
        self.status.as_ref().map(|status| status.text)
    }

    pub fn focus(&self) -> Focus {
        match &self.edit {
            Some(session) => Focus::Editing(session.id),
            None if self.draft.title.is_empty() && self.draft.description.is_empty() => {
                Focus::Idle
            }
            None => Focus::Composing,
        }
    }

    /// Number shown on the completion chart: every cached task.
    pub fn completed_count(&self) -> usize {
        self.tasks.len()
    }

    /// Clears the success message once its display time has passed.
    pub fn tick(&mut self, now: Instant) {
        if self
            .status
            .as_ref()
            .is_some_and(|status| now >= status.expires_at)
        {
            self.status = None;
        }
    }

    /// Replaces the cache with the store's full list.
    ///
    /// Failures are logged only; the cache and messages stay as they were.
    pub async fn load(&mut self) -> Outcome {
        match self.api.list_tasks().await {
            Ok(tasks) => {
                debug!("event=client_load module=client status=ok count={}", tasks.len());
                self.tasks = tasks;
                Outcome::Applied
            }
            Err(err) => {
                warn!("event=client_load module=client status=error error={err}");
                Outcome::Failed
            }
        }
    }

    /// Creates a task from the draft and appends the store's record.
    pub async fn submit_draft(&mut self) -> Outcome {
        self.error_message = None;
        if self.draft.has_blank_field() {
            return Outcome::Skipped;
        }

        let draft = self.draft.clone();
        match self.api.create_task(&draft).await {
            Ok(task) if !task.id.is_nil() => {
                self.tasks.push(task);
                self.draft = TaskFields::default();
                self.show_status(CREATED_MESSAGE);
                Outcome::Applied
            }
            Ok(_) => {
                warn!("event=client_create module=client status=error reason=missing_id");
                self.error_message = Some(CREATE_FAILED_MESSAGE);
                Outcome::Failed
            }
            Err(err) => {
                warn!("event=client_create module=client status=error error={err}");
                self.error_message = Some(CREATE_FAILED_MESSAGE);
                Outcome::Failed
            }
        }
    }

    /// Opens `id` for editing, seeded with its current fields.
    ///
    /// Returns `false` when another edit is active or `id` is not cached.
    pub fn begin_edit(&mut self, id: TaskId) -> bool {
        if self.edit.is_some() {
            return false;
        }
        let Some(task) = self.tasks.iter().find(|task| task.id == id) else {
            return false;
        };
        self.edit = Some(EditSession {
            id,
            fields: task.fields(),
        });
        true
    }

    /// Leaves edit mode without contacting the store.
    pub fn cancel_edit(&mut self) {
        self.edit = None;
    }

    /// Sends the edit session and patches the cached task in place with the
    /// title and description the store echoes back.
    ///
    /// On failure the session stays open so the user can retry.
    pub async fn confirm_update(&mut self) -> Outcome {
        self.error_message = None;
        let Some(EditSession { id, fields }) = self.edit.clone() else {
            return Outcome::Skipped;
        };
        if fields.has_blank_field() {
            return Outcome::Skipped;
        }

        match self.api.update_task(id, &fields).await {
            Ok(updated) => {
                self.edit = None;
                if let Some(task) = self.tasks.iter_mut().find(|task| task.id == id) {
                    task.apply(updated.fields());
                }
                self.show_status(UPDATED_MESSAGE);
                Outcome::Applied
            }
            Err(err) => {
                warn!("event=client_update module=client status=error error={err}");
                self.error_message = Some(UPDATE_FAILED_MESSAGE);
                Outcome::Failed
            }
        }
    }

    /// Deletes `id` after confirmation, subject to the delete policy.
    ///
    /// Not available while an edit session is open.
    pub async fn delete(&mut self, id: TaskId) -> Outcome {
        if self.edit.is_some() || !self.confirm.confirm(DELETE_PROMPT) {
            return Outcome::Skipped;
        }

        let result = self.api.delete_task(id).await;
        let removed = match (&result, self.delete_policy) {
            (Ok(()), _) => true,
            (Err(err), DeletePolicy::FireAndForget) => !err.is_transport(),
            (Err(_), DeletePolicy::Strict) => false,
        };

        if let Err(err) = &result {
            warn!(
                "event=client_delete module=client status=error removed_locally={removed} error={err}"
            );
        }

        if removed {
            self.tasks.retain(|task| task.id != id);
            Outcome::Applied
        } else {
            if self.delete_policy == DeletePolicy::Strict {
                self.error_message = Some(DELETE_FAILED_MESSAGE);
            }
            Outcome::Failed
        }
    }

    fn show_status(&mut self, text: &'static str) {
        self.status = Some(StatusMessage {
            text,
            expires_at: Instant::now() + STATUS_TTL,
        });
    }
}
