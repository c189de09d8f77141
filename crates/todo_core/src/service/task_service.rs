//! Task use-case service.
//!
//! # Responsibility
//! - Provide create/list/update/delete entry points for the task store.
//! - Assign identity and creation time on create.
//! - Return full records after writes by reading them back.
//!
//! # Invariants
//! - Update never touches `id` or `created_at`.
//! - Delete of an absent task succeeds silently.
//! - Service layer remains storage-agnostic.

use crate::model::task::{Task, TaskFields, TaskId};
use crate::repo::task_repo::{RepoError, TaskRepository};
use log::{debug, error};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Service error for task use-cases.
#[derive(Debug)]
pub enum TaskServiceError {
    /// Target task does not exist.
    TaskNotFound(TaskId),
    /// Persistence-layer failure.
    Repo(RepoError),
    /// Internal consistency mismatch between write and read-back.
    InconsistentState(&'static str),
}

impl Display for TaskServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TaskNotFound(id) => write!(f, "task not found: {id}"),
            Self::Repo(err) => write!(f, "{err}"),
            Self::InconsistentState(details) => write!(f, "inconsistent task state: {details}"),
        }
    }
}

impl Error for TaskServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for TaskServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::TaskNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Task service facade over repository implementations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Creates one task and returns the stored record.
    pub fn create_task(&self, fields: TaskFields) -> Result<Task, TaskServiceError> {
        let task = Task::new(fields.title, fields.description);
        let id = self.repo.create_task(&task).inspect_err(|err| {
            error!("event=task_create module=service status=error error={err}");
        })?;
        debug!("event=task_create module=service status=ok task_id={id}");

        self.repo
            .get_task(id)?
            .ok_or(TaskServiceError::InconsistentState(
                "created task not found in read-back",
            ))
    }

    /// Lists every stored task in storage order.
    pub fn list_tasks(&self) -> Result<Vec<Task>, TaskServiceError> {
        Ok(self.repo.list_tasks()?)
    }

    /// Replaces title/description of an existing task.
    ///
    /// # Errors
    /// - `TaskNotFound` when no task has `id`.
    pub fn update_task(&self, id: TaskId, fields: &TaskFields) -> Result<Task, TaskServiceError> {
        self.repo.update_task(id, fields)?;
        debug!("event=task_update module=service status=ok task_id={id}");

        self.repo
            .get_task(id)?
            .ok_or(TaskServiceError::TaskNotFound(id))
    }

    /// Deletes a task if present.
    pub fn delete_task(&self, id: TaskId) -> Result<(), TaskServiceError> {
        let removed = self.repo.delete_task(id)?;
        debug!("event=task_delete module=service status=ok task_id={id} removed={removed}");
        Ok(())
    }
}
