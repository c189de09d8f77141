//! Task domain model.
//!
//! # Responsibility
//! - Define the persisted task record and its wire shape.
//! - Assign identity and creation time exactly once, at construction.
//!
//! # Invariants
//! - `id` is never nil and never reused for another task.
//! - `created_at` has millisecond precision so it survives storage unchanged.
//! - Only `title` and `description` are mutable after creation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier assigned by the store at creation.
pub type TaskId = Uuid;

/// Validation failures for task records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Nil UUID cannot identify a stored task.
    NilId,
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NilId => write!(f, "task id must not be nil"),
        }
    }
}

impl Error for TaskValidationError {}

/// Canonical task record.
///
/// Serialized as `{id, title, description, createdAt}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    /// Creation instant, serialized as an RFC 3339 string.
    pub created_at: DateTime<Utc>,
}

/// The mutable part of a task: what create and update requests carry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFields {
    pub title: String,
    pub description: String,
}

impl TaskFields {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
        }
    }

    /// Returns whether either field is empty or whitespace-only.
    pub fn has_blank_field(&self) -> bool {
        self.title.trim().is_empty() || self.description.trim().is_empty()
    }
}

impl Task {
    /// Creates a new task with a generated ID and the current time.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.into(),
            description: description.into(),
            created_at: now_millis(),
        }
    }

    /// Rebuilds a task from already-assigned identity and creation time.
    ///
    /// Used by storage read paths. `created_at` is truncated to milliseconds.
    ///
    /// # Errors
    /// - Returns `TaskValidationError::NilId` for a nil `id`.
    pub fn with_id(
        id: TaskId,
        fields: TaskFields,
        created_at: DateTime<Utc>,
    ) -> Result<Self, TaskValidationError> {
        let task = Self {
            id,
            title: fields.title,
            description: fields.description,
            created_at: truncate_to_millis(created_at),
        };
        task.validate()?;
        Ok(task)
    }

    /// Validates record invariants before persistence.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.id.is_nil() {
            return Err(TaskValidationError::NilId);
        }
        Ok(())
    }

    /// Replaces the mutable fields, leaving `id` and `created_at` untouched.
    pub fn apply(&mut self, fields: TaskFields) {
        self.title = fields.title;
        self.description = fields.description;
    }

    /// Returns the mutable fields as an owned pair.
    pub fn fields(&self) -> TaskFields {
        TaskFields::new(self.title.clone(), self.description.clone())
    }
}

/// Current UTC time at storage precision.
pub fn now_millis() -> DateTime<Utc> {
    truncate_to_millis(Utc::now())
}

fn truncate_to_millis(value: DateTime<Utc>) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(value.timestamp_millis()).unwrap_or(value)
}
