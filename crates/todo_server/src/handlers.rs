//! HTTP handlers for the `/todos` resource.
//!
//! Each handler maps onto exactly one `TaskService` call.

use crate::error::{ApiErrorResponse, MISSING_FIELDS_MESSAGE};
use crate::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use log::info;
use serde::Deserialize;
use todo_core::{Task, TaskFields, TaskId};
use uuid::Uuid;

/// Request body for create and update.
///
/// Fields are optional on the wire so a missing field is reported as a
/// presence failure rather than a deserialization error.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPayload {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl TaskPayload {
    /// Requires both fields to be present. Empty strings are accepted.
    pub fn into_fields(self) -> Result<TaskFields, ApiErrorResponse> {
        match (self.title, self.description) {
            (Some(title), Some(description)) => Ok(TaskFields::new(title, description)),
            _ => Err(ApiErrorResponse::bad_request(MISSING_FIELDS_MESSAGE)),
        }
    }
}

/// `POST /todos`
pub async fn create_task(
    State(state): State<AppState>,
    payload: Result<Json<TaskPayload>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>), ApiErrorResponse> {
    let Json(payload) = payload?;
    let fields = payload.into_fields()?;

    let task = state
        .store
        .run(move |service| service.create_task(fields))
        .await?;

    info!("event=task_create module=http status=ok task_id={}", task.id);
    Ok((StatusCode::CREATED, Json(task)))
}

/// `GET /todos`
pub async fn list_tasks(State(state): State<AppState>) -> Result<Json<Vec<Task>>, ApiErrorResponse> {
    let tasks = state.store.run(|service| service.list_tasks()).await?;
    Ok(Json(tasks))
}

/// `PUT /todos/{id}`
///
/// An id that does not parse cannot name a stored task and yields 404. It is
/// never passed to storage, so a malformed id is not reported as a 500.
pub async fn update_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
    payload: Result<Json<TaskPayload>, JsonRejection>,
) -> Result<Json<Task>, ApiErrorResponse> {
    let Json(payload) = payload?;
    let fields = payload.into_fields()?;
    let id = parse_task_id(&raw_id).ok_or_else(ApiErrorResponse::not_found)?;

    let task = state
        .store
        .run(move |service| service.update_task(id, &fields))
        .await?;

    info!("event=task_update module=http status=ok task_id={id}");
    Ok(Json(task))
}

/// `DELETE /todos/{id}`
///
/// Succeeds whether or not the task existed. A malformed id skips storage
/// entirely and also answers 204 rather than 500.
pub async fn delete_task(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<StatusCode, ApiErrorResponse> {
    if let Some(id) = parse_task_id(&raw_id) {
        state.store.run(move |service| service.delete_task(id)).await?;
        info!("event=task_delete module=http status=ok task_id={id}");
    }
    Ok(StatusCode::NO_CONTENT)
}

fn parse_task_id(raw: &str) -> Option<TaskId> {
    Uuid::parse_str(raw.trim()).ok()
}
