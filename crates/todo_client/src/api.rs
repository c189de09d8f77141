//! Transport to the task store.
//!
//! `TodoApi` is the seam between client state and the network; the state
//! machine is generic over it so it can run against a fake in tests.

use log::debug;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::future::Future;
use todo_core::{Task, TaskFields, TaskId};

pub type ApiResult<T> = Result<T, ApiError>;

/// Failure of one API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ApiError {
    /// No response arrived (connection refused, reset, DNS).
    Transport(String),
    /// The store answered with a non-success status.
    Status { status: u16, message: String },
    /// The response body did not have the expected shape.
    Decode(String),
}

impl ApiError {
    /// Whether the request failed before any response was received.
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(message) => write!(f, "request failed: {message}"),
            Self::Status { status, message } => write!(f, "server returned {status}: {message}"),
            Self::Decode(message) => write!(f, "unexpected response body: {message}"),
        }
    }
}

impl Error for ApiError {}

/// Operations the client needs from the task store.
pub trait TodoApi {
    fn list_tasks(&self) -> impl Future<Output = ApiResult<Vec<Task>>> + Send;
    fn create_task(&self, fields: &TaskFields) -> impl Future<Output = ApiResult<Task>> + Send;
    fn update_task(
        &self,
        id: TaskId,
        fields: &TaskFields,
    ) -> impl Future<Output = ApiResult<Task>> + Send;
    fn delete_task(&self, id: TaskId) -> impl Future<Output = ApiResult<()>> + Send;
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: String,
}

/// `TodoApi` over HTTP/JSON.
///
/// No request timeout is configured; a hung request blocks its caller.
#[derive(Debug, Clone)]
pub struct HttpTodoApi {
    client: Client,
    base_url: String,
}

impl HttpTodoApi {
    /// `base_url` is the server root, e.g. `http://localhost:8000`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn todos_url(&self) -> String {
        format!("{}/todos", self.base_url)
    }

    fn todo_url(&self, id: TaskId) -> String {
        format!("{}/todos/{id}", self.base_url)
    }
}

impl TodoApi for HttpTodoApi {
    async fn list_tasks(&self) -> ApiResult<Vec<Task>> {
        let response = self
            .client
            .get(self.todos_url())
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }

    async fn create_task(&self, fields: &TaskFields) -> ApiResult<Task> {
        let response = self
            .client
            .post(self.todos_url())
            .json(fields)
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }

    async fn update_task(&self, id: TaskId, fields: &TaskFields) -> ApiResult<Task> {
        let response = self
            .client
            .put(self.todo_url(id))
            .json(fields)
            .send()
            .await
            .map_err(transport_error)?;
        decode(response).await
    }

    async fn delete_task(&self, id: TaskId) -> ApiResult<()> {
        let response = self
            .client
            .delete(self.todo_url(id))
            .send()
            .await
            .map_err(transport_error)?;
        ensure_success(response).await.map(|_| ())
    }
}

fn transport_error(err: reqwest::Error) -> ApiError {
    debug!("event=api_request module=client status=error error={err}");
    ApiError::Transport(err.to_string())
}

async fn ensure_success(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let fallback = status.canonical_reason().unwrap_or("request failed").to_string();
    let message = match response.json::<ErrorBody>().await {
        Ok(body) => body.message,
        Err(_) => fallback,
    };
    Err(ApiError::Status {
        status: status.as_u16(),
        message,
    })
}

async fn decode<T: DeserializeOwned>(response: Response) -> ApiResult<T> {
    ensure_success(response)
        .await?
        .json::<T>()
        .await
        .map_err(|err| ApiError::Decode(err.to_string()))
}
