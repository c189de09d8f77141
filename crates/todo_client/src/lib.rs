//! Task list client.
//!
//! # Responsibility
//! - Cache the store's tasks and mediate add/edit/cancel/delete actions.
//! - Project state into row controls and chart data for a UI.
//!
//! # See also
//! - `todo_server` for the HTTP contract this client speaks.

pub mod api;
pub mod confirm;
pub mod state;
pub mod view;

pub use api::{ApiError, ApiResult, HttpTodoApi, TodoApi};
pub use confirm::{AlwaysConfirm, Confirm};
pub use state::{DeletePolicy, EditSession, Focus, Outcome, TaskClient};
pub use view::{completion_chart, format_created_at, task_rows, ChartSeries, RowControls, TaskRow};
