//! Display projections of client state.
//!
//! Drawing is left to the embedding UI; these helpers produce what it needs:
//! per-row controls, formatted dates and the completion chart series.

use crate::state::EditSession;
use chrono::{DateTime, TimeZone, Utc};
use std::fmt::Display;
use todo_core::{Task, TaskFields};

pub const NO_TASKS_PLACEHOLDER: &str = "No tasks available";
pub const NO_CHART_DATA_PLACEHOLDER: &str = "No data found";
pub const COMPLETED_LABEL: &str = "Completed";

const CREATED_AT_FORMAT: &str = "%d %B %Y, %I:%M:%S %P";

/// Series handed to the charting component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartSeries {
    pub labels: Vec<&'static str>,
    pub values: Vec<usize>,
}

/// Single-slice completion chart; `None` when there is nothing to draw.
///
/// Every task counts as completed: the model has no completion flag.
pub fn completion_chart(tasks: &[Task]) -> Option<ChartSeries> {
    if tasks.is_empty() {
        return None;
    }
    Some(ChartSeries {
        labels: vec![COMPLETED_LABEL],
        values: vec![tasks.len()],
    })
}

/// Controls shown on one task row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowControls {
    /// Read-only row. Edit/delete are disabled while another row is edited.
    View { can_edit: bool, can_delete: bool },
    /// The row being edited, with the in-progress field values.
    Edit(TaskFields),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskRow<'a> {
    pub task: &'a Task,
    pub added_on: String,
    pub controls: RowControls,
}

/// Builds one row per task. At most one row carries edit controls.
pub fn task_rows<'a, Tz>(
    tasks: &'a [Task],
    edit: Option<&EditSession>,
    tz: &Tz,
) -> Vec<TaskRow<'a>>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    tasks
        .iter()
        .map(|task| {
            let controls = match edit {
                Some(session) if session.id == task.id => RowControls::Edit(session.fields.clone()),
                Some(_) => RowControls::View {
                    can_edit: false,
                    can_delete: false,
                },
                None => RowControls::View {
                    can_edit: true,
                    can_delete: true,
                },
            };
            TaskRow {
                task,
                added_on: format_created_at(task.created_at, tz),
                controls,
            }
        })
        .collect()
}

/// Formats a creation time as e.g. `05 March 2026, 02:07:09 pm` in `tz`.
pub fn format_created_at<Tz>(created_at: DateTime<Utc>, tz: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    created_at
        .with_timezone(tz)
        .format(CREATED_AT_FORMAT)
        .to_string()
}
