//! Client state machine driven against an in-process fake store.

use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use todo_client::state::{
    CREATED_MESSAGE, CREATE_FAILED_MESSAGE, DELETE_FAILED_MESSAGE, DELETE_PROMPT,
    UPDATED_MESSAGE, UPDATE_FAILED_MESSAGE,
};
use todo_client::{
    AlwaysConfirm, ApiError, ApiResult, DeletePolicy, Focus, Outcome, TaskClient, TodoApi,
};
use todo_core::{Task, TaskFields, TaskId};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Call {
    List,
    Create,
    Update(TaskId),
    Delete(TaskId),
}

#[derive(Default)]
struct FakeState {
    tasks: Vec<Task>,
    calls: Vec<Call>,
    fail_with: Option<ApiError>,
    nil_ids: bool,
    trim_on_update: bool,
}

/// In-memory store that records calls and can inject failures.
#[derive(Clone, Default)]
struct FakeApi {
    state: Arc<Mutex<FakeState>>,
}

impl FakeApi {
    fn with_tasks(tasks: Vec<Task>) -> Self {
        let api = Self::default();
        api.state.lock().unwrap().tasks = tasks;
        api
    }

    fn fail_with(&self, error: ApiError) {
        self.state.lock().unwrap().fail_with = Some(error);
    }

    fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    fn stored(&self) -> Vec<Task> {
        self.state.lock().unwrap().tasks.clone()
    }

    fn record(&self, call: Call) -> ApiResult<()> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        match state.fail_with.clone() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

impl TodoApi for FakeApi {
    async fn list_tasks(&self) -> ApiResult<Vec<Task>> {
        self.record(Call::List)?;
        Ok(self.stored())
    }

    async fn create_task(&self, fields: &TaskFields) -> ApiResult<Task> {
        self.record(Call::Create)?;
        let mut state = self.state.lock().unwrap();
        let mut task = Task::new(fields.title.clone(), fields.description.clone());
        if state.nil_ids {
            task.id = Uuid::nil();
        }
        state.tasks.push(task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: TaskId, fields: &TaskFields) -> ApiResult<Task> {
        self.record(Call::Update(id))?;
        let mut state = self.state.lock().unwrap();
        let stored = if state.trim_on_update {
            TaskFields::new(fields.title.trim(), fields.description.trim())
        } else {
            fields.clone()
        };
        let task = state
            .tasks
            .iter_mut()
            .find(|task| task.id == id)
            .ok_or_else(|| ApiError::Status {
                status: 404,
                message: "Todo not found".to_string(),
            })?;
        task.apply(stored);
        Ok(task.clone())
    }

    async fn delete_task(&self, id: TaskId) -> ApiResult<()> {
        self.record(Call::Delete(id))?;
        self.state.lock().unwrap().tasks.retain(|task| task.id != id);
        Ok(())
    }
}

fn server_error() -> ApiError {
    ApiError::Status {
        status: 500,
        message: "boom".to_string(),
    }
}

async fn loaded_client(tasks: Vec<Task>) -> (FakeApi, TaskClient<FakeApi, AlwaysConfirm>) {
    let api = FakeApi::with_tasks(tasks);
    let mut client = TaskClient::new(api.clone(), AlwaysConfirm);
    assert_eq!(client.load().await, Outcome::Applied);
    (api, client)
}

#[tokio::test]
async fn load_replaces_cache_with_store_contents() {
    let stored = vec![Task::new("a", "1"), Task::new("b", "2")];
    let (_, client) = loaded_client(stored.clone()).await;

    assert_eq!(client.tasks(), stored.as_slice());
    assert_eq!(client.completed_count(), 2);
    assert_eq!(client.focus(), Focus::Idle);
}

#[tokio::test]
async fn load_failure_is_silent_and_leaves_cache_empty() {
    let api = FakeApi::with_tasks(vec![Task::new("a", "1")]);
    api.fail_with(ApiError::Transport("connection refused".to_string()));
    let mut client = TaskClient::new(api, AlwaysConfirm);

    assert_eq!(client.load().await, Outcome::Failed);
    assert!(client.tasks().is_empty());
    assert_eq!(client.error_message(), None);
}

#[tokio::test]
async fn blank_description_sends_nothing() {
    let (api, mut client) = loaded_client(Vec::new()).await;
    client.set_draft_title("Buy milk");
    client.set_draft_description("   ");
    assert_eq!(client.focus(), Focus::Composing);

    assert_eq!(client.submit_draft().await, Outcome::Skipped);

    assert_eq!(api.calls(), vec![Call::List]);
    assert!(client.tasks().is_empty());
    assert_eq!(client.draft(), &TaskFields::new("Buy milk", "   "));
}

#[tokio::test]
async fn successful_create_appends_exactly_one_echoed_entry() {
    let existing = Task::new("existing", "task");
    let (api, mut client) = loaded_client(vec![existing.clone()]).await;
    client.set_draft_title("Buy milk");
    client.set_draft_description("2%");

    assert_eq!(client.submit_draft().await, Outcome::Applied);

    let stored = api.stored();
    assert_eq!(client.tasks().len(), 2);
    assert_eq!(client.tasks()[0], existing);
    assert_eq!(client.tasks()[1], stored[1]);
    assert_eq!(client.tasks()[1].title, "Buy milk");
    assert_eq!(client.tasks()[1].description, "2%");
    assert_eq!(client.draft(), &TaskFields::default());
    assert_eq!(client.status_message(), Some(CREATED_MESSAGE));
    assert_eq!(client.error_message(), None);
}

#[tokio::test]
async fn success_message_expires_after_ttl() {
    let (_, mut client) = loaded_client(Vec::new()).await;
    client.set_draft_title("t");
    client.set_draft_description("d");
    client.submit_draft().await;

    client.tick(Instant::now());
    assert_eq!(client.status_message(), Some(CREATED_MESSAGE));

    client.tick(Instant::now() + Duration::from_secs(4));
    assert_eq!(client.status_message(), None);
}

#[tokio::test]
async fn failed_create_keeps_tasks_and_shows_persistent_error() {
    let (api, mut client) = loaded_client(Vec::new()).await;
    api.fail_with(server_error());
    client.set_draft_title("t");
    client.set_draft_description("d");

    assert_eq!(client.submit_draft().await, Outcome::Failed);

    assert!(client.tasks().is_empty());
    assert_eq!(client.error_message(), Some(CREATE_FAILED_MESSAGE));
    assert_eq!(client.draft(), &TaskFields::new("t", "d"));
    client.tick(Instant::now() + Duration::from_secs(60));
    assert_eq!(client.error_message(), Some(CREATE_FAILED_MESSAGE));
}

#[tokio::test]
async fn create_response_without_usable_id_is_a_failure() {
    let (api, mut client) = loaded_client(Vec::new()).await;
    api.state.lock().unwrap().nil_ids = true;
    client.set_draft_title("t");
    client.set_draft_description("d");

    assert_eq!(client.submit_draft().await, Outcome::Failed);
    assert!(client.tasks().is_empty());
    assert_eq!(client.error_message(), Some(CREATE_FAILED_MESSAGE));
}

#[tokio::test]
async fn next_submit_clears_previous_error() {
    let (api, mut client) = loaded_client(Vec::new()).await;
    api.fail_with(server_error());
    client.set_draft_title("t");
    client.set_draft_description("d");
    client.submit_draft().await;

    api.state.lock().unwrap().fail_with = None;
    assert_eq!(client.submit_draft().await, Outcome::Applied);
    assert_eq!(client.error_message(), None);
}

#[tokio::test]
async fn only_one_task_can_be_edited_at_a_time() {
    let first = Task::new("first", "1");
    let second = Task::new("second", "2");
    let (_, mut client) = loaded_client(vec![first.clone(), second.clone()]).await;

    assert!(client.begin_edit(first.id));
    assert_eq!(client.focus(), Focus::Editing(first.id));
    assert_eq!(client.edit_session().unwrap().fields, first.fields());

    assert!(!client.begin_edit(second.id));
    assert_eq!(client.focus(), Focus::Editing(first.id));
}

#[tokio::test]
async fn begin_edit_of_unknown_task_is_refused() {
    let (_, mut client) = loaded_client(vec![Task::new("a", "1")]).await;
    assert!(!client.begin_edit(Uuid::new_v4()));
    assert!(client.edit_session().is_none());
}

#[tokio::test]
async fn confirm_update_patches_only_title_and_description() {
    let original = Task::new("draft", "first");
    let (api, mut client) = loaded_client(vec![original.clone()]).await;

    client.begin_edit(original.id);
    client.set_edit_title("final");
    client.set_edit_description("second");
    assert_eq!(client.confirm_update().await, Outcome::Applied);

    let patched = &client.tasks()[0];
    assert_eq!(patched.id, original.id);
    assert_eq!(patched.created_at, original.created_at);
    assert_eq!(patched.fields(), TaskFields::new("final", "second"));
    assert!(client.edit_session().is_none());
    assert_eq!(client.status_message(), Some(UPDATED_MESSAGE));
    assert_eq!(api.calls(), vec![Call::List, Call::Update(original.id)]);
}

#[tokio::test]
async fn confirm_update_keeps_the_fields_the_store_echoes() {
    let original = Task::new("draft", "first");
    let (api, mut client) = loaded_client(vec![original.clone()]).await;
    api.state.lock().unwrap().trim_on_update = true;

    client.begin_edit(original.id);
    client.set_edit_title("  final ");
    client.set_edit_description("second  ");
    assert_eq!(client.confirm_update().await, Outcome::Applied);

    assert_eq!(client.tasks()[0].fields(), TaskFields::new("final", "second"));
    assert_eq!(client.tasks(), api.stored().as_slice());
}

#[tokio::test]
async fn blank_edit_field_sends_nothing() {
    let original = Task::new("draft", "first");
    let (api, mut client) = loaded_client(vec![original.clone()]).await;

    client.begin_edit(original.id);
    client.set_edit_title(" ");
    assert_eq!(client.confirm_update().await, Outcome::Skipped);

    assert_eq!(api.calls(), vec![Call::List]);
    assert_eq!(client.focus(), Focus::Editing(original.id));
}

#[tokio::test]
async fn failed_update_keeps_edit_mode_and_local_task() {
    let original = Task::new("draft", "first");
    let (api, mut client) = loaded_client(vec![original.clone()]).await;
    client.begin_edit(original.id);
    client.set_edit_title("final");
    api.fail_with(server_error());

    assert_eq!(client.confirm_update().await, Outcome::Failed);

    assert_eq!(client.tasks(), &[original.clone()]);
    assert_eq!(client.error_message(), Some(UPDATE_FAILED_MESSAGE));
    assert_eq!(client.edit_session().unwrap().fields.title, "final");
}

#[tokio::test]
async fn cancel_edit_discards_fields_without_request() {
    let original = Task::new("draft", "first");
    let (api, mut client) = loaded_client(vec![original.clone()]).await;

    client.begin_edit(original.id);
    client.set_edit_title("discarded");
    client.cancel_edit();

    assert_eq!(client.focus(), Focus::Idle);
    assert_eq!(client.tasks(), &[original]);
    assert_eq!(api.calls(), vec![Call::List]);
}

#[tokio::test]
async fn delete_asks_for_confirmation_first() {
    let task = Task::new("a", "1");
    let api = FakeApi::with_tasks(vec![task.clone()]);
    let prompts = Arc::new(Mutex::new(Vec::new()));
    let seen = Arc::clone(&prompts);
    let mut client = TaskClient::new(api.clone(), move |prompt: &str| {
        seen.lock().unwrap().push(prompt.to_string());
        false
    });
    client.load().await;

    assert_eq!(client.delete(task.id).await, Outcome::Skipped);

    assert_eq!(prompts.lock().unwrap().as_slice(), &[DELETE_PROMPT.to_string()]);
    assert_eq!(client.tasks(), &[task]);
    assert_eq!(api.calls(), vec![Call::List]);
}

#[tokio::test]
async fn delete_twice_is_observably_successful() {
    let keep = Task::new("keep", "1");
    let removed = Task::new("remove", "2");
    let (api, mut client) = loaded_client(vec![keep.clone(), removed.clone()]).await;

    assert_eq!(client.delete(removed.id).await, Outcome::Applied);
    assert_eq!(client.delete(removed.id).await, Outcome::Applied);

    assert_eq!(client.tasks(), &[keep.clone()]);
    assert_eq!(api.stored(), vec![keep]);
}

#[tokio::test]
async fn fire_and_forget_delete_removes_row_even_on_server_error() {
    let task = Task::new("a", "1");
    let (api, mut client) = loaded_client(vec![task.clone()]).await;
    api.fail_with(server_error());

    assert_eq!(client.delete(task.id).await, Outcome::Applied);
    assert!(client.tasks().is_empty());
    assert_eq!(client.error_message(), None);
}

#[tokio::test]
async fn fire_and_forget_delete_keeps_row_on_transport_failure() {
    let task = Task::new("a", "1");
    let (api, mut client) = loaded_client(vec![task.clone()]).await;
    api.fail_with(ApiError::Transport("reset".to_string()));

    assert_eq!(client.delete(task.id).await, Outcome::Failed);
    assert_eq!(client.tasks(), &[task]);
    assert_eq!(client.error_message(), None);
}

#[tokio::test]
async fn strict_delete_reports_server_error_and_keeps_row() {
    let task = Task::new("a", "1");
    let api = FakeApi::with_tasks(vec![task.clone()]);
    let mut client =
        TaskClient::new(api.clone(), AlwaysConfirm).with_delete_policy(DeletePolicy::Strict);
    client.load().await;
    api.fail_with(server_error());

    assert_eq!(client.delete(task.id).await, Outcome::Failed);
    assert_eq!(client.tasks(), &[task]);
    assert_eq!(client.error_message(), Some(DELETE_FAILED_MESSAGE));
}

#[tokio::test]
async fn delete_is_unavailable_during_edit() {
    let task = Task::new("a", "1");
    let (api, mut client) = loaded_client(vec![task.clone()]).await;
    client.begin_edit(task.id);

    assert_eq!(client.delete(task.id).await, Outcome::Skipped);
    assert_eq!(api.calls(), vec![Call::List]);
}
