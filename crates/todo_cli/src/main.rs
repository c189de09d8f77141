//! Command-line front end for the task store.
//!
//! Each invocation loads the full list, performs one action through the
//! client state machine and prints the resulting view.

use chrono::Local;
use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::process::ExitCode;
use todo_client::view::{NO_CHART_DATA_PLACEHOLDER, NO_TASKS_PLACEHOLDER};
use todo_client::{
    completion_chart, task_rows, Confirm, DeletePolicy, HttpTodoApi, Outcome, TaskClient,
};
use todo_core::{default_log_level, init_logging};
use uuid::Uuid;

#[derive(Debug, Parser)]
#[command(name = "todo", version, about = "Manage tasks on a todo server")]
struct Cli {
    /// Root URL of the task store.
    #[arg(long, env = "TODO_API_URL", default_value = "http://localhost:8000")]
    api_url: String,

    /// Absolute directory for rolling log files. Logging is off when unset.
    #[arg(long, env = "TODO_LOG_DIR")]
    log_dir: Option<String>,

    /// One of trace|debug|info|warn|error; defaults by build mode.
    #[arg(long, env = "TODO_LOG_LEVEL")]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show tasks.
    List,
    /// Create a task.
    Add { title: String, description: String },
    /// Change a task's title and/or description.
    Edit {
        id: Uuid,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
    },
    /// Delete a task after confirmation.
    Delete {
        id: Uuid,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
        /// Keep the task listed unless the server confirms the delete.
        #[arg(long)]
        strict: bool,
    },
    /// Show the completion chart series.
    Chart,
    /// Print core linkage details.
    Info,
}

enum Prompt {
    Stdin,
    AssumeYes,
}

impl Confirm for Prompt {
    fn confirm(&self, prompt: &str) -> bool {
        match self {
            Self::AssumeYes => true,
            Self::Stdin => {
                print!("{prompt} [y/N] ");
                if io::stdout().flush().is_err() {
                    return false;
                }
                let mut answer = String::new();
                if io::stdin().lock().read_line(&mut answer).is_err() {
                    return false;
                }
                matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
            }
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    if let Err(err) = start_logging(&cli) {
        eprintln!("warning: logging disabled: {err}");
    }

    if let Command::Info = cli.command {
        println!("todo_core ping={}", todo_core::ping());
        println!("todo_core version={}", todo_core::core_version());
        return ExitCode::SUCCESS;
    }

    let (prompt, policy) = match &cli.command {
        Command::Delete { yes, strict, .. } => (
            if *yes { Prompt::AssumeYes } else { Prompt::Stdin },
            if *strict {
                DeletePolicy::Strict
            } else {
                DeletePolicy::FireAndForget
            },
        ),
        _ => (Prompt::Stdin, DeletePolicy::FireAndForget),
    };

    let api = HttpTodoApi::new(cli.api_url.as_str());
    let mut client = TaskClient::new(api, prompt).with_delete_policy(policy);
    if client.load().await == Outcome::Failed {
        eprintln!("warning: could not load tasks from {}", cli.api_url);
    }

    let show_chart = matches!(cli.command, Command::Chart);
    let outcome = match cli.command {
        Command::List | Command::Chart | Command::Info => Outcome::Applied,
        Command::Add { title, description } => {
            client.set_draft_title(title);
            client.set_draft_description(description);
            let outcome = client.submit_draft().await;
            if outcome == Outcome::Skipped {
                eprintln!("title and description must not be blank");
            }
            outcome
        }
        Command::Edit {
            id,
            title,
            description,
        } => {
            if !client.begin_edit(id) {
                eprintln!("no task with id {id}");
                return ExitCode::FAILURE;
            }
            if let Some(title) = title {
                client.set_edit_title(title);
            }
            if let Some(description) = description {
                client.set_edit_description(description);
            }
            let outcome = client.confirm_update().await;
            if outcome == Outcome::Skipped {
                eprintln!("title and description must not be blank");
            }
            outcome
        }
        Command::Delete { id, .. } => client.delete(id).await,
    };

    print_messages(&client);
    if show_chart {
        print_chart(&client);
    } else {
        print_tasks(&client);
    }

    if outcome == Outcome::Failed {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Starts file logging when a log directory is configured.
///
/// Returns `Ok(false)` when logging was left off.
fn start_logging(cli: &Cli) -> Result<bool, String> {
    let Some(log_dir) = cli.log_dir.as_deref().filter(|dir| !dir.trim().is_empty()) else {
        return Ok(false);
    };
    let level = cli.log_level.as_deref().unwrap_or_else(|| default_log_level());
    init_logging(level, log_dir, false).map(|()| true)
}

fn print_messages<A, C>(client: &TaskClient<A, C>)
where
    A: todo_client::TodoApi,
    C: Confirm,
{
    if let Some(status) = client.status_message() {
        println!("{status}");
    }
    if let Some(error) = client.error_message() {
        eprintln!("{error}");
    }
}

fn print_tasks<A, C>(client: &TaskClient<A, C>)
where
    A: todo_client::TodoApi,
    C: Confirm,
{
    let rows = task_rows(client.tasks(), client.edit_session(), &Local);
    if rows.is_empty() {
        println!("{NO_TASKS_PLACEHOLDER}");
        return;
    }
    for row in rows {
        println!("{}  {}", row.task.id, row.task.title);
        println!("    {}", row.task.description);
        println!("    Added on: {}", row.added_on);
    }
}

fn print_chart<A, C>(client: &TaskClient<A, C>)
where
    A: todo_client::TodoApi,
    C: Confirm,
{
    match completion_chart(client.tasks()) {
        Some(series) => {
            for (label, value) in series.labels.iter().zip(&series.values) {
                println!("{label}: {value}");
            }
        }
        None => println!("{NO_CHART_DATA_PLACEHOLDER}"),
    }
}
