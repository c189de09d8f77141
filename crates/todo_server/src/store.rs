//! Shared handle to the task database.
//!
//! # Responsibility
//! - Own the single SQLite connection opened at startup.
//! - Run service calls on blocking worker threads so handlers stay async.
//!
//! # Invariants
//! - Each `run` call holds the connection for exactly one service operation.
//! - The handle is constructed explicitly and injected; there is no global.

use log::warn;
use rusqlite::Connection;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;
use std::sync::{Arc, Mutex, PoisonError};
use todo_core::db::{open_db, open_db_in_memory, DbResult};
use todo_core::{SqliteTaskRepository, TaskService, TaskServiceError};
use tokio::task::JoinError;

/// Failure of one store operation.
#[derive(Debug)]
pub enum StoreError {
    /// The service rejected or failed the operation.
    Service(TaskServiceError),
    /// The blocking worker panicked or was cancelled.
    Worker(JoinError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Service(err) => write!(f, "{err}"),
            Self::Worker(err) => write!(f, "storage worker failed: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Service(err) => Some(err),
            Self::Worker(err) => Some(err),
        }
    }
}

/// Cloneable handle to the task database.
#[derive(Clone)]
pub struct TaskStore {
    conn: Arc<Mutex<Connection>>,
}

impl TaskStore {
    /// Opens (and migrates) the database file at `path`.
    pub fn open(path: impl AsRef<Path>) -> DbResult<Self> {
        Ok(Self::from_connection(open_db(path)?))
    }

    /// Opens a fresh in-memory database.
    pub fn open_in_memory() -> DbResult<Self> {
        Ok(Self::from_connection(open_db_in_memory()?))
    }

    /// Wraps an already-migrated connection.
    pub fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs one service operation against the connection.
    pub async fn run<T, F>(&self, operation: F) -> Result<T, StoreError>
    where
        F: FnOnce(&TaskService<SqliteTaskRepository<'_>>) -> Result<T, TaskServiceError>
            + Send
            + 'static,
        T: Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let guard = conn.lock().unwrap_or_else(|poisoned: PoisonError<_>| {
                warn!("event=store_lock module=store status=recovered reason=poisoned");
                poisoned.into_inner()
            });
            let service = TaskService::new(SqliteTaskRepository::new(&guard));
            operation(&service)
        })
        .await
        .map_err(StoreError::Worker)?
        .map_err(StoreError::Service)
    }
}
