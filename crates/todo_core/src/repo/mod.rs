//! Repository layer abstractions and persistence implementations.
//!
//! # Responsibility
//! - Define the data access contract for task records.
//! - Isolate SQLite query details from service orchestration.
//!
//! # Invariants
//! - Writes call `Task::validate()` before persistence.
//! - Repository APIs return semantic errors (`NotFound`) in addition to DB
//!   transport errors.

pub mod task_repo;
