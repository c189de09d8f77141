//! Domain model for tracked tasks.
//!
//! # Responsibility
//! - Define the canonical task record shared by store, HTTP API and client.
//!
//! # Invariants
//! - Every task is identified by a stable, non-nil `TaskId`.
//! - `created_at` is assigned once and never rewritten by updates.
//! - Deletion is a hard delete; there is no tombstone state.

pub mod task;
