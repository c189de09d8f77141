//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the store's four operations.
//! - Keep transport layers decoupled from storage details.

pub mod task_service;
