//! Persistence façade over the library store.
//!
//! # Responsibility
//! - Expose read/write/delete operations for library entities.
//! - Keep SQL text and row shaping inside the core persistence boundary.
//!
//! # Invariants
//! - One façade owns exactly one connection for its whole lifetime.
//! - Store failures are propagated to the caller, never retried or masked.

pub mod library_db;
