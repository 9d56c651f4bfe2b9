//! Persistence contracts and SQLite implementations.
//!
//! # Responsibility
//! - Define the store contract the list workflows depend on.
//! - Keep SQL details out of service and workflow code.
//!
//! # Invariants
//! - Store APIs report missing records as `NotFound` or `None`, never as a
//!   transport error.

pub mod list_repo;
