//! Use-case services over the list store.
//!
//! # Responsibility
//! - Validate and order list data above the storage boundary.
//! - Run the interactive pick / create / rename workflows.
//!
//! # See also
//! - `repo::list_repo` for the store contract.

pub mod list_picker;
pub mod list_service;
