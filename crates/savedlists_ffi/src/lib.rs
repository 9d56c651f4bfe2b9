//! Sync FFI surface of the saved-lists core for the mobile UI shell.

pub mod api;
