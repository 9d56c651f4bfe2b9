//! FFI use-case API for Flutter-facing calls.
//!
//! # Responsibility
//! - Expose list management as sync, envelope-returning functions.
//! - Own database path resolution for the UI process.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - Failures are reported through envelope fields, never as errors.

use log::warn;
use savedlists_core::db::open_db;
use savedlists_core::{
    concrete_list, core_version as core_version_inner, init_logging as init_logging_inner,
    ping as ping_inner, ListService, ListServiceError, SqliteListStore, StoredList,
};
use std::path::PathBuf;
use std::sync::OnceLock;

const LISTS_DB_FILE_NAME: &str = "savedlists.sqlite3";
const LISTS_DB_PATH_ENV: &str = "SAVEDLISTS_DB_PATH";
static LISTS_DB_PATH: OnceLock<PathBuf> = OnceLock::new();

/// Health-check probe.
///
/// # FFI contract
/// - Sync call, non-blocking, never throws.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Core crate version.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// # FFI contract
/// - Idempotent for the same `level + log_dir`.
/// - Returns an empty string on success, the error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(level.as_str(), log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err,
    }
}

/// One list row for UI display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListEntry {
    pub id: i64,
    pub title: String,
    /// Item count when the row was read.
    pub count: u32,
    /// `<title> [<count>]` display label.
    pub label: String,
}

/// Envelope for list queries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListsResponse {
    /// Lists in display order (empty on failure).
    pub items: Vec<ListEntry>,
    /// Empty on success; diagnostic text otherwise.
    pub message: String,
}

/// Envelope for list mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListActionResponse {
    pub ok: bool,
    /// Affected list id on success.
    pub list_id: Option<i64>,
    /// Human-readable result for diagnostics/UI.
    pub message: String,
}

impl ListActionResponse {
    fn success(message: impl Into<String>, list_id: i64) -> Self {
        Self {
            ok: true,
            list_id: Some(list_id),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            list_id: None,
            message: message.into(),
        }
    }
}

/// All lists in display order: standard list first, then by title.
///
/// # FFI contract
/// - Sync call, DB-backed execution, never panics.
#[flutter_rust_bridge::frb(sync)]
pub fn lists_sorted() -> ListsResponse {
    match with_list_service(|service| service.sorted_lists()) {
        Ok(lists) => ListsResponse {
            items: lists.iter().map(to_list_entry).collect(),
            message: String::new(),
        },
        Err(message) => ListsResponse {
            items: Vec::new(),
            message: format!("lists_sorted failed: {message}"),
        },
    }
}

/// Creates a list from user input (trimmed; blank is rejected).
#[flutter_rust_bridge::frb(sync)]
pub fn list_create(name: String) -> ListActionResponse {
    match with_list_service(|service| service.create_list(name)) {
        Ok(list) => ListActionResponse::success("List created.", list.id),
        Err(message) => ListActionResponse::failure(format!("list_create failed: {message}")),
    }
}

/// Renames a custom list.
#[flutter_rust_bridge::frb(sync)]
pub fn list_rename(list_id: i64, name: String) -> ListActionResponse {
    match with_list_service(|service| service.rename_list(list_id, name)) {
        Ok(list) => ListActionResponse::success("List renamed.", list.id),
        Err(message) => ListActionResponse::failure(format!("list_rename failed: {message}")),
    }
}

/// Deletes a custom list; its items move to the standard list.
#[flutter_rust_bridge::frb(sync)]
pub fn list_delete(list_id: i64) -> ListActionResponse {
    match with_list_service(|service| service.delete_list(list_id)) {
        Ok(()) => ListActionResponse::success("List deleted.", list_id),
        Err(message) => ListActionResponse::failure(format!("list_delete failed: {message}")),
    }
}

/// Maps pseudo-list ids to the standard list; identity otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn concrete_list_id(list_id: i64) -> i64 {
    concrete_list(list_id)
}

fn resolve_lists_db_path() -> PathBuf {
    LISTS_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var(LISTS_DB_PATH_ENV) {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(LISTS_DB_FILE_NAME)
        })
        .clone()
}

fn with_list_service<T>(
    f: impl FnOnce(&ListService<SqliteListStore<'_>>) -> Result<T, ListServiceError>,
) -> Result<T, String> {
    let db_path = resolve_lists_db_path();
    let conn = open_db(&db_path).map_err(|err| format!("list DB open failed: {err}"))?;
    let store =
        SqliteListStore::try_new(&conn).map_err(|err| format!("list store init failed: {err}"))?;
    let service = ListService::new(store);
    f(&service).map_err(|err| {
        warn!("event=ffi_call module=ffi status=error error={err}");
        err.to_string()
    })
}

fn to_list_entry(list: &StoredList) -> ListEntry {
    ListEntry {
        id: list.id,
        title: list.title.clone(),
        count: list.count,
        label: list.title_and_count(),
    }
}
