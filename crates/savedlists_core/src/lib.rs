//! Core logic for saved lists: the list model, its display order, the
//! SQLite store and the interactive selection workflows.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::collation::{CollationStrength, TitleCollator};
pub use model::list::{
    concrete_list, is_custom_list, is_pseudo_list, ListId, StoredList, ALL_LIST_ID,
    STANDARD_LIST_ID, TEMPORARY_LIST_ID,
};
pub use repo::list_repo::{
    ListStore, ListStoreOptions, RepoError, RepoResult, SqliteListStore, DEFAULT_FIRST_CUSTOM_ID,
};
pub use service::list_picker::{
    build_options, resolve_choice, ChoicePrompt, ChoiceTarget, ListPicker, ListPrompter, Notice,
    NoticeKind, PickerLabels, SelectListRequest, TextPrompt,
};
pub use service::list_service::{
    compare_for_display, normalize_list_title, sort_lists, ListService, ListServiceError,
};

/// Health-check probe used by front-ends to verify linkage.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
