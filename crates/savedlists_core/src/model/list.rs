//! Saved-list domain model.
//!
//! # Responsibility
//! - Define the list snapshot exchanged between store, services and UI.
//! - Own the reserved id space and pseudo-list canonicalization.
//!
//! # Invariants
//! - Identity is the numeric `id` only; `title` and `count` never take
//!   part in equality or hashing.
//! - Reserved ids (`0..=2`) are never assigned to user-created lists.
//! - `count` is a snapshot taken at read time and is stale after any
//!   store mutation.

use serde::Serialize;
use std::hash::{Hash, Hasher};

/// Numeric list identifier assigned by the store.
pub type ListId = i64;

/// Pseudo-list for transient, unsaved results.
pub const TEMPORARY_LIST_ID: ListId = 0;
/// Default list that always exists; pinned first in sorted output.
pub const STANDARD_LIST_ID: ListId = 1;
/// Pseudo-list meaning "union of all concrete lists".
pub const ALL_LIST_ID: ListId = 2;

/// Read-only snapshot of one list.
#[derive(Debug, Clone, Serialize)]
pub struct StoredList {
    /// Stable id. Never reused within a store.
    pub id: ListId,
    /// User-facing name. Changed only through a store rename.
    pub title: String,
    /// Item count at the moment the snapshot was read.
    pub count: u32,
}

impl StoredList {
    pub fn new(id: ListId, title: impl Into<String>, count: u32) -> Self {
        Self {
            id,
            title: title.into(),
            count,
        }
    }

    /// Display label in the form `<title> [<count>]`.
    pub fn title_and_count(&self) -> String {
        format!("{} [{}]", self.title, self.count)
    }

    pub fn is_standard(&self) -> bool {
        self.id == STANDARD_LIST_ID
    }
}

impl PartialEq for StoredList {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for StoredList {}

impl Hash for StoredList {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

/// Returns `list_id` when it names a real list, the standard list otherwise.
///
/// Must be applied before persisting item membership, because the
/// temporary and all-lists pseudo ids have no backing record.
pub fn concrete_list(list_id: ListId) -> ListId {
    if list_id == ALL_LIST_ID || list_id == TEMPORARY_LIST_ID {
        return STANDARD_LIST_ID;
    }
    list_id
}

/// Whether `list_id` is one of the virtual ids with no stored record.
pub fn is_pseudo_list(list_id: ListId) -> bool {
    list_id == TEMPORARY_LIST_ID || list_id == ALL_LIST_ID
}

/// Whether `list_id` names a user-created list (renameable, deletable).
pub fn is_custom_list(list_id: ListId) -> bool {
    list_id > ALL_LIST_ID
}
