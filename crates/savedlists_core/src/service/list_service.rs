//! List use-case service.
//!
//! # Responsibility
//! - Present lists in display order.
//! - Validate titles and ids above the store layer.
//! - Canonicalize pseudo-list ids before item membership is written.
//!
//! # Invariants
//! - The standard list is always first in display order.
//! - Only custom lists can be renamed or deleted.
//! - Titles are trimmed; blank titles never reach the store.

use crate::model::collation::TitleCollator;
use crate::model::list::{concrete_list, is_custom_list, ListId, StoredList};
use crate::repo::list_repo::{ListStore, RepoError, RepoResult};
use std::cmp::Ordering;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Errors from list service operations.
#[derive(Debug)]
pub enum ListServiceError {
    /// Title is blank after trim.
    InvalidTitle,
    /// Item key is blank after trim.
    InvalidItemKey,
    /// Target list does not exist.
    ListNotFound(ListId),
    /// Target is the standard list or a pseudo-list.
    NotRenameable(ListId),
    /// Target is the standard list or a pseudo-list.
    NotDeletable(ListId),
    /// Store returned an id below its custom-id offset.
    CreateRejected(ListId),
    /// Store-level failure.
    Repo(RepoError),
}

impl Display for ListServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidTitle => write!(f, "list title must not be blank"),
            Self::InvalidItemKey => write!(f, "item key must not be blank"),
            Self::ListNotFound(id) => write!(f, "list not found: {id}"),
            Self::NotRenameable(id) => write!(f, "list cannot be renamed: {id}"),
            Self::NotDeletable(id) => write!(f, "list cannot be deleted: {id}"),
            Self::CreateRejected(id) => write!(f, "store rejected list creation (returned {id})"),
            Self::Repo(err) => write!(f, "{err}"),
        }
    }
}

impl Error for ListServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RepoError> for ListServiceError {
    fn from(value: RepoError) -> Self {
        match value {
            RepoError::NotFound(id) => Self::ListNotFound(id),
            other => Self::Repo(other),
        }
    }
}

/// Display-order comparison: standard list first, then titles by collation.
pub fn compare_for_display(
    collator: &TitleCollator,
    lhs: &StoredList,
    rhs: &StoredList,
) -> Ordering {
    match (lhs.is_standard(), rhs.is_standard()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        (false, false) => collator.compare(&lhs.title, &rhs.title),
    }
}

/// Sorts lists into display order. Collation-equal titles keep their
/// incoming order.
pub fn sort_lists(lists: &mut [StoredList], collator: &TitleCollator) {
    lists.sort_by(|lhs, rhs| compare_for_display(collator, lhs, rhs));
}

/// List service facade.
pub struct ListService<S: ListStore> {
    store: S,
    collator: TitleCollator,
}

impl<S: ListStore> ListService<S> {
    /// Creates service with the default collator.
    pub fn new(store: S) -> Self {
        Self::with_collator(store, TitleCollator::default())
    }

    pub fn with_collator(store: S, collator: TitleCollator) -> Self {
        Self { store, collator }
    }

    /// All lists in display order.
    pub fn sorted_lists(&self) -> Result<Vec<StoredList>, ListServiceError> {
        let mut lists = self.store.lists()?;
        sort_lists(&mut lists, &self.collator);
        Ok(lists)
    }

    pub fn get_list(&self, list_id: ListId) -> Result<StoredList, ListServiceError> {
        self.store
            .get_list(list_id)?
            .ok_or(ListServiceError::ListNotFound(list_id))
    }

    /// Creates a list and returns its fresh snapshot.
    pub fn create_list(&self, title: impl Into<String>) -> Result<StoredList, ListServiceError> {
        let title = normalize_title(title.into())?;
        let list_id = self.store.create_list(title.as_str())?;
        if list_id < self.store.first_custom_id() {
            return Err(ListServiceError::CreateRejected(list_id));
        }
        self.get_list(list_id)
    }

    pub fn rename_list(
        &self,
        list_id: ListId,
        title: impl Into<String>,
    ) -> Result<StoredList, ListServiceError> {
        if !is_custom_list(list_id) {
            return Err(ListServiceError::NotRenameable(list_id));
        }
        let title = normalize_title(title.into())?;
        self.store.rename_list(list_id, title.as_str())?;
        self.get_list(list_id)
    }

    /// Deletes a custom list; its items fall back to the standard list.
    pub fn delete_list(&self, list_id: ListId) -> Result<(), ListServiceError> {
        if !is_custom_list(list_id) {
            return Err(ListServiceError::NotDeletable(list_id));
        }
        if !self.store.delete_list(list_id)? {
            return Err(ListServiceError::ListNotFound(list_id));
        }
        Ok(())
    }

    /// Saves one item into a list, mapping pseudo-lists to the standard list.
    ///
    /// Returns the list id the item was actually stored under.
    pub fn save_item(
        &self,
        item_key: impl Into<String>,
        list_id: ListId,
    ) -> Result<ListId, ListServiceError> {
        let item_key = item_key.into();
        let item_key = item_key.trim();
        if item_key.is_empty() {
            return Err(ListServiceError::InvalidItemKey);
        }
        let target = concrete_list(list_id);
        self.store.save_item(item_key, target)?;
        Ok(target)
    }

    pub fn remove_item(&self, item_key: &str) -> RepoResult<bool> {
        self.store.remove_item(item_key.trim())
    }

    pub fn items_in_list(&self, list_id: ListId) -> RepoResult<Vec<String>> {
        self.store.items_in_list(list_id)
    }
}

/// Trims a user-entered list title; `None` when nothing is left.
pub fn normalize_list_title(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn normalize_title(value: String) -> Result<String, ListServiceError> {
    normalize_list_title(value.as_str()).ok_or(ListServiceError::InvalidTitle)
}
