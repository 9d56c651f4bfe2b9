//! List store contract and SQLite implementation.
//!
//! # Responsibility
//! - Own persisted list records and item membership.
//! - Assign list ids and synthesize the standard / all-lists snapshots.
//!
//! # Invariants
//! - Custom list ids are `row_id + first_custom_id`; `AUTOINCREMENT`
//!   guarantees a deleted id is never handed out again.
//! - The standard list has no row; it always exists.
//! - Item membership is stored only against concrete list ids.
//! - Titles and item keys are never written to logs.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::list::{
    ListId, StoredList, ALL_LIST_ID, STANDARD_LIST_ID, TEMPORARY_LIST_ID,
};
use log::{info, warn};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Default offset for the first user-created list id.
pub const DEFAULT_FIRST_CUSTOM_ID: ListId = 10;

const LIST_SELECT_SQL: &str = "SELECT
    l.row_id,
    l.title,
    (SELECT COUNT(*) FROM list_items i WHERE i.list_id = l.row_id + ?1) AS item_count
FROM lists l";

pub type RepoResult<T> = Result<T, RepoError>;

/// Errors from list store operations.
#[derive(Debug)]
pub enum RepoError {
    /// Underlying SQLite/bootstrap error.
    Db(DbError),
    /// No list with this id exists in storage.
    NotFound(ListId),
    /// Connection was not migrated to the schema this store expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Input or persisted data cannot be mapped to a valid list.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "list not found: {id}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "list store requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid list data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::NotFound(_) => None,
            Self::UninitializedConnection { .. } => None,
            Self::InvalidData(_) => None,
        }
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Store-level settings.
///
/// `first_custom_id` must stay the same for the lifetime of one database,
/// because it is part of every persisted membership row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListStoreOptions {
    /// Created ids are always above this value; lower ids mean failure.
    pub first_custom_id: ListId,
    /// Title of the synthesized standard list.
    pub standard_title: String,
    /// Title of the synthesized all-lists snapshot.
    pub all_title: String,
}

impl Default for ListStoreOptions {
    fn default() -> Self {
        Self {
            first_custom_id: DEFAULT_FIRST_CUSTOM_ID,
            standard_title: "Stored".to_string(),
            all_title: "All lists".to_string(),
        }
    }
}

/// Persistence contract for lists.
pub trait ListStore {
    /// Every known list including the standard one, in storage order.
    fn lists(&self) -> RepoResult<Vec<StoredList>>;
    /// One list snapshot; pseudo-list ids resolve as documented per store.
    fn get_list(&self, list_id: ListId) -> RepoResult<Option<StoredList>>;
    /// Creates a list and returns its id.
    ///
    /// An id below [`ListStore::first_custom_id`] signals failure.
    fn create_list(&self, title: &str) -> RepoResult<ListId>;
    fn rename_list(&self, list_id: ListId, title: &str) -> RepoResult<()>;
    /// Deletes a custom list, moving its items to the standard list.
    ///
    /// Returns `false` when nothing was deleted.
    fn delete_list(&self, list_id: ListId) -> RepoResult<bool>;
    fn first_custom_id(&self) -> ListId;
    /// Inserts or moves one item into a concrete list.
    fn save_item(&self, item_key: &str, list_id: ListId) -> RepoResult<()>;
    fn remove_item(&self, item_key: &str) -> RepoResult<bool>;
    /// Item keys stored in a list; `ALL_LIST_ID` yields every stored item.
    fn items_in_list(&self, list_id: ListId) -> RepoResult<Vec<String>>;
}

impl<T: ListStore + ?Sized> ListStore for &T {
    fn lists(&self) -> RepoResult<Vec<StoredList>> {
        (**self).lists()
    }

    fn get_list(&self, list_id: ListId) -> RepoResult<Option<StoredList>> {
        (**self).get_list(list_id)
    }

    fn create_list(&self, title: &str) -> RepoResult<ListId> {
        (**self).create_list(title)
    }

    fn rename_list(&self, list_id: ListId, title: &str) -> RepoResult<()> {
        (**self).rename_list(list_id, title)
    }

    fn delete_list(&self, list_id: ListId) -> RepoResult<bool> {
        (**self).delete_list(list_id)
    }

    fn first_custom_id(&self) -> ListId {
        (**self).first_custom_id()
    }

    fn save_item(&self, item_key: &str, list_id: ListId) -> RepoResult<()> {
        (**self).save_item(item_key, list_id)
    }

    fn remove_item(&self, item_key: &str) -> RepoResult<bool> {
        (**self).remove_item(item_key)
    }

    fn items_in_list(&self, list_id: ListId) -> RepoResult<Vec<String>> {
        (**self).items_in_list(list_id)
    }
}

/// SQLite-backed list store.
pub struct SqliteListStore<'conn> {
    conn: &'conn Connection,
    options: ListStoreOptions,
}

impl<'conn> SqliteListStore<'conn> {
    /// Creates a store with default options from a migrated connection.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        Self::with_options(conn, ListStoreOptions::default())
    }

    /// Creates a store with explicit options from a migrated connection.
    pub fn with_options(conn: &'conn Connection, options: ListStoreOptions) -> RepoResult<Self> {
        if options.first_custom_id <= ALL_LIST_ID {
            return Err(RepoError::InvalidData(format!(
                "first_custom_id must be greater than {ALL_LIST_ID}, got {}",
                options.first_custom_id
            )));
        }
        ensure_list_connection_ready(conn)?;
        Ok(Self { conn, options })
    }

    fn to_row_id(&self, list_id: ListId) -> Option<i64> {
        (list_id >= self.options.first_custom_id).then(|| list_id - self.options.first_custom_id)
    }

    fn standard_list(&self) -> RepoResult<StoredList> {
        let count = count_items(self.conn, Some(STANDARD_LIST_ID))?;
        Ok(StoredList::new(
            STANDARD_LIST_ID,
            self.options.standard_title.as_str(),
            count,
        ))
    }

    fn custom_list_exists(&self, list_id: ListId) -> RepoResult<bool> {
        let Some(row_id) = self.to_row_id(list_id) else {
            return Ok(false);
        };
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM lists WHERE row_id = ?1);",
            [row_id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

impl ListStore for SqliteListStore<'_> {
    fn lists(&self) -> RepoResult<Vec<StoredList>> {
        let offset = self.options.first_custom_id;
        let mut stmt = self
            .conn
            .prepare(&format!("{LIST_SELECT_SQL} ORDER BY l.row_id ASC;"))?;
        let mut rows = stmt.query([offset])?;

        let mut lists = vec![self.standard_list()?];
        while let Some(row) = rows.next()? {
            lists.push(parse_list_row(row, offset)?);
        }
        Ok(lists)
    }

    fn get_list(&self, list_id: ListId) -> RepoResult<Option<StoredList>> {
        match list_id {
            STANDARD_LIST_ID => return self.standard_list().map(Some),
            ALL_LIST_ID => {
                let count = count_items(self.conn, None)?;
                return Ok(Some(StoredList::new(
                    ALL_LIST_ID,
                    self.options.all_title.as_str(),
                    count,
                )));
            }
            _ => {}
        }

        let Some(row_id) = self.to_row_id(list_id) else {
            return Ok(None);
        };
        let offset = self.options.first_custom_id;
        let mut stmt = self
            .conn
            .prepare(&format!("{LIST_SELECT_SQL} WHERE l.row_id = ?2;"))?;
        let mut rows = stmt.query(params![offset, row_id])?;
        match rows.next()? {
            Some(row) => Ok(Some(parse_list_row(row, offset)?)),
            None => Ok(None),
        }
    }

    fn create_list(&self, title: &str) -> RepoResult<ListId> {
        if title.trim().is_empty() {
            return Err(RepoError::InvalidData(
                "list title must not be blank".to_string(),
            ));
        }

        self.conn
            .execute("INSERT INTO lists (title) VALUES (?1);", [title])?;
        let list_id = self.conn.last_insert_rowid() + self.options.first_custom_id;
        info!("event=list_create module=repo status=ok list_id={list_id}");
        Ok(list_id)
    }

    fn rename_list(&self, list_id: ListId, title: &str) -> RepoResult<()> {
        if title.trim().is_empty() {
            return Err(RepoError::InvalidData(
                "list title must not be blank".to_string(),
            ));
        }
        let row_id = self.to_row_id(list_id).ok_or(RepoError::NotFound(list_id))?;

        let changed = self.conn.execute(
            "UPDATE lists
             SET
                title = ?1,
                updated_at = (strftime('%s', 'now') * 1000)
             WHERE row_id = ?2;",
            params![title, row_id],
        )?;
        if changed == 0 {
            return Err(RepoError::NotFound(list_id));
        }

        info!("event=list_rename module=repo status=ok list_id={list_id}");
        Ok(())
    }

    fn delete_list(&self, list_id: ListId) -> RepoResult<bool> {
        let Some(row_id) = self.to_row_id(list_id) else {
            warn!("event=list_delete module=repo status=skipped list_id={list_id} reason=reserved_id");
            return Ok(false);
        };

        let tx = self.conn.unchecked_transaction()?;
        let deleted = tx.execute("DELETE FROM lists WHERE row_id = ?1;", [row_id])?;
        if deleted == 0 {
            return Ok(false);
        }
        let moved = tx.execute(
            "UPDATE list_items SET list_id = ?1 WHERE list_id = ?2;",
            params![STANDARD_LIST_ID, list_id],
        )?;
        tx.commit()?;

        info!("event=list_delete module=repo status=ok list_id={list_id} moved_items={moved}");
        Ok(true)
    }

    fn first_custom_id(&self) -> ListId {
        self.options.first_custom_id
    }

    fn save_item(&self, item_key: &str, list_id: ListId) -> RepoResult<()> {
        if item_key.trim().is_empty() {
            return Err(RepoError::InvalidData(
                "item key must not be blank".to_string(),
            ));
        }
        if list_id != STANDARD_LIST_ID && !self.custom_list_exists(list_id)? {
            return Err(RepoError::NotFound(list_id));
        }

        self.conn.execute(
            "INSERT INTO list_items (item_key, list_id) VALUES (?1, ?2)
             ON CONFLICT(item_key) DO UPDATE SET
                list_id = excluded.list_id,
                saved_at = (strftime('%s', 'now') * 1000);",
            params![item_key, list_id],
        )?;
        Ok(())
    }

    fn remove_item(&self, item_key: &str) -> RepoResult<bool> {
        let removed = self
            .conn
            .execute("DELETE FROM list_items WHERE item_key = ?1;", [item_key])?;
        Ok(removed > 0)
    }

    fn items_in_list(&self, list_id: ListId) -> RepoResult<Vec<String>> {
        if list_id == TEMPORARY_LIST_ID {
            return Ok(Vec::new());
        }

        let mut items = Vec::new();
        if list_id == ALL_LIST_ID {
            let mut stmt = self
                .conn
                .prepare("SELECT item_key FROM list_items ORDER BY item_key ASC;")?;
            let mut rows = stmt.query([])?;
            while let Some(row) = rows.next()? {
                items.push(row.get(0)?);
            }
            return Ok(items);
        }

        let mut stmt = self.conn.prepare(
            "SELECT item_key FROM list_items WHERE list_id = ?1 ORDER BY item_key ASC;",
        )?;
        let mut rows = stmt.query([list_id])?;
        while let Some(row) = rows.next()? {
            items.push(row.get(0)?);
        }
        Ok(items)
    }
}

fn parse_list_row(row: &Row<'_>, offset: ListId) -> RepoResult<StoredList> {
    let row_id: i64 = row.get("row_id")?;
    let title: String = row.get("title")?;
    let raw_count: i64 = row.get("item_count")?;
    let count = u32::try_from(raw_count).map_err(|_| {
        RepoError::InvalidData(format!("invalid item count `{raw_count}` for list row {row_id}"))
    })?;
    Ok(StoredList::new(row_id + offset, title, count))
}

fn count_items(conn: &Connection, list_id: Option<ListId>) -> RepoResult<u32> {
    let raw: i64 = match list_id {
        Some(list_id) => conn.query_row(
            "SELECT COUNT(*) FROM list_items WHERE list_id = ?1;",
            [list_id],
            |row| row.get(0),
        )?,
        None => conn.query_row("SELECT COUNT(*) FROM list_items;", [], |row| row.get(0))?,
    };
    u32::try_from(raw).map_err(|_| RepoError::InvalidData(format!("invalid item count `{raw}`")))
}

fn ensure_list_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}
