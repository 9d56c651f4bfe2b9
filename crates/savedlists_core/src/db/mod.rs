//! SQLite storage bootstrap for saved lists.
//!
//! # Responsibility
//! - Open and configure SQLite connections.
//! - Bring the list schema to the latest known version before any list
//!   access.
//!
//! # Invariants
//! - Schema version is tracked via `PRAGMA user_version`.
//! - A database written by a newer binary is never opened for writes.
//! - A failed migration step is reported with its target version and
//!   leaves the schema at the version it had before opening.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};

pub type DbResult<T> = Result<T, DbError>;

/// Failure to open or migrate a list database.
#[derive(Debug)]
pub enum DbError {
    /// Connection-level failure outside any migration step.
    Sqlite(rusqlite::Error),
    /// Migration step `version` failed and was rolled back.
    Migration {
        version: u32,
        source: rusqlite::Error,
    },
    /// The file carries a schema this binary does not know.
    SchemaTooNew { found: u32, supported: u32 },
}

impl DbError {
    /// Version of the migration step that failed, if any.
    pub fn failed_migration(&self) -> Option<u32> {
        match self {
            Self::Migration { version, .. } => Some(*version),
            _ => None,
        }
    }
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "list database error: {err}"),
            Self::Migration { version, source } => {
                write!(f, "list schema migration to version {version} failed: {source}")
            }
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "list database schema version {found} is newer than supported {supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) | Self::Migration { source: err, .. } => Some(err),
            Self::SchemaTooNew { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
