//! SQLite storage bootstrap and schema migration entry points.
//!
//! # Responsibility
//! - Open and configure SQLite connections for the agenda store.
//! - Apply schema migrations in deterministic order.
//! - Classify constraint failures so repositories can map them to semantic
//!   errors (`Conflict`, `NotFound`).
//!
//! # Invariants
//! - Migration version is tracked via `PRAGMA user_version`.
//! - Attraction/membership rows are never touched before migrations succeed.

use rusqlite::ffi;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod migrations;
mod open;

pub use open::{open_db, open_db_in_memory};
pub use rusqlite::Connection;

pub type DbResult<T> = Result<T, DbError>;

#[derive(Debug)]
pub enum DbError {
    Sqlite(rusqlite::Error),
    UnsupportedSchemaVersion {
        db_version: u32,
        latest_supported: u32,
    },
}

impl Display for DbError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::UnsupportedSchemaVersion {
                db_version,
                latest_supported,
            } => write!(
                f,
                "agenda database schema version {db_version} is newer than supported {latest_supported}"
            ),
        }
    }
}

impl Error for DbError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::UnsupportedSchemaVersion { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for DbError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Constraint family reported by a failed write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintViolation {
    /// Primary key or unique index collision.
    Duplicate,
    /// Referenced row does not exist.
    MissingReference,
}

/// Maps a SQLite error to the violated constraint family, if any.
pub fn constraint_violation(err: &rusqlite::Error) -> Option<ConstraintViolation> {
    match err {
        rusqlite::Error::SqliteFailure(failure, _) => match failure.extended_code {
            ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE => {
                Some(ConstraintViolation::Duplicate)
            }
            ffi::SQLITE_CONSTRAINT_FOREIGNKEY => Some(ConstraintViolation::MissingReference),
            _ => None,
        },
        _ => None,
    }
}
