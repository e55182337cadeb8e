//! Attraction repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Define the request/response contract the core consumes for catalog and
//!   membership data.
//! - Provide a SQLite-backed implementation mirroring the hosted
//!   `attractions` / `user_attractions` tables.
//!
//! # Invariants
//! - `list_attractions` is ordered by `(event_date, start_time)` ascending.
//! - `create_membership` reports an existing pair as `Conflict` and a
//!   missing attraction as `NotFound`.
//! - `delete_membership` of an absent pair succeeds (idempotent delete).
//! - Read paths reject invalid persisted rows instead of masking them.

use crate::db::{constraint_violation, ConstraintViolation, DbError};
use crate::model::attraction::{Attraction, AttractionId, AttractionType, AttractionValidationError};
use crate::model::membership::{AgendaEntry, Membership, UserId};
use log::debug;
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

const ATTRACTION_COLUMNS: &str = "attractions.id AS id,
    attractions.title AS title,
    attractions.description AS description,
    attractions.speaker AS speaker,
    attractions.location AS location,
    attractions.type AS type,
    attractions.event_date AS event_date,
    attractions.start_time AS start_time,
    attractions.end_time AS end_time";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for catalog and membership operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(AttractionValidationError),
    Db(DbError),
    /// Referenced attraction does not exist.
    NotFound(AttractionId),
    /// Membership pair already exists.
    Conflict {
        user_id: UserId,
        attraction_id: AttractionId,
    },
    InvalidData(String),
    /// Transport or auth failure reported by a remote backend. Only
    /// non-SQLite implementations produce this; the SQLite repository
    /// reports storage failures as `Db`.
    Unavailable(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "attraction not found: {id}"),
            Self::Conflict {
                user_id,
                attraction_id,
            } => write!(
                f,
                "membership already exists: user {user_id} attraction {attraction_id}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted agenda data: {message}"),
            Self::Unavailable(message) => write!(f, "repository unavailable: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<AttractionValidationError> for RepoError {
    fn from(value: AttractionValidationError) -> Self {
        Self::Validation(value)
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

/// Data access contract for the attraction catalog and user memberships.
pub trait AttractionRepository {
    /// Lists the full catalog ordered by `(event_date, start_time)`.
    fn list_attractions(&self) -> RepoResult<Vec<Attraction>>;
    /// Lists memberships of one user in insertion order.
    fn list_memberships(&self, user_id: &UserId) -> RepoResult<Vec<Membership>>;
    /// Lists the user's memberships joined with their attractions, newest
    /// first. Memberships whose attraction is gone are skipped.
    fn list_agenda_entries(&self, user_id: &UserId) -> RepoResult<Vec<AgendaEntry>>;
    fn create_membership(&self, user_id: &UserId, attraction_id: &AttractionId) -> RepoResult<()>;
    fn delete_membership(&self, user_id: &UserId, attraction_id: &AttractionId) -> RepoResult<()>;
}

impl<R: AttractionRepository + ?Sized> AttractionRepository for &R {
    fn list_attractions(&self) -> RepoResult<Vec<Attraction>> {
        (**self).list_attractions()
    }

    fn list_memberships(&self, user_id: &UserId) -> RepoResult<Vec<Membership>> {
        (**self).list_memberships(user_id)
    }

    fn list_agenda_entries(&self, user_id: &UserId) -> RepoResult<Vec<AgendaEntry>> {
        (**self).list_agenda_entries(user_id)
    }

    fn create_membership(&self, user_id: &UserId, attraction_id: &AttractionId) -> RepoResult<()> {
        (**self).create_membership(user_id, attraction_id)
    }

    fn delete_membership(&self, user_id: &UserId, attraction_id: &AttractionId) -> RepoResult<()> {
        (**self).delete_membership(user_id, attraction_id)
    }
}

impl<R: AttractionRepository + ?Sized> AttractionRepository for Arc<R> {
    fn list_attractions(&self) -> RepoResult<Vec<Attraction>> {
        (**self).list_attractions()
    }

    fn list_memberships(&self, user_id: &UserId) -> RepoResult<Vec<Membership>> {
        (**self).list_memberships(user_id)
    }

    fn list_agenda_entries(&self, user_id: &UserId) -> RepoResult<Vec<AgendaEntry>> {
        (**self).list_agenda_entries(user_id)
    }

    fn create_membership(&self, user_id: &UserId, attraction_id: &AttractionId) -> RepoResult<()> {
        (**self).create_membership(user_id, attraction_id)
    }

    fn delete_membership(&self, user_id: &UserId, attraction_id: &AttractionId) -> RepoResult<()> {
        (**self).delete_membership(user_id, attraction_id)
    }
}

/// SQLite-backed attraction repository.
pub struct SqliteAttractionRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteAttractionRepository<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Inserts or replaces one catalog record by id.
    ///
    /// Catalog records are owned by the backend; this path exists for
    /// seeding and import.
    pub fn upsert_attraction(&self, attraction: &Attraction) -> RepoResult<()> {
        attraction.validate()?;
        upsert_row(self.conn, attraction)?;
        Ok(())
    }

    /// Upserts a batch atomically; returns the number of records written.
    pub fn upsert_attractions(&self, attractions: &[Attraction]) -> RepoResult<usize> {
        for attraction in attractions {
            attraction.validate()?;
        }

        let tx = self.conn.unchecked_transaction()?;
        for attraction in attractions {
            upsert_row(&tx, attraction)?;
        }
        tx.commit()?;

        Ok(attractions.len())
    }
}

impl AttractionRepository for SqliteAttractionRepository<'_> {
    fn list_attractions(&self) -> RepoResult<Vec<Attraction>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ATTRACTION_COLUMNS}
             FROM attractions
             ORDER BY event_date ASC, start_time ASC, id ASC;"
        ))?;
        let mut rows = stmt.query([])?;
        let mut attractions = Vec::new();

        while let Some(row) = rows.next()? {
            attractions.push(parse_attraction_row(row)?);
        }

        Ok(attractions)
    }

    fn list_memberships(&self, user_id: &UserId) -> RepoResult<Vec<Membership>> {
        let mut stmt = self.conn.prepare(
            "SELECT attraction_id, added_at
             FROM user_attractions
             WHERE user_id = ?1
             ORDER BY added_at ASC, rowid ASC;",
        )?;
        let mut rows = stmt.query([user_id.as_str()])?;
        let mut memberships = Vec::new();

        while let Some(row) = rows.next()? {
            let attraction_id: String = row.get("attraction_id")?;
            memberships.push(Membership {
                user_id: user_id.clone(),
                attraction_id: AttractionId::new(attraction_id),
                added_at: row.get("added_at")?,
            });
        }

        Ok(memberships)
    }

    fn list_agenda_entries(&self, user_id: &UserId) -> RepoResult<Vec<AgendaEntry>> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ATTRACTION_COLUMNS}, user_attractions.added_at AS added_at
             FROM user_attractions
             JOIN attractions ON attractions.id = user_attractions.attraction_id
             WHERE user_attractions.user_id = ?1
             ORDER BY user_attractions.added_at DESC, user_attractions.rowid DESC;"
        ))?;
        let mut rows = stmt.query([user_id.as_str()])?;
        let mut entries = Vec::new();

        while let Some(row) = rows.next()? {
            let attraction = parse_attraction_row(row)?;
            entries.push(AgendaEntry::new(attraction, row.get("added_at")?));
        }

        Ok(entries)
    }

    fn create_membership(&self, user_id: &UserId, attraction_id: &AttractionId) -> RepoResult<()> {
        let inserted = self.conn.execute(
            "INSERT INTO user_attractions (user_id, attraction_id, added_at)
             VALUES (?1, ?2, ?3);",
            params![user_id.as_str(), attraction_id.as_str(), now_epoch_ms()],
        );

        match inserted {
            Ok(_) => Ok(()),
            Err(err) => Err(match constraint_violation(&err) {
                Some(ConstraintViolation::Duplicate) => RepoError::Conflict {
                    user_id: user_id.clone(),
                    attraction_id: attraction_id.clone(),
                },
                Some(ConstraintViolation::MissingReference) => {
                    RepoError::NotFound(attraction_id.clone())
                }
                None => err.into(),
            }),
        }
    }

    fn delete_membership(&self, user_id: &UserId, attraction_id: &AttractionId) -> RepoResult<()> {
        let changed = self.conn.execute(
            "DELETE FROM user_attractions
             WHERE user_id = ?1 AND attraction_id = ?2;",
            params![user_id.as_str(), attraction_id.as_str()],
        )?;

        if changed == 0 {
            debug!("event=membership_delete module=repo status=noop reason=absent");
        }

        Ok(())
    }
}

fn upsert_row(conn: &Connection, attraction: &Attraction) -> rusqlite::Result<usize> {
    conn.execute(
        "INSERT INTO attractions (
            id,
            title,
            description,
            speaker,
            location,
            type,
            event_date,
            start_time,
            end_time
        ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
        ON CONFLICT (id) DO UPDATE SET
            title = excluded.title,
            description = excluded.description,
            speaker = excluded.speaker,
            location = excluded.location,
            type = excluded.type,
            event_date = excluded.event_date,
            start_time = excluded.start_time,
            end_time = excluded.end_time,
            updated_at = (strftime('%s', 'now') * 1000);",
        params![
            attraction.id.as_str(),
            attraction.title.as_str(),
            attraction.description.as_str(),
            attraction.speaker.as_str(),
            attraction.location.as_str(),
            attraction.kind.as_str(),
            attraction.event_date.as_str(),
            attraction.start_time.as_str(),
            attraction.end_time.as_str(),
        ],
    )
}

fn parse_attraction_row(row: &Row<'_>) -> RepoResult<Attraction> {
    let id: String = row.get("id")?;
    let type_text: String = row.get("type")?;

    let attraction = Attraction {
        id: AttractionId::new(id),
        title: row.get("title")?,
        description: row.get("description")?,
        speaker: row.get("speaker")?,
        location: row.get("location")?,
        kind: AttractionType::parse(&type_text),
        event_date: row.get("event_date")?,
        start_time: row.get("start_time")?,
        end_time: row.get("end_time")?,
    };
    attraction.validate().map_err(|err| {
        RepoError::InvalidData(format!("attraction `{}`: {err}", attraction.id))
    })?;
    Ok(attraction)
}

fn now_epoch_ms() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| {
            i64::try_from(elapsed.as_millis()).unwrap_or(i64::MAX)
        })
}
