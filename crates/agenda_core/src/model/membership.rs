//! Membership and agenda-entry models.
//!
//! # Responsibility
//! - Define the user-to-attraction link persisted by the repository.
//! - Define the transient join record consumed by the Agenda view.
//!
//! # Invariants
//! - `(user_id, attraction_id)` is unique per membership.
//! - `AgendaEntry` is derived, never persisted.

use crate::model::attraction::{Attraction, AttractionId};
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Opaque identifier of an authenticated user.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for UserId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for UserId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Link between one user and one attraction in their personal agenda.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Membership {
    pub user_id: UserId,
    pub attraction_id: AttractionId,
    /// Unix epoch milliseconds.
    pub added_at: i64,
}

/// Attraction joined with the `added_at` of its membership.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AgendaEntry {
    #[serde(flatten)]
    pub attraction: Attraction,
    /// Unix epoch milliseconds.
    pub added_at: i64,
}

impl AgendaEntry {
    pub fn new(attraction: Attraction, added_at: i64) -> Self {
        Self {
            attraction,
            added_at,
        }
    }

    pub fn id(&self) -> &AttractionId {
        &self.attraction.id
    }

    pub fn event_date(&self) -> &str {
        self.attraction.event_date.as_str()
    }

    pub fn start_time(&self) -> &str {
        self.attraction.start_time.as_str()
    }
}
