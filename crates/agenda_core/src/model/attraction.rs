//! Attraction domain model.
//!
//! # Responsibility
//! - Define the canonical record for one scheduled conference item.
//! - Validate the ISO date/time shapes that view ordering relies on.
//!
//! # Invariants
//! - `id` is opaque, non-blank and unique across the catalog.
//! - `event_date` is `YYYY-MM-DD`; `start_time`/`end_time` are `HH:MM:SS`.
//!   Lexicographic order of these strings equals chronological order.
//! - `end_time` is not required to be later than `start_time`.
//! - Unknown `type` values are preserved verbatim, never rejected.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use uuid::Uuid;

static ISO_DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-(0[1-9]|1[0-2])-(0[1-9]|[12]\d|3[01])$").expect("valid date regex")
});
static ISO_TIME_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([01]\d|2[0-3]):[0-5]\d:[0-5]\d$").expect("valid time regex"));

/// Opaque identifier of one attraction.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttractionId(String);

impl AttractionId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generates a fresh random id for records imported without one.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl Display for AttractionId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AttractionId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for AttractionId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// Category of an attraction.
///
/// The catalog is open-ended: values outside the four known categories are
/// kept in `Other` so they still render with a fallback label and tone.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AttractionType {
    Palestra,
    Workshop,
    Estande,
    Networking,
    Other(String),
}

/// Badge tone used by presentation to color an attraction type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BadgeTone {
    Primary,
    Secondary,
    Accent,
    Muted,
    /// Used for any type outside the known categories.
    Fallback,
}

impl AttractionType {
    /// Stable storage/wire value.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Palestra => "palestra",
            Self::Workshop => "workshop",
            Self::Estande => "estande",
            Self::Networking => "networking",
            Self::Other(value) => value.as_str(),
        }
    }

    /// Parses a wire value. Never fails; unknown values map to `Other`.
    pub fn parse(value: &str) -> Self {
        match value {
            "palestra" => Self::Palestra,
            "workshop" => Self::Workshop,
            "estande" => Self::Estande,
            "networking" => Self::Networking,
            other => Self::Other(other.to_string()),
        }
    }

    /// Human-facing label. Unknown types fall back to their raw value.
    pub fn label(&self) -> &str {
        match self {
            Self::Palestra => "Palestra",
            Self::Workshop => "Workshop",
            Self::Estande => "Estande",
            Self::Networking => "Networking",
            Self::Other(value) => value.as_str(),
        }
    }

    pub fn badge_tone(&self) -> BadgeTone {
        match self {
            Self::Palestra => BadgeTone::Primary,
            Self::Workshop => BadgeTone::Secondary,
            Self::Estande => BadgeTone::Accent,
            Self::Networking => BadgeTone::Muted,
            Self::Other(_) => BadgeTone::Fallback,
        }
    }
}

impl Display for AttractionType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<String> for AttractionType {
    fn from(value: String) -> Self {
        Self::parse(value.as_str())
    }
}

impl From<AttractionType> for String {
    fn from(value: AttractionType) -> Self {
        value.as_str().to_string()
    }
}

/// Canonical record for one scheduled conference item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attraction {
    pub id: AttractionId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub speaker: String,
    #[serde(default)]
    pub location: String,
    /// Serialized as `type` to match the hosted schema naming.
    #[serde(rename = "type")]
    pub kind: AttractionType,
    /// `YYYY-MM-DD`.
    pub event_date: String,
    /// `HH:MM:SS`.
    pub start_time: String,
    /// `HH:MM:SS`. Not checked against `start_time`.
    pub end_time: String,
}

impl Attraction {
    /// Validates identity and ISO date/time shapes.
    ///
    /// # Errors
    /// - Blank `id`.
    /// - `event_date` not shaped `YYYY-MM-DD`.
    /// - `start_time`/`end_time` not shaped `HH:MM:SS`.
    pub fn validate(&self) -> Result<(), AttractionValidationError> {
        if self.id.as_str().trim().is_empty() {
            return Err(AttractionValidationError::BlankId);
        }
        if !ISO_DATE_RE.is_match(&self.event_date) {
            return Err(AttractionValidationError::InvalidEventDate(
                self.event_date.clone(),
            ));
        }
        if !ISO_TIME_RE.is_match(&self.start_time) {
            return Err(AttractionValidationError::InvalidStartTime(
                self.start_time.clone(),
            ));
        }
        if !ISO_TIME_RE.is_match(&self.end_time) {
            return Err(AttractionValidationError::InvalidEndTime(
                self.end_time.clone(),
            ));
        }
        Ok(())
    }

    /// `HH:MM - HH:MM` time range shown on attraction cards.
    pub fn time_range_label(&self) -> String {
        format!(
            "{} - {}",
            format_time_of_day(&self.start_time),
            format_time_of_day(&self.end_time)
        )
    }
}

/// Trims an `HH:MM:SS` value to `HH:MM`. Shorter inputs are returned as-is.
pub fn format_time_of_day(value: &str) -> &str {
    value.get(..5).unwrap_or(value)
}

/// Validation errors for attraction records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttractionValidationError {
    BlankId,
    InvalidEventDate(String),
    InvalidStartTime(String),
    InvalidEndTime(String),
}

impl Display for AttractionValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankId => write!(f, "attraction id must not be blank"),
            Self::InvalidEventDate(value) => {
                write!(f, "event_date must be YYYY-MM-DD, got `{value}`")
            }
            Self::InvalidStartTime(value) => {
                write!(f, "start_time must be HH:MM:SS, got `{value}`")
            }
            Self::InvalidEndTime(value) => write!(f, "end_time must be HH:MM:SS, got `{value}`"),
        }
    }
}

impl Error for AttractionValidationError {}
