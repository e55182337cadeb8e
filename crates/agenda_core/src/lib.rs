//! Core logic for the conference agenda.
//! Derives the Browse and Agenda views and owns membership toggling; storage
//! and identity are collaborators behind explicit interfaces.

pub mod config;
pub mod db;
pub mod logging;
pub mod model;
pub mod notify;
pub mod repo;
pub mod service;
pub mod view;

pub use config::{AgendaConfig, ConfigError};
pub use logging::{
    default_log_level, init_logging, init_logging_from_config, logging_status, LoggingError,
};
pub use model::attraction::{
    format_time_of_day, Attraction, AttractionId, AttractionType, AttractionValidationError,
    BadgeTone,
};
pub use model::membership::{AgendaEntry, Membership, UserId};
pub use model::user::UserContext;
pub use notify::{LogNotifier, Notification, Notifier, RecordingNotifier, Severity};
pub use repo::attraction_repo::{
    AttractionRepository, RepoError, RepoResult, SqliteAttractionRepository,
};
pub use service::catalog_service::{CatalogService, FetchError};
pub use service::membership_service::{
    MembershipService, ToggleAction, ToggleError, ToggleOutcome,
};
pub use view::agenda::{
    derive_agenda_view, group_by_date, join_agenda_entries, sort_agenda_entries, AgendaGroup,
    AgendaView,
};
pub use view::browse::{browse_filter, derive_browse_view, BrowseItem, BrowseQuery, TypeFilter};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::{core_version, ping};

    #[test]
    fn ping_returns_pong() {
        assert_eq!(ping(), "pong");
    }

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
