//! Catalog fetch use-cases.
//!
//! # Responsibility
//! - Load the attraction catalog and a user's agenda from the repository.
//! - Convert repository failures into logged, user-visible notifications.
//!
//! # Invariants
//! - Every call completes with data or a `FetchError`; the caller's loading
//!   state can always be cleared.
//! - User-scoped fetches without a user context are skipped (`Ok(None)`),
//!   with no repository call and no notification.

use crate::model::attraction::Attraction;
use crate::model::user::UserContext;
use crate::notify::{copy, Notification, Notifier};
use crate::repo::attraction_repo::{AttractionRepository, RepoError};
use crate::view::agenda::{derive_agenda_view, AgendaView};
use log::{debug, error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Failure while listing catalog or agenda data.
#[derive(Debug)]
pub enum FetchError {
    Attractions(RepoError),
    Memberships(RepoError),
    Agenda(RepoError),
}

impl FetchError {
    pub fn repo_error(&self) -> &RepoError {
        match self {
            Self::Attractions(err) | Self::Memberships(err) | Self::Agenda(err) => err,
        }
    }
}

impl Display for FetchError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Attractions(err) => write!(f, "failed to list attractions: {err}"),
            Self::Memberships(err) => write!(f, "failed to list memberships: {err}"),
            Self::Agenda(err) => write!(f, "failed to list agenda entries: {err}"),
        }
    }
}

impl Error for FetchError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.repo_error())
    }
}

/// Read-side service over the attraction repository.
pub struct CatalogService<R: AttractionRepository> {
    repo: R,
}

impl<R: AttractionRepository> CatalogService<R> {
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists the catalog in `(event_date, start_time)` order.
    ///
    /// On failure the error is logged and one error notification is sent.
    pub fn fetch_attractions(&self, notifier: &dyn Notifier) -> Result<Vec<Attraction>, FetchError> {
        let started_at = Instant::now();
        match self.repo.list_attractions() {
            Ok(attractions) => {
                info!(
                    "event=catalog_fetch module=service status=ok count={} duration_ms={}",
                    attractions.len(),
                    started_at.elapsed().as_millis()
                );
                Ok(attractions)
            }
            Err(err) => {
                error!(
                    "event=catalog_fetch module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                notifier.notify(Notification::error(
                    copy::ATTRACTIONS_FAILED_TITLE,
                    copy::ATTRACTIONS_FAILED_MESSAGE,
                ));
                Err(FetchError::Attractions(err))
            }
        }
    }

    /// Loads the user's agenda and derives the date-grouped view.
    ///
    /// Returns `Ok(None)` when no user is signed in.
    pub fn fetch_agenda(
        &self,
        user: Option<&UserContext>,
        notifier: &dyn Notifier,
    ) -> Result<Option<AgendaView>, FetchError> {
        let Some(user) = user else {
            debug!("event=agenda_fetch module=service status=skipped reason=unauthenticated");
            return Ok(None);
        };

        let started_at = Instant::now();
        match self.repo.list_agenda_entries(&user.user_id) {
            Ok(entries) => {
                let view = derive_agenda_view(entries);
                info!(
                    "event=agenda_fetch module=service status=ok groups={} entries={} duration_ms={}",
                    view.groups().len(),
                    view.entry_count(),
                    started_at.elapsed().as_millis()
                );
                Ok(Some(view))
            }
            Err(err) => {
                error!(
                    "event=agenda_fetch module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                notifier.notify(Notification::error(
                    copy::AGENDA_FAILED_TITLE,
                    copy::AGENDA_FAILED_MESSAGE,
                ));
                Err(FetchError::Agenda(err))
            }
        }
    }
}
