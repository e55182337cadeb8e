//! Membership toggle use-case service.
//!
//! # Responsibility
//! - Add/remove one attraction to/from the current user's agenda.
//! - Keep the local membership set a truthful projection of persisted state.
//! - Enforce single-flight per attraction id.
//!
//! # Invariants
//! - The membership set changes only after the repository confirms a write.
//! - At most one toggle per attraction id is outstanding; a second request
//!   is rejected with `ToggleError::InFlight` before any repository call.
//! - The in-flight mark is released on every exit path.
//! - The state lock is never held across a repository call, so toggles for
//!   different ids proceed independently.
//! - A sync never discards a toggle that committed while it was reading; such
//!   toggles are replayed over the fetched snapshot.

use crate::model::attraction::AttractionId;
use crate::model::user::UserContext;
use crate::notify::{copy, Notification, Notifier};
use crate::repo::attraction_repo::{AttractionRepository, RepoError};
use crate::service::catalog_service::FetchError;
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Instant;

/// Direction of a membership change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleAction {
    Add,
    Remove,
}

impl ToggleAction {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Remove => "remove",
        }
    }
}

/// Result of a toggle request that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// Membership was created and the id is now present.
    Added,
    /// Membership was deleted and the id is now absent.
    Removed,
    /// The id was already in the requested state; nothing was sent.
    Unchanged,
    /// No user is signed in; nothing was sent.
    Skipped,
}

/// Toggle failure surfaced to the caller.
#[derive(Debug)]
pub enum ToggleError {
    /// Another toggle for the same id has not resolved yet.
    InFlight(AttractionId),
    /// The repository rejected the write; local state is unchanged.
    Repository {
        action: ToggleAction,
        attraction_id: AttractionId,
        source: RepoError,
    },
}

impl Display for ToggleError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InFlight(id) => write!(f, "toggle already in flight for attraction {id}"),
            Self::Repository {
                action,
                attraction_id,
                source,
            } => write!(
                f,
                "membership {} failed for attraction {attraction_id}: {source}",
                action.as_str()
            ),
        }
    }
}

impl Error for ToggleError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InFlight(_) => None,
            Self::Repository { source, .. } => Some(source),
        }
    }
}

#[derive(Debug, Default)]
struct MembershipState {
    members: HashSet<AttractionId>,
    pending: HashSet<AttractionId>,
    /// Bumped on every committed toggle.
    generation: u64,
    /// Syncs currently reading from the repository.
    syncs_in_flight: usize,
    /// Toggles committed while a sync was reading, tagged with their generation.
    committed: Vec<(u64, AttractionId, ToggleAction)>,
}

impl MembershipState {
    fn commit(&mut self, action: ToggleAction, attraction_id: &AttractionId) {
        self.generation += 1;
        self.apply(action, attraction_id);
        if self.syncs_in_flight > 0 {
            self.committed
                .push((self.generation, attraction_id.clone(), action));
        }
    }

    fn apply(&mut self, action: ToggleAction, attraction_id: &AttractionId) {
        match action {
            ToggleAction::Add => {
                self.members.insert(attraction_id.clone());
            }
            ToggleAction::Remove => {
                self.members.remove(attraction_id);
            }
        }
    }

    fn begin_sync(&mut self) -> u64 {
        self.syncs_in_flight += 1;
        self.generation
    }

    /// Ends one sync; returns the toggles committed since `started_at`.
    fn end_sync(&mut self, started_at: u64) -> Vec<(AttractionId, ToggleAction)> {
        self.syncs_in_flight -= 1;
        let replay = self
            .committed
            .iter()
            .filter(|(generation, _, _)| *generation > started_at)
            .map(|(_, id, action)| (id.clone(), *action))
            .collect();
        if self.syncs_in_flight == 0 {
            self.committed.clear();
        }
        replay
    }
}

/// Clears one pending mark when dropped.
struct PendingGuard<'a> {
    state: &'a Mutex<MembershipState>,
    id: AttractionId,
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .pending
            .remove(&self.id);
    }
}

/// Owns the current user's membership set and in-flight toggles.
pub struct MembershipService<R: AttractionRepository> {
    repo: R,
    state: Mutex<MembershipState>,
}

impl<R: AttractionRepository> MembershipService<R> {
    /// Creates a service with an empty membership set.
    pub fn new(repo: R) -> Self {
        Self::with_memberships(repo, [])
    }

    /// Creates a service seeded with already-known membership ids.
    pub fn with_memberships(repo: R, ids: impl IntoIterator<Item = AttractionId>) -> Self {
        Self {
            repo,
            state: Mutex::new(MembershipState {
                members: ids.into_iter().collect(),
                ..MembershipState::default()
            }),
        }
    }

    /// Replaces the membership set with the user's persisted memberships.
    ///
    /// Returns the size of the resulting set, or `Ok(None)` when no user is
    /// signed in. Pending toggles are left untouched, and toggles that commit
    /// while the repository read is outstanding are replayed on top of it.
    pub fn sync_memberships(
        &self,
        user: Option<&UserContext>,
        notifier: &dyn Notifier,
    ) -> Result<Option<usize>, FetchError> {
        let Some(user) = user else {
            debug!("event=membership_sync module=service status=skipped reason=unauthenticated");
            return Ok(None);
        };

        let started_at = Instant::now();
        let generation = self.lock_state().begin_sync();
        let listed = self.repo.list_memberships(&user.user_id);

        let mut state = self.lock_state();
        let replay = state.end_sync(generation);
        let memberships = match listed {
            Ok(memberships) => memberships,
            Err(err) => {
                drop(state);
                error!(
                    "event=membership_sync module=service status=error duration_ms={} error={}",
                    started_at.elapsed().as_millis(),
                    err
                );
                notifier.notify(Notification::error(
                    copy::MEMBERSHIPS_FAILED_TITLE,
                    copy::MEMBERSHIPS_FAILED_MESSAGE,
                ));
                return Err(FetchError::Memberships(err));
            }
        };

        state.members = memberships
            .into_iter()
            .map(|membership| membership.attraction_id)
            .collect();
        for (attraction_id, action) in &replay {
            state.apply(*action, attraction_id);
        }
        let count = state.members.len();
        drop(state);

        info!(
            "event=membership_sync module=service status=ok count={} replayed={} duration_ms={}",
            count,
            replay.len(),
            started_at.elapsed().as_millis()
        );
        Ok(Some(count))
    }

    /// Adds when absent, removes when present.
    pub fn toggle(
        &self,
        user: Option<&UserContext>,
        attraction_id: &AttractionId,
        notifier: &dyn Notifier,
    ) -> Result<ToggleOutcome, ToggleError> {
        self.run(user, attraction_id, None, notifier)
    }

    /// Absent -> Present. Already-present ids are `Unchanged`.
    pub fn add(
        &self,
        user: Option<&UserContext>,
        attraction_id: &AttractionId,
        notifier: &dyn Notifier,
    ) -> Result<ToggleOutcome, ToggleError> {
        self.run(user, attraction_id, Some(ToggleAction::Add), notifier)
    }

    /// Present -> Absent. Already-absent ids are `Unchanged`.
    pub fn remove(
        &self,
        user: Option<&UserContext>,
        attraction_id: &AttractionId,
        notifier: &dyn Notifier,
    ) -> Result<ToggleOutcome, ToggleError> {
        self.run(user, attraction_id, Some(ToggleAction::Remove), notifier)
    }

    pub fn is_member(&self, attraction_id: &AttractionId) -> bool {
        self.lock_state().members.contains(attraction_id)
    }

    /// Whether a toggle for `attraction_id` is outstanding.
    pub fn is_pending(&self, attraction_id: &AttractionId) -> bool {
        self.lock_state().pending.contains(attraction_id)
    }

    /// Snapshot of the membership set.
    pub fn membership_ids(&self) -> HashSet<AttractionId> {
        self.lock_state().members.clone()
    }

    /// Snapshot of ids with an outstanding toggle.
    pub fn pending_ids(&self) -> HashSet<AttractionId> {
        self.lock_state().pending.clone()
    }

    fn run(
        &self,
        user: Option<&UserContext>,
        attraction_id: &AttractionId,
        requested: Option<ToggleAction>,
        notifier: &dyn Notifier,
    ) -> Result<ToggleOutcome, ToggleError> {
        let Some(user) = user else {
            debug!("event=membership_toggle module=service status=skipped reason=unauthenticated");
            return Ok(ToggleOutcome::Skipped);
        };

        let (action, pending) = {
            let mut state = self.lock_state();
            if state.pending.contains(attraction_id) {
                warn!(
                    "event=membership_toggle module=service status=rejected reason=in_flight attraction_id={}",
                    attraction_id
                );
                return Err(ToggleError::InFlight(attraction_id.clone()));
            }

            let present = state.members.contains(attraction_id);
            let action = match (requested, present) {
                (Some(ToggleAction::Add), true) | (Some(ToggleAction::Remove), false) => {
                    return Ok(ToggleOutcome::Unchanged);
                }
                (Some(action), _) => action,
                (None, true) => ToggleAction::Remove,
                (None, false) => ToggleAction::Add,
            };

            state.pending.insert(attraction_id.clone());
            let guard = PendingGuard {
                state: &self.state,
                id: attraction_id.clone(),
            };
            (action, guard)
        };

        let started_at = Instant::now();
        let written = match action {
            ToggleAction::Add => self.repo.create_membership(&user.user_id, attraction_id),
            ToggleAction::Remove => self.repo.delete_membership(&user.user_id, attraction_id),
        };

        let outcome = written.map(|()| {
            self.lock_state().commit(action, attraction_id);
            match action {
                ToggleAction::Add => ToggleOutcome::Added,
                ToggleAction::Remove => ToggleOutcome::Removed,
            }
        });
        drop(pending);

        match outcome {
            Ok(outcome) => {
                info!(
                    "event=membership_toggle module=service status=ok action={} attraction_id={} duration_ms={}",
                    action.as_str(),
                    attraction_id,
                    started_at.elapsed().as_millis()
                );
                notifier.notify(match action {
                    ToggleAction::Add => Notification::info(copy::ADDED_TITLE, copy::ADDED_MESSAGE),
                    ToggleAction::Remove => {
                        Notification::info(copy::REMOVED_TITLE, copy::REMOVED_MESSAGE)
                    }
                });
                Ok(outcome)
            }
            Err(err) => {
                error!(
                    "event=membership_toggle module=service status=error action={} attraction_id={} duration_ms={} error={}",
                    action.as_str(),
                    attraction_id,
                    started_at.elapsed().as_millis(),
                    err
                );
                notifier.notify(Notification::error(
                    copy::TOGGLE_FAILED_TITLE,
                    copy::TOGGLE_FAILED_MESSAGE,
                ));
                Err(ToggleError::Repository {
                    action,
                    attraction_id: attraction_id.clone(),
                    source: err,
                })
            }
        }
    }

    fn lock_state(&self) -> MutexGuard<'_, MembershipState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
