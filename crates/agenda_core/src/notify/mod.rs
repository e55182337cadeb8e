//! User-facing notification channel.
//!
//! # Responsibility
//! - Define the `(title, message, severity)` notification triple.
//! - Provide collaborator implementations for logging and in-memory capture.
//!
//! # Invariants
//! - Services pass the notifier explicitly; there is no ambient channel.
//! - Notification copy is presentation text and never carries user input.

use log::{info, warn};
use std::sync::{Mutex, PoisonError};

/// Severity of a user-facing notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Error,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

/// One user-facing message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub title: String,
    pub message: String,
    pub severity: Severity,
}

impl Notification {
    pub fn info(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity: Severity::Info,
        }
    }

    pub fn error(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
            severity: Severity::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}

/// Receiver of user-facing notifications.
pub trait Notifier {
    fn notify(&self, notification: Notification);
}

impl<N: Notifier + ?Sized> Notifier for &N {
    fn notify(&self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Writes notifications to the core log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, notification: Notification) {
        match notification.severity {
            Severity::Info => info!(
                "event=notify module=notify status=ok severity={} title={}",
                notification.severity.as_str(),
                notification.title
            ),
            Severity::Error => warn!(
                "event=notify module=notify status=error severity={} title={}",
                notification.severity.as_str(),
                notification.title
            ),
        }
    }
}

/// Collects notifications in memory, in delivery order.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    received: Mutex<Vec<Notification>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of everything received so far.
    pub fn notifications(&self) -> Vec<Notification> {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn error_count(&self) -> usize {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|notification| notification.is_error())
            .count()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, notification: Notification) {
        self.received
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(notification);
    }
}

/// Notification copy used by core services.
pub mod copy {
    pub const ADDED_TITLE: &str = "Added to agenda";
    pub const ADDED_MESSAGE: &str = "The attraction was added to your personal agenda.";
    pub const REMOVED_TITLE: &str = "Removed from agenda";
    pub const REMOVED_MESSAGE: &str = "The attraction was removed from your personal agenda.";
    pub const TOGGLE_FAILED_TITLE: &str = "Could not update agenda";
    pub const TOGGLE_FAILED_MESSAGE: &str = "Your agenda could not be updated. Please try again.";
    pub const ATTRACTIONS_FAILED_TITLE: &str = "Could not load attractions";
    pub const ATTRACTIONS_FAILED_MESSAGE: &str = "The event attractions could not be loaded.";
    pub const MEMBERSHIPS_FAILED_TITLE: &str = "Could not load agenda state";
    pub const MEMBERSHIPS_FAILED_MESSAGE: &str =
        "Your saved attractions could not be loaded.";
    pub const AGENDA_FAILED_TITLE: &str = "Could not load agenda";
    pub const AGENDA_FAILED_MESSAGE: &str = "Your personal agenda could not be loaded.";
}
