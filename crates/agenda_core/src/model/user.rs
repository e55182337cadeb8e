//! Authenticated user context supplied by the auth collaborator.

use crate::model::membership::UserId;

/// Identity of the signed-in user.
///
/// Core entry points take `Option<&UserContext>`; `None` means no session,
/// and user-scoped operations are skipped without error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    pub user_id: UserId,
    pub display_name: Option<String>,
    pub email: Option<String>,
}

impl UserContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: UserId::new(user_id),
            display_name: None,
            email: None,
        }
    }
}
