use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};
use tracing::info;

use crate::features::auth::model::AuthenticatedUser;

#[derive(Debug)]
struct SessionState {
    token: String,
    user: AuthenticatedUser,
}

/// Signed-in admin identity shared by the console's API clients.
///
/// Started once after login and ended once on logout; clones observe the
/// same session, so ending it revokes the bearer token everywhere.
#[derive(Debug, Clone, Default)]
pub struct AdminSession {
    state: Arc<RwLock<Option<SessionState>>>,
}

impl AdminSession {
    pub fn start(token: impl Into<String>, user: AuthenticatedUser) -> Self {
        info!("Admin session started for {}", user.user_id);
        Self {
            state: Arc::new(RwLock::new(Some(SessionState {
                token: token.into(),
                user,
            }))),
        }
    }

    /// Session without credentials, as used by the storefront
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn end(&self) {
        let mut state = self.state.write().unwrap_or_else(PoisonError::into_inner);
        if let Some(ended) = state.take() {
            info!("Admin session ended for {}", ended.user.user_id);
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Option<SessionState>> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn is_active(&self) -> bool {
        self.read().is_some()
    }

    pub fn bearer_token(&self) -> Option<String> {
        self.read().as_ref().map(|s| s.token.clone())
    }

    pub fn user(&self) -> Option<AuthenticatedUser> {
        self.read().as_ref().map(|s| s.user.clone())
    }

    pub fn is_admin(&self) -> bool {
        self.read().as_ref().is_some_and(|s| s.user.is_admin())
    }
}
