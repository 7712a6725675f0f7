//! Auth state holder.
//!
//! # Design
//! The holder is constructed once per process and handed to whoever needs
//! session information (typically as `Arc<AuthStateHolder<_>>`). It owns no
//! todo data. State only changes after the provider call succeeded; a failed
//! login or logout leaves it exactly as it was.

use std::sync::atomic::{AtomicBool, Ordering};

use parking_lot::RwLock;

use crate::auth::AuthProvider;
use crate::error::ApiError;
use crate::types::UserHandle;

/// Snapshot of the current session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AuthState {
    pub is_logged_in: bool,
    pub current_user: Option<UserHandle>,
}

pub struct AuthStateHolder<A> {
    provider: A,
    state: RwLock<AuthState>,
    initialized: AtomicBool,
}

impl<A: AuthProvider> AuthStateHolder<A> {
    pub fn new(provider: A) -> Self {
        Self {
            provider,
            state: RwLock::new(AuthState::default()),
            initialized: AtomicBool::new(false),
        }
    }

    /// Seed the state from the provider's cached session. Only the first call
    /// has any effect.
    pub fn initialize(&self) -> AuthState {
        if self.initialized.swap(true, Ordering::AcqRel) {
            tracing::debug!("auth state already initialized");
            return self.state();
        }
        let state = AuthState {
            is_logged_in: self.provider.has_active_session(),
            current_user: self.provider.current_user(),
        };
        tracing::debug!(is_logged_in = state.is_logged_in, "auth state initialized");
        *self.state.write() = state.clone();
        state
    }

    /// Log in anonymously unless a session already exists, in which case the
    /// current user is returned without contacting the provider.
    pub async fn login(&self) -> Result<UserHandle, ApiError> {
        let existing = {
            let state = self.state.read();
            if state.is_logged_in {
                state.current_user.clone()
            } else {
                None
            }
        };
        if let Some(user) = existing {
            tracing::debug!(user_id = %user.id, "already logged in");
            return Ok(user);
        }

        let user = self.provider.login_anonymous().await?;
        let mut state = self.state.write();
        // An overlapping login may have finished first; its user stays current.
        if let (true, Some(current)) = (state.is_logged_in, &state.current_user) {
            tracing::warn!(
                user_id = %current.id,
                discarded = %user.id,
                "overlapping login, keeping existing user"
            );
            return Ok(current.clone());
        }
        tracing::info!(user_id = %user.id, "logged in");
        *state = AuthState {
            is_logged_in: true,
            current_user: Some(user.clone()),
        };
        Ok(user)
    }

    /// Log out the current user. Returns `Ok(None)` without a remote call
    /// when nobody is logged in.
    pub async fn logout(&self) -> Result<Option<UserHandle>, ApiError> {
        let current = {
            let state = self.state.read();
            if state.is_logged_in {
                state.current_user.clone()
            } else {
                None
            }
        };
        let Some(user) = current else {
            tracing::warn!("can't log out when no user is logged in");
            return Ok(None);
        };

        let logged_out = self.provider.logout_user(&user).await?;
        tracing::info!(user_id = %logged_out.id, "logged out");
        *self.state.write() = AuthState::default();
        Ok(Some(logged_out))
    }

    pub fn state(&self) -> AuthState {
        self.state.read().clone()
    }

    pub fn is_logged_in(&self) -> bool {
        self.state.read().is_logged_in
    }

    pub fn current_user(&self) -> Option<UserHandle> {
        self.state.read().current_user.clone()
    }

    pub fn provider(&self) -> &A {
        &self.provider
    }
}
