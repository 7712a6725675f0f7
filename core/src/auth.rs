//! The authentication provider the session holder talks to.

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::client::BackendClient;
use crate::error::ApiError;
use crate::http::HttpTransport;
use crate::types::UserHandle;

/// Anonymous-login capable auth provider.
///
/// `has_active_session` and `current_user` answer from locally cached session
/// data and never hit the network.
#[async_trait]
pub trait AuthProvider: Send + Sync {
    fn has_active_session(&self) -> bool;

    fn current_user(&self) -> Option<UserHandle>;

    async fn login_anonymous(&self) -> Result<UserHandle, ApiError>;

    async fn logout_user(&self, user: &UserHandle) -> Result<UserHandle, ApiError>;
}

/// `AuthProvider` backed by the HTTP backend. Caches the logged-in user so
/// the synchronous session queries can be answered locally.
#[derive(Debug)]
pub struct RemoteAuth<T> {
    client: BackendClient,
    transport: T,
    session: RwLock<Option<UserHandle>>,
}

impl<T: HttpTransport> RemoteAuth<T> {
    pub fn new(client: BackendClient, transport: T) -> Self {
        Self {
            client,
            transport,
            session: RwLock::new(None),
        }
    }

    /// Start with a previously persisted session.
    pub fn with_session(client: BackendClient, transport: T, user: UserHandle) -> Self {
        Self {
            client,
            transport,
            session: RwLock::new(Some(user)),
        }
    }
}

#[async_trait]
impl<T: HttpTransport> AuthProvider for RemoteAuth<T> {
    fn has_active_session(&self) -> bool {
        self.session.read().is_some()
    }

    fn current_user(&self) -> Option<UserHandle> {
        self.session.read().clone()
    }

    async fn login_anonymous(&self) -> Result<UserHandle, ApiError> {
        let request = self.client.build_login_anonymous();
        let response = self.transport.execute(request).await?;
        let user = self.client.parse_login_anonymous(response)?;
        *self.session.write() = Some(user.clone());
        tracing::debug!(user_id = %user.id, "anonymous session started");
        Ok(user)
    }

    async fn logout_user(&self, user: &UserHandle) -> Result<UserHandle, ApiError> {
        let request = self.client.build_logout(user)?;
        let response = self.transport.execute(request).await?;
        let logged_out = self.client.parse_logout(response)?;
        {
            let mut session = self.session.write();
            if session.as_ref() == Some(&logged_out) {
                *session = None;
            }
        }
        tracing::debug!(user_id = %logged_out.id, "session ended");
        Ok(logged_out)
    }
}
