//! Process-wide session context shared by every dashboard page

use std::sync::Arc;

use log::debug;
use tokio::sync::Mutex;

use super::{Auth, SessionInfo};
use crate::error::Result;

/// Cached view of the backend session.
///
/// Pages receive a clone of this instead of fetching `/api/session`
/// themselves; the first `ensure()` fetches and every later call reuses the
/// cached answer until `refresh()`, `login()` or `logout()`.
#[derive(Debug, Clone)]
pub struct SessionContext {
    auth: Auth,
    current: Arc<Mutex<Option<SessionInfo>>>,
}

impl SessionContext {
    pub fn new(auth: Auth) -> Self {
        Self {
            auth,
            current: Arc::new(Mutex::new(None)),
        }
    }

    /// The auth client behind this context
    pub fn auth(&self) -> &Auth {
        &self.auth
    }

    /// Return the cached session, fetching it once if needed.
    ///
    /// Concurrent callers wait on the same fetch instead of issuing their own.
    pub async fn ensure(&self) -> Result<SessionInfo> {
        let mut current = self.current.lock().await;
        if let Some(info) = current.as_ref() {
            return Ok(info.clone());
        }

        debug!("fetching session");
        let info = self.auth.get_session().await?;
        *current = Some(info.clone());
        Ok(info)
    }

    /// Drop the cached session and fetch it again
    pub async fn refresh(&self) -> Result<SessionInfo> {
        self.clear().await;
        self.ensure().await
    }

    /// Forget the cached session without contacting the backend
    pub async fn clear(&self) {
        *self.current.lock().await = None;
    }

    /// The cached session, if one has been fetched
    pub async fn cached(&self) -> Option<SessionInfo> {
        self.current.lock().await.clone()
    }

    pub async fn is_authenticated(&self) -> Result<bool> {
        Ok(self.ensure().await?.valid)
    }

    pub async fn display_name(&self) -> Result<Option<String>> {
        Ok(self.ensure().await?.display_name())
    }

    /// Log in and replace the cached session with the fresh one
    pub async fn login(&self, username: &str, password: &str) -> Result<SessionInfo> {
        self.auth.login(username, password).await?;
        self.refresh().await
    }

    /// Log out and mark the cached session anonymous
    pub async fn logout(&self) -> Result<()> {
        self.auth.logout().await?;
        *self.current.lock().await = Some(SessionInfo::anonymous());
        Ok(())
    }
}
