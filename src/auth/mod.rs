//! Authentication against the fitportal backend
//!
//! The session lives in an HTTP-only cookie owned by the backend. The client
//! only ever sees whether the session is valid and who the user is.

mod session;
mod types;

use log::{info, warn};
use reqwest::StatusCode;

use crate::error::{Error, Result};
use crate::fetch::ApiClient;

pub use session::*;
pub use types::*;

const SESSION_PATH: &str = "/api/session";
const LOGIN_PATH: &str = "/api/loginDB";
const LOGOUT_PATH: &str = "/api/logout";
const DB_STATUS_PATH: &str = "/api/db-status";

const INVALID_CREDENTIALS: &str = "Invalid username or password.";

/// Client for login, logout and session lookups
#[derive(Debug, Clone)]
pub struct Auth {
    api: ApiClient,
}

impl Auth {
    /// Create a new Auth client
    pub fn new(api: ApiClient) -> Self {
        Self { api }
    }

    /// Fetch the current session.
    ///
    /// A 401 or 403 means "not logged in" and is returned as an anonymous
    /// session rather than an error.
    pub async fn get_session(&self) -> Result<SessionInfo> {
        match self.api.get(SESSION_PATH).execute::<SessionInfo>().await {
            Ok(info) => Ok(info),
            Err(Error::Http { status, .. })
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN =>
            {
                Ok(SessionInfo::anonymous())
            }
            Err(e) => Err(e),
        }
    }

    /// Log in with a username and password.
    ///
    /// On success the backend sets the session cookie, which the shared
    /// cookie store replays on every later request.
    pub async fn login(&self, username: &str, password: &str) -> Result<LoginResponse> {
        let credentials = LoginCredentials {
            username: username.to_string(),
            password: password.to_string(),
        };

        let response = self
            .api
            .post(LOGIN_PATH)
            .json(&credentials)?
            .execute::<LoginResponse>()
            .await
            .map_err(|e| {
                warn!("login failed for {}: {}", username, e);
                e
            })?;

        if response.success == Some(false) {
            let msg = response
                .message
                .clone()
                .unwrap_or_else(|| INVALID_CREDENTIALS.to_string());
            return Err(Error::Rejected(msg));
        }

        info!("logged in as {}", username);
        Ok(response)
    }

    /// Ask the backend to drop the session cookie
    pub async fn logout(&self) -> Result<()> {
        self.api.post(LOGOUT_PATH).execute_empty().await
    }

    /// Check whether the backend can reach its database
    pub async fn db_status(&self) -> Result<DbStatus> {
        self.api.get(DB_STATUS_PATH).execute::<DbStatus>().await
    }
}

/// Message shown on the login form for a failed login attempt
pub fn login_error_message(err: &Error) -> String {
    match err.status().map(|s| s.as_u16()) {
        Some(401) => INVALID_CREDENTIALS.to_string(),
        Some(403) => "This account has been disabled. Please contact support.".to_string(),
        Some(404) => "No account exists with this username.".to_string(),
        Some(500) => "The server encountered an error. Please try again later.".to_string(),
        _ => err.user_message(),
    }
}
