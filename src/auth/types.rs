//! Types for authentication and session state

use serde::{Deserialize, Serialize};

/// Response of `GET /api/session`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionInfo {
    /// Whether the session cookie is valid
    #[serde(default)]
    pub valid: bool,

    /// The logged-in user, if any
    #[serde(default)]
    pub user: Option<SessionUser>,

    /// Opaque token returned alongside the session
    #[serde(default)]
    pub token: Option<String>,
}

impl SessionInfo {
    /// A session that is known not to be authenticated
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Name to greet the user with
    pub fn display_name(&self) -> Option<String> {
        if !self.valid {
            return None;
        }
        self.user.as_ref().and_then(SessionUser::display_name)
    }
}

/// The user part of a session. Older endpoints return a bare name, newer
/// ones a profile object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SessionUser {
    Name(String),
    Profile(UserProfile),
}

impl SessionUser {
    pub fn display_name(&self) -> Option<String> {
        match self {
            SessionUser::Name(name) if !name.trim().is_empty() => Some(name.trim().to_string()),
            SessionUser::Name(_) => None,
            SessionUser::Profile(profile) => profile.display_name(),
        }
    }
}

/// Profile fields the client reads from a session user
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    #[serde(default)]
    pub username: Option<String>,

    #[serde(default, alias = "firstName")]
    pub first_name: Option<String>,

    #[serde(default, alias = "lastName")]
    pub last_name: Option<String>,
}

impl UserProfile {
    /// "First Last" when a first name is known, else the username
    pub fn display_name(&self) -> Option<String> {
        let first = self.first_name.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let last = self.last_name.as_deref().map(str::trim).filter(|s| !s.is_empty());

        match (first, last) {
            (Some(first), Some(last)) => Some(format!("{} {}", first, last)),
            (Some(first), None) => Some(first.to_string()),
            _ => self
                .username
                .as_deref()
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
        }
    }
}

/// Body of `POST /api/loginDB`
#[derive(Debug, Clone, Serialize)]
pub struct LoginCredentials {
    pub username: String,
    pub password: String,
}

/// Response of `POST /api/loginDB`. The session itself travels in a cookie.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub success: Option<bool>,

    #[serde(default)]
    pub user: Option<SessionUser>,

    #[serde(default)]
    pub message: Option<String>,
}

/// Response of `GET /api/db-status`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DbStatus {
    pub status: String,
}

impl DbStatus {
    pub fn is_connected(&self) -> bool {
        self.status == "connected"
    }
}
