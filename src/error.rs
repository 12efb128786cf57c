//! Error handling for the fitportal client

use std::fmt;

use reqwest::StatusCode;
use thiserror::Error;

use crate::validation::ValidationErrors;

/// Unified error type for the fitportal client
#[derive(Error, Debug)]
pub enum Error {
    /// The backend could not be reached (connection refused, DNS, timeout)
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The backend answered with a non-2xx status
    #[error("HTTP error {status}: {body}")]
    Http { status: StatusCode, body: String },

    /// Client-side validation rejected the input; nothing was sent
    #[error("Validation failed: {0}")]
    Validation(ValidationErrors),

    /// The backend answered 2xx but reported failure in its body
    #[error("Rejected by server: {0}")]
    Rejected(String),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// Invalid client configuration
    #[error("Configuration error: {0}")]
    Config(String),

    /// The wizard is still submitting
    #[error("Another operation is still in progress")]
    Busy,

    /// The operation is not valid in the current state
    #[error("Invalid operation: {0}")]
    InvalidState(String),

    /// A record was not present in the local collection
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<ValidationErrors> for Error {
    fn from(errors: ValidationErrors) -> Self {
        Error::Validation(errors)
    }
}

impl Error {
    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }

    /// Create a new invalid-state error
    pub fn invalid_state<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidState(msg.to_string())
    }

    /// Create a new local not-found error
    pub fn not_found<T: fmt::Display>(msg: T) -> Self {
        Error::NotFound(msg.to_string())
    }

    /// HTTP status of the failed response, if the server answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// True when the server could not be reached
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_))
    }

    /// True when the request ran into the configured timeout
    pub fn is_timeout(&self) -> bool {
        matches!(self, Error::Network(e) if e.is_timeout())
    }

    /// Message suitable for a transient, dismissible notification
    pub fn user_message(&self) -> String {
        match self {
            Error::Network(_) => {
                "The server is offline. Please try again later.".to_string()
            }
            Error::Http { status, .. } => status_message(*status).to_string(),
            Error::Validation(errors) => errors.to_string(),
            Error::Rejected(msg) => msg.clone(),
            Error::Busy => "Please wait for the current operation to finish.".to_string(),
            Error::NotFound(_) => status_message(StatusCode::NOT_FOUND).to_string(),
            _ => "An unexpected error occurred.".to_string(),
        }
    }
}

/// Message for a non-2xx status. Statuses without a mapping share one
/// generic message.
pub fn status_message(status: StatusCode) -> &'static str {
    match status.as_u16() {
        401 => "Your session has expired. Please log in again.",
        403 => "This account has been disabled.",
        404 => "The requested resource was not found.",
        409 => "This record already exists.",
        500 => "The server encountered an error. Please try again later.",
        _ => "The request failed. Please try again.",
    }
}

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn http(status: u16) -> Error {
        Error::Http {
            status: StatusCode::from_u16(status).unwrap(),
            body: String::new(),
        }
    }

    #[test]
    fn test_status_messages_are_distinct() {
        let messages: Vec<String> = [401, 403, 404, 500]
            .iter()
            .map(|s| http(*s).user_message())
            .collect();

        for (i, a) in messages.iter().enumerate() {
            for b in messages.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_unauthorized_outside_login_means_expired_session() {
        assert_eq!(
            http(401).user_message(),
            "Your session has expired. Please log in again."
        );
    }

    #[test]
    fn test_unmapped_status_uses_generic_message() {
        assert_eq!(http(418).user_message(), http(502).user_message());
        assert_eq!(http(418).status(), StatusCode::from_u16(418).ok());
    }

    #[test]
    fn test_validation_message_lists_violations() {
        let mut errors = ValidationErrors::new();
        errors.add("email", "Email is required");
        errors.add("password", "Password is required");

        let err = Error::from(errors);
        assert_eq!(err.user_message(), "Email is required; Password is required");
        assert!(!err.is_network());
    }
}
