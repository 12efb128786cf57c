//! fitportal client library
//!
//! A Rust client for the fitportal trainer dashboard backend: session and
//! login, the registration wizard, progress tracking (measurements and goals),
//! notifications, and the plan catalog with checkout.

pub mod auth;
pub mod billing;
pub mod boundary;
pub mod config;
pub mod error;
pub mod fetch;
pub mod progress;
pub mod resource;
pub mod validation;
pub mod wizard;

use crate::auth::{Auth, SessionContext};
use crate::billing::Billing;
use crate::config::ClientOptions;
use crate::error::Result;
use crate::fetch::ApiClient;
use crate::resource::{Goal, Measurement, Notification, ResourceManager};
use crate::wizard::{RegistrationDraft, Wizard};

/// The main entry point for the fitportal client
#[derive(Debug, Clone)]
pub struct FitPortal {
    /// HTTP client shared by every feature
    api: ApiClient,
    /// Session shared by every page
    session: SessionContext,
    /// Client options
    options: ClientOptions,
}

impl FitPortal {
    /// Create a new client for a backend origin
    ///
    /// # Example
    ///
    /// ```
    /// use fitportal::FitPortal;
    ///
    /// let portal = FitPortal::new("https://api.example.com").unwrap();
    /// ```
    pub fn new(base_url: &str) -> Result<Self> {
        Self::new_with_options(ClientOptions::default().with_base_url(base_url))
    }

    /// Create a new client with custom options
    ///
    /// # Example
    ///
    /// ```
    /// use std::time::Duration;
    /// use fitportal::{FitPortal, config::ClientOptions};
    ///
    /// let options = ClientOptions::default()
    ///     .with_base_url("https://api.example.com")
    ///     .with_request_timeout(Some(Duration::from_secs(5)));
    /// let portal = FitPortal::new_with_options(options).unwrap();
    /// ```
    pub fn new_with_options(options: ClientOptions) -> Result<Self> {
        let api = ApiClient::new(&options)?;
        let session = SessionContext::new(Auth::new(api.clone()));

        Ok(Self {
            api,
            session,
            options,
        })
    }

    /// Create a client configured from `FITPORTAL_*` environment variables
    pub fn from_env() -> Result<Self> {
        Self::new_with_options(ClientOptions::from_env()?)
    }

    pub fn options(&self) -> &ClientOptions {
        &self.options
    }

    /// The shared HTTP client
    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    /// Session context to hand to every page
    pub fn session(&self) -> SessionContext {
        self.session.clone()
    }

    /// Login, logout and backend status
    pub fn auth(&self) -> &Auth {
        self.session.auth()
    }

    /// A fresh registration wizard at step 1
    pub fn registration(&self) -> Wizard<RegistrationDraft> {
        Wizard::default()
    }

    /// Manager for the measurements page
    pub fn measurements(&self) -> ResourceManager<Measurement> {
        ResourceManager::new(self.api.clone())
    }

    /// Manager for the goals page
    pub fn goals(&self) -> ResourceManager<Goal> {
        ResourceManager::new(self.api.clone())
    }

    /// Manager for the notifications page
    pub fn notifications(&self) -> ResourceManager<Notification> {
        ResourceManager::new(self.api.clone())
    }

    /// Plans, checkout and purchase history
    pub fn billing(&self) -> Billing {
        Billing::new(self.api.clone())
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::auth::{SessionContext, SessionInfo};
    pub use crate::config::ClientOptions;
    pub use crate::error::{Error, Result};
    pub use crate::resource::{
        Confirmation, Goal, GoalInput, GoalPatch, Measurement, MeasurementInput, MeasurementType,
        RecordId, ResourceManager,
    };
    pub use crate::wizard::{RegistrationDraft, Wizard, WizardState};
    pub use crate::FitPortal;
}
