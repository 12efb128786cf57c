//! Last-resort recovery for pages that failed to render

use log::error;

/// Consecutive failures after which contacting support is offered
pub const DEFAULT_SUPPORT_THRESHOLD: u32 = 3;

/// What the fallback screen offers the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecoveryAction {
    Retry,
    GoHome,
    ContactSupport,
}

/// Counts consecutive page failures and decides which recovery actions to offer.
///
/// Request errors never reach this; they are handled where the request was
/// issued. This only sees unexpected failures of a whole page.
#[derive(Debug, Clone)]
pub struct ErrorBoundary {
    consecutive_failures: u32,
    support_threshold: u32,
    last_error: Option<String>,
}

impl Default for ErrorBoundary {
    fn default() -> Self {
        Self::new(DEFAULT_SUPPORT_THRESHOLD)
    }
}

impl ErrorBoundary {
    pub fn new(support_threshold: u32) -> Self {
        Self {
            consecutive_failures: 0,
            support_threshold: support_threshold.max(1),
            last_error: None,
        }
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.consecutive_failures
    }

    pub fn has_failed(&self) -> bool {
        self.consecutive_failures > 0
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Record a failure and return the actions to offer
    pub fn record_failure<E: std::fmt::Display>(&mut self, err: &E) -> Vec<RecoveryAction> {
        self.consecutive_failures = self.consecutive_failures.saturating_add(1);
        self.last_error = Some(err.to_string());
        error!(
            "page failed ({} in a row): {}",
            self.consecutive_failures, err
        );
        self.actions()
    }

    /// A successful render clears the streak
    pub fn record_success(&mut self) {
        self.consecutive_failures = 0;
        self.last_error = None;
    }

    /// Actions for the current streak; empty when nothing has failed
    pub fn actions(&self) -> Vec<RecoveryAction> {
        if self.consecutive_failures == 0 {
            return Vec::new();
        }
        let mut actions = vec![RecoveryAction::Retry, RecoveryAction::GoHome];
        if self.consecutive_failures >= self.support_threshold {
            actions.push(RecoveryAction::ContactSupport);
        }
        actions
    }
}
