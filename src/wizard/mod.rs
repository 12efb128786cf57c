//! Multi-step form wizard
//!
//! A wizard owns one draft for its whole lifetime. Each step validates only
//! its own fields; the assembled payload is sent once, from the final step.

mod registration;

use log::{info, warn};
use serde::{de::DeserializeOwned, Serialize};

use crate::error::{Error, Result};
use crate::fetch::ApiClient;
use crate::validation::ValidationErrors;

pub use registration::*;

/// A draft that can be driven through a [`Wizard`]
pub trait WizardDraft {
    /// Number of steps, numbered from 1
    const STEPS: usize;

    /// Path the final payload is POSTed to
    const ENDPOINT: &'static str;

    /// What is actually sent; omits confirmation-only fields
    type Payload: Serialize;

    /// What the endpoint answers with
    type Response: DeserializeOwned;

    /// Collect every violation of `step`
    fn validate_step(&self, step: usize) -> ValidationErrors;

    /// Assemble the payload from an already validated draft
    fn payload(&self) -> std::result::Result<Self::Payload, ValidationErrors>;

    /// Inspect a 2xx response for failures reported in the body
    fn accept(_response: &Self::Response) -> Result<()> {
        Ok(())
    }
}

/// Where a wizard currently is
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WizardState {
    Step(usize),
    Submitting,
    Done,
}

/// Holds a wizard in `Submitting` while the request is in flight and puts
/// it back on its step when dropped, including when the future is cancelled
struct SubmitGuard<'a> {
    state: &'a mut WizardState,
    step: usize,
}

impl<'a> SubmitGuard<'a> {
    fn enter(state: &'a mut WizardState, step: usize) -> Self {
        *state = WizardState::Submitting;
        Self { state, step }
    }
}

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        *self.state = WizardState::Step(self.step);
    }
}

/// State machine driving a [`WizardDraft`] from step 1 to submission
#[derive(Debug)]
pub struct Wizard<D: WizardDraft> {
    draft: D,
    state: WizardState,
    errors: ValidationErrors,
    notice: Option<String>,
}

impl<D: WizardDraft> Wizard<D> {
    pub fn new(draft: D) -> Self {
        Self {
            draft,
            state: WizardState::Step(1),
            errors: ValidationErrors::new(),
            notice: None,
        }
    }

    pub fn state(&self) -> WizardState {
        self.state
    }

    /// Current step, or `None` while submitting or once done
    pub fn step(&self) -> Option<usize> {
        match self.state {
            WizardState::Step(n) => Some(n),
            _ => None,
        }
    }

    pub fn is_final_step(&self) -> bool {
        self.state == WizardState::Step(D::STEPS)
    }

    pub fn is_done(&self) -> bool {
        self.state == WizardState::Done
    }

    pub fn draft(&self) -> &D {
        &self.draft
    }

    /// Mutable access for form bindings. Fields persist across steps.
    pub fn draft_mut(&mut self) -> &mut D {
        &mut self.draft
    }

    /// Violations found by the last rejected transition
    pub fn errors(&self) -> &ValidationErrors {
        &self.errors
    }

    /// Message from the last failed submission
    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn dismiss_notice(&mut self) {
        self.notice = None;
    }

    /// Validate the current step and advance on success.
    ///
    /// On rejection the step and the draft are left exactly as they were.
    pub fn next(&mut self) -> Result<usize> {
        let step = match self.state {
            WizardState::Step(n) if n < D::STEPS => n,
            WizardState::Step(_) => {
                return Err(Error::invalid_state("already at the final step; submit instead"))
            }
            WizardState::Submitting => return Err(Error::Busy),
            WizardState::Done => return Err(Error::invalid_state("wizard already submitted")),
        };

        let errors = self.draft.validate_step(step);
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Err(Error::Validation(errors));
        }

        self.errors = ValidationErrors::new();
        self.state = WizardState::Step(step + 1);
        Ok(step + 1)
    }

    /// Go back one step. Never loses entered data.
    pub fn back(&mut self) -> Result<usize> {
        match self.state {
            WizardState::Step(n) => {
                let prev = n.saturating_sub(1).max(1);
                self.errors = ValidationErrors::new();
                self.state = WizardState::Step(prev);
                Ok(prev)
            }
            WizardState::Submitting => Err(Error::Busy),
            WizardState::Done => Err(Error::invalid_state("wizard already submitted")),
        }
    }

    /// Validate the final step and send the payload.
    ///
    /// Success moves to `Done`. Failure returns to the final step with a
    /// notice derived from the error; the draft stays intact for correction.
    pub async fn submit(&mut self, api: &ApiClient) -> Result<D::Response> {
        let step = match self.state {
            WizardState::Step(n) if n == D::STEPS => n,
            WizardState::Step(_) => {
                return Err(Error::invalid_state("submit is only available at the final step"))
            }
            WizardState::Submitting => return Err(Error::Busy),
            WizardState::Done => return Err(Error::invalid_state("wizard already submitted")),
        };

        let errors = self.draft.validate_step(step);
        if !errors.is_empty() {
            self.errors = errors.clone();
            return Err(Error::Validation(errors));
        }
        let payload = self.draft.payload().map_err(|errors| {
            self.errors = errors.clone();
            Error::Validation(errors)
        })?;
        let request = api.post(D::ENDPOINT).json(&payload)?;

        self.errors = ValidationErrors::new();
        self.notice = None;

        let sent = {
            let _submitting = SubmitGuard::enter(&mut self.state, step);
            request.execute::<D::Response>().await
        };
        let result = sent.and_then(|response| D::accept(&response).map(|()| response));

        match result {
            Ok(response) => {
                info!("{} submitted", D::ENDPOINT);
                self.state = WizardState::Done;
                Ok(response)
            }
            Err(e) => {
                warn!("{} submission failed: {}", D::ENDPOINT, e);
                self.notice = Some(e.user_message());
                self.state = WizardState::Step(step);
                Err(e)
            }
        }
    }
}

impl<D: WizardDraft + Default> Default for Wizard<D> {
    fn default() -> Self {
        Self::new(D::default())
    }
}
