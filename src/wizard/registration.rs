//! Three-step account registration

use serde::{Deserialize, Serialize};
use validator::Validate;

use super::WizardDraft;
use crate::error::{Error, Result};
use crate::validation::{
    check, email_address, iso_date, not_blank, optional_text, parse_number, parsed,
    positive_number, ValidationErrors,
};

/// Minimum accepted password length, as enforced on [`AccountFields::password`]
pub const MIN_PASSWORD_LEN: usize = 8;

/// Self-assessed training experience
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FitnessLevel {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

/// Step 1
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct AccountFields {
    #[validate(
        length(min = 1, message = "Username is required"),
        custom(function = "not_blank")
    )]
    pub username: String,
    #[validate(
        length(min = 1, message = "Email is required"),
        custom(function = "email_address")
    )]
    pub email: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(
        length(min = 1, message = "Password confirmation is required"),
        must_match(other = "password", message = "Passwords do not match")
    )]
    pub confirm_password: String,
}

/// Step 2
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct ProfileFields {
    #[validate(
        length(min = 1, message = "First name is required"),
        custom(function = "not_blank")
    )]
    pub first_name: String,
    #[validate(
        length(min = 1, message = "Last name is required"),
        custom(function = "not_blank")
    )]
    pub last_name: String,
    pub phone: String,
    #[validate(custom(function = "iso_date"))]
    pub birth_date: String,
}

/// Step 3. Numbers are kept as typed so half-entered values survive `back()`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct PhysicalFields {
    #[validate(
        length(min = 1, message = "Height is required"),
        custom(function = "positive_number")
    )]
    pub height: String,
    #[validate(
        length(min = 1, message = "Initial weight is required"),
        custom(function = "positive_number")
    )]
    pub initial_weight: String,
    #[validate(custom(function = "positive_number"))]
    pub target_weight: String,
    pub fitness_level: FitnessLevel,
    pub goals: String,
}

/// Everything the registration form collects
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationDraft {
    pub account: AccountFields,
    pub profile: ProfileFields,
    pub physical: PhysicalFields,
}

/// Body of `POST /api/register`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationPayload {
    pub username: String,
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    pub height: f64,
    pub initial_weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_weight: Option<f64>,
    pub fitness_level: FitnessLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goals: Option<String>,
}

/// Response of `POST /api/register`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegistrationResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
}

impl WizardDraft for RegistrationDraft {
    const STEPS: usize = 3;
    const ENDPOINT: &'static str = "/api/register";

    type Payload = RegistrationPayload;
    type Response = RegistrationResponse;

    fn validate_step(&self, step: usize) -> ValidationErrors {
        match step {
            1 => check(&self.account),
            2 => check(&self.profile),
            3 => check(&self.physical),
            _ => {
                let mut errors = ValidationErrors::new();
                errors.add("step", format!("Unknown step {}", step));
                errors
            }
        }
    }

    fn payload(&self) -> std::result::Result<RegistrationPayload, ValidationErrors> {
        check(&self.physical).into_result()?;
        let physical = &self.physical;
        let height = parsed(parse_number(&physical.height), "height", "not_a_number")?;
        let initial_weight = parsed(
            parse_number(&physical.initial_weight),
            "initial_weight",
            "not_a_number",
        )?;
        let target_weight = if physical.target_weight.trim().is_empty() {
            None
        } else {
            Some(parsed(
                parse_number(&physical.target_weight),
                "target_weight",
                "not_a_number",
            )?)
        };

        Ok(RegistrationPayload {
            username: self.account.username.trim().to_string(),
            email: self.account.email.trim().to_string(),
            password: self.account.password.clone(),
            first_name: self.profile.first_name.trim().to_string(),
            last_name: self.profile.last_name.trim().to_string(),
            phone: optional_text(&self.profile.phone),
            birth_date: optional_text(&self.profile.birth_date),
            height,
            initial_weight,
            target_weight,
            fitness_level: physical.fitness_level,
            goals: optional_text(&physical.goals),
        })
    }

    fn accept(response: &RegistrationResponse) -> Result<()> {
        if response.success {
            Ok(())
        } else {
            Err(Error::Rejected(
                response
                    .error
                    .clone()
                    .unwrap_or_else(|| "Registration failed".to_string()),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::{Wizard, WizardState};

    fn complete_draft() -> RegistrationDraft {
        RegistrationDraft {
            account: AccountFields {
                username: "anna".to_string(),
                email: "anna@example.com".to_string(),
                password: "abcdefgh".to_string(),
                confirm_password: "abcdefgh".to_string(),
            },
            profile: ProfileFields {
                first_name: "Anna".to_string(),
                last_name: "Berg".to_string(),
                phone: String::new(),
                birth_date: "1990-04-12".to_string(),
            },
            physical: PhysicalFields {
                height: "172".to_string(),
                initial_weight: "68.5".to_string(),
                target_weight: String::new(),
                fitness_level: FitnessLevel::Intermediate,
                goals: "Run a half marathon".to_string(),
            },
        }
    }

    #[test]
    fn test_empty_required_field_keeps_step_and_draft() {
        for field in ["username", "email", "password", "confirm_password"] {
            let mut draft = complete_draft();
            match field {
                "username" => draft.account.username.clear(),
                "email" => draft.account.email.clear(),
                "password" => draft.account.password.clear(),
                _ => draft.account.confirm_password.clear(),
            }
            let before = draft.clone();

            let mut wizard = Wizard::new(draft);
            assert!(wizard.next().is_err());
            assert_eq!(wizard.state(), WizardState::Step(1));
            assert_eq!(wizard.draft(), &before);
            assert!(wizard.errors().has(field));
        }
    }

    #[test]
    fn test_password_mismatch_rejected() {
        let mut draft = complete_draft();
        draft.account.confirm_password = "abcdefgx".to_string();

        let mut wizard = Wizard::new(draft);
        let err = wizard.next().unwrap_err();

        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(wizard.step(), Some(1));
        assert_eq!(
            wizard.errors().messages_for("confirm_password"),
            vec!["Passwords do not match"]
        );
    }

    #[test]
    fn test_password_minimum_length() {
        let mut draft = complete_draft();
        let short = "x".repeat(MIN_PASSWORD_LEN - 1);
        draft.account.password = short.clone();
        draft.account.confirm_password = short;
        assert_eq!(
            draft.validate_step(1).messages_for("password"),
            vec!["Password must be at least 8 characters"]
        );

        let exact = "x".repeat(MIN_PASSWORD_LEN);
        draft.account.password = exact.clone();
        draft.account.confirm_password = exact;
        assert!(draft.validate_step(1).is_empty());
    }

    #[test]
    fn test_email_needs_dotted_domain() {
        let mut draft = complete_draft();
        draft.account.email = "anna@localhost".to_string();
        assert_eq!(
            draft.validate_step(1).messages_for("email"),
            vec!["Email must look like name@example.com"]
        );
    }

    #[test]
    fn test_step_one_collects_every_violation() {
        let mut draft = RegistrationDraft::default();
        draft.account.email = "not-an-email".to_string();
        draft.account.password = "short".to_string();
        draft.account.confirm_password = "other".to_string();

        let errors = draft.validate_step(1);
        assert!(errors.has("username"));
        assert!(errors.has("email"));
        assert!(errors.has("password"));
        assert!(errors.has("confirm_password"));
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_back_keeps_entered_data() {
        let mut wizard = Wizard::new(complete_draft());
        assert_eq!(wizard.next().unwrap(), 2);
        wizard.draft_mut().profile.phone = "+47 555 0100".to_string();
        assert_eq!(wizard.back().unwrap(), 1);
        assert_eq!(wizard.back().unwrap(), 1);
        assert_eq!(wizard.next().unwrap(), 2);
        assert_eq!(wizard.draft().profile.phone, "+47 555 0100");
    }

    #[test]
    fn test_profile_step_requires_names_only() {
        let mut draft = complete_draft();
        draft.profile.birth_date.clear();
        assert!(draft.validate_step(2).is_empty());

        draft.profile.last_name = "  ".to_string();
        draft.profile.birth_date = "12/04/1990".to_string();
        let errors = draft.validate_step(2);
        assert!(errors.has("last_name"));
        assert!(errors.has("birth_date"));
        assert!(!errors.has("first_name"));
    }

    #[test]
    fn test_physical_step_requires_numbers() {
        let mut draft = complete_draft();
        draft.physical.height = "tall".to_string();
        draft.physical.initial_weight.clear();
        draft.physical.target_weight = "-1".to_string();

        let errors = draft.validate_step(3);
        assert_eq!(errors.messages_for("height"), vec!["Height must be a number"]);
        assert_eq!(
            errors.messages_for("initial_weight"),
            vec!["Initial weight is required"]
        );
        assert!(errors.has("target_weight"));
    }

    #[test]
    fn test_payload_omits_confirmation() {
        let payload = complete_draft().payload().unwrap();
        let json = serde_json::to_value(&payload).unwrap();

        assert!(json.get("confirmPassword").is_none());
        assert!(json.get("confirm_password").is_none());
        assert!(json.get("phone").is_none());
        assert_eq!(json["firstName"], "Anna");
        assert_eq!(json["initialWeight"], 68.5);
        assert_eq!(json["fitnessLevel"], "intermediate");
    }

    #[test]
    fn test_unsuccessful_response_is_rejected() {
        let response = RegistrationResponse {
            success: false,
            error: Some("Username taken".to_string()),
        };
        let err = RegistrationDraft::accept(&response).unwrap_err();
        assert_eq!(err.user_message(), "Username taken");
    }

    #[test]
    fn test_next_at_final_step_is_invalid() {
        let mut wizard = Wizard::new(complete_draft());
        wizard.next().unwrap();
        wizard.next().unwrap();
        assert!(wizard.is_final_step());
        assert!(matches!(wizard.next(), Err(Error::InvalidState(_))));
    }
}
