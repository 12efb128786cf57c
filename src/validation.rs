//! Field-scoped validation for form input.
//!
//! Forms derive [`validator::Validate`]; the report is flattened into
//! [`ValidationErrors`] so every violation can be shown at once. Custom
//! checks below return a bare error code and the message is composed from
//! the field name when the report is converted.

use std::borrow::Cow;
use std::fmt;

use chrono::NaiveDate;
use validator::{Validate, ValidateEmail, ValidationError};

/// A single violation tied to the form field that caused it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Ordered list of violations collected by a validator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors {
    errors: Vec<FieldError>,
}

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<F: Into<String>, T: Into<String>>(&mut self, field: F, message: T) {
        self.errors.push(FieldError {
            field: field.into(),
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// True if any violation is attached to `field`
    pub fn has(&self, field: &str) -> bool {
        self.errors.iter().any(|e| e.field == field)
    }

    /// Messages attached to `field`, in the order they were found
    pub fn messages_for(&self, field: &str) -> Vec<&str> {
        self.errors
            .iter()
            .filter(|e| e.field == field)
            .map(|e| e.message.as_str())
            .collect()
    }

    /// `Ok(())` when nothing was collected
    pub fn into_result(self) -> Result<(), ValidationErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<&str> = self.errors.iter().map(|e| e.message.as_str()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

impl std::error::Error for ValidationErrors {}

impl From<validator::ValidationErrors> for ValidationErrors {
    fn from(report: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = report.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let mut errors = ValidationErrors::new();
        for (field, violations) in fields {
            let field = field.to_string();
            for violation in violations.iter() {
                let message = match &violation.message {
                    Some(message) => message.to_string(),
                    None => describe(&field, &violation.code),
                };
                errors.add(field.clone(), message);
            }
        }
        errors
    }
}

/// Run the derived checks of a form section
pub(crate) fn check<T: Validate>(form: &T) -> ValidationErrors {
    match form.validate() {
        Ok(()) => ValidationErrors::new(),
        Err(report) => report.into(),
    }
}

/// "initial_weight" -> "Initial weight"
fn label(field: &str) -> String {
    let spaced = field.replace('_', " ");
    let mut chars = spaced.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => spaced,
    }
}

fn describe(field: &str, code: &str) -> String {
    let rule = match code {
        "blank" => "is required",
        "not_a_number" => "must be a number",
        "not_positive" => "must be greater than zero",
        "negative" => "cannot be negative",
        "invalid_date" => "must be a valid date (YYYY-MM-DD)",
        other => return format!("{} is invalid ({})", label(field), other),
    };
    format!("{} {}", label(field), rule)
}

fn parse_finite(value: &str) -> Option<f64> {
    value.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Whitespace-only input. Empty input is left to `length(min = 1)`.
pub(crate) fn not_blank(value: &str) -> Result<(), ValidationError> {
    if !value.is_empty() && value.trim().is_empty() {
        return Err(ValidationError::new("blank"));
    }
    Ok(())
}

/// A number strictly above zero; empty input is accepted
pub(crate) fn positive_number(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    match parse_finite(value) {
        None if value.trim().is_empty() => Err(ValidationError::new("blank")),
        None => Err(ValidationError::new("not_a_number")),
        Some(n) if n <= 0.0 => Err(ValidationError::new("not_positive")),
        Some(_) => Ok(()),
    }
}

/// A number of zero or more; empty input is accepted
pub(crate) fn non_negative_number(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Ok(());
    }
    match parse_finite(value) {
        None => Err(ValidationError::new("not_a_number")),
        Some(n) if n < 0.0 => Err(ValidationError::new("negative")),
        Some(_) => Ok(()),
    }
}

/// An ISO `YYYY-MM-DD` date; empty input is accepted
pub(crate) fn iso_date(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() || parse_date(value).is_some() {
        Ok(())
    } else {
        Err(ValidationError::new("invalid_date"))
    }
}

/// An address with a dotted domain; empty input is accepted
pub(crate) fn email_address(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() || is_email_shaped(value.trim()) {
        Ok(())
    } else {
        Err(ValidationError::new("email")
            .with_message(Cow::Borrowed("Email must look like name@example.com")))
    }
}

/// `local@domain.tld`. Single-label domains such as `localhost` are rejected.
pub fn is_email_shaped(value: &str) -> bool {
    value.validate_email()
        && value
            .rsplit_once('@')
            .map_or(false, |(_, domain)| domain.contains('.'))
}

/// Parse a numeric field that already passed validation
pub(crate) fn parse_number(value: &str) -> Option<f64> {
    parse_finite(value)
}

/// Parse an ISO `YYYY-MM-DD` field
pub(crate) fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Unwrap a value parsed after validation, reporting `code` against `field`
/// if it is missing
pub(crate) fn parsed<T>(value: Option<T>, field: &str, code: &str) -> Result<T, ValidationErrors> {
    value.ok_or_else(|| {
        let mut errors = ValidationErrors::new();
        errors.add(field, describe(field, code));
        errors
    })
}

/// Trim a free-text field, mapping blank input to `None`
pub(crate) fn optional_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Validate)]
    struct Sample {
        #[validate(
            length(min = 1, message = "First name is required"),
            custom(function = "not_blank")
        )]
        first_name: String,
        #[validate(custom(function = "positive_number"))]
        height: String,
        #[validate(custom(function = "non_negative_number"))]
        weight: String,
    }

    #[test]
    fn test_email_shape() {
        assert!(is_email_shaped("coach@example.com"));
        assert!(is_email_shaped("a.b@mail.example.org"));
        assert!(!is_email_shaped("coach@example"));
        assert!(!is_email_shaped("@example.com"));
        assert!(!is_email_shaped("coach @example.com"));
        assert!(!is_email_shaped("coach@ex@ample.com"));
    }

    #[test]
    fn test_report_becomes_field_messages() {
        let errors = check(&Sample {
            first_name: "  ".to_string(),
            height: "-3".to_string(),
            weight: "heavy".to_string(),
        });

        assert_eq!(errors.len(), 3);
        assert_eq!(errors.messages_for("first_name"), vec!["First name is required"]);
        assert_eq!(errors.messages_for("height"), vec!["Height must be greater than zero"]);
        assert_eq!(errors.messages_for("weight"), vec!["Weight must be a number"]);
        assert_eq!(
            errors.iter().map(|e| e.field.as_str()).collect::<Vec<_>>(),
            vec!["first_name", "height", "weight"]
        );
    }

    #[test]
    fn test_explicit_message_wins() {
        let errors = check(&Sample {
            first_name: String::new(),
            height: "180".to_string(),
            weight: String::new(),
        });
        assert_eq!(errors.messages_for("first_name"), vec!["First name is required"]);
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_parse_helpers() {
        assert_eq!(parse_number(" 72.5 "), Some(72.5));
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_date("2024-02-29"), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(parse_date("2023-02-29"), None);
        assert_eq!(optional_text("  "), None);
        assert_eq!(optional_text(" hi "), Some("hi".to_string()));
    }

    #[test]
    fn test_label_from_field_name() {
        assert_eq!(label("initial_weight"), "Initial weight");
        assert_eq!(
            describe("birth_date", "invalid_date"),
            "Birth date must be a valid date (YYYY-MM-DD)"
        );
    }
}
