//! Training goals with derived status

use std::fmt;

use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{de, Creatable, RecordId, Resource, Updatable};
use crate::progress::derive_goal_status;
use crate::validation::{
    check, iso_date, non_negative_number, optional_text, parse_date, parse_number, parsed,
    positive_number, ValidationErrors,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalType {
    Weight,
    Measurement,
    Performance,
    Habit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GoalStatus {
    #[default]
    Pending,
    InProgress,
    Achieved,
    Failed,
}

impl GoalStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoalStatus::Pending => "pending",
            GoalStatus::InProgress => "in_progress",
            GoalStatus::Achieved => "achieved",
            GoalStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for GoalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored goal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Goal {
    pub id: RecordId,
    pub goal_type: GoalType,
    #[serde(deserialize_with = "de::number")]
    pub target_value: f64,
    #[serde(default, deserialize_with = "de::number_or_zero")]
    pub current_value: f64,
    #[serde(deserialize_with = "de::date")]
    pub start_date: NaiveDate,
    #[serde(deserialize_with = "de::date")]
    pub target_date: NaiveDate,
    #[serde(default)]
    pub status: GoalStatus,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Goal form as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct GoalInput {
    #[validate(required(message = "Goal type is required"))]
    pub goal_type: Option<GoalType>,
    #[validate(
        length(min = 1, message = "Target value is required"),
        custom(function = "positive_number")
    )]
    pub target_value: String,
    /// Blank means 0
    #[validate(custom(function = "non_negative_number"))]
    pub current_value: String,
    /// Blank means today
    #[validate(custom(function = "iso_date"))]
    pub start_date: String,
    #[validate(
        length(min = 1, message = "Target date is required"),
        custom(function = "iso_date")
    )]
    pub target_date: String,
    pub notes: String,
}

/// Body of `POST /api/progress/goals`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewGoal {
    pub goal_type: GoalType,
    pub target_value: f64,
    pub current_value: f64,
    pub start_date: NaiveDate,
    pub target_date: NaiveDate,
    pub status: GoalStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Partial update for a goal.
///
/// There is no way to set `status` directly; it is recomputed from the
/// values whenever the patch is prepared.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct GoalPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    status: Option<GoalStatus>,
}

impl GoalPatch {
    /// The inline "update progress" edit
    pub fn current_value(value: f64) -> Self {
        Self {
            current_value: Some(value),
            ..Self::default()
        }
    }

    /// Status that will be sent, once prepared
    pub fn status(&self) -> Option<GoalStatus> {
        self.status
    }
}

impl GoalInput {
    /// Validate against an explicit "today"; the target date must lie after it
    pub fn validate_on(self, today: NaiveDate) -> Result<NewGoal, ValidationErrors> {
        let mut errors = check(&self);
        if let Some(target_date) = parse_date(&self.target_date) {
            if target_date <= today {
                errors.add("target_date", "Target date must be in the future");
            }
        }
        errors.into_result()?;

        let target_value =
            parsed(parse_number(&self.target_value), "target_value", "not_a_number")?;
        let current_value = if self.current_value.trim().is_empty() {
            0.0
        } else {
            parsed(parse_number(&self.current_value), "current_value", "not_a_number")?
        };
        let start_date = if self.start_date.trim().is_empty() {
            today
        } else {
            parsed(parse_date(&self.start_date), "start_date", "invalid_date")?
        };

        Ok(NewGoal {
            goal_type: parsed(self.goal_type, "goal_type", "blank")?,
            target_value,
            current_value,
            start_date,
            target_date: parsed(parse_date(&self.target_date), "target_date", "invalid_date")?,
            status: derive_goal_status(Some(current_value), target_value, GoalStatus::Pending),
            notes: optional_text(&self.notes),
        })
    }
}

impl Resource for Goal {
    const PATH: &'static str = "/api/progress/goals";
    const NAME: &'static str = "goal";

    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Creatable for Goal {
    type Input = GoalInput;
    type Create = NewGoal;

    fn validate(input: GoalInput) -> Result<NewGoal, ValidationErrors> {
        input.validate_on(Local::now().date_naive())
    }
}

impl Updatable for Goal {
    type Patch = GoalPatch;

    fn prepare_patch(&self, mut patch: GoalPatch) -> GoalPatch {
        let target = patch.target_value.unwrap_or(self.target_value);
        let current = patch.current_value.unwrap_or(self.current_value);
        patch.status = Some(derive_goal_status(Some(current), target, self.status));
        patch
    }
}
