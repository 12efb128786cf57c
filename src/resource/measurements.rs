//! Body measurements. Append and delete only; there is no edit.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{de, Creatable, RecordId, Resource};
use crate::validation::{
    check, iso_date, optional_text, parse_date, parse_number, parsed, positive_number,
    ValidationErrors,
};

/// Body site a measurement was taken at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MeasurementType {
    Chest,
    Waist,
    Hips,
    Arms,
    Thighs,
    Calves,
}

impl MeasurementType {
    pub const ALL: [MeasurementType; 6] = [
        MeasurementType::Chest,
        MeasurementType::Waist,
        MeasurementType::Hips,
        MeasurementType::Arms,
        MeasurementType::Thighs,
        MeasurementType::Calves,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            MeasurementType::Chest => "chest",
            MeasurementType::Waist => "waist",
            MeasurementType::Hips => "hips",
            MeasurementType::Arms => "arms",
            MeasurementType::Thighs => "thighs",
            MeasurementType::Calves => "calves",
        }
    }
}

impl fmt::Display for MeasurementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MeasurementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        MeasurementType::ALL
            .into_iter()
            .find(|t| t.as_str() == s.trim().to_ascii_lowercase())
            .ok_or_else(|| format!("unknown measurement type: {}", s))
    }
}

/// A stored measurement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    pub id: RecordId,
    pub measurement_type: MeasurementType,
    /// Centimetres
    #[serde(deserialize_with = "de::number")]
    pub value: f64,
    #[serde(deserialize_with = "de::date")]
    pub date: NaiveDate,
    #[serde(default)]
    pub notes: Option<String>,
}

/// Measurement form as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Validate)]
pub struct MeasurementInput {
    #[validate(required(message = "Measurement type is required"))]
    pub measurement_type: Option<MeasurementType>,
    #[validate(
        length(min = 1, message = "Value is required"),
        custom(function = "positive_number")
    )]
    pub value: String,
    #[validate(
        length(min = 1, message = "Date is required"),
        custom(function = "iso_date")
    )]
    pub date: String,
    pub notes: String,
}

/// Body of `POST /api/progress/measurements`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewMeasurement {
    pub measurement_type: MeasurementType,
    pub value: f64,
    pub date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl Resource for Measurement {
    const PATH: &'static str = "/api/progress/measurements";
    const NAME: &'static str = "measurement";

    fn id(&self) -> &RecordId {
        &self.id
    }
}

impl Creatable for Measurement {
    type Input = MeasurementInput;
    type Create = NewMeasurement;

    fn validate(input: MeasurementInput) -> Result<NewMeasurement, ValidationErrors> {
        check(&input).into_result()?;

        Ok(NewMeasurement {
            measurement_type: parsed(input.measurement_type, "measurement_type", "blank")?,
            value: parsed(parse_number(&input.value), "value", "not_a_number")?,
            date: parsed(parse_date(&input.date), "date", "invalid_date")?,
            notes: optional_text(&input.notes),
        })
    }
}
