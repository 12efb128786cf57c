//! Filters over loaded measurements and goals

use chrono::{Months, NaiveDate};

use crate::resource::{Goal, GoalStatus, GoalType, Measurement, MeasurementType};

/// Window of history to show, counted back from a reference day
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimeRange {
    #[default]
    All,
    LastMonth,
    Last3Months,
    Last6Months,
    LastYear,
}

impl TimeRange {
    fn months(&self) -> Option<u32> {
        match self {
            TimeRange::All => None,
            TimeRange::LastMonth => Some(1),
            TimeRange::Last3Months => Some(3),
            TimeRange::Last6Months => Some(6),
            TimeRange::LastYear => Some(12),
        }
    }

    /// First day inside the window, or `None` for no lower bound
    pub fn start(&self, reference: NaiveDate) -> Option<NaiveDate> {
        self.months()
            .and_then(|m| reference.checked_sub_months(Months::new(m)))
    }

    pub fn contains(&self, date: NaiveDate, reference: NaiveDate) -> bool {
        self.start(reference).map_or(true, |start| date >= start)
    }
}

/// Criteria for the measurements table
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeasurementFilter {
    pub measurement_type: Option<MeasurementType>,
    pub range: TimeRange,
}

impl MeasurementFilter {
    pub fn matches(&self, m: &Measurement, reference: NaiveDate) -> bool {
        self.measurement_type.map_or(true, |t| m.measurement_type == t)
            && self.range.contains(m.date, reference)
    }

    /// Matching measurements in their original relative order
    pub fn apply<'a>(
        &self,
        items: &'a [Measurement],
        reference: NaiveDate,
    ) -> Vec<&'a Measurement> {
        items.iter().filter(|m| self.matches(m, reference)).collect()
    }
}

/// Measurements of one type, order preserved
pub fn filter_by_type(
    items: &[Measurement],
    measurement_type: MeasurementType,
) -> Vec<&Measurement> {
    items
        .iter()
        .filter(|m| m.measurement_type == measurement_type)
        .collect()
}

/// Criteria for the goals list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GoalFilter {
    pub status: Option<GoalStatus>,
    pub goal_type: Option<GoalType>,
}

impl GoalFilter {
    pub fn matches(&self, goal: &Goal) -> bool {
        self.status.map_or(true, |s| goal.status == s)
            && self.goal_type.map_or(true, |t| goal.goal_type == t)
    }

    pub fn apply<'a>(&self, goals: &'a [Goal]) -> Vec<&'a Goal> {
        goals.iter().filter(|g| self.matches(g)).collect()
    }
}
