//! Sorting for the measurements table and goals list

use std::cmp::Ordering;

use crate::progress::goal_progress;
use crate::resource::{Goal, Measurement};

/// Sort direction
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    #[default]
    Descending,
}

impl SortOrder {
    fn apply(&self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }

    /// The other direction, for clickable column headers
    pub fn toggled(&self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MeasurementSortField {
    #[default]
    Date,
    Value,
    Type,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GoalSortField {
    #[default]
    TargetDate,
    StartDate,
    Progress,
    Type,
}

/// Stable sort: equal keys keep their incoming order
pub fn sort_measurements(
    items: &mut [&Measurement],
    field: MeasurementSortField,
    order: SortOrder,
) {
    items.sort_by(|a, b| {
        let ordering = match field {
            MeasurementSortField::Date => a.date.cmp(&b.date),
            MeasurementSortField::Value => a.value.total_cmp(&b.value),
            MeasurementSortField::Type => a.measurement_type.cmp(&b.measurement_type),
        };
        order.apply(ordering)
    });
}

/// Sorted copy of a loaded collection
pub fn sorted_measurements(
    items: &[Measurement],
    field: MeasurementSortField,
    order: SortOrder,
) -> Vec<&Measurement> {
    let mut refs: Vec<&Measurement> = items.iter().collect();
    sort_measurements(&mut refs, field, order);
    refs
}

pub fn sort_goals(goals: &mut [&Goal], field: GoalSortField, order: SortOrder) {
    goals.sort_by(|a, b| {
        let ordering = match field {
            GoalSortField::TargetDate => a.target_date.cmp(&b.target_date),
            GoalSortField::StartDate => a.start_date.cmp(&b.start_date),
            GoalSortField::Progress => goal_progress(a).total_cmp(&goal_progress(b)),
            GoalSortField::Type => a.goal_type.cmp(&b.goal_type),
        };
        order.apply(ordering)
    });
}
