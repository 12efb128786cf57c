//! Views derived from already loaded collections
//!
//! Everything here is a pure function of its inputs. Nothing touches the
//! network and the same input always yields the same output.

mod chart;
mod filter;
mod sort;

use crate::resource::{Goal, GoalStatus};

pub use chart::*;
pub use filter::*;
pub use sort::*;

/// Status implied by a goal's values.
///
/// A ratio of at least 1 is achieved, a ratio strictly between 0 and 1 is in
/// progress. Anything else (no current value, ratio ≤ 0, target ≤ 0) keeps
/// the prior status.
pub fn derive_goal_status(current: Option<f64>, target: f64, prior: GoalStatus) -> GoalStatus {
    let Some(current) = current else {
        return prior;
    };
    if target.is_nan() || target <= 0.0 || !current.is_finite() {
        return prior;
    }

    let ratio = current / target;
    if ratio >= 1.0 {
        GoalStatus::Achieved
    } else if ratio > 0.0 {
        GoalStatus::InProgress
    } else {
        prior
    }
}

/// Percentage complete, clamped to 0..=100
pub fn progress_percent(current: f64, target: f64) -> f64 {
    if target.is_nan() || target <= 0.0 || !current.is_finite() {
        return 0.0;
    }
    (current / target * 100.0).clamp(0.0, 100.0)
}

/// [`progress_percent`] for a stored goal
pub fn goal_progress(goal: &Goal) -> f64 {
    progress_percent(goal.current_value, goal.target_value)
}
