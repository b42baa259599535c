//! Summary statistics for a plan

use serde::Serialize;

use crate::domain::{Mode, Plan};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Insights {
    pub total_weeks: usize,
    pub total_tasks: usize,
    /// round(total_tasks / total_weeks), 0 without weeks
    pub avg_tasks_per_week: u64,
    /// total_tasks times the leading whole number of daily_time
    pub estimated_hours: u64,
    pub mode: Mode,
}

impl Insights {
    pub fn from_plan(plan: &Plan) -> Self {
        let total_weeks = plan.weeks.len();
        let total_tasks = plan.daily_schedule.len();
        let avg_tasks_per_week = if total_weeks == 0 {
            0
        } else {
            (total_tasks as f64 / total_weeks as f64).round() as u64
        };
        Self {
            total_weeks,
            total_tasks,
            avg_tasks_per_week,
            estimated_hours: total_tasks as u64 * hours_per_day(&plan.daily_time),
            mode: plan.mode,
        }
    }
}

/// Leading whole number of a daily time label; 1 when absent or zero
///
/// "0.5 hours" counts as 1 and "1.5 hours" as 1.
pub fn hours_per_day(daily_time: &str) -> u64 {
    let digits: String = daily_time.trim().chars().take_while(|c| c.is_ascii_digit()).collect();
    match digits.parse::<u64>() {
        Ok(0) | Err(_) => 1,
        Ok(hours) => hours,
    }
}
