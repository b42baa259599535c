//! Calendar view over a plan's daily schedule
//!
//! Date lookup, the completion toggle and a Sunday-first month grid.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Plan, TaskEntry};
use crate::error::PlanError;

/// Completed vs total task counts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn remaining(&self) -> usize {
        self.total - self.completed
    }

    /// Whole percent complete, 0 for an empty schedule
    pub fn percent(&self) -> u32 {
        if self.total == 0 {
            return 0;
        }
        ((self.completed as f64 / self.total as f64) * 100.0).round() as u32
    }
}

impl Plan {
    /// The task scheduled on `date`, if any
    pub fn task_for_date(&self, date: NaiveDate) -> Option<&TaskEntry> {
        self.daily_schedule.iter().find(|t| t.date == date)
    }

    /// Flip `completed` on the task for `date` and return the new value
    ///
    /// No other entry is touched.
    pub fn toggle_completed(&mut self, date: NaiveDate) -> Result<bool, PlanError> {
        let task = self
            .daily_schedule
            .iter_mut()
            .find(|t| t.date == date)
            .ok_or(PlanError::TaskNotFound(date))?;
        task.completed = !task.completed;
        debug!(%date, completed = task.completed, "toggle_completed: done");
        Ok(task.completed)
    }

    pub fn progress(&self) -> Progress {
        Progress {
            completed: self.daily_schedule.iter().filter(|t| t.completed).count(),
            total: self.daily_schedule.len(),
        }
    }

    /// First and last scheduled dates
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.daily_schedule.iter().map(|t| t.date).min()?;
        let last = self.daily_schedule.iter().map(|t| t.date).max()?;
        Some((first, last))
    }
}

/// Sunday-first grid for a month
///
/// Leading `None` cells pad the first week so index 0 is a Sunday. Returns
/// None for an invalid year/month.
pub fn month_grid(year: i32, month: u32) -> Option<Vec<Option<NaiveDate>>> {
    let first = NaiveDate::from_ymd_opt(year, month, 1)?;
    let leading = first.weekday().num_days_from_sunday() as usize;

    let mut grid: Vec<Option<NaiveDate>> = vec![None; leading];
    grid.extend(
        first
            .iter_days()
            .take_while(|d| d.month() == month)
            .map(Some),
    );
    Some(grid)
}
