//! Daily schedule expansion
//!
//! Projects week topics onto consecutive calendar days. The expansion is
//! purely mechanical so even a fully synthetic roadmap produces a complete,
//! gap-free schedule.

use chrono::{Days, NaiveDate};
use tracing::debug;

use crate::domain::{TaskEntry, TaskType, WeekEntry};

/// Upper bound on scheduled days
pub const MAX_SCHEDULE_DAYS: usize = 90;

/// Fallback review text for weeks without a description
pub const DEFAULT_REVIEW: &str = "Review and practice";

/// Number of days a roadmap with `week_count` weeks expands to
pub fn schedule_len(week_count: usize) -> usize {
    (week_count * 7).min(MAX_SCHEDULE_DAYS)
}

/// Expand weeks into one task per day starting at `start`
///
/// Day `d` belongs to week `d / 7 + 1`; when no week carries that number the
/// first week is used. Day 0 of each week is an overview, day 6 a review, and
/// the rest cycle through the week's topics.
pub fn expand_schedule(weeks: &[WeekEntry], daily_time: &str, start: NaiveDate) -> Vec<TaskEntry> {
    let Some(first) = weeks.first() else {
        debug!("expand_schedule: no weeks, empty schedule");
        return Vec::new();
    };

    let total_days = schedule_len(weeks.len());
    let mut schedule = Vec::with_capacity(total_days);

    for day in 0..total_days {
        let Some(date) = start.checked_add_days(Days::new(day as u64)) else {
            debug!(day, "expand_schedule: date overflow, stopping");
            break;
        };

        let week_number = (day / 7) as u32 + 1;
        let week = weeks.iter().find(|w| w.week == week_number).unwrap_or(first);
        let day_of_week = day % 7;

        let task = match day_of_week {
            0 => format!("Week {} Overview: {}", week_number, week.title),
            6 => {
                let review = if week.description.is_empty() {
                    DEFAULT_REVIEW
                } else {
                    week.description.as_str()
                };
                format!("Week {} Review: {}", week_number, review)
            }
            _ if week.topics.is_empty() => week.title.clone(),
            _ => week.topics[day_of_week % week.topics.len()].clone(),
        };

        schedule.push(TaskEntry {
            date,
            task,
            duration: daily_time.to_string(),
            completed: false,
            week: week_number,
            week_title: week.title.clone(),
            task_type: TaskType::for_day(day),
        });
    }

    debug!(days = schedule.len(), %start, "expand_schedule: done");
    schedule
}
