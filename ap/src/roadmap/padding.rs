//! Synthetic week padding
//!
//! Runs after parsing, never inside it. When the model produced fewer weeks
//! than requested, filler weeks derived from the goal are appended so that a
//! plan always has something to schedule.

use tracing::debug;

use crate::domain::WeekEntry;

/// Padding never synthesizes more than this many weeks in total
pub const MAX_PADDED_WEEKS: u32 = 12;

/// Build one filler week for the given goal
pub fn synthetic_week(week: u32, goal: &str) -> WeekEntry {
    let first_word = goal.split_whitespace().next().unwrap_or_default();
    let lowered = goal.trim().to_lowercase();
    WeekEntry {
        week,
        title: format!("{} - Week {}", first_word, week),
        topics: vec![
            format!("Continue learning {}", lowered),
            "Practice exercises".to_string(),
            "Review previous concepts".to_string(),
            "Work on projects".to_string(),
        ],
        description: format!("Focus on advancing your {} skills", lowered),
    }
}

/// Pad to min(requested, 12) weeks, then truncate to exactly `requested`
pub fn pad_weeks(mut weeks: Vec<WeekEntry>, goal: &str, requested: u32) -> Vec<WeekEntry> {
    let target = requested.min(MAX_PADDED_WEEKS) as usize;
    let parsed = weeks.len();
    while weeks.len() < target {
        let number = weeks.len() as u32 + 1;
        weeks.push(synthetic_week(number, goal));
    }
    weeks.truncate(requested as usize);
    debug!(parsed, padded = weeks.len(), requested, "pad_weeks: done");
    weeks
}
