//! Roadmap construction: parse, pad, expand
//!
//! Three independent, synchronous steps turn raw model text into the pieces
//! of a Plan. Each step is a pure function and is tested on its own.

mod padding;
mod parser;
mod schedule;

pub use padding::{MAX_PADDED_WEEKS, pad_weeks, synthetic_week};
pub use parser::{DESCRIPTION_MIN_CHARS, ParsedRoadmap, RoadmapParser, Section, parse_response};
pub use schedule::{DEFAULT_REVIEW, MAX_SCHEDULE_DAYS, expand_schedule, schedule_len};

use chrono::NaiveDate;

use crate::domain::{TaskEntry, WeekEntry};

/// Everything derived from one response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Roadmap {
    pub weeks: Vec<WeekEntry>,
    pub tips: Vec<String>,
    pub milestones: Vec<String>,
    pub daily_schedule: Vec<TaskEntry>,
}

/// Run parse -> pad -> expand for one response
pub fn build_roadmap(text: &str, goal: &str, requested_weeks: u32, daily_time: &str, start: NaiveDate) -> Roadmap {
    let parsed = parse_response(text);
    let weeks = pad_weeks(parsed.weeks, goal, requested_weeks);
    let daily_schedule = expand_schedule(&weeks, daily_time, start);
    Roadmap {
        weeks,
        tips: parsed.tips,
        milestones: parsed.milestones,
        daily_schedule,
    }
}
