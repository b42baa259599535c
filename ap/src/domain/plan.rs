//! Plan domain types
//!
//! A Plan is the persisted roadmap produced by one successful generation. The
//! JSON shape uses camelCase keys so that exported plans stay readable by the
//! web front end that shares the format.

use chrono::{DateTime, NaiveDate, Utc};
use planstore::Record;
use serde::{Deserialize, Serialize};

use super::request::{Experience, Mode};

/// Maximum number of topics kept per week
pub const MAX_TOPICS_PER_WEEK: usize = 5;

/// Maximum number of tips kept per plan
pub const MAX_TIPS: usize = 7;

/// Maximum number of milestones kept per plan
pub const MAX_MILESTONES: usize = 5;

/// One week of the roadmap
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekEntry {
    /// 1-based week number, unique within a plan
    pub week: u32,

    /// Week heading
    pub title: String,

    /// Ordered topics (at most five)
    pub topics: Vec<String>,

    /// First descriptive sentence found for the week, may be empty
    #[serde(default)]
    pub description: String,
}

impl WeekEntry {
    pub fn new(week: u32, title: impl Into<String>) -> Self {
        Self {
            week,
            title: title.into(),
            topics: Vec::new(),
            description: String::new(),
        }
    }

    /// Add a topic unless the week is already full
    pub fn push_topic(&mut self, topic: impl Into<String>) -> bool {
        if self.topics.len() >= MAX_TOPICS_PER_WEEK {
            return false;
        }
        self.topics.push(topic.into());
        true
    }
}

/// Kind of work scheduled for a day
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Theory,
    Practice,
}

impl TaskType {
    /// Even days are theory, odd days are practice
    pub fn for_day(day: usize) -> Self {
        if day % 2 == 0 { Self::Theory } else { Self::Practice }
    }
}

impl std::fmt::Display for TaskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Theory => write!(f, "theory"),
            Self::Practice => write!(f, "practice"),
        }
    }
}

/// One calendar day of scheduled work
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskEntry {
    /// Calendar date, serialized as YYYY-MM-DD
    pub date: NaiveDate,

    /// What to do
    pub task: String,

    /// Copy of the plan's daily time
    pub duration: String,

    /// Only field that changes after creation
    #[serde(default)]
    pub completed: bool,

    /// Week number this task belongs to
    pub week: u32,

    /// Denormalized week title
    pub week_title: String,

    #[serde(rename = "type")]
    pub task_type: TaskType,
}

/// The persisted roadmap record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Creation timestamp in Unix milliseconds
    pub id: i64,

    pub goal: String,
    pub duration: String,
    pub daily_time: String,
    pub mode: Mode,
    #[serde(default)]
    pub experience: Option<Experience>,
    #[serde(default)]
    pub preferred_days: String,

    pub created_at: DateTime<Utc>,

    pub weeks: Vec<WeekEntry>,

    #[serde(default)]
    pub tips: Vec<String>,

    #[serde(default)]
    pub milestones: Vec<String>,

    #[serde(default)]
    pub daily_schedule: Vec<TaskEntry>,

    /// Untouched model output, kept for display and auditing
    #[serde(rename = "rawAIResponse", default)]
    pub raw_ai_response: String,
}

impl Plan {
    /// Short one-line label for listings
    pub fn summary(&self) -> String {
        format!("{} ({}, {}, {})", self.goal, self.duration, self.daily_time, self.mode)
    }
}

impl Record for Plan {
    fn id(&self) -> String {
        self.id.to_string()
    }

    fn collection_name() -> &'static str {
        "plans"
    }
}
