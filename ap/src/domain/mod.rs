//! Domain types for ApexPlanner
//!
//! PlanRequest is the user input, Plan is the persisted roadmap with its
//! WeekEntry and TaskEntry children. Plan implements the planstore Record
//! trait so it can be kept in the `plans` collection.

mod plan;
mod request;

pub use plan::{MAX_MILESTONES, MAX_TIPS, MAX_TOPICS_PER_WEEK, Plan, TaskEntry, TaskType, WeekEntry};
pub use request::{
    DAILY_TIME_CHOICES, DURATION_CHOICES, Experience, MIN_GOAL_CHARS, Mode, PlanRequest, daily_hours, duration_weeks,
};

// Re-export planstore types for convenience
pub use planstore::{Record, Store};
