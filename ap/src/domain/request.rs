//! PlanRequest - what the user asked for

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::PlanError;

/// Minimum length of a trimmed goal
pub const MIN_GOAL_CHARS: usize = 10;

/// Duration choices offered to users
pub const DURATION_CHOICES: &[&str] = &["2 weeks", "1 month", "2 months", "3 months", "6 months", "1 year"];

/// Daily time choices offered to users
pub const DAILY_TIME_CHOICES: &[&str] = &["0.5 hours", "1 hour", "1.5 hours", "2 hours", "3 hours", "4 hours"];

/// Planning mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Mode {
    /// Skill development and knowledge acquisition
    #[default]
    Learning,
    /// Career advancement and professional growth
    Career,
    /// Academic assignments and project deadlines
    Assignment,
    /// Building healthy habits and routines
    Habit,
}

impl Mode {
    /// Short description of what the mode focuses on
    pub fn description(&self) -> &'static str {
        match self {
            Self::Learning => "Focus on skill development and knowledge acquisition",
            Self::Career => "Career advancement and professional growth",
            Self::Assignment => "Academic assignments and project deadlines",
            Self::Habit => "Building healthy habits and routines",
        }
    }
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Learning => write!(f, "Learning"),
            Self::Career => write!(f, "Career"),
            Self::Assignment => write!(f, "Assignment"),
            Self::Habit => write!(f, "Habit"),
        }
    }
}

impl std::str::FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "learning" => Ok(Self::Learning),
            "career" => Ok(Self::Career),
            "assignment" => Ok(Self::Assignment),
            "habit" => Ok(Self::Habit),
            other => Err(format!(
                "Unknown mode: '{}'. Supported: Learning, Career, Assignment, Habit",
                other
            )),
        }
    }
}

/// Self-reported experience level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Experience {
    Beginner,
    #[serde(rename = "Some Experience")]
    SomeExperience,
    Intermediate,
    Advanced,
}

impl std::fmt::Display for Experience {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Beginner => write!(f, "Beginner"),
            Self::SomeExperience => write!(f, "Some Experience"),
            Self::Intermediate => write!(f, "Intermediate"),
            Self::Advanced => write!(f, "Advanced"),
        }
    }
}

impl std::str::FromStr for Experience {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized: String = s
            .trim()
            .to_lowercase()
            .chars()
            .filter(|c| c.is_alphanumeric())
            .collect();
        match normalized.as_str() {
            "beginner" => Ok(Self::Beginner),
            "someexperience" => Ok(Self::SomeExperience),
            "intermediate" => Ok(Self::Intermediate),
            "advanced" => Ok(Self::Advanced),
            _ => Err(format!(
                "Unknown experience level: '{}'. Supported: Beginner, Some Experience, Intermediate, Advanced",
                s
            )),
        }
    }
}

/// Convert a duration label such as "2 weeks" or "3 months" into weeks
///
/// Months count as four weeks and anything that is neither weeks nor months
/// is treated as years of 52 weeks. Returns None when the label has no
/// leading positive integer.
pub fn duration_weeks(duration: &str) -> Option<u32> {
    let trimmed = duration.trim();
    let digits: String = trimmed.chars().take_while(|c| c.is_ascii_digit()).collect();
    let count: u32 = digits.parse().ok()?;
    if count == 0 {
        return None;
    }

    let lower = trimmed.to_lowercase();
    let weeks = if lower.contains("month") {
        count.checked_mul(4)?
    } else if lower.contains("week") {
        count
    } else {
        count.checked_mul(52)?
    };
    debug!(%duration, weeks, "duration_weeks: parsed");
    Some(weeks)
}

/// Leading decimal number of a daily time label ("1.5 hours" -> 1.5)
pub fn daily_hours(daily_time: &str) -> Option<f64> {
    let number: String = daily_time
        .trim()
        .chars()
        .take_while(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    number.parse().ok()
}

/// Input for generating a plan
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlanRequest {
    /// Free-text goal
    pub goal: String,

    /// Duration label, e.g. "2 weeks"
    pub duration: String,

    /// Daily time label, e.g. "1 hour"
    pub daily_time: String,

    /// Planning mode
    pub mode: Option<Mode>,

    /// Optional experience level
    pub experience: Option<Experience>,

    /// Advisory scheduling preference
    #[serde(default)]
    pub preferred_days: String,
}

impl PlanRequest {
    /// Create a request with the required fields and Learning mode
    pub fn new(goal: impl Into<String>, duration: impl Into<String>, daily_time: impl Into<String>) -> Self {
        Self {
            goal: goal.into(),
            duration: duration.into(),
            daily_time: daily_time.into(),
            mode: Some(Mode::Learning),
            experience: None,
            preferred_days: String::new(),
        }
    }

    pub fn with_mode(mut self, mode: Mode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_experience(mut self, experience: Experience) -> Self {
        self.experience = Some(experience);
        self
    }

    pub fn with_preferred_days(mut self, preferred_days: impl Into<String>) -> Self {
        self.preferred_days = preferred_days.into();
        self
    }

    /// Collect every user-facing validation problem
    pub fn validation_errors(&self) -> Vec<String> {
        let mut errors = Vec::new();

        let goal = self.goal.trim();
        if goal.is_empty() {
            errors.push("Please enter your goal".to_string());
        } else if goal.chars().count() < MIN_GOAL_CHARS {
            errors.push(format!(
                "Please provide a more detailed goal (at least {} characters)",
                MIN_GOAL_CHARS
            ));
        }

        if self.duration.trim().is_empty() {
            errors.push("Please select a duration".to_string());
        } else if duration_weeks(&self.duration).is_none() {
            errors.push(format!("Unrecognized duration '{}'", self.duration.trim()));
        }

        if self.daily_time.trim().is_empty() {
            errors.push("Please specify daily available time".to_string());
        }

        if self.mode.is_none() {
            errors.push("Please select a mode".to_string());
        }

        errors
    }

    /// Validate and return the requested number of weeks
    pub fn validate(&self) -> Result<u32, PlanError> {
        let errors = self.validation_errors();
        if !errors.is_empty() {
            debug!(count = errors.len(), "validate: request rejected");
            return Err(PlanError::Validation(errors));
        }
        duration_weeks(&self.duration).ok_or_else(|| PlanError::Validation(vec!["Please select a duration".into()]))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_weeks_choices() {
        assert_eq!(duration_weeks("2 weeks"), Some(2));
        assert_eq!(duration_weeks("1 month"), Some(4));
        assert_eq!(duration_weeks("3 months"), Some(12));
        assert_eq!(duration_weeks("6 months"), Some(24));
        assert_eq!(duration_weeks("1 year"), Some(52));
    }

    #[test]
    fn test_duration_weeks_rejects_garbage() {
        assert_eq!(duration_weeks(""), None);
        assert_eq!(duration_weeks("soon"), None);
        assert_eq!(duration_weeks("0 weeks"), None);
        assert_eq!(duration_weeks("1 Week"), Some(1));
    }

    #[test]
    fn test_daily_hours() {
        assert_eq!(daily_hours("1 hour"), Some(1.0));
        assert_eq!(daily_hours("1.5 hours"), Some(1.5));
        assert_eq!(daily_hours("0.5 hours"), Some(0.5));
        assert_eq!(daily_hours("an hour"), None);
    }

    #[test]
    fn test_mode_parse_and_display() {
        assert_eq!("career".parse::<Mode>().unwrap(), Mode::Career);
        assert_eq!(" Habit ".parse::<Mode>().unwrap(), Mode::Habit);
        assert!("sleeping".parse::<Mode>().is_err());
        assert_eq!(Mode::Assignment.to_string(), "Assignment");
    }

    #[test]
    fn test_experience_parse_and_serde() {
        assert_eq!(
            "some experience".parse::<Experience>().unwrap(),
            Experience::SomeExperience
        );
        assert_eq!("Some-Experience".parse::<Experience>().unwrap(), Experience::SomeExperience);
        let json = serde_json::to_string(&Experience::SomeExperience).unwrap();
        assert_eq!(json, "\"Some Experience\"");
    }

    #[test]
    fn test_valid_request() {
        let request = PlanRequest::new("Learn SQL and Java for backend development", "2 weeks", "1 hour");
        assert!(request.validation_errors().is_empty());
        assert_eq!(request.validate().unwrap(), 2);
    }

    #[test]
    fn test_all_fields_missing_collects_every_message() {
        let request = PlanRequest {
            mode: None,
            ..Default::default()
        };
        let errors = request.validation_errors();
        assert_eq!(
            errors,
            vec![
                "Please enter your goal".to_string(),
                "Please select a duration".to_string(),
                "Please specify daily available time".to_string(),
                "Please select a mode".to_string(),
            ]
        );
    }

    #[test]
    fn test_short_goal_rejected() {
        let request = PlanRequest::new("  Learn  ", "2 weeks", "1 hour");
        let err = request.validate().unwrap_err();
        match err {
            PlanError::Validation(messages) => {
                assert_eq!(messages.len(), 1);
                assert!(messages[0].contains("at least 10 characters"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_request_serde_uses_camel_case() {
        let request = PlanRequest::new("Learn Rust properly", "1 month", "2 hours")
            .with_experience(Experience::Beginner)
            .with_preferred_days("weekends");
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["dailyTime"], "2 hours");
        assert_eq!(json["preferredDays"], "weekends");
        assert_eq!(json["mode"], "Learning");
    }
}
