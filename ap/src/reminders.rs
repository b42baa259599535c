//! Daily reminder settings and selection

use std::sync::LazyLock;

use chrono::{NaiveDate, NaiveTime};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::domain::{Plan, Store};
use crate::error::PlanError;

/// Store key for the settings document
pub const REMINDERS_KEY: &str = "reminders";

/// Default reminder time
pub const DEFAULT_TIME: &str = "09:00";

static EMAIL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

static HH_MM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}$").expect("valid time regex"));

fn default_time() -> String {
    DEFAULT_TIME.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderSettings {
    #[serde(default)]
    pub email: String,

    #[serde(default)]
    pub enabled: bool,

    /// Local time of day, HH:MM
    #[serde(default = "default_time")]
    pub time: String,
}

impl Default for ReminderSettings {
    fn default() -> Self {
        Self {
            email: String::new(),
            enabled: false,
            time: default_time(),
        }
    }
}

impl ReminderSettings {
    /// Load from the store, falling back to defaults when absent
    pub fn load(store: &Store) -> Result<Self, PlanError> {
        let settings = store
            .get::<Self>(REMINDERS_KEY)
            .map_err(|e| PlanError::Storage(format!("{:#}", e)))?
            .unwrap_or_default();
        debug!(enabled = settings.enabled, "ReminderSettings::load: done");
        Ok(settings)
    }

    /// Validate then persist
    pub fn save(&self, store: &Store) -> Result<(), PlanError> {
        self.validate()?;
        store
            .set(REMINDERS_KEY, self)
            .map_err(|e| PlanError::Storage(format!("{:#}", e)))
    }

    /// Check the time format and, when set, the email shape
    pub fn validate(&self) -> Result<(), PlanError> {
        let mut errors = Vec::new();
        if !HH_MM.is_match(&self.time) || NaiveTime::parse_from_str(&self.time, "%H:%M").is_err() {
            errors.push(format!("Invalid reminder time '{}', expected HH:MM", self.time));
        }
        let email = self.email.trim();
        if !email.is_empty() && !EMAIL.is_match(email) {
            errors.push(format!("Invalid email address '{}'", email));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(PlanError::Validation(errors))
        }
    }

    /// Confirmation shown after saving, when there is someone to remind
    pub fn confirmation(&self) -> Option<String> {
        let email = self.email.trim();
        (self.enabled && !email.is_empty()).then(|| format!("Reminders enabled for {}", email))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Reminder {
    pub date: NaiveDate,
    pub task: String,
    pub message: String,
}

/// The reminder due today, if reminders are on and today's task is open
pub fn due_reminder(settings: &ReminderSettings, plan: &Plan, today: NaiveDate) -> Option<Reminder> {
    if !settings.enabled {
        debug!("due_reminder: reminders disabled");
        return None;
    }
    let task = plan
        .daily_schedule
        .iter()
        .find(|t| t.date == today && !t.completed)?;
    Some(Reminder {
        date: today,
        task: task.task.clone(),
        message: format!("Don't forget: {}", task.task),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roadmap::build_roadmap;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 3).unwrap()
    }

    fn plan() -> Plan {
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let roadmap = build_roadmap("Week 1: Arrays\n- Array basics\n- Sorting", "Master arrays", 1, "1 hour", start);
        Plan {
            id: 1,
            goal: "Master arrays".to_string(),
            duration: "1 week".to_string(),
            daily_time: "1 hour".to_string(),
            mode: Default::default(),
            experience: None,
            preferred_days: String::new(),
            created_at: Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
            weeks: roadmap.weeks,
            tips: vec![],
            milestones: vec![],
            daily_schedule: roadmap.daily_schedule,
            raw_ai_response: String::new(),
        }
    }

    fn enabled() -> ReminderSettings {
        ReminderSettings {
            enabled: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_due_reminder_for_open_task() {
        let reminder = due_reminder(&enabled(), &plan(), today()).unwrap();
        // day 2: 2 % 2 = 0 -> first topic
        assert_eq!(reminder.message, "Don't forget: Array basics");
        assert_eq!(reminder.date, today());
    }

    #[test]
    fn test_no_reminder_when_disabled_done_or_unscheduled() {
        let mut plan = plan();
        assert!(due_reminder(&ReminderSettings::default(), &plan, today()).is_none());

        plan.toggle_completed(today()).unwrap();
        assert!(due_reminder(&enabled(), &plan, today()).is_none());

        let later = NaiveDate::from_ymd_opt(2024, 7, 1).unwrap();
        assert!(due_reminder(&enabled(), &plan, later).is_none());
    }

    #[test]
    fn test_validate() {
        assert!(ReminderSettings::default().validate().is_ok());

        let bad_time = ReminderSettings {
            time: "9am".to_string(),
            ..Default::default()
        };
        assert!(bad_time.validate().is_err());

        let out_of_range = ReminderSettings {
            time: "25:00".to_string(),
            ..Default::default()
        };
        assert!(out_of_range.validate().is_err());

        let bad_email = ReminderSettings {
            email: "not-an-email".to_string(),
            ..Default::default()
        };
        let err = bad_email.validate().unwrap_err();
        assert_eq!(err.messages(), vec!["Invalid email address 'not-an-email'".to_string()]);

        let good = ReminderSettings {
            email: "me@example.com".to_string(),
            enabled: true,
            time: "18:30".to_string(),
        };
        assert!(good.validate().is_ok());
        assert_eq!(good.confirmation().as_deref(), Some("Reminders enabled for me@example.com"));
    }

    #[test]
    fn test_load_defaults_and_save() {
        let temp = TempDir::new().unwrap();
        let store = Store::open(temp.path()).unwrap();

        assert_eq!(ReminderSettings::load(&store).unwrap(), ReminderSettings::default());

        let settings = ReminderSettings {
            email: "me@example.com".to_string(),
            enabled: true,
            time: "07:15".to_string(),
        };
        settings.save(&store).unwrap();
        assert_eq!(ReminderSettings::load(&store).unwrap(), settings);
    }

    #[test]
    fn test_load_partial_document() {
        let temp = TempDir::new().unwrap();
        let store = Store::open(temp.path()).unwrap();
        store.set_raw(REMINDERS_KEY, r#"{"enabled": true}"#).unwrap();

        let settings = ReminderSettings::load(&store).unwrap();
        assert!(settings.enabled);
        assert_eq!(settings.time, "09:00");
    }

    #[test]
    fn test_invalid_settings_not_saved() {
        let temp = TempDir::new().unwrap();
        let store = Store::open(temp.path()).unwrap();
        let settings = ReminderSettings {
            time: "noon".to_string(),
            ..Default::default()
        };
        assert!(settings.save(&store).is_err());
        assert!(store.get_raw(REMINDERS_KEY).unwrap().is_none());
    }
}
