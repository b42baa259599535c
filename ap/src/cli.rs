//! CLI command definitions and subcommands

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::debug;

use crate::domain::{Experience, Mode};
use crate::export::ExportFormat;

/// ApexPlanner - turn goals into roadmaps and daily schedules
#[derive(Parser)]
#[command(
    name = "ap",
    about = "Turn long-term goals into weekly roadmaps and daily schedules",
    version
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Log level (TRACE, DEBUG, INFO, WARN, ERROR)
    #[arg(
        short = 'l',
        long = "log-level",
        global = true,
        help = "Log level (TRACE, DEBUG, INFO, WARN, ERROR)"
    )]
    pub log_level: Option<String>,

    /// Override the store directory
    #[arg(short, long, global = true)]
    pub store: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Generate a new plan for a goal and save it
    Generate {
        /// What you want to achieve (at least 10 characters)
        goal: String,

        /// Time frame, e.g. "2 weeks", "3 months", "1 year"
        #[arg(short, long, default_value = "1 month")]
        duration: String,

        /// Daily available time, e.g. "1 hour"
        #[arg(short = 't', long, default_value = "1 hour")]
        daily_time: String,

        /// Learning, Career, Assignment or Habit
        #[arg(short, long, default_value = "learning")]
        mode: Mode,

        /// Beginner, "Some Experience", Intermediate or Advanced
        #[arg(short, long)]
        experience: Option<Experience>,

        /// Preferred days, e.g. "weekdays"
        #[arg(short, long, default_value = "")]
        preferred_days: String,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// List saved plans
    List,

    /// Show a plan (latest when no id is given)
    Show {
        /// Plan id
        id: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },

    /// Show a month of the schedule
    Calendar {
        /// Plan id (latest when omitted)
        id: Option<String>,

        /// Month to show as YYYY-MM (defaults to the plan's first month)
        #[arg(short, long)]
        month: Option<String>,
    },

    /// Toggle completion of the task on a date
    Toggle {
        /// Date as YYYY-MM-DD
        date: NaiveDate,

        /// Plan id (latest when omitted)
        #[arg(short, long)]
        plan: Option<String>,
    },

    /// Export a plan as text, JSON or CSV
    Export {
        /// Plan id (latest when omitted)
        id: Option<String>,

        /// Export format (text, json, csv)
        #[arg(short, long, default_value = "text")]
        format: ExportFormat,

        /// Output file; "-" for stdout. Defaults to a generated filename
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Show plan statistics
    Insights {
        /// Plan id (latest when omitted)
        id: Option<String>,
    },

    /// Manage daily reminders
    Remind {
        #[command(subcommand)]
        command: RemindCommand,
    },
}

/// Reminder subcommands
#[derive(Debug, Subcommand)]
pub enum RemindCommand {
    /// Show reminder settings
    Show,

    /// Update reminder settings
    Set {
        /// Email address for reminders
        #[arg(long)]
        email: Option<String>,

        /// Reminder time as HH:MM
        #[arg(long)]
        time: Option<String>,

        /// Turn reminders on
        #[arg(long, conflicts_with = "disable")]
        enable: bool,

        /// Turn reminders off
        #[arg(long)]
        disable: bool,
    },

    /// Print today's reminder, if one is due
    Check {
        /// Plan id (latest when omitted)
        #[arg(short, long)]
        plan: Option<String>,
    },
}

/// Output format for plan display
#[derive(Clone, Debug, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        debug!(%s, "OutputFormat::from_str: called");
        match s.to_lowercase().as_str() {
            "text" | "plain" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}. Use text or json", s)),
        }
    }
}

/// Parse a YYYY-MM month argument
pub fn parse_month(value: &str) -> Result<(i32, u32), String> {
    let (year, month) = value
        .split_once('-')
        .ok_or_else(|| format!("Invalid month '{}', expected YYYY-MM", value))?;
    let year: i32 = year.parse().map_err(|_| format!("Invalid year in '{}'", value))?;
    let month: u32 = month.parse().map_err(|_| format!("Invalid month in '{}'", value))?;
    if !(1..=12).contains(&month) {
        return Err(format!("Month must be 1-12, got {}", month));
    }
    Ok((year, month))
}

/// Get the log file path
pub fn get_log_path() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("apexplanner")
        .join("logs")
        .join("apexplanner.log")
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_generate_defaults() {
        let cli = Cli::try_parse_from(["ap", "generate", "Learn Rust for systems work"]).unwrap();
        match cli.command {
            Command::Generate {
                goal,
                duration,
                daily_time,
                mode,
                experience,
                ..
            } => {
                assert_eq!(goal, "Learn Rust for systems work");
                assert_eq!(duration, "1 month");
                assert_eq!(daily_time, "1 hour");
                assert_eq!(mode, Mode::Learning);
                assert!(experience.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_toggle_date() {
        let cli = Cli::try_parse_from(["ap", "toggle", "2024-06-03", "--plan", "42"]).unwrap();
        match cli.command {
            Command::Toggle { date, plan } => {
                assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
                assert_eq!(plan.as_deref(), Some("42"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
        assert!(Cli::try_parse_from(["ap", "toggle", "June 3rd"]).is_err());
    }

    #[test]
    fn test_parse_export_format() {
        let cli = Cli::try_parse_from(["ap", "export", "--format", "csv"]).unwrap();
        assert!(matches!(
            cli.command,
            Command::Export {
                format: ExportFormat::Csv,
                ..
            }
        ));
        assert!(Cli::try_parse_from(["ap", "export", "--format", "pdf"]).is_err());
    }

    #[test]
    fn test_remind_enable_disable_conflict() {
        assert!(Cli::try_parse_from(["ap", "remind", "set", "--enable", "--disable"]).is_err());
    }

    #[test]
    fn test_parse_month() {
        assert_eq!(parse_month("2024-06"), Ok((2024, 6)));
        assert!(parse_month("2024-13").is_err());
        assert!(parse_month("June").is_err());
    }
}
