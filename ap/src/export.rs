//! Plan export: text summary, JSON, CSV

use chrono::NaiveDate;
use std::fmt::Write as _;
use thiserror::Error;
use tracing::debug;

use crate::domain::Plan;

/// Tasks listed in the text summary
pub const TEXT_SCHEDULE_DAYS: usize = 14;

/// Goal characters kept in export filenames
pub const FILENAME_GOAL_CHARS: usize = 30;

const CSV_HEADER: &str = "Date,Task,Duration,Week,Completed";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export produced invalid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExportFormat {
    /// Markdown-style text summary
    #[default]
    Text,
    Json,
    Csv,
}

impl ExportFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Json => "json",
            Self::Csv => "csv",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "text" | "txt" | "md" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "csv" => Ok(Self::Csv),
            other => Err(format!("Unknown export format: '{}'. Supported: text, json, csv", other)),
        }
    }
}

/// Render a plan in the given format
pub fn export(plan: &Plan, format: ExportFormat) -> Result<String, ExportError> {
    debug!(id = plan.id, ?format, "export: called");
    match format {
        ExportFormat::Text => Ok(export_text(plan)),
        ExportFormat::Json => export_json(plan),
        ExportFormat::Csv => export_csv(plan),
    }
}

/// Markdown-ish summary with the roadmap and the first two weeks of tasks
pub fn export_text(plan: &Plan) -> String {
    let mut out = String::new();
    // Writing to a String cannot fail
    let _ = writeln!(out, "# {}\n", plan.goal);
    let _ = writeln!(out, "**Duration:** {}", plan.duration);
    let _ = writeln!(out, "**Daily Time:** {}", plan.daily_time);
    let _ = writeln!(out, "**Mode:** {}", plan.mode);
    let _ = writeln!(out, "**Created:** {}\n", plan.created_at.format("%Y-%m-%d"));

    let _ = writeln!(out, "## Weekly Roadmap\n");
    for week in &plan.weeks {
        let _ = writeln!(out, "### Week {}: {}\n", week.week, week.title);
        for topic in &week.topics {
            let _ = writeln!(out, "- {}", topic);
        }
        out.push('\n');
    }

    let _ = writeln!(out, "## Daily Schedule\n");
    for task in plan.daily_schedule.iter().take(TEXT_SCHEDULE_DAYS) {
        let _ = writeln!(out, "**{}:** {} ({})", task.date, task.task, task.duration);
    }
    out
}

/// Pretty-printed JSON of the whole plan
pub fn export_json(plan: &Plan) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(plan)?)
}

/// One quoted row per scheduled day; the Week column is the week title
pub fn export_csv(plan: &Plan) -> Result<String, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    for task in &plan.daily_schedule {
        writer.write_record([
            task.date.to_string(),
            task.task.clone(),
            task.duration.clone(),
            task.week_title.clone(),
            task.completed.to_string(),
        ])?;
    }

    let rows = writer.into_inner().map_err(|e| ExportError::Io(e.into_error()))?;
    Ok(format!("{}\n{}", CSV_HEADER, String::from_utf8(rows)?))
}

/// `ApexPlanner_{goal}_{date}.{ext}` with non-alphanumerics replaced by `_`
pub fn export_filename(plan: &Plan, format: ExportFormat, today: NaiveDate) -> String {
    let goal: String = plan
        .goal
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .take(FILENAME_GOAL_CHARS)
        .collect();
    format!("ApexPlanner_{}_{}.{}", goal, today.format("%Y-%m-%d"), format.extension())
}
