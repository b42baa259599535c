//! ApexPlanner CLI entry point

use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, Utc};
use clap::Parser;
use colored::*;
use eyre::{Context, Result, bail};
use tracing::{debug, info};

use apexplanner::cli::{Cli, Command, OutputFormat, RemindCommand, get_log_path, parse_month};
use apexplanner::config::Config;
use apexplanner::domain::{Experience, Mode, Plan, PlanRequest};
use apexplanner::export::{ExportFormat, export, export_filename};
use apexplanner::insights::Insights;
use apexplanner::llm::create_client;
use apexplanner::prompts::PromptLoader;
use apexplanner::reminders::{ReminderSettings, due_reminder};
use apexplanner::repository::{PlanRepository, StoreRepository};
use apexplanner::{AssemblerSettings, PlanAssembler, PlanError, month_grid};

fn setup_logging(cli_log_level: Option<&str>, config_log_level: Option<&str>) -> Result<()> {
    // Note: Can't log params here since logging isn't initialized yet
    let log_path = get_log_path();
    if let Some(log_dir) = log_path.parent() {
        fs::create_dir_all(log_dir).context("Failed to create log directory")?;
    }

    // Determine log level with priority: CLI --log-level > config file > default (INFO)
    let level = match cli_log_level.or(config_log_level).map(|s| s.to_uppercase()) {
        Some(s) => match s.as_str() {
            "TRACE" => tracing::Level::TRACE,
            "DEBUG" => tracing::Level::DEBUG,
            "INFO" => tracing::Level::INFO,
            "WARN" | "WARNING" => tracing::Level::WARN,
            "ERROR" => tracing::Level::ERROR,
            _ => {
                eprintln!("Warning: Unknown log-level '{}', defaulting to INFO", s);
                tracing::Level::INFO
            }
        },
        None => tracing::Level::INFO,
    };

    let log_file = fs::File::create(&log_path).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (level: {:?})", level);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load log level from config file early (before full config load)
    let config_log_level = Config::load_log_level(cli.config.as_ref());
    setup_logging(cli.log_level.as_deref(), config_log_level.as_deref()).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;
    let store_dir = cli.store.clone().unwrap_or_else(|| config.storage.store_dir.clone());
    let repo = StoreRepository::open(&store_dir).context(format!("Failed to open store at {}", store_dir.display()))?;
    info!("ApexPlanner using store at {}", store_dir.display());

    debug!(command = ?cli.command, "main: dispatching command");
    match cli.command {
        Command::Generate {
            goal,
            duration,
            daily_time,
            mode,
            experience,
            preferred_days,
            format,
        } => {
            let request = build_request(goal, duration, daily_time, mode, experience, preferred_days);
            cmd_generate(&config, &repo, request, format).await
        }
        Command::List => cmd_list(&repo),
        Command::Show { id, format } => cmd_show(&repo, id.as_deref(), format),
        Command::Calendar { id, month } => cmd_calendar(&repo, id.as_deref(), month.as_deref()),
        Command::Toggle { date, plan } => cmd_toggle(&repo, plan.as_deref(), date),
        Command::Export { id, format, output } => cmd_export(&repo, id.as_deref(), format, output),
        Command::Insights { id } => cmd_insights(&repo, id.as_deref()),
        Command::Remind { command } => cmd_remind(&repo, command),
    }
}

fn build_request(
    goal: String,
    duration: String,
    daily_time: String,
    mode: Mode,
    experience: Option<Experience>,
    preferred_days: String,
) -> PlanRequest {
    let mut request = PlanRequest::new(goal, duration, daily_time)
        .with_mode(mode)
        .with_preferred_days(preferred_days);
    request.experience = experience;
    request
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Resolve an explicit plan id or fall back to the latest plan
fn select_plan(repo: &StoreRepository, id: Option<&str>) -> Result<Plan> {
    match id {
        Some(id) => Ok(repo.find_plan(id)?),
        None => match repo.latest_plan()? {
            Some(plan) => Ok(plan),
            None => bail!("No plans saved yet. Run `ap generate \"<goal>\"` first."),
        },
    }
}

async fn cmd_generate(config: &Config, repo: &StoreRepository, request: PlanRequest, format: OutputFormat) -> Result<()> {
    debug!(goal = %request.goal, "cmd_generate: called");

    // Reject bad input before touching the network or the API key
    if let Err(e) = request.validate() {
        for message in e.messages() {
            eprintln!("{} {}", "✗".red(), message);
        }
        bail!("Invalid plan request");
    }

    config.validate()?;
    let client = create_client(&config.llm).context("Failed to create LLM client")?;
    let assembler = Arc::new(PlanAssembler::new(
        client,
        PromptLoader::new(&config.prompts.dir),
        AssemblerSettings::from_config(config),
    ));

    let canceller = assembler.clone();
    let ctrl_c = tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            canceller.cancel();
        }
    });

    eprintln!("{} Generating roadmap for: {}", "→".cyan(), request.goal.bold());
    let result = assembler.generate_and_save(&request, repo).await;
    ctrl_c.abort();

    let plan = match result {
        Ok(plan) => plan,
        Err(PlanError::Cancelled) => {
            eprintln!("{} Generation cancelled", "✗".yellow());
            return Ok(());
        }
        Err(e) => {
            if e.is_transient() {
                eprintln!("{} This looks temporary, try again in a moment", "!".yellow());
            }
            return Err(e).context("Plan generation failed");
        }
    };

    eprintln!("{} Saved plan {}", "✓".green(), plan.id.to_string().cyan());
    print_plan(&plan, &format)
}

fn cmd_list(repo: &StoreRepository) -> Result<()> {
    let plans = repo.load_plans()?;
    if plans.is_empty() {
        println!("No plans found");
        return Ok(());
    }
    for plan in plans {
        let progress = plan.progress();
        println!(
            "{}  {}  {}",
            plan.id.to_string().cyan(),
            plan.summary(),
            format!("{}/{} done", progress.completed, progress.total).dimmed()
        );
    }
    Ok(())
}

fn cmd_show(repo: &StoreRepository, id: Option<&str>, format: OutputFormat) -> Result<()> {
    let plan = select_plan(repo, id)?;
    print_plan(&plan, &format)
}

fn print_plan(plan: &Plan, format: &OutputFormat) -> Result<()> {
    if let OutputFormat::Json = format {
        println!("{}", serde_json::to_string_pretty(plan)?);
        return Ok(());
    }

    println!("{}", plan.goal.bold());
    println!(
        "{} | {} | {} | created {}",
        plan.duration,
        plan.daily_time,
        plan.mode,
        plan.created_at.format("%Y-%m-%d")
    );
    println!();

    for week in &plan.weeks {
        println!("{} {}", format!("Week {}:", week.week).cyan().bold(), week.title);
        for topic in &week.topics {
            println!("  - {}", topic);
        }
        if !week.description.is_empty() {
            println!("  {}", week.description.dimmed());
        }
    }

    if !plan.tips.is_empty() {
        println!("\n{}", "Tips".bold());
        for tip in &plan.tips {
            println!("  - {}", tip);
        }
    }

    if !plan.milestones.is_empty() {
        println!("\n{}", "Milestones".bold());
        for milestone in &plan.milestones {
            println!("  - {}", milestone);
        }
    }

    println!("\n{}", "First week".bold());
    for task in plan.daily_schedule.iter().take(7) {
        let mark = if task.completed { "✓".green() } else { " ".normal() };
        println!("  {} {} {} {}", mark, task.date, task.task, format!("[{}]", task.task_type).dimmed());
    }
    Ok(())
}

fn cmd_calendar(repo: &StoreRepository, id: Option<&str>, month: Option<&str>) -> Result<()> {
    let plan = select_plan(repo, id)?;
    let (year, month) = match month {
        Some(value) => parse_month(value).map_err(|e| eyre::eyre!(e))?,
        None => {
            let anchor = plan.date_range().map(|(first, _)| first).unwrap_or_else(today);
            (anchor.year(), anchor.month())
        }
    };
    let grid = month_grid(year, month).ok_or_else(|| eyre::eyre!("Invalid month {}-{:02}", year, month))?;

    println!("{}", format!("{}-{:02}", year, month).bold());
    println!("Su  Mo  Tu  We  Th  Fr  Sa");
    for week in grid.chunks(7) {
        let row: Vec<String> = week
            .iter()
            .map(|cell| match cell {
                None => "    ".to_string(),
                Some(date) => {
                    let label = format!("{:>2}", date.day());
                    match plan.task_for_date(*date) {
                        Some(task) if task.completed => format!("{}  ", label.green()),
                        Some(_) => format!("{}  ", label.cyan()),
                        None => format!("{}  ", label.dimmed()),
                    }
                }
            })
            .collect();
        println!("{}", row.join("").trim_end());
    }

    let progress = plan.progress();
    println!(
        "\n{} completed, {} remaining ({}%)",
        progress.completed.to_string().green(),
        progress.remaining(),
        progress.percent()
    );
    if let Some(task) = plan.task_for_date(today()) {
        println!("Today: {}", task.task);
    }
    Ok(())
}

fn cmd_toggle(repo: &StoreRepository, id: Option<&str>, date: NaiveDate) -> Result<()> {
    let plan = select_plan(repo, id)?;
    let completed = repo.toggle_task(&plan.id.to_string(), date)?;
    let task = plan.task_for_date(date).map(|t| t.task.as_str()).unwrap_or_default();
    if completed {
        println!("{} {} {}", "✓".green(), date, task);
    } else {
        println!("{} {} {}", "○".yellow(), date, task);
    }
    Ok(())
}

fn cmd_export(repo: &StoreRepository, id: Option<&str>, format: ExportFormat, output: Option<PathBuf>) -> Result<()> {
    let plan = select_plan(repo, id)?;
    let content = export(&plan, format).context("Failed to export plan")?;

    let path = output.unwrap_or_else(|| PathBuf::from(export_filename(&plan, format, today())));
    if path.as_os_str() == "-" {
        print!("{}", content);
        return Ok(());
    }

    fs::write(&path, content).context(format!("Failed to write {}", path.display()))?;
    println!("{} Exported to {}", "✓".green(), path.display().to_string().cyan());
    Ok(())
}

fn cmd_insights(repo: &StoreRepository, id: Option<&str>) -> Result<()> {
    let plan = select_plan(repo, id)?;
    let insights = Insights::from_plan(&plan);
    println!("{}", plan.goal.bold());
    println!("  Total time:     {} hours", insights.estimated_hours);
    println!("  Weekly pace:    {} tasks/week", insights.avg_tasks_per_week);
    println!("  Duration:       {} weeks", insights.total_weeks);
    println!("  Total tasks:    {}", insights.total_tasks);
    println!("  Mode:           {} ({})", insights.mode, insights.mode.description().dimmed());
    Ok(())
}

fn cmd_remind(repo: &StoreRepository, command: RemindCommand) -> Result<()> {
    let store = repo.store();
    match command {
        RemindCommand::Show => {
            let settings = ReminderSettings::load(store)?;
            let state = if settings.enabled { "enabled".green() } else { "disabled".yellow() };
            println!("Reminders: {}", state);
            println!("  Time:  {}", settings.time);
            println!(
                "  Email: {}",
                if settings.email.is_empty() { "-" } else { settings.email.as_str() }
            );
        }
        RemindCommand::Set {
            email,
            time,
            enable,
            disable,
        } => {
            let mut settings = ReminderSettings::load(store)?;
            if let Some(email) = email {
                settings.email = email.trim().to_string();
            }
            if let Some(time) = time {
                settings.time = time.trim().to_string();
            }
            if enable {
                settings.enabled = true;
            }
            if disable {
                settings.enabled = false;
            }
            if let Err(e) = settings.save(store) {
                for message in e.messages() {
                    eprintln!("{} {}", "✗".red(), message);
                }
                bail!("Reminder settings not saved");
            }
            println!("{} Reminder settings saved", "✓".green());
            if let Some(confirmation) = settings.confirmation() {
                println!("{}", confirmation);
            }
        }
        RemindCommand::Check { plan } => {
            let settings = ReminderSettings::load(store)?;
            let plan = select_plan(repo, plan.as_deref())?;
            match due_reminder(&settings, &plan, today()) {
                Some(reminder) => println!("{}", reminder.message.bold()),
                None if !settings.enabled => println!("Reminders are disabled"),
                None => println!("No reminder due today"),
            }
        }
    }
    Ok(())
}
