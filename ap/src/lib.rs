//! ApexPlanner - goal planning with a language model
//!
//! ApexPlanner turns a free-text goal into a weekly learning roadmap, a set of
//! tips and milestones, and a day-by-day task schedule. The model writes
//! loosely structured text; everything after that is deterministic.
//!
//! # Core Concepts
//!
//! - **Best-effort parsing**: model output is never rejected, only degraded
//! - **Padding is separate**: missing weeks are synthesized after parsing
//! - **Mechanical schedule**: one task per day, overview first, review last
//! - **One generation at a time**: a second concurrent request is refused
//!
//! # Modules
//!
//! - [`roadmap`] - Response parser, week padding and schedule expansion
//! - [`assembler`] - Request to Plan orchestration
//! - [`llm`] - LlmClient trait with Cohere and OpenAI implementations
//! - [`repository`] - Plan persistence over planstore
//! - [`calendar`], [`export`], [`reminders`], [`insights`] - Views over a Plan
//! - [`config`] - Configuration types and loading
//! - [`cli`] - Command-line interface

pub mod assembler;
pub mod calendar;
pub mod cli;
pub mod config;
pub mod domain;
pub mod error;
pub mod export;
pub mod insights;
pub mod llm;
pub mod prompts;
pub mod reminders;
pub mod repository;
pub mod roadmap;

// Re-export commonly used types
pub use assembler::{AssemblerSettings, PlanAssembler};
pub use calendar::{Progress, month_grid};
pub use config::{Config, LlmConfig};
pub use domain::{Experience, Mode, Plan, PlanRequest, TaskEntry, TaskType, WeekEntry};
pub use error::PlanError;
pub use export::{ExportFormat, export, export_filename};
pub use insights::Insights;
pub use llm::{LlmClient, LlmError, create_client};
pub use reminders::{Reminder, ReminderSettings, due_reminder};
pub use repository::{MemoryRepository, PlanRepository, StoreRepository};
pub use roadmap::{Roadmap, build_roadmap, parse_response};
