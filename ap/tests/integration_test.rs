//! Integration tests for ApexPlanner
//!
//! These drive a PlanAssembler against a scripted model and a real planstore
//! directory, then exercise the views over the saved plan.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use apexplanner::domain::Store;
use apexplanner::llm::{GenerationRequest, GenerationResponse};
use apexplanner::prompts::PromptLoader;
use apexplanner::{
    AssemblerSettings, ExportFormat, Insights, LlmClient, LlmError, Mode, PlanAssembler, PlanError, PlanRepository,
    PlanRequest, ReminderSettings, StoreRepository, due_reminder, export,
};
use async_trait::async_trait;
use tempfile::TempDir;

const ARRAYS_RESPONSE: &str = "\
WEEKLY BREAKDOWN:
Week 1: Arrays
This week builds intuition for contiguous memory
- Array basics
- Sorting
Week 2: Linked Lists
- Singly linked lists
- Two pointers

LEARNING TIPS:
- Practice daily
- Explain solutions out loud

MILESTONES:
- Implement quicksort
- Reverse a linked list
";

/// Model stand-in returning canned text after an optional delay
struct ScriptedClient {
    text: String,
    delay: Duration,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedClient {
    fn new(text: &str) -> Arc<Self> {
        Self::delayed(text, Duration::ZERO)
    }

    fn delayed(text: &str, delay: Duration) -> Arc<Self> {
        Arc::new(Self {
            text: text.to_string(),
            delay,
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.prompts.lock().unwrap().len()
    }
}

#[async_trait]
impl LlmClient for ScriptedClient {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
        self.prompts.lock().unwrap().push(request.prompt);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(GenerationResponse::text(self.text.clone()))
    }

    fn provider(&self) -> &str {
        "scripted"
    }
}

/// Model stand-in that always fails
struct FailingClient;

#[async_trait]
impl LlmClient for FailingClient {
    async fn generate(&self, _request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
        Err(LlmError::ApiError {
            status: 500,
            message: "upstream exploded".to_string(),
        })
    }

    fn provider(&self) -> &str {
        "failing"
    }
}

fn assembler(client: Arc<dyn LlmClient>) -> PlanAssembler {
    PlanAssembler::new(client, PromptLoader::embedded_only(), AssemblerSettings::default())
}

fn request() -> PlanRequest {
    PlanRequest::new("Master arrays and linked lists", "2 weeks", "1 hour")
}

// =============================================================================
// Generation and persistence
// =============================================================================

#[tokio::test]
async fn test_generate_and_save_persists_plan() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repo = StoreRepository::open(temp_dir.path()).expect("Failed to open store");
    let client = ScriptedClient::new(ARRAYS_RESPONSE);
    let assembler = assembler(client.clone());

    let plan = assembler.generate_and_save(&request(), &repo).await.unwrap();

    assert_eq!(client.calls(), 1);
    assert_eq!(plan.weeks.len(), 2);
    assert_eq!(plan.weeks[0].title, "Arrays");
    assert_eq!(plan.weeks[1].title, "Linked Lists");
    assert_eq!(plan.tips, vec!["Practice daily", "Explain solutions out loud"]);
    assert_eq!(plan.milestones, vec!["Implement quicksort", "Reverse a linked list"]);
    assert_eq!(plan.daily_schedule.len(), 14);
    assert_eq!(plan.raw_ai_response, ARRAYS_RESPONSE);

    // Reopen the store to prove the plan hit disk
    let reopened = StoreRepository::open(temp_dir.path()).unwrap();
    let plans = reopened.load_plans().unwrap();
    assert_eq!(plans.len(), 1);
    assert_eq!(plans[0], plan);
    assert_eq!(reopened.latest_plan().unwrap(), Some(plan));
}

#[tokio::test]
async fn test_failed_generation_saves_nothing() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repo = StoreRepository::open(temp_dir.path()).unwrap();
    let assembler = assembler(Arc::new(FailingClient));

    let err = assembler.generate_and_save(&request(), &repo).await.unwrap_err();

    assert!(matches!(err, PlanError::Generation(_)));
    assert!(err.is_transient());
    assert!(repo.load_plans().unwrap().is_empty());
}

#[tokio::test]
async fn test_invalid_request_never_reaches_model() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repo = StoreRepository::open(temp_dir.path()).unwrap();
    let client = ScriptedClient::new(ARRAYS_RESPONSE);
    let assembler = assembler(client.clone());

    let request = PlanRequest::new("short", "", "1 hour");
    let err = assembler.generate_and_save(&request, &repo).await.unwrap_err();

    let messages = err.messages();
    assert!(messages.iter().any(|m| m.contains("more detailed goal")));
    assert!(messages.iter().any(|m| m.contains("duration")));
    assert_eq!(client.calls(), 0);
    assert!(repo.load_plans().unwrap().is_empty());
}

#[tokio::test]
async fn test_unstructured_response_is_padded() {
    let assembler = assembler(ScriptedClient::new("I'd be happy to help you with that!"));
    let request = PlanRequest::new("Learn SQL and Java for backend development", "1 month", "2 hours")
        .with_mode(Mode::Assignment);

    let plan = assembler.generate(&request).await.unwrap();

    assert_eq!(plan.weeks.len(), 4);
    assert_eq!(plan.weeks[0].title, "Learn - Week 1");
    assert_eq!(plan.daily_schedule.len(), 28);
    assert!(plan.daily_schedule.iter().all(|t| t.duration == "2 hours"));
    assert_eq!(plan.mode, Mode::Assignment);
}

#[tokio::test]
async fn test_second_generation_is_rejected_while_first_runs() {
    let client = ScriptedClient::delayed(ARRAYS_RESPONSE, Duration::from_millis(200));
    let assembler = Arc::new(assembler(client.clone()));

    let first = {
        let assembler = assembler.clone();
        tokio::spawn(async move { assembler.generate(&request()).await })
    };
    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(assembler.is_generating());

    let second = assembler.generate(&request()).await;
    assert!(matches!(second, Err(PlanError::GenerationInProgress)));

    let plan = first.await.expect("task should not panic").unwrap();
    assert_eq!(plan.weeks.len(), 2);
    assert_eq!(client.calls(), 1);
    assert!(!assembler.is_generating());
}

// =============================================================================
// Views over a saved plan
// =============================================================================

#[tokio::test]
async fn test_toggle_export_and_insights_after_save() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repo = StoreRepository::open(temp_dir.path()).unwrap();
    let plan = assembler(ScriptedClient::new(ARRAYS_RESPONSE))
        .generate_and_save(&request(), &repo)
        .await
        .unwrap();

    let id = plan.id.to_string();
    let first_day = plan.daily_schedule[0].date;

    assert!(repo.toggle_task(&id, first_day).unwrap());
    let stored = repo.find_plan(&id).unwrap();
    assert!(stored.daily_schedule[0].completed);
    assert!(stored.daily_schedule[1..].iter().all(|t| !t.completed));
    assert_eq!(stored.progress().completed, 1);

    let csv = export(&stored, ExportFormat::Csv).unwrap();
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("Date,Task,Duration,Week,Completed"));
    let first_row = lines.next().unwrap();
    assert!(first_row.contains("Week 1 Overview: Arrays"));
    assert!(first_row.ends_with(r#""true""#));

    let insights = Insights::from_plan(&stored);
    assert_eq!(insights.total_weeks, 2);
    assert_eq!(insights.total_tasks, 14);
    assert_eq!(insights.estimated_hours, 14);

    // Toggling back restores the original state
    assert!(!repo.toggle_task(&id, first_day).unwrap());
    assert_eq!(repo.find_plan(&id).unwrap().progress().completed, 0);
}

#[tokio::test]
async fn test_toggle_unknown_plan_or_date() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repo = StoreRepository::open(temp_dir.path()).unwrap();
    let plan = assembler(ScriptedClient::new(ARRAYS_RESPONSE))
        .generate_and_save(&request(), &repo)
        .await
        .unwrap();

    let last = plan.daily_schedule.last().unwrap().date;
    let after = last.succ_opt().unwrap();

    assert!(matches!(
        repo.toggle_task(&plan.id.to_string(), after),
        Err(PlanError::TaskNotFound(d)) if d == after
    ));
    assert!(matches!(repo.toggle_task("42", last), Err(PlanError::PlanNotFound(_))));
}

#[tokio::test]
async fn test_reminder_settings_share_store_with_plans() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let repo = StoreRepository::open(temp_dir.path()).unwrap();
    let plan = assembler(ScriptedClient::new(ARRAYS_RESPONSE))
        .generate_and_save(&request(), &repo)
        .await
        .unwrap();

    let settings = ReminderSettings {
        email: "learner@example.com".to_string(),
        enabled: true,
        time: "08:00".to_string(),
    };
    settings.save(repo.store()).unwrap();

    let store = Store::open(temp_dir.path()).unwrap();
    let loaded = ReminderSettings::load(&store).unwrap();
    assert_eq!(loaded, settings);

    let today = plan.daily_schedule[1].date;
    let reminder = due_reminder(&loaded, &plan, today).unwrap();
    assert_eq!(reminder.task, plan.daily_schedule[1].task);
}
