//! Plan assembly
//!
//! Orchestrates one generation: validate the request, render the prompt,
//! call the model under a timeout and a cancel handle, then run the roadmap
//! pipeline and stamp the result into a Plan. Only one generation may be in
//! flight per assembler; a second concurrent call fails immediately.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::{Notify, Semaphore};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::domain::{Plan, PlanRequest};
use crate::error::PlanError;
use crate::llm::{GenerationRequest, LlmClient};
use crate::prompts::PromptLoader;
use crate::repository::PlanRepository;
use crate::roadmap::build_roadmap;

/// Default token budget for a roadmap response
pub const DEFAULT_MAX_TOKENS: u32 = 2000;

/// Default sampling temperature
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// Default bound on one generation, retries included
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(180);

/// Generation parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssemblerSettings {
    pub max_tokens: u32,
    pub temperature: f32,
    pub timeout: Duration,
}

impl Default for AssemblerSettings {
    fn default() -> Self {
        Self {
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl AssemblerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            max_tokens: config.llm.max_tokens,
            temperature: config.llm.temperature,
            timeout: config.generation.timeout(),
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Turns a PlanRequest into a Plan
pub struct PlanAssembler {
    client: Arc<dyn LlmClient>,
    prompts: PromptLoader,
    settings: AssemblerSettings,
    in_flight: Semaphore,
    cancel: Notify,
}

impl PlanAssembler {
    pub fn new(client: Arc<dyn LlmClient>, prompts: PromptLoader, settings: AssemblerSettings) -> Self {
        debug!(provider = client.provider(), ?settings, "PlanAssembler::new: called");
        Self {
            client,
            prompts,
            settings,
            in_flight: Semaphore::new(1),
            cancel: Notify::new(),
        }
    }

    pub fn settings(&self) -> &AssemblerSettings {
        &self.settings
    }

    /// True while a generation holds the in-flight permit
    pub fn is_generating(&self) -> bool {
        self.in_flight.available_permits() == 0
    }

    /// Abort the in-flight generation, if any
    ///
    /// The pending call resolves to `PlanError::Cancelled`. Has no effect
    /// when nothing is running.
    pub fn cancel(&self) {
        debug!(generating = self.is_generating(), "cancel: called");
        self.cancel.notify_waiters();
    }

    /// Generate a plan stamped with the current time
    pub async fn generate(&self, request: &PlanRequest) -> Result<Plan, PlanError> {
        self.generate_at(request, Utc::now()).await
    }

    /// Generate a plan as of `now`
    ///
    /// `now` supplies the plan id, the creation timestamp and the schedule
    /// start date (its UTC calendar date).
    pub async fn generate_at(&self, request: &PlanRequest, now: DateTime<Utc>) -> Result<Plan, PlanError> {
        debug!(goal = %request.goal, duration = %request.duration, "generate_at: called");
        let requested_weeks = request.validate()?;

        let _permit = self.in_flight.try_acquire().map_err(|_| {
            debug!("generate_at: another generation holds the permit");
            PlanError::GenerationInProgress
        })?;

        let prompt = self
            .prompts
            .roadmap_prompt(request, requested_weeks)
            .map_err(|e| PlanError::Prompt(format!("{:#}", e)))?;

        info!(
            provider = self.client.provider(),
            requested_weeks,
            "Generating roadmap"
        );
        let text = self.call_model(prompt).await?;

        let start = now.date_naive();
        let roadmap = build_roadmap(&text, &request.goal, requested_weeks, &request.daily_time, start);
        info!(
            weeks = roadmap.weeks.len(),
            tips = roadmap.tips.len(),
            milestones = roadmap.milestones.len(),
            days = roadmap.daily_schedule.len(),
            "Roadmap assembled"
        );

        Ok(Plan {
            id: now.timestamp_millis(),
            goal: request.goal.trim().to_string(),
            duration: request.duration.trim().to_string(),
            daily_time: request.daily_time.trim().to_string(),
            mode: request.mode.unwrap_or_default(),
            experience: request.experience,
            preferred_days: request.preferred_days.trim().to_string(),
            created_at: now,
            weeks: roadmap.weeks,
            tips: roadmap.tips,
            milestones: roadmap.milestones,
            daily_schedule: roadmap.daily_schedule,
            raw_ai_response: text,
        })
    }

    /// Generate, then append the plan to `repo`
    ///
    /// Nothing is persisted when generation fails.
    pub async fn generate_and_save(&self, request: &PlanRequest, repo: &dyn PlanRepository) -> Result<Plan, PlanError> {
        let plan = self.generate(request).await?;
        repo.append_plan(&plan)?;
        Ok(plan)
    }

    async fn call_model(&self, prompt: String) -> Result<String, PlanError> {
        let request = GenerationRequest::new(prompt, self.settings.max_tokens, self.settings.temperature);
        let cancelled = self.cancel.notified();
        let call = tokio::time::timeout(self.settings.timeout, self.client.generate(request));

        tokio::select! {
            result = call => match result {
                Ok(Ok(response)) => {
                    debug!(
                        chars = response.text.len(),
                        input_tokens = response.usage.input_tokens,
                        output_tokens = response.usage.output_tokens,
                        "call_model: response received"
                    );
                    Ok(response.text)
                }
                Ok(Err(e)) => {
                    warn!(error = %e, "Generation failed");
                    Err(PlanError::Generation(e))
                }
                Err(_) => {
                    warn!(timeout = ?self.settings.timeout, "Generation timed out");
                    Err(PlanError::Timeout(self.settings.timeout))
                }
            },
            _ = cancelled => {
                info!("Generation cancelled");
                Err(PlanError::Cancelled)
            }
        }
    }
}
