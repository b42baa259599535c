//! Prompt Loader
//!
//! Loads prompt templates from files or falls back to embedded defaults.

use std::path::{Path, PathBuf};

use eyre::{Result, eyre};
use handlebars::Handlebars;
use serde::Serialize;
use tracing::{debug, info};

use super::embedded;
use crate::domain::PlanRequest;

/// Name of the roadmap template
pub const ROADMAP_TEMPLATE: &str = "roadmap";

/// Context for rendering the roadmap prompt
#[derive(Debug, Clone, Serialize)]
pub struct RoadmapContext {
    pub goal: String,
    pub duration: String,
    /// Duration converted to weeks
    pub weeks: u32,
    pub daily_time: String,
    pub mode: String,
    /// Experience level or "Not specified"
    pub experience: String,
    /// Preferred days or "Flexible"
    pub preferred_days: String,
    /// Experience level or "beginner", used in the closing guidance
    pub level_hint: String,
}

impl RoadmapContext {
    /// Build the context from a validated request
    pub fn from_request(request: &PlanRequest, weeks: u32) -> Self {
        let experience = request.experience.map(|e| e.to_string());
        let preferred = request.preferred_days.trim();
        Self {
            goal: request.goal.trim().to_string(),
            duration: request.duration.trim().to_string(),
            weeks,
            daily_time: request.daily_time.trim().to_string(),
            mode: request.mode.unwrap_or_default().to_string(),
            experience: experience.clone().unwrap_or_else(|| "Not specified".to_string()),
            preferred_days: if preferred.is_empty() {
                "Flexible".to_string()
            } else {
                preferred.to_string()
            },
            level_hint: experience.unwrap_or_else(|| "beginner".to_string()),
        }
    }
}

/// Loads and renders prompt templates
pub struct PromptLoader {
    /// Handlebars template engine
    hbs: Handlebars<'static>,
    /// User override directory holding `{name}.pmt` files
    user_dir: Option<PathBuf>,
}

impl PromptLoader {
    /// Create a loader that prefers templates from `dir` when it exists
    pub fn new(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        debug!(?dir, "PromptLoader::new: called");
        Self {
            hbs: Self::engine(),
            user_dir: if dir.exists() { Some(dir.to_path_buf()) } else { None },
        }
    }

    /// Create a loader that only uses embedded prompts (for testing)
    pub fn embedded_only() -> Self {
        Self {
            hbs: Self::engine(),
            user_dir: None,
        }
    }

    // Plain text output, no HTML escaping
    fn engine() -> Handlebars<'static> {
        let mut hbs = Handlebars::new();
        hbs.register_escape_fn(handlebars::no_escape);
        hbs
    }

    /// Load a template by name
    ///
    /// Checks in order:
    /// 1. User override: `{dir}/{name}.pmt`
    /// 2. Embedded fallback
    fn load_template(&self, name: &str) -> Result<String> {
        if let Some(ref user_dir) = self.user_dir {
            let path = user_dir.join(format!("{}.pmt", name));
            if path.exists() {
                debug!("Loading prompt from user override: {:?}", path);
                return std::fs::read_to_string(&path)
                    .map_err(|e| eyre!("Failed to read user prompt {}: {}", path.display(), e));
            }
        }

        if let Some(content) = embedded::get_embedded(name) {
            debug!("Using embedded prompt: {}", name);
            return Ok(content.to_string());
        }

        Err(eyre!("Prompt template not found: {}", name))
    }

    /// Render a template with the given context
    pub fn render<T: Serialize>(&self, template_name: &str, context: &T) -> Result<String> {
        let template = self.load_template(template_name)?;
        self.hbs
            .render_template(&template, context)
            .map_err(|e| eyre!("Failed to render template {}: {}", template_name, e))
    }

    /// Render the roadmap prompt for a request
    pub fn roadmap_prompt(&self, request: &PlanRequest, weeks: u32) -> Result<String> {
        let context = RoadmapContext::from_request(request, weeks);
        info!(
            "Rendering template '{}' for {} weeks (mode: {})",
            ROADMAP_TEMPLATE, context.weeks, context.mode
        );
        self.render(ROADMAP_TEMPLATE, &context)
    }
}
