//! Plan generation error types

use std::time::Duration;
use thiserror::Error;

use crate::llm::LlmError;

/// Errors surfaced by plan generation and plan maintenance
#[derive(Debug, Error)]
pub enum PlanError {
    #[error("Invalid plan request: {}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("A plan generation is already in progress")]
    GenerationInProgress,

    #[error("Plan generation was cancelled")]
    Cancelled,

    #[error("Plan generation timed out after {0:?}")]
    Timeout(Duration),

    #[error("Generation failed: {0}")]
    Generation(#[from] LlmError),

    #[error("Prompt error: {0}")]
    Prompt(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("No task scheduled on {0}")]
    TaskNotFound(chrono::NaiveDate),

    #[error("Plan not found: {0}")]
    PlanNotFound(String),
}

impl PlanError {
    /// User-facing messages, one per problem
    pub fn messages(&self) -> Vec<String> {
        match self {
            PlanError::Validation(messages) => messages.clone(),
            other => vec![other.to_string()],
        }
    }

    /// Check if resubmitting the same request could succeed
    pub fn is_transient(&self) -> bool {
        match self {
            PlanError::Generation(e) => e.is_retryable(),
            PlanError::Timeout(_) | PlanError::GenerationInProgress => true,
            _ => false,
        }
    }
}
