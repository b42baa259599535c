//! LLM client module for ApexPlanner
//!
//! Provides single-prompt text generation against Cohere or any
//! OpenAI-compatible endpoint.

use std::sync::Arc;

use tracing::debug;

pub mod client;
mod cohere;
mod error;
mod http;
mod openai;
pub mod retry;
mod types;

pub use client::LlmClient;
pub use cohere::CohereClient;
pub use error::LlmError;
pub use openai::OpenAIClient;
pub use retry::{RetryPolicy, with_retry};
pub use types::{GenerationRequest, GenerationResponse, StopReason, TokenUsage};

use crate::config::LlmConfig;

/// Create an LLM client based on the provider specified in config
///
/// Supports "cohere" and "openai" providers.
pub fn create_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>, LlmError> {
    debug!(provider = %config.provider, model = %config.model, "create_client: called");
    match config.provider.as_str() {
        "cohere" => {
            debug!("create_client: creating Cohere client");
            Ok(Arc::new(CohereClient::from_config(config)?))
        }
        "openai" => {
            debug!("create_client: creating OpenAI client");
            Ok(Arc::new(OpenAIClient::from_config(config)?))
        }
        other => {
            debug!(provider = %other, "create_client: unknown provider");
            Err(LlmError::Config(format!(
                "Unknown LLM provider: '{}'. Supported: cohere, openai",
                other
            )))
        }
    }
}
