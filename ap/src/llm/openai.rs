//! OpenAI API client implementation
//!
//! Implements the LlmClient trait for the Chat Completions API. The prompt is
//! sent as a single user message.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::http::post_json;
use super::retry::{RetryPolicy, with_retry};
use super::{GenerationRequest, GenerationResponse, LlmClient, LlmError, StopReason, TokenUsage};
use crate::config::LlmConfig;

/// OpenAI API client
pub struct OpenAIClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    timeout: Duration,
    retry: RetryPolicy,
}

impl OpenAIClient {
    /// Create a new client from configuration
    pub fn from_config(config: &LlmConfig) -> Result<Self, LlmError> {
        debug!(model = %config.model, base_url = %config.base_url, "from_config: called");
        let api_key = config.get_api_key().map_err(|e| LlmError::Config(e.to_string()))?;

        let timeout = Duration::from_millis(config.timeout_ms);
        let http = Client::builder().timeout(timeout).build().map_err(LlmError::Network)?;

        Ok(Self {
            model: config.model.clone(),
            api_key,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            http,
            max_tokens: config.max_tokens,
            timeout,
            retry: config.retry_policy(),
        })
    }

    /// Build the request body for the OpenAI API
    fn build_request_body(&self, request: &GenerationRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, "build_request_body: called");
        let max_tokens = request.max_tokens.min(self.max_tokens);

        // GPT-5.x and o1/o3 models use max_completion_tokens instead of max_tokens
        let uses_completion_tokens =
            self.model.starts_with("gpt-5") || self.model.starts_with("o1") || self.model.starts_with("o3");

        let mut body = serde_json::json!({
            "model": self.model,
            "messages": [{ "role": "user", "content": request.prompt }],
            "temperature": request.temperature,
        });

        if uses_completion_tokens {
            body["max_completion_tokens"] = serde_json::json!(max_tokens);
        } else {
            body["max_tokens"] = serde_json::json!(max_tokens);
        }

        body
    }

    /// Convert OpenAI response to our response type
    fn parse_response(&self, api_response: OpenAIResponse) -> Result<GenerationResponse, LlmError> {
        debug!(choices = api_response.choices.len(), "parse_response: called");
        let Some(choice) = api_response.choices.into_iter().next() else {
            return Err(LlmError::InvalidResponse("OpenAI returned no choices".to_string()));
        };

        let usage = api_response
            .usage
            .map(|u| TokenUsage {
                input_tokens: u.prompt_tokens,
                output_tokens: u.completion_tokens,
            })
            .unwrap_or_default();

        Ok(GenerationResponse {
            text: choice.message.content.unwrap_or_default(),
            stop_reason: StopReason::from_provider(choice.finish_reason.as_deref()),
            usage,
        })
    }
}

#[async_trait]
impl LlmClient for OpenAIClient {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
        debug!(%self.model, prompt_len = request.prompt.len(), "generate: called");
        let url = format!("{}/v1/chat/completions", self.base_url);
        let body = self.build_request_body(&request);
        let (url, body) = (url.as_str(), &body);

        with_retry(&self.retry, "openai", move |attempt| async move {
            debug!(attempt, "generate: sending request");
            let text = post_json(&self.http, url, &self.api_key, &[], body, self.timeout).await?;
            let api_response: OpenAIResponse = serde_json::from_str(&text)?;
            self.parse_response(api_response)
        })
        .await
    }

    fn provider(&self) -> &str {
        "openai"
    }
}

// OpenAI API response types

#[derive(Debug, Deserialize)]
struct OpenAIResponse {
    #[serde(default)]
    choices: Vec<OpenAIChoice>,
    usage: Option<OpenAIUsage>,
}

#[derive(Debug, Deserialize)]
struct OpenAIChoice {
    message: OpenAIMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OpenAIUsage {
    prompt_tokens: u64,
    completion_tokens: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(model: &str, max_tokens: u32) -> OpenAIClient {
        OpenAIClient {
            model: model.to_string(),
            api_key: "test-key".to_string(),
            base_url: "https://api.openai.com".to_string(),
            http: Client::new(),
            max_tokens,
            timeout: Duration::from_secs(300),
            retry: RetryPolicy::none(),
        }
    }

    #[test]
    fn test_build_request_body_basic() {
        let request = GenerationRequest::new("Hello", 1000, 0.7);
        let body = client("gpt-4o", 8192).build_request_body(&request);

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "Hello");
        assert!(body.get("max_completion_tokens").is_none());
    }

    #[test]
    fn test_max_tokens_capped() {
        let request = GenerationRequest::new("Test", 5000, 0.7);
        let body = client("gpt-4o", 1000).build_request_body(&request);
        assert_eq!(body["max_tokens"], 1000);
    }

    #[test]
    fn test_completion_tokens_for_reasoning_models() {
        let request = GenerationRequest::new("Test", 500, 0.7);
        let body = client("o3-mini", 1000).build_request_body(&request);
        assert_eq!(body["max_completion_tokens"], 500);
        assert!(body.get("max_tokens").is_none());
    }

    #[test]
    fn test_parse_response() {
        let json = r#"{
            "choices": [{"message": {"role": "assistant", "content": "Week 1: SQL"}, "finish_reason": "length"}],
            "usage": {"prompt_tokens": 10, "completion_tokens": 20, "total_tokens": 30}
        }"#;
        let api: OpenAIResponse = serde_json::from_str(json).unwrap();
        let response = client("gpt-4o", 1000).parse_response(api).unwrap();

        assert_eq!(response.text, "Week 1: SQL");
        assert_eq!(response.stop_reason, StopReason::MaxTokens);
        assert_eq!(response.usage.output_tokens, 20);
    }

    #[test]
    fn test_parse_response_without_choices() {
        let api: OpenAIResponse = serde_json::from_str(r#"{"choices": []}"#).unwrap();
        assert!(client("gpt-4o", 1000).parse_response(api).is_err());
    }
}
