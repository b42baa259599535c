//! Cohere API client implementation
//!
//! Implements the LlmClient trait for Cohere's legacy `/v1/generate`
//! endpoint, which takes a single prompt and returns a list of generations.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

use super::http::post_json;
use super::retry::{RetryPolicy, with_retry};
use super::{GenerationRequest, GenerationResponse, LlmClient, LlmError, StopReason, TokenUsage};
use crate::config::LlmConfig;

/// API version pinned for the generate endpoint
const COHERE_VERSION: &str = "2022-12-06";

/// Cohere API client
pub struct CohereClient {
    model: String,
    api_key: String,
    base_url: String,
    http: Client,
    max_tokens: u32,
    timeout: Duration,
    retry: RetryPolicy,
}

impl CohereClient {
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

    /// Build the request body for the generate endpoint
    fn build_request_body(&self, request: &GenerationRequest) -> serde_json::Value {
        debug!(%self.model, %request.max_tokens, "build_request_body: called");
        serde_json::json!({
            "model": self.model,
            "prompt": request.prompt,
            "max_tokens": request.max_tokens.min(self.max_tokens),
            "temperature": request.temperature,
            "k": 0,
            "stop_sequences": [],
            "return_likelihoods": "NONE",
        })
    }

    /// Convert the API response to our response type
    fn parse_response(&self, api_response: CohereResponse) -> Result<GenerationResponse, LlmError> {
        debug!(generations = api_response.generations.len(), "parse_response: called");
        let Some(generation) = api_response.generations.into_iter().next() else {
            return Err(LlmError::InvalidResponse("Cohere returned no generations".to_string()));
        };

        let usage = api_response
            .meta
            .and_then(|m| m.billed_units)
            .map(|b| TokenUsage {
                input_tokens: b.input_tokens.unwrap_or(0.0) as u64,
                output_tokens: b.output_tokens.unwrap_or(0.0) as u64,
            })
            .unwrap_or_default();

        Ok(GenerationResponse {
            text: generation.text,
            stop_reason: StopReason::from_provider(generation.finish_reason.as_deref()),
            usage,
        })
    }
}

#[async_trait]
impl LlmClient for CohereClient {
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError> {
        debug!(%self.model, prompt_len = request.prompt.len(), "generate: called");
        let url = format!("{}/v1/generate", self.base_url);
        let body = self.build_request_body(&request);
        let (url, body) = (url.as_str(), &body);

        with_retry(&self.retry, "cohere", move |attempt| async move {
            debug!(attempt, "generate: sending request");
            let text = post_json(
                &self.http,
                url,
                &self.api_key,
                &[("Cohere-Version", COHERE_VERSION)],
                body,
                self.timeout,
            )
            .await?;
            let api_response: CohereResponse = serde_json::from_str(&text)?;
            self.parse_response(api_response)
        })
        .await
    }

    fn provider(&self) -> &str {
        "cohere"
    }
}

// Cohere API response types

#[derive(Debug, Deserialize)]
struct CohereResponse {
    #[serde(default)]
    generations: Vec<CohereGeneration>,
    meta: Option<CohereMeta>,
}

#[derive(Debug, Deserialize)]
struct CohereGeneration {
    text: String,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CohereMeta {
    billed_units: Option<CohereBilledUnits>,
}

#[derive(Debug, Deserialize)]
struct CohereBilledUnits {
    input_tokens: Option<f64>,
    output_tokens: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(max_tokens: u32) -> CohereClient {
        CohereClient {
            model: "command".to_string(),
            api_key: "test-key".to_string(),
            base_url: "https://api.cohere.ai".to_string(),
            http: Client::new(),
            max_tokens,
            timeout: Duration::from_secs(60),
            retry: RetryPolicy::none(),
        }
    }

    #[test]
    fn test_build_request_body() {
        let request = GenerationRequest::new("Create a plan", 2000, 0.7);
        let body = client(2000).build_request_body(&request);

        assert_eq!(body["model"], "command");
        assert_eq!(body["prompt"], "Create a plan");
        assert_eq!(body["max_tokens"], 2000);
        assert_eq!(body["k"], 0);
        assert_eq!(body["return_likelihoods"], "NONE");
        assert!(body["stop_sequences"].as_array().unwrap().is_empty());
        let temperature = body["temperature"].as_f64().unwrap();
        assert!((temperature - 0.7).abs() < 1e-6);
    }

    #[test]
    fn test_max_tokens_capped() {
        let request = GenerationRequest::new("x", 5000, 0.7);
        let body = client(1000).build_request_body(&request);
        assert_eq!(body["max_tokens"], 1000);
    }

    #[test]
    fn test_parse_response_takes_first_generation() {
        let json = r#"{
            "id": "abc",
            "generations": [
                {"id": "g1", "text": "Week 1: Arrays", "finish_reason": "COMPLETE"},
                {"id": "g2", "text": "ignored"}
            ],
            "prompt": "Create a plan",
            "meta": {"api_version": {"version": "1"}, "billed_units": {"input_tokens": 12, "output_tokens": 40}}
        }"#;
        let api: CohereResponse = serde_json::from_str(json).unwrap();
        let response = client(2000).parse_response(api).unwrap();

        assert_eq!(response.text, "Week 1: Arrays");
        assert_eq!(response.stop_reason, StopReason::EndTurn);
        assert_eq!(response.usage.input_tokens, 12);
        assert_eq!(response.usage.output_tokens, 40);
    }

    #[test]
    fn test_parse_response_without_generations() {
        let api: CohereResponse = serde_json::from_str(r#"{"id": "abc"}"#).unwrap();
        let err = client(2000).parse_response(api).unwrap_err();
        assert!(matches!(err, LlmError::InvalidResponse(_)));
    }
}
