//! HTTP plumbing shared by the providers

use std::time::Duration;

use reqwest::{Client, Response};
use serde::Deserialize;
use tracing::debug;

use super::LlmError;
use super::retry::is_retryable_status;

/// Fallback wait when a 429 carries no retry-after header
const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// Error body shape used by both Cohere and OpenAI-compatible APIs
#[derive(Debug, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<ErrorDetail>,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: Option<String>,
}

/// POST a JSON body with bearer auth and return the raw success body
pub(crate) async fn post_json(
    http: &Client,
    url: &str,
    api_key: &str,
    extra_headers: &[(&str, &str)],
    body: &serde_json::Value,
    timeout: Duration,
) -> Result<String, LlmError> {
    debug!(%url, "post_json: called");
    let mut builder = http
        .post(url)
        .header("Authorization", format!("Bearer {}", api_key))
        .header("content-type", "application/json");
    for (name, value) in extra_headers {
        builder = builder.header(*name, *value);
    }

    let response = builder.json(body).send().await.map_err(|e| {
        if e.is_timeout() {
            debug!("post_json: request timed out");
            LlmError::Timeout(timeout)
        } else {
            LlmError::Network(e)
        }
    })?;

    let response = check_status(response).await?;
    Ok(response.text().await?)
}

/// Turn a non-success response into the matching LlmError
async fn check_status(response: Response) -> Result<Response, LlmError> {
    let status = response.status().as_u16();
    if response.status().is_success() {
        return Ok(response);
    }

    if status == 429 {
        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
        debug!(retry_after, "check_status: rate limited (429)");
        return Err(LlmError::RateLimited {
            retry_after: Duration::from_secs(retry_after),
        });
    }

    let text = response.text().await.unwrap_or_default();
    debug!(status, retryable = is_retryable_status(status), "check_status: API error");
    Err(LlmError::ApiError {
        status,
        message: error_message(&text),
    })
}

/// Pull a human-readable message out of an error body
pub(crate) fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { message: Some(m), .. }) => m,
        Ok(ErrorBody {
            error: Some(ErrorDetail { message: Some(m) }),
            ..
        }) => m,
        _ => body.trim().to_string(),
    }
}
