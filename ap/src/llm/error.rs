//! Failures of a single generation call
//!
//! Every provider maps its transport and HTTP failures onto this one enum so
//! the retry loop and the assembler can decide what is worth another attempt.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LlmError {
    /// HTTP 429; `retry_after` comes from the header or a fixed fallback
    #[error("Provider rate limit hit, retry after {retry_after:?}")]
    RateLimited { retry_after: Duration },

    /// Any other non-success status, with the provider's own message
    #[error("Provider returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Could not reach provider: {0}")]
    Network(#[from] reqwest::Error),

    /// Well-formed reply without usable text
    #[error("Unusable provider response: {0}")]
    InvalidResponse(String),

    #[error("No provider response within {0:?}")]
    Timeout(Duration),

    #[error("Malformed provider JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Missing key or unknown provider; never retried
    #[error("LLM configuration error: {0}")]
    Config(String),
}

impl LlmError {
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Transient failures: rate limits, 5xx, 408, network and timeouts
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::RateLimited { .. } | Self::Network(_) | Self::Timeout(_) => true,
            Self::ApiError { status, .. } => *status >= 500 || *status == 408,
            Self::InvalidResponse(_) | Self::Json(_) | Self::Config(_) => false,
        }
    }

    /// Provider-requested wait, only known for rate limits
    pub fn retry_after(&self) -> Option<Duration> {
        match self {
            Self::RateLimited { retry_after } => Some(*retry_after),
            _ => None,
        }
    }
}
