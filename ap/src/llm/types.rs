//! Text generation request/response types
//!
//! Provider-agnostic: a prompt goes in, a single block of text comes out.

use serde::{Deserialize, Serialize};

/// Everything needed for one generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    /// Fully rendered prompt
    pub prompt: String,

    /// Max tokens for the response (capped by the client's configured limit)
    pub max_tokens: u32,

    /// Sampling temperature
    pub temperature: f32,
}

impl GenerationRequest {
    pub fn new(prompt: impl Into<String>, max_tokens: u32, temperature: f32) -> Self {
        Self {
            prompt: prompt.into(),
            max_tokens,
            temperature,
        }
    }
}

/// Why generation stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum StopReason {
    #[default]
    EndTurn,
    MaxTokens,
    StopSequence,
}

impl StopReason {
    /// Map a provider finish reason onto our enum
    pub fn from_provider(reason: Option<&str>) -> Self {
        match reason.map(|r| r.to_ascii_lowercase()).as_deref() {
            Some("max_tokens") | Some("length") => Self::MaxTokens,
            Some("stop_sequence") => Self::StopSequence,
            _ => Self::EndTurn,
        }
    }
}

/// Token accounting as reported by the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TokenUsage {
    pub input_tokens: u64,
    pub output_tokens: u64,
}

/// Result of a generation call
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationResponse {
    /// Generated text
    pub text: String,

    pub stop_reason: StopReason,

    pub usage: TokenUsage,
}

impl GenerationResponse {
    /// Convenience constructor for a finished text response
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            stop_reason: StopReason::EndTurn,
            usage: TokenUsage::default(),
        }
    }
}
