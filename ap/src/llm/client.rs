//! LlmClient trait definition

use async_trait::async_trait;

use super::{GenerationRequest, GenerationResponse, LlmError};

/// Stateless text generation client
///
/// Every call is independent; nothing is carried between requests. The plan
/// assembler only ever needs one prompt in and one block of text out.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Generate text for a single prompt
    async fn generate(&self, request: GenerationRequest) -> Result<GenerationResponse, LlmError>;

    /// Provider name for logging
    fn provider(&self) -> &str;
}
