//! LlmProvider trait definition.
//!
//! This is the core abstraction that every generation backend implements.
//! Uses RPITIT for `complete`.

use joseph_types::llm::{CompletionRequest, CompletionResponse, LlmError};

/// Trait for text-generation backends (Gemini, OpenAI-compatible, etc.).
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
/// Implementations live in joseph-infra (e.g., `GeminiProvider`).
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g., "gemini", "openai").
    fn name(&self) -> &str;

    /// The model used when a request does not name one.
    fn model(&self) -> &str;

    /// Send a completion request and receive the full response.
    ///
    /// One HTTP round trip; implementations never retry.
    fn complete(
        &self,
        request: &CompletionRequest,
    ) -> impl std::future::Future<Output = Result<CompletionResponse, LlmError>> + Send;
}
