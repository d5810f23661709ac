//! Vision-model provider abstraction.
//!
//! The orchestrator only needs "image in, best-effort text out"; the trait
//! keeps the Gemini transport swappable for a mock in tests.

pub mod gemini;
pub mod mock;

use async_trait::async_trait;
use thiserror::Error;

/// Error type for provider operations.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("API error: {0}")]
    ApiError(String),

    #[error("Rate limited")]
    RateLimited,

    #[error("Network error: {0}")]
    NetworkError(String),
}

/// Trait for image-understanding providers (e.g. Gemini).
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Submit an image plus an instructional prompt; returns the model's raw
    /// response text. Single attempt, no retries.
    async fn extract_text(
        &self,
        image: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<String, ProviderError>;

    /// Health check.
    async fn health_check(&self) -> Result<(), ProviderError>;
}
