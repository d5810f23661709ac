//! Mock provider for testing.

use super::{ProviderError, VisionProvider};
use async_trait::async_trait;

/// Mock vision provider returning a canned response (or a canned failure).
pub struct MockVisionProvider {
    response: Option<String>,
}

impl MockVisionProvider {
    /// A provider that answers every request with `text`.
    pub fn with_response(text: impl Into<String>) -> Self {
        Self {
            response: Some(text.into()),
        }
    }

    /// A provider that fails every request.
    pub fn failing() -> Self {
        Self { response: None }
    }
}

#[async_trait]
impl VisionProvider for MockVisionProvider {
    async fn extract_text(
        &self,
        _image: &[u8],
        _mime_type: &str,
        _prompt: &str,
    ) -> Result<String, ProviderError> {
        match &self.response {
            Some(text) => Ok(text.clone()),
            None => Err(ProviderError::ApiError(
                "Mock provider failure".to_string(),
            )),
        }
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        match self.response {
            Some(_) => Ok(()),
            None => Err(ProviderError::NotConfigured(
                "Mock provider not enabled".to_string(),
            )),
        }
    }
}
