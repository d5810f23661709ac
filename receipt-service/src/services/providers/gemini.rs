//! Gemini vision provider.
//!
//! Sends receipt images inline (base64) to the generateContent endpoint and
//! returns the first text part of the first candidate.

use super::{ProviderError, VisionProvider};
use async_trait::async_trait;
use base64::Engine;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Gemini API base URL.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Gemini provider configuration.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
}

pub struct GeminiVisionProvider {
    config: GeminiConfig,
    client: Client,
}

impl GeminiVisionProvider {
    pub fn new(config: GeminiConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self { config, client }
    }

    fn api_url(&self, method: &str) -> String {
        format!(
            "{}/models/{}:{}?key={}",
            GEMINI_API_BASE, self.config.model, method, self.config.api_key
        )
    }
}

#[async_trait]
impl VisionProvider for GeminiVisionProvider {
    async fn extract_text(
        &self,
        image: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<String, ProviderError> {
        let request = GenerateContentRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![
                    ContentPart::Text {
                        text: prompt.to_string(),
                    },
                    ContentPart::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: base64::engine::general_purpose::STANDARD.encode(image),
                        },
                    },
                ],
            }],
        };

        let url = self.api_url("generateContent");

        tracing::debug!(
            model = %self.config.model,
            image_bytes = image.len(),
            mime_type = %mime_type,
            "Sending receipt image to Gemini API"
        );

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await.unwrap_or_default();

            if status.as_u16() == 429 {
                return Err(ProviderError::RateLimited);
            }

            return Err(ProviderError::ApiError(format!(
                "Gemini API error {}: {}",
                status, error_text
            )));
        }

        let api_response: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ApiError(format!("Failed to parse response: {}", e)))?;

        api_response
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .and_then(|p| match p {
                ContentPart::Text { text } => Some(text),
                _ => None,
            })
            .ok_or_else(|| ProviderError::ApiError("Empty response from Gemini".to_string()))
    }

    async fn health_check(&self) -> Result<(), ProviderError> {
        if self.config.api_key.is_empty() {
            return Err(ProviderError::NotConfigured(
                "Gemini API key not configured".to_string(),
            ));
        }

        let url = format!("{}/models?key={}", GEMINI_API_BASE, self.config.api_key);

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| ProviderError::NetworkError(e.to_string()))?;

        if response.status().is_success() {
            Ok(())
        } else {
            Err(ProviderError::ApiError(format!(
                "Health check failed: {}",
                response.status()
            )))
        }
    }
}

// ============================================================================
// Gemini API Request/Response Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    parts: Vec<ContentPart>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(untagged)]
enum ContentPart {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Content,
    #[serde(default)]
    #[allow(dead_code)]
    finish_reason: Option<String>,
}
