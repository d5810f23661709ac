//! Receipt extraction orchestrator: image in, verified-ready fields out.

use crate::domain::{parse_response, ParseOutcome};
use crate::models::ExtractedFields;
use crate::services::metrics;
use crate::services::providers::VisionProvider;
use service_core::error::AppError;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Fixed instructional prompt sent with every receipt image. The app list
/// here intentionally differs from the fallback scanner's vocabulary.
pub const RECEIPT_PROMPT: &str = r#"
You are an expert at analyzing payment receipts from Bhutanese mobile banking apps (mBOB, GoBOB, BNB mPay, DK Bank, TPay, eteeru, Drukpay, BDBLePay).

Please extract the following information from this receipt image and return it as a JSON object:

{
  "journal_number": "The journal/RR/RE number from the receipt",
  "amount": "The transaction amount (numeric value only, no currency symbols)",
  "bank_name": "Name of the bank/payment app",
  "transaction_date": "Date of transaction in YYYY-MM-DD format",
}

Important:
- Return ONLY valid JSON, no additional text
- Use null for any field that is not clearly visible or present
- For amount, extract only the numeric value (remove currency symbols like Nu., BTN, etc.)
- Be precise and accurate with the journal number as it's critical for verification

If you cannot read the receipt clearly or it's not a valid payment receipt, return:
{"error": "Unable to extract data from image"}
"#;

#[derive(Debug, Error)]
pub enum ExtractionError {
    /// Upstream provider fault (network, API error, rate limit).
    #[error("Failed to extract receipt data: {0}")]
    Provider(String),

    /// The model explicitly reported the receipt as unreadable.
    #[error("{0}")]
    Unreadable(String),
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::Provider(msg) => AppError::BadGateway(msg),
            ExtractionError::Unreadable(msg) => AppError::BadRequest(anyhow::anyhow!(msg)),
        }
    }
}

/// How the fields in an [`ExtractionOutput`] were obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractionSource {
    Structured,
    Heuristic,
}

/// Successful extraction: the fields plus the model's verbatim response,
/// which callers persist alongside the transaction for auditing.
#[derive(Debug, Clone)]
pub struct ExtractionOutput {
    pub data: ExtractedFields,
    pub raw_response: String,
    pub source: ExtractionSource,
}

/// Drives one image through the vision provider and the response parser.
/// Single attempt: every upstream fault surfaces immediately.
#[derive(Clone)]
pub struct ReceiptExtractor {
    provider: Arc<dyn VisionProvider>,
}

impl ReceiptExtractor {
    pub fn new(provider: Arc<dyn VisionProvider>) -> Self {
        Self { provider }
    }

    pub async fn extract(
        &self,
        image: &[u8],
        mime_type: &str,
    ) -> Result<ExtractionOutput, ExtractionError> {
        let started = Instant::now();
        let raw = self
            .provider
            .extract_text(image, mime_type, RECEIPT_PROMPT)
            .await
            .map_err(|e| {
                metrics::record_extraction("provider_error");
                ExtractionError::Provider(e.to_string())
            })?;
        metrics::record_provider_latency(started.elapsed().as_secs_f64());

        match parse_response(&raw) {
            ParseOutcome::Structured(data) => {
                metrics::record_extraction("structured");
                Ok(ExtractionOutput {
                    data,
                    raw_response: raw,
                    source: ExtractionSource::Structured,
                })
            }
            ParseOutcome::Heuristic(data) => {
                metrics::record_extraction("heuristic");
                tracing::warn!("Structured parse failed, used heuristic text scan");
                Ok(ExtractionOutput {
                    data,
                    raw_response: raw,
                    source: ExtractionSource::Heuristic,
                })
            }
            ParseOutcome::Failed(message) => {
                metrics::record_extraction("unreadable");
                Err(ExtractionError::Unreadable(message))
            }
        }
    }

    pub async fn health_check(&self) -> Result<(), ExtractionError> {
        self.provider
            .health_check()
            .await
            .map_err(|e| ExtractionError::Provider(e.to_string()))
    }
}
