//! Extraction pipeline tests against the mock vision provider. No network
//! or database required.

use receipt_service::models::AmountValue;
use receipt_service::services::providers::mock::MockVisionProvider;
use receipt_service::services::{ExtractionError, ExtractionSource, ReceiptExtractor};
use std::sync::Arc;

const IMAGE: &[u8] = &[0xFF, 0xD8, 0xFF, 0xE0]; // JPEG magic, content irrelevant to the mock

fn extractor_with(response: &str) -> ReceiptExtractor {
    ReceiptExtractor::new(Arc::new(MockVisionProvider::with_response(response)))
}

#[tokio::test]
async fn fenced_json_response_is_structured() {
    let extractor = extractor_with(
        "```json\n{\"journal_number\": \"RR12345\", \"amount\": 250.0, \"bank_name\": \"mBOB\", \"transaction_date\": \"2025-03-10\"}\n```",
    );

    let output = extractor.extract(IMAGE, "image/jpeg").await.unwrap();

    assert_eq!(output.source, ExtractionSource::Structured);
    assert_eq!(output.data.journal_number.as_deref(), Some("RR12345"));
    assert_eq!(output.data.amount, Some(AmountValue::Number(250.0)));
    assert_eq!(output.data.bank_name.as_deref(), Some("mBOB"));
    assert_eq!(output.data.transaction_date.as_deref(), Some("2025-03-10"));
    assert!(output.raw_response.starts_with("```json"));
}

#[tokio::test]
async fn explicit_error_sentinel_is_unreadable() {
    let extractor =
        extractor_with("```json\n{\"error\": \"Unable to extract data from image\"}\n```");

    let err = extractor.extract(IMAGE, "image/jpeg").await.unwrap_err();

    match err {
        ExtractionError::Unreadable(message) => {
            assert_eq!(message, "Unable to extract data from image");
        }
        other => panic!("expected unreadable error, got {other:?}"),
    }
}

#[tokio::test]
async fn free_text_response_falls_back_to_heuristics() {
    let extractor = extractor_with(
        "Payment successful!\nRR Number: RR998877\nAmount: Nu. 1,500.50\npaid via mBOB",
    );

    let output = extractor.extract(IMAGE, "image/jpeg").await.unwrap();

    assert_eq!(output.source, ExtractionSource::Heuristic);
    assert_eq!(output.data.journal_number.as_deref(), Some("RR998877"));
    assert_eq!(output.data.amount, Some(AmountValue::Number(1500.50)));
    assert_eq!(output.data.bank_name.as_deref(), Some("MBOB"));
}

#[tokio::test]
async fn provider_failure_surfaces_as_provider_error() {
    let extractor = ReceiptExtractor::new(Arc::new(MockVisionProvider::failing()));

    let err = extractor.extract(IMAGE, "image/jpeg").await.unwrap_err();

    assert!(matches!(err, ExtractionError::Provider(_)));
}

#[tokio::test]
async fn health_check_reflects_provider_state() {
    assert!(extractor_with("ok").health_check().await.is_ok());

    let failing = ReceiptExtractor::new(Arc::new(MockVisionProvider::failing()));
    assert!(failing.health_check().await.is_err());
}
