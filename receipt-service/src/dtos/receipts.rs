use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::VerificationResult;
use crate::models::{ExtractedFields, Transaction};

/// User-reviewed transaction details submitted after a scan.
#[derive(Debug, Deserialize, Validate)]
pub struct ConfirmTransactionRequest {
    #[validate(length(min = 1, message = "Journal number is required"))]
    pub journal_number: String,

    #[validate(custom(function = validate_positive_amount))]
    pub amount: Decimal,

    pub bank_name: Option<String>,
    pub mobile_number: Option<String>,
    /// RFC 3339 or `YYYY-MM-DD`; defaults to now when absent.
    pub transaction_date: Option<String>,
    pub receipt_image_url: Option<String>,
    pub raw_extracted_data: Option<String>,
}

/// What the scan endpoint returns for the user to review before confirming.
#[derive(Debug, Serialize)]
pub struct ReceiptScanResponse {
    pub extracted_data: ExtractedFields,
    pub verification: VerificationResult,
    pub raw_response: String,
    pub receipt_image_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mobile_number: Option<String>,
}

/// 400 body when upload-and-save refuses an incomplete extraction.
#[derive(Debug, Serialize)]
pub struct RejectedExtraction {
    pub error: String,
    pub extracted_data: ExtractedFields,
    pub verification: VerificationResult,
}

#[derive(Debug, Serialize)]
pub struct UploadAndSaveResponse {
    pub transaction: Transaction,
    pub verification: VerificationResult,
}

#[derive(Debug, Serialize)]
pub struct ConfirmTransactionResponse {
    pub transaction: Transaction,
}

fn validate_positive_amount(amount: &Decimal) -> Result<(), ValidationError> {
    if *amount > Decimal::ZERO {
        Ok(())
    } else {
        Err(ValidationError::new("amount_positive")
            .with_message("Amount must be greater than zero".into()))
    }
}
