use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::Utc;
use service_core::error::AppError;
use validator::Validate;

use crate::domain::{date_range, verify};
use crate::dtos::{
    ConfirmTransactionRequest, ConfirmTransactionResponse, ReceiptScanResponse,
    RejectedExtraction, UploadAndSaveResponse,
};
use crate::middleware::AuthUser;
use crate::models::NewTransaction;
use crate::services::ExtractionOutput;
use crate::startup::AppState;

/// One uploaded receipt image plus the optional mobile number sent with it.
struct ReceiptUpload {
    data: Vec<u8>,
    mime_type: String,
    mobile_number: Option<String>,
}

async fn read_receipt_upload(
    state: &AppState,
    mut multipart: Multipart,
) -> Result<ReceiptUpload, AppError> {
    let mut image: Option<(Vec<u8>, String)> = None;
    let mut mobile_number = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::BadRequest(anyhow::anyhow!("Failed to read multipart field: {}", e))
    })? {
        match field.name() {
            Some("receipt") => {
                let mime_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| {
                        AppError::BadRequest(anyhow::anyhow!("Failed to read file bytes: {}", e))
                    })?
                    .to_vec();
                image = Some((data, mime_type));
            }
            Some("mobile_number") => {
                let value = field.text().await.map_err(|e| {
                    AppError::BadRequest(anyhow::anyhow!("Failed to read field: {}", e))
                })?;
                if !value.trim().is_empty() {
                    mobile_number = Some(value);
                }
            }
            _ => {}
        }
    }

    let (data, mime_type) =
        image.ok_or_else(|| AppError::BadRequest(anyhow::anyhow!("No receipt image uploaded")))?;

    if !state
        .config
        .upload
        .allowed_mime_types
        .iter()
        .any(|allowed| allowed == &mime_type)
    {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "Invalid file type. Only JPEG, JPG, and PNG are allowed."
        )));
    }

    if data.len() > state.config.upload.max_bytes {
        return Err(AppError::BadRequest(anyhow::anyhow!(
            "File too large (max {} bytes)",
            state.config.upload.max_bytes
        )));
    }

    Ok(ReceiptUpload {
        data,
        mime_type,
        mobile_number,
    })
}

/// Store the image and run extraction concurrently; neither waits on the
/// other and the first failure wins.
async fn store_and_extract(
    state: &AppState,
    auth: &AuthUser,
    upload: &ReceiptUpload,
) -> Result<(crate::services::StoredReceipt, ExtractionOutput), AppError> {
    let user_id = auth.user_id.to_string();
    let (stored, extraction) = tokio::join!(
        state
            .storage
            .store(upload.data.clone(), &upload.mime_type, &user_id),
        state.extractor.extract(&upload.data, &upload.mime_type),
    );
    Ok((stored?, extraction?))
}

/// POST /api/receipts/upload: scan a receipt and stage the result for the
/// user to review. Nothing is persisted to the database here.
pub async fn upload_receipt(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<impl IntoResponse, AppError> {
    let upload = read_receipt_upload(&state, multipart).await?;
    let (stored, extraction) = store_and_extract(&state, &auth, &upload).await?;

    let verification = verify(&extraction.data);

    Ok(Json(ReceiptScanResponse {
        extracted_data: extraction.data,
        verification,
        raw_response: extraction.raw_response,
        receipt_image_url: stored.url,
        mobile_number: upload.mobile_number,
    }))
}

/// POST /api/receipts/confirm: persist user-reviewed transaction details.
pub async fn confirm_transaction(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(request): Json<ConfirmTransactionRequest>,
) -> Result<impl IntoResponse, AppError> {
    request.validate()?;

    let transaction_date = match request.transaction_date.as_deref() {
        Some(raw) => date_range::parse_bound(raw)
            .map_err(AppError::from)?
            .and_utc(),
        None => Utc::now(),
    };

    let transaction = state
        .db
        .insert_transaction(&NewTransaction {
            user_id: auth.user_id,
            journal_number: request.journal_number,
            amount: Some(request.amount),
            bank_name: request.bank_name,
            mobile_number: request.mobile_number,
            transaction_date,
            receipt_image_url: request.receipt_image_url,
            raw_extracted_data: request.raw_extracted_data,
            verified: true,
        })
        .await?;

    tracing::info!(transaction_id = %transaction.id, "Transaction confirmed");

    Ok((
        StatusCode::CREATED,
        Json(ConfirmTransactionResponse { transaction }),
    ))
}

/// POST /api/receipts/upload-and-save: single-shot scan and persist.
/// Only fully-verified extractions are saved; anything less comes back as
/// a 400 so the user falls through to the manual confirm flow.
pub async fn upload_and_save(
    State(state): State<AppState>,
    auth: AuthUser,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let upload = read_receipt_upload(&state, multipart).await?;
    let (stored, extraction) = store_and_extract(&state, &auth, &upload).await?;

    let verification = verify(&extraction.data);
    if !verification.is_valid {
        return Ok((
            StatusCode::BAD_REQUEST,
            Json(RejectedExtraction {
                error: "Could not extract all required fields from receipt".to_string(),
                extracted_data: extraction.data,
                verification,
            }),
        )
            .into_response());
    }

    let transaction_date = extraction
        .data
        .transaction_date
        .as_deref()
        .and_then(|raw| date_range::parse_bound(raw).ok())
        .map(|dt| dt.and_utc())
        .unwrap_or_else(Utc::now);

    let transaction = state
        .db
        .insert_transaction(&NewTransaction {
            user_id: auth.user_id,
            journal_number: extraction.data.journal_number.clone().unwrap_or_default(),
            amount: extraction.data.amount.as_ref().and_then(|a| a.as_decimal()),
            bank_name: extraction.data.bank_name.clone(),
            mobile_number: upload.mobile_number,
            transaction_date,
            receipt_image_url: Some(stored.url),
            raw_extracted_data: Some(extraction.raw_response),
            verified: true,
        })
        .await?;

    tracing::info!(transaction_id = %transaction.id, "Transaction auto-saved");

    Ok((
        StatusCode::CREATED,
        Json(UploadAndSaveResponse {
            transaction,
            verification,
        }),
    )
        .into_response())
}
