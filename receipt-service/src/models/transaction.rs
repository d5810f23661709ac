use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A confirmed mobile-banking payment, one row per saved receipt.
///
/// Created exactly once per confirmed upload and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: Uuid,
    pub journal_number: String,
    pub amount: Option<Decimal>,
    pub bank_name: Option<String>,
    pub mobile_number: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub receipt_image_url: Option<String>,
    pub raw_extracted_data: Option<String>,
    pub verified: bool,
    pub created_at: DateTime<Utc>,
}

/// Insert payload; id and created_at are assigned by the database.
#[derive(Debug, Clone)]
pub struct NewTransaction {
    pub user_id: Uuid,
    pub journal_number: String,
    pub amount: Option<Decimal>,
    pub bank_name: Option<String>,
    pub mobile_number: Option<String>,
    pub transaction_date: DateTime<Utc>,
    pub receipt_image_url: Option<String>,
    pub raw_extracted_data: Option<String>,
    pub verified: bool,
}
