use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Merchant account. `password` holds the argon2 hash, never the plaintext.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub user_name: String,
    #[serde(skip_serializing)]
    pub password: String,
    pub business_name: String,
    pub created_at: DateTime<Utc>,
}
