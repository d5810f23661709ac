//! PostgreSQL access for users and transactions.

use crate::domain::DateRange;
use crate::models::{NewTransaction, Transaction, User};
use crate::services::metrics;
use service_core::error::AppError;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::{Duration, Instant};
use tracing::info;
use uuid::Uuid;

/// Database connection pool wrapper.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Create a new database connection pool.
    pub async fn new(
        database_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self, AppError> {
        info!(
            max_connections = max_connections,
            min_connections = min_connections,
            "Connecting to PostgreSQL"
        );

        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .min_connections(min_connections)
            .acquire_timeout(Duration::from_secs(30))
            .idle_timeout(Duration::from_secs(600))
            .connect(database_url)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Failed to connect: {}", e)))?;

        info!("PostgreSQL connection pool established");

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Apply pending migrations.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!("Migration failed: {}", e)))?;
        Ok(())
    }

    /// Health check - ping the database.
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                tracing::error!("Database health check failed: {}", e);
                AppError::DatabaseError(anyhow::anyhow!("Database health check failed: {}", e))
            })?;
        Ok(())
    }

    // ==================== User Operations ====================

    pub async fn find_user_by_username(&self, user_name: &str) -> Result<Option<User>, AppError> {
        let started = Instant::now();
        let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE user_name = $1")
            .bind(user_name)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        metrics::record_db_query("find_user_by_username", started.elapsed().as_secs_f64());
        Ok(user)
    }

    pub async fn find_user_by_id(&self, user_id: Uuid) -> Result<Option<User>, AppError> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    /// Insert a new user; `password` is the argon2 hash.
    pub async fn insert_user(
        &self,
        user_name: &str,
        password_hash: &str,
        business_name: &str,
    ) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users (user_name, password, business_name)
            VALUES ($1, $2, $3)
            RETURNING *
            "#,
        )
        .bind(user_name)
        .bind(password_hash)
        .bind(business_name)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))
    }

    // ==================== Transaction Operations ====================

    /// Insert a confirmed transaction; id and created_at are assigned here.
    pub async fn insert_transaction(
        &self,
        tx: &NewTransaction,
    ) -> Result<Transaction, AppError> {
        let started = Instant::now();
        let row = sqlx::query_as::<_, Transaction>(
            r#"
            INSERT INTO transactions
                (user_id, journal_number, amount, bank_name, mobile_number,
                 transaction_date, receipt_image_url, raw_extracted_data, verified)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(tx.user_id)
        .bind(&tx.journal_number)
        .bind(tx.amount)
        .bind(&tx.bank_name)
        .bind(&tx.mobile_number)
        .bind(tx.transaction_date)
        .bind(&tx.receipt_image_url)
        .bind(&tx.raw_extracted_data)
        .bind(tx.verified)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        metrics::record_db_query("insert_transaction", started.elapsed().as_secs_f64());
        Ok(row)
    }

    /// Fetch a user's transactions, newest first. `range` bounds are
    /// inclusive on `transaction_date`; `None` returns all rows.
    pub async fn fetch_transactions(
        &self,
        user_id: Uuid,
        range: Option<&DateRange>,
    ) -> Result<Vec<Transaction>, AppError> {
        let started = Instant::now();
        let rows = match range {
            Some(range) => {
                sqlx::query_as::<_, Transaction>(
                    r#"
                    SELECT * FROM transactions
                    WHERE user_id = $1
                      AND transaction_date >= $2
                      AND transaction_date <= $3
                    ORDER BY transaction_date DESC
                    "#,
                )
                .bind(user_id)
                .bind(range.start)
                .bind(range.end)
                .fetch_all(&self.pool)
                .await
            }
            None => {
                sqlx::query_as::<_, Transaction>(
                    r#"
                    SELECT * FROM transactions
                    WHERE user_id = $1
                    ORDER BY transaction_date DESC
                    "#,
                )
                .bind(user_id)
                .fetch_all(&self.pool)
                .await
            }
        }
        .map_err(|e| AppError::DatabaseError(anyhow::anyhow!(e)))?;
        metrics::record_db_query("fetch_transactions", started.elapsed().as_secs_f64());
        Ok(rows)
    }
}
