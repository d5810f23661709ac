use crate::config::{ReceiptConfig, StorageBackend};
use crate::handlers;
use crate::services::providers::gemini::{GeminiConfig, GeminiVisionProvider};
use crate::services::{
    Database, JwtService, LocalStorage, ReceiptExtractor, ReceiptStorage, SupabaseStorage,
};
use axum::extract::DefaultBodyLimit;
use axum::{
    routing::{get, post},
    Router,
};
use service_core::error::AppError;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub config: ReceiptConfig,
    pub db: Database,
    pub storage: Arc<dyn ReceiptStorage>,
    pub extractor: ReceiptExtractor,
    pub jwt: JwtService,
}

pub struct Application {
    port: u16,
    server: Box<dyn std::future::Future<Output = std::io::Result<()>> + Send + Unpin>,
    state: AppState,
}

impl Application {
    pub async fn build(config: ReceiptConfig) -> Result<Self, AppError> {
        let db = Database::new(
            &config.database.url,
            config.database.max_connections,
            config.database.min_connections,
        )
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to PostgreSQL: {}", e);
            e
        })?;
        db.migrate().await.map_err(|e| {
            tracing::error!("Failed to run migrations: {}", e);
            e
        })?;

        let storage = build_storage(&config).await?;

        let provider = Arc::new(GeminiVisionProvider::new(GeminiConfig {
            api_key: config.google.api_key.clone(),
            model: config.google.model.clone(),
        }));
        let extractor = ReceiptExtractor::new(provider);

        let jwt = JwtService::new(&config.jwt);

        let state = AppState {
            config: config.clone(),
            db,
            storage,
            extractor,
            jwt,
        };

        let app = router(state.clone());

        let addr = SocketAddr::from(([0, 0, 0, 0], config.common.port));
        let listener = TcpListener::bind(addr).await.map_err(|e| {
            tracing::error!("Failed to bind TCP listener to {}: {}", addr, e);
            AppError::from(e)
        })?;
        let port = listener.local_addr()?.port();

        tracing::info!("Listening on {}", port);

        let server = axum::serve(listener, app);

        Ok(Self {
            port,
            server: Box::new(server.into_future()),
            state,
        })
    }

    pub fn db(&self) -> &Database {
        &self.state.db
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> std::io::Result<()> {
        self.server.await
    }
}

async fn build_storage(config: &ReceiptConfig) -> Result<Arc<dyn ReceiptStorage>, AppError> {
    match config.storage.backend {
        StorageBackend::Local => {
            let storage = LocalStorage::new(
                &config.storage.local_path,
                &config.storage.public_base_url,
            )
            .await
            .map_err(|e| {
                tracing::error!(
                    "Failed to initialize local storage at {}: {}",
                    config.storage.local_path,
                    e
                );
                e
            })?;
            Ok(Arc::new(storage))
        }
        StorageBackend::Supabase => {
            let base_url = config.storage.supabase_url.clone().ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!(
                    "SUPABASE_URL is required for the supabase storage backend"
                ))
            })?;
            let service_key = config.storage.supabase_service_key.clone().ok_or_else(|| {
                AppError::ConfigError(anyhow::anyhow!(
                    "SUPABASE_SERVICE_KEY is required for the supabase storage backend"
                ))
            })?;
            Ok(Arc::new(SupabaseStorage::new(
                base_url,
                config.storage.supabase_bucket.clone(),
                service_key,
            )))
        }
    }
}

fn router(state: AppState) -> Router {
    // Multipart bodies carry the image plus field overhead, so the HTTP
    // body cap sits above the per-file limit enforced in the handler.
    let body_limit = state.config.upload.max_bytes + 1024 * 1024;

    Router::new()
        .route("/health", get(handlers::health::health))
        .route("/metrics", get(handlers::health::metrics))
        .route("/api/auth/signup", post(handlers::auth::signup))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/me", get(handlers::auth::me))
        .route("/api/receipts/upload", post(handlers::receipts::upload_receipt))
        .route("/api/receipts/confirm", post(handlers::receipts::confirm_transaction))
        .route(
            "/api/receipts/upload-and-save",
            post(handlers::receipts::upload_and_save),
        )
        .route(
            "/api/dashboard/transactions",
            get(handlers::dashboard::list_transactions),
        )
        .route("/api/dashboard/stats", get(handlers::dashboard::stats))
        .route("/api/dashboard/recent", get(handlers::dashboard::recent))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
