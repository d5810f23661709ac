//! Receipt image storage backends.

use async_trait::async_trait;
use chrono::Utc;
use reqwest::Client;
use service_core::error::AppError;
use std::path::PathBuf;
use tokio::fs;

/// Where an uploaded receipt image ended up.
#[derive(Debug, Clone)]
pub struct StoredReceipt {
    pub url: String,
    pub path: String,
}

#[async_trait]
pub trait ReceiptStorage: Send + Sync {
    /// Store an image under `{user_id}/{epoch-millis}.{ext}` and return its
    /// public URL plus storage path. Timestamp naming means a collision is
    /// possible in principle; the original system accepts that.
    async fn store(
        &self,
        data: Vec<u8>,
        mime_type: &str,
        user_id: &str,
    ) -> Result<StoredReceipt, AppError>;

    /// Best-effort delete. Failures are logged and reported as `false`,
    /// never raised.
    async fn delete(&self, path: &str) -> bool;
}

/// Build the object key for an upload.
fn object_key(user_id: &str, mime_type: &str) -> String {
    let extension = mime_type.split('/').nth(1).unwrap_or("bin");
    format!("{}/{}.{}", user_id, Utc::now().timestamp_millis(), extension)
}

// ==================== Local filesystem backend ====================

pub struct LocalStorage {
    base_path: PathBuf,
    public_base_url: String,
}

impl LocalStorage {
    pub async fn new(
        base_path: impl Into<PathBuf>,
        public_base_url: impl Into<String>,
    ) -> Result<Self, AppError> {
        let base_path = base_path.into();
        if !base_path.exists() {
            fs::create_dir_all(&base_path).await?;
        }
        Ok(Self {
            base_path,
            public_base_url: public_base_url.into(),
        })
    }
}

#[async_trait]
impl ReceiptStorage for LocalStorage {
    async fn store(
        &self,
        data: Vec<u8>,
        mime_type: &str,
        user_id: &str,
    ) -> Result<StoredReceipt, AppError> {
        let key = object_key(user_id, mime_type);
        let path = self.base_path.join(&key);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, data).await?;

        Ok(StoredReceipt {
            url: format!("{}/{}", self.public_base_url.trim_end_matches('/'), key),
            path: key,
        })
    }

    async fn delete(&self, path: &str) -> bool {
        let full = self.base_path.join(path);
        match fs::remove_file(&full).await {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Failed to delete receipt image");
                false
            }
        }
    }
}

// ==================== Supabase storage backend ====================

pub struct SupabaseStorage {
    client: Client,
    base_url: String,
    bucket: String,
    service_key: String,
}

impl SupabaseStorage {
    pub fn new(
        base_url: impl Into<String>,
        bucket: impl Into<String>,
        service_key: impl Into<String>,
    ) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
            bucket: bucket.into(),
            service_key: service_key.into(),
        }
    }

    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.bucket,
            key
        )
    }

    fn public_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/object/public/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.bucket,
            key
        )
    }

    /// Accept either a bare key or a full public URL.
    fn normalize_path<'a>(&self, path: &'a str) -> &'a str {
        let marker = format!("{}/", self.bucket);
        match path.find(&marker) {
            Some(idx) => &path[idx + marker.len()..],
            None => path,
        }
    }
}

#[async_trait]
impl ReceiptStorage for SupabaseStorage {
    async fn store(
        &self,
        data: Vec<u8>,
        mime_type: &str,
        user_id: &str,
    ) -> Result<StoredReceipt, AppError> {
        let key = object_key(user_id, mime_type);

        let response = self
            .client
            .post(self.object_url(&key))
            .bearer_auth(&self.service_key)
            .header(reqwest::header::CONTENT_TYPE, mime_type)
            .header(reqwest::header::CACHE_CONTROL, "3600")
            .body(data)
            .send()
            .await
            .map_err(|e| {
                AppError::InternalError(anyhow::anyhow!("Failed to upload image: {}", e))
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::InternalError(anyhow::anyhow!(
                "Failed to upload image: {} {}",
                status,
                body
            )));
        }

        Ok(StoredReceipt {
            url: self.public_url(&key),
            path: key,
        })
    }

    async fn delete(&self, path: &str) -> bool {
        let key = self.normalize_path(path);
        let result = self
            .client
            .delete(self.object_url(key))
            .bearer_auth(&self.service_key)
            .send()
            .await;

        match result {
            Ok(response) if response.status().is_success() => true,
            Ok(response) => {
                tracing::warn!(path = %key, status = %response.status(), "Delete image error");
                false
            }
            Err(e) => {
                tracing::warn!(path = %key, error = %e, "Delete image error");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn local_storage_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let storage = LocalStorage::new(dir.path(), "http://localhost:8080/receipts")
            .await
            .unwrap();

        let stored = storage
            .store(vec![1, 2, 3], "image/jpeg", "user-1")
            .await
            .unwrap();

        assert!(stored.path.starts_with("user-1/"));
        assert!(stored.path.ends_with(".jpeg"));
        assert!(stored.url.starts_with("http://localhost:8080/receipts/user-1/"));
        assert!(dir.path().join(&stored.path).exists());

        assert!(storage.delete(&stored.path).await);
        assert!(!dir.path().join(&stored.path).exists());
        // Second delete is a no-op failure, not a panic.
        assert!(!storage.delete(&stored.path).await);
    }

    #[test]
    fn object_key_uses_mime_subtype() {
        let key = object_key("u1", "image/png");
        assert!(key.starts_with("u1/"));
        assert!(key.ends_with(".png"));
    }

    #[test]
    fn supabase_path_normalization_strips_bucket_prefix() {
        let storage = SupabaseStorage::new("https://x.supabase.co", "receipts", "key");
        assert_eq!(
            storage.normalize_path("https://x.supabase.co/storage/v1/object/public/receipts/u/1.jpg"),
            "u/1.jpg"
        );
        assert_eq!(storage.normalize_path("u/1.jpg"), "u/1.jpg");
    }
}
