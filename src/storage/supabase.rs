//! Supabase Storage REST client

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{header::CONTENT_TYPE, Client, StatusCode, Url};

use super::ObjectStore;
use crate::{
    config::StorageConfig,
    error::{AppError, AppResult},
};

#[derive(Clone)]
pub struct SupabaseStorage {
    client: Client,
    base_url: Url,
    service_key: String,
    bucket: String,
}

impl SupabaseStorage {
    /// Build a client from configuration, `None` when the endpoint or credential is missing
    pub fn from_config(config: &StorageConfig) -> AppResult<Option<Self>> {
        if !config.is_configured() {
            return Ok(None);
        }
        let (Some(url), Some(service_key)) = (&config.url, &config.service_key) else {
            return Ok(None);
        };

        let base_url = Url::parse(url.trim())
            .ok()
            .filter(|u| !u.cannot_be_a_base())
            .ok_or_else(|| AppError::Configuration(format!("Invalid storage URL: {}", url)))?;

        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to create storage client: {}", e)))?;

        Ok(Some(Self {
            client,
            base_url,
            service_key: service_key.clone(),
            bucket: config.bucket.clone(),
        }))
    }

    /// `{base}/storage/v1/object/{bucket}/{key}` with every key segment percent-encoded
    fn object_url(&self, key: &str) -> AppResult<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AppError::Configuration(format!("Invalid storage URL: {}", self.base_url)))?
            .pop_if_empty()
            .extend(["storage", "v1", "object", self.bucket.as_str()])
            .extend(key.split('/'));
        Ok(url)
    }

    async fn check(response: reqwest::Response) -> AppResult<()> {
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.text().await.unwrap_or_default();
        Err(AppError::Storage(error_message(status, &body)))
    }
}

#[async_trait]
impl ObjectStore for SupabaseStorage {
    async fn upload(&self, key: &str, content: Bytes, content_type: &str) -> AppResult<()> {
        tracing::debug!("Uploading {} ({} bytes) to bucket {}", key, content.len(), self.bucket);

        let response = self
            .client
            .post(self.object_url(key)?)
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .header("x-upsert", "true")
            .header(CONTENT_TYPE, content_type)
            .body(content)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Upload of {} failed: {}", key, e)))?;

        Self::check(response).await
    }

    async fn remove(&self, key: &str) -> AppResult<()> {
        let response = self
            .client
            .delete(self.object_url(key)?)
            .bearer_auth(&self.service_key)
            .header("apikey", &self.service_key)
            .send()
            .await
            .map_err(|e| AppError::Storage(format!("Removal of {} failed: {}", key, e)))?;

        Self::check(response).await
    }
}

/// Collaborator message from an error body (`message`, then `error`), else the status
fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            ["message", "error"]
                .iter()
                .find_map(|k| v.get(*k).and_then(|m| m.as_str()).map(str::to_string))
        })
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| format!("Object store returned {}", status))
}
