//! Object storage for uploaded visit documents

pub mod supabase;

use async_trait::async_trait;
use bytes::Bytes;

use crate::error::AppResult;

pub use supabase::SupabaseStorage;

/// Key-addressed binary store. Uploads overwrite an existing object.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(&self, key: &str, content: Bytes, content_type: &str) -> AppResult<()>;

    async fn remove(&self, key: &str) -> AppResult<()>;
}
