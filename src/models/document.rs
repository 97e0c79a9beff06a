//! Uploaded document model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use std::fmt;
use std::path::Path;
use utoipa::ToSchema;
use uuid::Uuid;

/// Content type used when neither the upload nor its filename tell us better
pub const FALLBACK_MIME: &str = "application/octet-stream";

/// Kind of uploaded file. Also the multipart field name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum DocType {
    VisitorPhoto,
    IdFront,
}

impl DocType {
    /// Upload order
    pub const ALL: [DocType; 2] = [DocType::VisitorPhoto, DocType::IdFront];

    pub fn as_str(&self) -> &'static str {
        match self {
            DocType::VisitorPhoto => "visitor_photo",
            DocType::IdFront => "id_front",
        }
    }

    pub fn from_field(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|t| t.as_str() == name)
    }

    pub fn fallback_extension(&self) -> &'static str {
        match self {
            DocType::VisitorPhoto | DocType::IdFront => "jpg",
        }
    }

    /// Object key: `visits/{visit_id}/{doc_type}.{ext}`
    pub fn storage_key(&self, visit_id: Uuid, extension: &str) -> String {
        format!("visits/{}/{}.{}", visit_id, self.as_str(), extension)
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Extension of the original filename, or `fallback` when it has none.
/// Only ASCII alphanumeric extensions are kept so the object key stays a plain path.
pub fn file_extension(file_name: Option<&str>, fallback: &str) -> String {
    file_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.chars().all(|c| c.is_ascii_alphanumeric()))
        .unwrap_or(fallback)
        .to_string()
}

/// Declared content type, else a guess from the filename, else octet-stream
pub fn content_type(declared: Option<&str>, file_name: Option<&str>) -> String {
    if let Some(declared) = declared.map(str::trim).filter(|m| !m.is_empty()) {
        return declared.to_string();
    }
    file_name
        .and_then(|name| mime_guess::from_path(name).first())
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| FALLBACK_MIME.to_string())
}

/// Metadata row for one stored upload
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Document {
    pub id: Uuid,
    pub visit_id: Uuid,
    /// `visitor_photo` or `id_front`
    pub doc_type: String,
    pub storage_key: String,
    pub mime: String,
    pub size_bytes: i64,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDocument {
    pub visit_id: Uuid,
    pub doc_type: DocType,
    pub storage_key: String,
    pub mime: String,
    pub size_bytes: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_key_layout() {
        let visit_id = Uuid::parse_str("6f1c1f2e-3a57-4a8e-9a55-2b1f0c7d9e10").unwrap();
        assert_eq!(
            DocType::VisitorPhoto.storage_key(visit_id, "png"),
            "visits/6f1c1f2e-3a57-4a8e-9a55-2b1f0c7d9e10/visitor_photo.png"
        );
        assert_eq!(
            DocType::IdFront.storage_key(visit_id, "jpg"),
            "visits/6f1c1f2e-3a57-4a8e-9a55-2b1f0c7d9e10/id_front.jpg"
        );
    }

    #[test]
    fn test_file_extension() {
        assert_eq!(file_extension(Some("selfie.PNG"), "jpg"), "PNG");
        assert_eq!(file_extension(Some("scan.back.jpeg"), "jpg"), "jpeg");
        assert_eq!(file_extension(Some("no-extension"), "jpg"), "jpg");
        assert_eq!(file_extension(Some("trailing."), "jpg"), "jpg");
        assert_eq!(file_extension(None, "jpg"), "jpg");
    }

    #[test]
    fn test_file_extension_rejects_url_characters() {
        assert_eq!(file_extension(Some("me.jpg?x#y"), "jpg"), "jpg");
        assert_eq!(file_extension(Some("scan.p ng"), "jpg"), "jpg");
        assert_eq!(file_extension(Some("photo.jpg%2F.."), "jpg"), "jpg");
        assert_eq!(file_extension(Some("photo.heic"), "jpg"), "heic");

        let visit_id = Uuid::nil();
        let key = DocType::VisitorPhoto.storage_key(visit_id, &file_extension(Some("me.png?x#y"), "jpg"));
        assert_eq!(key, format!("visits/{}/visitor_photo.jpg", visit_id));
    }

    #[test]
    fn test_content_type_resolution() {
        assert_eq!(content_type(Some("image/webp"), Some("a.png")), "image/webp");
        assert_eq!(content_type(None, Some("a.png")), "image/png");
        assert_eq!(content_type(Some(""), Some("a.jpg")), "image/jpeg");
        assert_eq!(content_type(None, Some("unknown")), FALLBACK_MIME);
        assert_eq!(content_type(None, None), FALLBACK_MIME);
    }

    #[test]
    fn test_doc_type_fields() {
        assert_eq!(DocType::from_field("visitor_photo"), Some(DocType::VisitorPhoto));
        assert_eq!(DocType::from_field("id_front"), Some(DocType::IdFront));
        assert_eq!(DocType::from_field("resident_name"), None);
        assert_eq!(DocType::ALL, [DocType::VisitorPhoto, DocType::IdFront]);
    }
}
