//! Visit submission: raw multipart form, validated input, and response

use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

use super::document::{self, DocType};

/// One uploaded file part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    /// `Content-Length` of the part, when the client sent one
    pub declared_size: Option<u64>,
    pub bytes: Bytes,
}

impl UploadedFile {
    /// Declared size when present, else the bytes received
    pub fn size_bytes(&self) -> i64 {
        let size = self.declared_size.unwrap_or(self.bytes.len() as u64);
        i64::try_from(size).unwrap_or(i64::MAX)
    }

    pub fn mime(&self) -> String {
        document::content_type(self.content_type.as_deref(), self.file_name.as_deref())
    }

    pub fn extension(&self, doc_type: DocType) -> String {
        document::file_extension(self.file_name.as_deref(), doc_type.fallback_extension())
    }
}

/// Parsed multipart body before validation
#[derive(Debug, Clone, Default)]
pub struct SubmissionForm {
    /// Text parts, every value in arrival order
    pub fields: HashMap<String, Vec<String>>,
    /// First file part for each document type
    pub files: HashMap<DocType, UploadedFile>,
}

impl SubmissionForm {
    /// First value supplied for a text field
    pub fn first(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .and_then(|values| values.first())
            .map(String::as_str)
    }

    pub fn push_field(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.entry(name.into()).or_default().push(value.into());
    }

    /// Keeps the first file seen for a type
    pub fn insert_file(&mut self, doc_type: DocType, file: UploadedFile) {
        self.files.entry(doc_type).or_insert(file);
    }
}

/// Submission that passed every validation rule
#[derive(Debug, Clone)]
pub struct ValidSubmission {
    pub resident_name: String,
    pub student_number: String,
    pub student_email: String,
    pub visitor_full_name: String,
    pub entry_at: DateTime<Utc>,
    pub exit_at: DateTime<Utc>,
    pub visitor_photo: UploadedFile,
    pub id_front: UploadedFile,
}

impl ValidSubmission {
    /// Files in upload order
    pub fn documents(&self) -> [(DocType, &UploadedFile); 2] {
        [
            (DocType::VisitorPhoto, &self.visitor_photo),
            (DocType::IdFront, &self.id_front),
        ]
    }
}

/// Successful submission response
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct VisitSubmitted {
    pub ok: bool,
    pub visit_id: String,
    /// ISO-8601 checkout time
    pub exit_at: String,
}

/// Multipart request body (documentation only)
#[derive(ToSchema)]
pub struct SubmitVisitForm {
    pub resident_name: String,
    pub student_number: String,
    /// Must end with the configured domain, e.g. `@student.sae.edu.au`
    pub student_email: String,
    pub visitor_full_name: String,
    /// Requested entry time, at least the lead time from now
    pub entry_at: String,
    #[schema(value_type = String, format = Binary)]
    pub visitor_photo: Vec<u8>,
    #[schema(value_type = String, format = Binary)]
    pub id_front: Vec<u8>,
}
