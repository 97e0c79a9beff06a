//! Data models for visitor intake

pub mod document;
pub mod student;
pub mod submission;
pub mod visit;
pub mod visitor;

// Re-export commonly used types
pub use document::{DocType, Document, NewDocument};
pub use student::{Student, StudentUpsert, UpsertStudent};
pub use submission::{SubmissionForm, UploadedFile, ValidSubmission, VisitSubmitted};
pub use visit::{NewVisit, Visit};
pub use visitor::Visitor;
