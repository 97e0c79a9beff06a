//! Student model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Resident student hosting visitors, unique by student number
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Student {
    pub id: Uuid,
    pub student_number: String,
    pub resident_name: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Insert-or-update payload keyed by `student_number`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertStudent {
    pub student_number: String,
    pub resident_name: String,
    pub email: String,
}

/// Row returned by an upsert, with whether it was newly inserted
#[derive(Debug, Clone, FromRow)]
pub struct StudentUpsert {
    #[sqlx(flatten)]
    pub student: Student,
    pub inserted: bool,
}
