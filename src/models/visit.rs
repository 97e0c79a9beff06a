//! Visit model

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;

/// Fixed stay length, added in absolute time (not calendar-aware)
pub const STAY_HOURS: i64 = 24;

/// One visitor's stay window tied to one resident student
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
pub struct Visit {
    pub id: Uuid,
    pub student_id: Uuid,
    pub visitor_id: Uuid,
    pub entry_at: DateTime<Utc>,
    /// Always `entry_at` + 24 hours
    pub exit_at: DateTime<Utc>,
    pub auto_overnight: bool,
    /// Best-effort client address of the submitter
    pub created_ip: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Insert payload for a visit
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVisit {
    pub student_id: Uuid,
    pub visitor_id: Uuid,
    pub entry_at: DateTime<Utc>,
    pub exit_at: DateTime<Utc>,
    pub auto_overnight: bool,
    pub created_ip: Option<String>,
}

impl Visit {
    /// Checkout time for a given entry, `None` past the representable range
    pub fn exit_for(entry_at: DateTime<Utc>) -> Option<DateTime<Utc>> {
        entry_at.checked_add_signed(Duration::hours(STAY_HOURS))
    }
}
