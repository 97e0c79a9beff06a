//! Submission validation rules
//!
//! Rules run in a fixed order and the first failure is returned:
//! required text fields, email domain, entry time parsing, lead time, then
//! the two file attachments.

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, Utc};

use crate::{
    config::IntakeConfig,
    error::{AppError, AppResult},
    models::{DocType, SubmissionForm, ValidSubmission, Visit},
};

/// Text fields every submission must carry, in check order
pub const REQUIRED_FIELDS: [&str; 5] = [
    "resident_name",
    "student_number",
    "student_email",
    "visitor_full_name",
    "entry_at",
];

const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Validate a parsed form against the intake policy at instant `now`
pub fn validate(
    mut form: SubmissionForm,
    config: &IntakeConfig,
    now: DateTime<Utc>,
) -> AppResult<ValidSubmission> {
    for field in REQUIRED_FIELDS {
        require(&form, field)?;
    }

    let student_email = require(&form, "student_email")?.to_string();
    check_email_domain(&student_email, &config.allowed_email_domain)?;

    let invalid_entry = || AppError::Validation("Invalid entry_at date".to_string());
    let entry_at = parse_entry_at(require(&form, "entry_at")?).ok_or_else(invalid_entry)?;
    check_lead_time(entry_at, now, config.lead_time_hours)?;
    let exit_at = Visit::exit_for(entry_at).ok_or_else(invalid_entry)?;

    let resident_name = require(&form, "resident_name")?.to_string();
    let student_number = require(&form, "student_number")?.to_string();
    let visitor_full_name = require(&form, "visitor_full_name")?.to_string();

    let mut take_file = |doc_type: DocType| {
        form.files
            .remove(&doc_type)
            .ok_or_else(|| AppError::Validation(format!("Missing {}", doc_type)))
    };
    let visitor_photo = take_file(DocType::VisitorPhoto)?;
    let id_front = take_file(DocType::IdFront)?;

    Ok(ValidSubmission {
        resident_name,
        student_number,
        student_email,
        visitor_full_name,
        entry_at,
        exit_at,
        visitor_photo,
        id_front,
    })
}

/// First value of a field, which must be non-empty
fn require<'a>(form: &'a SubmissionForm, field: &str) -> AppResult<&'a str> {
    form.first(field)
        .filter(|value| !value.is_empty())
        .ok_or_else(|| AppError::Validation(format!("Missing {}", field)))
}

/// Case-sensitive suffix match
pub fn check_email_domain(email: &str, domain: &str) -> AppResult<()> {
    if email.ends_with(domain) {
        Ok(())
    } else {
        Err(AppError::Validation(format!("Email must end with {}", domain)))
    }
}

/// Parse an entry time. Values without an offset are taken as UTC.
pub fn parse_entry_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .ok()
                .and_then(|date| date.and_hms_opt(0, 0, 0))
        })
        .map(|naive| naive.and_utc())
}

/// Entry must be at least `lead_hours` after `now`; exactly on the threshold is accepted
pub fn check_lead_time(entry_at: DateTime<Utc>, now: DateTime<Utc>, lead_hours: i64) -> AppResult<()> {
    let earliest = Duration::try_hours(lead_hours).and_then(|lead| now.checked_add_signed(lead));
    if earliest.map_or(true, |earliest| entry_at < earliest) {
        return Err(AppError::Validation(format!(
            "Entry must be at least {} hours from now",
            lead_hours
        )));
    }
    Ok(())
}
