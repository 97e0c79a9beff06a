//! Visit submission service

use chrono::{SecondsFormat, Utc};
use std::sync::Arc;
use uuid::Uuid;

use super::{
    compensation::{Compensation, Step},
    validation,
};
use crate::{
    config::IntakeConfig,
    error::{AppError, AppResult},
    models::{
        DocType, NewDocument, NewVisit, SubmissionForm, UploadedFile, UpsertStudent,
        ValidSubmission, Visit, VisitSubmitted,
    },
    repository::RecordStore,
    storage::ObjectStore,
};

pub const NOT_CONFIGURED: &str = "Server not configured (storage credentials missing)";

#[derive(Clone)]
pub struct VisitsService {
    records: Arc<dyn RecordStore>,
    storage: Option<Arc<dyn ObjectStore>>,
    config: IntakeConfig,
}

impl VisitsService {
    pub fn new(
        records: Arc<dyn RecordStore>,
        storage: Option<Arc<dyn ObjectStore>>,
        config: IntakeConfig,
    ) -> Self {
        Self {
            records,
            storage,
            config,
        }
    }

    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }

    /// Fails before any parsing or writes when the object store is not configured
    pub fn ensure_configured(&self) -> AppResult<&dyn ObjectStore> {
        self.storage
            .as_deref()
            .ok_or_else(|| AppError::Configuration(NOT_CONFIGURED.to_string()))
    }

    /// Validate a submission and create the student, visitor, visit and documents
    pub async fn submit(
        &self,
        form: SubmissionForm,
        client_ip: Option<String>,
    ) -> AppResult<VisitSubmitted> {
        let storage = self.ensure_configured()?;
        let submission = validation::validate(form, &self.config, Utc::now())?;

        let mut undo = Compensation::default();
        match self.persist(&submission, client_ip, storage, &mut undo).await {
            Ok(visit) => {
                tracing::info!(
                    "Visit {} registered for student {} ({} to {})",
                    visit.id,
                    submission.student_number,
                    submission.entry_at,
                    submission.exit_at
                );
                Ok(VisitSubmitted {
                    ok: true,
                    visit_id: visit.id.to_string(),
                    exit_at: submission.exit_at.to_rfc3339_opts(SecondsFormat::AutoSi, true),
                })
            }
            Err(e) => {
                if self.config.compensate_on_failure && !undo.steps().is_empty() {
                    tracing::warn!(
                        "Submission for student {} failed after {} writes, rolling back: {}",
                        submission.student_number,
                        undo.steps().len(),
                        e
                    );
                    undo.rollback(self.records.as_ref(), storage).await;
                }
                Err(e)
            }
        }
    }

    async fn persist(
        &self,
        submission: &ValidSubmission,
        client_ip: Option<String>,
        storage: &dyn ObjectStore,
        undo: &mut Compensation,
    ) -> AppResult<Visit> {
        let student = self
            .records
            .upsert_student(&UpsertStudent {
                student_number: submission.student_number.clone(),
                resident_name: submission.resident_name.clone(),
                email: submission.student_email.clone(),
            })
            .await?;
        if student.inserted {
            undo.record(Step::StudentCreated(student.student.id));
        }
        tracing::debug!("Student {} upserted (new: {})", student.student.id, student.inserted);

        let visitor = self
            .records
            .create_visitor(&submission.visitor_full_name)
            .await?;
        undo.record(Step::VisitorCreated(visitor.id));

        let visit = self
            .records
            .create_visit(&NewVisit {
                student_id: student.student.id,
                visitor_id: visitor.id,
                entry_at: submission.entry_at,
                exit_at: submission.exit_at,
                auto_overnight: true,
                created_ip: client_ip,
            })
            .await?;
        undo.record(Step::VisitCreated(visit.id));

        for (doc_type, file) in submission.documents() {
            self.store_document(visit.id, doc_type, file, storage, undo)
                .await?;
        }

        Ok(visit)
    }

    async fn store_document(
        &self,
        visit_id: Uuid,
        doc_type: DocType,
        file: &UploadedFile,
        storage: &dyn ObjectStore,
        undo: &mut Compensation,
    ) -> AppResult<()> {
        let storage_key = doc_type.storage_key(visit_id, &file.extension(doc_type));
        let mime = file.mime();

        storage
            .upload(&storage_key, file.bytes.clone(), &mime)
            .await?;
        undo.record(Step::ObjectUploaded(storage_key.clone()));

        let document = self
            .records
            .create_document(&NewDocument {
                visit_id,
                doc_type,
                storage_key,
                mime,
                size_bytes: file.size_bytes(),
            })
            .await?;
        undo.record(Step::DocumentCreated(document.id));
        tracing::debug!("Stored {} for visit {} as {}", doc_type, visit_id, document.storage_key);

        Ok(())
    }
}
