//! Undo log for a partially completed submission

use uuid::Uuid;

use crate::{repository::RecordStore, storage::ObjectStore};

/// A completed write that can be reverted
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Only recorded when the upsert inserted a new row
    StudentCreated(Uuid),
    VisitorCreated(Uuid),
    VisitCreated(Uuid),
    ObjectUploaded(String),
    DocumentCreated(Uuid),
}

#[derive(Debug, Default)]
pub struct Compensation {
    steps: Vec<Step>,
}

impl Compensation {
    pub fn record(&mut self, step: Step) {
        self.steps.push(step);
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    /// Revert every recorded step, newest first. Failures are logged and skipped.
    pub async fn rollback(self, records: &dyn RecordStore, storage: &dyn ObjectStore) {
        for step in self.steps.into_iter().rev() {
            let result = match &step {
                Step::DocumentCreated(id) => records.delete_document(*id).await,
                Step::ObjectUploaded(key) => storage.remove(key).await,
                Step::VisitCreated(id) => records.delete_visit(*id).await,
                Step::VisitorCreated(id) => records.delete_visitor(*id).await,
                Step::StudentCreated(id) => records.delete_student(*id).await,
            };

            match result {
                Ok(()) => tracing::debug!("Compensated {:?}", step),
                Err(e) => tracing::warn!("Failed to compensate {:?}: {}", step, e),
            }
        }
    }
}
