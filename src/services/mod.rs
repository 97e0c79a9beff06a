//! Business logic services

pub mod compensation;
pub mod validation;
pub mod visits;

use std::sync::Arc;

use crate::{config::IntakeConfig, repository::RecordStore, storage::ObjectStore};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub records: Arc<dyn RecordStore>,
    pub visits: visits::VisitsService,
}

impl Services {
    /// Create all services over the given record store and optional object store
    pub fn new(
        records: Arc<dyn RecordStore>,
        storage: Option<Arc<dyn ObjectStore>>,
        intake_config: IntakeConfig,
    ) -> Self {
        Self {
            visits: visits::VisitsService::new(records.clone(), storage, intake_config),
            records,
        }
    }
}
