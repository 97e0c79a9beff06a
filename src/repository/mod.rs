//! Repository layer for database operations

pub mod documents;
pub mod students;
pub mod visitors;
pub mod visits;

use async_trait::async_trait;
use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::{Document, NewDocument, NewVisit, StudentUpsert, UpsertStudent, Visit, Visitor},
};

/// Relational writes the intake flow depends on
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecordStore: Send + Sync {
    async fn upsert_student(&self, data: &UpsertStudent) -> AppResult<StudentUpsert>;
    async fn delete_student(&self, id: Uuid) -> AppResult<()>;

    async fn create_visitor(&self, full_name: &str) -> AppResult<Visitor>;
    async fn delete_visitor(&self, id: Uuid) -> AppResult<()>;

    async fn create_visit(&self, data: &NewVisit) -> AppResult<Visit>;
    async fn delete_visit(&self, id: Uuid) -> AppResult<()>;

    async fn create_document(&self, data: &NewDocument) -> AppResult<Document>;
    async fn delete_document(&self, id: Uuid) -> AppResult<()>;

    /// Connectivity check for readiness probes
    async fn ping(&self) -> AppResult<()>;
}

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub students: students::StudentsRepository,
    pub visitors: visitors::VisitorsRepository,
    pub visits: visits::VisitsRepository,
    pub documents: documents::DocumentsRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            students: students::StudentsRepository::new(pool.clone()),
            visitors: visitors::VisitorsRepository::new(pool.clone()),
            visits: visits::VisitsRepository::new(pool.clone()),
            documents: documents::DocumentsRepository::new(pool.clone()),
            pool,
        }
    }
}

#[async_trait]
impl RecordStore for Repository {
    async fn upsert_student(&self, data: &UpsertStudent) -> AppResult<StudentUpsert> {
        self.students.upsert(data).await
    }

    async fn delete_student(&self, id: Uuid) -> AppResult<()> {
        self.students.delete(id).await
    }

    async fn create_visitor(&self, full_name: &str) -> AppResult<Visitor> {
        self.visitors.create(full_name).await
    }

    async fn delete_visitor(&self, id: Uuid) -> AppResult<()> {
        self.visitors.delete(id).await
    }

    async fn create_visit(&self, data: &NewVisit) -> AppResult<Visit> {
        self.visits.create(data).await
    }

    async fn delete_visit(&self, id: Uuid) -> AppResult<()> {
        self.visits.delete(id).await
    }

    async fn create_document(&self, data: &NewDocument) -> AppResult<Document> {
        self.documents.create(data).await
    }

    async fn delete_document(&self, id: Uuid) -> AppResult<()> {
        self.documents.delete(id).await
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
