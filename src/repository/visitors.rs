//! Visitors repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{error::AppResult, models::visitor::Visitor};

#[derive(Clone)]
pub struct VisitorsRepository {
    pool: Pool<Postgres>,
}

impl VisitorsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Always inserts; visitors are never deduplicated
    pub async fn create(&self, full_name: &str) -> AppResult<Visitor> {
        let row = sqlx::query_as::<_, Visitor>(
            "INSERT INTO visitors (full_name) VALUES ($1) RETURNING *",
        )
        .bind(full_name)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM visitors WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
