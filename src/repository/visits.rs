//! Visits repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::visit::{NewVisit, Visit},
};

#[derive(Clone)]
pub struct VisitsRepository {
    pool: Pool<Postgres>,
}

impl VisitsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, data: &NewVisit) -> AppResult<Visit> {
        let row = sqlx::query_as::<_, Visit>(
            r#"
            INSERT INTO visits (student_id, visitor_id, entry_at, exit_at, auto_overnight, created_ip)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING *
            "#,
        )
        .bind(data.student_id)
        .bind(data.visitor_id)
        .bind(data.entry_at)
        .bind(data.exit_at)
        .bind(data.auto_overnight)
        .bind(&data.created_ip)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    /// Removes the visit and, by cascade, its document rows
    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM visits WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
