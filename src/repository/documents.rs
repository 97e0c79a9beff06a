//! Documents repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::document::{Document, NewDocument},
};

#[derive(Clone)]
pub struct DocumentsRepository {
    pool: Pool<Postgres>,
}

impl DocumentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    pub async fn create(&self, data: &NewDocument) -> AppResult<Document> {
        let row = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (visit_id, doc_type, storage_key, mime, size_bytes)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(data.visit_id)
        .bind(data.doc_type.as_str())
        .bind(&data.storage_key)
        .bind(&data.mime)
        .bind(data.size_bytes)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM documents WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
