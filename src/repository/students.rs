//! Students repository

use sqlx::{Pool, Postgres};
use uuid::Uuid;

use crate::{
    error::AppResult,
    models::student::{StudentUpsert, UpsertStudent},
};

#[derive(Clone)]
pub struct StudentsRepository {
    pool: Pool<Postgres>,
}

impl StudentsRepository {
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self { pool }
    }

    /// Insert a student, or overwrite name and email of the one with the same number.
    /// `inserted` is true only when no row existed before (`xmax = 0`).
    pub async fn upsert(&self, data: &UpsertStudent) -> AppResult<StudentUpsert> {
        let row = sqlx::query_as::<_, StudentUpsert>(
            r#"
            INSERT INTO students (student_number, resident_name, email)
            VALUES ($1, $2, $3)
            ON CONFLICT (student_number) DO UPDATE
            SET resident_name = EXCLUDED.resident_name,
                email = EXCLUDED.email,
                updated_at = NOW()
            RETURNING *, (xmax = 0) AS inserted
            "#,
        )
        .bind(&data.student_number)
        .bind(&data.resident_name)
        .bind(&data.email)
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    pub async fn delete(&self, id: Uuid) -> AppResult<()> {
        sqlx::query("DELETE FROM students WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
