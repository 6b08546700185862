use sqlx::PgConnection;

use crate::pkg::internal::adaptors::resumes::spec::ResumeRecord;
use crate::prelude::Result;

pub struct ResumeSelector<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> ResumeSelector<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        ResumeSelector { pool }
    }

    pub async fn get_by_id(&mut self, id: i32) -> Result<Option<ResumeRecord>> {
        let row = sqlx::query_as::<_, ResumeRecord>(
            "SELECT id, user_id, filename, job_title, job_description, original_text,
                    tailored_text, score, created_at
             FROM resumes WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&mut *self.pool)
        .await?;
        Ok(row)
    }

    pub async fn get_by_user(&mut self, user_id: &str, limit: i64) -> Result<Vec<ResumeRecord>> {
        let rows = sqlx::query_as::<_, ResumeRecord>(
            "SELECT id, user_id, filename, job_title, job_description, original_text,
                    tailored_text, score, created_at
             FROM resumes WHERE user_id = $1
             ORDER BY created_at DESC, id DESC LIMIT $2",
        )
        .bind(user_id)
        .bind(limit)
        .fetch_all(&mut *self.pool)
        .await?;
        Ok(rows)
    }
}
