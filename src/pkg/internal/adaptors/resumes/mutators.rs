use sqlx::PgConnection;

use crate::pkg::internal::adaptors::resumes::spec::ResumeRecord;
use crate::pkg::internal::adaptors::resumes::HISTORY_CAP;
use crate::prelude::Result;

pub struct CreateResumeData {
    pub user_id: String,
    pub filename: String,
    pub job_title: String,
    pub job_description: String,
    pub original_text: String,
    pub tailored_text: String,
    pub score: String,
}

pub struct ResumeMutator<'a> {
    pool: &'a mut PgConnection,
}

impl<'a> ResumeMutator<'a> {
    pub fn new(pool: &'a mut PgConnection) -> Self {
        ResumeMutator { pool }
    }

    pub async fn create(&mut self, data: CreateResumeData) -> Result<ResumeRecord> {
        let row = sqlx::query_as::<_, ResumeRecord>(
            r#"
            INSERT INTO resumes (user_id, filename, job_title, job_description, original_text, tailored_text, score)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, user_id, filename, job_title, job_description, original_text, tailored_text, score, created_at
            "#,
        )
        .bind(&data.user_id)
        .bind(&data.filename)
        .bind(&data.job_title)
        .bind(&data.job_description)
        .bind(&data.original_text)
        .bind(&data.tailored_text)
        .bind(&data.score)
        .fetch_one(&mut *self.pool)
        .await?;
        Ok(row)
    }

    /// Drops everything beyond the newest HISTORY_CAP records for the user
    /// in one conditional DELETE, so the cap holds even under concurrent
    /// saves. Returns how many records were removed.
    pub async fn evict_beyond_cap(&mut self, user_id: &str) -> Result<u64> {
        let result = sqlx::query(
            r#"
            DELETE FROM resumes
            WHERE user_id = $1 AND id NOT IN (
                SELECT id FROM resumes WHERE user_id = $1
                ORDER BY created_at DESC, id DESC LIMIT $2
            )
            "#,
        )
        .bind(user_id)
        .bind(HISTORY_CAP)
        .execute(&mut *self.pool)
        .await?;
        Ok(result.rows_affected())
    }

    pub async fn delete_by_id(&mut self, id: i32) -> Result<u64> {
        let result = sqlx::query("DELETE FROM resumes WHERE id = $1")
            .bind(id)
            .execute(&mut *self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pkg::internal::adaptors::resumes::selectors::ResumeSelector;
    use sqlx::postgres::PgPoolOptions;
    use uuid::Uuid;

    fn record_for(user_id: &str, n: usize) -> CreateResumeData {
        CreateResumeData {
            user_id: user_id.to_string(),
            filename: format!("resume-{n}.pdf"),
            job_title: "Product Manager".to_string(),
            job_description: "Own the roadmap".to_string(),
            original_text: "original".to_string(),
            tailored_text: "tailored".to_string(),
            score: "80".to_string(),
        }
    }

    #[tokio::test]
    #[ignore = "needs a running postgres with migrations applied (DATABASE_URL)"]
    async fn a_sixth_save_evicts_the_oldest_record() {
        let url = std::env::var("DATABASE_URL").unwrap();
        let pool = PgPoolOptions::new().connect(&url).await.unwrap();
        let mut tx = pool.begin().await.unwrap();

        let user_id = Uuid::new_v4().to_string();
        for n in 0..6 {
            let mut mutator = ResumeMutator::new(&mut tx);
            mutator.create(record_for(&user_id, n)).await.unwrap();
            mutator.evict_beyond_cap(&user_id).await.unwrap();
        }

        let records = ResumeSelector::new(&mut tx)
            .get_by_user(&user_id, HISTORY_CAP)
            .await
            .unwrap();
        assert_eq!(records.len(), 5);
        // newest first, the very first save is gone
        let filenames: Vec<_> = records.iter().map(|r| r.filename.as_str()).collect();
        assert_eq!(
            filenames,
            ["resume-5.pdf", "resume-4.pdf", "resume-3.pdf", "resume-2.pdf", "resume-1.pdf"]
        );

        tx.rollback().await.unwrap();
    }
}
