use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A processed submission. Created only as the terminal step of a
/// successful pipeline run and never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ResumeRecord {
    pub id: i32,
    pub user_id: String,
    pub filename: String,
    pub job_title: String,
    pub job_description: String,
    pub original_text: String,
    pub tailored_text: String,
    pub score: String,
    pub created_at: DateTime<Utc>,
}
