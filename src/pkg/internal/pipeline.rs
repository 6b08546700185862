use std::sync::Arc;

use sqlx::PgPool;

use crate::pkg::internal::adaptors::resumes::mutators::{CreateResumeData, ResumeMutator};
use crate::pkg::internal::ai::read::extract_document;
use crate::pkg::internal::ai::tailor::TailorOps;
use crate::pkg::internal::score::extract_score;
use crate::pkg::internal::upload::TempUpload;
use crate::pkg::server::state::GetTxn;
use crate::prelude::{Error, Result};

/// One submission as it arrives from the upload form. The staged upload is
/// owned here so it is removed on every exit path, early returns included.
pub struct JobInput {
    pub upload: Option<TempUpload>,
    pub job_title: Option<String>,
    pub job_description: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug)]
pub struct JobOutput {
    pub extracted_text: String,
    pub tailored_text: String,
    pub score: String,
}

/// Runs one submission through validation, extraction, tailoring, scoring
/// and persistence. History is best effort: a failed save is logged and the
/// tailored result is still returned.
pub async fn process<C: TailorOps>(
    db_pool: &Arc<PgPool>,
    client: &C,
    input: JobInput,
) -> Result<JobOutput> {
    let upload = input
        .upload
        .as_ref()
        .ok_or_else(|| Error::Validation("No file uploaded".into()))?;
    let job_description = input
        .job_description
        .as_deref()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .ok_or_else(|| Error::Validation("Job description is required".into()))?;

    let data = tokio::fs::read(upload.path()).await?;
    let extracted_text = extract_document(data, upload.mime_type())?;
    if extracted_text.trim().is_empty() {
        return Err(Error::Extraction(
            "Could not extract text from PDF. Please ensure the PDF contains readable text.".into(),
        ));
    }

    let tailored_text = client
        .tailor_resume(&extracted_text, job_description)
        .await?;
    let score = extract_score(&tailored_text);

    if let Some(user_id) = input
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
    {
        let record = CreateResumeData {
            user_id: user_id.to_string(),
            filename: upload.filename().to_string(),
            job_title: input
                .job_title
                .as_deref()
                .map(str::trim)
                .filter(|title| !title.is_empty())
                .unwrap_or("Untitled")
                .to_string(),
            job_description: job_description.to_string(),
            original_text: extracted_text.clone(),
            tailored_text: tailored_text.clone(),
            score: score.clone(),
        };
        if let Err(e) = save_history(db_pool, record).await {
            tracing::error!("failed to save resume history: {}", e);
        }
    }

    Ok(JobOutput {
        extracted_text,
        tailored_text,
        score,
    })
}

/// Insert and evict within one transaction so the cap holds under
/// concurrent saves for the same user.
async fn save_history(db_pool: &Arc<PgPool>, record: CreateResumeData) -> Result<()> {
    let user_id = record.user_id.clone();
    let mut tx = db_pool
        .begin_txn()
        .await
        .map_err(|e| Error::Persistence(e.to_string()))?;
    let mut mutator = ResumeMutator::new(&mut tx);
    mutator
        .create(record)
        .await
        .map_err(|e| Error::Persistence(e.to_string()))?;
    let evicted = mutator
        .evict_beyond_cap(&user_id)
        .await
        .map_err(|e| Error::Persistence(e.to_string()))?;
    tx.commit()
        .await
        .map_err(|e| Error::Persistence(e.to_string()))?;
    if evicted > 0 {
        tracing::info!("evicted {} old resume(s) for user {}", evicted, user_id);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pkg::internal::ai::read::sample_pdf;
    use async_trait::async_trait;
    use sqlx::postgres::PgPoolOptions;
    use tracing_test::traced_test;

    struct CannedTailor(&'static str);

    #[async_trait]
    impl TailorOps for CannedTailor {
        async fn tailor_resume(&self, _resume_text: &str, _job_description: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct FailingTailor;

    #[async_trait]
    impl TailorOps for FailingTailor {
        async fn tailor_resume(&self, _resume_text: &str, _job_description: &str) -> Result<String> {
            Err(Error::Upstream {
                status: None,
                message: "connection refused".into(),
            })
        }
    }

    // never connected in these tests, failures happen before persistence
    fn lazy_pool() -> Arc<PgPool> {
        Arc::new(
            PgPoolOptions::new()
                .connect_lazy("postgres://pepperuni@localhost/pepperuni_test")
                .unwrap(),
        )
    }

    async fn staged(bytes: &[u8]) -> TempUpload {
        TempUpload::persist(&std::env::temp_dir(), "resume.pdf", bytes)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn rejects_a_missing_file() {
        let input = JobInput {
            upload: None,
            job_title: None,
            job_description: Some("Own the roadmap".into()),
            user_id: None,
        };
        let err = process(&lazy_pool(), &CannedTailor("x"), input)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn rejects_a_missing_job_description_and_removes_the_upload() {
        let upload = staged(b"%PDF-garbage").await;
        let path = upload.path().to_path_buf();
        let input = JobInput {
            upload: Some(upload),
            job_title: None,
            job_description: None,
            user_id: None,
        };
        let err = process(&lazy_pool(), &CannedTailor("x"), input)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn a_blank_job_description_counts_as_missing() {
        let upload = staged(b"%PDF-garbage").await;
        let input = JobInput {
            upload: Some(upload),
            job_title: None,
            job_description: Some("   \n".into()),
            user_id: None,
        };
        let err = process(&lazy_pool(), &CannedTailor("x"), input)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[tokio::test]
    async fn an_unreadable_document_fails_extraction_and_removes_the_upload() {
        let upload = staged(b"not a pdf at all").await;
        let path = upload.path().to_path_buf();
        let input = JobInput {
            upload: Some(upload),
            job_title: None,
            job_description: Some("Own the roadmap".into()),
            user_id: None,
        };
        let err = process(&lazy_pool(), &CannedTailor("x"), input)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Extraction(_)));
        assert!(!path.exists());
    }

    #[traced_test]
    #[tokio::test]
    async fn an_upstream_failure_surfaces_and_removes_the_upload() {
        let upload = staged(&sample_pdf("Seasoned product manager")).await;
        let path = upload.path().to_path_buf();
        let input = JobInput {
            upload: Some(upload),
            job_title: Some("PM".into()),
            job_description: Some("Own the roadmap".into()),
            user_id: None,
        };
        let err = process(&lazy_pool(), &FailingTailor, input)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Upstream { .. }));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn a_successful_run_yields_text_and_score_and_cleans_up() {
        let upload = staged(&sample_pdf("Seasoned product manager")).await;
        let path = upload.path().to_path_buf();
        let input = JobInput {
            upload: Some(upload),
            job_title: Some("PM".into()),
            job_description: Some("Own the roadmap".into()),
            user_id: None,
        };
        let output = process(
            &lazy_pool(),
            &CannedTailor("Strong alignment overall.\n\nTotal Score: 87"),
            input,
        )
        .await
        .unwrap();
        assert!(output.extracted_text.contains("Seasoned product manager"));
        assert_eq!(output.score, "87");
        assert!(!path.exists());
    }
}
