use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::{Multipart, Path as AxumPath, State},
    Extension, Json,
};
use serde_json::{json, Value};
use sqlx::PgConnection;

use crate::conf::settings;
use crate::pkg::internal::adaptors::resumes::mutators::ResumeMutator;
use crate::pkg::internal::adaptors::resumes::selectors::ResumeSelector;
use crate::pkg::internal::adaptors::resumes::HISTORY_CAP;
use crate::pkg::internal::auth::User;
use crate::pkg::internal::pipeline::{self, JobInput};
use crate::pkg::internal::upload::TempUpload;
use crate::pkg::server::state::{AppState, GetTxn};
use crate::prelude::{Error, Result};

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

/// Entry point of the tailoring pipeline: multipart form with a PDF under
/// `file`, plus `job_title`, `job_description` and an optional `user_id`.
pub async fn main_job(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>> {
    let mut upload: Option<TempUpload> = None;
    let mut job_title: Option<String> = None;
    let mut job_description: Option<String> = None;
    let mut user_id: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Error::Validation(format!("Malformed upload request: {e}")))?
    {
        let field_name = field.name().unwrap_or("").to_string();
        match field_name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("resume.pdf").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| Error::Validation(format!("Failed to read uploaded file: {e}")))?;
                let extension = Path::new(&file_name)
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .unwrap_or("")
                    .to_lowercase();
                if extension != "pdf" {
                    return Err(Error::Validation(
                        "Invalid file type. Only PDF files are allowed".into(),
                    ));
                }
                if data.len() > MAX_UPLOAD_BYTES {
                    return Err(Error::Validation(
                        "File too large. Maximum size is 10MB".into(),
                    ));
                }
                upload =
                    Some(TempUpload::persist(Path::new(&settings.upload_dir), &file_name, &data).await?);
            }
            "job_title" => {
                job_title = Some(read_text_field(field).await?);
            }
            "job_description" => {
                job_description = Some(read_text_field(field).await?);
            }
            "user_id" => {
                user_id = Some(read_text_field(field).await?).filter(|id| !id.is_empty());
            }
            _ => {
                let _ = field
                    .bytes()
                    .await
                    .map_err(|e| Error::Validation(format!("Malformed upload request: {e}")))?;
            }
        }
    }

    let output = pipeline::process(
        &state.db_pool,
        &state.llm_client,
        JobInput {
            upload,
            job_title,
            job_description,
            user_id,
        },
    )
    .await?;

    Ok(Json(json!({
        "status": "success",
        "message": "Resume processed successfully",
        "data": {
            "extractedText": output.extracted_text,
            "editedResume": output.tailored_text,
            "score": output.score,
        }
    })))
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String> {
    field
        .text()
        .await
        .map_err(|e| Error::Validation(format!("Malformed upload request: {e}")))
}

pub async fn list_for_user(
    State(state): State<AppState>,
    Extension(_user): Extension<Arc<User>>,
    AxumPath(user_id): AxumPath<String>,
) -> Result<Json<Value>> {
    let mut tx = state.db_pool.begin_txn().await?;
    let resumes = ResumeSelector::new(&mut tx)
        .get_by_user(&user_id, HISTORY_CAP)
        .await?;
    let count = resumes.len();
    Ok(Json(json!({
        "status": "success",
        "message": "Resumes fetched successfully",
        "data": {
            "resumes": resumes,
            "count": count,
        }
    })))
}

pub async fn remove(
    State(state): State<AppState>,
    Extension(user): Extension<Arc<User>>,
    AxumPath(resume_id): AxumPath<i32>,
) -> Result<Json<Value>> {
    let mut tx = state.db_pool.begin_txn().await?;
    delete_record(&mut tx, &user.user_id, resume_id).await?;
    tx.commit().await?;
    tracing::info!("resume {} deleted by user {}", resume_id, &user.user_id);
    Ok(Json(json!({
        "status": "success",
        "message": "Resume deleted successfully",
    })))
}

/// A user may delete only their own records.
pub(crate) async fn delete_record(
    conn: &mut PgConnection,
    requesting_user_id: &str,
    resume_id: i32,
) -> Result<()> {
    let record = match ResumeSelector::new(&mut *conn).get_by_id(resume_id).await? {
        Some(record) => record,
        None => return Err(Error::NotFound("Resume not found".into())),
    };
    if record.user_id != requesting_user_id {
        return Err(Error::Permission(
            "You don't have permission to delete this resume".into(),
        ));
    }
    ResumeMutator::new(&mut *conn).delete_by_id(resume_id).await?;
    Ok(())
}
