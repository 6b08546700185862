use axum::extract::DefaultBodyLimit;
use axum::middleware::from_fn_with_state;
use axum::routing::{delete, get, post};
use axum::Router;

use super::handlers::probes::{healthz, livez};
use super::handlers::resumes::{self, MAX_UPLOAD_BYTES};
use super::middlewares::authn;
use super::state::AppState;
use crate::prelude::Result;

pub async fn build_routes() -> Result<Router> {
    let state = AppState::new().await?;
    let app = Router::new()
        .route("/api/resumes/user/{user_id}", get(resumes::list_for_user))
        .route("/api/resumes/delete/{resume_id}", delete(resumes::remove))
        .layer(from_fn_with_state(state.clone(), authn::authenticate))
        .route("/api/main_job", post(resumes::main_job))
        // multipart framing needs headroom beyond the file cap itself
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 64 * 1024))
        .route("/healthz", get(healthz))
        .route("/livez", get(livez))
        .with_state(state);

    Ok(app)
}
