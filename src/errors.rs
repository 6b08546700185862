use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

pub type Result<T> = core::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    Extraction(String),

    #[error("model call failed ({}): {message}", status.map(|s| s.to_string()).unwrap_or_else(|| "network".into()))]
    Upstream {
        status: Option<u16>,
        message: String,
    },

    #[error("{0}")]
    Persistence(String),

    #[error("{0}")]
    Permission(String),

    #[error("{0}")]
    NotFound(String),

    #[error("authentication required")]
    Unauthorized,

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Migrate(#[from] sqlx::migrate::MigrateError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let (code, message, detail) = match self {
            Error::Validation(ref msg) | Error::Extraction(ref msg) => {
                (StatusCode::BAD_REQUEST, msg.clone(), None)
            }
            Error::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "Authentication required".to_string(),
                None,
            ),
            Error::Permission(ref msg) => (StatusCode::FORBIDDEN, msg.clone(), None),
            Error::NotFound(ref msg) => (StatusCode::NOT_FOUND, msg.clone(), None),
            Error::Upstream { .. } => {
                tracing::error!("{self}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Failed to edit resume.".to_string(),
                    Some(self.to_string()),
                )
            }
            ref other => {
                tracing::error!("{other}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred".to_string(),
                    Some(other.to_string()),
                )
            }
        };
        let mut body = json!({"status": "error", "message": message});
        if let Some(detail) = detail {
            body["error"] = json!(detail);
        }
        (code, Json(body)).into_response()
    }
}
