use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Failures raised by the tailoring and document pipelines.
///
/// Only `Configuration` is fatal to a whole batch. The other variants end the
/// current job and are recorded as a `JobFailure`. A degraded compile is not
/// an error at all; it is carried on the artifact as `CompileStatus::Degraded`.
#[derive(Debug, Error)]
pub enum TailorError {
    #[error("configuration error: {0}")]
    Configuration(String),

    #[error("generation error: {0}")]
    Generation(String),

    #[error("schema error at `{path}`: {message}")]
    Schema { path: String, message: String },

    #[error("grounding error: `{field}` value {value:?} has no matching entry in the profile")]
    Grounding { field: String, value: String },

    #[error("render error: {0}")]
    Render(String),

    #[error("archive error: {0}")]
    Archive(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl TailorError {
    pub fn schema(path: impl Into<String>, message: impl Into<String>) -> Self {
        TailorError::Schema {
            path: path.into(),
            message: message.into(),
        }
    }

    pub fn grounding(field: impl Into<String>, value: impl Into<String>) -> Self {
        TailorError::Grounding {
            field: field.into(),
            value: value.into(),
        }
    }

    /// Stable machine-readable kind, used in job failure reports.
    pub fn kind(&self) -> &'static str {
        match self {
            TailorError::Configuration(_) => "configuration",
            TailorError::Generation(_) => "generation",
            TailorError::Schema { .. } => "schema",
            TailorError::Grounding { .. } => "grounding",
            TailorError::Render(_) => "render",
            TailorError::Archive(_) => "archive",
            TailorError::Io(_) => "io",
        }
    }
}

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Tailor(#[from] TailorError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "UNAUTHORIZED",
                "Authentication required".to_string(),
            ),
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Tailor(e) => {
                let (status, code) = match e {
                    TailorError::Configuration(_) => {
                        (StatusCode::SERVICE_UNAVAILABLE, "CONFIGURATION_ERROR")
                    }
                    TailorError::Generation(_) => (StatusCode::BAD_GATEWAY, "GENERATION_ERROR"),
                    TailorError::Schema { .. } => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "SCHEMA_ERROR")
                    }
                    TailorError::Grounding { .. } => {
                        (StatusCode::UNPROCESSABLE_ENTITY, "GROUNDING_ERROR")
                    }
                    TailorError::Render(_) | TailorError::Archive(_) | TailorError::Io(_) => {
                        tracing::error!("Document pipeline error: {e}");
                        (StatusCode::INTERNAL_SERVER_ERROR, "DOCUMENT_ERROR")
                    }
                };
                (status, code, e.to_string())
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
