//! HTTP error rendering.
//!
//! Handlers return [`AppResult`]; every failure surfaces as a JSON body
//! of the form `{ "error": <message>, "code": <machine code> }`. Domain
//! errors carry their own messages; database errors are sanitized, with
//! one exception: a unique-constraint violation on one of our `uq_`
//! constraints is a legitimate 409 the client is expected to handle
//! (e.g. a duplicate alert racing past the create-time signature check).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use shelfwatch_core::error::CoreError;

/// What a handler can fail with.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Database(#[from] sqlx::Error),

    #[error("internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

/// The JSON error body every failing endpoint returns.
#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    code: &'static str,
}

const GENERIC_INTERNAL: &str = "An internal error occurred";

impl AppError {
    /// Status code, machine code, and client-facing message.
    ///
    /// Internal details are logged here and replaced with
    /// [`GENERIC_INTERNAL`] before they reach the client.
    fn render(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::Core(core) => {
                let status = match core {
                    CoreError::NotFound { .. } => StatusCode::NOT_FOUND,
                    CoreError::Validation(_) => StatusCode::BAD_REQUEST,
                    CoreError::Conflict(_) => StatusCode::CONFLICT,
                    CoreError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
                    CoreError::Forbidden(_) => StatusCode::FORBIDDEN,
                    CoreError::Internal(msg) => {
                        tracing::error!(error = %msg, "Unclassified domain error");
                        return (
                            StatusCode::INTERNAL_SERVER_ERROR,
                            "INTERNAL_ERROR",
                            GENERIC_INTERNAL.to_string(),
                        );
                    }
                };
                (status, code_for(core), core.to_string())
            }

            AppError::Database(err) => {
                if let Some(constraint) = violated_unique_constraint(err) {
                    return (
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
                if matches!(err, sqlx::Error::RowNotFound) {
                    return (
                        StatusCode::NOT_FOUND,
                        "NOT_FOUND",
                        "Resource not found".to_string(),
                    );
                }
                tracing::error!(error = %err, "Database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    GENERIC_INTERNAL.to_string(),
                )
            }

            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    GENERIC_INTERNAL.to_string(),
                )
            }
        }
    }
}

fn code_for(core: &CoreError) -> &'static str {
    match core {
        CoreError::NotFound { .. } => "NOT_FOUND",
        CoreError::Validation(_) => "VALIDATION_ERROR",
        CoreError::Conflict(_) => "CONFLICT",
        CoreError::Unauthorized(_) => "UNAUTHORIZED",
        CoreError::Forbidden(_) => "FORBIDDEN",
        CoreError::Internal(_) => "INTERNAL_ERROR",
    }
}

/// The violated constraint name, if `err` is a PostgreSQL unique-violation
/// (SQLSTATE 23505) on one of our own `uq_`-prefixed constraints.
fn violated_unique_constraint(err: &sqlx::Error) -> Option<&str> {
    let db_err = err.as_database_error()?;
    if db_err.code().as_deref() != Some("23505") {
        return None;
    }
    db_err.constraint().filter(|name| name.starts_with("uq_"))
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, error) = self.render();
        (status, axum::Json(ErrorBody { error, code })).into_response()
    }
}
