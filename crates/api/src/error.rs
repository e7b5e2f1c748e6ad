use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use collabspace_core::error::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Every variant renders as `{ "success": false, "message", "error" }`, with
/// `error` holding a stable machine-readable code.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `collabspace_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed request (unparseable JSON, bad query string).
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// No route matched the request path.
    #[error("Route not found: {0}")]
    RouteNotFound(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

/// Status, code, public message, and (for 500s) the underlying error text.
struct Classified {
    status: StatusCode,
    code: &'static str,
    message: String,
    detail: Option<String>,
}

impl Classified {
    fn client(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
            detail: None,
        }
    }

    fn internal(detail: String) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            code: "INTERNAL_ERROR",
            message: "Server error".to_string(),
            detail: Some(detail),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let classified = match &self {
            AppError::Core(core) => match core {
                CoreError::NotFound { entity, id } => Classified::client(
                    StatusCode::NOT_FOUND,
                    "NOT_FOUND",
                    format!("{entity} with id {id} not found"),
                ),
                CoreError::Validation(msg) => {
                    Classified::client(StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
                }
                CoreError::Conflict(msg) => {
                    Classified::client(StatusCode::CONFLICT, "CONFLICT", msg.clone())
                }
                CoreError::Unauthorized(msg) => {
                    Classified::client(StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone())
                }
                CoreError::Forbidden(msg) => {
                    Classified::client(StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    Classified::internal(msg.clone())
                }
            },

            AppError::Database(err) => classify_sqlx_error(err),

            AppError::BadRequest(msg) => {
                Classified::client(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone())
            }
            AppError::RouteNotFound(path) => Classified::client(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("Route {path} not found"),
            ),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                Classified::internal(msg.clone())
            }
        };

        let mut body = json!({
            "success": false,
            "message": classified.message,
            "error": classified.code,
        });
        if let Some(detail) = classified.detail {
            body["detail"] = json!(detail);
        }

        (classified.status, axum::Json(body)).into_response()
    }
}

/// Map a sqlx error onto the HTTP envelope.
///
/// - `RowNotFound` maps to 404.
/// - Unique violations on a `uq_*` constraint map to 409.
/// - Everything else is a 500 carrying the database message in `detail`.
fn classify_sqlx_error(err: &sqlx::Error) -> Classified {
    match err {
        sqlx::Error::RowNotFound => {
            Classified::client(StatusCode::NOT_FOUND, "NOT_FOUND", "Resource not found")
        }
        sqlx::Error::Database(db_err) => {
            // PostgreSQL unique_violation
            if db_err.code().as_deref() == Some("23505") {
                let constraint = db_err.constraint().unwrap_or("unknown");
                if constraint.starts_with("uq_") {
                    return Classified::client(
                        StatusCode::CONFLICT,
                        "CONFLICT",
                        format!("Duplicate value violates unique constraint: {constraint}"),
                    );
                }
            }
            tracing::error!(error = %db_err, "Database error");
            Classified::internal(db_err.to_string())
        }
        other => {
            tracing::error!(error = %other, "Database error");
            Classified::internal(other.to_string())
        }
    }
}

/// Shorthand for the not-found error every handler raises.
pub fn not_found(entity: &'static str, id: collabspace_core::types::DbId) -> AppError {
    AppError::Core(CoreError::NotFound { entity, id })
}
