use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use hashlink_core::Lookup;
use serde_json::json;
use tracing::error;

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug)]
pub enum AppError {
    InvalidRequest(String),
    NotFound,
    Unavailable(String),
    /// A stored URL that cannot be sent as a `Location` header.
    InvalidTarget(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::InvalidRequest(reason) => {
                (StatusCode::BAD_REQUEST, format!("invalid request: {reason}"))
            }
            AppError::NotFound => (
                StatusCode::NOT_FOUND,
                "short code does not exist".to_string(),
            ),
            AppError::Unavailable(reason) => {
                error!(error = %reason, "Storage unavailable");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "storage temporarily unavailable".to_string(),
                )
            }
            AppError::InvalidTarget(reason) => {
                error!(error = %reason, "Stored URL is not a valid redirect target");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "stored url cannot be used as a redirect".to_string(),
                )
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}

/// Maps a store lookup onto the HTTP error taxonomy.
pub fn found<T>(lookup: Lookup<T>) -> Result<T> {
    match lookup {
        Lookup::Found(value) => Ok(value),
        Lookup::NotFound => Err(AppError::NotFound),
        Lookup::Unavailable(err) => Err(AppError::Unavailable(err.to_string())),
    }
}
