//! Error types for the API.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io;

/// Result type for API operations.
pub type ApiResult<T> = Result<T, ApiError>;

/// API error types following RFC 7807 Problem Details.
///
/// Compile failures are not represented here: they are rendered as an HTML
/// error page at the compile boundary.
#[derive(Debug)]
pub enum ApiError {
    /// Not found (404) - asset or file doesn't exist
    NotFound(String),

    /// Internal server error (500)
    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not Found: {}", msg),
            Self::InternalError(msg) => write!(f, "Internal Error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

/// RFC 7807 Problem Details response.
#[derive(Debug, Serialize, Deserialize)]
struct ProblemDetails {
    /// URI reference identifying the problem type
    #[serde(rename = "type")]
    type_uri: String,

    /// Short, human-readable summary
    title: String,

    /// HTTP status code
    status: u16,

    /// Human-readable explanation
    detail: String,
}

impl ApiError {
    /// HTTP status this error maps to.
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (title, detail) = match self {
            Self::NotFound(msg) => ("Not Found", msg),
            Self::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ("Internal Server Error", msg)
            }
        };

        let problem = ProblemDetails {
            type_uri: format!("https://vibe.dev/errors/{}", title.to_lowercase().replace(' ', "-")),
            title: title.to_string(),
            status: status.as_u16(),
            detail,
        };

        (status, Json(problem)).into_response()
    }
}

/// File helpers report through `anyhow` with context. A missing file anywhere
/// in the chain is a 404, anything else a 500.
impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        if let Some(io_err) = err.downcast_ref::<io::Error>() {
            if io_err.kind() == io::ErrorKind::NotFound {
                return ApiError::NotFound(err.to_string());
            }
        }
        ApiError::InternalError(err.to_string())
    }
}
