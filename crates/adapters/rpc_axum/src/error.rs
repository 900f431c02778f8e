//! Mapping of hearth errors onto RPC status codes and HTTP responses.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::{Deserialize, Serialize};

use hearth_domain::error::{HearthError, StreamError};

/// RPC status code carried by unary error bodies and stream error frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Code {
    InvalidArgument,
    Cancelled,
    Unavailable,
}

impl Code {
    /// HTTP status used when this code ends a unary call.
    #[must_use]
    pub fn http_status(self) -> StatusCode {
        match self {
            Self::InvalidArgument => StatusCode::BAD_REQUEST,
            // Client closed request, as popularised by nginx.
            Self::Cancelled => StatusCode::from_u16(499).unwrap_or(StatusCode::BAD_REQUEST),
            Self::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

/// `{code, details}` error body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RpcStatus {
    pub code: Code,
    pub details: String,
}

impl From<&StreamError> for RpcStatus {
    fn from(err: &StreamError) -> Self {
        let code = match err {
            StreamError::Malformed(_) => Code::InvalidArgument,
            StreamError::Transport(_) => Code::Unavailable,
            StreamError::Disconnected => Code::Cancelled,
        };
        Self {
            code,
            details: err.to_string(),
        }
    }
}

impl From<&HearthError> for RpcStatus {
    fn from(err: &HearthError) -> Self {
        match err {
            HearthError::Validation(err) => Self {
                code: Code::InvalidArgument,
                details: err.to_string(),
            },
            HearthError::Stream(err) => err.into(),
        }
    }
}

/// Maps [`HearthError`] to an HTTP response with the matching status code.
#[derive(Debug)]
pub struct RpcError(HearthError);

impl From<HearthError> for RpcError {
    fn from(err: HearthError) -> Self {
        Self(err)
    }
}

impl IntoResponse for RpcError {
    fn into_response(self) -> Response {
        let status = RpcStatus::from(&self.0);
        if let HearthError::Stream(err) = &self.0 {
            tracing::error!(error = %err, "stream error on unary call");
        }
        (status.code.http_status(), Json(status)).into_response()
    }
}
