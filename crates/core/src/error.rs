use serde::Serialize;
use thiserror::Error;

/// Unified API error type.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Unprocessable(String),

    #[error("The external service '{service}' is currently unavailable.")]
    ServiceUnavailable {
        service: String,
        status: u16,
        detail: String,
    },
}

impl ApiError {
    pub fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest(_) => 400,
            Self::Unprocessable(_) => 422,
            Self::ServiceUnavailable { .. } => 503,
        }
    }
}

/// JSON error body.
///
/// Upstream failures use `{ "message", "original_status_code", "original_detail" }`,
/// everything else `{ "detail": "…" }`.
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ErrorEnvelope {
    Upstream {
        message: String,
        original_status_code: u16,
        original_detail: String,
    },
    Detail {
        detail: String,
    },
}

impl From<&ApiError> for ErrorEnvelope {
    fn from(e: &ApiError) -> Self {
        match e {
            ApiError::ServiceUnavailable { status, detail, .. } => Self::Upstream {
                message: e.to_string(),
                original_status_code: *status,
                original_detail: detail.clone(),
            },
            other => Self::Detail {
                detail: other.to_string(),
            },
        }
    }
}
