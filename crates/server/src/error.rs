use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use moviesearch_core::error::{ApiError, ErrorEnvelope};
use moviesearch_metadata::MetadataError;
use tracing::warn;

/// Newtype wrapper so we can implement `IntoResponse` in this crate.
pub struct AppError(pub ApiError);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        if let ApiError::ServiceUnavailable { service, status: upstream, detail } = &self.0 {
            warn!(service = %service, upstream_status = upstream, detail = %detail, "upstream unavailable");
        }
        let envelope = ErrorEnvelope::from(&self.0);
        (status, Json(envelope)).into_response()
    }
}

impl From<ApiError> for AppError {
    fn from(e: ApiError) -> Self {
        Self(e)
    }
}

impl From<MetadataError> for AppError {
    fn from(e: MetadataError) -> Self {
        Self(e.into())
    }
}
