pub mod aggregate;
pub mod enrich;
pub mod http;
pub mod omdb;
pub mod provider;
pub mod tmdb;

use moviesearch_core::error::ApiError;
use moviesearch_core::SourceApi;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetadataError {
    #[error("{0}")]
    InvalidQuery(String),
    #[error("{service} unavailable (status {status}): {detail}")]
    ServiceUnavailable {
        service: SourceApi,
        status: u16,
        detail: String,
    },
}

impl MetadataError {
    pub fn unavailable(service: SourceApi, status: u16, detail: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            service,
            status,
            detail: detail.into(),
        }
    }
}

impl From<MetadataError> for ApiError {
    fn from(e: MetadataError) -> Self {
        match e {
            MetadataError::InvalidQuery(msg) => ApiError::BadRequest(msg),
            MetadataError::ServiceUnavailable {
                service,
                status,
                detail,
            } => ApiError::ServiceUnavailable {
                service: service.to_string(),
                status,
                detail,
            },
        }
    }
}

/// Why a single provider item was dropped instead of mapped.
#[derive(Error, Debug)]
pub enum SkipReason {
    #[error("missing field `{0}`")]
    MissingField(&'static str),
    #[error("poster is not an absolute http(s) URL: {0:?}")]
    InvalidPoster(String),
    #[error("malformed item: {0}")]
    Malformed(#[from] serde_json::Error),
}
