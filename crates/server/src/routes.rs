use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use moviesearch_core::error::ApiError;
use moviesearch_core::{SearchKind, SearchResultSet};
use moviesearch_metadata::aggregate::SearchRequest;
use serde::{Deserialize, Serialize};
use tower_http::trace::TraceLayer;

use crate::error::AppError;
use crate::state::AppState;

pub const WELCOME_MESSAGE: &str =
    "Welcome to the Movie Search API! Navigate to /docs for API documentation.";

/// Shortest accepted title.
const MIN_TITLE_CHARS: usize = 2;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root))
        .route("/health", get(health))
        .nest("/movies", movies_router())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

fn movies_router() -> Router<AppState> {
    Router::new().route("/search", get(search_movies))
}

// ---------------------------------------------------------------------------
// Root / health
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct MessageResponse {
    message: &'static str,
}

async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: WELCOME_MESSAGE,
    })
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct SearchParams {
    title: Option<String>,
    #[serde(rename = "type")]
    kind: Option<String>,
    actor: Option<String>,
    genre: Option<String>,
}

impl SearchParams {
    /// Missing criteria is a 400 before any other check; malformed values are 422.
    fn into_request(self) -> Result<SearchRequest, ApiError> {
        let mut request = SearchRequest::new(self.title, None, self.actor, self.genre);
        request.validate()?;

        if let Some(title) = &request.title {
            if title.chars().count() < MIN_TITLE_CHARS {
                return Err(ApiError::Unprocessable(format!(
                    "title must be at least {MIN_TITLE_CHARS} characters"
                )));
            }
        }

        request.kind = self
            .kind
            .filter(|k| !k.trim().is_empty())
            .map(|k| k.parse::<SearchKind>())
            .transpose()
            .map_err(ApiError::Unprocessable)?;

        Ok(request)
    }
}

async fn search_movies(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResultSet>, AppError> {
    let request = params.into_request()?;
    let results = state.aggregator.search(&request).await?;
    Ok(Json(results))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(title: Option<&str>, kind: Option<&str>) -> SearchParams {
        SearchParams {
            title: title.map(Into::into),
            kind: kind.map(Into::into),
            ..Default::default()
        }
    }

    #[test]
    fn missing_criteria_wins_over_bad_type() {
        let err = params(None, Some("episode")).into_request().unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[test]
    fn short_title_and_unknown_type_are_unprocessable() {
        let err = params(Some("M"), None).into_request().unwrap_err();
        assert_eq!(err.status_code(), 422);

        let err = params(Some("Matrix"), Some("game")).into_request().unwrap_err();
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn valid_params_build_request() {
        let req = params(Some("Matrix"), Some("series")).into_request().unwrap();
        assert_eq!(req.title.as_deref(), Some("Matrix"));
        assert_eq!(req.kind, Some(SearchKind::Series));

        let req = params(Some("Matrix"), Some("")).into_request().unwrap();
        assert_eq!(req.kind, None);
    }

    #[test]
    fn blank_title_counts_as_absent() {
        let req = SearchParams {
            title: Some("  ".into()),
            actor: Some("Keanu Reeves".into()),
            ..Default::default()
        }
        .into_request()
        .unwrap();
        assert_eq!(req.title, None);
        assert_eq!(req.provider_query(), "Keanu Reeves");
    }
}
