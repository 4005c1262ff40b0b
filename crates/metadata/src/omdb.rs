//! OMDB (Open Movie Database) provider client.
//!
//! Search results already carry an IMDb id and a content type, so records map
//! almost one-to-one. The search endpoint has no genre or cast data.

use moviesearch_core::{MovieKind, MovieRecord, SearchKind, SourceApi};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::provider::MovieSearchProvider;
use crate::{http, MetadataError, SkipReason};

pub const DEFAULT_BASE_URL: &str = "http://www.omdbapi.com/";

#[derive(Debug, Clone)]
pub struct OmdbConfig {
    pub api_key: String,
    pub base_url: String,
}

pub struct OmdbClient {
    config: OmdbConfig,
    client: reqwest::Client,
}

impl OmdbClient {
    pub fn new(config: OmdbConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }
}

#[derive(Debug, Deserialize)]
struct OmdbSearchResponse {
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Search")]
    search: Option<Vec<serde_json::Value>>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OmdbItem {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year")]
    year: String,
    #[serde(rename = "imdbID")]
    imdb_id: String,
    #[serde(rename = "Type")]
    kind: MovieKind,
    #[serde(rename = "Poster")]
    poster: Option<String>,
}

#[async_trait::async_trait]
impl MovieSearchProvider for OmdbClient {
    fn source(&self) -> SourceApi {
        SourceApi::Omdb
    }

    async fn search(
        &self,
        query: &str,
        kind: Option<SearchKind>,
    ) -> Result<Vec<MovieRecord>, MetadataError> {
        let mut params = vec![("s", query), ("apikey", self.config.api_key.as_str())];
        if let Some(kind) = kind {
            params.push(("type", kind.as_str()));
        }

        let data: OmdbSearchResponse =
            http::get_json(&self.client, SourceApi::Omdb, &self.config.base_url, &params).await?;

        if data.response.as_deref() != Some("True") {
            debug!(
                query,
                error = data.error.as_deref().unwrap_or_default(),
                "OMDB returned no results"
            );
            return Ok(Vec::new());
        }

        Ok(data
            .search
            .unwrap_or_default()
            .into_iter()
            .filter_map(|raw| {
                let title = raw["Title"].as_str().unwrap_or("<untitled>").to_string();
                map_item(raw)
                    .inspect_err(|err| warn!(title = %title, error = %err, "skipping OMDB item"))
                    .ok()
            })
            .collect())
    }
}

fn map_item(raw: serde_json::Value) -> Result<MovieRecord, SkipReason> {
    let item: OmdbItem = serde_json::from_value(raw)?;
    if item.imdb_id.is_empty() {
        return Err(SkipReason::MissingField("imdbID"));
    }
    if let Some(poster) = item.poster.as_deref().filter(|p| !is_absolute_url(p)) {
        return Err(SkipReason::InvalidPoster(poster.to_string()));
    }

    Ok(MovieRecord {
        title: item.title,
        year: item.year,
        natural_id: item.imdb_id,
        kind: item.kind,
        source: SourceApi::Omdb,
        poster_url: item.poster,
        genres: Some(Vec::new()),
        actors: Some(Vec::new()),
    })
}

/// Posters must be absolute http(s) URLs. OMDB's `"N/A"` placeholder is not.
fn is_absolute_url(candidate: &str) -> bool {
    reqwest::Url::parse(candidate)
        .map(|u| matches!(u.scheme(), "http" | "https"))
        .unwrap_or(false)
}
