//! TMDB (The Movie Database) provider client.
//!
//! Uses TMDB API v3: https://developer.themoviedb.org/docs
//!
//! Search hits carry no genres or cast and no IMDb id, so every hit is
//! enriched through [`DetailEnricher`] and keyed as `tmdb_<id>`.

use futures::future::try_join_all;
use moviesearch_core::{MovieKind, MovieRecord, SearchKind, SourceApi};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{debug, warn};

use crate::enrich::{DetailCache, DetailEnricher, Details};
use crate::provider::MovieSearchProvider;
use crate::{http, MetadataError, SkipReason};

pub const DEFAULT_BASE_URL: &str = "https://api.themoviedb.org/3";
pub const DEFAULT_IMAGE_BASE: &str = "https://image.tmdb.org/t/p/w500";

/// Year reported when a hit has no release or air date.
const UNKNOWN_YEAR: &str = "N/A";

#[derive(Debug, Clone)]
pub struct TmdbConfig {
    pub api_key: String,
    pub base_url: String,
    pub image_base: String,
}

/// TMDB splits search by media type; each has its own search and detail routes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TmdbMediaType {
    Movie,
    Tv,
}

impl TmdbMediaType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Tv => "tv",
        }
    }

    pub fn kind(self) -> MovieKind {
        match self {
            Self::Movie => MovieKind::Movie,
            Self::Tv => MovieKind::Series,
        }
    }

    /// Endpoints to query for a kind filter. No filter means both, movies first.
    pub fn for_filter(kind: Option<SearchKind>) -> &'static [Self] {
        match kind {
            Some(SearchKind::Movie) => &[Self::Movie],
            Some(SearchKind::Series) => &[Self::Tv],
            None => &[Self::Movie, Self::Tv],
        }
    }
}

impl std::fmt::Display for TmdbMediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Authenticated access to the TMDB API, shared with the enricher.
#[derive(Clone)]
pub struct TmdbApi {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl TmdbApi {
    pub fn new(api_key: String, base_url: &str, client: reqwest::Client) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<T, MetadataError> {
        let mut all_params = vec![("api_key", self.api_key.as_str())];
        all_params.extend_from_slice(params);

        let url = format!("{}{path}", self.base_url);
        http::get_json(&self.client, SourceApi::Tmdb, &url, &all_params).await
    }
}

pub struct TmdbClient {
    api: TmdbApi,
    image_base: String,
    enricher: DetailEnricher,
}

impl TmdbClient {
    pub fn new(config: TmdbConfig, client: reqwest::Client, detail_cache: DetailCache) -> Self {
        let api = TmdbApi::new(config.api_key, &config.base_url, client);
        Self {
            enricher: DetailEnricher::new(api.clone(), detail_cache),
            api,
            image_base: config.image_base,
        }
    }

    /// Search one media type and enrich every hit concurrently.
    async fn search_single_type(
        &self,
        query: &str,
        media: TmdbMediaType,
    ) -> Result<Vec<MovieRecord>, MetadataError> {
        let page: SearchPage = self
            .api
            .get_json(&format!("/search/{media}"), &[("query", query)])
            .await?;

        let hits: Vec<SearchHit> = page
            .results
            .unwrap_or_default()
            .into_iter()
            .filter_map(|raw| {
                serde_json::from_value::<SearchHit>(raw)
                    .inspect_err(|err| warn!(media = %media, error = %err, "skipping TMDB search hit"))
                    .ok()
            })
            .collect();

        if hits.is_empty() {
            return Ok(Vec::new());
        }
        debug!(media = %media, hits = hits.len(), "enriching TMDB hits");

        // try_join_all keeps input order, so details line up with hits by index.
        let details =
            try_join_all(hits.iter().map(|hit| self.enricher.get_details(hit.id, media))).await?;

        Ok(hits
            .into_iter()
            .zip(details)
            .filter_map(|(hit, details)| {
                let id = hit.id;
                map_hit(hit, media, details, &self.image_base)
                    .inspect_err(|err| warn!(tmdb_id = id, error = %err, "skipping TMDB item"))
                    .ok()
            })
            .collect())
    }
}

#[async_trait::async_trait]
impl MovieSearchProvider for TmdbClient {
    fn source(&self) -> SourceApi {
        SourceApi::Tmdb
    }

    async fn search(
        &self,
        query: &str,
        kind: Option<SearchKind>,
    ) -> Result<Vec<MovieRecord>, MetadataError> {
        let batches = try_join_all(
            TmdbMediaType::for_filter(kind)
                .iter()
                .map(|media| self.search_single_type(query, *media)),
        )
        .await?;

        Ok(batches.into_iter().flatten().collect())
    }
}

/// `results` may be missing or `null` when nothing matched.
#[derive(Debug, Deserialize)]
struct SearchPage {
    results: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    id: u64,
    title: Option<String>,
    name: Option<String>,
    release_date: Option<String>,
    first_air_date: Option<String>,
    poster_path: Option<String>,
}

fn map_hit(
    hit: SearchHit,
    media: TmdbMediaType,
    details: Details,
    image_base: &str,
) -> Result<MovieRecord, SkipReason> {
    let (title, date) = match media {
        TmdbMediaType::Movie => (hit.title.ok_or(SkipReason::MissingField("title"))?, hit.release_date),
        TmdbMediaType::Tv => (hit.name.ok_or(SkipReason::MissingField("name"))?, hit.first_air_date),
    };

    Ok(MovieRecord {
        title,
        year: year_from_date(date.as_deref()),
        natural_id: format!("tmdb_{}", hit.id),
        kind: media.kind(),
        source: SourceApi::Tmdb,
        poster_url: hit
            .poster_path
            .filter(|p| !p.is_empty())
            .map(|p| format!("{image_base}{p}")),
        genres: Some(details.genres),
        actors: Some(details.actors),
    })
}

/// `"2010-07-16"` -> `"2010"`; missing or empty dates become `"N/A"`.
fn year_from_date(date: Option<&str>) -> String {
    date.filter(|d| !d.is_empty())
        .and_then(|d| d.split('-').next())
        .unwrap_or(UNKNOWN_YEAR)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(id: u64) -> SearchHit {
        SearchHit {
            id,
            title: Some("Inception".into()),
            name: None,
            release_date: Some("2010-07-16".into()),
            first_air_date: None,
            poster_path: Some("/poster.jpg".into()),
        }
    }

    fn details() -> Details {
        Details {
            genres: vec!["Action".into(), "Science Fiction".into()],
            actors: vec!["Leonardo DiCaprio".into()],
        }
    }

    #[test]
    fn map_movie_hit() {
        let rec = map_hit(hit(27205), TmdbMediaType::Movie, details(), DEFAULT_IMAGE_BASE).unwrap();
        assert_eq!(rec.title, "Inception");
        assert_eq!(rec.year, "2010");
        assert_eq!(rec.natural_id, "tmdb_27205");
        assert_eq!(rec.kind, MovieKind::Movie);
        assert_eq!(rec.source, SourceApi::Tmdb);
        assert_eq!(
            rec.poster_url.as_deref(),
            Some("https://image.tmdb.org/t/p/w500/poster.jpg")
        );
        assert_eq!(rec.genres.unwrap(), vec!["Action", "Science Fiction"]);
        assert_eq!(rec.actors.unwrap(), vec!["Leonardo DiCaprio"]);
    }

    #[test]
    fn map_series_hit_uses_name_and_air_date() {
        let series = SearchHit {
            id: 1396,
            title: None,
            name: Some("Breaking Bad".into()),
            release_date: None,
            first_air_date: Some("2008-01-20".into()),
            poster_path: None,
        };
        let rec = map_hit(series, TmdbMediaType::Tv, Details::default(), DEFAULT_IMAGE_BASE).unwrap();
        assert_eq!(rec.title, "Breaking Bad");
        assert_eq!(rec.year, "2008");
        assert_eq!(rec.kind, MovieKind::Series);
        assert_eq!(rec.poster_url, None);
    }

    #[test]
    fn hit_without_title_is_skipped() {
        let mut untitled = hit(1);
        untitled.title = None;
        let res = map_hit(untitled, TmdbMediaType::Movie, Details::default(), DEFAULT_IMAGE_BASE);
        assert!(matches!(res, Err(SkipReason::MissingField("title"))));
    }

    #[test]
    fn year_falls_back_when_date_missing() {
        assert_eq!(year_from_date(Some("1999-03-31")), "1999");
        assert_eq!(year_from_date(Some("")), "N/A");
        assert_eq!(year_from_date(None), "N/A");
    }

    #[test]
    fn filter_selects_endpoints() {
        assert_eq!(
            TmdbMediaType::for_filter(Some(SearchKind::Movie)),
            &[TmdbMediaType::Movie]
        );
        assert_eq!(
            TmdbMediaType::for_filter(Some(SearchKind::Series)),
            &[TmdbMediaType::Tv]
        );
        assert_eq!(
            TmdbMediaType::for_filter(None),
            &[TmdbMediaType::Movie, TmdbMediaType::Tv]
        );
    }
}
