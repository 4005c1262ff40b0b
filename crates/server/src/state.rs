use std::sync::Arc;

use moviesearch_core::TtlCache;
use moviesearch_metadata::aggregate::{Aggregator, SearchCache};
use moviesearch_metadata::enrich::DetailCache;
use moviesearch_metadata::omdb::{OmdbClient, OmdbConfig};
use moviesearch_metadata::provider::MovieSearchProvider;
use moviesearch_metadata::tmdb::{TmdbClient, TmdbConfig};

use crate::config::Settings;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<Aggregator>,
    pub search_cache: SearchCache,
    pub detail_cache: DetailCache,
}

impl AppState {
    /// Wire both providers and their caches. OMDB is merged ahead of TMDB.
    pub fn new(settings: &Settings, http: reqwest::Client) -> Self {
        let search_cache = TtlCache::new("search", settings.search_cache_ttl);
        let detail_cache = TtlCache::new("tmdb-details", settings.detail_cache_ttl);

        let omdb = OmdbClient::new(
            OmdbConfig {
                api_key: settings.omdb_api_key.clone(),
                base_url: settings.omdb_base_url.clone(),
            },
            http.clone(),
        );
        let tmdb = TmdbClient::new(
            TmdbConfig {
                api_key: settings.tmdb_api_key.clone(),
                base_url: settings.tmdb_base_url.clone(),
                image_base: settings.tmdb_image_base.clone(),
            },
            http,
            detail_cache.clone(),
        );

        let omdb: Arc<dyn MovieSearchProvider> = Arc::new(omdb);
        let tmdb: Arc<dyn MovieSearchProvider> = Arc::new(tmdb);

        Self {
            aggregator: Arc::new(Aggregator::new(vec![omdb, tmdb], search_cache.clone())),
            search_cache,
            detail_cache,
        }
    }

    /// Drop every cached search and detail lookup.
    pub async fn reset_caches(&self) {
        self.search_cache.reset().await;
        self.detail_cache.reset().await;
    }
}
