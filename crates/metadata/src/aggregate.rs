//! Multi-provider search aggregation.
//!
//! Rules:
//! 1. All providers are queried concurrently; any provider failure fails the search.
//! 2. Records are merged in provider order and deduplicated by natural id,
//!    first seen wins.
//! 3. Genre and actor filters run after the merge.
//! 4. Successful results are cached per request.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::try_join_all;
use moviesearch_core::{cached, MovieRecord, SearchKind, SearchResultSet, TtlCache};
use tracing::{info, warn};

use crate::provider::MovieSearchProvider;
use crate::MetadataError;

/// Query used when only filters are given; providers reject an empty search.
pub const WILDCARD_QUERY: &str = "a";

pub const MISSING_CRITERIA: &str = "At least one of 'title', 'actor', or 'genre' must be provided.";

pub type SearchCache = TtlCache<SearchRequest, SearchResultSet>;

/// Every parameter that affects a search. Doubles as the result cache key.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SearchRequest {
    pub title: Option<String>,
    pub kind: Option<SearchKind>,
    pub actor: Option<String>,
    pub genre: Option<String>,
}

impl SearchRequest {
    /// Blank strings count as absent.
    pub fn new(
        title: Option<String>,
        kind: Option<SearchKind>,
        actor: Option<String>,
        genre: Option<String>,
    ) -> Self {
        Self {
            title: non_blank(title),
            kind,
            actor: non_blank(actor),
            genre: non_blank(genre),
        }
    }

    pub fn validate(&self) -> Result<(), MetadataError> {
        if self.title.is_none() && self.actor.is_none() && self.genre.is_none() {
            return Err(MetadataError::InvalidQuery(MISSING_CRITERIA.to_string()));
        }
        Ok(())
    }

    /// Text sent to providers: title, else actor, else genre, else the wildcard.
    pub fn provider_query(&self) -> &str {
        self.title
            .as_deref()
            .or(self.actor.as_deref())
            .or(self.genre.as_deref())
            .unwrap_or(WILDCARD_QUERY)
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

pub struct Aggregator {
    providers: Vec<Arc<dyn MovieSearchProvider>>,
    cache: SearchCache,
}

impl Aggregator {
    /// Providers are merged in the order given here.
    pub fn new(providers: Vec<Arc<dyn MovieSearchProvider>>, cache: SearchCache) -> Self {
        Self { providers, cache }
    }

    pub fn cache(&self) -> &SearchCache {
        &self.cache
    }

    pub async fn search(&self, request: &SearchRequest) -> Result<SearchResultSet, MetadataError> {
        request.validate()?;

        if self.providers.is_empty() {
            warn!("no providers configured");
            return Ok(SearchResultSet::unconfigured());
        }

        cached(&self.cache, request.clone(), || self.search_uncached(request)).await
    }

    async fn search_uncached(&self, request: &SearchRequest) -> Result<SearchResultSet, MetadataError> {
        let query = request.provider_query();

        let batches = try_join_all(
            self.providers
                .iter()
                .map(|p| search_provider(p.as_ref(), query, request.kind)),
        )
        .await?;

        let fetched: usize = batches.iter().map(Vec::len).sum();
        let merged = dedup_by_natural_id(batches);
        let records = apply_filters(merged, request.genre.as_deref(), request.actor.as_deref());

        info!(query, fetched, returned = records.len(), "aggregated search");
        Ok(SearchResultSet::new(records))
    }
}

/// Run one provider, keeping only records stamped with its own source.
async fn search_provider(
    provider: &dyn MovieSearchProvider,
    query: &str,
    kind: Option<SearchKind>,
) -> Result<Vec<MovieRecord>, MetadataError> {
    let source = provider.source();
    let records = provider
        .search(query, kind)
        .await
        .inspect_err(|err| warn!(provider = %source, query, error = %err, "provider search failed"))?;

    Ok(records
        .into_iter()
        .filter(|rec| {
            let own = rec.source == source;
            if !own {
                warn!(
                    provider = %source,
                    natural_id = %rec.natural_id,
                    found = %rec.source,
                    "dropping record with foreign source"
                );
            }
            own
        })
        .collect())
}

/// Flatten batches in order, keeping the first record seen for each natural id.
pub fn dedup_by_natural_id(batches: Vec<Vec<MovieRecord>>) -> Vec<MovieRecord> {
    let mut seen = HashSet::new();
    batches
        .into_iter()
        .flatten()
        .filter(|rec| seen.insert(rec.natural_id.clone()))
        .collect()
}

/// Keep records matching every given filter, compared case-insensitively.
pub fn apply_filters(
    records: Vec<MovieRecord>,
    genre: Option<&str>,
    actor: Option<&str>,
) -> Vec<MovieRecord> {
    records
        .into_iter()
        .filter(|rec| genre.is_none_or(|g| rec.has_genre(g)))
        .filter(|rec| actor.is_none_or(|a| rec.has_actor(a)))
        .collect()
}
