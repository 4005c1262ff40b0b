use moviesearch_core::{MovieRecord, SearchKind, SourceApi};

use crate::MetadataError;

/// A movie metadata provider the aggregator can fan out to.
#[async_trait::async_trait]
pub trait MovieSearchProvider: Send + Sync {
    /// Provenance stamped on every record this provider returns.
    fn source(&self) -> SourceApi;

    /// Search by free text, optionally restricted to one kind.
    ///
    /// "No matches" is an empty list. Items that fail mapping are dropped.
    /// Transport failures and non-2xx statuses are `ServiceUnavailable`.
    async fn search(
        &self,
        query: &str,
        kind: Option<SearchKind>,
    ) -> Result<Vec<MovieRecord>, MetadataError>;
}
