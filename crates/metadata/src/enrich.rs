//! Per-item genre and cast lookups for TMDB search hits.
//!
//! Each lookup fetches `/{media}/{id}` and `/{media}/{id}/credits` together and
//! is cached per `(id, media)` across requests.

use moviesearch_core::{cached, TtlCache};
use serde::Deserialize;

use crate::tmdb::{TmdbApi, TmdbMediaType};
use crate::MetadataError;

/// Cast entries kept per title, in billing order.
pub const TOP_CAST: usize = 5;

pub type DetailKey = (u64, TmdbMediaType);
pub type DetailCache = TtlCache<DetailKey, Details>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Details {
    pub genres: Vec<String>,
    pub actors: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DetailsPayload {
    #[serde(default)]
    genres: Vec<Named>,
}

#[derive(Debug, Deserialize)]
struct CreditsPayload {
    #[serde(default)]
    cast: Vec<Named>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: Option<String>,
}

pub struct DetailEnricher {
    api: TmdbApi,
    cache: DetailCache,
}

impl DetailEnricher {
    pub fn new(api: TmdbApi, cache: DetailCache) -> Self {
        Self { api, cache }
    }

    /// Genres and top-billed cast for one title. Fails if either request fails.
    pub async fn get_details(
        &self,
        item_id: u64,
        media: TmdbMediaType,
    ) -> Result<Details, MetadataError> {
        cached(&self.cache, (item_id, media), || self.fetch(item_id, media)).await
    }

    async fn fetch(&self, item_id: u64, media: TmdbMediaType) -> Result<Details, MetadataError> {
        let details_path = format!("/{media}/{item_id}");
        let credits_path = format!("/{media}/{item_id}/credits");

        let (details, credits) = tokio::try_join!(
            self.api.get_json::<DetailsPayload>(&details_path, &[]),
            self.api.get_json::<CreditsPayload>(&credits_path, &[]),
        )?;

        Ok(build_details(details, credits))
    }
}

fn build_details(details: DetailsPayload, credits: CreditsPayload) -> Details {
    Details {
        genres: details.genres.into_iter().filter_map(|g| g.name).collect(),
        actors: credits
            .cast
            .into_iter()
            .take(TOP_CAST)
            .filter_map(|c| c.name)
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cast_is_truncated_to_top_billing() {
        let details: DetailsPayload = serde_json::from_value(json!({
            "id": 603,
            "genres": [
                { "id": 28, "name": "Action" },
                { "id": 878, "name": "Science Fiction" }
            ]
        }))
        .unwrap();
        let credits: CreditsPayload = serde_json::from_value(json!({
            "cast": [
                { "name": "Keanu Reeves" },
                { "name": "Laurence Fishburne" },
                { "name": "Carrie-Anne Moss" },
                { "name": "Hugo Weaving" },
                { "name": "Joe Pantoliano" },
                { "name": "Marcus Chong" },
                { "name": "Julian Arahanga" }
            ]
        }))
        .unwrap();

        let out = build_details(details, credits);
        assert_eq!(out.genres, vec!["Action", "Science Fiction"]);
        assert_eq!(
            out.actors,
            vec![
                "Keanu Reeves",
                "Laurence Fishburne",
                "Carrie-Anne Moss",
                "Hugo Weaving",
                "Joe Pantoliano"
            ]
        );
    }

    #[test]
    fn missing_sections_yield_empty_lists() {
        let details: DetailsPayload = serde_json::from_value(json!({ "id": 1 })).unwrap();
        let credits: CreditsPayload = serde_json::from_value(json!({ "id": 1 })).unwrap();
        assert_eq!(build_details(details, credits), Details::default());
    }
}
