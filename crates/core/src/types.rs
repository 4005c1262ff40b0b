use serde::{Deserialize, Serialize};

/// Content kind carried on every record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovieKind {
    Movie,
    Series,
    Episode,
    Game,
}

impl MovieKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
            Self::Episode => "episode",
            Self::Game => "game",
        }
    }
}

impl std::fmt::Display for MovieKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind filter accepted by the search endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SearchKind {
    Movie,
    Series,
}

impl SearchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Movie => "movie",
            Self::Series => "series",
        }
    }
}

impl std::fmt::Display for SearchKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SearchKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "movie" => Ok(Self::Movie),
            "series" => Ok(Self::Series),
            other => Err(format!(
                "invalid type '{other}', expected one of 'movie', 'series'"
            )),
        }
    }
}

/// Provider a record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SourceApi {
    #[serde(rename = "OMDB")]
    Omdb,
    #[serde(rename = "TMDB")]
    Tmdb,
}

impl SourceApi {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Omdb => "OMDB",
            Self::Tmdb => "TMDB",
        }
    }
}

impl std::fmt::Display for SourceApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The unified search entity.
///
/// Serialized with the capitalized provider convention (`Title`, `imdbID`, ...);
/// the snake_case names are accepted on input as well.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MovieRecord {
    #[serde(rename = "Title", alias = "title")]
    pub title: String,
    #[serde(rename = "Year", alias = "year")]
    pub year: String,
    /// Dedup key: an IMDb id, or `tmdb_<id>` for TMDB-only titles.
    #[serde(rename = "imdbID", alias = "imdb_id", alias = "natural_id")]
    pub natural_id: String,
    #[serde(rename = "Type", alias = "type", alias = "kind")]
    pub kind: MovieKind,
    #[serde(rename = "source_api", alias = "source")]
    pub source: SourceApi,
    #[serde(rename = "Poster", alias = "poster", alias = "poster_url", default)]
    pub poster_url: Option<String>,
    #[serde(default)]
    pub genres: Option<Vec<String>>,
    #[serde(default)]
    pub actors: Option<Vec<String>>,
}

impl MovieRecord {
    pub fn has_genre(&self, genre: &str) -> bool {
        contains_ignore_case(self.genres.as_deref(), genre)
    }

    pub fn has_actor(&self, actor: &str) -> bool {
        contains_ignore_case(self.actors.as_deref(), actor)
    }
}

fn contains_ignore_case(values: Option<&[String]>, needle: &str) -> bool {
    let needle = needle.to_lowercase();
    values
        .unwrap_or_default()
        .iter()
        .any(|v| v.to_lowercase() == needle)
}

/// Aggregated search output. `total_results` always equals the record count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResultSet {
    search_results: Vec<MovieRecord>,
    total_results: usize,
    response: bool,
}

impl SearchResultSet {
    pub fn new(records: Vec<MovieRecord>) -> Self {
        Self {
            total_results: records.len(),
            search_results: records,
            response: true,
        }
    }

    /// Result for an aggregator with no providers configured.
    pub fn unconfigured() -> Self {
        Self {
            search_results: Vec::new(),
            total_results: 0,
            response: false,
        }
    }

    pub fn records(&self) -> &[MovieRecord] {
        &self.search_results
    }

    pub fn total(&self) -> usize {
        self.total_results
    }

    pub fn ok(&self) -> bool {
        self.response
    }
}
