use std::time::Duration;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing required setting {0}")]
    Missing(&'static str),
    #[error("invalid value for {var}: {value:?}")]
    Invalid { var: &'static str, value: String },
}

/// Runtime settings. API keys are never logged, so there is no `Debug` impl.
#[derive(Clone)]
pub struct Settings {
    pub omdb_api_key: String,
    pub tmdb_api_key: String,
    pub bind_addr: String,
    pub omdb_base_url: String,
    pub tmdb_base_url: String,
    pub tmdb_image_base: String,
    pub search_cache_ttl: Duration,
    pub detail_cache_ttl: Duration,
    pub upstream_timeout: Duration,
}

impl Settings {
    /// Defaults for everything except the two provider keys.
    pub fn with_api_keys(omdb_api_key: impl Into<String>, tmdb_api_key: impl Into<String>) -> Self {
        Self {
            omdb_api_key: omdb_api_key.into(),
            tmdb_api_key: tmdb_api_key.into(),
            bind_addr: "0.0.0.0:8000".to_string(),
            omdb_base_url: moviesearch_metadata::omdb::DEFAULT_BASE_URL.to_string(),
            tmdb_base_url: moviesearch_metadata::tmdb::DEFAULT_BASE_URL.to_string(),
            tmdb_image_base: moviesearch_metadata::tmdb::DEFAULT_IMAGE_BASE.to_string(),
            search_cache_ttl: Duration::from_secs(3600),
            detail_cache_ttl: Duration::from_secs(86_400),
            upstream_timeout: Duration::from_secs(10),
        }
    }

    /// Load from the process environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let required = |var: &'static str| {
            lookup(var)
                .filter(|v| !v.trim().is_empty())
                .ok_or(ConfigError::Missing(var))
        };
        let secs = |var: &'static str, default: Duration| match lookup(var) {
            None => Ok(default),
            Some(raw) => raw
                .trim()
                .parse::<u64>()
                .map(Duration::from_secs)
                .map_err(|_| ConfigError::Invalid { var, value: raw }),
        };

        let mut settings = Self::with_api_keys(required("OMDB_API_KEY")?, required("TMDB_API_KEY")?);
        if let Some(v) = lookup("MOVIESEARCH_BIND") {
            settings.bind_addr = v;
        }
        if let Some(v) = lookup("OMDB_BASE_URL") {
            settings.omdb_base_url = v;
        }
        if let Some(v) = lookup("TMDB_BASE_URL") {
            settings.tmdb_base_url = v;
        }
        if let Some(v) = lookup("TMDB_IMAGE_BASE") {
            settings.tmdb_image_base = v;
        }
        settings.search_cache_ttl =
            secs("MOVIESEARCH_SEARCH_CACHE_TTL_SECS", settings.search_cache_ttl)?;
        settings.detail_cache_ttl =
            secs("MOVIESEARCH_DETAIL_CACHE_TTL_SECS", settings.detail_cache_ttl)?;
        settings.upstream_timeout =
            secs("MOVIESEARCH_UPSTREAM_TIMEOUT_SECS", settings.upstream_timeout)?;

        Ok(settings)
    }
}
