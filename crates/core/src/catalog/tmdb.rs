//! TMDB (The Movie Database) season lookups.
//!
//! TMDB requires an API key for access.
//! Rate limits are generous (around 40 requests per second).

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::types::{parse_air_date, CatalogEpisode, CatalogError, SeriesIdSource};
use super::EpisodeCatalog;

/// TMDB API client configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TmdbConfig {
    /// TMDB v3 API key (required).
    pub api_key: String,
    /// Base URL (default: https://api.themoviedb.org/3).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Locale passed as `language` on every lookup.
    #[serde(default = "default_language")]
    pub language: String,
    /// Id scheme of the series ids stored in the library.
    #[serde(default)]
    pub series_id_source: SeriesIdSource,
    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_timeout() -> u32 {
    30
}

impl TmdbConfig {
    /// Config with defaults for everything but the key.
    pub fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            language: default_language(),
            series_id_source: SeriesIdSource::default(),
            timeout_secs: default_timeout(),
        }
    }
}

/// TMDB-backed episode catalog.
pub struct TmdbCatalog {
    client: Client,
    base_url: String,
    api_key: String,
    series_id_source: SeriesIdSource,
}

impl TmdbCatalog {
    /// Create a new TMDB client.
    pub fn new(config: TmdbConfig) -> Result<Self, CatalogError> {
        if config.api_key.is_empty() {
            return Err(CatalogError::NotConfigured(
                "TMDB API key is required".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_secs)))
            .build()
            .map_err(|e| CatalogError::NotConfigured(format!("HTTP client: {}", e)))?;

        let base_url = config
            .base_url
            .map(|url| url.trim_end_matches('/').to_string())
            .unwrap_or_else(|| "https://api.themoviedb.org/3".to_string());

        Ok(Self {
            client,
            base_url,
            api_key: config.api_key,
            series_id_source: config.series_id_source,
        })
    }

    /// Map a library series id to a TMDB TV id.
    async fn tmdb_id(&self, series_id: u32) -> Result<u32, CatalogError> {
        match self.series_id_source {
            SeriesIdSource::Tmdb => Ok(series_id),
            SeriesIdSource::Tvdb => {
                let url = format!("{}/find/{}", self.base_url, series_id);

                debug!("TMDB find: tvdb_id={}", series_id);

                let response = self
                    .client
                    .get(&url)
                    .query(&[
                        ("api_key", self.api_key.as_str()),
                        ("external_source", "tvdb_id"),
                    ])
                    .send()
                    .await?;

                let found: TmdbFindResponse =
                    parse_response(response, || format!("TVDB id {}", series_id)).await?;

                found
                    .tv_results
                    .first()
                    .map(|r| r.id)
                    .ok_or_else(|| CatalogError::UnknownSeries(format!("TVDB id {}", series_id)))
            }
        }
    }
}

#[async_trait]
impl EpisodeCatalog for TmdbCatalog {
    async fn season_episodes(
        &self,
        series_id: u32,
        season_number: u32,
        locale: &str,
    ) -> Result<Vec<CatalogEpisode>, CatalogError> {
        let tmdb_id = self.tmdb_id(series_id).await?;
        let url = format!("{}/tv/{}/season/{}", self.base_url, tmdb_id, season_number);

        debug!(
            "TMDB get season: series={}, season={}, language={}",
            tmdb_id, season_number, locale
        );

        let response = self
            .client
            .get(&url)
            .query(&[("api_key", self.api_key.as_str()), ("language", locale)])
            .send()
            .await?;

        let season: TmdbSeasonDetails = parse_response(response, || {
            format!("TV series {} season {}", tmdb_id, season_number)
        })
        .await?;

        Ok(season.episodes.into_iter().map(Into::into).collect())
    }
}

/// Map TMDB status codes onto catalog errors and decode the body.
async fn parse_response<T, F>(response: Response, what: F) -> Result<T, CatalogError>
where
    T: DeserializeOwned,
    F: FnOnce() -> String,
{
    let status = response.status();
    if status == 404 {
        return Err(CatalogError::UnknownSeries(what()));
    }
    if status == 401 {
        return Err(CatalogError::Unavailable(
            "Invalid TMDB API key".to_string(),
        ));
    }
    if status == 429 {
        return Err(CatalogError::Unavailable(
            "Rate limit exceeded, please wait before retrying".to_string(),
        ));
    }
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(CatalogError::Unavailable(format!(
            "API error: {} - {}",
            status.as_u16(),
            body
        )));
    }

    response.json().await.map_err(|e| {
        CatalogError::Unavailable(format!("Failed to parse response for {}: {}", what(), e))
    })
}

// ============================================================================
// TMDB API Response Types (private)
// ============================================================================

#[derive(Debug, Deserialize)]
struct TmdbFindResponse {
    #[serde(default)]
    tv_results: Vec<TmdbFindResult>,
}

#[derive(Debug, Deserialize)]
struct TmdbFindResult {
    id: u32,
}

#[derive(Debug, Deserialize)]
struct TmdbSeasonDetails {
    #[serde(default)]
    episodes: Vec<TmdbEpisodeResult>,
}

#[derive(Debug, Deserialize)]
struct TmdbEpisodeResult {
    episode_number: u32,
    air_date: Option<String>,
}

impl From<TmdbEpisodeResult> for CatalogEpisode {
    fn from(e: TmdbEpisodeResult) -> Self {
        Self {
            episode_number: e.episode_number,
            air_date: parse_air_date(e.air_date.as_deref()),
        }
    }
}
