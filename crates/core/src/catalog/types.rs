//! Types for remote episode catalog lookups.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One episode of a season as the catalog lists it.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CatalogEpisode {
    /// Episode number within the season.
    pub episode_number: u32,
    /// First air date, when the catalog knows a valid one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub air_date: Option<NaiveDate>,
}

impl CatalogEpisode {
    pub fn new(episode_number: u32, air_date: Option<NaiveDate>) -> Self {
        Self {
            episode_number,
            air_date,
        }
    }

    /// Whether the episode aired strictly before `today`.
    ///
    /// Episodes without an air date have not aired.
    pub fn has_aired(&self, today: NaiveDate) -> bool {
        self.air_date.is_some_and(|date| date < today)
    }
}

/// Which id scheme the library's series ids use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeriesIdSource {
    /// Ids are TMDB TV ids and can be used directly.
    #[default]
    Tmdb,
    /// Ids are TheTVDB ids and must be mapped to TMDB first.
    Tvdb,
}

impl SeriesIdSource {
    /// Kodi `uniqueid.type` value for this scheme.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Tmdb => "tmdb",
            Self::Tvdb => "tvdb",
        }
    }
}

/// Parse a catalog air date (`YYYY-MM-DD`).
///
/// Blank or malformed values mean "unknown".
pub fn parse_air_date(value: Option<&str>) -> Option<NaiveDate> {
    let value = value?.trim();
    if value.is_empty() {
        return None;
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d").ok()
}

/// Errors that can occur when resolving a season against the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The lookup could not be completed (network, auth, rate limit, bad response).
    #[error("Catalog unavailable: {0}")]
    Unavailable(String),

    /// The series or season does not exist in the catalog.
    #[error("Unknown series: {0}")]
    UnknownSeries(String),

    /// Client not configured (missing API key, etc.).
    #[error("Client not configured: {0}")]
    NotConfigured(String),
}

impl CatalogError {
    /// Short label for logs and metrics.
    pub fn reason(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::UnknownSeries(_) => "unknown_series",
            Self::NotConfigured(_) => "not_configured",
        }
    }
}

impl From<reqwest::Error> for CatalogError {
    fn from(e: reqwest::Error) -> Self {
        Self::Unavailable(format!("HTTP request failed: {}", e))
    }
}
