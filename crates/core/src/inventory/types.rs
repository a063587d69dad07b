//! Types for the local episode inventory.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A row exactly as the inventory source returned it.
///
/// Kodi keeps season/episode numbers and the scraper's series id in text
/// columns, so everything except the play count arrives as optional text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawEpisodeRow {
    pub show_title: Option<String>,
    pub series_id: Option<String>,
    pub season_number: Option<String>,
    pub episode_number: Option<String>,
    pub watch_count: Option<i64>,
}

/// A typed, validated inventory entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EpisodeRef {
    /// Show title as stored in the library.
    pub show_title: String,
    /// Catalog series identifier.
    pub series_id: u32,
    /// Season number (0 for specials).
    pub season_number: u32,
    /// Episode number within the season (always positive).
    pub episode_number: u32,
    /// How many times the episode has been played.
    pub watch_count: u32,
}

impl EpisodeRef {
    /// Identity of the episode: (series, season, episode).
    pub fn key(&self) -> (u32, u32, u32) {
        (self.series_id, self.season_number, self.episode_number)
    }

    /// Whether this is a specials entry (season 0).
    pub fn is_special(&self) -> bool {
        self.season_number == 0
    }
}

impl TryFrom<RawEpisodeRow> for EpisodeRef {
    type Error = InvalidRowError;

    fn try_from(row: RawEpisodeRow) -> Result<Self, Self::Error> {
        let show_title = row
            .show_title
            .filter(|t| !t.trim().is_empty())
            .ok_or(InvalidRowError::MissingField("show_title"))?;

        let series_id = parse_number(row.series_id, "series_id", &show_title)?;
        let season_number = parse_number(row.season_number, "season_number", &show_title)?;
        let episode_number = parse_number(row.episode_number, "episode_number", &show_title)?;

        if season_number < 0 {
            return Err(InvalidRowError::NegativeSeason {
                show_title,
                season_number,
            });
        }
        if episode_number <= 0 {
            return Err(InvalidRowError::NonPositiveEpisode {
                show_title,
                season_number,
                episode_number,
            });
        }

        let watch_count = row.watch_count.unwrap_or(0);
        if watch_count < 0 {
            return Err(InvalidRowError::NegativeWatchCount {
                show_title,
                watch_count,
            });
        }

        Ok(Self {
            series_id: to_u32(series_id, "series_id", &show_title)?,
            season_number: to_u32(season_number, "season_number", &show_title)?,
            episode_number: to_u32(episode_number, "episode_number", &show_title)?,
            watch_count: u32::try_from(watch_count).unwrap_or(u32::MAX),
            show_title,
        })
    }
}

fn parse_number(
    value: Option<String>,
    field: &'static str,
    show_title: &str,
) -> Result<i64, InvalidRowError> {
    let raw = value.ok_or(InvalidRowError::MissingField(field))?;
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InvalidRowError::MissingField(field));
    }
    trimmed.parse().map_err(|_| InvalidRowError::InvalidNumber {
        field,
        value: raw.clone(),
        show_title: show_title.to_string(),
    })
}

fn to_u32(value: i64, field: &'static str, show_title: &str) -> Result<u32, InvalidRowError> {
    u32::try_from(value).map_err(|_| InvalidRowError::InvalidNumber {
        field,
        value: value.to_string(),
        show_title: show_title.to_string(),
    })
}

/// All locally known episodes of one show's one season.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonBucket {
    pub show_title: String,
    pub series_id: u32,
    pub season_number: u32,
    /// Distinct episode numbers present locally, ascending.
    pub present_episodes: BTreeSet<u32>,
    /// Always `present_episodes.len()`.
    pub local_episode_count: u32,
    /// Highest play count of any episode in the season.
    pub max_watch_count: u32,
    /// Sum of all play counts in the season.
    pub total_watch_count: u32,
}

impl SeasonBucket {
    /// Create an empty bucket for a show season.
    pub fn new(show_title: impl Into<String>, series_id: u32, season_number: u32) -> Self {
        Self {
            show_title: show_title.into(),
            series_id,
            season_number,
            present_episodes: BTreeSet::new(),
            local_episode_count: 0,
            max_watch_count: 0,
            total_watch_count: 0,
        }
    }

    /// Fold one episode into the bucket.
    pub fn add(&mut self, episode_number: u32, watch_count: u32) {
        self.present_episodes.insert(episode_number);
        self.local_episode_count = self.present_episodes.len() as u32;
        self.max_watch_count = self.max_watch_count.max(watch_count);
        self.total_watch_count = self.total_watch_count.saturating_add(watch_count);
    }

    /// Whether any episode of the season has been played.
    pub fn is_watching(&self) -> bool {
        self.max_watch_count > 0
    }
}

/// What the indexer does with a row it cannot use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RowPolicy {
    /// Log a warning and keep going.
    #[default]
    Skip,
    /// Stop indexing at the first bad row.
    Abort,
}

/// Database engine holding the Kodi video library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryDialect {
    /// Local `MyVideos*.db` file.
    #[default]
    Sqlite,
    /// Shared MySQL/MariaDB library.
    Mysql,
}

/// Buckets produced from one inventory read.
#[derive(Debug, Clone, Default)]
pub struct IndexedInventory {
    /// Season buckets ordered by show title, then season number.
    pub buckets: Vec<SeasonBucket>,
    /// Rows dropped because they failed validation.
    pub rejected_rows: usize,
    /// Rows dropped because they belong to season 0.
    pub specials_skipped: usize,
}

/// A malformed inventory row.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InvalidRowError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Invalid {field} '{value}' for '{show_title}'")]
    InvalidNumber {
        field: &'static str,
        value: String,
        show_title: String,
    },

    #[error("Negative season {season_number} for '{show_title}'")]
    NegativeSeason {
        show_title: String,
        season_number: i64,
    },

    #[error("Non-positive episode number {episode_number} in '{show_title}' season {season_number}")]
    NonPositiveEpisode {
        show_title: String,
        season_number: i64,
        episode_number: i64,
    },

    #[error("Negative watch count {watch_count} for '{show_title}'")]
    NegativeWatchCount {
        show_title: String,
        watch_count: i64,
    },
}

/// Errors reading the inventory source itself.
#[derive(Debug, Error)]
pub enum InventoryError {
    #[error("Inventory database not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Inventory not configured: {0}")]
    NotConfigured(String),
}
