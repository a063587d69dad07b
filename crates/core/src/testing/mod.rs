//! Testing utilities and mock implementations.
//!
//! This module provides a mock episode catalog and fixture builders so the
//! reconciliation pipeline can be exercised without a network or a Kodi
//! database.
//!
//! # Example
//!
//! ```rust,ignore
//! use seasonwatch_core::testing::{fixtures, MockEpisodeCatalog};
//!
//! let catalog = MockEpisodeCatalog::new();
//! catalog.add_season(81189, 1, fixtures::aired_episodes(7)).await;
//!
//! let rows = vec![fixtures::episode_row("Breaking Bad", 81189, 1, 1, 0)];
//! ```

mod mock_catalog;

pub use mock_catalog::{MockEpisodeCatalog, RecordedSeasonQuery};

/// Test fixtures and helper functions.
pub mod fixtures {
    use chrono::NaiveDate;

    use crate::catalog::CatalogEpisode;
    use crate::inventory::{RawEpisodeRow, SeasonBucket};

    /// A date safely in the past for any test run.
    pub fn long_ago() -> NaiveDate {
        NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default()
    }

    /// A date safely in the future for any test run.
    pub fn far_future() -> NaiveDate {
        NaiveDate::from_ymd_opt(9999, 12, 31).unwrap_or_default()
    }

    /// `count` episodes numbered from 1, all aired long ago.
    pub fn aired_episodes(count: u32) -> Vec<CatalogEpisode> {
        (1..=count)
            .map(|e| CatalogEpisode::new(e, Some(long_ago())))
            .collect()
    }

    /// `aired` past episodes followed by `upcoming` future ones.
    pub fn season_in_progress(aired: u32, upcoming: u32) -> Vec<CatalogEpisode> {
        let mut episodes = aired_episodes(aired);
        episodes.extend(
            (aired + 1..=aired + upcoming).map(|e| CatalogEpisode::new(e, Some(far_future()))),
        );
        episodes
    }

    /// A raw inventory row as the Kodi database would return it.
    pub fn episode_row(
        title: &str,
        series_id: u32,
        season: u32,
        episode: u32,
        plays: i64,
    ) -> RawEpisodeRow {
        RawEpisodeRow {
            show_title: Some(title.to_string()),
            series_id: Some(series_id.to_string()),
            season_number: Some(season.to_string()),
            episode_number: Some(episode.to_string()),
            watch_count: Some(plays),
        }
    }

    /// Rows for the given episode numbers of one season.
    pub fn season_rows(
        title: &str,
        series_id: u32,
        season: u32,
        episodes: &[u32],
        plays: i64,
    ) -> Vec<RawEpisodeRow> {
        episodes
            .iter()
            .map(|&e| episode_row(title, series_id, season, e, plays))
            .collect()
    }

    /// A bucket holding the given episodes, all with the same play count.
    pub fn bucket(
        title: &str,
        series_id: u32,
        season: u32,
        episodes: &[u32],
        plays: u32,
    ) -> SeasonBucket {
        let mut bucket = SeasonBucket::new(title, series_id, season);
        for &e in episodes {
            bucket.add(e, plays);
        }
        bucket
    }
}
