//! Mock episode catalog for testing.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;

use crate::catalog::{CatalogEpisode, CatalogError, EpisodeCatalog};

/// A recorded season lookup for test assertions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedSeasonQuery {
    pub series_id: u32,
    pub season_number: u32,
    pub locale: String,
}

/// Mock implementation of the EpisodeCatalog trait.
///
/// Provides controllable behavior for testing:
/// - Return configurable season listings
/// - Track queries for assertions
/// - Simulate failures for the next call or for a specific season
/// - Delay responses per season to shake out ordering assumptions
///
/// # Example
///
/// ```rust,ignore
/// use seasonwatch_core::testing::{MockEpisodeCatalog, fixtures};
///
/// let catalog = MockEpisodeCatalog::new();
/// catalog.add_season(81189, 1, fixtures::aired_episodes(7)).await;
///
/// let episodes = catalog.season_episodes(81189, 1, "en-US").await?;
/// assert_eq!(episodes.len(), 7);
/// ```
#[derive(Debug, Default)]
pub struct MockEpisodeCatalog {
    /// Season listings by (series_id, season_number).
    seasons: Arc<RwLock<HashMap<(u32, u32), Vec<CatalogEpisode>>>>,
    /// Errors returned for specific seasons on every call.
    season_errors: Arc<RwLock<HashMap<(u32, u32), CatalogError>>>,
    /// Artificial latency per season.
    delays: Arc<RwLock<HashMap<(u32, u32), Duration>>>,
    /// Recorded queries.
    queries: Arc<RwLock<Vec<RecordedSeasonQuery>>>,
    /// If set, the next operation will fail with this error.
    next_error: Arc<RwLock<Option<CatalogError>>>,
}

impl MockEpisodeCatalog {
    /// Create a new empty mock catalog.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Season Configuration
    // =========================================================================

    /// Add (or replace) a season listing.
    pub async fn add_season(
        &self,
        series_id: u32,
        season_number: u32,
        episodes: Vec<CatalogEpisode>,
    ) {
        self.seasons
            .write()
            .await
            .insert((series_id, season_number), episodes);
    }

    /// Clear all seasons.
    pub async fn clear_seasons(&self) {
        self.seasons.write().await.clear();
    }

    /// Delay responses for one season.
    pub async fn set_delay(&self, series_id: u32, season_number: u32, delay: Duration) {
        self.delays
            .write()
            .await
            .insert((series_id, season_number), delay);
    }

    // =========================================================================
    // Query Recording
    // =========================================================================

    /// Get all recorded queries.
    pub async fn recorded_queries(&self) -> Vec<RecordedSeasonQuery> {
        self.queries.read().await.clone()
    }

    /// Get the number of queries performed.
    pub async fn query_count(&self) -> usize {
        self.queries.read().await.len()
    }

    // =========================================================================
    // Error Injection
    // =========================================================================

    /// Configure the next operation to fail with the given error.
    pub async fn set_next_error(&self, error: CatalogError) {
        *self.next_error.write().await = Some(error);
    }

    /// Make every lookup of one season fail.
    pub async fn fail_season(&self, series_id: u32, season_number: u32, error: CatalogError) {
        self.season_errors
            .write()
            .await
            .insert((series_id, season_number), error);
    }

    async fn take_error(&self) -> Option<CatalogError> {
        self.next_error.write().await.take()
    }

    async fn record(&self, query: RecordedSeasonQuery) {
        self.queries.write().await.push(query);
    }
}

/// Errors are not `Clone`; rebuild one with the same kind and message.
fn replay(error: &CatalogError) -> CatalogError {
    match error {
        CatalogError::Unavailable(m) => CatalogError::Unavailable(m.clone()),
        CatalogError::UnknownSeries(m) => CatalogError::UnknownSeries(m.clone()),
        CatalogError::NotConfigured(m) => CatalogError::NotConfigured(m.clone()),
    }
}

#[async_trait]
impl EpisodeCatalog for MockEpisodeCatalog {
    async fn season_episodes(
        &self,
        series_id: u32,
        season_number: u32,
        locale: &str,
    ) -> Result<Vec<CatalogEpisode>, CatalogError> {
        let key = (series_id, season_number);

        let delay = self.delays.read().await.get(&key).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if let Some(err) = self.take_error().await {
            return Err(err);
        }

        self.record(RecordedSeasonQuery {
            series_id,
            season_number,
            locale: locale.to_string(),
        })
        .await;

        if let Some(err) = self.season_errors.read().await.get(&key) {
            return Err(replay(err));
        }

        self.seasons.read().await.get(&key).cloned().ok_or_else(|| {
            CatalogError::UnknownSeries(format!(
                "Season {} of series {} not found",
                season_number, series_id
            ))
        })
    }
}
