//! Resolves how many episodes of a season have aired.

use std::sync::Arc;

use chrono::{Local, NaiveDate};
use tracing::debug;

use super::{CatalogError, EpisodeCatalog};

/// Turns a catalog season listing into an aired-episode count.
pub struct CatalogResolver {
    catalog: Arc<dyn EpisodeCatalog>,
    locale: String,
    today: NaiveDate,
}

impl CatalogResolver {
    /// Create a resolver that counts against the current local date.
    pub fn new(catalog: Arc<dyn EpisodeCatalog>, locale: impl Into<String>) -> Self {
        Self {
            catalog,
            locale: locale.into(),
            today: Local::now().date_naive(),
        }
    }

    /// Count against a fixed date instead of the clock.
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = today;
        self
    }

    pub fn today(&self) -> NaiveDate {
        self.today
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Number of episodes of the season that aired before today.
    ///
    /// This is the expected local episode count, independent of how the
    /// library numbers its episodes.
    pub async fn resolve_aired_count(
        &self,
        series_id: u32,
        season_number: u32,
    ) -> Result<u32, CatalogError> {
        let episodes = self
            .catalog
            .season_episodes(series_id, season_number, &self.locale)
            .await?;

        let aired = episodes
            .iter()
            .filter(|episode| episode.has_aired(self.today))
            .count();

        debug!(
            "Series {} season {}: {} of {} listed episodes aired before {}",
            series_id,
            season_number,
            aired,
            episodes.len(),
            self.today
        );

        Ok(u32::try_from(aired).unwrap_or(u32::MAX))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogEpisode;
    use crate::testing::MockEpisodeCatalog;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_counts_only_past_dated_episodes() {
        let catalog = Arc::new(MockEpisodeCatalog::new());
        catalog
            .add_season(
                42,
                1,
                vec![
                    CatalogEpisode::new(1, Some(date(2024, 1, 1))),
                    CatalogEpisode::new(2, Some(date(2024, 1, 8))),
                    CatalogEpisode::new(3, Some(date(2024, 1, 15))),
                    CatalogEpisode::new(4, Some(date(2024, 1, 22))),
                    CatalogEpisode::new(5, None),
                ],
            )
            .await;

        let resolver =
            CatalogResolver::new(catalog.clone(), "en-US").with_today(date(2024, 1, 15));

        assert_eq!(resolver.resolve_aired_count(42, 1).await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_passes_locale_through() {
        let catalog = Arc::new(MockEpisodeCatalog::new());
        catalog.add_season(7, 2, vec![]).await;

        let resolver = CatalogResolver::new(catalog.clone(), "de-DE");
        assert_eq!(resolver.resolve_aired_count(7, 2).await.unwrap(), 0);

        let queries = catalog.recorded_queries().await;
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].locale, "de-DE");
        assert_eq!((queries[0].series_id, queries[0].season_number), (7, 2));
    }

    #[tokio::test]
    async fn test_unknown_season_is_an_error() {
        let catalog = Arc::new(MockEpisodeCatalog::new());
        let resolver = CatalogResolver::new(catalog, "en-US");

        let err = resolver.resolve_aired_count(1, 1).await.unwrap_err();
        assert!(matches!(err, CatalogError::UnknownSeries(_)));
    }

    #[tokio::test]
    async fn test_catalog_failure_propagates() {
        let catalog = Arc::new(MockEpisodeCatalog::new());
        catalog.add_season(1, 1, vec![]).await;
        catalog
            .fail_season(1, 1, CatalogError::Unavailable("connection reset".into()))
            .await;

        let resolver = CatalogResolver::new(catalog, "en-US");
        let err = resolver.resolve_aired_count(1, 1).await.unwrap_err();
        assert!(matches!(err, CatalogError::Unavailable(_)));
    }
}
