//! Reconciliation run driver.
//!
//! Resolves the aired count of every season bucket, computes its gaps and
//! collects the results. A catalog failure only drops the affected season.

mod types;

pub use types::*;

use std::sync::Arc;
use std::time::Instant;

use futures::stream::{self, StreamExt};
use tracing::{debug, info, warn};

use crate::catalog::CatalogResolver;
use crate::gaps::{GapComputer, ReconciliationResult};
use crate::inventory::{InventoryIndexer, InventorySource, SeasonBucket};
use crate::metrics;
use crate::progress::{ProgressCallback, ProgressTracker};

/// Runs the reconciliation pipeline over a set of season buckets.
pub struct Reconciler {
    resolver: CatalogResolver,
    gaps: GapComputer,
    config: ReconcileConfig,
    progress: Arc<ProgressTracker>,
    on_progress: Option<ProgressCallback>,
}

impl Reconciler {
    pub fn new(resolver: CatalogResolver, config: ReconcileConfig) -> Self {
        Self {
            resolver,
            gaps: GapComputer::new(),
            config,
            progress: Arc::new(ProgressTracker::new()),
            on_progress: None,
        }
    }

    /// Receive a progress update after every season.
    pub fn with_progress_callback(mut self, callback: ProgressCallback) -> Self {
        self.on_progress = Some(callback);
        self
    }

    /// Shared progress counter for this reconciler.
    pub fn progress(&self) -> Arc<ProgressTracker> {
        Arc::clone(&self.progress)
    }

    /// Read the inventory, index it and reconcile every season.
    pub async fn run_source(
        &self,
        source: &dyn InventorySource,
        indexer: &InventoryIndexer,
    ) -> Result<ReconciliationReport, ReconcileError> {
        let rows = source.episode_rows().await?;
        let indexed = indexer.index(rows)?;

        if indexed.rejected_rows > 0 {
            warn!(
                "{} inventory rows could not be used and were skipped",
                indexed.rejected_rows
            );
        }

        let mut report = self.run(indexed.buckets).await;
        report.rejected_rows = indexed.rejected_rows;
        Ok(report)
    }

    /// Reconcile buckets, preserving their order in the report.
    ///
    /// Lookups run up to `concurrency` at a time; a failed lookup is logged,
    /// recorded in `skipped` and does not affect other seasons.
    pub async fn run(&self, buckets: Vec<SeasonBucket>) -> ReconciliationReport {
        let total = buckets.len();
        let concurrency = self.config.concurrency.max(1);

        info!(
            "Checking {} seasons against the catalog (concurrency {})",
            total, concurrency
        );

        let outcomes: Vec<Result<ReconciliationResult, SkippedSeason>> =
            stream::iter(buckets.iter())
                .map(|bucket| self.reconcile_bucket(bucket, total))
                .buffered(concurrency)
                .collect()
                .await;

        let mut report = ReconciliationReport {
            total_seasons: total,
            checked_seasons: outcomes.len(),
            ..Default::default()
        };

        for outcome in outcomes {
            match outcome {
                Ok(result) => report.results.push(result),
                Err(skipped) => report.skipped.push(skipped),
            }
        }

        info!(
            "Checked {} of {} seasons: {} need attention, {} missing episodes, {} skipped",
            report.checked_seasons,
            report.total_seasons,
            report.needing_attention().count(),
            report.missing_episode_total(),
            report.skipped.len()
        );

        report
    }

    async fn reconcile_bucket(
        &self,
        bucket: &SeasonBucket,
        total: usize,
    ) -> Result<ReconciliationResult, SkippedSeason> {
        debug!(
            "Checking series '{}' with id {} season {}",
            bucket.show_title, bucket.series_id, bucket.season_number
        );

        let started = Instant::now();
        let aired = self
            .resolver
            .resolve_aired_count(bucket.series_id, bucket.season_number)
            .await;
        let elapsed = started.elapsed().as_secs_f64();

        let update = self.progress.advance_update(total);
        if let Some(callback) = &self.on_progress {
            callback(update);
        }

        match aired {
            Ok(aired_count) => {
                metrics::CATALOG_LOOKUP_DURATION
                    .with_label_values(&["success"])
                    .observe(elapsed);

                let result = self.gaps.reconcile(bucket, aired_count);

                debug!(
                    "{}: season {} has {}/{} episodes, missing {:?}",
                    result.show_title,
                    result.season_number,
                    result.local_episode_count,
                    result.aired_count,
                    result.missing_episodes
                );

                metrics::SEASONS_RECONCILED
                    .with_label_values(&[result.status.as_str()])
                    .inc();
                metrics::MISSING_EPISODES.inc_by(result.missing_episodes.len() as u64);

                Ok(result)
            }
            Err(e) => {
                metrics::CATALOG_LOOKUP_DURATION
                    .with_label_values(&["failure"])
                    .observe(elapsed);
                metrics::SEASONS_SKIPPED
                    .with_label_values(&[e.reason()])
                    .inc();

                warn!(
                    "Skipping '{}' season {} (series {}): {}",
                    bucket.show_title, bucket.season_number, bucket.series_id, e
                );

                Err(SkippedSeason {
                    show_title: bucket.show_title.clone(),
                    series_id: bucket.series_id,
                    season_number: bucket.season_number,
                    reason: e.reason().to_string(),
                    message: e.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::CatalogError;
    use crate::gaps::SeasonStatus;
    use crate::testing::{fixtures, MockEpisodeCatalog};
    use std::sync::Mutex;
    use std::time::Duration;

    fn reconciler(catalog: Arc<MockEpisodeCatalog>, concurrency: usize) -> Reconciler {
        Reconciler::new(
            CatalogResolver::new(catalog, "en-US"),
            ReconcileConfig { concurrency },
        )
    }

    #[tokio::test]
    async fn test_reconciles_every_bucket() {
        let catalog = Arc::new(MockEpisodeCatalog::new());
        catalog.add_season(1, 1, fixtures::aired_episodes(5)).await;
        catalog.add_season(1, 2, fixtures::season_in_progress(2, 8)).await;

        let buckets = vec![
            fixtures::bucket("Show A", 1, 1, &[1, 2, 4], 0),
            fixtures::bucket("Show A", 1, 2, &[1, 2], 1),
        ];

        let report = reconciler(catalog, 1).run(buckets).await;

        assert_eq!(report.total_seasons, 2);
        assert_eq!(report.checked_seasons, 2);
        assert!(report.skipped.is_empty());

        assert_eq!(report.results[0].missing_episodes, vec![3, 5]);
        assert_eq!(report.results[0].status, SeasonStatus::Incomplete);
        assert_eq!(report.results[1].aired_count, 2);
        assert_eq!(report.results[1].status, SeasonStatus::WatchingComplete);
        assert_eq!(report.missing_episode_total(), 2);
        assert_eq!(report.needing_attention().count(), 1);
    }

    #[tokio::test]
    async fn test_failed_season_is_skipped_not_fatal() {
        let catalog = Arc::new(MockEpisodeCatalog::new());
        catalog.add_season(1, 1, fixtures::aired_episodes(3)).await;
        catalog
            .fail_season(2, 1, CatalogError::Unavailable("503".into()))
            .await;
        catalog.add_season(3, 1, fixtures::aired_episodes(2)).await;

        let buckets = vec![
            fixtures::bucket("Show A", 1, 1, &[1, 2, 3], 0),
            fixtures::bucket("Show B", 2, 1, &[1], 0),
            fixtures::bucket("Show C", 3, 1, &[2], 0),
        ];

        let report = reconciler(catalog, 1).run(buckets).await;

        assert_eq!(report.results.len(), 2);
        assert_eq!(report.results[0].show_title, "Show A");
        assert_eq!(report.results[1].show_title, "Show C");
        assert_eq!(report.results[1].missing_episodes, vec![1]);

        assert_eq!(report.skipped.len(), 1);
        assert_eq!(report.skipped[0].show_title, "Show B");
        assert_eq!(report.skipped[0].reason, "unavailable");
        assert_eq!(report.checked_seasons, 3);
    }

    #[tokio::test]
    async fn test_unknown_series_is_skipped() {
        let catalog = Arc::new(MockEpisodeCatalog::new());
        let report = reconciler(catalog, 1)
            .run(vec![fixtures::bucket("Ghost", 404, 1, &[1], 0)])
            .await;

        assert!(report.results.is_empty());
        assert_eq!(report.skipped[0].reason, "unknown_series");
    }

    #[tokio::test]
    async fn test_concurrent_run_keeps_bucket_order() {
        let catalog = Arc::new(MockEpisodeCatalog::new());
        for series in 1..=6u32 {
            catalog
                .add_season(series, 1, fixtures::aired_episodes(series))
                .await;
            // Earlier buckets answer later.
            catalog
                .set_delay(series, 1, Duration::from_millis(u64::from(60 - series * 10)))
                .await;
        }

        let buckets: Vec<SeasonBucket> = (1..=6u32)
            .map(|series| fixtures::bucket(&format!("Show {}", series), series, 1, &[1], 0))
            .collect();

        let report = reconciler(catalog, 4).run(buckets).await;

        let order: Vec<u32> = report.results.iter().map(|r| r.series_id).collect();
        assert_eq!(order, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(report.results[5].missing_episodes, vec![2, 3, 4, 5, 6]);
    }

    #[tokio::test]
    async fn test_progress_reaches_one_hundred() {
        let catalog = Arc::new(MockEpisodeCatalog::new());
        catalog.add_season(1, 1, fixtures::aired_episodes(1)).await;
        catalog.add_season(1, 2, fixtures::aired_episodes(1)).await;

        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let reconciler = reconciler(catalog, 1).with_progress_callback(Arc::new(
            move |update: crate::progress::ProgressUpdate| {
                sink.lock().unwrap().push(update.percent);
            },
        ));

        reconciler
            .run(vec![
                fixtures::bucket("Show A", 1, 1, &[1], 0),
                fixtures::bucket("Show A", 1, 2, &[1], 0),
                fixtures::bucket("Show A", 1, 3, &[1], 0),
            ])
            .await;

        assert_eq!(*seen.lock().unwrap(), vec![33, 66, 100]);
        assert_eq!(reconciler.progress().checked(), 3);
    }

    #[tokio::test]
    async fn test_empty_run() {
        let catalog = Arc::new(MockEpisodeCatalog::new());
        let report = reconciler(catalog.clone(), 2).run(Vec::new()).await;

        assert_eq!(report.total_seasons, 0);
        assert!(report.results.is_empty());
        assert_eq!(catalog.query_count().await, 0);
    }

    #[tokio::test]
    async fn test_run_source_counts_rejected_rows() {
        let catalog = Arc::new(MockEpisodeCatalog::new());
        catalog.add_season(1, 1, fixtures::aired_episodes(2)).await;

        let mut rows = fixtures::season_rows("Show A", 1, 1, &[1, 2], 0);
        rows.push(fixtures::episode_row("Show A", 1, 0, 1, 0));
        rows.push(crate::inventory::RawEpisodeRow::default());

        let report = reconciler(catalog, 1)
            .run_source(&rows, &InventoryIndexer::default())
            .await
            .unwrap();

        assert_eq!(report.total_seasons, 1);
        assert_eq!(report.rejected_rows, 1);
        assert_eq!(report.results[0].status, SeasonStatus::Complete);
    }
}
