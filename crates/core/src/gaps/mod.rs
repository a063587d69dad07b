//! Missing-episode computation.
//!
//! Diffs a season bucket against the number of aired episodes and
//! classifies the season.

mod types;

pub use types::*;

use crate::inventory::SeasonBucket;

/// Computes the gaps of a single season.
#[derive(Debug, Clone, Copy, Default)]
pub struct GapComputer;

impl GapComputer {
    pub fn new() -> Self {
        Self
    }

    /// Reconcile a bucket against its aired episode count.
    ///
    /// The expected universe is exactly `1..=aired_count`; local numbering
    /// never widens it. Pure: the same inputs always give the same result.
    pub fn reconcile(&self, bucket: &SeasonBucket, aired_count: u32) -> ReconciliationResult {
        let missing_episodes: Vec<u32> = (1..=aired_count)
            .filter(|n| !bucket.present_episodes.contains(n))
            .collect();

        let extra_episodes: Vec<u32> = bucket
            .present_episodes
            .range(aired_count.saturating_add(1)..)
            .copied()
            .collect();

        ReconciliationResult {
            show_title: bucket.show_title.clone(),
            series_id: bucket.series_id,
            season_number: bucket.season_number,
            local_episode_count: bucket.local_episode_count,
            aired_count,
            missing_episodes,
            status: classify(bucket.local_episode_count, aired_count, bucket.max_watch_count),
            extra_episodes,
            total_watch_count: bucket.total_watch_count,
        }
    }
}

/// Equality of counts, not `>=`, decides completeness.
fn classify(local_episode_count: u32, aired_count: u32, max_watch_count: u32) -> SeasonStatus {
    match (local_episode_count == aired_count, max_watch_count > 0) {
        (true, false) => SeasonStatus::Complete,
        (true, true) => SeasonStatus::WatchingComplete,
        (false, false) => SeasonStatus::Incomplete,
        (false, true) => SeasonStatus::WatchingIncomplete,
    }
}
