//! Groups inventory rows into season buckets.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::types::{
    EpisodeRef, IndexedInventory, InvalidRowError, RawEpisodeRow, RowPolicy, SeasonBucket,
};

/// Builds [`SeasonBucket`]s from raw inventory rows.
#[derive(Debug, Clone, Default)]
pub struct InventoryIndexer {
    policy: RowPolicy,
}

impl InventoryIndexer {
    pub fn new(policy: RowPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> RowPolicy {
        self.policy
    }

    /// Group rows by show and season.
    ///
    /// Buckets come back ordered by show title (byte order), then season.
    /// Specials (season 0) never produce a bucket. Shows that share a title
    /// but not a series id get separate buckets.
    pub fn index<I>(&self, rows: I) -> Result<IndexedInventory, InvalidRowError>
    where
        I: IntoIterator<Item = RawEpisodeRow>,
    {
        let mut groups: BTreeMap<(String, u32, u32), SeasonBucket> = BTreeMap::new();
        let mut rejected_rows = 0;
        let mut specials_skipped = 0;

        for row in rows {
            let episode = match EpisodeRef::try_from(row) {
                Ok(episode) => episode,
                Err(e) => match self.policy {
                    RowPolicy::Abort => return Err(e),
                    RowPolicy::Skip => {
                        warn!("Skipping inventory row: {}", e);
                        rejected_rows += 1;
                        continue;
                    }
                },
            };

            if episode.is_special() {
                specials_skipped += 1;
                continue;
            }

            let key = (
                episode.show_title.clone(),
                episode.season_number,
                episode.series_id,
            );
            groups
                .entry(key)
                .or_insert_with(|| {
                    SeasonBucket::new(
                        episode.show_title.clone(),
                        episode.series_id,
                        episode.season_number,
                    )
                })
                .add(episode.episode_number, episode.watch_count);
        }

        let buckets: Vec<SeasonBucket> = groups.into_values().collect();

        debug!(
            "Indexed {} season buckets ({} rows rejected, {} specials skipped)",
            buckets.len(),
            rejected_rows,
            specials_skipped
        );

        Ok(IndexedInventory {
            buckets,
            rejected_rows,
            specials_skipped,
        })
    }
}
