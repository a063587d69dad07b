//! Reconciliation result types.

use serde::{Deserialize, Serialize};
use std::fmt;

/// How a season's local episodes compare with what has aired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SeasonStatus {
    /// Local count matches the aired count and nothing has been watched.
    Complete,
    /// Local count differs from the aired count and nothing has been watched.
    Incomplete,
    /// Something has been watched and the local count differs.
    WatchingIncomplete,
    /// Something has been watched and the local count matches.
    WatchingComplete,
}

impl SeasonStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Complete => "complete",
            Self::Incomplete => "incomplete",
            Self::WatchingIncomplete => "watching_incomplete",
            Self::WatchingComplete => "watching_complete",
        }
    }

    /// Local count matches the aired count.
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete | Self::WatchingComplete)
    }

    /// At least one episode has been watched.
    pub fn is_watching(&self) -> bool {
        matches!(self, Self::WatchingComplete | Self::WatchingIncomplete)
    }
}

impl fmt::Display for SeasonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of reconciling one season bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReconciliationResult {
    pub show_title: String,
    pub series_id: u32,
    pub season_number: u32,
    pub local_episode_count: u32,
    pub aired_count: u32,
    /// Aired episode numbers absent locally, ascending.
    pub missing_episodes: Vec<u32>,
    pub status: SeasonStatus,
    /// Local episode numbers above the aired count, ascending.
    ///
    /// Informational only; they never affect `missing_episodes`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub extra_episodes: Vec<u32>,
    /// Sum of local play counts.
    pub total_watch_count: u32,
}

impl ReconciliationResult {
    /// Whether any aired episode is missing locally.
    pub fn has_gaps(&self) -> bool {
        !self.missing_episodes.is_empty()
    }

    /// Whether the summed play count covers every aired episode.
    ///
    /// This is a separate signal from `status`: it compares the total number
    /// of plays, not which episodes are present.
    pub fn is_watched_through(&self) -> bool {
        self.total_watch_count >= self.aired_count
    }

    /// Whether the season belongs in a "what am I missing" report.
    pub fn needs_attention(&self) -> bool {
        self.has_gaps() || !self.status.is_complete()
    }
}
