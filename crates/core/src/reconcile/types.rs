//! Types for reconciliation runs.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::gaps::ReconciliationResult;
use crate::inventory::{InvalidRowError, InventoryError};

/// Reconciliation run configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReconcileConfig {
    /// Catalog lookups in flight at once (1 = strictly serial).
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
        }
    }
}

fn default_concurrency() -> usize {
    1
}

/// A season left out of the report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedSeason {
    pub show_title: String,
    pub series_id: u32,
    pub season_number: u32,
    /// Short failure label ("unavailable", "unknown_series", ...).
    pub reason: String,
    /// Full error message.
    pub message: String,
}

/// Everything one run produced.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReconciliationReport {
    /// One result per resolved season, ordered by show title then season.
    pub results: Vec<ReconciliationResult>,
    /// Seasons whose aired count could not be resolved, in the same order.
    pub skipped: Vec<SkippedSeason>,
    /// Season buckets handed to the run.
    pub total_seasons: usize,
    /// Season buckets whose catalog lookup was attempted.
    pub checked_seasons: usize,
    /// Inventory rows rejected during indexing.
    #[serde(default)]
    pub rejected_rows: usize,
}

impl ReconciliationReport {
    /// Results worth showing in a "missing episodes" report.
    pub fn needing_attention(&self) -> impl Iterator<Item = &ReconciliationResult> {
        self.results.iter().filter(|r| r.needs_attention())
    }

    /// Total aired episodes missing across every season.
    pub fn missing_episode_total(&self) -> usize {
        self.results.iter().map(|r| r.missing_episodes.len()).sum()
    }
}

/// Errors that stop a run before any season is reconciled.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Inventory error: {0}")]
    Inventory(#[from] InventoryError),

    #[error("Invalid inventory row: {0}")]
    InvalidRow(#[from] InvalidRowError),
}
