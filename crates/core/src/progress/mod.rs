//! Run progress counter.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use serde::Serialize;

/// Progress snapshot published after each season.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ProgressUpdate {
    pub checked: usize,
    pub total: usize,
    pub percent: u8,
}

/// Callback invoked with each progress update.
pub type ProgressCallback = Arc<dyn Fn(ProgressUpdate) + Send + Sync>;

/// Counts processed seasons.
///
/// Observational only; nothing in the reconciliation reads it back.
#[derive(Debug, Default)]
pub struct ProgressTracker {
    checked: AtomicUsize,
}

impl ProgressTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one more processed season and return the percentage done.
    ///
    /// Returns 0 when `total` is 0 and never more than 100.
    pub fn advance(&self, total: usize) -> u8 {
        let checked = self.checked.fetch_add(1, Ordering::SeqCst) + 1;
        percent(checked, total)
    }

    /// Like [`advance`](Self::advance) but returns the full snapshot.
    pub fn advance_update(&self, total: usize) -> ProgressUpdate {
        let checked = self.checked.fetch_add(1, Ordering::SeqCst) + 1;
        ProgressUpdate {
            checked,
            total,
            percent: percent(checked, total),
        }
    }

    /// Seasons processed so far.
    pub fn checked(&self) -> usize {
        self.checked.load(Ordering::SeqCst)
    }
}

fn percent(checked: usize, total: usize) -> u8 {
    if total == 0 {
        return 0;
    }
    (checked.min(total) * 100 / total) as u8
}
