//! Read-only access to a Kodi video database.

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use async_trait::async_trait;
use rusqlite::{params, Connection, OpenFlags};
use tracing::debug;

use super::{InventoryError, InventorySource, RawEpisodeRow};
use crate::catalog::SeriesIdSource;

/// Every episode joined to its season and show.
///
/// Kodi 17+ keeps scraper ids in `uniqueid`; `tvshow.c12` only points at the
/// show's default `uniqueid` row. The id of the requested scheme (`?1`) is
/// preferred, then the default row when it has that scheme. Season and
/// episode numbers live in `episodeview.c12` and `episodeview.c13`.
const EPISODE_ROWS_SQL: &str = r#"
    SELECT
        tvshow.c00,
        CAST(COALESCE(
            (SELECT u.value FROM uniqueid u
              WHERE u.media_id = tvshow.idShow
                AND u.media_type = 'tvshow'
                AND u.type = ?1
              LIMIT 1),
            (SELECT d.value FROM uniqueid d
              WHERE d.uniqueid_id = tvshow.c12
                AND d.type = ?1)
        ) AS TEXT),
        CAST(episodeview.c12 AS TEXT),
        CAST(episodeview.c13 AS TEXT),
        episodeview.playCount
    FROM episodeview
    JOIN seasons ON seasons.idSeason = episodeview.idSeason
    JOIN tvshow ON tvshow.idShow = seasons.idShow
    ORDER BY tvshow.c00, episodeview.c12, episodeview.c13
"#;

/// Kodi `MyVideos*.db` inventory source.
pub struct SqliteInventory {
    conn: Mutex<Connection>,
    path: PathBuf,
    id_source: SeriesIdSource,
}

impl SqliteInventory {
    /// Open an existing Kodi database without write access.
    pub fn open(path: &Path) -> Result<Self, InventoryError> {
        if !path.exists() {
            return Err(InventoryError::NotFound(path.display().to_string()));
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| InventoryError::Database(e.to_string()))?;

        debug!("Opened inventory database {}", path.display());

        Ok(Self {
            conn: Mutex::new(conn),
            path: path.to_path_buf(),
            id_source: SeriesIdSource::default(),
        })
    }

    /// Read series ids of this scheme.
    pub fn with_id_source(mut self, id_source: SeriesIdSource) -> Self {
        self.id_source = id_source;
        self
    }

    /// Path of the underlying database file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl InventorySource for SqliteInventory {
    async fn episode_rows(&self) -> Result<Vec<RawEpisodeRow>, InventoryError> {
        let conn = self
            .conn
            .lock()
            .map_err(|e| InventoryError::Database(format!("Lock poisoned: {}", e)))?;

        let mut stmt = conn
            .prepare(EPISODE_ROWS_SQL)
            .map_err(|e| InventoryError::Database(e.to_string()))?;

        let rows = stmt
            .query_map(params![self.id_source.as_str()], |row| {
                Ok(RawEpisodeRow {
                    show_title: row.get(0)?,
                    series_id: row.get(1)?,
                    season_number: row.get(2)?,
                    episode_number: row.get(3)?,
                    watch_count: row.get(4)?,
                })
            })
            .map_err(|e| InventoryError::Database(e.to_string()))?;

        let mut episodes = Vec::new();
        for row in rows {
            episodes.push(row.map_err(|e| InventoryError::Database(e.to_string()))?);
        }

        debug!(
            "Read {} episode rows from {} ({} ids)",
            episodes.len(),
            self.path.display(),
            self.id_source.as_str()
        );
        Ok(episodes)
    }
}
