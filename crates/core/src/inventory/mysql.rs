//! Shared Kodi video library on MySQL/MariaDB.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use sqlx::mysql::{MySqlConnectOptions, MySqlPool, MySqlPoolOptions};
use sqlx::Row;
use tracing::debug;

use super::{InventoryError, InventorySource, RawEpisodeRow};
use crate::catalog::SeriesIdSource;

/// Same shape as the SQLite query; both `?` bind the id scheme.
const EPISODE_ROWS_SQL: &str = r#"
    SELECT
        tvshow.c00,
        CAST(COALESCE(
            (SELECT u.value FROM uniqueid u
              WHERE u.media_id = tvshow.idShow
                AND u.media_type = 'tvshow'
                AND u.type = ?
              LIMIT 1),
            (SELECT d.value FROM uniqueid d
              WHERE d.uniqueid_id = tvshow.c12
                AND d.type = ?)
        ) AS CHAR),
        CAST(episodeview.c12 AS CHAR),
        CAST(episodeview.c13 AS CHAR),
        CAST(episodeview.playCount AS SIGNED)
    FROM episodeview
    JOIN seasons ON seasons.idSeason = episodeview.idSeason
    JOIN tvshow ON tvshow.idShow = seasons.idShow
    ORDER BY tvshow.c00, episodeview.c12, episodeview.c13
"#;

/// MySQL connection settings for a shared Kodi library.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MysqlConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub user: String,
    #[serde(default)]
    pub password: String,
    /// Kodi database name, e.g. `MyVideos131`.
    pub database: String,
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    3306
}

fn default_connect_timeout() -> u64 {
    10
}

/// Kodi library stored in MySQL/MariaDB.
pub struct MysqlInventory {
    pool: MySqlPool,
    database: String,
    id_source: SeriesIdSource,
}

impl MysqlInventory {
    /// Connect to the library database.
    pub async fn connect(
        config: &MysqlConfig,
        id_source: SeriesIdSource,
    ) -> Result<Self, InventoryError> {
        let options = MySqlConnectOptions::new()
            .host(&config.host)
            .port(config.port)
            .username(&config.user)
            .password(&config.password)
            .database(&config.database);

        let pool = MySqlPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(config.connect_timeout_secs))
            .connect_with(options)
            .await
            .map_err(|e| {
                InventoryError::Database(format!(
                    "Connection to {}@{}:{}/{} failed: {}",
                    config.user, config.host, config.port, config.database, e
                ))
            })?;

        debug!(
            "Connected to inventory database {} on {}:{}",
            config.database, config.host, config.port
        );

        Ok(Self {
            pool,
            database: config.database.clone(),
            id_source,
        })
    }
}

#[async_trait]
impl InventorySource for MysqlInventory {
    async fn episode_rows(&self) -> Result<Vec<RawEpisodeRow>, InventoryError> {
        let rows = sqlx::query(EPISODE_ROWS_SQL)
            .bind(self.id_source.as_str())
            .bind(self.id_source.as_str())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| InventoryError::Database(e.to_string()))?;

        let episodes = rows
            .iter()
            .map(|row| {
                Ok(RawEpisodeRow {
                    show_title: row.try_get(0)?,
                    series_id: row.try_get(1)?,
                    season_number: row.try_get(2)?,
                    episode_number: row.try_get(3)?,
                    watch_count: row.try_get(4)?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()
            .map_err(|e| InventoryError::Database(e.to_string()))?;

        debug!(
            "Read {} episode rows from {} ({} ids)",
            episodes.len(),
            self.database,
            self.id_source.as_str()
        );
        Ok(episodes)
    }
}
