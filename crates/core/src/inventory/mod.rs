//! Local episode inventory.
//!
//! Reads per-episode rows from the library database and groups them into
//! per-season buckets for reconciliation.

mod indexer;
mod mysql;
mod sqlite;
mod types;

pub use indexer::InventoryIndexer;
pub use mysql::{MysqlConfig, MysqlInventory};
pub use sqlite::SqliteInventory;
pub use types::*;

use async_trait::async_trait;

use crate::catalog::SeriesIdSource;
use crate::config::InventoryConfig;

/// Source of raw inventory rows.
#[async_trait]
pub trait InventorySource: Send + Sync {
    /// Read every episode row in the library.
    ///
    /// Rows are returned as stored; validation happens in the indexer.
    async fn episode_rows(&self) -> Result<Vec<RawEpisodeRow>, InventoryError>;
}

#[async_trait]
impl InventorySource for Vec<RawEpisodeRow> {
    async fn episode_rows(&self) -> Result<Vec<RawEpisodeRow>, InventoryError> {
        Ok(self.clone())
    }
}

/// Open the configured library, reading series ids of `id_source`.
pub async fn open_inventory(
    config: &InventoryConfig,
    id_source: SeriesIdSource,
) -> Result<Box<dyn InventorySource>, InventoryError> {
    match config.dialect {
        InventoryDialect::Sqlite => {
            let path = config.path.as_deref().ok_or_else(|| {
                InventoryError::NotConfigured("inventory.path is required for sqlite".to_string())
            })?;
            let inventory = SqliteInventory::open(path)?.with_id_source(id_source);
            Ok(Box::new(inventory))
        }
        InventoryDialect::Mysql => {
            let mysql = config.mysql.as_ref().ok_or_else(|| {
                InventoryError::NotConfigured(
                    "[inventory.mysql] is required for mysql".to_string(),
                )
            })?;
            let inventory = MysqlInventory::connect(mysql, id_source).await?;
            Ok(Box::new(inventory))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inventory::RowPolicy;
    use std::path::PathBuf;

    fn config(dialect: InventoryDialect, path: Option<&str>) -> InventoryConfig {
        InventoryConfig {
            dialect,
            path: path.map(PathBuf::from),
            mysql: None,
            on_invalid_row: RowPolicy::Skip,
        }
    }

    #[tokio::test]
    async fn test_sqlite_requires_path() {
        let result =
            open_inventory(&config(InventoryDialect::Sqlite, None), SeriesIdSource::Tmdb).await;
        assert!(matches!(result, Err(InventoryError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn test_sqlite_missing_file() {
        let result = open_inventory(
            &config(InventoryDialect::Sqlite, Some("/nonexistent/MyVideos131.db")),
            SeriesIdSource::Tmdb,
        )
        .await;
        assert!(matches!(result, Err(InventoryError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_mysql_requires_connection_settings() {
        let result =
            open_inventory(&config(InventoryDialect::Mysql, None), SeriesIdSource::Tmdb).await;
        assert!(matches!(result, Err(InventoryError::NotConfigured(_))));
    }

    #[tokio::test]
    async fn test_vec_source_returns_rows() {
        let rows = vec![RawEpisodeRow::default()];
        assert_eq!(rows.episode_rows().await.unwrap().len(), 1);
    }
}
