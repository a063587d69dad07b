use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::catalog::{SeriesIdSource, TmdbConfig};
use crate::inventory::{InventoryDialect, MysqlConfig, RowPolicy};
use crate::reconcile::ReconcileConfig;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub inventory: InventoryConfig,
    pub catalog: TmdbConfig,
    #[serde(default)]
    pub reconcile: ReconcileConfig,
    #[serde(default)]
    pub report: ReportConfig,
}

/// Kodi video database location
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InventoryConfig {
    /// Database engine of the library
    #[serde(default)]
    pub dialect: InventoryDialect,
    /// Path to the `MyVideos*.db` file (sqlite)
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Connection settings (mysql)
    #[serde(default)]
    pub mysql: Option<MysqlConfig>,
    /// What to do with rows that fail validation
    #[serde(default)]
    pub on_invalid_row: RowPolicy,
}

/// Report output configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ReportConfig {
    /// Write the report as CSV here
    #[serde(default)]
    pub csv_path: Option<PathBuf>,
    /// Also list seasons that are complete
    #[serde(default)]
    pub include_complete: bool,
}

/// Sanitized config for logging (secrets redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub inventory: SanitizedInventoryConfig,
    pub catalog: SanitizedCatalogConfig,
    pub reconcile: ReconcileConfig,
    pub report: ReportConfig,
}

/// Sanitized inventory config (database password hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedInventoryConfig {
    pub dialect: InventoryDialect,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mysql: Option<SanitizedMysqlConfig>,
    pub on_invalid_row: RowPolicy,
}

/// MySQL settings without the password
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedMysqlConfig {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub database: String,
    pub password_configured: bool,
}

/// Sanitized catalog config (API key hidden)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedCatalogConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    pub api_key_configured: bool,
    pub language: String,
    pub series_id_source: SeriesIdSource,
    pub timeout_secs: u32,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            inventory: SanitizedInventoryConfig {
                dialect: config.inventory.dialect,
                path: config.inventory.path.clone(),
                mysql: config.inventory.mysql.as_ref().map(|m| SanitizedMysqlConfig {
                    host: m.host.clone(),
                    port: m.port,
                    user: m.user.clone(),
                    database: m.database.clone(),
                    password_configured: !m.password.is_empty(),
                }),
                on_invalid_row: config.inventory.on_invalid_row,
            },
            catalog: SanitizedCatalogConfig {
                base_url: config.catalog.base_url.clone(),
                api_key_configured: !config.catalog.api_key.is_empty(),
                language: config.catalog.language.clone(),
                series_id_source: config.catalog.series_id_source,
                timeout_secs: config.catalog.timeout_secs,
            },
            reconcile: config.reconcile.clone(),
            report: config.report.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_minimal_config() {
        let toml = r#"
[inventory]
path = "/home/kodi/.kodi/userdata/Database/MyVideos131.db"

[catalog]
api_key = "abc123"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.inventory.dialect, InventoryDialect::Sqlite);
        assert_eq!(
            config.inventory.path.as_deref().and_then(|p| p.to_str()),
            Some("/home/kodi/.kodi/userdata/Database/MyVideos131.db")
        );
        assert!(config.inventory.mysql.is_none());
        assert_eq!(config.inventory.on_invalid_row, RowPolicy::Skip);
        assert_eq!(config.catalog.language, "en-US");
        assert_eq!(config.reconcile.concurrency, 1);
        assert!(config.report.csv_path.is_none());
        assert!(!config.report.include_complete);
    }

    #[test]
    fn test_deserialize_full_config() {
        let toml = r#"
[inventory]
path = "MyVideos131.db"
on_invalid_row = "abort"

[catalog]
api_key = "abc123"
language = "de-DE"
series_id_source = "tvdb"
base_url = "http://localhost:9000/3"
timeout_secs = 5

[reconcile]
concurrency = 8

[report]
csv_path = "incomplete_tv_shows.csv"
include_complete = true
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.inventory.on_invalid_row, RowPolicy::Abort);
        assert_eq!(config.catalog.series_id_source, SeriesIdSource::Tvdb);
        assert_eq!(config.catalog.timeout_secs, 5);
        assert_eq!(config.reconcile.concurrency, 8);
        assert_eq!(
            config.report.csv_path.as_deref().and_then(|p| p.to_str()),
            Some("incomplete_tv_shows.csv")
        );
        assert!(config.report.include_complete);
    }

    #[test]
    fn test_deserialize_mysql_inventory() {
        let toml = r#"
[inventory]
dialect = "mysql"

[inventory.mysql]
host = "nas.local"
user = "kodi"
password = "kodi"
database = "MyVideos131"

[catalog]
api_key = "abc123"
"#;
        let config: Config = toml::from_str(toml).unwrap();
        assert_eq!(config.inventory.dialect, InventoryDialect::Mysql);
        assert!(config.inventory.path.is_none());

        let mysql = config.inventory.mysql.unwrap();
        assert_eq!(mysql.host, "nas.local");
        assert_eq!(mysql.port, 3306);
        assert_eq!(mysql.database, "MyVideos131");
    }

    #[test]
    fn test_deserialize_missing_catalog_fails() {
        let toml = r#"
[inventory]
path = "MyVideos131.db"
"#;
        let result: Result<Config, _> = toml::from_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn test_sanitized_config_hides_secrets() {
        let config = Config {
            inventory: InventoryConfig {
                dialect: InventoryDialect::Mysql,
                path: None,
                mysql: Some(MysqlConfig {
                    host: "nas.local".to_string(),
                    port: 3306,
                    user: "kodi".to_string(),
                    password: "db-password".to_string(),
                    database: "MyVideos131".to_string(),
                    connect_timeout_secs: 10,
                }),
                on_invalid_row: RowPolicy::Skip,
            },
            catalog: TmdbConfig::with_api_key("secret-key"),
            reconcile: ReconcileConfig::default(),
            report: ReportConfig::default(),
        };

        let sanitized = SanitizedConfig::from(&config);
        assert!(sanitized.catalog.api_key_configured);

        let json = serde_json::to_string(&sanitized).unwrap();
        assert!(!json.contains("secret-key"));
        assert!(!json.contains("db-password"));
        assert!(json.contains("\"password_configured\":true"));
    }
}
