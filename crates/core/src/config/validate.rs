use super::{types::Config, ConfigError};
use crate::inventory::InventoryDialect;

/// Upper bound for concurrent catalog lookups
pub const MAX_CONCURRENCY: usize = 32;

/// Validate configuration
/// Currently validates:
/// - The inventory section has what its dialect needs
/// - Catalog API key and language are not empty
/// - Catalog timeout is not 0
/// - Reconcile concurrency is within 1..=MAX_CONCURRENCY
pub fn validate_config(config: &Config) -> Result<(), ConfigError> {
    // Inventory validation
    match config.inventory.dialect {
        InventoryDialect::Sqlite => {
            if config.inventory.path.is_none() {
                return Err(ConfigError::ValidationError(
                    "inventory.path is required when dialect is sqlite".to_string(),
                ));
            }
        }
        InventoryDialect::Mysql => {
            let Some(mysql) = &config.inventory.mysql else {
                return Err(ConfigError::ValidationError(
                    "[inventory.mysql] is required when dialect is mysql".to_string(),
                ));
            };
            if mysql.user.trim().is_empty() || mysql.database.trim().is_empty() {
                return Err(ConfigError::ValidationError(
                    "inventory.mysql.user and inventory.mysql.database cannot be empty"
                        .to_string(),
                ));
            }
        }
    }

    // Catalog validation
    if config.catalog.api_key.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "catalog.api_key cannot be empty".to_string(),
        ));
    }
    if config.catalog.language.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "catalog.language cannot be empty".to_string(),
        ));
    }
    if config.catalog.timeout_secs == 0 {
        return Err(ConfigError::ValidationError(
            "catalog.timeout_secs cannot be 0".to_string(),
        ));
    }

    // Reconcile validation
    if config.reconcile.concurrency == 0 || config.reconcile.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::ValidationError(format!(
            "reconcile.concurrency must be between 1 and {}",
            MAX_CONCURRENCY
        )));
    }

    Ok(())
}
