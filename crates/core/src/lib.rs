pub mod catalog;
pub mod config;
pub mod gaps;
pub mod inventory;
pub mod metrics;
pub mod progress;
pub mod reconcile;
pub mod testing;

pub use catalog::{
    CatalogEpisode, CatalogError, CatalogResolver, EpisodeCatalog, SeriesIdSource, TmdbCatalog,
    TmdbConfig,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, InventoryConfig,
    ReportConfig, SanitizedConfig,
};
pub use gaps::{GapComputer, ReconciliationResult, SeasonStatus};
pub use inventory::{
    open_inventory, EpisodeRef, IndexedInventory, InvalidRowError, InventoryDialect,
    InventoryError, InventoryIndexer, InventorySource, MysqlConfig, MysqlInventory,
    RawEpisodeRow, RowPolicy, SeasonBucket, SqliteInventory,
};
pub use progress::{ProgressCallback, ProgressTracker, ProgressUpdate};
pub use reconcile::{
    ReconcileConfig, ReconcileError, ReconciliationReport, Reconciler, SkippedSeason,
};
