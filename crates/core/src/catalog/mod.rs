//! Remote episode catalog.
//!
//! The catalog is the source of truth for which episodes of a season exist
//! and when they aired. [`CatalogResolver`] reduces a season listing to the
//! number of episodes that have aired so far.

mod resolver;
mod tmdb;
mod types;

pub use resolver::CatalogResolver;
pub use tmdb::{TmdbCatalog, TmdbConfig};
pub use types::*;

use async_trait::async_trait;

/// Trait for remote episode catalogs.
#[async_trait]
pub trait EpisodeCatalog: Send + Sync {
    /// List every episode of a season, aired or not.
    async fn season_episodes(
        &self,
        series_id: u32,
        season_number: u32,
        locale: &str,
    ) -> Result<Vec<CatalogEpisode>, CatalogError>;
}
