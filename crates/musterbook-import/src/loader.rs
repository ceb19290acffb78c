use async_trait::async_trait;

use musterbook_core::FactionCatalog;

use crate::errors::Result;

/// Source of faction catalogs for the importer and the CLI.
#[async_trait]
pub trait CatalogLoader: Send + Sync {
    /// Known faction names, in the order free-text detection tries them.
    async fn factions(&self) -> Result<Vec<String>>;

    /// Load the full catalog for one faction.
    async fn load_faction(&self, name: &str) -> Result<FactionCatalog>;
}
