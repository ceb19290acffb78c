use async_trait::async_trait;

use musterbook_core::{CatalogSet, FactionCatalog};

use crate::errors::{ImportError, Result};
use crate::loader::CatalogLoader;

/// Loader over catalogs already held in memory.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalogLoader {
    catalogs: CatalogSet,
}

impl InMemoryCatalogLoader {
    pub fn new(catalogs: CatalogSet) -> Self {
        Self { catalogs }
    }

    pub fn catalogs(&self) -> &CatalogSet {
        &self.catalogs
    }
}

impl From<CatalogSet> for InMemoryCatalogLoader {
    fn from(catalogs: CatalogSet) -> Self {
        Self::new(catalogs)
    }
}

#[async_trait]
impl CatalogLoader for InMemoryCatalogLoader {
    async fn factions(&self) -> Result<Vec<String>> {
        Ok(self.catalogs.faction_names().map(str::to_string).collect())
    }

    async fn load_faction(&self, name: &str) -> Result<FactionCatalog> {
        self.catalogs
            .faction(name)
            .cloned()
            .ok_or_else(|| ImportError::Catalog(format!("no catalog for faction '{name}'")))
    }
}
