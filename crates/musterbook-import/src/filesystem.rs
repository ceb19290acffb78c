use std::path::{Path, PathBuf};

use async_trait::async_trait;
use jsonschema::JSONSchema;
use schemars::schema_for;
use serde::Deserialize;
use serde_json::Value;
use tracing::info;

use musterbook_core::{FactionCatalog, validate_catalog};

use crate::errors::{ImportError, Result};
use crate::loader::CatalogLoader;

/// File name of the faction index inside a catalog directory.
pub const INDEX_FILE: &str = "index.json";

/// Loader reading one JSON document per faction from a directory.
///
/// The directory holds an `index.json` listing the factions in detection
/// order, each pointing at its catalog file relative to the directory.
#[derive(Debug, Clone)]
pub struct FsCatalogLoader {
    root: PathBuf,
}

#[derive(Debug, Deserialize)]
struct CatalogIndex {
    factions: Vec<IndexEntry>,
}

#[derive(Debug, Deserialize)]
struct IndexEntry {
    name: String,
    file: PathBuf,
}

impl FsCatalogLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn read_index(&self) -> Result<CatalogIndex> {
        let contents = tokio::fs::read_to_string(self.root.join(INDEX_FILE)).await?;
        Ok(serde_json::from_str(&contents)?)
    }
}

#[async_trait]
impl CatalogLoader for FsCatalogLoader {
    async fn factions(&self) -> Result<Vec<String>> {
        let index = self.read_index().await?;
        Ok(index.factions.into_iter().map(|entry| entry.name).collect())
    }

    async fn load_faction(&self, name: &str) -> Result<FactionCatalog> {
        let index = self.read_index().await?;
        let entry = index
            .factions
            .into_iter()
            .find(|entry| entry.name.eq_ignore_ascii_case(name.trim()))
            .ok_or_else(|| {
                ImportError::Catalog(format!(
                    "faction '{name}' is not listed in {}",
                    self.root.join(INDEX_FILE).display()
                ))
            })?;

        let path = self.root.join(&entry.file);
        let contents = tokio::fs::read_to_string(&path)
            .await
            .map_err(|err| ImportError::Catalog(format!("{}: {err}", path.display())))?;
        let json: Value = serde_json::from_str(&contents)
            .map_err(|err| ImportError::Catalog(format!("{}: {err}", path.display())))?;
        check_catalog_json(&json)?;

        let catalog: FactionCatalog = serde_json::from_value(json)
            .map_err(|err| ImportError::Catalog(format!("{}: {err}", path.display())))?;
        if !catalog.name.eq_ignore_ascii_case(&entry.name) {
            return Err(ImportError::Catalog(format!(
                "{} holds '{}' but the index names '{}'",
                path.display(),
                catalog.name,
                entry.name
            )));
        }
        validate_catalog(&catalog).map_err(|err| ImportError::Catalog(err.to_string()))?;

        info!(
            event = "catalog_loaded",
            faction = %catalog.name,
            units = catalog.units.len(),
            path = %path.display()
        );
        Ok(catalog)
    }
}

/// Check a faction document against the JSON Schema of [`FactionCatalog`].
///
/// Every violation is reported with the JSON pointer of the offending value.
pub fn check_catalog_json(json: &Value) -> Result<()> {
    let schema = serde_json::to_value(schema_for!(FactionCatalog))?;
    let compiled =
        JSONSchema::compile(&schema).map_err(|err| ImportError::Catalog(err.to_string()))?;

    if let Err(errors) = compiled.validate(json) {
        let issues: Vec<String> = errors
            .map(|error| {
                format!(
                    "{}: {}",
                    normalized_json_pointer(&error.instance_path.to_string()),
                    error
                )
            })
            .collect();
        return Err(ImportError::Catalog(format!(
            "schema violations: {}",
            issues.join("; ")
        )));
    }

    Ok(())
}

fn normalized_json_pointer(pointer: &str) -> String {
    if pointer.is_empty() {
        "/".to_string()
    } else {
        pointer.to_string()
    }
}
