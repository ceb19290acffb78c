//! Free-text roster import and faction catalog loading.

pub mod errors;
pub mod filesystem;
pub mod importer;
pub mod loader;
pub mod memory;
pub mod options;
mod parser;
pub mod segment;

pub use errors::{ImportError, Result};
pub use filesystem::{FsCatalogLoader, INDEX_FILE, check_catalog_json};
pub use importer::{Importer, import_roster, import_roster_with_options};
pub use loader::CatalogLoader;
pub use memory::InMemoryCatalogLoader;
pub use options::ImportOptions;
pub use segment::{SectionKind, Sections, Segmenter};

pub use musterbook_core::Roster;
