use thiserror::Error;

/// Structural failures that abort an import or a catalog load.
#[derive(Debug, Error)]
pub enum ImportError {
    /// No known faction name occurs in the imported text.
    #[error("no known faction named in the imported text")]
    UnknownFaction,
    /// The faction's catalog is missing or malformed.
    #[error("catalog error: {0}")]
    Catalog(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("pattern error: {0}")]
    Pattern(#[from] regex::Error),
}

/// Result type for import and catalog loading operations.
pub type Result<T> = std::result::Result<T, ImportError>;
