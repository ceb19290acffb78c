use thiserror::Error;

/// Core error type shared across Musterbook crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The catalog violates internal invariants.
    #[error("invalid catalog: {0}")]
    InvalidCatalog(String),
    /// The requested faction is not part of the catalog set.
    #[error("unknown faction: {0}")]
    UnknownFaction(String),
    /// Catch-all error for unexpected failures.
    #[error("other error: {0}")]
    Other(String),
}

/// Convenience alias for results returned by Musterbook crates.
pub type Result<T> = std::result::Result<T, Error>;
