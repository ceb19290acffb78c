mod atomic;
mod paths;
mod rosters;
mod settings;

pub use atomic::{write_bytes_atomic, write_json_atomic};
pub use paths::WorkspacePaths;
pub use rosters::RosterStore;
pub use settings::{LogFormat, WorkspaceSettings, load_or_create_settings, save_settings};

use std::io;

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("toml decode error: {0}")]
    TomlDecode(#[from] toml::de::Error),
    #[error("toml encode error: {0}")]
    TomlEncode(#[from] toml::ser::Error),
    #[error("roster not found: {0}")]
    RosterNotFound(Uuid),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("invalid workspace state: {0}")]
    Invalid(String),
}

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;
