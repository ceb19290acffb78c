use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use musterbook_core::fuzzy::DEFAULT_THRESHOLD;

use super::atomic::write_bytes_atomic;
use super::{WorkspacePaths, WorkspaceResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LogFormat {
    /// Human-readable lines on stderr.
    Text,
    /// JSON lines appended to `logs/cli.log`.
    Json,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceSettings {
    /// Directory holding `index.json` and the faction catalogs.
    pub catalog_dir: PathBuf,
    /// Directory of saved roster records.
    pub rosters_dir: PathBuf,
    /// Default `tracing` filter; `MUSTERBOOK_LOG` takes precedence.
    pub log_level: String,
    pub log_format: LogFormat,
    /// Minimum similarity for "did you mean" suggestions.
    pub suggestion_threshold: f64,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            catalog_dir: PathBuf::from("catalogs"),
            rosters_dir: PathBuf::from("rosters"),
            log_level: "info".to_string(),
            log_format: LogFormat::Text,
            suggestion_threshold: DEFAULT_THRESHOLD,
        }
    }
}

pub fn load_or_create_settings(paths: &WorkspacePaths) -> WorkspaceResult<WorkspaceSettings> {
    let path = paths.settings_path();
    if path.exists() {
        let content = std::fs::read_to_string(&path)?;
        let settings: WorkspaceSettings = toml::from_str(&content)?;
        return Ok(settings);
    }

    let settings = WorkspaceSettings::default();
    save_settings(paths, &settings)?;
    Ok(settings)
}

pub fn save_settings(paths: &WorkspacePaths, settings: &WorkspaceSettings) -> WorkspaceResult<()> {
    let encoded = toml::to_string_pretty(settings)?;
    write_bytes_atomic(&paths.settings_path(), encoded.as_bytes())
}
