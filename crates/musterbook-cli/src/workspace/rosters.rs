use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use uuid::Uuid;

use musterbook_core::{ROSTER_FORMAT_VERSION, Roster};

use super::atomic::write_json_atomic;
use super::{WorkspaceError, WorkspaceResult};

/// Saved rosters, one `<id>.json` record per roster.
#[derive(Debug, Clone)]
pub struct RosterStore {
    dir: PathBuf,
}

#[derive(Debug, Serialize)]
struct RecordRef<'a> {
    format_version: &'a str,
    roster: &'a Roster,
}

#[derive(Debug, Deserialize)]
struct Record {
    format_version: String,
    roster: Roster,
}

impl RosterStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: Uuid) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    /// Stamp `updated_at` and write the roster's record.
    pub fn save(&self, roster: &mut Roster) -> WorkspaceResult<PathBuf> {
        roster.updated_at = Some(Utc::now());
        let path = self.path_for(roster.id);
        write_json_atomic(
            &path,
            &RecordRef {
                format_version: ROSTER_FORMAT_VERSION,
                roster,
            },
        )?;
        info!(event = "roster_saved", id = %roster.id, path = %path.display());
        Ok(path)
    }

    pub fn load(&self, id: Uuid) -> WorkspaceResult<Roster> {
        let path = self.path_for(id);
        let content = std::fs::read_to_string(&path).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => WorkspaceError::RosterNotFound(id),
            _ => WorkspaceError::Io(err),
        })?;
        read_record(&content)
    }

    /// Every readable roster, most recently saved first. Unreadable records
    /// and records of another format version are skipped.
    pub fn list(&self) -> WorkspaceResult<Vec<Roster>> {
        if !self.dir.exists() {
            return Ok(Vec::new());
        }

        let mut rosters = Vec::new();
        for entry in std::fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some("json") {
                continue;
            }
            let parsed = std::fs::read_to_string(&path)
                .map_err(WorkspaceError::from)
                .and_then(|content| read_record(&content));
            match parsed {
                Ok(roster) => rosters.push(roster),
                Err(err) => {
                    warn!(path = %path.display(), error = %err, "skipping roster record");
                }
            }
        }

        rosters.sort_by(|left, right| {
            right
                .updated_at
                .cmp(&left.updated_at)
                .then_with(|| left.name.cmp(&right.name))
        });
        Ok(rosters)
    }

    pub fn delete(&self, id: Uuid) -> WorkspaceResult<()> {
        std::fs::remove_file(self.path_for(id)).map_err(|err| match err.kind() {
            io::ErrorKind::NotFound => WorkspaceError::RosterNotFound(id),
            _ => WorkspaceError::Io(err),
        })?;
        info!(event = "roster_deleted", id = %id);
        Ok(())
    }
}

fn read_record(content: &str) -> WorkspaceResult<Roster> {
    let record: Record = serde_json::from_str(content)?;
    if record.format_version != ROSTER_FORMAT_VERSION {
        return Err(WorkspaceError::Invalid(format!(
            "unsupported roster format version {}",
            record.format_version
        )));
    }
    Ok(record.roster)
}
