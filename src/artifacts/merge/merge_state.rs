//! Pending merge bookkeeping
//!
//! A merge that stops on conflicts leaves `.vsx/MERGE_STATE` behind:
//!
//! ```toml
//! source = "feature"
//! source_oid = "4f1c..."
//! target = "main"
//!
//! [[conflicts]]
//! path = "a.txt"
//! kind = "content"
//! staged = "9ab2..."
//! ```
//!
//! Every conflict, whatever its kind, stays unresolved until its path is staged
//! or unstaged again; resolved paths are listed under `resolved`. The next commit
//! picks up `source_oid` as its second parent and removes the file.

use crate::artifacts::merge::three_way::Conflict;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

pub const MERGE_STATE_FILE_NAME: &str = "MERGE_STATE";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MergeState {
    /// Revision the user asked to merge, as typed
    pub source: String,
    pub source_oid: ObjectId,
    /// Branch receiving the merge
    pub target: String,
    /// Conflicted paths staged or unstaged since the merge stopped
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub resolved: BTreeSet<PathBuf>,
    pub conflicts: Vec<Conflict>,
}

impl MergeState {
    pub fn load(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }

        let contents = std::fs::read_to_string(path).map_err(Error::io_at(path))?;
        toml::from_str(&contents)
            .map(Some)
            .map_err(|e| Error::Config {
                path: path.to_path_buf(),
                reason: e.to_string(),
            })
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string(self).map_err(|e| Error::Config {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let temp_path = path.with_extension("tmp");
        std::fs::write(&temp_path, contents).map_err(Error::io_at(&temp_path))?;
        std::fs::rename(&temp_path, path).map_err(Error::io_at(path))
    }

    pub fn clear(path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Err(e) if e.kind() != std::io::ErrorKind::NotFound => Err(Error::Io {
                path: path.to_path_buf(),
                source: e,
            }),
            _ => Ok(()),
        }
    }

    /// Record that `paths` (files, or directories covering conflicted files)
    /// were staged or unstaged; returns whether any conflict changed state
    pub fn mark_resolved(&mut self, paths: &[PathBuf]) -> bool {
        let newly_resolved = self
            .conflicts
            .iter()
            .filter(|conflict| !self.resolved.contains(&conflict.path))
            .filter(|conflict| paths.iter().any(|path| conflict.path.starts_with(path)))
            .map(|conflict| conflict.path.clone())
            .collect::<Vec<_>>();

        self.resolved.extend(newly_resolved.iter().cloned());
        !newly_resolved.is_empty()
    }

    /// Conflicted paths nobody has restaged yet
    pub fn unresolved(&self) -> Vec<PathBuf> {
        self.conflicts
            .iter()
            .filter(|conflict| !self.resolved.contains(&conflict.path))
            .map(|conflict| conflict.path.clone())
            .collect()
    }
}
