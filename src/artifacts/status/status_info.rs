use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::file_change::{IndexChangeType, WorkspaceChangeType};
use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

/// Flattened `path -> blob` view of a tree or of the index
pub type FileMap = BTreeMap<PathBuf, ObjectId>;

/// Index compared path by path against a base tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusReport {
    pub added: Vec<PathBuf>,
    pub modified: Vec<PathBuf>,
    pub deleted: Vec<PathBuf>,
    pub unchanged: Vec<PathBuf>,
}

impl StatusReport {
    pub fn compare(base: &FileMap, staged: &FileMap) -> Self {
        let mut report = StatusReport::default();

        let paths = base.keys().chain(staged.keys()).collect::<BTreeSet<_>>();
        for path in paths {
            match (base.get(path), staged.get(path)) {
                (None, Some(_)) => report.added.push(path.clone()),
                (Some(_), None) => report.deleted.push(path.clone()),
                (Some(old), Some(new)) if old != new => report.modified.push(path.clone()),
                (Some(_), Some(_)) => report.unchanged.push(path.clone()),
                (None, None) => {}
            }
        }

        report
    }

    /// Whether the index matches the base tree exactly
    pub fn is_clean(&self) -> bool {
        self.added.is_empty() && self.modified.is_empty() && self.deleted.is_empty()
    }

    /// Changed paths with their change kind, in path order
    pub fn changes(&self) -> BTreeMap<PathBuf, IndexChangeType> {
        let added = self.added.iter().map(|p| (p.clone(), IndexChangeType::Added));
        let modified = self
            .modified
            .iter()
            .map(|p| (p.clone(), IndexChangeType::Modified));
        let deleted = self
            .deleted
            .iter()
            .map(|p| (p.clone(), IndexChangeType::Deleted));

        added.chain(modified).chain(deleted).collect()
    }
}

/// Working directory compared against the index
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceChanges {
    pub modified: Vec<PathBuf>,
    pub deleted: Vec<PathBuf>,
    pub untracked: Vec<PathBuf>,
}

impl WorkspaceChanges {
    pub fn is_clean(&self) -> bool {
        self.modified.is_empty() && self.deleted.is_empty() && self.untracked.is_empty()
    }

    /// Tracked paths that differ from the index, in path order
    pub fn changes(&self) -> BTreeMap<PathBuf, WorkspaceChangeType> {
        self.modified
            .iter()
            .map(|p| (p.clone(), WorkspaceChangeType::Modified))
            .chain(
                self.deleted
                    .iter()
                    .map(|p| (p.clone(), WorkspaceChangeType::Deleted)),
            )
            .collect()
    }
}
