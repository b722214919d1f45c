use crate::artifacts::objects::object_id::ObjectId;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

/// Type of file system action required for checkout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ActionType {
    /// Create new file
    Add,
    /// Delete file
    Delete,
    /// Modify existing file
    Modify,
}

/// Planned actions grouped by type; deletions carry no blob
pub type ActionsSet = BTreeMap<ActionType, Vec<(PathBuf, Option<ObjectId>)>>;

/// File system plan turning one tree's files into another's
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Migration {
    actions: ActionsSet,
    /// Directories to create, parents before children
    mkdirs: BTreeSet<PathBuf>,
    /// Directories left empty by deletions
    rmdirs: BTreeSet<PathBuf>,
}

impl Migration {
    /// Plan the move from `old` to `new`, both flattened `path -> blob` maps
    pub fn plan(old: &BTreeMap<PathBuf, ObjectId>, new: &BTreeMap<PathBuf, ObjectId>) -> Self {
        let mut migration = Migration::default();

        for (path, old_oid) in old {
            match new.get(path) {
                None => migration.record(ActionType::Delete, path, None),
                Some(new_oid) if new_oid != old_oid => {
                    migration.record(ActionType::Modify, path, Some(new_oid.clone()))
                }
                Some(_) => {}
            }
        }
        for (path, new_oid) in new {
            if !old.contains_key(path) {
                migration.record(ActionType::Add, path, Some(new_oid.clone()));
            }
        }

        // a directory survives if anything in the new tree still lives below it
        migration
            .rmdirs
            .retain(|dir| !new.keys().any(|path| path.starts_with(dir)));

        migration
    }

    fn record(&mut self, action: ActionType, path: &Path, oid: Option<ObjectId>) {
        let parents = path
            .ancestors()
            .skip(1)
            .filter(|ancestor| !ancestor.as_os_str().is_empty())
            .map(Path::to_path_buf);

        match action {
            ActionType::Delete => self.rmdirs.extend(parents),
            ActionType::Add | ActionType::Modify => self.mkdirs.extend(parents),
        }

        self.actions
            .entry(action)
            .or_default()
            .push((path.to_path_buf(), oid));
    }

    pub fn actions(&self) -> &ActionsSet {
        &self.actions
    }

    pub fn actions_of(&self, action: ActionType) -> &[(PathBuf, Option<ObjectId>)] {
        self.actions
            .get(&action)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn mkdirs(&self) -> &BTreeSet<PathBuf> {
        &self.mkdirs
    }

    pub fn rmdirs(&self) -> &BTreeSet<PathBuf> {
        &self.rmdirs
    }

    pub fn is_empty(&self) -> bool {
        self.actions.values().all(Vec::is_empty)
    }

    /// Number of files touched
    pub fn len(&self) -> usize {
        self.actions.values().map(Vec::len).sum()
    }
}
