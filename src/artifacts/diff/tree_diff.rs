use crate::areas::database::Database;
use crate::artifacts::diff::{ContentDiff, diff_blobs};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::status::status_info::FileMap;
use crate::errors::Result;
use bitflags::bitflags;
use std::collections::{BTreeMap, BTreeSet};
use std::path::{Path, PathBuf};

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
    pub struct DiffFilter: u32 {
        const ADDED = 0b0001;
        const DELETED = 0b0010;
        const MODIFIED = 0b0100;
    }
}

impl DiffFilter {
    pub fn try_parse(s: &str) -> Option<Self> {
        let mut filter = Self::empty();

        for c in s.chars() {
            match c {
                'A' => filter |= Self::ADDED,
                'D' => filter |= Self::DELETED,
                'M' => filter |= Self::MODIFIED,
                _ => return None,
            }
        }

        Some(filter)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileDiff {
    Added(ObjectId),
    Deleted(ObjectId),
    Unchanged(ObjectId),
    Modified {
        old: ObjectId,
        new: ObjectId,
        content: ContentDiff,
    },
}

impl FileDiff {
    pub fn is_changed(&self) -> bool {
        !matches!(self, FileDiff::Unchanged(_))
    }

    pub fn matches_filter(&self, filter: DiffFilter) -> bool {
        match self {
            FileDiff::Added(_) => filter.contains(DiffFilter::ADDED),
            FileDiff::Deleted(_) => filter.contains(DiffFilter::DELETED),
            FileDiff::Modified { .. } => filter.contains(DiffFilter::MODIFIED),
            FileDiff::Unchanged(_) => false,
        }
    }

    pub fn old_oid(&self) -> Option<&ObjectId> {
        match self {
            FileDiff::Deleted(oid) | FileDiff::Unchanged(oid) => Some(oid),
            FileDiff::Modified { old, .. } => Some(old),
            FileDiff::Added(_) => None,
        }
    }

    pub fn new_oid(&self) -> Option<&ObjectId> {
        match self {
            FileDiff::Added(oid) | FileDiff::Unchanged(oid) => Some(oid),
            FileDiff::Modified { new, .. } => Some(new),
            FileDiff::Deleted(_) => None,
        }
    }

    pub fn status_char(&self) -> char {
        match self {
            FileDiff::Added(_) => 'A',
            FileDiff::Deleted(_) => 'D',
            FileDiff::Modified { .. } => 'M',
            FileDiff::Unchanged(_) => ' ',
        }
    }
}

/// Per-file comparison of two snapshots, in path order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DiffReport {
    files: BTreeMap<PathBuf, FileDiff>,
}

impl DiffReport {
    /// Compare two flattened snapshots; blobs behind modified paths are loaded and
    /// diffed line by line
    pub fn compare(database: &Database, left: &FileMap, right: &FileMap) -> Result<Self> {
        let paths = left.keys().chain(right.keys()).collect::<BTreeSet<_>>();
        let mut files = BTreeMap::new();

        for path in paths {
            let file_diff = match (left.get(path), right.get(path)) {
                (Some(old), None) => FileDiff::Deleted(old.clone()),
                (None, Some(new)) => FileDiff::Added(new.clone()),
                (Some(old), Some(new)) if old == new => FileDiff::Unchanged(old.clone()),
                (Some(old), Some(new)) => {
                    let content =
                        diff_blobs(&database.load_blob(old)?, &database.load_blob(new)?);
                    FileDiff::Modified {
                        old: old.clone(),
                        new: new.clone(),
                        content,
                    }
                }
                (None, None) => continue,
            };
            files.insert(path.clone(), file_diff);
        }

        Ok(DiffReport { files })
    }

    pub fn files(&self) -> &BTreeMap<PathBuf, FileDiff> {
        &self.files
    }

    pub fn get(&self, path: &Path) -> Option<&FileDiff> {
        self.files.get(path)
    }

    /// Everything but `Unchanged`
    pub fn changed(&self) -> impl Iterator<Item = (&PathBuf, &FileDiff)> {
        self.files.iter().filter(|(_, diff)| diff.is_changed())
    }

    pub fn filtered(&self, filter: DiffFilter) -> impl Iterator<Item = (&PathBuf, &FileDiff)> {
        self.files
            .iter()
            .filter(move |(_, diff)| diff.matches_filter(filter))
    }

    pub fn has_changes(&self) -> bool {
        self.changed().next().is_some()
    }
}

pub fn diff_trees(
    database: &Database,
    left_tree: &ObjectId,
    right_tree: &ObjectId,
) -> Result<DiffReport> {
    let left = database.flatten_tree(left_tree)?;
    let right = database.flatten_tree(right_tree)?;

    DiffReport::compare(database, &left, &right)
}
