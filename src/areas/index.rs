//! Index (staging area)
//!
//! The index records, for every tracked path, the blob that will go into the next
//! commit. It is persisted as a binary file guarded by `file-guard` locks and a
//! trailing SHA-1 checksum.
//!
//! ## Data Structures
//!
//! - `entries`: Maps file paths to their index entries
//! - `children`: Maps directory paths to the files below them, so that a file
//!   replacing a directory (or the other way round) can evict the stale entries

use crate::areas::database::Database;
use crate::artifacts::index::checksum::Checksum;
use crate::artifacts::index::index_entry::{ENTRY_BLOCK, ENTRY_MIN_SIZE, IndexEntry};
use crate::artifacts::index::index_header::IndexHeader;
use crate::artifacts::index::{HEADER_SIZE, SIGNATURE, VERSION};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::tree::{Tree, TreeBuilder, path_segments};
use crate::artifacts::status::status_info::{FileMap, StatusReport};
use crate::errors::{Error, Result};
use std::collections::{BTreeMap, BTreeSet};
use std::ops::DerefMut;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Index {
    /// Path to the index file (`.vsx/index`)
    path: PathBuf,
    /// Tracked files mapped by path
    entries: BTreeMap<PathBuf, IndexEntry>,
    /// Directory hierarchy for parent-child lookups
    children: BTreeMap<PathBuf, BTreeSet<PathBuf>>,
    /// Whether the index has been modified since loading
    changed: bool,
}

impl Index {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Index {
            path: path.into(),
            entries: BTreeMap::new(),
            children: BTreeMap::new(),
            changed: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_changed(&self) -> bool {
        self.changed
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entry_by_path(&self, path: &Path) -> Option<&IndexEntry> {
        self.entries.get(path)
    }

    /// Whether `path` is a tracked file or a directory holding tracked files
    pub fn is_tracked(&self, path: &Path) -> bool {
        self.entries.contains_key(path) || self.children.contains_key(path)
    }

    pub fn entries(&self) -> impl Iterator<Item = &IndexEntry> {
        self.entries.values()
    }

    /// Flattened `path -> blob` view
    pub fn file_map(&self) -> FileMap {
        self.entries
            .values()
            .map(|entry| (entry.name.clone(), entry.oid.clone()))
            .collect()
    }

    /// Tracked files at or below `path`
    pub fn entries_under_path(&self, path: &Path) -> Vec<PathBuf> {
        self.entries
            .keys()
            .filter(|entry_path| path == Path::new(".") || entry_path.starts_with(path))
            .cloned()
            .collect()
    }

    fn clear(&mut self) {
        self.entries.clear();
        self.children.clear();
        self.changed = false;
    }

    /// Stage `blob` at `path`, evicting any file/directory it collides with
    pub fn stage(&mut self, path: &Path, blob: ObjectId) -> Result<()> {
        path_segments(path)?;
        let entry = IndexEntry::new(path.to_path_buf(), blob);

        self.discard_conflicts(&entry);
        self.store_entry(&entry);
        self.changed = true;

        Ok(())
    }

    /// Remove a file, or every file below a directory
    pub fn unstage(&mut self, path: &Path) {
        self.remove_entry(path);
        self.remove_children(path);
        self.changed = true;
    }

    fn discard_conflicts(&mut self, entry: &IndexEntry) {
        for parent in entry.parent_dirs() {
            self.remove_entry(parent);
        }
        self.remove_children(&entry.name);
    }

    fn store_entry(&mut self, entry: &IndexEntry) {
        for parent in entry.parent_dirs() {
            self.children
                .entry(parent.to_path_buf())
                .or_default()
                .insert(entry.name.clone());
        }

        self.entries.insert(entry.name.clone(), entry.clone());
    }

    fn remove_children(&mut self, path: &Path) {
        if let Some(children) = self.children.remove(path) {
            for child in children {
                self.remove_entry(&child);
            }
        }
    }

    fn remove_entry(&mut self, path: &Path) {
        let Some(entry) = self.entries.remove(path) else {
            return;
        };

        for parent in entry.parent_dirs() {
            if let Some(children) = self.children.get_mut(parent) {
                children.remove(path);
                if children.is_empty() {
                    self.children.remove(parent);
                }
            }
        }
    }

    /// Store the staged state as nested trees and return the root tree id
    pub fn snapshot_as_tree(&self, database: &Database) -> Result<ObjectId> {
        let builder = TreeBuilder::build(
            self.entries
                .values()
                .map(|entry| (entry.name.as_path(), &entry.oid)),
        )?;

        builder.write(&mut |tree: &Tree| database.store(tree))
    }

    /// Replace every entry with the files of a stored tree
    pub fn load_from_tree(&mut self, database: &Database, tree_oid: &ObjectId) -> Result<()> {
        let files = database.flatten_tree(tree_oid)?;

        self.clear();
        for (path, oid) in files {
            self.store_entry(&IndexEntry::new(path, oid));
        }
        self.changed = true;

        Ok(())
    }

    /// Compare the staged state with a base tree (`None` for an unborn branch)
    pub fn status(&self, database: &Database, base_tree: Option<&ObjectId>) -> Result<StatusReport> {
        let base = match base_tree {
            Some(tree_oid) => database.flatten_tree(tree_oid)?,
            None => FileMap::new(),
        };

        Ok(StatusReport::compare(&base, &self.file_map()))
    }

    /// Load the index from disk
    ///
    /// A missing or empty file yields an empty index. Acquires a shared lock while
    /// reading.
    pub fn rehydrate(&mut self) -> Result<()> {
        self.clear();

        if !self.path.exists() {
            return Ok(());
        }

        let mut index_file = std::fs::OpenOptions::new()
            .read(true)
            .open(&self.path)
            .map_err(Error::io_at(&self.path))?;
        let mut lock = file_guard::lock(&mut index_file, file_guard::Lock::Shared, 0, 1)
            .map_err(Error::io_at(&self.path))?;

        let file_len = lock
            .deref_mut()
            .metadata()
            .map_err(Error::io_at(&self.path))?
            .len();
        if file_len == 0 {
            return Ok(());
        }

        let mut reader = Checksum::new(lock, &self.path);
        let entries_count = Self::parse_header(&mut reader)?;
        self.parse_entries(entries_count, &mut reader)?;
        reader.verify()?;

        self.changed = false;
        tracing::trace!(entries = self.entries.len(), "loaded index");

        Ok(())
    }

    fn parse_header(reader: &mut Checksum) -> Result<u32> {
        let header_bytes = reader.read(HEADER_SIZE)?;
        let header = IndexHeader::deserialize(&header_bytes)
            .ok_or_else(|| reader.corrupt("truncated header"))?;

        if header.marker != SIGNATURE {
            return Err(reader.corrupt("invalid index file signature"));
        }
        if header.version != VERSION {
            return Err(reader.corrupt(format!(
                "unsupported index file version: {}",
                header.version
            )));
        }

        Ok(header.entries_count)
    }

    /// Read each entry, handling variable-length paths with 8-byte alignment
    fn parse_entries(&mut self, entries_count: u32, reader: &mut Checksum) -> Result<()> {
        for _ in 0..entries_count {
            let mut entry_bytes = reader.read(ENTRY_MIN_SIZE)?.to_vec();

            while entry_bytes.last() != Some(&0) {
                entry_bytes.extend_from_slice(&reader.read(ENTRY_BLOCK)?);
            }

            let entry = IndexEntry::deserialize(&entry_bytes).map_err(|reason| reader.corrupt(reason))?;
            self.store_entry(&entry);
        }

        Ok(())
    }

    /// Persist the index under an exclusive lock
    pub fn write_updates(&mut self) -> Result<()> {
        let mut index_file = std::fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&self.path)
            .map_err(Error::io_at(&self.path))?;
        let lock = file_guard::lock(&mut index_file, file_guard::Lock::Exclusive, 0, 1)
            .map_err(Error::io_at(&self.path))?;

        let mut writer = Checksum::new(lock, &self.path);
        writer.write(&IndexHeader::new(self.entries.len() as u32).serialize())?;
        for entry in self.entries.values() {
            writer.write(&entry.serialize()?)?;
        }
        writer.write_checksum()?;

        self.changed = false;
        tracing::trace!(entries = self.entries.len(), "wrote index");

        Ok(())
    }
}
