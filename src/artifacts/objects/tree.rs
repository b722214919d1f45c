//! Tree object
//!
//! Trees snapshot one directory: each entry names either a blob (file) or another
//! tree (subdirectory). Entries are kept in a `BTreeMap`, so serialization is
//! always sorted by name and two trees with the same contents get the same id no
//! matter in which order their entries were added.
//!
//! ## Format
//!
//! On disk: `tree <size>\0<entries>`
//! Each entry: `<mode> <name>\0<20-byte-sha1>`
//!
//! ## Tree Building
//!
//! [`TreeBuilder`] folds a flat list of `path -> blob` pairs into nested
//! directories. Writing it visits children before parents, since a parent's id
//! depends on the ids of its children.

use crate::artifacts::objects::object::{Object, Packable, Unpackable};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::errors::{Error, Result};
use bytes::Bytes;
use std::collections::BTreeMap;
use std::io::{BufRead, Write};
use std::path::{Component, Path};

const FILE_MODE: &str = "100644";
const DIRECTORY_MODE: &str = "40000";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
    File,
    Directory,
}

impl EntryKind {
    pub fn mode(&self) -> &'static str {
        match self {
            EntryKind::File => FILE_MODE,
            EntryKind::Directory => DIRECTORY_MODE,
        }
    }

    pub fn object_type(&self) -> ObjectType {
        match self {
            EntryKind::File => ObjectType::Blob,
            EntryKind::Directory => ObjectType::Tree,
        }
    }

    fn from_mode(mode: &str) -> Result<Self> {
        match mode {
            FILE_MODE => Ok(EntryKind::File),
            DIRECTORY_MODE => Ok(EntryKind::Directory),
            other => Err(Error::MalformedObject(format!(
                "unsupported tree entry mode {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TreeEntry {
    pub oid: ObjectId,
    pub kind: EntryKind,
}

impl TreeEntry {
    pub fn file(oid: ObjectId) -> Self {
        Self {
            oid,
            kind: EntryKind::File,
        }
    }

    pub fn directory(oid: ObjectId) -> Self {
        Self {
            oid,
            kind: EntryKind::Directory,
        }
    }

    pub fn is_tree(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// A stored directory snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Tree {
    entries: BTreeMap<String, TreeEntry>,
}

impl Tree {
    pub fn insert(&mut self, name: impl Into<String>, entry: TreeEntry) {
        self.entries.insert(name.into(), entry);
    }

    pub fn get(&self, name: &str) -> Option<&TreeEntry> {
        self.entries.get(name)
    }

    pub fn entries(&self) -> impl Iterator<Item = (&String, &TreeEntry)> {
        self.entries.iter()
    }

    pub fn into_entries(self) -> impl Iterator<Item = (String, TreeEntry)> {
        self.entries.into_iter()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Packable for Tree {
    fn serialize(&self) -> Result<Bytes> {
        let mut content = Vec::new();

        for (name, entry) in &self.entries {
            content
                .write_all(format!("{} {}\0", entry.kind.mode(), name).as_bytes())
                .map_err(|e| Error::MalformedObject(format!("unable to write entry: {e}")))?;
            entry.oid.write_raw_to(&mut content)?;
        }

        Ok(content.into())
    }
}

impl Unpackable for Tree {
    fn deserialize(mut reader: impl BufRead) -> Result<Self> {
        let mut tree = Tree::default();

        // scratch buffers reused across entries
        let mut mode_bytes = Vec::new();
        let mut name_bytes = Vec::new();

        loop {
            mode_bytes.clear();
            let read = reader
                .read_until(b' ', &mut mode_bytes)
                .map_err(|e| Error::MalformedObject(format!("unreadable tree: {e}")))?;
            if read == 0 {
                break;
            }
            if mode_bytes.pop() != Some(b' ') {
                return Err(Error::MalformedObject("unexpected EOF in mode".to_string()));
            }
            let mode = std::str::from_utf8(&mode_bytes)
                .map_err(|_| Error::MalformedObject("tree mode is not utf-8".to_string()))?;
            let kind = EntryKind::from_mode(mode)?;

            name_bytes.clear();
            reader
                .read_until(b'\0', &mut name_bytes)
                .map_err(|e| Error::MalformedObject(format!("unreadable tree: {e}")))?;
            if name_bytes.pop() != Some(b'\0') {
                return Err(Error::MalformedObject("unexpected EOF in name".to_string()));
            }
            let name = String::from_utf8(name_bytes.clone())
                .map_err(|_| Error::MalformedObject("tree entry name is not utf-8".to_string()))?;

            let oid = ObjectId::read_raw_from(&mut reader)?;
            tree.insert(name, TreeEntry { oid, kind });
        }

        Ok(tree)
    }
}

impl Object for Tree {
    fn object_type(&self) -> ObjectType {
        ObjectType::Tree
    }

    fn display(&self) -> String {
        self.entries
            .iter()
            .map(|(name, entry)| {
                format!(
                    "{:0>6} {} {}\t{}",
                    entry.kind.mode(),
                    entry.kind.object_type(),
                    entry.oid,
                    name
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[derive(Debug, Clone)]
enum BuilderEntry {
    File(ObjectId),
    Directory(TreeBuilder),
}

/// Nested, not-yet-stored directory structure built from flat staged paths
#[derive(Debug, Clone, Default)]
pub struct TreeBuilder {
    entries: BTreeMap<String, BuilderEntry>,
}

impl TreeBuilder {
    /// Fold `path -> blob` pairs into nested directories
    pub fn build<'e>(entries: impl IntoIterator<Item = (&'e Path, &'e ObjectId)>) -> Result<Self> {
        let mut root = Self::default();

        for (path, oid) in entries {
            let segments = path_segments(path)?;
            root.add_entry(&segments, oid.clone())?;
        }

        Ok(root)
    }

    fn add_entry(&mut self, segments: &[&str], oid: ObjectId) -> Result<()> {
        match segments {
            [] => Err(Error::InvalidPath(Default::default())),
            [name] => {
                self.entries
                    .insert(name.to_string(), BuilderEntry::File(oid));
                Ok(())
            }
            [dir, rest @ ..] => {
                let entry = self
                    .entries
                    .entry(dir.to_string())
                    .or_insert_with(|| BuilderEntry::Directory(TreeBuilder::default()));

                // a staged file replacing a directory (or vice versa) is settled by the index
                if let BuilderEntry::File(_) = *entry {
                    *entry = BuilderEntry::Directory(TreeBuilder::default());
                }
                match entry {
                    BuilderEntry::Directory(subtree) => subtree.add_entry(rest, oid),
                    BuilderEntry::File(_) => unreachable!("directory entry was just ensured"),
                }
            }
        }
    }

    /// Store every tree bottom-up through `store`, returning the root id
    pub fn write<F>(&self, store: &mut F) -> Result<ObjectId>
    where
        F: FnMut(&Tree) -> Result<ObjectId>,
    {
        let mut tree = Tree::default();

        for (name, entry) in &self.entries {
            match entry {
                BuilderEntry::File(oid) => tree.insert(name.clone(), TreeEntry::file(oid.clone())),
                BuilderEntry::Directory(subtree) => {
                    let oid = subtree.write(store)?;
                    tree.insert(name.clone(), TreeEntry::directory(oid));
                }
            }
        }

        store(&tree)
    }
}

/// Split a relative path into its normal components, rejecting anything else
pub fn path_segments(path: &Path) -> Result<Vec<&str>> {
    path.components()
        .map(|component| match component {
            Component::Normal(segment) => segment
                .to_str()
                .ok_or_else(|| Error::InvalidPath(path.to_path_buf())),
            _ => Err(Error::InvalidPath(path.to_path_buf())),
        })
        .collect::<Result<Vec<_>>>()
        .and_then(|segments| {
            if segments.is_empty() {
                Err(Error::InvalidPath(path.to_path_buf()))
            } else {
                Ok(segments)
            }
        })
}
