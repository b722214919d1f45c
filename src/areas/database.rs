//! Object database
//!
//! Content-addressed storage for blobs, trees and commits. Each object is framed as
//! `<type> <size>\0<body>`, named by the SHA-1 of that framing, zlib-compressed and
//! written to `objects/<2 hex>/<38 hex>`.
//!
//! Writes land in a temporary file next to their destination and are renamed into
//! place, so readers never observe a partial object. Reads re-digest what they
//! decompressed and refuse anything whose digest does not match its name.

use crate::artifacts::objects::blob::Blob;
use crate::artifacts::objects::commit::{Commit, SlimCommit};
use crate::artifacts::objects::object::{Object, RawObject, Unpackable, frame};
use crate::artifacts::objects::object_id::ObjectId;
use crate::artifacts::objects::object_type::ObjectType;
use crate::artifacts::objects::tree::{Tree, path_segments};
use crate::errors::{Error, Result};
use bytes::Bytes;
use fake::rand;
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::io::{Cursor, Read, Write};
use std::path::{Path, PathBuf};

/// Slim commits already read during this handle's lifetime
#[derive(Debug, Default)]
pub struct CommitCache {
    commits: RefCell<HashMap<ObjectId, SlimCommit>>,
}

impl CommitCache {
    fn get(&self, oid: &ObjectId) -> Option<SlimCommit> {
        self.commits.borrow().get(oid).cloned()
    }

    fn insert(&self, commit: SlimCommit) {
        self.commits.borrow_mut().insert(commit.oid.clone(), commit);
    }

    pub fn len(&self) -> usize {
        self.commits.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug)]
pub struct Database {
    path: PathBuf,
    commit_cache: CommitCache,
}

impl Database {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Database {
            path: path.into(),
            commit_cache: CommitCache::default(),
        }
    }

    pub fn objects_path(&self) -> &Path {
        &self.path
    }

    pub fn commit_cache(&self) -> &CommitCache {
        &self.commit_cache
    }

    /// Frame, digest and store a canonical body; a no-op when already present
    pub fn put(&self, object_type: ObjectType, body: &[u8]) -> Result<ObjectId> {
        let framed = frame(object_type, body);
        let oid = ObjectId::digest(&framed);
        let object_path = self.path.join(oid.to_path());

        if !object_path.exists() {
            self.write_object(&object_path, &framed)?;
            tracing::debug!(%oid, %object_type, size = body.len(), "stored object");
        }

        Ok(oid)
    }

    pub fn store(&self, object: &impl Object) -> Result<ObjectId> {
        self.put(object.object_type(), &object.serialize()?)
    }

    pub fn contains(&self, oid: &ObjectId) -> bool {
        self.path.join(oid.to_path()).is_file()
    }

    /// Read an object back, verifying that its content still hashes to `oid`
    pub fn get(&self, oid: &ObjectId) -> Result<RawObject> {
        let framed = self.read_framed(oid)?;

        if ObjectId::digest(&framed) != *oid {
            return Err(Error::CorruptObject {
                oid: oid.clone(),
                reason: "content does not match its digest".to_string(),
            });
        }

        let mut reader = Cursor::new(&framed[..]);
        let (object_type, size) =
            ObjectType::parse_header(&mut reader).map_err(|e| Error::CorruptObject {
                oid: oid.clone(),
                reason: e.to_string(),
            })?;
        let content = framed.slice(reader.position() as usize..);

        if content.len() != size {
            return Err(Error::CorruptObject {
                oid: oid.clone(),
                reason: format!("declared size {size}, found {} bytes", content.len()),
            });
        }

        Ok(RawObject {
            object_type,
            content,
        })
    }

    pub fn object_type(&self, oid: &ObjectId) -> Result<ObjectType> {
        Ok(self.get(oid)?.object_type)
    }

    pub fn load_blob(&self, oid: &ObjectId) -> Result<Blob> {
        self.load_typed(oid, ObjectType::Blob)
    }

    pub fn load_tree(&self, oid: &ObjectId) -> Result<Tree> {
        self.load_typed(oid, ObjectType::Tree)
    }

    pub fn load_commit(&self, oid: &ObjectId) -> Result<Commit> {
        let commit: Commit = self.load_typed(oid, ObjectType::Commit)?;
        self.commit_cache.insert(commit.to_slim(oid.clone()));
        Ok(commit)
    }

    /// Parents and timestamp of a commit, served from the cache when possible
    pub fn load_slim_commit(&self, oid: &ObjectId) -> Result<SlimCommit> {
        if let Some(commit) = self.commit_cache.get(oid) {
            return Ok(commit);
        }

        let commit = self.load_commit(oid)?;
        Ok(commit.to_slim(oid.clone()))
    }

    fn load_typed<T: Unpackable>(&self, oid: &ObjectId, expected: ObjectType) -> Result<T> {
        let raw = self.get(oid)?;
        if raw.object_type != expected {
            return Err(Error::UnexpectedObjectType {
                oid: oid.clone(),
                expected,
                actual: raw.object_type,
            });
        }

        T::deserialize(Cursor::new(raw.content)).map_err(|e| Error::CorruptObject {
            oid: oid.clone(),
            reason: e.to_string(),
        })
    }

    /// Every file reachable from a tree, keyed by its full relative path
    pub fn flatten_tree(&self, tree_oid: &ObjectId) -> Result<BTreeMap<PathBuf, ObjectId>> {
        let mut files = BTreeMap::new();
        self.flatten_into(tree_oid, PathBuf::new(), &mut files)?;
        Ok(files)
    }

    fn flatten_into(
        &self,
        tree_oid: &ObjectId,
        prefix: PathBuf,
        files: &mut BTreeMap<PathBuf, ObjectId>,
    ) -> Result<()> {
        for (name, entry) in self.load_tree(tree_oid)?.into_entries() {
            let path = prefix.join(&name);
            if entry.is_tree() {
                self.flatten_into(&entry.oid, path, files)?;
            } else {
                files.insert(path, entry.oid);
            }
        }

        Ok(())
    }

    /// Blob stored at `path` inside a tree, if any
    pub fn tree_entry_at(&self, tree_oid: &ObjectId, path: &Path) -> Result<Option<ObjectId>> {
        let segments = path_segments(path)?;
        let mut current = tree_oid.clone();

        for (depth, segment) in segments.iter().enumerate() {
            let tree = self.load_tree(&current)?;
            let Some(entry) = tree.get(segment) else {
                return Ok(None);
            };
            let last = depth + 1 == segments.len();
            match (last, entry.is_tree()) {
                (true, false) => return Ok(Some(entry.oid.clone())),
                (false, true) => current = entry.oid.clone(),
                _ => return Ok(None),
            }
        }

        Ok(None)
    }

    /// Transitive closure of objects reachable from `roots` (commits, trees, blobs)
    pub fn reachable_objects<'r>(
        &self,
        roots: impl IntoIterator<Item = &'r ObjectId>,
    ) -> Result<BTreeSet<ObjectId>> {
        let mut seen = BTreeSet::new();
        let mut pending = roots.into_iter().cloned().collect::<Vec<_>>();

        while let Some(oid) = pending.pop() {
            if !seen.insert(oid.clone()) {
                continue;
            }

            let raw = self.get(&oid)?;
            match raw.object_type {
                ObjectType::Commit => {
                    let commit = self.load_commit(&oid)?;
                    pending.push(commit.tree_oid().clone());
                    pending.extend(commit.parents().iter().cloned());
                }
                ObjectType::Tree => {
                    let tree = self.load_tree(&oid)?;
                    pending.extend(tree.into_entries().map(|(_, entry)| entry.oid));
                }
                ObjectType::Blob => {}
            }
        }

        Ok(seen)
    }

    /// Copy one stored object from another database byte for byte
    pub fn copy_object_from(&self, other: &Database, oid: &ObjectId) -> Result<()> {
        let target = self.path.join(oid.to_path());
        if target.exists() {
            return Ok(());
        }

        let source = other.path.join(oid.to_path());
        let compressed = std::fs::read(&source).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::ObjectNotFound(oid.clone()),
            _ => Error::Io {
                path: source.clone(),
                source: e,
            },
        })?;
        self.write_compressed(&target, &compressed)
    }

    /// Full ids of every stored object starting with `prefix`
    pub fn find_objects_by_prefix(&self, prefix: &str) -> Result<Vec<ObjectId>> {
        let prefix = prefix.to_ascii_lowercase();
        if !ObjectId::is_hex_prefix(&prefix) {
            return Err(Error::InvalidObjectId(prefix));
        }

        let mut matches = Vec::new();
        let dirs = if prefix.len() >= 2 {
            vec![prefix[..2].to_string()]
        } else {
            (0..=255u8).map(|i| format!("{i:02x}")).collect()
        };

        for dir_name in dirs {
            let dir_path = self.path.join(&dir_name);
            if !dir_path.is_dir() {
                continue;
            }

            for entry in std::fs::read_dir(&dir_path).map_err(Error::io_at(&dir_path))? {
                let entry = entry.map_err(Error::io_at(&dir_path))?;
                let full_oid = format!("{dir_name}{}", entry.file_name().to_string_lossy());
                if full_oid.starts_with(&prefix)
                    && let Ok(oid) = ObjectId::try_parse(full_oid)
                {
                    matches.push(oid);
                }
            }
        }

        matches.sort();
        Ok(matches)
    }

    fn read_framed(&self, oid: &ObjectId) -> Result<Bytes> {
        let object_path = self.path.join(oid.to_path());
        let compressed = std::fs::read(&object_path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => Error::ObjectNotFound(oid.clone()),
            _ => Error::Io {
                path: object_path.clone(),
                source: e,
            },
        })?;

        Self::decompress(&compressed).map_err(|e| Error::CorruptObject {
            oid: oid.clone(),
            reason: format!("unable to decompress: {e}"),
        })
    }

    fn write_object(&self, object_path: &Path, framed: &[u8]) -> Result<()> {
        let compressed = Self::compress(framed).map_err(Error::io_at(object_path))?;
        self.write_compressed(object_path, &compressed)
    }

    fn write_compressed(&self, object_path: &Path, compressed: &[u8]) -> Result<()> {
        let object_dir = object_path
            .parent()
            .ok_or_else(|| Error::InvalidPath(object_path.to_path_buf()))?;
        std::fs::create_dir_all(object_dir).map_err(Error::io_at(object_dir))?;

        let temp_object_path = object_dir.join(Self::generate_temp_name());
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&temp_object_path)
            .map_err(Error::io_at(&temp_object_path))?;
        file.write_all(compressed)
            .map_err(Error::io_at(&temp_object_path))?;

        // rename the temp file to the object file to make it atomic
        std::fs::rename(&temp_object_path, object_path).map_err(|e| {
            let _ = std::fs::remove_file(&temp_object_path);
            Error::Io {
                path: object_path.to_path_buf(),
                source: e,
            }
        })
    }

    fn compress(data: &[u8]) -> std::io::Result<Vec<u8>> {
        let mut encoder =
            flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
        encoder.write_all(data)?;
        encoder.finish()
    }

    fn decompress(data: &[u8]) -> std::io::Result<Bytes> {
        let mut decoder = flate2::read::ZlibDecoder::new(data);
        let mut decompressed_content = Vec::new();
        decoder.read_to_end(&mut decompressed_content)?;

        Ok(decompressed_content.into())
    }

    fn generate_temp_name() -> String {
        format!("tmp-obj-{}", rand::random::<u32>())
    }
}
