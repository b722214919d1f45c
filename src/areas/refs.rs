//! References (branches, tags, HEAD)
//!
//! References are human-readable names pointing at commits:
//! - Branches: `refs/heads/*`, moved by commit and merge
//! - Tags: `refs/tags/*`, never moved by the engine
//! - HEAD: attached to a branch (`ref: refs/heads/<name>`) or detached (a raw id)
//!
//! ## Updates
//!
//! Every write goes through a `<ref>.lock` file created with create-new semantics.
//! The new value is written to the lock file, which is then renamed over the
//! reference. Whoever fails to create the lock lost a race and gets
//! `ConcurrentUpdate`; the same error is returned when the reference no longer
//! holds the value the caller expected.

use crate::artifacts::branch::branch_name::{BranchName, HEADS_PREFIX, TAGS_PREFIX};
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::{Error, Result};
use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Name of the HEAD reference
pub const HEAD_REF_NAME: &str = "HEAD";

const SYMREF_PREFIX: &str = "ref: ";
const LOCK_SUFFIX: &str = ".lock";

/// Where HEAD currently points
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Head {
    Attached(BranchName),
    Detached(ObjectId),
}

impl Head {
    pub fn branch(&self) -> Option<&BranchName> {
        match self {
            Head::Attached(branch) => Some(branch),
            Head::Detached(_) => None,
        }
    }
}

#[derive(Debug)]
pub struct Refs {
    /// Path to the repository metadata directory (`.vsx`)
    path: PathBuf,
}

/// Exclusive claim on one reference; removes the lock file unless committed
struct RefLock {
    lock_path: PathBuf,
    ref_path: PathBuf,
    committed: bool,
}

impl RefLock {
    fn acquire(ref_path: &Path) -> std::io::Result<Self> {
        let mut lock_path = ref_path.as_os_str().to_owned();
        lock_path.push(LOCK_SUFFIX);
        let lock_path = PathBuf::from(lock_path);

        std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&lock_path)?;

        Ok(RefLock {
            lock_path,
            ref_path: ref_path.to_path_buf(),
            committed: false,
        })
    }

    fn commit(mut self, content: &str) -> Result<()> {
        let mut file = std::fs::OpenOptions::new()
            .write(true)
            .truncate(true)
            .open(&self.lock_path)
            .map_err(Error::io_at(&self.lock_path))?;
        file.write_all(content.as_bytes())
            .and_then(|_| file.write_all(b"\n"))
            .map_err(Error::io_at(&self.lock_path))?;

        std::fs::rename(&self.lock_path, &self.ref_path).map_err(Error::io_at(&self.ref_path))?;
        self.committed = true;

        Ok(())
    }
}

impl Drop for RefLock {
    fn drop(&mut self) {
        if !self.committed {
            let _ = std::fs::remove_file(&self.lock_path);
        }
    }
}

impl Refs {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Refs { path: path.into() }
    }

    pub fn head(&self) -> Result<Head> {
        let head_path = self.head_path();
        let content = std::fs::read_to_string(&head_path).map_err(Error::io_at(&head_path))?;
        let content = content.trim();

        match content.strip_prefix(SYMREF_PREFIX) {
            Some(ref_name) => Ok(Head::Attached(BranchName::from_ref_name(ref_name)?)),
            None => Ok(Head::Detached(ObjectId::try_parse(content)?)),
        }
    }

    /// Commit HEAD resolves to, `None` on an unborn branch
    pub fn read_head(&self) -> Result<Option<ObjectId>> {
        match self.head()? {
            Head::Attached(branch) => self.get_ref(&branch.to_ref_name()),
            Head::Detached(oid) => Ok(Some(oid)),
        }
    }

    pub fn set_head_attached(&self, branch: &BranchName) -> Result<()> {
        tracing::debug!(branch = %branch, "attaching HEAD");
        self.write_ref_file(
            &self.head_path(),
            &format!("{SYMREF_PREFIX}{}", branch.to_ref_name()),
        )
    }

    pub fn set_head_detached(&self, oid: &ObjectId) -> Result<()> {
        tracing::debug!(%oid, "detaching HEAD");
        self.write_ref_file(&self.head_path(), oid.as_ref())
    }

    /// Advance whatever HEAD points at from `expected` to `new`
    pub fn update_head(&self, new: &ObjectId, expected: Option<&ObjectId>) -> Result<()> {
        match self.head()? {
            Head::Attached(branch) => self.compare_and_swap(&branch.to_ref_name(), expected, new),
            Head::Detached(_) => self.compare_and_swap(HEAD_REF_NAME, expected, new),
        }
    }

    /// Value of a full reference name (`refs/heads/main`, `refs/tags/v1`, `HEAD`)
    pub fn get_ref(&self, name: &str) -> Result<Option<ObjectId>> {
        if name == HEAD_REF_NAME {
            return self.read_head();
        }

        let ref_path = self.path.join(name);
        if !ref_path.is_file() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(&ref_path).map_err(Error::io_at(&ref_path))?;
        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }

        Ok(Some(ObjectId::try_parse(content)?))
    }

    /// Unconditionally point `name` at `oid`
    pub fn set_ref(&self, name: &str, oid: &ObjectId) -> Result<()> {
        tracing::debug!(name, %oid, "setting reference");
        self.write_ref_file(&self.path.join(name), oid.as_ref())
    }

    /// Move `name` to `new` only if it still holds `expected`
    ///
    /// `expected == None` asserts the reference does not exist yet.
    pub fn compare_and_swap(
        &self,
        name: &str,
        expected: Option<&ObjectId>,
        new: &ObjectId,
    ) -> Result<()> {
        let ref_path = self.path.join(name);
        Self::ensure_parent(&ref_path)?;

        let lock = RefLock::acquire(&ref_path).map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => Error::ConcurrentUpdate {
                name: name.to_string(),
                expected: expected.cloned(),
                actual: None,
            },
            _ => Error::Io {
                path: ref_path.clone(),
                source: e,
            },
        })?;

        let actual = if name == HEAD_REF_NAME {
            self.read_head()?
        } else {
            self.get_ref(name)?
        };
        if actual.as_ref() != expected {
            tracing::debug!(name, ?expected, ?actual, "reference moved concurrently");
            return Err(Error::ConcurrentUpdate {
                name: name.to_string(),
                expected: expected.cloned(),
                actual,
            });
        }

        tracing::debug!(name, ?expected, %new, "advancing reference");
        lock.commit(new.as_ref())
    }

    /// Remove a reference, returning the commit it pointed at
    pub fn delete_ref(&self, name: &str) -> Result<ObjectId> {
        let ref_path = self.path.join(name);
        let oid = self
            .get_ref(name)?
            .ok_or_else(|| Error::UnknownReference(name.to_string()))?;

        let lock = RefLock::acquire(&ref_path).map_err(|_| Error::ConcurrentUpdate {
            name: name.to_string(),
            expected: Some(oid.clone()),
            actual: None,
        })?;
        std::fs::remove_file(&ref_path).map_err(Error::io_at(&ref_path))?;
        drop(lock);

        self.prune_empty_parent_dirs(&ref_path)?;
        tracing::debug!(name, %oid, "deleted reference");

        Ok(oid)
    }

    /// Every reference under `refs/`, ordered by name
    pub fn list_refs(&self) -> Result<Vec<(String, ObjectId)>> {
        self.list_refs_under(&self.refs_path())
    }

    pub fn list_branches(&self) -> Result<Vec<(BranchName, ObjectId)>> {
        self.list_refs_under(&self.heads_path())?
            .into_iter()
            .map(|(name, oid)| Ok((BranchName::from_ref_name(&name)?, oid)))
            .collect()
    }

    pub fn list_tags(&self) -> Result<Vec<(BranchName, ObjectId)>> {
        self.list_refs_under(&self.tags_path())?
            .into_iter()
            .map(|(name, oid)| {
                let tag = name.strip_prefix(TAGS_PREFIX).unwrap_or(&name);
                Ok((BranchName::try_parse(tag)?, oid))
            })
            .collect()
    }

    /// Commit id -> names of every reference (and HEAD) pointing at it
    pub fn reverse_refs(&self) -> Result<HashMap<ObjectId, Vec<String>>> {
        let mut reversed: HashMap<ObjectId, Vec<String>> = HashMap::new();

        for (name, oid) in self.list_refs()? {
            reversed.entry(oid).or_default().push(name);
        }
        if let Some(oid) = self.read_head()? {
            reversed
                .entry(oid)
                .or_default()
                .push(HEAD_REF_NAME.to_string());
        }

        Ok(reversed)
    }

    fn list_refs_under(&self, path: &Path) -> Result<Vec<(String, ObjectId)>> {
        let mut refs = Vec::new();
        if !path.is_dir() {
            return Ok(refs);
        }

        for entry in WalkDir::new(path).sort_by_file_name() {
            let entry = entry.map_err(|e| Error::Io {
                path: path.to_path_buf(),
                source: e.into(),
            })?;
            if !entry.file_type().is_file()
                || entry.path().to_string_lossy().ends_with(LOCK_SUFFIX)
            {
                continue;
            }

            let Ok(relative) = entry.path().strip_prefix(&self.path) else {
                continue;
            };
            let name = relative
                .components()
                .map(|component| component.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");
            if let Some(oid) = self.get_ref(&name)? {
                refs.push((name, oid));
            }
        }

        refs.sort_by(|(left, _), (right, _)| left.cmp(right));
        Ok(refs)
    }

    fn write_ref_file(&self, ref_path: &Path, content: &str) -> Result<()> {
        Self::ensure_parent(ref_path)?;

        let name = ref_path
            .strip_prefix(&self.path)
            .unwrap_or(ref_path)
            .to_string_lossy()
            .to_string();
        let lock = RefLock::acquire(ref_path).map_err(|e| match e.kind() {
            std::io::ErrorKind::AlreadyExists => Error::ConcurrentUpdate {
                name,
                expected: None,
                actual: None,
            },
            _ => Error::Io {
                path: ref_path.to_path_buf(),
                source: e,
            },
        })?;

        lock.commit(content)
    }

    fn ensure_parent(ref_path: &Path) -> Result<()> {
        match ref_path.parent() {
            Some(parent) => std::fs::create_dir_all(parent).map_err(Error::io_at(parent)),
            None => Err(Error::InvalidPath(ref_path.to_path_buf())),
        }
    }

    fn prune_empty_parent_dirs(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && parent != self.heads_path()
            && parent != self.tags_path()
            && parent.starts_with(self.refs_path())
            && parent
                .read_dir()
                .map_err(Error::io_at(parent))?
                .next()
                .is_none()
        {
            std::fs::remove_dir(parent).map_err(Error::io_at(parent))?;
            self.prune_empty_parent_dirs(parent)?;
        }

        Ok(())
    }

    pub fn head_path(&self) -> PathBuf {
        self.path.join(HEAD_REF_NAME)
    }

    pub fn refs_path(&self) -> PathBuf {
        self.path.join("refs")
    }

    pub fn heads_path(&self) -> PathBuf {
        self.path.join(HEADS_PREFIX.trim_end_matches('/'))
    }

    pub fn tags_path(&self) -> PathBuf {
        self.path.join(TAGS_PREFIX.trim_end_matches('/'))
    }
}
